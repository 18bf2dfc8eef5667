use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::command_registry::{CommandRegistry, RegistryError};
use crate::config::{self, Config, ConfigError};
use crate::core_service::{CoreService, ServiceError};
use crate::logging;
use crate::transport::handle_json;

const USAGE: &str =
    "usage: rush [-v|--verbose [true|false]] [--config PATH] [--history PATH] [--commands PATH]";

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub verbose: Option<bool>,
    pub config_path: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
    pub commands_path: Option<PathBuf>,
}

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, String> {
    let mut options = RuntimeOptions::default();
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => {
                let explicit = iter.peek().and_then(|value| parse_bool(value));
                if explicit.is_some() {
                    iter.next();
                }
                options.verbose = Some(explicit.unwrap_or(true));
            }
            "--config" => options.config_path = Some(path_value(arg, iter.next())?),
            "--history" => options.history_path = Some(path_value(arg, iter.next())?),
            "--commands" => options.commands_path = Some(path_value(arg, iter.next())?),
            other => return Err(format!("unknown argument '{other}'\n{USAGE}")),
        }
    }

    Ok(options)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Some(true),
        "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn path_value(flag: &str, value: Option<&String>) -> Result<PathBuf, String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(PathBuf::from(value)),
        _ => Err(format!("{flag} requires a path\n{USAGE}")),
    }
}

/// Load the config and write it back out when no file exists yet, so users have
/// a file to edit. Returns whether defaults were written.
pub fn load_or_init_config(path: Option<&Path>) -> Result<(Config, bool), ConfigError> {
    let cfg = config::load(path)?;
    if cfg.config_path.exists() {
        return Ok((cfg, false));
    }
    config::save(&cfg)?;
    Ok((cfg, true))
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    // Defaults are persisted before CLI overrides so one-off flags never stick.
    let (mut cfg, wrote_default) = load_or_init_config(options.config_path.as_deref())?;
    if let Some(verbose) = options.verbose {
        cfg.verbose = verbose;
    }
    if let Some(path) = options.history_path {
        cfg.history_path = path;
    }
    if let Some(path) = options.commands_path {
        cfg.commands_path = Some(path);
    }

    if let Err(error) = logging::init(&logging::logs_dir(), cfg.verbose) {
        eprintln!("[rush] file logging unavailable: {error}");
    }
    if wrote_default {
        log::info!("wrote default config to {}", cfg.config_path.display());
    }
    log::info!(
        "startup verbose={} config_path={} history_path={}",
        cfg.verbose,
        cfg.config_path.display(),
        cfg.history_path.display(),
    );

    let registry = match &cfg.commands_path {
        Some(path) => CommandRegistry::load_manifest(path)?,
        None => {
            log::warn!("no commands_path configured; palette starts with an empty registry");
            CommandRegistry::new()
        }
    };

    let mut service = CoreService::new(cfg, registry)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let handled = serve(&mut service, stdin.lock(), stdout.lock())?;
    log::info!("shutdown after {handled} events");
    Ok(())
}

/// Answer one JSON response line per non-blank input line until EOF.
pub fn serve<R: BufRead, W: Write>(
    service: &mut CoreService,
    input: R,
    mut output: W,
) -> Result<usize, std::io::Error> {
    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_json(service, &line);
        writeln!(output, "{response}")?;
        output.flush()?;
        handled += 1;
    }
    Ok(handled)
}
