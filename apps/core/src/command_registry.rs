use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::action_executor::{logging_invoker, process_invoker, InvocationError, Invoker};
use crate::model::{display_name, CommandEntry};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read command manifest '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid command manifest: {0}")]
    Parse(#[from] json5::Error),
}

/// Ordered, read-only table of palette commands plus the invokers bound to their targets.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index_by_name: HashMap<String, usize>,
    invokers: HashMap<String, Invoker>,
    pub load_warnings: Vec<String>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("entries", &self.entries)
            .field("bound_targets", &self.invokers.len())
            .field("load_warnings", &self.load_warnings)
            .finish()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry` at the end of the table. Returns `false` and leaves the
    /// table untouched when the name is already taken.
    pub fn register(&mut self, entry: CommandEntry) -> bool {
        if self.index_by_name.contains_key(&entry.name) {
            return false;
        }
        self.index_by_name
            .insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    pub fn bind(&mut self, target: &str, invoker: Invoker) {
        self.invokers.insert(target.to_string(), invoker);
    }

    pub fn with_command(mut self, entry: CommandEntry, invoker: Invoker) -> Self {
        let target = entry.invocation_target.clone();
        if self.register(entry) {
            self.bind(&target, invoker);
        }
        self
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact, case-sensitive lookup by canonical name.
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.index_by_name.get(name).map(|&index| &self.entries[index])
    }

    /// Lookup for a stored history name: the name itself first, then its
    /// capitalized display form.
    pub fn resolve_history_name(&self, name: &str) -> Option<&CommandEntry> {
        self.get(name).or_else(|| self.get(&display_name(name)))
    }

    pub fn invoke(&self, entry: &CommandEntry) -> Result<(), InvocationError> {
        let invoker = self
            .invokers
            .get(&entry.invocation_target)
            .ok_or_else(|| InvocationError::Unbound(entry.invocation_target.clone()))?;
        invoker()
    }

    pub fn load_manifest(path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_manifest_str(&raw)?;
        log::info!(
            "loaded {} commands from {}",
            registry.len(),
            path.display()
        );
        for warning in &registry.load_warnings {
            log::warn!("{warning}");
        }
        Ok(registry)
    }

    pub fn from_manifest_str(raw: &str) -> Result<Self, RegistryError> {
        let manifest: CommandManifest = json5::from_str(raw)?;
        let mut registry = Self::new();
        for command in manifest.commands {
            append_manifest_command(&mut registry, command);
        }
        Ok(registry)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CommandManifest {
    commands: Vec<ManifestCommand>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ManifestCommand {
    name: String,
    icon: String,
    command: String,
    run: Option<ManifestRun>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ManifestRun {
    program: String,
    args: Vec<String>,
}

fn append_manifest_command(registry: &mut CommandRegistry, command: ManifestCommand) {
    let name = command.name.trim();
    let target = command.command.trim();
    if name.is_empty() || target.is_empty() {
        registry.load_warnings.push(format!(
            "skipping command with empty name or target (name='{name}', command='{target}')"
        ));
        return;
    }

    if !registry.register(CommandEntry::new(name, &command.icon, target)) {
        registry
            .load_warnings
            .push(format!("duplicate command name '{name}' ignored"));
        return;
    }

    // Several names may share a target; the first binding wins.
    if registry.invokers.contains_key(target) {
        return;
    }
    let invoker = match command.run {
        Some(run) => process_invoker(target, &run.program, run.args),
        None => logging_invoker(target),
    };
    registry.bind(target, invoker);
}
