use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvocationError {
    #[error("no invoker bound to target '{0}'")]
    Unbound(String),
    #[error("empty program for target '{0}'")]
    EmptyProgram(String),
    #[error("failed to start '{program}': {message}")]
    Spawn { program: String, message: String },
    #[error("'{program}' exited with {}", code.map_or_else(|| "signal".to_string(), |c| format!("code {c}")))]
    ExitStatus { program: String, code: Option<i32> },
    #[error("{0}")]
    Failed(String),
}

/// Callable bound to an invocation target at startup.
pub type Invoker = Box<dyn Fn() -> Result<(), InvocationError>>;

/// Builds an invoker that runs `program args..` and waits for it.
pub fn process_invoker(target: &str, program: &str, args: Vec<String>) -> Invoker {
    let target = target.to_string();
    let program = program.trim().to_string();
    Box::new(move || run_process(&target, &program, &args))
}

/// Invoker that only records the dispatch in the log.
pub fn logging_invoker(target: &str) -> Invoker {
    let target = target.to_string();
    Box::new(move || {
        log::info!("command dispatched: {target}");
        Ok(())
    })
}

pub fn run_process(target: &str, program: &str, args: &[String]) -> Result<(), InvocationError> {
    if program.is_empty() {
        return Err(InvocationError::EmptyProgram(target.to_string()));
    }

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| InvocationError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    if !status.success() {
        return Err(InvocationError::ExitStatus {
            program: program.to_string(),
            code: status.code(),
        });
    }

    Ok(())
}
