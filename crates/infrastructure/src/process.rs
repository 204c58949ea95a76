//! External command execution for table readers and scanners.

use macresolve_domain::DomainError;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout and stderr together, for error messages.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Runs `program` with `args` and waits for it to exit.
///
/// The child is killed if `cancel` fires first, and `Canceled` is returned. A program that
/// cannot be spawned is reported through `on_spawn_error`, so table readers and scanners
/// each surface their own error kind. A non-zero exit is not an error here.
pub async fn run<S: AsRef<str>>(
    program: &str,
    args: &[S],
    cancel: &CancellationToken,
    on_spawn_error: fn(String) -> DomainError,
) -> Result<CommandOutput, DomainError> {
    if cancel.is_cancelled() {
        return Err(DomainError::Canceled);
    }

    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    debug!(program, args = ?args, "Executing command");

    let child = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| on_spawn_error(format!("failed to run {}: {}", program, e)))?;

    let output = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(program, "Command canceled, child killed");
            return Err(DomainError::Canceled);
        }
        output = child.wait_with_output() => output
            .map_err(|e| on_spawn_error(format!("failed to wait for {}: {}", program, e)))?,
    };

    let result = CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };

    trace!(program, exit_code = result.exit_code, "Command finished");
    Ok(result)
}
