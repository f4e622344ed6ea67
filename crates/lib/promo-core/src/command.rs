//! Subprocess helpers shared by the launch and media tools.

use std::process::Stdio;

use tokio::process::Command;

use crate::error::ToolError;

/// Captured result of a finished subprocess.
#[derive(Debug)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs a command to completion and captures its output.
///
/// # Errors
/// Returns `ToolError` if the process cannot be started.
pub async fn run_command(program: &str, args: &[&str]) -> Result<CommandOutput, ToolError> {
    tracing::debug!(program, ?args, "running command");
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|err| ToolError::system(format!("failed to run {program}: {err}")))?;

    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Starts a command detached from the server, with all stdio closed.
///
/// The child keeps running after the handle is dropped; the runtime
/// reaps it in the background when it eventually exits. Suitable for
/// launching long-lived applications.
///
/// # Errors
/// Returns `ToolError` if the process cannot be started.
pub fn spawn_detached(program: &str, args: &[&str]) -> Result<(), ToolError> {
    tracing::debug!(program, ?args, "spawning detached command");
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| ToolError::system(format!("failed to start {program}: {err}")))?;
    drop(child);
    Ok(())
}
