//! Detection and lifecycle control of the Promo Studio Companion app.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::command::{run_command, spawn_detached};
use crate::error::ToolError;
use crate::workspace::CAPTURE_DIR;

pub const COMPANION_APP_NAME: &str = "Promo Studio Companion";
pub const COMPANION_APP_PATH: &str = "/Applications/Promo Studio Companion.app";
pub const COMPANION_APP_BINARY: &str =
    "/Applications/Promo Studio Companion.app/Contents/MacOS/Promo Studio Companion";

/// Observed state of the companion app relative to a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanionStatus {
    NotRunning,
    RunningSameProject { project_path: String },
    RunningDifferentProject { project_path: String },
    RunningUnknownProject,
}

/// Checks whether the companion app runs and which project it captures.
///
/// The project is read from the app's window title, which carries the
/// capture directory path. Window inspection needs accessibility
/// permissions, so a running app without readable windows reports
/// `RunningUnknownProject`.
///
/// # Errors
/// Returns `ToolError` if the probing commands cannot be started.
pub async fn companion_status(workspace: &Path) -> Result<CompanionStatus, ToolError> {
    let processes = run_command("pgrep", &["-l", COMPANION_APP_NAME]).await?;
    if !processes.success || processes.stdout.trim().is_empty() {
        return Ok(CompanionStatus::NotRunning);
    }

    let script = format!(
        "tell application \"System Events\" to get name of every window of application process \
         \"{COMPANION_APP_NAME}\""
    );
    let windows = run_command("osascript", &["-e", &script]).await?;
    if !windows.success {
        return Ok(CompanionStatus::RunningUnknownProject);
    }

    let Some(project_path) = project_from_window_titles(&windows.stdout) else {
        return Ok(CompanionStatus::RunningUnknownProject);
    };

    if normalized_project(&project_path) == workspace {
        Ok(CompanionStatus::RunningSameProject { project_path })
    } else {
        Ok(CompanionStatus::RunningDifferentProject { project_path })
    }
}

/// Starts the companion app pointed at the given workspace.
///
/// # Errors
/// Returns `ToolError` if the app is not installed or fails to start.
pub fn launch_companion(workspace: &Path) -> Result<(), ToolError> {
    if !companion_binary_available() {
        return Err(ToolError::dependency(
            format!("{COMPANION_APP_NAME} is not installed at {COMPANION_APP_PATH}"),
            Some(
                "Download the app from https://promo.studio/download and move it into \
                 /Applications."
                    .to_string(),
            ),
        ));
    }

    let workspace = workspace
        .to_str()
        .ok_or_else(|| ToolError::validation("workspace path is not valid UTF-8"))?;
    spawn_detached(COMPANION_APP_BINARY, &["-p", workspace])
}

/// Stops the companion app, escalating from a polite quit to a kill.
///
/// Returns a transcript of the steps taken for the tool response.
///
/// # Errors
/// Returns `ToolError` if the shutdown commands cannot be started.
pub async fn stop_companion() -> Result<Vec<String>, ToolError> {
    let mut transcript = Vec::new();

    let check = run_command("pgrep", &["-l", COMPANION_APP_NAME]).await?;
    if !check.success || check.stdout.trim().is_empty() {
        transcript.push(format!("{COMPANION_APP_NAME} is not running."));
        return Ok(transcript);
    }

    transcript.push("Sending termination signal.".to_string());
    run_command("pkill", &["-f", COMPANION_APP_NAME]).await?;
    tokio::time::sleep(Duration::from_millis(500)).await;

    transcript.push("Asking the app to quit.".to_string());
    let script = format!("tell application \"{COMPANION_APP_NAME}\" to quit");
    run_command("osascript", &["-e", &script]).await?;
    tokio::time::sleep(Duration::from_millis(500)).await;

    transcript.push("Force killing any leftover processes.".to_string());
    run_command("pkill", &["-9", "-f", COMPANION_APP_PATH]).await?;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let verdict = run_command("pgrep", &["-l", COMPANION_APP_NAME]).await?;
    if !verdict.success || verdict.stdout.trim().is_empty() {
        transcript.push(format!("{COMPANION_APP_NAME} stopped."));
    } else {
        transcript.push(format!(
            "{COMPANION_APP_NAME} may still be running:\n{}",
            verdict.stdout.trim()
        ));
    }

    Ok(transcript)
}

/// Whether the companion binary exists and is executable.
#[must_use]
pub fn companion_binary_available() -> bool {
    let Ok(metadata) = std::fs::metadata(COMPANION_APP_BINARY) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

// Window titles look like `Promo Studio Companion (/path/to/project)`.
fn project_from_window_titles(raw: &str) -> Option<String> {
    let prefix = format!("{COMPANION_APP_NAME} (");
    raw.trim().split(", ").find_map(|title| {
        title
            .trim()
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_suffix(')'))
            .map(str::to_string)
    })
}

// The title may point at the capture directory inside the project.
fn normalized_project(path: &str) -> PathBuf {
    let path = Path::new(path.trim());
    if path.file_name().is_some_and(|name| name == CAPTURE_DIR) {
        path.parent()
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf)
    } else {
        path.to_path_buf()
    }
}
