//! Companion app lifecycle and local dependency install tools.

use promo_core::command::run_command;
use promo_core::companion::{
    CompanionStatus, companion_status, launch_companion, stop_companion,
};
use promo_core::error::ToolError;
use promo_core::gate::ToolGroup;
use promo_core::workspace::{capture_root, workspace_root};
use rmcp::model::{CallToolResult, Content};

use super::EmptyParams;
use crate::catalog::ToolDescriptor;
use crate::helpers;

const GROUPS: &[ToolGroup] = &[ToolGroup::Launch];

const HOMEBREW_INSTALL: &str =
    "curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh | bash";

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        check_status_tool(),
        launch_tool(),
        stop_tool(),
        install_tool(),
    ]
}

fn check_status_tool() -> ToolDescriptor {
    ToolDescriptor::new::<EmptyParams, _, _>(
        "check_companion_app_status",
        "Checks whether the companion app is currently running and which project directory \
         it is bound to. Use this tool before launching or stopping the companion app. DO NOT \
         STOP THE APP IF IT IS RUNNING WITH A DIFFERENT PROJECT DIRECTORY.",
        GROUPS,
        |_context, _params: EmptyParams| async move {
            let workspace = workspace_root()?;
            let status = companion_status(&workspace).await?;
            Ok(helpers::text(status_report(&status, &workspace.display().to_string())))
        },
    )
}

fn status_report(status: &CompanionStatus, workspace: &str) -> String {
    match status {
        CompanionStatus::NotRunning => "Companion app status: NOT RUNNING\n\nNo companion app \
            processes found. The app can be safely launched."
            .to_string(),
        CompanionStatus::RunningSameProject { project_path } => format!(
            "Companion app status: RUNNING WITH SAME PROJECT\n\n\
             Current project directory: {workspace}\n\
             Running project directory: {project_path}\n\n\
             The app is already active with this project directory. Use stop_companion_app \
             before launching a new instance."
        ),
        CompanionStatus::RunningDifferentProject { project_path } => format!(
            "Companion app status: RUNNING WITH DIFFERENT PROJECT\n\n\
             Current project directory: {workspace}\n\
             Running project directory: {project_path}\n\n\
             DO NOT STOP this instance; it belongs to another project."
        ),
        CompanionStatus::RunningUnknownProject => "Companion app status: RUNNING\n\nThe app is \
            active but its project directory could not be determined. Use stop_companion_app \
            before launching a new instance."
            .to_string(),
    }
}

fn launch_tool() -> ToolDescriptor {
    ToolDescriptor::new::<EmptyParams, _, _>(
        "launch_companion_app",
        "Launches the companion app bound to the current project directory so it can capture \
         screenshots and screencasts. Check the app status first with \
         check_companion_app_status.",
        GROUPS,
        |_context, _params: EmptyParams| async move {
            let workspace = workspace_root()?;
            launch_companion(&workspace)?;
            let captures = capture_root(&workspace);
            Ok(CallToolResult::success(vec![
                Content::text(format!(
                    "Companion app launched with project directory: {}",
                    workspace.display()
                )),
                Content::text(format!(
                    "The companion app will:\n\
                     1. Let the user start and stop screenshot capture\n\
                     2. Let the user start and stop screencast recording\n\
                     3. Save everything it captures under {}\n\n\
                     The user may ask to stop the companion app at any time.",
                    captures.display()
                )),
            ]))
        },
    )
}

fn stop_tool() -> ToolDescriptor {
    ToolDescriptor::new::<EmptyParams, _, _>(
        "stop_companion_app",
        "Stops every running companion app instance. Check the app status first with \
         check_companion_app_status and DO NOT stop an instance that belongs to a different \
         project directory.",
        GROUPS,
        |_context, _params: EmptyParams| async move {
            let transcript = stop_companion().await?;
            Ok(helpers::text(transcript.join("\n")))
        },
    )
}

fn install_tool() -> ToolDescriptor {
    ToolDescriptor::new::<EmptyParams, _, _>(
        "install_brew_and_ffmpeg",
        "Installs the Homebrew package manager and then FFmpeg. Use this when screencast \
         tools report that ffmpeg is missing. Requires macOS with network access; the \
         Homebrew step may take several minutes.",
        GROUPS,
        |_context, _params: EmptyParams| async move {
            tracing::info!("installing Homebrew");
            let brew = run_command("/bin/bash", &["-c", HOMEBREW_INSTALL]).await?;
            if !brew.success {
                return Err(ToolError::dependency(
                    "Homebrew installation failed",
                    Some(brew.stderr),
                ));
            }

            tracing::info!("installing ffmpeg");
            let ffmpeg = run_command("brew", &["install", "ffmpeg"]).await?;
            if !ffmpeg.success {
                return Err(ToolError::dependency(
                    "FFmpeg installation failed. Homebrew was installed successfully.",
                    Some(ffmpeg.stderr),
                ));
            }

            Ok(CallToolResult::success(vec![
                Content::text("Successfully installed Homebrew and FFmpeg."),
                Content::text(
                    "Installation completed:\n\
                     1. Homebrew package manager installed\n\
                     2. FFmpeg media toolkit installed\n\n\
                     The system is ready for screencast processing.",
                ),
            ]))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_launch_tools_register() {
        let tools = tools();
        let names: Vec<&str> = tools.iter().map(crate::catalog::ToolDescriptor::name).collect();
        assert_eq!(
            names,
            [
                "check_companion_app_status",
                "launch_companion_app",
                "stop_companion_app",
                "install_brew_and_ffmpeg",
            ]
        );
        for tool in &tools {
            assert_eq!(tool.groups(), GROUPS);
        }
    }

    #[test]
    fn status_reports_name_the_project_directories() {
        let same = status_report(
            &CompanionStatus::RunningSameProject {
                project_path: "/tmp/demo".to_string(),
            },
            "/tmp/demo",
        );
        assert!(same.contains("RUNNING WITH SAME PROJECT"));
        assert!(same.contains("/tmp/demo"));

        let different = status_report(
            &CompanionStatus::RunningDifferentProject {
                project_path: "/tmp/other".to_string(),
            },
            "/tmp/demo",
        );
        assert!(different.contains("DO NOT STOP"));
        assert!(different.contains("/tmp/other"));

        assert!(status_report(&CompanionStatus::NotRunning, "/tmp/demo")
            .contains("NOT RUNNING"));
    }
}
