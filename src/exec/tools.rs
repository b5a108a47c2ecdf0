// src/exec/tools.rs

use std::path::Path;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{Result, UibuildError};
use crate::pipeline::StepId;

/// Run an external tool command for a step, from the given working directory.
///
/// The command string goes through the platform shell, mirroring how the
/// original pipeline invoked its plugins. Stdout and stderr are streamed into
/// the log; a non-zero exit becomes [`UibuildError::ToolFailed`].
pub async fn run_tool(step: StepId, cmd_str: &str, cwd: &Path) -> Result<()> {
    info!(step = %step, cmd = %cmd_str, "running tool command");

    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_str);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_str);
        c
    };

    cmd.current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning tool process for step '{step}'"))?;

    // Consume both pipes so OS buffers never fill; log at debug.
    if let Some(stdout) = child.stdout.take() {
        let step_name = step.as_str();
        tokio::spawn(async move {
            let reader = BufReader::new(stdout);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(step = %step_name, "stdout: {}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        let step_name = step.as_str();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(step = %step_name, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for tool process of step '{step}'"))?;

    let code = status.code().unwrap_or(-1);
    info!(
        step = %step,
        exit_code = code,
        success = status.success(),
        "tool process exited"
    );

    if status.success() {
        Ok(())
    } else {
        Err(UibuildError::ToolFailed {
            step: step.as_str().to_string(),
            code,
        })
    }
}

/// Substitute `{placeholder}` markers in a tool command template.
pub fn fill_template(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in substitutions {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}
