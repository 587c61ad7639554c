//! External transcode and playback tool invocation

use tokio::process::Command;

use crate::core::config::ToolsConfig;
use crate::core::models::{StreamError, StreamResult};

/// A builder for constructing and running external tool invocations.
///
/// The child inherits stdio so interactive tools (ffplay) and progress
/// output (ffmpeg) reach the terminal directly. Spawn failure and
/// non-zero exit both surface as [`StreamError::Tool`].
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Run the tool and wait for it to exit.
    pub async fn run(&self) -> StreamResult<()> {
        tracing::debug!("Running {} {:?}", self.program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .map_err(|e| StreamError::Tool {
                tool: self.program.clone(),
                message: format!("failed to spawn: {e}"),
            })?;

        let status = child.wait().await.map_err(|e| StreamError::Tool {
            tool: self.program.clone(),
            message: format!("I/O error waiting for process: {e}"),
        })?;

        if !status.success() {
            return Err(StreamError::Tool {
                tool: self.program.clone(),
                message: format!("exited with status {status}"),
            });
        }

        Ok(())
    }
}

/// Record the stream to a file, delegating to ffmpeg with codec copy.
///
/// The duration bound lives in ffmpeg's own `-t` argument; the call
/// returns when the recording ends or the tool fails.
pub async fn record_stream(
    tools: &ToolsConfig,
    url: &str,
    duration_secs: u64,
    output: &str,
) -> StreamResult<()> {
    ToolCommand::new(&tools.ffmpeg_program)
        .arg("-i")
        .arg(url)
        .arg("-t")
        .arg(duration_secs.to_string())
        .arg("-c")
        .arg("copy")
        .arg(output)
        .arg("-y")
        .run()
        .await
}

/// Play the stream in an ffplay window.
pub async fn play_stream(tools: &ToolsConfig, url: &str) -> StreamResult<()> {
    ToolCommand::new(&tools.ffplay_program)
        .arg("-i")
        .arg(url)
        .arg("-window_title")
        .arg(&tools.window_title)
        .run()
        .await
}
