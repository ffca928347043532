use std::{fmt, path::Path, process::ExitStatus};

use tokio::{
    io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    process::Command,
};
use tracing::{debug, warn};

use crate::{configs::EditorConfig, format::FormatError};

#[derive(Debug)]
pub enum EditorError {
    Launch {
        program: String,
        source: std::io::Error,
    },
    ExitStatus {
        program: String,
        status: ExitStatus,
    },
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launch { program, source } => {
                write!(f, "failed to launch editor '{}': {}", program, source)
            }
            Self::ExitStatus { program, status } => {
                write!(f, "editor '{}' exited with {}", program, status)
            }
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Launch { source, .. } => Some(source),
            Self::ExitStatus { .. } => None,
        }
    }
}

/// Hands a file to the user and returns once they are done with it.
#[async_trait::async_trait]
pub trait InteractiveEditor: Send + Sync {
    async fn open(&self, path: &Path) -> Result<(), EditorError>;
}

/// Runs the configured editor in the foreground with the terminal's stdio.
#[derive(Debug, Clone)]
pub struct SystemEditor {
    config: EditorConfig,
}

impl SystemEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl InteractiveEditor for SystemEditor {
    async fn open(&self, path: &Path) -> Result<(), EditorError> {
        let program = &self.config.program;
        debug!(editor = program.as_str(), path = %path.display(), "Launching editor");

        let status = Command::new(program)
            .args(&self.config.args)
            .arg(path)
            .status()
            .await
            .map_err(|source| EditorError::Launch {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(EditorError::ExitStatus {
                program: program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Decides whether to reopen the editor after staged content failed validation.
#[async_trait::async_trait]
pub trait RetryPrompt: Send + Sync {
    /// `false` cancels the workflow.
    async fn retry(&self, error: &FormatError) -> bool;
}

/// Waits for Enter on stdin. Ctrl-C or end of input cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

#[async_trait::async_trait]
impl RetryPrompt for TerminalPrompt {
    async fn retry(&self, error: &FormatError) -> bool {
        write_prompt(&mut tokio::io::stderr(), error).await;

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut line = String::new();
        tokio::select! {
            read = reader.read_line(&mut line) => match read {
                Ok(0) => false,
                Ok(_) => true,
                Err(e) => {
                    warn!("Failed to read from stdin: {}", e);
                    false
                }
            },
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                }
                false
            }
        }
    }
}

async fn write_prompt<W: AsyncWrite + Unpin>(out: &mut W, error: &FormatError) {
    let message = format!(
        "Error validating content: {}\nPress Enter to edit again, or Ctrl-C to abort: ",
        error
    );
    if let Err(e) = out.write_all(message.as_bytes()).await {
        warn!("Failed to write retry prompt: {}", e);
    }
    if let Err(e) = out.flush().await {
        warn!("Failed to flush retry prompt: {}", e);
    }
}
