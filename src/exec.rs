//! Running generated commands through the system shell.
//!
//! The command string is handed to `sh -c` (`cmd /C` on Windows) exactly as
//! generated. Nothing is validated or sandboxed.

use std::io::Write;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExecError;

/// Captured result of a shell command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Write stdout, then stderr, each verbatim.
    pub fn relay(&self, out: &mut impl Write) -> Result<(), ExecError> {
        if !self.stdout.is_empty() {
            out.write_all(self.stdout.as_bytes())
                .map_err(ExecError::Relay)?;
        }
        if !self.stderr.is_empty() {
            out.write_all(self.stderr.as_bytes())
                .map_err(ExecError::Relay)?;
        }
        out.flush().map_err(ExecError::Relay)
    }
}

#[async_trait]
pub trait ShellRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<ExecOutput, ExecError>;
}

/// Runs commands with the platform shell in the current directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

#[async_trait]
impl ShellRunner for SystemShell {
    async fn run(&self, command: &str) -> Result<ExecOutput, ExecError> {
        debug!("Running shell command: {}", command);

        let output = shell_command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ExecError::SpawnFailed {
                command: command.to_string(),
                source,
            })?;

        let result = ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        };
        debug!("Shell command exited with {:?}", result.code);
        Ok(result)
    }
}
