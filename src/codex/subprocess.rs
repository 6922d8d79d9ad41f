//! Codex CLI spawning.

use std::env;
use std::process::Stdio;
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::CodexError;

/// Default timeout for Codex subprocess execution (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable to override the default timeout.
const TIMEOUT_ENV_VAR: &str = "GIT_GENIE_CODEX_TIMEOUT";

/// Get the configured timeout duration.
///
/// Reads from GIT_GENIE_CODEX_TIMEOUT if set, otherwise uses the default of
/// 300 seconds. An unparseable value logs a warning and falls back to the
/// default.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// Check if Codex CLI is installed and accessible.
pub async fn check_codex_installed() -> Result<(), CodexError> {
    if which::which("codex").is_err() {
        return Err(CodexError::NotInstalled);
    }

    let version_check = Command::new("codex")
        .arg("--version")
        .output()
        .await
        .map_err(CodexError::SpawnFailed)?;

    if !version_check.status.success() {
        return Err(CodexError::NotInstalled);
    }

    Ok(())
}

/// Run `codex exec` with a prompt and return the agent's final message.
///
/// Codex streams its progress on stdout, so the final message is captured
/// through `--output-last-message` into a temp file. If that file stays
/// empty, stdout is used instead.
///
/// The sandbox is read-only: the model only has to answer, never touch the
/// working tree.
pub async fn run_codex(prompt: &str) -> Result<String, CodexError> {
    let timeout_duration = get_timeout();
    let timeout_secs = timeout_duration.as_secs();

    let last_message = NamedTempFile::new().map_err(CodexError::SpawnFailed)?;

    let mut cmd = Command::new("codex");
    cmd.arg("exec")
        .arg("--sandbox")
        .arg("read-only")
        .arg("--output-last-message")
        .arg(last_message.path())
        .arg(prompt)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = timeout(timeout_duration, cmd.output())
        .await
        .map_err(|_| CodexError::Timeout(timeout_secs))?
        .map_err(CodexError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(CodexError::NonZeroExit { code, stderr });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let final_message = tokio::fs::read_to_string(last_message.path())
        .await
        .unwrap_or_default();

    select_answer(&final_message, &stdout)
}

/// Prefer the captured final message, falling back to stdout.
fn select_answer(final_message: &str, stdout: &str) -> Result<String, CodexError> {
    if !final_message.trim().is_empty() {
        return Ok(final_message.to_string());
    }
    if !stdout.trim().is_empty() {
        debug!("Codex wrote no final message file, using stdout");
        return Ok(stdout.to_string());
    }
    Err(CodexError::EmptyResponse)
}
