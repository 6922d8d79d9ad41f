//! Integration tests for Claude error recovery.
//!
//! A test executor runs small shell scripts in place of the Claude CLI so
//! the retry loop and envelope handling are exercised with real
//! subprocesses. The unit tests in `src/claude/retry.rs` cover the same
//! paths with mockall.
#![cfg(unix)]

use std::fs::{self, File};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::time::timeout;

use git_genie::ClaudeError;
use git_genie::claude::{ClaudeExecutor, generate_with_executor};

/// Runs a script with the same arguments the real CLI gets.
struct ScriptExecutor {
    script_path: PathBuf,
    call_count: Arc<AtomicU32>,
    timeout_secs: u64,
}

impl ScriptExecutor {
    fn new(script_path: PathBuf, timeout_secs: u64) -> Self {
        Self {
            script_path,
            call_count: Arc::new(AtomicU32::new(0)),
            timeout_secs,
        }
    }

    fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClaudeExecutor for ScriptExecutor {
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            Command::new(&self.script_path)
                .arg("-p")
                .arg(prompt)
                .arg("--output-format")
                .arg("json")
                .env("CALL_COUNT", call.to_string())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Err(_) => Err(ClaudeError::Timeout(self.timeout_secs)),
            Ok(Err(e)) => Err(ClaudeError::SpawnFailed(e)),
            Ok(Ok(output)) if !output.status.success() => Err(ClaudeError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }),
            Ok(Ok(output)) => Ok(String::from_utf8_lossy(&output.stdout).to_string()),
        }
    }
}

fn create_mock_script(script_content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let script_path = temp_dir.path().join("mock_claude.sh");

    let mut file = File::create(&script_path).expect("Failed to create mock script");
    file.write_all(script_content.as_bytes())
        .expect("Failed to write mock script");
    drop(file);

    let mut perms = fs::metadata(&script_path)
        .expect("Failed to get metadata")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script_path, perms).expect("Failed to set permissions");

    (temp_dir, script_path)
}

const MOCK_SUCCESS: &str = r#"#!/bin/sh
echo '{"type":"result","subtype":"success","is_error":false,"result":"git branch -a"}'
"#;

#[tokio::test]
async fn test_success_on_first_attempt() {
    let (_temp_dir, script_path) = create_mock_script(MOCK_SUCCESS);
    let executor = ScriptExecutor::new(script_path, 30);

    let result = generate_with_executor("list all branches", &executor).await;

    assert_eq!(result.unwrap(), "git branch -a");
    assert_eq!(executor.call_count(), 1);
}

/// Error envelope first, then a good answer.
const MOCK_ERROR_THEN_VALID: &str = r#"#!/bin/sh
if [ "$CALL_COUNT" -eq 1 ]; then
    echo '{"type":"result","is_error":true,"result":"Overloaded"}'
else
    echo '{"type":"result","is_error":false,"result":"git stash"}'
fi
"#;

#[tokio::test]
async fn test_error_envelope_triggers_retry() {
    let (_temp_dir, script_path) = create_mock_script(MOCK_ERROR_THEN_VALID);
    let executor = ScriptExecutor::new(script_path, 30);

    let result = generate_with_executor("stash my changes", &executor).await;

    assert_eq!(result.unwrap(), "git stash");
    assert_eq!(executor.call_count(), 2);
}

const MOCK_ALWAYS_FAIL: &str = r#"#!/bin/sh
echo "API rate limit exceeded - try again later" >&2
exit 1
"#;

#[tokio::test]
async fn test_retries_exhausted_includes_last_error() {
    let (_temp_dir, script_path) = create_mock_script(MOCK_ALWAYS_FAIL);
    let executor = ScriptExecutor::new(script_path, 30);

    let result = generate_with_executor("test prompt", &executor).await;

    assert_eq!(executor.call_count(), 3, "Should have exactly 3 attempts");

    match result {
        Err(ClaudeError::RetriesExhausted(inner)) => match *inner {
            ClaudeError::NonZeroExit { code, ref stderr } => {
                assert_eq!(code, 1);
                assert!(
                    stderr.contains("rate limit"),
                    "Stderr should contain the CLI's message. Got: {}",
                    stderr
                );
            }
            other => panic!("Expected NonZeroExit, got: {:?}", other),
        },
        other => panic!("Expected RetriesExhausted, got: {:?}", other),
    }
}

const MOCK_TIMEOUT: &str = r#"#!/bin/sh
sleep 3600
"#;

#[tokio::test]
async fn test_timeout_produces_clear_error() {
    let (_temp_dir, script_path) = create_mock_script(MOCK_TIMEOUT);
    let executor = ScriptExecutor::new(script_path, 1);

    let start = Instant::now();
    let result = generate_with_executor("test prompt", &executor).await;

    assert!(
        start.elapsed().as_secs() < 30,
        "Should time out reasonably quickly, took {:?}",
        start.elapsed()
    );

    match result {
        Err(ClaudeError::RetriesExhausted(inner)) => {
            assert!(
                matches!(*inner, ClaudeError::Timeout(1)),
                "Inner error should be Timeout, got: {:?}",
                inner
            );
        }
        other => panic!("Expected RetriesExhausted(Timeout), got: {:?}", other),
    }
}

/// Old CLI versions print the bare answer.
const MOCK_PLAIN_TEXT: &str = r#"#!/bin/sh
echo 'git log --oneline -n 5'
"#;

#[tokio::test]
async fn test_plain_text_output_is_accepted() {
    let (_temp_dir, script_path) = create_mock_script(MOCK_PLAIN_TEXT);
    let executor = ScriptExecutor::new(script_path, 30);

    let result = generate_with_executor("show last 5 commits", &executor).await;

    assert_eq!(result.unwrap(), "git log --oneline -n 5\n");
}

/// Succeeds but prints nothing.
const MOCK_EMPTY: &str = r#"#!/bin/sh
exit 0
"#;

#[tokio::test]
async fn test_empty_output_is_retried_then_reported() {
    let (_temp_dir, script_path) = create_mock_script(MOCK_EMPTY);
    let executor = ScriptExecutor::new(script_path, 30);

    let result = generate_with_executor("test prompt", &executor).await;

    assert_eq!(executor.call_count(), 3);
    match result {
        Err(ClaudeError::RetriesExhausted(inner)) => {
            assert!(
                matches!(*inner, ClaudeError::EmptyResponse),
                "Inner error should be EmptyResponse, got: {:?}",
                inner
            );
        }
        other => panic!("Expected RetriesExhausted(EmptyResponse), got: {:?}", other),
    }
}
