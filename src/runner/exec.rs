use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::utils::truncation::head_tail;
use super::{ExecutionRecord, FailureReason, ToolOutcome};

const STDERR_CEILING: usize = 4096;
/// Grace period between SIGTERM and SIGKILL on timeout (spec §5 Cancellation).
const KILL_GRACE: Duration = Duration::from_secs(3);

/// Splits a command string into argv tokens, honoring single/double quotes
/// (spec §6: "tools are invoked via OS-native process spawn with argv
/// arrays (no shell interpolation)"). No shell is ever invoked.
pub fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = command.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => quote = Some(c),
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            },
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Executes one resolved command once, racing the ledger timeout and the
/// scan's cancellation token (spec §4.5 steps 5/6). Terminates with SIGTERM
/// then SIGKILL after a grace period on timeout expiry.
pub async fn run_once(tool_name: &str, command: &str, timeout_secs: u64, cancel_token: &CancellationToken) -> ExecutionRecord {
    let argv = tokenize(command);
    let Some((program, args)) = argv.split_first() else {
        return blocked_argument_error(tool_name, command);
    };

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    let started = Instant::now();
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return execution_error(tool_name, command, started, &e.to_string()),
    };

    let timeout = Duration::from_secs(timeout_secs.max(1));

    tokio::select! {
        _ = cancel_token.cancelled() => {
            terminate(&mut child).await;
            partial_record(tool_name, command, started, ToolOutcome::ExecutionError, Some(FailureReason::UnknownError))
        }
        result = tokio::time::timeout(timeout, child.wait_with_output()) => {
            match result {
                Ok(Ok(output)) => {
                    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                    let stderr_full = String::from_utf8_lossy(&output.stderr).to_string();
                    let rc = output.status.code();
                    let (outcome, reason) = super::classify::classify(tool_name, rc, &stdout, &stderr_full);
                    build_record(tool_name, command, started, &stdout, &stderr_full, outcome, reason)
                }
                Ok(Err(e)) => execution_error(tool_name, command, started, &e.to_string()),
                Err(_) => {
                    warn!(tool = tool_name, timeout_secs, "tool exceeded its ledger timeout");
                    partial_record(tool_name, command, started, ToolOutcome::Timeout, Some(FailureReason::Timeout))
                }
            }
        }
    }
}

async fn terminate(child: &mut tokio::process::Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        unsafe {
            libc::kill(pid as i32, libc::SIGTERM);
        }
        tokio::time::sleep(KILL_GRACE).await;
    }
    let _ = child.start_kill();
    let _ = child.wait().await;
}

fn build_record(
    tool_name: &str,
    command: &str,
    started: Instant,
    stdout: &str,
    stderr: &str,
    outcome: ToolOutcome,
    failure_reason: Option<FailureReason>,
) -> ExecutionRecord {
    let (stdout_head, stdout_tail) = head_tail(stdout);
    let stderr_truncated_bytes = stderr.len().saturating_sub(STDERR_CEILING);
    let stderr_head: String = stderr.chars().take(STDERR_CEILING).collect();

    ExecutionRecord {
        tool_name: tool_name.to_string(),
        outcome,
        failure_reason,
        command: command.to_string(),
        duration_ms: started.elapsed().as_millis() as u64,
        stdout_head,
        stdout_tail,
        stderr_head,
        stderr_truncated_bytes,
        retried: false,
    }
}

fn partial_record(tool_name: &str, command: &str, started: Instant, outcome: ToolOutcome, reason: Option<FailureReason>) -> ExecutionRecord {
    build_record(tool_name, command, started, "", "", outcome, reason)
}

fn execution_error(tool_name: &str, command: &str, started: Instant, message: &str) -> ExecutionRecord {
    build_record(tool_name, command, started, "", message, ToolOutcome::ExecutionError, Some(FailureReason::UnknownError))
}

fn blocked_argument_error(tool_name: &str, command: &str) -> ExecutionRecord {
    ExecutionRecord {
        tool_name: tool_name.to_string(),
        outcome: ToolOutcome::ExecutionError,
        failure_reason: Some(FailureReason::ArgumentError),
        command: command.to_string(),
        duration_ms: 0,
        stdout_head: String::new(),
        stdout_tail: String::new(),
        stderr_head: "empty command".to_string(),
        stderr_truncated_bytes: 0,
        retried: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_whitespace() {
        assert_eq!(tokenize("nmap -sV example.com"), vec!["nmap", "-sV", "example.com"]);
    }

    #[test]
    fn tokenize_honors_single_quotes() {
        let tokens = tokenize("sqlmap --cookie='session=abc def'");
        assert_eq!(tokens, vec!["sqlmap", "--cookie=session=abc def"]);
    }

    #[tokio::test]
    async fn run_once_captures_stdout() {
        let cancel = CancellationToken::new();
        let record = run_once("echo-test", "echo hello", 5, &cancel).await;
        assert_eq!(record.outcome, ToolOutcome::SuccessWithFindings);
        assert!(record.stdout_head.contains("hello"));
    }

    #[tokio::test]
    async fn run_once_flags_missing_binary() {
        let cancel = CancellationToken::new();
        let record = run_once("nosuch", "definitely-not-a-real-binary-xyz --flag", 5, &cancel).await;
        assert_eq!(record.outcome, ToolOutcome::ExecutionError);
    }

    #[tokio::test]
    async fn run_once_times_out() {
        let cancel = CancellationToken::new();
        let record = run_once("sleeper", "sleep 5", 1, &cancel).await;
        assert_eq!(record.outcome, ToolOutcome::Timeout);
    }
}
