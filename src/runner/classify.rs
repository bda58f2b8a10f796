use super::{FailureReason, ToolOutcome};

/// Phrases a tool prints to explicitly report a clean result, distinguished
/// from silence (spec §4.5 generic rule: "rc=0 with explicit negative
/// signal... cannot raise confidence of later tools" the same as silence,
/// but is still reported as `SuccessNoFindings` rather than
/// `ExecutedNoSignal` since the tool did produce output).
const NEGATIVE_MARKERS: &[&str] = &[
    "no issues",
    "0 findings",
    "nothing found",
    "no vulnerabilities",
    "no hosts up",
    "0 open ports",
];

fn has_negative_marker(stdout: &str) -> bool {
    let lower = stdout.to_lowercase();
    NEGATIVE_MARKERS.iter().any(|m| lower.contains(m))
}

/// Classifies a completed subprocess run per the per-tool rules in spec
/// §4.5. `rc` is `None` when the process was killed by signal without a
/// conventional exit code (e.g. nikto's SIGPIPE case is surfaced as
/// `rc=Some(141)` by the shell/`WEXITSTATUS` convention, not as `None`).
pub fn classify(tool_name: &str, rc: Option<i32>, stdout: &str, stderr: &str) -> (ToolOutcome, Option<FailureReason>) {
    match rc {
        Some(127) => return (ToolOutcome::Blocked, Some(FailureReason::ToolNotInstalled)),
        Some(126) => return (ToolOutcome::Blocked, Some(FailureReason::PermissionDenied)),
        _ => {}
    }

    match tool_name {
        "nikto" => classify_nikto(rc, stdout),
        "nuclei" => classify_nuclei(rc, stdout, stderr),
        "gobuster" | "dirsearch" => classify_dir_brute(rc, stdout, stderr),
        _ => classify_generic(rc, stdout),
    }
}

fn classify_generic(rc: Option<i32>, stdout: &str) -> (ToolOutcome, Option<FailureReason>) {
    match rc {
        Some(0) => {
            if stdout.trim().is_empty() {
                (ToolOutcome::ExecutedNoSignal, None)
            } else if has_negative_marker(stdout) {
                (ToolOutcome::SuccessNoFindings, None)
            } else {
                (ToolOutcome::SuccessWithFindings, None)
            }
        }
        Some(_) => (ToolOutcome::ExecutionError, Some(FailureReason::UnknownError)),
        None => (ToolOutcome::ExecutionError, Some(FailureReason::UnknownError)),
    }
}

/// `rc=141` (SIGPIPE after emitting findings) is a success, not an error;
/// classify by stdout content exactly as the generic rule would.
fn classify_nikto(rc: Option<i32>, stdout: &str) -> (ToolOutcome, Option<FailureReason>) {
    match rc {
        Some(0) | Some(141) => {
            if stdout.trim().is_empty() {
                (ToolOutcome::ExecutedNoSignal, None)
            } else if has_negative_marker(stdout) {
                (ToolOutcome::SuccessNoFindings, None)
            } else {
                (ToolOutcome::SuccessWithFindings, None)
            }
        }
        Some(_) => (ToolOutcome::ExecutionError, Some(FailureReason::UnknownError)),
        None => (ToolOutcome::ExecutionError, Some(FailureReason::UnknownError)),
    }
}

/// Nuclei signals severity via exit code: `rc=1` with stdout is a genuine
/// finding, not a failure.
fn classify_nuclei(rc: Option<i32>, stdout: &str, stderr: &str) -> (ToolOutcome, Option<FailureReason>) {
    match rc {
        Some(0) => {
            if stdout.trim().is_empty() {
                (ToolOutcome::ExecutedNoSignal, None)
            } else {
                (ToolOutcome::SuccessWithFindings, None)
            }
        }
        Some(1) => {
            if !stdout.trim().is_empty() {
                (ToolOutcome::SuccessWithFindings, None)
            } else if stderr.trim().is_empty() {
                (ToolOutcome::SuccessNoFindings, None)
            } else {
                (ToolOutcome::ExecutionError, Some(FailureReason::UnknownError))
            }
        }
        _ => (ToolOutcome::ExecutionError, Some(FailureReason::UnknownError)),
    }
}

fn classify_dir_brute(rc: Option<i32>, stdout: &str, stderr: &str) -> (ToolOutcome, Option<FailureReason>) {
    match rc {
        Some(0) => {
            if stdout.trim().is_empty() {
                (ToolOutcome::ExecutedNoSignal, None)
            } else {
                (ToolOutcome::SuccessWithFindings, None)
            }
        }
        Some(1) => {
            let stderr_lower = stderr.to_lowercase();
            if stderr_lower.contains("invalid") || stderr_lower.contains("flag") {
                (ToolOutcome::ExecutionError, Some(FailureReason::ArgumentError))
            } else if !stdout.trim().is_empty() {
                (ToolOutcome::SuccessWithFindings, None)
            } else {
                (ToolOutcome::SuccessNoFindings, None)
            }
        }
        _ => (ToolOutcome::ExecutionError, Some(FailureReason::UnknownError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nuclei_rc1_with_stdout_is_success() {
        let (outcome, _) = classify("nuclei", Some(1), "[high] CVE-2023-1 found", "");
        assert_eq!(outcome, ToolOutcome::SuccessWithFindings);
    }

    #[test]
    fn nuclei_rc1_empty_both_is_no_findings() {
        let (outcome, _) = classify("nuclei", Some(1), "", "");
        assert_eq!(outcome, ToolOutcome::SuccessNoFindings);
    }

    #[test]
    fn nuclei_rc1_with_stderr_is_execution_error() {
        let (outcome, _) = classify("nuclei", Some(1), "", "panic: invalid template");
        assert_eq!(outcome, ToolOutcome::ExecutionError);
    }

    #[test]
    fn nikto_rc141_with_findings_is_success() {
        let (outcome, _) = classify("nikto", Some(141), "+ OSVDB-3233: /icons/ found", "");
        assert_eq!(outcome, ToolOutcome::SuccessWithFindings);
    }

    #[test]
    fn gobuster_rc1_with_stdout_is_success() {
        let (outcome, _) = classify("gobuster", Some(1), "/admin (Status: 200)", "");
        assert_eq!(outcome, ToolOutcome::SuccessWithFindings);
    }

    #[test]
    fn gobuster_rc1_empty_stdout_is_no_findings() {
        let (outcome, _) = classify("gobuster", Some(1), "", "");
        assert_eq!(outcome, ToolOutcome::SuccessNoFindings);
    }

    #[test]
    fn gobuster_argument_error_detected() {
        let (outcome, reason) = classify("gobuster", Some(1), "", "Error: invalid flag -xyz");
        assert_eq!(outcome, ToolOutcome::ExecutionError);
        assert_eq!(reason, Some(FailureReason::ArgumentError));
    }

    #[test]
    fn rc_127_is_tool_not_installed() {
        let (outcome, reason) = classify("nmap", Some(127), "", "command not found");
        assert_eq!(outcome, ToolOutcome::Blocked);
        assert_eq!(reason, Some(FailureReason::ToolNotInstalled));
    }

    #[test]
    fn rc_126_is_permission_denied() {
        let (outcome, reason) = classify("nmap", Some(126), "", "permission denied");
        assert_eq!(outcome, ToolOutcome::Blocked);
        assert_eq!(reason, Some(FailureReason::PermissionDenied));
    }

    #[test]
    fn empty_stdout_is_never_success() {
        let (outcome, _) = classify("whatweb", Some(0), "", "");
        assert_eq!(outcome, ToolOutcome::ExecutedNoSignal);
        assert_ne!(outcome, ToolOutcome::SuccessNoFindings);
    }

    #[test]
    fn generic_negative_marker_is_success_no_findings() {
        let (outcome, _) = classify("sslscan", Some(0), "No issues found on this host", "");
        assert_eq!(outcome, ToolOutcome::SuccessNoFindings);
    }
}
