use std::path::PathBuf;

/// Step 4 of spec §4.5: is the tool's binary present on the system? This
/// engine never installs tools (spec §1 Out of scope), so this is a
/// straight `PATH` search, not a `--version` probe — any executable file
/// of the right name counts as available.
pub async fn is_available(binary: &str) -> bool {
    if binary.is_empty() {
        return false;
    }
    let binary = binary.to_string();
    tokio::task::spawn_blocking(move || resolve_in_path(&binary).is_some())
        .await
        .unwrap_or(false)
}

fn resolve_in_path(binary: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        let candidate = dir.join(binary);
        if is_executable(&candidate) {
            Some(candidate)
        } else {
            None
        }
    })
}

#[cfg(unix)]
fn is_executable(path: &PathBuf) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &PathBuf) -> bool {
    path.is_file()
}

/// Prints the `--check-tools` availability table to stdout (spec §6).
pub async fn availability_table() -> Vec<(String, bool)> {
    let mut rows = Vec::new();
    for tool in crate::catalog::TOOL_CATALOG {
        let binary = tool
            .command_template
            .split_whitespace()
            .next()
            .unwrap_or(tool.name);
        rows.push((tool.name.to_string(), is_available(binary).await));
    }
    rows
}
