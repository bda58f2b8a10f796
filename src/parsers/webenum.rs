use crate::cache::DiscoveryCache;
use crate::findings::category::VulnCategory;
use crate::findings::scoring::SourceStrength;
use crate::findings::{RawFinding, Registry, Severity};

/// `gobuster dir`/`dirsearch` both print one discovered path per line,
/// loosely formatted as `/path (Status: 200)` or `[200] /path`.
pub async fn parse_dir_brute(stdout: &str, cache: &DiscoveryCache) {
    for line in stdout.lines() {
        if let Some(path) = extract_path(line) {
            cache.add_live_endpoint(&path, "dir_brute").await;
        }
    }
}

fn extract_path(line: &str) -> Option<String> {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('/') {
        let path = format!("/{}", rest.split_whitespace().next().unwrap_or(""));
        return Some(path);
    }
    line.split_whitespace().find(|t| t.starts_with('/')).map(|t| t.to_string())
}

/// `wpscan --url <target_url>` reports vulnerable plugins/themes/core as
/// `[!] Title: <name> - <advisory>` lines.
pub async fn parse_wpscan(stdout: &str, registry: &Registry) {
    for line in stdout.lines() {
        let trimmed = line.trim();
        if !trimmed.starts_with("[!]") {
            continue;
        }
        let Some(title) = trimmed.strip_prefix("[!] Title:").map(str::trim) else {
            continue;
        };
        let category = VulnCategory::from_keyword(&format!("wordpress {title}"));
        let raw = RawFinding::new(category, Severity::High, "/", "wpscan", title)
            .with_source_strength(SourceStrength::Heuristic);
        registry.register(raw).await;
    }
}
