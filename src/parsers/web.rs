use crate::cache::DiscoveryCache;
use crate::profile::TargetProfile;

/// `whatweb <target_url>` prints a single summary line with `Name[version],
/// Name2[version2], ...` technology tokens. Detects CMS by name and records
/// every other token as a tech hint.
pub async fn parse_whatweb(stdout: &str, cache: &DiscoveryCache, profile: &mut TargetProfile) {
    for (name, version) in extract_tech_tokens(stdout) {
        ingest_tech(&name, version, cache, profile, "whatweb").await;
    }
}

/// `httpx -u <target_url> -silent -tech-detect` prints `<url> [tech1,tech2]`.
pub async fn parse_httpx(stdout: &str, cache: &DiscoveryCache, profile: &mut TargetProfile) {
    for line in stdout.lines() {
        let Some(open) = line.find('[') else { continue };
        let Some(close) = line.rfind(']') else { continue };
        if close <= open {
            continue;
        }
        for tech in line[open + 1..close].split(',') {
            let tech = tech.trim();
            if !tech.is_empty() {
                ingest_tech(tech, None, cache, profile, "httpx").await;
            }
        }
    }
}

async fn ingest_tech(name: &str, version: Option<String>, cache: &DiscoveryCache, profile: &mut TargetProfile, source: &str) {
    cache.add_tech(name, version.clone(), source).await;
    profile.add_detected_tech(name.to_string());
    if name.eq_ignore_ascii_case("wordpress") {
        let _ = profile.set_detected_cms("wordpress".to_string());
    } else if name.eq_ignore_ascii_case("joomla") {
        let _ = profile.set_detected_cms("joomla".to_string());
    } else if name.eq_ignore_ascii_case("drupal") {
        let _ = profile.set_detected_cms("drupal".to_string());
    }
}

fn extract_tech_tokens(stdout: &str) -> Vec<(String, Option<String>)> {
    let mut tokens = Vec::new();
    for segment in stdout.split(',') {
        let segment = segment.trim();
        let Some(open) = segment.find('[') else { continue };
        let Some(close) = segment.rfind(']') else { continue };
        if close <= open {
            continue;
        }
        let name = segment[..open].trim();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            continue;
        }
        let version = segment[open + 1..close].trim();
        tokens.push((
            name.to_string(),
            if version.is_empty() { None } else { Some(version.to_string()) },
        ));
    }
    tokens
}
