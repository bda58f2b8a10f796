use crate::config::CredentialConfig;
use crate::planner::PlanEntry;
use crate::profile::TargetProfile;

/// Substitutes the command template's placeholders (spec §4.5 step 5).
/// Cookie placeholders always resolve — to the configured credential when
/// present, to the empty string for unauthenticated scans — so that
/// `has_unresolved` never trips on them.
pub fn command(entry: &PlanEntry, profile: &TargetProfile, credentials: Option<&CredentialConfig>) -> String {
    let mut cmd = entry.command_template.to_string();

    cmd = cmd.replace("{target}", &profile.host);
    cmd = cmd.replace("{target_url}", &profile.target_url());

    if !profile.resolved_ips.is_empty() {
        let ips: String = profile.resolved_ips.iter().cloned().collect::<Vec<_>>().join(",");
        cmd = cmd.replace("{resolved_ips}", &ips);
    }

    let cookie_string = credentials.and_then(|c| c.cookie_string.clone()).unwrap_or_default();
    cmd = cmd.replace("{cookie_string}", &cookie_string);

    let cookie_file = credentials.and_then(|c| c.cookie_file.clone()).unwrap_or_default();
    cmd = cmd.replace("{cookie_file}", &cookie_file);

    cmd
}

/// Returns true if the command still has unresolved `{placeholders}`.
pub fn has_unresolved(command: &str) -> bool {
    let re = regex::Regex::new(r"\{[a-z_]+\}").unwrap();
    re.is_match(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::phase::Phase;
    use crate::profile::{Scope, TargetType};

    fn profile() -> TargetProfile {
        TargetProfile {
            original_input: "example.com".into(),
            target_type: TargetType::RootDomain,
            scope: Scope::DomainTree,
            host: "example.com".into(),
            scheme: "https".into(),
            port: None,
            base_domain: None,
            resolved_ips: Default::default(),
            reachable: true,
            https_capable: true,
            web_target: true,
            detected_cms: None,
            detected_tech: Default::default(),
            created_at: chrono::Utc::now(),
        }
    }

    fn entry(template: &str) -> PlanEntry {
        PlanEntry {
            tool_name: "nmap".into(),
            phase: Phase::Network,
            command_template: template.into(),
            required_capabilities: vec![],
            priority: 1,
        }
    }

    #[test]
    fn resolves_target_and_url() {
        let cmd = command(&entry("nmap -sV {target} {target_url}"), &profile(), None);
        assert_eq!(cmd, "nmap -sV example.com https://example.com");
    }

    #[test]
    fn cookie_resolves_empty_without_credentials() {
        let cmd = command(&entry("curl -b '{cookie_string}' {target_url}"), &profile(), None);
        assert!(!has_unresolved(&cmd));
        assert!(cmd.contains("-b ''"));
    }

    #[test]
    fn cookie_resolves_to_configured_value() {
        let creds = CredentialConfig {
            cookie_string: Some("session=abc".into()),
            cookie_file: None,
        };
        let cmd = command(&entry("curl -b '{cookie_string}'"), &profile(), Some(&creds));
        assert!(cmd.contains("session=abc"));
    }

    #[test]
    fn unresolved_placeholder_detected() {
        assert!(has_unresolved("nmap {target} {missing_var}"));
        assert!(!has_unresolved("nmap 192.168.1.1"));
    }
}
