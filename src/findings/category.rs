use serde::{Deserialize, Serialize};

/// The closed vulnerability-category taxonomy (spec §4.7 step 4). Mapping
/// from a tool's raw finding type onto one of these is by keyword/type
/// table, never free-text heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VulnCategory {
    Injection,
    BrokenAccessControl,
    CryptographicFailure,
    Misconfiguration,
    VulnerableComponent,
    AuthFailure,
    Ssrf,
    LoggingFailure,
    IntegrityFailure,
    InsecureDesign,
}

impl VulnCategory {
    /// The OWASP Top 10 (2021) category label this taxonomy entry maps to,
    /// used for the Finding's `owasp_category` field.
    pub fn owasp_category(&self) -> &'static str {
        match self {
            Self::Injection => "A03:2021-Injection",
            Self::BrokenAccessControl => "A01:2021-Broken Access Control",
            Self::CryptographicFailure => "A02:2021-Cryptographic Failures",
            Self::Misconfiguration => "A05:2021-Security Misconfiguration",
            Self::VulnerableComponent => "A06:2021-Vulnerable and Outdated Components",
            Self::AuthFailure => "A07:2021-Identification and Authentication Failures",
            Self::Ssrf => "A10:2021-Server-Side Request Forgery",
            Self::LoggingFailure => "A09:2021-Security Logging and Monitoring Failures",
            Self::IntegrityFailure => "A08:2021-Software and Data Integrity Failures",
            Self::InsecureDesign => "A04:2021-Insecure Design",
        }
    }

    /// Keyword/type-table mapping from a parser's raw finding-type string
    /// (tool-reported template id, vuln class name, etc.) onto the closed
    /// category set. Unmatched input falls back to `Misconfiguration`, the
    /// least-specific bucket, rather than inventing a new category.
    pub fn from_keyword(raw_type: &str) -> Self {
        let lower = raw_type.to_lowercase();
        let pairs: &[(&str, VulnCategory)] = &[
            ("sqli", Self::Injection),
            ("sql-injection", Self::Injection),
            ("sql injection", Self::Injection),
            ("command-injection", Self::Injection),
            ("commandinjection", Self::Injection),
            ("os-command", Self::Injection),
            ("xss", Self::Injection),
            ("cross-site-scripting", Self::Injection),
            ("ldap-injection", Self::Injection),
            ("template-injection", Self::Injection),
            ("ssti", Self::Injection),
            ("directory-traversal", Self::BrokenAccessControl),
            ("path-traversal", Self::BrokenAccessControl),
            ("idor", Self::BrokenAccessControl),
            ("broken-access", Self::BrokenAccessControl),
            ("unauthorized", Self::BrokenAccessControl),
            ("tls", Self::CryptographicFailure),
            ("ssl", Self::CryptographicFailure),
            ("cipher", Self::CryptographicFailure),
            ("weak-crypto", Self::CryptographicFailure),
            ("certificate", Self::CryptographicFailure),
            ("misconfig", Self::Misconfiguration),
            ("default-credentials", Self::Misconfiguration),
            ("exposed-panel", Self::Misconfiguration),
            ("directory-listing", Self::Misconfiguration),
            ("debug-mode", Self::Misconfiguration),
            ("cve-", Self::VulnerableComponent),
            ("outdated", Self::VulnerableComponent),
            ("vulnerable-component", Self::VulnerableComponent),
            ("wordpress", Self::VulnerableComponent),
            ("plugin", Self::VulnerableComponent),
            ("auth-bypass", Self::AuthFailure),
            ("authentication", Self::AuthFailure),
            ("session-fixation", Self::AuthFailure),
            ("weak-password", Self::AuthFailure),
            ("ssrf", Self::Ssrf),
            ("server-side-request-forgery", Self::Ssrf),
            ("log4j", Self::LoggingFailure),
            ("logging", Self::LoggingFailure),
            ("insufficient-logging", Self::LoggingFailure),
            ("deserialization", Self::IntegrityFailure),
            ("insecure-deserialization", Self::IntegrityFailure),
            ("supply-chain", Self::IntegrityFailure),
            ("business-logic", Self::InsecureDesign),
            ("race-condition", Self::InsecureDesign),
        ];
        pairs
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, category)| *category)
            .unwrap_or(Self::Misconfiguration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqli_keyword_maps_to_injection() {
        assert_eq!(VulnCategory::from_keyword("Generic SQLi Detection"), VulnCategory::Injection);
    }

    #[test]
    fn cve_keyword_maps_to_vulnerable_component() {
        assert_eq!(VulnCategory::from_keyword("CVE-2023-1234"), VulnCategory::VulnerableComponent);
    }

    #[test]
    fn unmatched_keyword_falls_back_to_misconfiguration() {
        assert_eq!(VulnCategory::from_keyword("unrecognized-template-id"), VulnCategory::Misconfiguration);
    }

    #[test]
    fn every_category_has_an_owasp_label() {
        let categories = [
            VulnCategory::Injection,
            VulnCategory::BrokenAccessControl,
            VulnCategory::CryptographicFailure,
            VulnCategory::Misconfiguration,
            VulnCategory::VulnerableComponent,
            VulnCategory::AuthFailure,
            VulnCategory::Ssrf,
            VulnCategory::LoggingFailure,
            VulnCategory::IntegrityFailure,
            VulnCategory::InsecureDesign,
        ];
        for category in categories {
            assert!(category.owasp_category().starts_with('A'));
        }
    }
}
