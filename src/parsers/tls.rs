use crate::findings::category::VulnCategory;
use crate::findings::scoring::SourceStrength;
use crate::findings::{RawFinding, Registry, Severity};

const WEAK_MARKERS: &[(&str, Severity)] = &[
    ("sslv3", Severity::High),
    ("ssl_rsa_with_rc4", Severity::High),
    ("tls 1.0", Severity::Medium),
    ("tlsv1.0", Severity::Medium),
    ("tls 1.1", Severity::Medium),
    ("tlsv1.1", Severity::Medium),
    ("export", Severity::High),
    ("null cipher", Severity::High),
    ("self-signed", Severity::Medium),
    ("heartbleed", Severity::Critical),
];

/// `sslscan <target>:443` prints one finding per supported cipher/protocol
/// line; weak entries are matched against a fixed marker table.
pub async fn parse_sslscan(stdout: &str, registry: &Registry) {
    parse_weak_markers(stdout, registry, "sslscan").await;
}

/// `testssl.sh --quiet <target>:443` follows the same free-text convention.
pub async fn parse_testssl(stdout: &str, registry: &Registry) {
    parse_weak_markers(stdout, registry, "testssl").await;
}

async fn parse_weak_markers(stdout: &str, registry: &Registry, tool: &str) {
    let lower = stdout.to_lowercase();
    for (marker, severity) in WEAK_MARKERS {
        if lower.contains(marker) {
            let raw = RawFinding::new(VulnCategory::CryptographicFailure, *severity, "/", tool, format!("TLS weakness marker: {marker}"))
                .with_source_strength(SourceStrength::Heuristic);
            registry.register(raw).await;
        }
    }
}
