mod suffix;

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::EngineError;

/// Classification of the normalized target (spec §3 Target Profile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Ip,
    RootDomain,
    Subdomain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    SingleHost,
    DomainTree,
}

/// Immutable record of the input after normalization and classification.
/// Frozen after construction: tool outputs mutate the Discovery Cache, never
/// this struct. `detected_cms`/`detected_tech` are the sole exception — a
/// write-once enrichment applied at the end of the WebDetect phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetProfile {
    pub original_input: String,
    pub target_type: TargetType,
    pub scope: Scope,
    pub host: String,
    pub scheme: String,
    pub port: Option<u16>,
    pub base_domain: Option<String>,
    pub resolved_ips: BTreeSet<String>,
    pub reachable: bool,
    pub https_capable: bool,
    pub web_target: bool,
    pub detected_cms: Option<String>,
    pub detected_tech: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl TargetProfile {
    /// Write-once enrichment cell. Returns an `ArchitectureViolation` if
    /// called twice with a differing value, mirroring the "write-once cell
    /// checked at write time" convention spec §9 calls for.
    pub fn set_detected_cms(&mut self, cms: String) -> Result<(), EngineError> {
        match &self.detected_cms {
            Some(existing) if existing != &cms => Err(EngineError::ArchitectureViolation(format!(
                "detected_cms already set to {existing}, cannot overwrite with {cms}"
            ))),
            _ => {
                self.detected_cms = Some(cms);
                Ok(())
            }
        }
    }

    pub fn add_detected_tech(&mut self, tech: String) {
        self.detected_tech.insert(tech);
    }

    pub fn target_url(&self) -> String {
        match self.port {
            Some(p) => format!("{}://{}:{}", self.scheme, self.host, p),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }
}

/// Builds a frozen `TargetProfile` from raw user input, per spec §4.1.
pub async fn build_profile(raw_input: &str) -> Result<TargetProfile, EngineError> {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput("empty target".into()));
    }

    let (scheme, rest) = strip_scheme(trimmed)?;

    let host_port_path = rest;
    let host_end = host_port_path
        .find(['/', '?', '#'])
        .unwrap_or(host_port_path.len());
    let host_and_port = &host_port_path[..host_end];

    let (host, port) = split_host_port(host_and_port)?;
    if host.is_empty() {
        return Err(EngineError::InvalidInput("unparseable host".into()));
    }

    // `Ipv6Addr::from_str` rejects the `%zone` suffix a scoped link-local
    // literal (e.g. `fe80::1%eth0`) carries, so strip it before parsing;
    // the host as a whole (zone included) still counts as the IP per the
    // `IP ⇒ resolved_ips = {host}` invariant in spec §3.
    let ip_parse_candidate = host.split('%').next().unwrap_or(host.as_str());
    let (target_type, scope, base_domain, resolved_ips) = if ip_parse_candidate.parse::<IpAddr>().is_ok() {
        let mut ips = BTreeSet::new();
        ips.insert(host.clone());
        (TargetType::Ip, Scope::SingleHost, None, ips)
    } else {
        let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
        if labels.len() <= 2 || suffix::is_root_domain(&host) {
            (TargetType::RootDomain, Scope::DomainTree, None, BTreeSet::new())
        } else {
            let base = suffix::base_domain(&host);
            (TargetType::Subdomain, Scope::SingleHost, Some(base), BTreeSet::new())
        }
    };

    let resolved_ips = if target_type == TargetType::Ip {
        resolved_ips
    } else {
        resolve_host(&host).await.unwrap_or_default()
    };
    let reachable = target_type == TargetType::Ip || !resolved_ips.is_empty();

    let https_capable = probe_https(&host).await;

    let web_target = scheme == "https" || scheme == "http" || https_capable || port == Some(80) || port == Some(443) || port == Some(8080);

    Ok(TargetProfile {
        original_input: raw_input.to_string(),
        target_type,
        scope,
        host,
        scheme,
        port,
        base_domain,
        resolved_ips,
        reachable,
        https_capable,
        web_target,
        detected_cms: None,
        detected_tech: BTreeSet::new(),
        created_at: Utc::now(),
    })
}

fn strip_scheme(input: &str) -> Result<(String, &str), EngineError> {
    if let Some(rest) = input.strip_prefix("https://") {
        if rest.is_empty() {
            return Err(EngineError::InvalidInput("scheme-only target".into()));
        }
        Ok(("https".to_string(), rest))
    } else if let Some(rest) = input.strip_prefix("http://") {
        if rest.is_empty() {
            return Err(EngineError::InvalidInput("scheme-only target".into()));
        }
        Ok(("http".to_string(), rest))
    } else if let Some(idx) = input.find("://") {
        Err(EngineError::InvalidInput(format!(
            "unsupported scheme: {}",
            &input[..idx]
        )))
    } else {
        Ok(("https".to_string(), input))
    }
}

fn split_host_port(host_and_port: &str) -> Result<(String, Option<u16>), EngineError> {
    if host_and_port.starts_with('[') {
        // IPv6 literal, optionally bracketed with a trailing :port
        if let Some(close) = host_and_port.find(']') {
            let host = host_and_port[1..close].to_string();
            let rest = &host_and_port[close + 1..];
            let port = rest.strip_prefix(':').and_then(|p| p.parse::<u16>().ok());
            return Ok((host, port));
        }
    }
    // IPv6 literal with scope id and no brackets, or plain host[:port]
    if host_and_port.matches(':').count() > 1 {
        // bare IPv6 literal (with or without a %zone scope id)
        return Ok((host_and_port.to_string(), None));
    }
    match host_and_port.split_once(':') {
        Some((h, p)) => {
            let port = p.parse::<u16>().map_err(|_| {
                EngineError::InvalidInput(format!("invalid port: {p}"))
            })?;
            Ok((h.to_string(), Some(port)))
        }
        None => Ok((host_and_port.to_string(), None)),
    }
}

async fn resolve_host(host: &str) -> Option<BTreeSet<String>> {
    let lookup = format!("{host}:0");
    match tokio::time::timeout(Duration::from_secs(5), tokio::net::lookup_host(lookup)).await {
        Ok(Ok(addrs)) => {
            let ips: BTreeSet<String> = addrs.map(|a| a.ip().to_string()).collect();
            if ips.is_empty() {
                None
            } else {
                Some(ips)
            }
        }
        _ => {
            debug!(host, "DNS resolution failed or timed out");
            None
        }
    }
}

/// One TLS handshake with a short timeout, cached forever as `https_capable`.
/// TLS-family tools gate on this cached result and never re-infer it.
async fn probe_https(host: &str) -> bool {
    let client = match reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(c) => c,
        Err(_) => return false,
    };
    let url = format!("https://{host}:443/");
    matches!(
        tokio::time::timeout(Duration::from_secs(5), client.head(&url).send()).await,
        Ok(Ok(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_target_is_invalid() {
        let err = build_profile("   ").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn scheme_only_is_invalid() {
        let err = build_profile("https://").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn ip_literal_is_classified_as_ip() {
        let profile = build_profile("192.0.2.10").await.unwrap();
        assert_eq!(profile.target_type, TargetType::Ip);
        assert_eq!(profile.scope, Scope::SingleHost);
        assert!(profile.base_domain.is_none());
        assert_eq!(profile.resolved_ips.len(), 1);
    }

    #[tokio::test]
    async fn ipv6_with_scope_id_is_ip() {
        let profile = build_profile("fe80::1%eth0").await.unwrap();
        assert_eq!(profile.target_type, TargetType::Ip);
    }

    #[tokio::test]
    async fn two_labels_is_root_domain() {
        let profile = build_profile("example.com").await.unwrap();
        assert_eq!(profile.target_type, TargetType::RootDomain);
        assert!(profile.base_domain.is_none());
    }

    #[tokio::test]
    async fn single_label_is_treated_as_root_domain() {
        let profile = build_profile("localhost").await.unwrap();
        assert_eq!(profile.target_type, TargetType::RootDomain);
    }

    #[tokio::test]
    async fn three_labels_is_subdomain() {
        let profile = build_profile("api.example.com").await.unwrap();
        assert_eq!(profile.target_type, TargetType::Subdomain);
        assert_eq!(profile.base_domain.as_deref(), Some("example.com"));
    }

    #[tokio::test]
    async fn detected_cms_is_write_once() {
        let mut profile = build_profile("192.0.2.10").await.unwrap();
        profile.set_detected_cms("wordpress".into()).unwrap();
        assert!(profile.set_detected_cms("joomla".into()).is_err());
        assert_eq!(profile.detected_cms.as_deref(), Some("wordpress"));
    }
}
