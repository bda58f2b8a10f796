use crate::cache::DiscoveryCache;

/// `dnsrecon -d <target> -t std` emits one discovered hostname per relevant
/// line, often prefixed by a record type marker (e.g. `[*] A host.example.com 1.2.3.4`).
/// Pulls the first token that looks like a hostname under the target.
pub async fn parse_dnsrecon(stdout: &str, cache: &DiscoveryCache) {
    for line in stdout.lines() {
        for token in line.split_whitespace() {
            if looks_like_hostname(token) {
                cache.add_subdomain(token, "dnsrecon").await;
            }
        }
    }
}

/// `subfinder -d <target> -silent` emits exactly one hostname per line.
pub async fn parse_subfinder(stdout: &str, cache: &DiscoveryCache) {
    for line in stdout.lines() {
        let host = line.trim();
        if !host.is_empty() && looks_like_hostname(host) {
            cache.add_subdomain(host, "subfinder").await;
        }
    }
}

fn looks_like_hostname(token: &str) -> bool {
    token.contains('.')
        && token.parse::<std::net::IpAddr>().is_err()
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::heuristics::ParamClassifier;

    #[tokio::test]
    async fn subfinder_lines_become_subdomains() {
        let cache = DiscoveryCache::new(ParamClassifier::default());
        parse_subfinder("api.example.com\nwww.example.com\n", &cache).await;
        let snap = cache.snapshot().await;
        assert!(snap.subdomains.contains("api.example.com"));
        assert!(snap.subdomains.contains("www.example.com"));
    }

    #[tokio::test]
    async fn dnsrecon_extracts_hostname_token() {
        let cache = DiscoveryCache::new(ParamClassifier::default());
        parse_dnsrecon("[*] A mail.example.com 203.0.113.5", &cache).await;
        let snap = cache.snapshot().await;
        assert!(snap.subdomains.contains("mail.example.com"));
    }

    #[test]
    fn ip_literal_is_not_a_hostname() {
        assert!(!looks_like_hostname("203.0.113.5"));
    }
}
