use crate::cache::DiscoveryCache;

/// `nmap -sV -T4 <target>` prints one `PORT/proto  STATE  SERVICE` line per
/// scanned port; only `open` ports are signal.
pub async fn parse_nmap(stdout: &str, cache: &DiscoveryCache) {
    for line in stdout.lines() {
        let Some((port_proto, rest)) = line.trim().split_once(char::is_whitespace) else {
            continue;
        };
        if !rest.trim_start().starts_with("open") {
            continue;
        }
        if let Some((port_str, _proto)) = port_proto.split_once('/') {
            if let Ok(port) = port_str.parse::<u16>() {
                cache.add_port(port, "nmap").await;
            }
        }
    }
}

/// `naabu -host <target> -silent` emits one `host:port` pair per line.
pub async fn parse_naabu(stdout: &str, cache: &DiscoveryCache) {
    for line in stdout.lines() {
        let line = line.trim();
        if let Some((_, port_str)) = line.rsplit_once(':') {
            if let Ok(port) = port_str.parse::<u16>() {
                cache.add_port(port, "naabu").await;
            }
        }
    }
}
