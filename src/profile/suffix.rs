/// Small hand-maintained table of multi-label public suffixes (spec §4.1
/// rule 5). Consulted before the "last two labels" fallback the spec
/// accepts as a documented known limitation.
const KNOWN_MULTI_LABEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "gov.uk", "ac.uk", "co.jp", "co.kr", "com.au", "net.au",
    "org.au", "com.br", "com.cn", "com.mx", "co.nz", "co.za",
];

fn matched_suffix(host: &str) -> Option<&'static str> {
    KNOWN_MULTI_LABEL_SUFFIXES
        .iter()
        .find(|suffix| host == **suffix || host.ends_with(&format!(".{suffix}")))
        .copied()
}

/// True when `host` itself names a known multi-label suffix or is a bare
/// domain on one (i.e. `suffix-label.suffix`, three total labels but still
/// a root domain, e.g. `example.co.uk`).
pub fn is_root_domain(host: &str) -> bool {
    match matched_suffix(host) {
        Some(suffix) => {
            let remainder = host.strip_suffix(suffix).unwrap_or(host);
            let remainder = remainder.trim_end_matches('.');
            !remainder.is_empty() && !remainder.contains('.')
        }
        None => false,
    }
}

/// Last-two-labels fallback, with the known-suffix table consulted first.
pub fn base_domain(host: &str) -> String {
    if let Some(suffix) = matched_suffix(host) {
        let remainder = host.strip_suffix(suffix).unwrap_or(host);
        let remainder = remainder.trim_end_matches('.');
        if let Some(last_label) = remainder.rsplit('.').next() {
            if !last_label.is_empty() {
                return format!("{last_label}.{suffix}");
            }
        }
        return suffix.to_string();
    }
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        host.to_string()
    } else {
        labels[labels.len() - 2..].join(".")
    }
}
