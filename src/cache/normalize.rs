/// Endpoint normalization (spec §4.2): lowercase scheme/host portion is the
/// caller's responsibility (endpoints here are paths); this collapses
/// duplicate slashes and strips a trailing slash except at root. The
/// identity key is the path only; callers that need the query string keep
/// it in a side field.
pub fn normalize_path(raw: &str) -> String {
    let (path, _query) = split_query(raw);
    let collapsed = collapse_slashes(&path);
    if collapsed.len() > 1 && collapsed.ends_with('/') {
        collapsed.trim_end_matches('/').to_string()
    } else {
        collapsed
    }
}

pub fn split_query(raw: &str) -> (String, Option<String>) {
    match raw.split_once('?') {
        Some((p, q)) => (p.to_string(), Some(q.to_string())),
        None => (raw.to_string(), None),
    }
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_was_slash = false;
    for c in path.chars() {
        if c == '/' {
            if last_was_slash {
                continue;
            }
            last_was_slash = true;
        } else {
            last_was_slash = false;
        }
        out.push(c);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}
