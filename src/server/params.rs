//! Minimal query-string parsing and percent-decoding.
//!
//! Deliberately hand-rolled for the two things the surface needs:
//! %XX decoding in paths and query values, and '+' as space in query
//! values only (a literal '+' in a file name must stay a '+').

/// Split "path?query" into (path, query); query is "" when absent.
pub(super) fn split_query(url: &str) -> (&str, &str) {
    match url.split_once('?') {
        Some((p, q)) => (p, q),
        None => (url, ""),
    }
}

/// First value of `key` in the query string, percent-decoded.
pub(super) fn query_param(query: &str, key: &str) -> Option<String> {
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if decode(k, true) == key {
            return Some(decode(v, true));
        }
    }
    None
}

/// Percent-decode a URL path component ('+' stays literal).
pub(super) fn decode_path(s: &str) -> String {
    decode(s, false)
}

fn decode(s: &str, plus_as_space: bool) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => match (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                (Some(h), Some(l)) => {
                    out.push(h * 16 + l);
                    i += 3;
                }
                // malformed escape stays literal
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_and_params() {
        let (p, q) = split_query("/pfs/a/b?commit=c1&branch=dev");
        assert_eq!(p, "/pfs/a/b");
        assert_eq!(query_param(q, "commit").as_deref(), Some("c1"));
        assert_eq!(query_param(q, "branch").as_deref(), Some("dev"));
        assert_eq!(query_param(q, "missing"), None);

        let (p, q) = split_query("/ping");
        assert_eq!(p, "/ping");
        assert_eq!(q, "");
    }

    #[test]
    fn decoding_rules() {
        assert_eq!(decode_path("a%20b/c"), "a b/c");
        // '+' is literal in paths, space in query values
        assert_eq!(decode_path("a+b"), "a+b");
        assert_eq!(query_param("k=a+b", "k").as_deref(), Some("a b"));
        // malformed escapes survive as-is
        assert_eq!(decode_path("100%zz"), "100%zz");
        assert_eq!(decode_path("tail%4"), "tail%4");
    }
}
