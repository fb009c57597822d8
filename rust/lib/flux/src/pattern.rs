//! MQTT-style path patterns.
//!
//! - exact: `profile/view`
//! - single level: `profile/+` matches `profile/view`, not `profile/view/x`
//! - multi level: `profile/#` matches `profile` and everything below it
//! - all: `#`

/// Check whether `path` matches `pattern`.
pub fn matches(pattern: &str, path: &str) -> bool {
    let mut pat = pattern.split('/');
    let mut segs = path.split('/');

    loop {
        match (pat.next(), segs.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => continue,
            (Some(p), Some(s)) if p == s => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// A pattern is valid when `#` only appears as the final segment and
/// wildcards never share a segment with other characters.
pub fn is_valid(pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    let segments: Vec<&str> = pattern.split('/').collect();
    let last = segments.len() - 1;
    segments.iter().enumerate().all(|(i, seg)| match *seg {
        "#" => i == last,
        "+" => true,
        s => !s.contains('#') && !s.contains('+'),
    })
}
