//! JSON extraction for structured-output replies
//!
//! Models asked for JSON frequently wrap it in prose or markdown fences.
//! `first_json_object` finds the first balanced top-level object so the
//! caller can hand it to serde.

/// Extract the first balanced `{...}` object from `text`
///
/// Tracks string literals and escapes so braces inside strings do not
/// unbalance the scan. Returns `None` when no complete object is present.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}
