//! HTML and CSS value hygiene for document-supplied strings.
//!
//! Everything a page author (or a tampered payload) controls passes
//! through these helpers before it reaches markup or inline CSS.

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Strip characters that could end a declaration or a style attribute
pub fn sanitize_css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '"' | '\\' | '\n' | '\r'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// `url("...")` with quoting characters removed
pub fn css_url(url: &str) -> String {
    let cleaned: String = url
        .chars()
        .filter(|c| !matches!(c, '"' | '\\' | '\n' | '\r' | '(' | ')'))
        .collect();
    format!("url(\"{}\")", cleaned.trim())
}

/// Accept links with a harmless scheme, or relative links
pub fn safe_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let lower = url.to_ascii_lowercase();
    let allowed = ["http://", "https://", "mailto:", "tel:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
        || url.starts_with('/')
        || url.starts_with('#')
        || !lower.contains(':');

    allowed.then(|| url.to_string())
}

/// Percent-encode a query component
pub fn encode_query_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
