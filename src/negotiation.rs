//! Content Negotiation Module
//!
//! Picks the response format from an explicit parameter, a file extension,
//! or the `Accept` header, in that order.

/// Known formats and the media types that select them. The first media type is canonical.
const MIME_TYPES: &[(&str, &[&str])] = &[
    ("html", &["text/html", "application/xhtml+xml"]),
    ("xml", &["text/xml", "application/xml"]),
    ("json", &["application/json", "text/json"]),
    ("js", &["text/javascript"]),
    ("rss", &["application/rss+xml"]),
    ("atom", &["application/atom+xml"]),
    ("csv", &["text/csv"]),
    ("text", &["text/plain"]),
];

/// Outcome of negotiating an action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    /// Action name with a recognised extension stripped
    pub action: String,
    pub format: Option<String>,
}

pub fn is_known_format(format: &str) -> bool {
    MIME_TYPES.iter().any(|(name, _)| *name == format)
}

/// Canonical media type of a known format.
pub fn mime_type_for(format: &str) -> Option<&'static str> {
    MIME_TYPES
        .iter()
        .find(|(name, _)| *name == format)
        .map(|(_, types)| types[0])
}

/// Maps an `Accept` header to the first known format it lists.
///
/// Quality values are ignored; a wildcard-only header negotiates nothing.
pub fn format_from_accept(accept: &str) -> Option<String> {
    accept
        .split(',')
        .map(|part| part.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .find_map(|media| {
            MIME_TYPES
                .iter()
                .find(|(_, types)| types.contains(&media.as_str()))
                .map(|(name, _)| name.to_string())
        })
}

/// Negotiates the format for `action`.
pub fn negotiate(action: &str, format_param: Option<&str>, accept: Option<&str>) -> Negotiated {
    let (stem, extension) = match action.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && is_known_format(ext) => (stem, Some(ext)),
        _ => (action, None),
    };

    let format = format_param
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .or_else(|| extension.map(str::to_string))
        .or_else(|| accept.and_then(format_from_accept));

    Negotiated {
        action: stem.to_string(),
        format,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_wins() {
        let n = negotiate("list.xml", Some("json"), Some("text/csv"));
        assert_eq!(n.action, "list");
        assert_eq!(n.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_extension_before_accept() {
        let n = negotiate("list.xml", None, Some("application/json"));
        assert_eq!(n.action, "list");
        assert_eq!(n.format.as_deref(), Some("xml"));
    }

    #[test]
    fn test_unknown_extension_is_kept() {
        let n = negotiate("report.pdf", None, None);
        assert_eq!(n.action, "report.pdf");
        assert_eq!(n.format, None);
    }

    #[test]
    fn test_accept_header() {
        assert_eq!(
            format_from_accept("application/foo, application/json;q=0.9").as_deref(),
            Some("json")
        );
        assert_eq!(format_from_accept("*/*"), None);
    }

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for("json"), Some("application/json"));
        assert_eq!(mime_type_for("pdf"), None);
    }
}
