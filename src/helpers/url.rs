//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters left alone in a query-string value
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about") // -> "https://example.com/about"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Whether `href` may be emitted as a link target
///
/// Web and mail links plus same-site paths and fragments pass; every other
/// scheme (`javascript:`, `data:`, ...) is refused.
pub fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    if href.starts_with('#') || local_path(href).is_some() {
        return true;
    }
    let lower = href.to_ascii_lowercase();
    ["http://", "https://", "mailto:", "tel:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

/// Percent-encode a query-string value
pub fn encode_url(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Whether a link leaves the site
pub fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://") || href.starts_with("//")
}

/// Accept `path` only if it stays on this site
///
/// Protocol-relative (`//host`) and backslash tricks are rejected.
pub fn local_path(path: &str) -> Option<&str> {
    if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') {
        Some(path)
    } else {
        None
    }
}

/// Drop one trailing slash, keeping `/` itself
pub fn normalize_path(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com/".to_string();
        config
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/blog/hello"),
            "https://example.com/blog/hello"
        );
        assert_eq!(full_url_for(&config, "about"), "https://example.com/about");
        assert_eq!(full_url_for(&config, "/"), "https://example.com/");
    }

    #[test]
    fn test_is_safe_href() {
        assert!(is_safe_href("https://example.org/a"));
        assert!(is_safe_href("HTTP://example.org"));
        assert!(is_safe_href("mailto:hi@example.com"));
        assert!(is_safe_href("tel:+62211234"));
        assert!(is_safe_href("/about"));
        assert!(is_safe_href("#section"));
        assert!(!is_safe_href("javascript:alert(1)"));
        assert!(!is_safe_href("  JavaScript:alert(1)"));
        assert!(!is_safe_href("data:text/html,<b>x</b>"));
        assert!(!is_safe_href("vbscript:msgbox"));
        assert!(!is_safe_href("//evil.example"));
        assert!(!is_safe_href("about"));
    }

    #[test]
    fn test_encode_url() {
        assert_eq!(encode_url("a b&c"), "a%20b%26c");
        assert_eq!(encode_url("caf\u{e9}"), "caf%C3%A9");
        assert_eq!(encode_url("plain-text_1.0~"), "plain-text_1.0~");
    }

    #[test]
    fn test_local_path() {
        assert_eq!(local_path("/blog?x=1"), Some("/blog?x=1"));
        assert_eq!(local_path("//evil.example"), None);
        assert_eq!(local_path("https://evil.example"), None);
        assert_eq!(local_path("/\\evil.example"), None);
        assert_eq!(local_path(""), None);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/blog/"), "/blog");
        assert_eq!(normalize_path("/blog"), "/blog");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("https://example.org"));
        assert!(!is_external("/about"));
        assert!(!is_external("mailto:hi@example.com"));
    }
}
