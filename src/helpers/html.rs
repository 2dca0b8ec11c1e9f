//! HTML helper functions

use super::url::is_external;

/// Page metadata rendered into `<head>`
#[derive(Debug, Clone, Default)]
pub struct OpenGraph<'a> {
    pub kind: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub image: Option<&'a str>,
    pub site_name: &'a str,
    pub published_time: Option<&'a str>,
}

/// Generate Open Graph and Twitter card meta tags
pub fn open_graph(og: &OpenGraph) -> String {
    let kind = if og.kind.is_empty() { "website" } else { og.kind };
    let mut tags = vec![
        format!(r#"<meta property="og:type" content="{}">"#, kind),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            html_escape(og.title)
        ),
        format!(r#"<meta property="og:url" content="{}">"#, html_escape(og.url)),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            html_escape(og.site_name)
        ),
        format!(
            r#"<meta name="twitter:title" content="{}">"#,
            html_escape(og.title)
        ),
    ];

    if !og.description.is_empty() {
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            html_escape(og.description)
        ));
        tags.push(format!(
            r#"<meta name="twitter:description" content="{}">"#,
            html_escape(og.description)
        ));
    }

    match og.image {
        Some(img) => {
            tags.push(format!(
                r#"<meta property="og:image" content="{}">"#,
                html_escape(img)
            ));
            tags.push(r#"<meta name="twitter:card" content="summary_large_image">"#.to_string());
            tags.push(format!(
                r#"<meta name="twitter:image" content="{}">"#,
                html_escape(img)
            ));
        }
        None => tags.push(r#"<meta name="twitter:card" content="summary">"#.to_string()),
    }

    if let Some(time) = og.published_time {
        tags.push(format!(
            r#"<meta property="article:published_time" content="{}">"#,
            time
        ));
    }

    tags.join("\n")
}

/// Attributes for an anchor pointing at `href`
pub fn link_attrs(href: &str) -> String {
    if is_external(href) {
        format!(
            r#"href="{}" target="_blank" rel="noopener noreferrer""#,
            html_escape(href)
        )
    } else {
        format!(r#"href="{}""#, html_escape(href))
    }
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8, None), "Hello...");
        assert_eq!(truncate("Hi", 10, None), "Hi");
    }

    #[test]
    fn test_link_attrs() {
        assert_eq!(link_attrs("/about"), r#"href="/about""#);
        let external = link_attrs("https://example.org/?a=1&b=2");
        assert!(external.contains(r#"target="_blank""#));
        assert!(external.contains(r#"rel="noopener noreferrer""#));
        assert!(external.contains("a=1&amp;b=2"));
    }

    #[test]
    fn test_open_graph() {
        let tags = open_graph(&OpenGraph {
            kind: "article",
            title: "Hello <World>",
            description: "",
            url: "https://example.com/blog/hello",
            image: Some("https://cdn.example.com/a.jpg"),
            site_name: "Newsroom",
            published_time: Some("2024-05-05T09:30:00.000Z"),
        });
        assert!(tags.contains(r#"og:type" content="article""#));
        assert!(tags.contains("Hello &lt;World&gt;"));
        assert!(!tags.contains("og:description"));
        assert!(tags.contains("summary_large_image"));
        assert!(tags.contains("article:published_time"));

        let plain = open_graph(&OpenGraph {
            title: "Home",
            ..OpenGraph::default()
        });
        assert!(plain.contains(r#"og:type" content="website""#));
        assert!(!plain.contains("og:image"));
    }
}
