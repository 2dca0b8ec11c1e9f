//! Rich-text rendering
//!
//! Turns a body of [`ContentBlock`]s into HTML. Every node kind is looked
//! up by tag in a [`HandlerRegistry`]; each handler family has a fallback,
//! so unknown styles, marks or embedded types never abort a render.

use std::collections::HashMap;
use std::sync::Arc;

use crate::content::{ContentBlock, ImageRef, ImageResolver, MarkDef, TextBlock};
use crate::helpers::{html_escape, is_safe_href, link_attrs};

/// Size embedded body images are requested at
pub const IMAGE_WIDTH: u32 = 1200;
pub const IMAGE_HEIGHT: u32 = 800;

/// Alt text when an image has neither caption nor alt
pub const DEFAULT_ALT: &str = "Article image";

/// Wraps the rendered spans of a text block
pub type StyleHandler = Arc<dyn Fn(&TextBlock, &str) -> String + Send + Sync>;
/// Wraps rendered list items in a container
pub type ListHandler = Arc<dyn Fn(&str) -> String + Send + Sync>;
/// Wraps the content of a single list item
pub type ListItemHandler = Arc<dyn Fn(&TextBlock, &str) -> String + Send + Sync>;
/// Wraps marked text; annotations receive their definition
pub type MarkHandler = Arc<dyn Fn(&str, Option<&MarkDef>) -> String + Send + Sync>;
/// Renders a non-text node
pub type TypeHandler = Arc<dyn Fn(&ContentBlock, &RenderContext) -> String + Send + Sync>;

/// What handlers may reach while rendering
pub struct RenderContext<'a> {
    pub images: &'a dyn ImageResolver,
}

/// Handlers keyed by tag, with one fallback per family
#[derive(Clone)]
pub struct HandlerRegistry {
    styles: HashMap<String, StyleHandler>,
    lists: HashMap<String, ListHandler>,
    list_items: HashMap<String, ListItemHandler>,
    marks: HashMap<String, MarkHandler>,
    types: HashMap<String, TypeHandler>,

    style_fallback: StyleHandler,
    list_fallback: ListHandler,
    list_item_fallback: ListItemHandler,
    mark_fallback: MarkHandler,
    type_fallback: TypeHandler,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();

        for level in 1..=4 {
            registry = registry.with_style(&format!("h{}", level), heading(level));
        }
        registry = registry
            .with_style("normal", wrap_style("p"))
            .with_style("blockquote", wrap_style("blockquote"))
            .with_list("bullet", wrap_list("ul"))
            .with_list("number", wrap_list("ol"))
            .with_mark("strong", wrap_mark("strong"))
            .with_mark("em", wrap_mark("em"))
            .with_mark("code", wrap_mark("code"))
            .with_mark("underline", wrap_mark("u"))
            .with_mark("strike-through", wrap_mark("s"))
            .with_mark("link", Arc::new(link))
            .with_type("image", Arc::new(image));

        registry
    }
}

impl HandlerRegistry {
    /// A registry with only the fallbacks installed
    pub fn empty() -> Self {
        Self {
            styles: HashMap::new(),
            lists: HashMap::new(),
            list_items: HashMap::new(),
            marks: HashMap::new(),
            types: HashMap::new(),

            style_fallback: wrap_style("p"),
            list_fallback: wrap_list("ul"),
            list_item_fallback: Arc::new(|_: &TextBlock, inner: &str| format!("<li>{}</li>", inner)),
            mark_fallback: Arc::new(|inner: &str, _: Option<&MarkDef>| inner.to_string()),
            type_fallback: Arc::new(|block: &ContentBlock, _: &RenderContext| {
                tracing::debug!("No handler for block type {:?}, skipping", block.kind());
                String::new()
            }),
        }
    }

    pub fn with_style(mut self, style: &str, handler: StyleHandler) -> Self {
        self.styles.insert(style.to_string(), handler);
        self
    }

    pub fn with_list(mut self, kind: &str, handler: ListHandler) -> Self {
        self.lists.insert(kind.to_string(), handler);
        self
    }

    pub fn with_list_item(mut self, kind: &str, handler: ListItemHandler) -> Self {
        self.list_items.insert(kind.to_string(), handler);
        self
    }

    pub fn with_mark(mut self, mark: &str, handler: MarkHandler) -> Self {
        self.marks.insert(mark.to_string(), handler);
        self
    }

    pub fn with_type(mut self, kind: &str, handler: TypeHandler) -> Self {
        self.types.insert(kind.to_string(), handler);
        self
    }

    fn style(&self, style: &str) -> &StyleHandler {
        self.styles.get(style).unwrap_or(&self.style_fallback)
    }

    fn list(&self, kind: &str) -> &ListHandler {
        self.lists.get(kind).unwrap_or(&self.list_fallback)
    }

    fn list_item(&self, kind: &str) -> &ListItemHandler {
        self.list_items.get(kind).unwrap_or(&self.list_item_fallback)
    }

    fn mark(&self, mark: &str) -> &MarkHandler {
        self.marks.get(mark).unwrap_or(&self.mark_fallback)
    }

    fn block_type(&self, kind: &str) -> &TypeHandler {
        self.types.get(kind).unwrap_or(&self.type_fallback)
    }
}

/// Renders block sequences with a handler registry
#[derive(Clone, Default)]
pub struct RichTextRenderer {
    handlers: HandlerRegistry,
}

impl RichTextRenderer {
    pub fn new(handlers: HandlerRegistry) -> Self {
        Self { handlers }
    }

    /// Render a block sequence to HTML
    pub fn render(&self, blocks: &[ContentBlock], images: &dyn ImageResolver) -> String {
        let ctx = RenderContext { images };
        let mut out = String::new();
        let mut i = 0;

        while i < blocks.len() {
            match &blocks[i] {
                ContentBlock::Text(text) if text.is_list_item() => {
                    let mut run = Vec::new();
                    while let Some(ContentBlock::Text(item)) = blocks.get(i) {
                        if !item.is_list_item() {
                            break;
                        }
                        run.push(item);
                        i += 1;
                    }
                    out.push_str(&self.render_list(&run));
                    continue;
                }
                ContentBlock::Text(text) => {
                    let inner = self.render_spans(text);
                    out.push_str(&(self.handlers.style(&text.style))(text, &inner));
                }
                other => {
                    out.push_str(&(self.handlers.block_type(other.kind()))(other, &ctx));
                }
            }
            i += 1;
        }

        out
    }

    /// Render a run of consecutive list items, nesting deeper levels inside
    /// the preceding item and starting a new container when the kind changes
    fn render_list(&self, items: &[&TextBlock]) -> String {
        let mut out = String::new();
        let mut i = 0;

        while i < items.len() {
            let kind = items[i].list_item.as_deref().unwrap_or_default();
            let level = items[i].depth();
            let mut rendered = String::new();

            while i < items.len()
                && items[i].depth() == level
                && items[i].list_item.as_deref().unwrap_or_default() == kind
            {
                let item = items[i];
                i += 1;

                let start = i;
                while i < items.len() && items[i].depth() > level {
                    i += 1;
                }

                let mut inner = self.render_spans(item);
                if start < i {
                    inner.push_str(&self.render_list(&items[start..i]));
                }
                rendered.push_str(&(self.handlers.list_item(kind))(item, &inner));
            }

            out.push_str(&(self.handlers.list(kind))(&rendered));
        }

        out
    }

    fn render_spans(&self, block: &TextBlock) -> String {
        block
            .children
            .iter()
            .filter(|span| span.is_text())
            .map(|span| {
                let mut html = html_escape(&span.text).replace('\n', "<br/>");
                for mark in &span.marks {
                    html = match block.mark_def(mark) {
                        Some(def) => (self.handlers.mark(&def.kind))(&html, Some(def)),
                        None => (self.handlers.mark(mark))(&html, None),
                    };
                }
                html
            })
            .collect()
    }
}

fn wrap_style(tag: &'static str) -> StyleHandler {
    Arc::new(move |_: &TextBlock, inner: &str| format!("<{tag}>{inner}</{tag}>"))
}

fn heading(level: u8) -> StyleHandler {
    Arc::new(move |block: &TextBlock, inner: &str| {
        let id = slug::slugify(block.plain_text());
        if id.is_empty() {
            format!("<h{level}>{inner}</h{level}>")
        } else {
            format!(r#"<h{level} id="{id}">{inner}</h{level}>"#)
        }
    })
}

fn wrap_list(tag: &'static str) -> ListHandler {
    Arc::new(move |inner: &str| format!("<{tag}>{inner}</{tag}>"))
}

fn wrap_mark(tag: &'static str) -> MarkHandler {
    Arc::new(move |inner: &str, _: Option<&MarkDef>| format!("<{tag}>{inner}</{tag}>"))
}

fn link(inner: &str, def: Option<&MarkDef>) -> String {
    match def.and_then(|d| d.href.as_deref()) {
        Some(href) if is_safe_href(href) => format!("<a {}>{}</a>", link_attrs(href.trim()), inner),
        Some(href) if !href.trim().is_empty() => {
            tracing::warn!("Dropping link with unsupported target {:?}", href);
            inner.to_string()
        }
        _ => inner.to_string(),
    }
}

fn image(block: &ContentBlock, ctx: &RenderContext) -> String {
    let ContentBlock::Image(image) = block else {
        return String::new();
    };
    if image.asset.is_none() {
        return String::new();
    }

    match ctx.images.resolve(image, IMAGE_WIDTH, IMAGE_HEIGHT) {
        Ok(url) => figure(image, &url),
        Err(e) => {
            tracing::warn!("Skipping body image: {}", e);
            String::new()
        }
    }
}

fn figure(image: &ImageRef, url: &str) -> String {
    let alt = image.label().unwrap_or(DEFAULT_ALT);
    let caption = image
        .caption
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(|c| format!("<figcaption>{}</figcaption>", html_escape(c)))
        .unwrap_or_default();

    format!(
        r#"<figure class="article-figure"><img src="{}" alt="{}" loading="lazy">{}</figure>"#,
        html_escape(url),
        html_escape(alt),
        caption
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::{fixture, BrokenResolver};
    use crate::content::{CdnImageResolver, Span};

    fn images() -> CdnImageResolver {
        CdnImageResolver::new("proj1", "production")
    }

    fn render(blocks: &[ContentBlock]) -> String {
        RichTextRenderer::default().render(blocks, &images())
    }

    fn item(kind: &str, level: u32, text: &str) -> ContentBlock {
        ContentBlock::Text(TextBlock::new("normal", vec![Span::plain(text)]).in_list(kind, level))
    }

    #[test]
    fn test_hello_world_paragraph() {
        assert_eq!(
            render(&[ContentBlock::paragraph("hello world")]),
            "<p>hello world</p>"
        );
    }

    #[test]
    fn test_escapes_text_and_breaks_lines() {
        assert_eq!(
            render(&[ContentBlock::paragraph("a < b\nc & d")]),
            "<p>a &lt; b<br/>c &amp; d</p>"
        );
    }

    #[test]
    fn test_headings_and_unknown_style() {
        let blocks = vec![
            ContentBlock::Text(TextBlock::new("h2", vec![Span::plain("Why It Matters")])),
            ContentBlock::Text(TextBlock::new("h6", vec![Span::plain("fallback")])),
        ];
        assert_eq!(
            render(&blocks),
            r#"<h2 id="why-it-matters">Why It Matters</h2><p>fallback</p>"#
        );
    }

    #[test]
    fn test_marks_apply_innermost_first() {
        let block = TextBlock::new("normal", vec![Span::marked("x", &["strong", "em", "sparkle"])]);
        assert_eq!(
            render(&[ContentBlock::Text(block)]),
            "<p><em><strong>x</strong></em></p>"
        );
    }

    #[test]
    fn test_links() {
        let mut block = TextBlock::new(
            "normal",
            vec![
                Span::marked("out", &["k1"]),
                Span::plain(" "),
                Span::marked("in", &["k2"]),
            ],
        );
        block.mark_defs = vec![
            MarkDef {
                key: "k1".to_string(),
                kind: "link".to_string(),
                href: Some("https://example.org".to_string()),
            },
            MarkDef {
                key: "k2".to_string(),
                kind: "link".to_string(),
                href: Some("/about".to_string()),
            },
        ];
        assert_eq!(
            render(&[ContentBlock::Text(block)]),
            r#"<p><a href="https://example.org" target="_blank" rel="noopener noreferrer">out</a> <a href="/about">in</a></p>"#
        );
    }

    #[test]
    fn test_unsafe_link_targets_render_as_text() {
        let hrefs = ["javascript:alert(1)", " JAVASCRIPT:alert(1)", "data:text/html,x", "//evil.example"];
        for href in hrefs {
            let mut block = TextBlock::new("normal", vec![Span::marked("click", &["k1"])]);
            block.mark_defs = vec![MarkDef {
                key: "k1".to_string(),
                kind: "link".to_string(),
                href: Some(href.to_string()),
            }];
            assert_eq!(render(&[ContentBlock::Text(block)]), "<p>click</p>", "{}", href);
        }
    }

    #[test]
    fn test_mailto_link_is_kept() {
        let mut block = TextBlock::new("normal", vec![Span::marked("write", &["k1"])]);
        block.mark_defs = vec![MarkDef {
            key: "k1".to_string(),
            kind: "link".to_string(),
            href: Some("mailto:hi@example.com".to_string()),
        }];
        assert_eq!(
            render(&[ContentBlock::Text(block)]),
            r#"<p><a href="mailto:hi@example.com">write</a></p>"#
        );
    }

    #[test]
    fn test_nested_list() {
        let blocks = vec![
            item("bullet", 1, "one"),
            item("bullet", 2, "one.a"),
            item("bullet", 1, "two"),
            ContentBlock::paragraph("after"),
        ];
        assert_eq!(
            render(&blocks),
            "<ul><li>one<ul><li>one.a</li></ul></li><li>two</li></ul><p>after</p>"
        );
    }

    #[test]
    fn test_list_kind_change_starts_new_container() {
        let blocks = vec![
            item("bullet", 1, "a"),
            item("number", 1, "b"),
            item("number", 1, "c"),
        ];
        assert_eq!(
            render(&blocks),
            "<ul><li>a</li></ul><ol><li>b</li><li>c</li></ol>"
        );
    }

    #[test]
    fn test_image_without_asset_renders_nothing() {
        let blocks = vec![
            ContentBlock::paragraph("before"),
            ContentBlock::Image(ImageRef {
                caption: Some("lost".to_string()),
                ..ImageRef::default()
            }),
            ContentBlock::paragraph("after"),
        ];
        let html = render(&blocks);
        assert!(!html.contains("<img"));
        assert_eq!(html, "<p>before</p><p>after</p>");
    }

    #[test]
    fn test_image_figure() {
        let mut image = ImageRef::from_ref("image-abc-800x600-jpg");
        let html = render(&[ContentBlock::Image(image.clone())]);
        assert!(html.contains("abc-800x600.jpg?w=1200&amp;h=800"));
        assert!(html.contains(r#"alt="Article image""#));
        assert!(!html.contains("figcaption"));

        image.caption = Some("Chart".to_string());
        let html = render(&[ContentBlock::Image(image)]);
        assert!(html.contains(r#"alt="Chart""#));
        assert!(html.contains("<figcaption>Chart</figcaption>"));
    }

    #[test]
    fn test_failed_image_is_omitted() {
        let blocks = vec![
            ContentBlock::paragraph("kept"),
            ContentBlock::Image(ImageRef::from_ref("image-abc-800x600-jpg")),
        ];
        let html = RichTextRenderer::default().render(&blocks, &BrokenResolver);
        assert_eq!(html, "<p>kept</p>");
    }

    #[test]
    fn test_unknown_type_uses_fallback_and_can_be_registered() {
        let block: ContentBlock = serde_json::from_value(serde_json::json!({
            "_type": "youtube",
            "url": "https://example.org/v"
        }))
        .unwrap();
        assert_eq!(render(&[block.clone()]), "");

        let handlers = HandlerRegistry::default().with_type(
            "youtube",
            Arc::new(|block: &ContentBlock, _: &RenderContext| match block {
                ContentBlock::Unknown { raw, .. } => {
                    format!("<div class=\"video\">{}</div>", raw["url"].as_str().unwrap_or(""))
                }
                _ => String::new(),
            }),
        );
        let html = RichTextRenderer::new(handlers).render(&[block], &images());
        assert_eq!(html, r#"<div class="video">https://example.org/v</div>"#);
    }

    #[test]
    fn test_custom_list_handlers() {
        let handlers = HandlerRegistry::default()
            .with_list("number", Arc::new(|inner: &str| format!(r#"<ol class="steps">{inner}</ol>"#)))
            .with_list_item(
                "number",
                Arc::new(|_: &TextBlock, inner: &str| format!(r#"<li class="step">{inner}</li>"#)),
            );
        let blocks = vec![
            ContentBlock::Text(TextBlock::new("normal", vec![Span::plain("one")]).in_list("number", 1)),
            ContentBlock::Text(TextBlock::new("normal", vec![Span::plain("two")]).in_list("number", 1)),
        ];
        let html = RichTextRenderer::new(handlers).render(&blocks, &images());
        assert_eq!(
            html,
            r#"<ol class="steps"><li class="step">one</li><li class="step">two</li></ol>"#
        );
    }

    #[test]
    fn test_fixture_body() {
        let post = fixture()
            .posts
            .into_iter()
            .find(|p| p.slug.as_str() == "monitoring-guide")
            .unwrap();
        let html = render(&post.body);
        assert!(html.starts_with(r#"<h2 id="why-it-matters">"#));
        assert!(html.contains("<strong>rare</strong>"));
        assert!(html.contains("<ul><li>Measure first<ul><li><em>then alert</em></li></ul></li><li>Review weekly</li></ul>"));
        assert_eq!(html.matches("<img").count(), 1);
        assert!(html.contains("<figcaption>A tidy dashboard</figcaption>"));
    }
}
