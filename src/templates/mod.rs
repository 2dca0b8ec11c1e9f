//! Built-in site templates using Tera template engine
//!
//! All templates are embedded directly in the binary. Autoescaping stays
//! on; pre-rendered HTML (rich text, meta tags) is passed through `safe`.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::ContactLink;
use crate::helpers::{html_escape, truncate};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("about.html", include_str!("site/about.html")),
            ("contact.html", include_str!("site/contact.html")),
            ("blog_list.html", include_str!("site/blog_list.html")),
            ("blog_detail.html", include_str!("site/blog_detail.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            ("partials/nav.html", include_str!("site/partials/nav.html")),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("site/partials/post_card.html"),
            ),
        ])?;

        // Same escaping as the rest of the crate; URLs keep their slashes
        tera.set_escape_fn(html_escape);

        // Register custom filters
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("count", count_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> tera::Result<String> {
        self.tera.render(template_name, context)
    }
}

/// `truncate_chars(length=160, omission="...")`; the result, omission
/// included, is at most `length` characters
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = args
        .get("length")
        .map(|v| tera::from_value::<usize>(v.clone()))
        .transpose()?
        .unwrap_or(150);
    let omission = args
        .get("omission")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Ok(tera::Value::String(truncate(&s, length, omission.as_deref())))
}

/// Tera filter: substitute a number into a `%d` translation
fn count_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("count", "value", String, value);
    let n = match args.get("n") {
        Some(val) => tera::try_get_value!("count", "n", i64, val),
        None => return Err(tera::Error::msg("filter `count` expected an arg `n`")),
    };
    Ok(tera::Value::String(s.replace("%d", &n.to_string())))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub url: String,
    pub language: String,
    pub year: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetaData {
    pub title: String,
    pub description: String,
    /// Pre-rendered Open Graph and Twitter tags
    pub tags: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItemData {
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavData {
    pub items: Vec<NavItemData>,
    pub contacts: Vec<ContactLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentPost {
    pub title: String,
    pub href: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FooterData {
    pub quick_links: Vec<NavItemData>,
    pub recent: Vec<RecentPost>,
    pub contact: Option<ContactLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryChip {
    pub id: String,
    pub title: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub id: String,
    /// Two-digit position badge ("01", "02", ...)
    pub index: String,
    pub title: String,
    pub excerpt: String,
    pub href: String,
    pub image: String,
    pub date: String,
    pub date_iso: String,
    pub category: Option<CategoryChip>,
    pub author: Option<String>,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionData {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceData {
    pub number: String,
    pub title: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorData {
    pub name: String,
    pub image: String,
    pub bio_html: String,
}
