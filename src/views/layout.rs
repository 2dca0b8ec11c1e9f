//! Navigation bar, footer and the footer search entry point

use super::listing::BLOG_PATH;
use super::ViewContext;
use crate::config::{MenuItem, SiteConfig};
use crate::content::Post;
use crate::helpers::{encode_url, normalize_path};
use crate::templates::{FooterData, NavData, NavItemData, RecentPost};

/// Listing location for a footer search, or `None` for a blank query
pub fn search_redirect(raw: &str) -> Option<String> {
    let query = raw.trim();
    if query.is_empty() {
        None
    } else {
        Some(format!("{}?search={}", BLOG_PATH, encode_url(query)))
    }
}

fn nav_items(items: &[MenuItem], current_path: &str) -> Vec<NavItemData> {
    let current = normalize_path(current_path);
    items
        .iter()
        .map(|item| NavItemData {
            label: item.label.clone(),
            href: item.href.clone(),
            active: normalize_path(&item.href) == current,
        })
        .collect()
}

/// Top navigation
pub struct NavBar;

impl NavBar {
    pub fn build(config: &SiteConfig, current_path: &str) -> NavData {
        NavData {
            items: nav_items(&config.nav, current_path),
            contacts: config.contacts.clone(),
        }
    }
}

/// Site footer
pub struct Footer;

impl Footer {
    /// `recent` is already limited and newest first; an empty slice renders
    /// the "no recent posts" line
    pub fn build(ctx: &ViewContext, current_path: &str, recent: &[Post]) -> FooterData {
        FooterData {
            quick_links: nav_items(&ctx.config.nav, current_path),
            recent: recent
                .iter()
                .take(ctx.config.blog.recent_limit)
                .map(|post| RecentPost {
                    title: post.title.clone(),
                    href: post.path(),
                    date: ctx.short_date(&post.published_at),
                })
                .collect(),
            contact: ctx.config.contacts.first().cloned(),
        }
    }
}
