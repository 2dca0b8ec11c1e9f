//! Page view models
//!
//! Views turn fetched documents into the data structures the templates
//! render. They never fail: fetch errors arrive here as empty inputs and
//! image failures become placeholders.

pub mod detail;
pub mod layout;
pub mod listing;
pub mod pages;
pub mod theme;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::SiteConfig;
use crate::content::{ImageRef, ImageResolver, Post};
use crate::helpers::{
    date_xml, encode_url, full_date, full_url_for, open_graph, short_date, OpenGraph,
};
use crate::i18n::I18n;
use crate::richtext::RichTextRenderer;
use crate::templates::{CategoryChip, MetaData, PostCard};

pub use detail::{DetailPage, DetailView};
pub use layout::{search_redirect, Footer, NavBar};
pub use listing::{EmptyState, ListingParams, ListingState, ListingView, PostFilter, Selection};
pub use pages::{AboutView, ContactView, HomeView};
pub use theme::{Theme, ThemeData, ThemeState};

/// Card image size on listing and home pages
pub const CARD_IMAGE: (u32, u32) = (800, 600);

/// Everything a view needs besides its documents
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub config: &'a SiteConfig,
    pub images: &'a dyn ImageResolver,
    pub i18n: &'a I18n,
    pub renderer: &'a RichTextRenderer,
    pub tz: Tz,
}

impl<'a> ViewContext<'a> {
    pub fn new(
        config: &'a SiteConfig,
        images: &'a dyn ImageResolver,
        i18n: &'a I18n,
        renderer: &'a RichTextRenderer,
    ) -> Self {
        Self {
            config,
            images,
            i18n,
            renderer,
            tz: config.tz(),
        }
    }

    /// Resolve an image or fall back to the news placeholder
    pub fn image(&self, image: Option<&ImageRef>, (width, height): (u32, u32)) -> String {
        self.images
            .resolve_or(image, width, height, &self.config.blog.placeholder_image)
    }

    pub fn full_date(&self, date: &DateTime<Utc>) -> String {
        full_date(date, &self.tz, self.i18n.language())
    }

    pub fn short_date(&self, date: &DateTime<Utc>) -> String {
        short_date(date, &self.tz, self.i18n.language())
    }

    /// Card for `post` at zero-based `position`
    pub fn card(&self, position: usize, post: &Post, size: (u32, u32)) -> PostCard {
        PostCard {
            id: post.id.clone(),
            index: format!("{:02}", position + 1),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            href: post.path(),
            image: self.image(post.main_image.as_ref(), size),
            date: self.full_date(&post.published_at),
            date_iso: date_xml(&post.published_at),
            category: post.category.as_ref().map(|c| CategoryChip {
                id: c.id.clone(),
                title: c.title.clone(),
                href: format!("/blog?category={}", encode_url(&c.id)),
            }),
            author: post.author.as_ref().map(|a| a.name.clone()),
            visible: true,
        }
    }

    /// Head metadata; pages with a publish time are articles
    pub fn meta(
        &self,
        title: &str,
        description: &str,
        path: &str,
        image: Option<&str>,
        published: Option<&str>,
    ) -> MetaData {
        let site = &self.config.title;
        let title = if title.is_empty() {
            site.clone()
        } else {
            format!("{} | {}", title, site)
        };
        let description = if description.is_empty() {
            self.config.description.as_str()
        } else {
            description
        };
        let url = full_url_for(self.config, path);

        let tags = open_graph(&OpenGraph {
            kind: if published.is_some() { "article" } else { "website" },
            title: &title,
            description,
            url: &url,
            image,
            site_name: site,
            published_time: published,
        });

        MetaData {
            title,
            description: description.to_string(),
            tags,
        }
    }

    /// Cards for a list of posts, numbered from 01
    pub fn cards(&self, posts: &[Post], size: (u32, u32)) -> Vec<PostCard> {
        posts
            .iter()
            .enumerate()
            .map(|(i, post)| self.card(i, post, size))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::content::CdnImageResolver;

    /// Owns what a [`ViewContext`] borrows
    pub struct Fixture {
        pub config: SiteConfig,
        pub images: CdnImageResolver,
        pub i18n: I18n,
        pub renderer: RichTextRenderer,
    }

    impl Fixture {
        pub fn new() -> Self {
            let mut config = SiteConfig::default();
            config.timezone = "UTC".to_string();
            Self {
                config,
                images: CdnImageResolver::new("proj1", "production"),
                i18n: I18n::with_builtin("en").unwrap(),
                renderer: RichTextRenderer::default(),
            }
        }

        pub fn ctx(&self) -> ViewContext<'_> {
            ViewContext::new(&self.config, &self.images, &self.i18n, &self.renderer)
        }
    }
}
