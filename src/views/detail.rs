//! Blog post detail page

use serde::Serialize;

use super::ViewContext;
use crate::config::BlogConfig;
use crate::content::{ContentStore, Post};
use crate::helpers::{date_xml, encode_url};
use crate::templates::{AuthorData, CategoryChip, MetaData, PostCard};

pub const MAIN_IMAGE: (u32, u32) = (1200, 700);
pub const RELATED_IMAGE: (u32, u32) = (400, 250);
pub const AUTHOR_IMAGE: (u32, u32) = (96, 96);
pub const OG_IMAGE: (u32, u32) = (1200, 630);

/// A published post with its derived data
#[derive(Debug, Clone)]
pub struct DetailPage {
    pub post: Post,
    pub reading_time: u32,
    pub related: Vec<Post>,
}

impl DetailPage {
    /// Fetch the post for `slug` and everything shown beside it
    ///
    /// `None` means the page is a 404: the slug is unknown, the post is not
    /// published, or the fetch failed.
    pub async fn assemble(store: &dyn ContentStore, blog: &BlogConfig, slug: &str) -> Option<Self> {
        let post = match store.post_by_slug(slug).await {
            Ok(Some(post)) if post.is_published() => post,
            Ok(_) => return None,
            Err(e) => {
                tracing::error!("Failed to fetch post {:?}: {}", slug, e);
                return None;
            }
        };

        let post = post.with_reading_time(blog.words_per_minute);
        let reading_time = post.estimated_reading_time.unwrap_or_default();

        let related = match post.category_id() {
            None => Vec::new(),
            Some(category_id) => {
                match store
                    .related_posts(category_id, &post.id, blog.related_limit)
                    .await
                {
                    Ok(posts) => related_for(&post, posts, blog.related_limit),
                    Err(e) => {
                        tracing::error!("Failed to fetch related posts for {:?}: {}", slug, e);
                        Vec::new()
                    }
                }
            }
        };

        Some(Self {
            post,
            reading_time,
            related,
        })
    }

    pub fn view(&self, ctx: &ViewContext) -> DetailView {
        let post = &self.post;

        let author = post.author.as_ref().map(|author| AuthorData {
            name: author.name.clone(),
            image: ctx.image(author.image.as_ref(), AUTHOR_IMAGE),
            bio_html: ctx.renderer.render(&author.bio, ctx.images),
        });

        let og_image = post.main_image.as_ref().and_then(|image| {
            ctx.images
                .resolve(image, OG_IMAGE.0, OG_IMAGE.1)
                .map_err(|e| tracing::warn!("No share image for {:?}: {}", post.slug.as_str(), e))
                .ok()
        });
        let published = date_xml(&post.published_at);

        DetailView {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            image: ctx.image(post.main_image.as_ref(), MAIN_IMAGE),
            image_alt: post
                .main_image
                .as_ref()
                .and_then(|i| i.label())
                .unwrap_or(&post.title)
                .to_string(),
            date: ctx.full_date(&post.published_at),
            date_iso: published.clone(),
            reading_time: self.reading_time,
            category: post.category.as_ref().map(|c| CategoryChip {
                id: c.id.clone(),
                title: c.title.clone(),
                href: format!("/blog?category={}", encode_url(&c.id)),
            }),
            author,
            body_html: ctx.renderer.render(&post.body, ctx.images),
            has_body: !post.body.is_empty(),
            related: ctx.cards(&self.related, RELATED_IMAGE),
            meta: ctx.meta(
                &post.title,
                &post.excerpt,
                &post.path(),
                og_image.as_deref(),
                Some(&published),
            ),
        }
    }

    /// Metadata for a slug with no published post
    pub fn not_found_meta(ctx: &ViewContext, slug: &str) -> MetaData {
        ctx.meta(
            &ctx.i18n.get("blog.not_found_title"),
            &ctx.i18n.get("blog.not_found_text"),
            &format!("/blog/{}", encode_url(slug)),
            None,
            None,
        )
    }
}

/// Keep only other published posts of the same category, newest first
fn related_for(post: &Post, mut candidates: Vec<Post>, limit: usize) -> Vec<Post> {
    candidates.retain(|p| {
        p.is_published()
            && p.id != post.id
            && p.category_id().is_some()
            && p.category_id() == post.category_id()
    });
    candidates.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    candidates.truncate(limit);
    candidates
}

/// Template data for `/blog/:slug`
#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub image_alt: String,
    pub date: String,
    pub date_iso: String,
    pub reading_time: u32,
    pub category: Option<CategoryChip>,
    pub author: Option<AuthorData>,
    pub body_html: String,
    pub has_body: bool,
    pub related: Vec<PostCard>,
    pub meta: MetaData,
}
