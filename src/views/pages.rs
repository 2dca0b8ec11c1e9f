//! Home, about and contact pages

use serde::Serialize;

use super::{ViewContext, CARD_IMAGE};
use crate::config::{ContactLink, Feature};
use crate::content::{AboutDocument, ContentStore, Post};
use crate::templates::{MetaData, PostCard, ServiceData};

pub const PROFILE_IMAGE: (u32, u32) = (1200, 1200);

/// Latest published posts, or none when the store is unreachable
pub async fn recent_posts(store: &dyn ContentStore, limit: usize) -> Vec<Post> {
    match store.published_posts(Some(limit)).await {
        Ok(posts) => posts.into_iter().filter(Post::is_published).collect(),
        Err(e) => {
            tracing::error!("Failed to fetch recent posts: {}", e);
            Vec::new()
        }
    }
}

/// Template data for `/`
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub features: Vec<Feature>,
    pub latest: Vec<PostCard>,
    pub meta: MetaData,
}

impl HomeView {
    pub fn build(ctx: &ViewContext, latest: &[Post]) -> Self {
        let latest = &latest[..latest.len().min(ctx.config.blog.recent_limit)];
        Self {
            features: ctx.config.features.clone(),
            latest: ctx.cards(latest, CARD_IMAGE),
            meta: ctx.meta("", &ctx.config.description, "/", None, None),
        }
    }
}

/// Template data for `/about`
#[derive(Debug, Clone, Serialize)]
pub struct AboutView {
    /// False when the about document is missing or failed to load
    pub found: bool,
    pub photo: String,
    pub slogan: String,
    pub paragraphs: Vec<String>,
    pub services: Vec<ServiceData>,
    pub meta: MetaData,
}

impl AboutView {
    pub fn build(ctx: &ViewContext, about: Option<&AboutDocument>) -> Self {
        let title = ctx.i18n.get("about.title");
        let photo = ctx.images.resolve_or(
            about.and_then(|a| a.photo.as_ref()),
            PROFILE_IMAGE.0,
            PROFILE_IMAGE.1,
            &ctx.config.blog.profile_placeholder,
        );

        let Some(about) = about else {
            return Self {
                found: false,
                photo,
                slogan: ctx.config.tagline.clone(),
                paragraphs: vec![ctx.config.description.clone()],
                services: Vec::new(),
                meta: ctx.meta(&title, "", "/about", None, None),
            };
        };

        let paragraphs = about
            .description
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            found: true,
            photo,
            slogan: about.slogan.clone(),
            paragraphs,
            services: about
                .services
                .iter()
                .enumerate()
                .map(|(i, s)| ServiceData {
                    number: format!("{:02}", i + 1),
                    title: s.title.clone(),
                    detail: s.detail.clone(),
                })
                .collect(),
            meta: ctx.meta(&title, &about.slogan, "/about", None, None),
        }
    }

    /// Fetch the about document; failures render the fallback page
    pub async fn load(store: &dyn ContentStore) -> Option<AboutDocument> {
        match store.about().await {
            Ok(about) => about,
            Err(e) => {
                tracing::error!("Failed to fetch about document: {}", e);
                None
            }
        }
    }
}

/// Template data for `/contact`
#[derive(Debug, Clone, Serialize)]
pub struct ContactView {
    pub contacts: Vec<ContactLink>,
    pub hours: String,
    pub meta: MetaData,
}

impl ContactView {
    pub fn build(ctx: &ViewContext) -> Self {
        Self {
            contacts: ctx.config.contacts.clone(),
            hours: ctx.config.hours.clone(),
            meta: ctx.meta(
                &ctx.i18n.get("contact.title"),
                &ctx.i18n.get("contact.subtitle"),
                "/contact",
                None,
                None,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::{fixture, BrokenResolver};
    use crate::content::MemoryStore;
    use crate::views::testing::Fixture;

    #[tokio::test]
    async fn test_home_latest() {
        let f = Fixture::new();
        let store = MemoryStore::new(fixture());
        let latest = recent_posts(&store, 3).await;
        let home = HomeView::build(&f.ctx(), &latest);

        assert_eq!(home.latest.len(), 3);
        assert_eq!(home.latest[0].title, "A Monitoring Guide");
        assert_eq!(home.features.len(), 4);
        assert_eq!(home.meta.title, "Newsroom");
    }

    #[tokio::test]
    async fn test_about_page() {
        let f = Fixture::new();
        let about = AboutView::load(&MemoryStore::new(fixture())).await;
        let view = AboutView::build(&f.ctx(), about.as_ref());

        assert!(view.found);
        assert!(view.photo.contains("teamPhoto01-1200x1200.jpg?w=1200&h=1200"));
        assert_eq!(view.slogan, "Stories worth your time");
        let numbers: Vec<&str> = view.services.iter().map(|s| s.number.as_str()).collect();
        assert_eq!(numbers, vec!["01", "02", "03"]);
        assert!(view.services[2].detail.is_none());
    }

    #[test]
    fn test_about_fallback() {
        let f = Fixture::new();
        let view = AboutView::build(&f.ctx(), None);
        assert!(!view.found);
        assert_eq!(view.photo, "/images/profile-placeholder.png");
        assert_eq!(view.paragraphs, vec![f.config.description.clone()]);

        let about = fixture().about;
        let ctx = ViewContext::new(&f.config, &BrokenResolver, &f.i18n, &f.renderer);
        let view = AboutView::build(&ctx, about.as_ref());
        assert_eq!(view.photo, "/images/profile-placeholder.png");
    }

    #[test]
    fn test_contact_page() {
        let f = Fixture::new();
        let view = ContactView::build(&f.ctx());
        assert_eq!(view.contacts.len(), 1);
        assert_eq!(view.hours, "Every day: 24 hours");
        assert_eq!(view.meta.title, "Contact | Newsroom");
    }
}
