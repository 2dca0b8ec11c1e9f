//! Document schemas returned by the content store
//!
//! Field names mirror the store's JSON projections (`_id`, `slug.current`,
//! `publishedAt`, ...). Everything is validated by serde at the fetch
//! boundary; optional fields are optional here and nowhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::blocks::{self, ContentBlock};

/// URL-safe document identifier, stored as `{ "current": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Slug {
    pub current: String,
}

impl Slug {
    pub fn new(current: &str) -> Self {
        Self {
            current: current.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.current
    }
}

/// Reference to an uploaded asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref")]
    pub reference: String,
}

/// Image field: asset reference plus optional presentation text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl ImageRef {
    /// Build an image pointing at an asset reference
    pub fn from_ref(reference: &str) -> Self {
        Self {
            asset: Some(AssetRef {
                reference: reference.to_string(),
            }),
            alt: None,
            caption: None,
        }
    }

    /// Caption, then alt text
    pub fn label(&self) -> Option<&str> {
        let present = |s: &&str| !s.trim().is_empty();
        self.caption
            .as_deref()
            .filter(present)
            .or_else(|| self.alt.as_deref().filter(present))
    }
}

/// Publication workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Published,
}

/// A post author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Slug,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default, deserialize_with = "blocks::nullable")]
    pub bio: Vec<ContentBlock>,
}

/// A post category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Slug,
    #[serde(default)]
    pub description: Option<String>,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,

    pub slug: Slug,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub category: Option<Category>,

    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,

    #[serde(rename = "mainImage", default)]
    pub main_image: Option<ImageRef>,

    #[serde(default, deserialize_with = "nullable_string")]
    pub excerpt: String,

    /// Rich-text body; list projections leave it out
    #[serde(default, deserialize_with = "blocks::nullable")]
    pub body: Vec<ContentBlock>,

    #[serde(default)]
    pub status: PublicationStatus,

    /// Derived from `body`, never read from the store
    #[serde(skip)]
    pub estimated_reading_time: Option<u32>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PublicationStatus::Published
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.id.as_str())
    }

    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.id.as_str())
    }

    /// Site path of the detail page
    pub fn path(&self) -> String {
        format!("/blog/{}", self.slug.as_str())
    }

    /// Compute and store the reading time
    pub fn with_reading_time(mut self, words_per_minute: u32) -> Self {
        self.estimated_reading_time = Some(blocks::reading_time(&self.body, words_per_minute));
        self
    }
}

/// One entry in the about page's service list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// The single "about" document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutDocument {
    #[serde(default)]
    pub photo: Option<ImageRef>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub slogan: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub services: Vec<ServiceItem>,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_list_projection() {
        let value = json!({
            "_id": "post-1",
            "title": "Hello",
            "slug": { "current": "hello" },
            "author": { "_id": "author-1", "name": "Ayu", "slug": { "current": "ayu" } },
            "category": null,
            "publishedAt": "2024-05-01T10:00:00.000Z",
            "mainImage": { "_type": "image", "asset": { "_ref": "image-abc-800x600-jpg", "_type": "reference" } },
            "excerpt": null,
            "status": "published"
        });

        let post: Post = serde_json::from_value(value).unwrap();
        assert_eq!(post.id, "post-1");
        assert_eq!(post.author_id(), Some("author-1"));
        assert_eq!(post.category_id(), None);
        assert_eq!(post.excerpt, "");
        assert!(post.body.is_empty());
        assert!(post.is_published());
        assert_eq!(post.path(), "/blog/hello");
        assert_eq!(
            post.main_image.unwrap().asset.unwrap().reference,
            "image-abc-800x600-jpg"
        );
    }

    #[test]
    fn test_missing_status_is_draft() {
        let value = json!({
            "_id": "post-2",
            "title": "Draft",
            "slug": { "current": "draft" },
            "publishedAt": "2024-05-01T10:00:00Z"
        });
        let post: Post = serde_json::from_value(value).unwrap();
        assert_eq!(post.status, PublicationStatus::Draft);
        assert!(post.author.is_none());
    }

    #[test]
    fn test_reading_time_is_never_decoded() {
        let value = json!({
            "_id": "post-3",
            "title": "Sneaky",
            "slug": { "current": "sneaky" },
            "publishedAt": "2024-05-01T10:00:00Z",
            "estimatedReadingTime": 42
        });
        let post: Post = serde_json::from_value(value).unwrap();
        assert_eq!(post.estimated_reading_time, None);
        assert_eq!(post.with_reading_time(200).estimated_reading_time, Some(0));
    }

    #[test]
    fn test_decode_about() {
        let value = json!({
            "slogan": "We write",
            "description": "About us",
            "services": [{ "title": "Editing" }, { "title": "Research", "detail": "Deep dives" }]
        });
        let about: AboutDocument = serde_json::from_value(value).unwrap();
        assert!(about.photo.is_none());
        assert_eq!(about.services.len(), 2);
        assert_eq!(about.services[1].detail.as_deref(), Some("Deep dives"));
    }

    #[test]
    fn test_image_label() {
        let mut image = ImageRef::from_ref("image-a-1x1-png");
        assert_eq!(image.label(), None);
        image.alt = Some("alt text".to_string());
        assert_eq!(image.label(), Some("alt text"));
        image.caption = Some(" ".to_string());
        assert_eq!(image.label(), Some("alt text"));
        image.caption = Some("caption".to_string());
        assert_eq!(image.label(), Some("caption"));
    }
}
