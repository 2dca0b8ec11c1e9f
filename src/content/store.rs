//! Content store clients
//!
//! [`ContentStore`] is the read-only seam between pages and the content
//! backend. [`HttpContentStore`] speaks GROQ over HTTP; [`MemoryStore`]
//! answers the same query shapes from a local JSON fixture.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::model::{AboutDocument, Author, Category, Post};
use super::query::ContentQuery;
use crate::config::{ContentConfig, ContentSource};

/// Content fetch errors
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Read-only access to published content
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// The single about document
    async fn about(&self) -> Result<Option<AboutDocument>, ContentError>;

    /// One published post, with body and author bio
    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError>;

    /// Published posts, newest first
    async fn published_posts(&self, limit: Option<usize>) -> Result<Vec<Post>, ContentError>;

    /// Published posts sharing a category, newest first, never including `exclude_id`
    async fn related_posts(
        &self,
        category_id: &str,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<Post>, ContentError>;

    /// All categories ordered by title
    async fn categories(&self) -> Result<Vec<Category>, ContentError>;

    /// All authors ordered by name
    async fn authors(&self) -> Result<Vec<Author>, ContentError>;
}

/// Build the store selected by `content.source`
pub fn from_config(config: &ContentConfig, base_dir: &Path) -> Result<Box<dyn ContentStore>, ContentError> {
    match config.source {
        ContentSource::Remote => Ok(Box::new(HttpContentStore::new(config)?)),
        ContentSource::Fixture => {
            let path = config
                .fixture_path
                .as_deref()
                .ok_or_else(|| ContentError::Config("content.fixture_path is not set".to_string()))?;
            Ok(Box::new(MemoryStore::load(base_dir.join(path))?))
        }
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Envelope of every query response
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

/// GROQ-over-HTTP client
pub struct HttpContentStore {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpContentStore {
    pub fn new(config: &ContentConfig) -> Result<Self, ContentError> {
        if config.project_id.trim().is_empty() {
            return Err(ContentError::Config(
                "content.project_id is not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            endpoint: Self::endpoint(config),
            token: config.token.clone(),
        })
    }

    /// Query endpoint for the configured project and dataset
    pub fn endpoint(config: &ContentConfig) -> String {
        // authenticated reads bypass the CDN
        let host = if config.use_cdn && config.token.is_none() {
            "apicdn"
        } else {
            "api"
        };
        format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            config.project_id,
            host,
            config.api_version.trim_start_matches('v'),
            config.dataset
        )
    }

    async fn fetch<T: DeserializeOwned>(&self, query: &ContentQuery) -> Result<Option<T>, ContentError> {
        tracing::debug!("Content query: {}", query.name());

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&query.to_query_pairs());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: QueryResponse<T> = serde_json::from_str(&body)?;
        Ok(envelope.result)
    }

    async fn fetch_list<T: DeserializeOwned>(&self, query: &ContentQuery) -> Result<Vec<T>, ContentError> {
        let documents: Vec<Value> = self.fetch(query).await?.unwrap_or_default();
        Ok(decode_documents(documents))
    }
}

/// Decode each document on its own; one that doesn't fit `T` is logged
/// and left out instead of failing the whole list
fn decode_documents<T: DeserializeOwned>(documents: Vec<Value>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|doc| {
            let id = doc
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or("<no id>")
                .to_string();
            match serde_json::from_value(doc) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::warn!("Skipping malformed document {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

/// `deserialize_with` form of [`decode_documents`]; `null` is an empty list
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let documents = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(decode_documents(documents.unwrap_or_default()))
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn about(&self) -> Result<Option<AboutDocument>, ContentError> {
        self.fetch(&ContentQuery::About).await
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        let post: Option<Post> = self
            .fetch(&ContentQuery::PostBySlug {
                slug: slug.to_string(),
            })
            .await?;
        Ok(post.filter(Post::is_published))
    }

    async fn published_posts(&self, limit: Option<usize>) -> Result<Vec<Post>, ContentError> {
        let posts: Vec<Post> = self
            .fetch_list(&ContentQuery::PublishedPosts { limit })
            .await?;
        Ok(posts.into_iter().filter(Post::is_published).collect())
    }

    async fn related_posts(
        &self,
        category_id: &str,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<Post>, ContentError> {
        let posts: Vec<Post> = self
            .fetch_list(&ContentQuery::RelatedPosts {
                category_id: category_id.to_string(),
                exclude_id: exclude_id.to_string(),
                limit,
            })
            .await?;
        Ok(posts.into_iter().filter(Post::is_published).collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, ContentError> {
        self.fetch_list(&ContentQuery::Categories).await
    }

    async fn authors(&self) -> Result<Vec<Author>, ContentError> {
        self.fetch_list(&ContentQuery::Authors).await
    }
}

// ============================================================================
// Fixture
// ============================================================================

/// Documents held by a [`MemoryStore`], in their projected shape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentSet {
    #[serde(default)]
    pub about: Option<AboutDocument>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub posts: Vec<Post>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub authors: Vec<Author>,
}

/// In-memory store answering the same shapes as the HTTP client
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    content: ContentSet,
}

impl MemoryStore {
    pub fn new(content: ContentSet) -> Self {
        Self { content }
    }

    /// Load a JSON fixture file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let content: ContentSet = serde_json::from_str(&raw)?;
        tracing::debug!(
            "Loaded fixture {:?}: {} posts, {} categories, {} authors",
            path.as_ref(),
            content.posts.len(),
            content.categories.len(),
            content.authors.len()
        );
        Ok(Self::new(content))
    }

    /// Published posts sorted by publish date, newest first
    fn published(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .content
            .posts
            .iter()
            .filter(|p| p.is_published())
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn about(&self) -> Result<Option<AboutDocument>, ContentError> {
        Ok(self.content.about.clone())
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        Ok(self
            .content
            .posts
            .iter()
            .find(|p| p.slug.as_str() == slug && p.is_published())
            .cloned())
    }

    async fn published_posts(&self, limit: Option<usize>) -> Result<Vec<Post>, ContentError> {
        let mut posts = self.published();
        if let Some(limit) = limit {
            posts.truncate(limit);
        }
        Ok(posts)
    }

    async fn related_posts(
        &self,
        category_id: &str,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<Post>, ContentError> {
        Ok(self
            .published()
            .into_iter()
            .filter(|p| p.category_id() == Some(category_id) && p.id != exclude_id)
            .take(limit)
            .collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, ContentError> {
        let mut categories = self.content.categories.clone();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }

    async fn authors(&self) -> Result<Vec<Author>, ContentError> {
        let mut authors = self.content.authors.clone();
        authors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(authors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::fixture;

    #[test]
    fn test_endpoint() {
        let mut config = ContentConfig {
            project_id: "abc123".to_string(),
            ..ContentConfig::default()
        };
        assert_eq!(
            HttpContentStore::endpoint(&config),
            "https://abc123.apicdn.sanity.io/v2024-01-01/data/query/production"
        );

        config.token = Some("secret".to_string());
        config.api_version = "v2021-10-21".to_string();
        assert_eq!(
            HttpContentStore::endpoint(&config),
            "https://abc123.api.sanity.io/v2021-10-21/data/query/production"
        );
    }

    #[test]
    fn test_http_store_requires_project() {
        assert!(matches!(
            HttpContentStore::new(&ContentConfig::default()),
            Err(ContentError::Config(_))
        ));
    }

    #[test]
    fn test_decode_envelope() {
        let envelope: QueryResponse<Vec<Category>> = serde_json::from_str(
            r#"{"ms": 3, "query": "...", "result": [{"_id": "c1", "title": "News", "slug": {"current": "news"}}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.result.unwrap()[0].title, "News");

        let empty: QueryResponse<Post> = serde_json::from_str(r#"{"result": null}"#).unwrap();
        assert!(empty.result.is_none());
    }

    fn post_json(id: &str, title: Value) -> Value {
        serde_json::json!({
            "_id": id,
            "title": title,
            "slug": {"current": id},
            "publishedAt": "2024-05-01T08:00:00.000Z",
            "status": "published"
        })
    }

    #[test]
    fn test_decode_documents_skips_malformed() {
        let documents = vec![
            post_json("a", Value::from("First")),
            post_json("b", Value::Null),
            Value::Null,
            post_json("c", Value::from("Third")),
        ];
        let posts: Vec<Post> = decode_documents(documents);
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_memory_load_skips_malformed_post() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        let content = serde_json::json!({
            "posts": [
                post_json("a", Value::from("First")),
                post_json("b", Value::Null),
                post_json("c", Value::from("Third"))
            ],
            "authors": [{"_id": "x"}, {"_id": "y", "name": "Yuni"}],
            "categories": null
        });
        fs::write(&path, content.to_string()).unwrap();

        let store = MemoryStore::load(&path).unwrap();
        let posts = store.published_posts(None).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.id != "b"));
        assert_eq!(store.authors().await.unwrap().len(), 1);
        assert!(store.categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_published_posts_sorted_and_sliced() {
        let store = MemoryStore::new(fixture());
        let posts = store.published_posts(None).await.unwrap();
        assert!(posts.iter().all(|p| p.is_published()));
        assert!(posts
            .windows(2)
            .all(|w| w[0].published_at >= w[1].published_at));

        let latest = store.published_posts(Some(2)).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].id, posts[0].id);
    }

    #[tokio::test]
    async fn test_memory_post_by_slug_hides_drafts() {
        let store = MemoryStore::new(fixture());
        assert!(store.post_by_slug("draft-notes").await.unwrap().is_none());
        assert!(store.post_by_slug("missing").await.unwrap().is_none());
        let post = store.post_by_slug("monitoring-guide").await.unwrap().unwrap();
        assert_eq!(post.title, "A Monitoring Guide");
    }

    #[tokio::test]
    async fn test_memory_related_posts() {
        let store = MemoryStore::new(fixture());
        let related = store.related_posts("cat-news", "post-1", 3).await.unwrap();
        assert!(!related.is_empty());
        assert!(related.len() <= 3);
        assert!(related.iter().all(|p| p.id != "post-1"));
        assert!(related.iter().all(|p| p.category_id() == Some("cat-news")));
    }

    #[tokio::test]
    async fn test_memory_ordering_of_taxonomies() {
        let store = MemoryStore::new(fixture());
        let categories = store.categories().await.unwrap();
        assert!(categories.windows(2).all(|w| w[0].title <= w[1].title));
        let authors = store.authors().await.unwrap();
        assert!(authors.windows(2).all(|w| w[0].name <= w[1].name));
    }

    #[test]
    fn test_load_fixture_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        fs::write(
            &path,
            r#"{"categories": [{"_id": "c1", "title": "News", "slug": {"current": "news"}}]}"#,
        )
        .unwrap();

        let config = ContentConfig {
            source: ContentSource::Fixture,
            fixture_path: Some("content.json".to_string()),
            ..ContentConfig::default()
        };
        assert!(from_config(&config, dir.path()).is_ok());
        assert!(MemoryStore::load(dir.path().join("missing.json")).is_err());
    }
}
