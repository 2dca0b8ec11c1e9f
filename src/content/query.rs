//! GROQ query shapes
//!
//! Every read the site performs is one of these shapes. Parameters are
//! passed separately from the query text and never interpolated into it,
//! except the slice bounds, which are plain integers.

use serde_json::Value;

/// Fields shared by every post projection
const POST_FIELDS: &str = r#"_id,
  title,
  slug,
  author->{ _id, name, slug, image },
  category->{ _id, title, slug, description },
  publishedAt,
  mainImage,
  excerpt,
  status"#;

/// Post projection for the detail page: body and author bio included
const POST_DETAIL_FIELDS: &str = r#"_id,
  title,
  slug,
  author->{ _id, name, slug, image, bio },
  category->{ _id, title, slug, description },
  publishedAt,
  mainImage,
  excerpt,
  body,
  status"#;

/// A read-only query against the content store
#[derive(Debug, Clone, PartialEq)]
pub enum ContentQuery {
    /// The single about document
    About,
    /// One published post by slug
    PostBySlug { slug: String },
    /// Published posts, newest first, optionally sliced
    PublishedPosts { limit: Option<usize> },
    /// Published posts in a category, excluding one post, newest first
    RelatedPosts {
        category_id: String,
        exclude_id: String,
        limit: usize,
    },
    /// All categories by title
    Categories,
    /// All authors by name
    Authors,
}

impl ContentQuery {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ContentQuery::About => "about",
            ContentQuery::PostBySlug { .. } => "post_by_slug",
            ContentQuery::PublishedPosts { .. } => "published_posts",
            ContentQuery::RelatedPosts { .. } => "related_posts",
            ContentQuery::Categories => "categories",
            ContentQuery::Authors => "authors",
        }
    }

    /// Query text
    pub fn groq(&self) -> String {
        match self {
            ContentQuery::About => {
                r#"*[_type == "about"][0]{ photo, slogan, description, services[]{ title, detail } }"#
                    .to_string()
            }
            ContentQuery::PostBySlug { .. } => format!(
                r#"*[_type == "post" && slug.current == $slug && status == "published"][0]{{ {} }}"#,
                POST_DETAIL_FIELDS
            ),
            ContentQuery::PublishedPosts { limit } => {
                let slice = limit.map(|n| format!(" [0...{}]", n)).unwrap_or_default();
                format!(
                    r#"*[_type == "post" && status == "published"] | order(publishedAt desc){}{{ {} }}"#,
                    slice, POST_FIELDS
                )
            }
            ContentQuery::RelatedPosts { limit, .. } => format!(
                r#"*[_type == "post" && status == "published" && category._ref == $categoryId && _id != $currentPostId] | order(publishedAt desc) [0...{}]{{ {} }}"#,
                limit, POST_FIELDS
            ),
            ContentQuery::Categories => {
                r#"*[_type == "category"] | order(title asc){ _id, title, slug, description }"#
                    .to_string()
            }
            ContentQuery::Authors => {
                r#"*[_type == "author"] | order(name asc){ _id, name, slug, image }"#.to_string()
            }
        }
    }

    /// Named parameters, without the leading `$`
    pub fn params(&self) -> Vec<(&'static str, Value)> {
        match self {
            ContentQuery::PostBySlug { slug } => vec![("slug", Value::String(slug.clone()))],
            ContentQuery::RelatedPosts {
                category_id,
                exclude_id,
                ..
            } => vec![
                ("categoryId", Value::String(category_id.clone())),
                ("currentPostId", Value::String(exclude_id.clone())),
            ],
            _ => Vec::new(),
        }
    }

    /// Query-string pairs for the HTTP API: `query` plus one `$name` per
    /// parameter, each value JSON-encoded
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("query".to_string(), self.groq())];
        for (name, value) in self.params() {
            pairs.push((format!("${}", name), value.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_by_slug_uses_parameter() {
        let q = ContentQuery::PostBySlug {
            slug: "hello\"world".to_string(),
        };
        let groq = q.groq();
        assert!(groq.contains("slug.current == $slug"));
        assert!(groq.contains(r#"status == "published""#));
        assert!(groq.contains("body"));
        assert!(groq.contains("bio"));
        assert!(!groq.contains("hello"));

        let pairs = q.to_query_pairs();
        assert_eq!(pairs[1], ("$slug".to_string(), r#""hello\"world""#.to_string()));
    }

    #[test]
    fn test_published_posts_slice() {
        let all = ContentQuery::PublishedPosts { limit: None }.groq();
        assert!(all.contains("order(publishedAt desc)"));
        assert!(!all.contains("[0..."));
        assert!(!all.contains("body"));

        let latest = ContentQuery::PublishedPosts { limit: Some(3) }.groq();
        assert!(latest.contains("[0...3]"));
    }

    #[test]
    fn test_related_posts_query() {
        let q = ContentQuery::RelatedPosts {
            category_id: "cat-1".to_string(),
            exclude_id: "post-1".to_string(),
            limit: 3,
        };
        let groq = q.groq();
        assert!(groq.contains("category._ref == $categoryId"));
        assert!(groq.contains("_id != $currentPostId"));
        assert!(groq.contains("[0...3]"));
        assert_eq!(q.params().len(), 2);
        assert_eq!(q.name(), "related_posts");
    }

    #[test]
    fn test_listing_queries_are_ordered() {
        assert!(ContentQuery::Categories.groq().contains("order(title asc)"));
        assert!(ContentQuery::Authors.groq().contains("order(name asc)"));
        assert!(ContentQuery::About.groq().contains(r#"_type == "about""#));
        assert!(ContentQuery::About.params().is_empty());
    }
}
