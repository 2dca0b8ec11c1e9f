//! Blog listing and filtering
//!
//! All published posts are resident; the visible subset is recomputed
//! synchronously from three predicates whenever one of them changes. The
//! same predicate runs in the browser (`static/js/blog-filter.js`) over
//! `/blog/index.json`, so a page seeded from the URL and a page filtered
//! interactively agree.

use serde::{Deserialize, Serialize};

use super::{ViewContext, CARD_IMAGE};
use crate::content::{Author, Category, ContentStore, Post};
use crate::templates::{OptionData, PostCard};

/// Parameter-free listing location, where a reset lands
pub const BLOG_PATH: &str = "/blog";

/// A category or author choice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No filter
    #[default]
    All,
    Id(String),
}

impl Selection {
    /// `"all"`, empty and missing values all mean no filter
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Selection::All,
            Some(id) => Selection::Id(id.to_string()),
        }
    }

    pub fn matches(&self, id: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Id(want) => id == Some(want.as_str()),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Id(id) => Some(id),
        }
    }

    /// Form value for this selection
    pub fn value(&self) -> &str {
        self.id().unwrap_or("all")
    }
}

/// Listing query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
}

/// The three listing predicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    pub query: String,
    pub category: Selection,
    pub author: Selection,
}

impl PostFilter {
    /// Seed from page-load parameters
    pub fn from_params(params: &ListingParams) -> Self {
        Self {
            query: params.search.as_deref().unwrap_or_default().trim().to_string(),
            category: Selection::parse(params.category.as_deref()),
            author: Selection::parse(params.author.as_deref()),
        }
    }

    /// Text matches title or excerpt, ignoring case; a blank query matches all
    pub fn matches_text(&self, post: &Post) -> bool {
        let query = self.query.trim();
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        post.title.to_lowercase().contains(&query) || post.excerpt.to_lowercase().contains(&query)
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.matches_text(post)
            && self.category.matches(post.category_id())
            && self.author.matches(post.author_id())
    }

    /// Whether any predicate narrows the list
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
            || self.category != Selection::All
            || self.author != Selection::All
    }
}

/// Why the listing shows no cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Filters hide every post
    NoMatches,
    /// There is nothing to show at all
    NothingPublished,
}

impl EmptyState {
    /// Translation key for the message
    pub fn message_key(&self) -> &'static str {
        match self {
            EmptyState::NoMatches => "blog.empty_filtered",
            EmptyState::NothingPublished => "blog.empty_none",
        }
    }
}

/// One active-filter chip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterChip {
    pub kind: &'static str,
    pub label: String,
}

/// Entry of `/blog/index.json`
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub category: Option<String>,
    pub author: Option<String>,
}

/// Resident posts, taxonomies and the current filter
#[derive(Debug, Clone, Default)]
pub struct ListingState {
    posts: Vec<Post>,
    categories: Vec<Category>,
    authors: Vec<Author>,
    filter: PostFilter,
    visible: Vec<usize>,
}

impl ListingState {
    /// Drafts are dropped; input order is kept
    pub fn new(
        posts: Vec<Post>,
        categories: Vec<Category>,
        authors: Vec<Author>,
        filter: PostFilter,
    ) -> Self {
        let mut state = Self {
            posts: posts.into_iter().filter(Post::is_published).collect(),
            categories,
            authors,
            filter,
            visible: Vec::new(),
        };
        state.recompute();
        state
    }

    /// Fetch posts, categories and authors concurrently
    ///
    /// Any failure leaves all three lists empty.
    pub async fn load(store: &dyn ContentStore, filter: PostFilter) -> Self {
        let fetched = tokio::try_join!(
            store.published_posts(None),
            store.categories(),
            store.authors()
        );

        match fetched {
            Ok((posts, categories, authors)) => Self::new(posts, categories, authors, filter),
            Err(e) => {
                tracing::error!("Failed to load blog listing: {}", e);
                Self::new(Vec::new(), Vec::new(), Vec::new(), filter)
            }
        }
    }

    fn recompute(&mut self) {
        self.visible = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, post)| self.filter.matches(post))
            .map(|(i, _)| i)
            .collect();
    }

    pub fn set_query(&mut self, query: &str) {
        self.filter.query = query.to_string();
        self.recompute();
    }

    pub fn set_category(&mut self, category: Selection) {
        self.filter.category = category;
        self.recompute();
    }

    pub fn set_author(&mut self, author: Selection) {
        self.filter.author = author;
        self.recompute();
    }

    /// Clear every predicate; returns the location to show
    pub fn reset(&mut self) -> &'static str {
        self.filter = PostFilter::default();
        self.recompute();
        BLOG_PATH
    }

    pub fn filter(&self) -> &PostFilter {
        &self.filter
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Posts passing the filter, in input order
    pub fn visible(&self) -> Vec<&Post> {
        self.visible.iter().map(|&i| &self.posts[i]).collect()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.visible.is_empty() {
            None
        } else if self.filter.is_active() {
            Some(EmptyState::NoMatches)
        } else {
            Some(EmptyState::NothingPublished)
        }
    }

    /// Chips for the active predicates: query, category title, author name
    pub fn chips(&self) -> Vec<FilterChip> {
        let mut chips = Vec::new();

        let query = self.filter.query.trim();
        if !query.is_empty() {
            chips.push(FilterChip {
                kind: "search",
                label: format!("\"{}\"", query),
            });
        }

        if let Some(id) = self.filter.category.id() {
            let label = self
                .categories
                .iter()
                .find(|c| c.id == id)
                .map_or(id, |c| c.title.as_str());
            chips.push(FilterChip {
                kind: "category",
                label: label.to_string(),
            });
        }

        if let Some(id) = self.filter.author.id() {
            let label = self
                .authors
                .iter()
                .find(|a| a.id == id)
                .map_or(id, |a| a.name.as_str());
            chips.push(FilterChip {
                kind: "author",
                label: label.to_string(),
            });
        }

        chips
    }

    /// Predicate inputs for the browser-side filter
    pub fn index(&self) -> Vec<IndexEntry> {
        self.posts
            .iter()
            .map(|p| IndexEntry {
                id: p.id.clone(),
                title: p.title.clone(),
                excerpt: p.excerpt.clone(),
                category: p.category_id().map(str::to_string),
                author: p.author_id().map(str::to_string),
            })
            .collect()
    }

    pub fn view(&self, ctx: &ViewContext) -> ListingView {
        let mut cards = ctx.cards(&self.posts, CARD_IMAGE);
        let mut position = 0;
        for (i, card) in cards.iter_mut().enumerate() {
            card.visible = self.visible.contains(&i);
            // badges count visible cards only
            if card.visible {
                card.index = format!("{:02}", position + 1);
                position += 1;
            }
        }

        let category_options = self
            .categories
            .iter()
            .map(|c| OptionData {
                value: c.id.clone(),
                label: c.title.clone(),
                selected: self.filter.category.id() == Some(c.id.as_str()),
            })
            .collect();

        let author_options = self
            .authors
            .iter()
            .map(|a| OptionData {
                value: a.id.clone(),
                label: a.name.clone(),
                selected: self.filter.author.id() == Some(a.id.as_str()),
            })
            .collect();

        ListingView {
            total: self.posts.len(),
            visible_count: self.visible.len(),
            cards,
            query: self.filter.query.clone(),
            category: self.filter.category.value().to_string(),
            author: self.filter.author.value().to_string(),
            category_options,
            author_options,
            chips: self.chips(),
            active: self.filter.is_active(),
            empty_message: self.empty_state().map(|e| ctx.i18n.get(e.message_key())),
            filtered_message: ctx.i18n.get(EmptyState::NoMatches.message_key()),
        }
    }
}

/// Template data for `/blog`
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub cards: Vec<PostCard>,
    pub total: usize,
    pub visible_count: usize,
    pub query: String,
    pub category: String,
    pub author: String,
    pub category_options: Vec<OptionData>,
    pub author_options: Vec<OptionData>,
    pub chips: Vec<FilterChip>,
    pub active: bool,
    pub empty_message: Option<String>,
    /// Shown by the browser filter when a keystroke hides every card
    pub filtered_message: String,
}
