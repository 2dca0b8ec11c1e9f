//! Content module - document schemas, queries and store clients

pub mod blocks;
pub mod image;
pub mod model;
pub mod query;
pub mod store;

pub use blocks::{ContentBlock, MarkDef, Span, TextBlock};
pub use image::{CdnImageResolver, ImageError, ImageResolver};
pub use model::{
    AboutDocument, AssetRef, Author, Category, ImageRef, Post, PublicationStatus, ServiceItem, Slug,
};
pub use query::ContentQuery;
pub use store::{ContentError, ContentSet, ContentStore, HttpContentStore, MemoryStore};
