//! Image URL resolution
//!
//! Asset references look like `image-<assetId>-<width>x<height>-<format>`.
//! The CDN serves them at
//! `https://cdn.sanity.io/images/<project>/<dataset>/<assetId>-<w>x<h>.<format>`
//! and accepts resize parameters in the query string.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::model::ImageRef;
use crate::config::ContentConfig;

lazy_static! {
    static ref ASSET_REF: Regex =
        Regex::new(r"^image-([A-Za-z0-9]+)-(\d+)x(\d+)-([A-Za-z0-9]+)$")
            .expect("asset reference pattern is valid");
}

/// Image resolution errors
#[derive(Error, Debug, PartialEq)]
pub enum ImageError {
    #[error("image has no asset reference")]
    MissingAsset,

    #[error("malformed asset reference: {0}")]
    MalformedReference(String),
}

/// Turns an image field into a fetchable URL at a requested size
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, image: &ImageRef, width: u32, height: u32) -> Result<String, ImageError>;

    /// Resolve, or fall back to `placeholder` when the image is absent or broken
    fn resolve_or(
        &self,
        image: Option<&ImageRef>,
        width: u32,
        height: u32,
        placeholder: &str,
    ) -> String {
        let Some(image) = image else {
            return placeholder.to_string();
        };

        match self.resolve(image, width, height) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Image resolution failed, using placeholder: {}", e);
                placeholder.to_string()
            }
        }
    }
}

/// Parsed form of an asset reference
#[derive(Debug, Clone, PartialEq)]
pub struct AssetId {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl AssetId {
    pub fn parse(reference: &str) -> Result<Self, ImageError> {
        let caps = ASSET_REF
            .captures(reference)
            .ok_or_else(|| ImageError::MalformedReference(reference.to_string()))?;

        let dimension = |i: usize| {
            caps[i]
                .parse::<u32>()
                .map_err(|_| ImageError::MalformedReference(reference.to_string()))
        };

        Ok(Self {
            id: caps[1].to_string(),
            width: dimension(2)?,
            height: dimension(3)?,
            format: caps[4].to_string(),
        })
    }

    /// File name on the CDN
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}x{}.{}",
            self.id, self.width, self.height, self.format
        )
    }
}

/// Builds CDN URLs for a project and dataset
#[derive(Debug, Clone)]
pub struct CdnImageResolver {
    base_url: String,
    project_id: String,
    dataset: String,
}

impl CdnImageResolver {
    pub const DEFAULT_BASE: &'static str = "https://cdn.sanity.io/images";

    pub fn new(project_id: &str, dataset: &str) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE.to_string(),
            project_id: project_id.to_string(),
            dataset: dataset.to_string(),
        }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        let resolver = Self::new(&config.project_id, &config.dataset);
        match config.image_base_url.as_deref() {
            Some(base) => resolver.with_base_url(base),
            None => resolver,
        }
    }

    /// Serve from a different host (used for local fixtures)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl ImageResolver for CdnImageResolver {
    fn resolve(&self, image: &ImageRef, width: u32, height: u32) -> Result<String, ImageError> {
        let asset = image.asset.as_ref().ok_or(ImageError::MissingAsset)?;
        let asset = AssetId::parse(&asset.reference)?;

        Ok(format!(
            "{}/{}/{}/{}?w={}&h={}&fit=crop&auto=format",
            self.base_url,
            self.project_id,
            self.dataset,
            asset.file_name(),
            width,
            height
        ))
    }
}
