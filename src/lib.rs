//! cms-site: a server-rendered marketing site and blog
//!
//! Content lives in a headless content store and is fetched per request
//! with GROQ queries. Pages are rendered with Tera templates embedded in
//! the binary.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod i18n;
pub mod richtext;
pub mod server;
pub mod templates;
pub mod views;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{CdnImageResolver, ContentStore, ImageResolver};
use richtext::RichTextRenderer;

/// The site application
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content backend
    pub store: Arc<dyn ContentStore>,
    /// Image URL builder
    pub images: Arc<dyn ImageResolver>,
    /// Translations for `config.language`
    pub i18n: i18n::I18n,
    /// Rich-text renderer
    pub renderer: RichTextRenderer,
}

impl Site {
    /// Create a site from a directory holding `_config.yml`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        Self::load(base_dir, None)
    }

    /// Create a site, reading the configuration from `config_path` when given
    pub fn load<P: AsRef<Path>>(base_dir: P, config_path: Option<&Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = config_path
            .map(|p| base_dir.join(p))
            .unwrap_or_else(|| base_dir.join("_config.yml"));

        let config = config::SiteConfig::load_or_default(&config_path)?;
        config.validate()?;

        let store: Arc<dyn ContentStore> =
            Arc::from(content::store::from_config(&config.content, &base_dir)?);
        let images = Arc::new(CdnImageResolver::from_config(&config.content));

        Self::from_parts(config, base_dir, store, images)
    }

    /// Assemble a site from an existing store and resolver
    pub fn from_parts(
        config: config::SiteConfig,
        base_dir: PathBuf,
        store: Arc<dyn ContentStore>,
        images: Arc<dyn ImageResolver>,
    ) -> Result<Self> {
        let mut i18n = i18n::I18n::with_builtin(&config.language)?;
        i18n.load_languages(base_dir.join("languages"))?;

        Ok(Self {
            config,
            base_dir,
            store,
            images,
            i18n,
            renderer: RichTextRenderer::default(),
        })
    }

    /// Directory static assets are served from
    pub fn static_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.static_dir)
    }

    /// Borrowed context for building page views
    pub fn view_context(&self) -> views::ViewContext<'_> {
        views::ViewContext::new(
            &self.config,
            self.images.as_ref(),
            &self.i18n,
            &self.renderer,
        )
    }
}
