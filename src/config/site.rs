//! Site configuration (_config.yml)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable that overrides `content.token`
pub const TOKEN_ENV: &str = "CMS_SITE_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub language: String,
    pub timezone: String,
    pub default_theme: String,

    // URL
    pub url: String,

    // Directory
    pub static_dir: String,

    // Sections
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub blog: BlogConfig,
    #[serde(default)]
    pub server: ServerConfig,

    // Layout
    pub nav: Vec<MenuItem>,
    pub contacts: Vec<ContactLink>,
    pub features: Vec<Feature>,
    pub hours: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Newsroom".to_string(),
            tagline: "News, articles and updates from our team".to_string(),
            description: "A small publication powered by a headless content store.".to_string(),
            language: "en".to_string(),
            timezone: "Asia/Jakarta".to_string(),
            default_theme: "dark".to_string(),

            url: "http://localhost:3000".to_string(),

            static_dir: "static".to_string(),

            content: ContentConfig::default(),
            blog: BlogConfig::default(),
            server: ServerConfig::default(),

            nav: vec![
                MenuItem::new("Home", "/"),
                MenuItem::new("About", "/about"),
                MenuItem::new("Contact", "/contact"),
                MenuItem::new("Blog", "/blog"),
            ],
            contacts: vec![ContactLink {
                label: "Email".to_string(),
                handle: "hello@example.com".to_string(),
                href: "mailto:hello@example.com".to_string(),
                description: "Write to us and we will get back to you.".to_string(),
                style: "blue".to_string(),
            }],
            features: vec![
                Feature::new("Fresh Content", "New articles every week from our editors."),
                Feature::new("Trusted Sources", "Every story is reviewed before it goes out."),
                Feature::new("Always On", "Reach our team any time, any day."),
                Feature::new("Fast Delivery", "Pages are rendered on the server and load quickly."),
            ],
            hours: "Every day: 24 hours".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env();
            Ok(config)
        }
    }

    /// Pick up secrets from the environment
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.content.token = Some(token);
            }
        }
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<()> {
        match self.content.source {
            ContentSource::Remote => {
                if self.content.project_id.trim().is_empty() {
                    bail!("content.project_id is required when content.source is `remote`");
                }
                if self.content.dataset.trim().is_empty() {
                    bail!("content.dataset must not be empty");
                }
            }
            ContentSource::Fixture => {
                if self.content.fixture_path.is_none() {
                    bail!("content.fixture_path is required when content.source is `fixture`");
                }
            }
        }

        if self.blog.words_per_minute == 0 {
            bail!("blog.words_per_minute must be greater than zero");
        }

        Ok(())
    }

    /// Timezone used when formatting publish dates
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown timezone {:?}, falling back to UTC", self.timezone);
            chrono_tz::UTC
        })
    }
}

/// Where content documents come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Query the hosted content store over HTTP
    Remote,
    /// Serve documents from a local JSON fixture
    Fixture,
}

/// Content store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub source: ContentSource,
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
    pub fixture_path: Option<String>,
    pub image_base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source: ContentSource::Remote,
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            token: None,
            fixture_path: None,
            image_base_url: None,
            timeout_secs: 10,
        }
    }
}

/// Blog presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    pub words_per_minute: u32,
    pub related_limit: usize,
    pub recent_limit: usize,
    pub placeholder_image: String,
    pub profile_placeholder: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            related_limit: 3,
            recent_limit: 3,
            placeholder_image: "/images/placeholder-news.png".to_string(),
            profile_placeholder: "/images/profile-placeholder.png".to_string(),
        }
    }
}

/// Listen address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Navigation entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub href: String,
}

impl MenuItem {
    pub fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// External contact channel, shown in the navbar and on the contact page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactLink {
    pub label: String,
    #[serde(default)]
    pub handle: String,
    pub href: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_style() -> String {
    "blue".to_string()
}

/// Home page feature card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

impl Feature {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.blog.words_per_minute, 200);
        assert_eq!(config.blog.related_limit, 3);
        assert_eq!(config.content.source, ContentSource::Remote);
        assert_eq!(config.nav.len(), 4);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
language: id
content:
  source: fixture
  fixture_path: content.json
blog:
  related_limit: 5
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.language, "id");
        assert_eq!(config.content.source, ContentSource::Fixture);
        assert_eq!(config.blog.related_limit, 5);
        // untouched sections keep their defaults
        assert_eq!(config.blog.words_per_minute, 200);
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_remote_requires_project() {
        let config = SiteConfig::default();
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.content.project_id = "abc123".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_words_per_minute() {
        let mut config = SiteConfig::default();
        config.content.project_id = "abc123".to_string();
        config.blog.words_per_minute = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "title: From Disk\ntimezone: Europe/Berlin\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "From Disk");
        assert_eq!(config.tz(), chrono_tz::Europe::Berlin);

        let missing = SiteConfig::load_or_default(dir.path().join("nope.yml")).unwrap();
        assert_eq!(missing.title, "Newsroom");
    }

    #[test]
    fn test_unknown_timezone_falls_back() {
        let mut config = SiteConfig::default();
        config.timezone = "Mars/Olympus".to_string();
        assert_eq!(config.tz(), chrono_tz::UTC);
    }
}
