//! Check configuration and store connectivity

use anyhow::{Context, Result};

use crate::Site;

/// Validate the configuration and run one query against the store
pub async fn run(site: &Site) -> Result<()> {
    site.config.validate()?;
    println!("Configuration OK ({:?} content source)", site.config.content.source);

    let categories = site
        .store
        .categories()
        .await
        .context("content store query failed")?;
    println!("Content store OK ({} categories)", categories.len());

    let static_dir = site.static_dir();
    if !static_dir.is_dir() {
        tracing::warn!("Static directory {:?} does not exist", static_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContentSource, SiteConfig};
    use std::fs;

    #[tokio::test]
    async fn test_check_fixture_site() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("content.json"), r#"{"categories": []}"#).unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "content:\n  source: fixture\n  fixture_path: content.json\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.content.source, ContentSource::Fixture);
        assert!(run(&site).await.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // remote source without a project id
        fs::write(dir.path().join("_config.yml"), "title: Broken\n").unwrap();
        assert!(Site::new(dir.path()).is_err());
        assert!(SiteConfig::load(dir.path().join("_config.yml")).is_ok());
    }
}
