//! List site content

use anyhow::Result;

use crate::Site;

/// List content from the configured store by type
pub async fn run(site: &Site, content_type: &str) -> Result<()> {
    let store = site.store.as_ref();

    match content_type {
        "post" | "posts" => {
            let posts = store.published_posts(None).await?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    post.published_at.format("%Y-%m-%d"),
                    post.title,
                    post.slug.as_str()
                );
            }
        }
        "category" | "categories" => {
            let categories = store.categories().await?;
            let posts = store.published_posts(None).await?;
            println!("Categories ({}):", categories.len());
            for category in categories {
                let count = posts
                    .iter()
                    .filter(|p| p.category_id() == Some(category.id.as_str()))
                    .count();
                println!("  {} ({}) [{}]", category.title, count, category.id);
            }
        }
        "author" | "authors" => {
            let authors = store.authors().await?;
            let posts = store.published_posts(None).await?;
            println!("Authors ({}):", authors.len());
            for author in authors {
                let count = posts
                    .iter()
                    .filter(|p| p.author_id() == Some(author.id.as_str()))
                    .count();
                println!("  {} ({}) [{}]", author.name, count, author.id);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, category, author",
                content_type
            );
        }
    }

    Ok(())
}
