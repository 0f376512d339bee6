//! Commands that write through the durable store.

use chrono::Utc;
use hotsearch_core::{AppConfig, HotSearchItem, Platform};
use hotsearch_pipeline::{cleanup_expired, PipelineSettings};

/// Forces a live refresh and prints what ended up current.
///
/// A single-platform refresh that fetches nothing keeps the previous
/// snapshot; that case is reported rather than treated as an error.
///
/// # Errors
///
/// Returns an error if the store, cache or collectors cannot be set up.
pub(crate) async fn run_refresh(config: &AppConfig, platform: Option<Platform>) -> anyhow::Result<()> {
    let resolver = crate::runtime::open_resolver(config).await?;

    let items = match platform {
        Some(platform) => {
            let outcome = resolver.refresh_platform(platform).await;
            if !outcome.fresh {
                println!(
                    "{platform}: live fetch returned nothing; kept {} previous items",
                    outcome.items.len()
                );
            }
            outcome.items
        }
        None => resolver.refresh_all().await,
    };
    tracing::info!(platform = ?platform, count = items.len(), "cli: refresh complete");

    print_items(&items);
    Ok(())
}

/// # Errors
///
/// Returns an error if the store cannot be reached.
pub(crate) async fn run_cleanup(config: &AppConfig) -> anyhow::Result<()> {
    let settings = PipelineSettings::from_app_config(config);
    let store = crate::runtime::open_store(config).await?;
    let deleted = cleanup_expired(store.as_ref(), settings.retention, Utc::now()).await;
    println!("removed {deleted} expired rows");
    Ok(())
}

fn print_items(items: &[HotSearchItem]) {
    if items.is_empty() {
        println!("no items");
        return;
    }

    println!("{:<10}{:<6}{:<15}{:<14}TITLE", "PLATFORM", "RANK", "HEAT", "CATEGORY");
    for item in items {
        let category = item.category.map_or("-", |c| c.as_str());
        println!(
            "{:<10}{:<6}{:<15}{:<14}{}",
            item.platform.as_str(),
            item.rank,
            item.heat,
            category,
            item.title
        );
    }
    println!("{} items", items.len());
}
