use hotsearch_core::{AppConfig, Platform};

pub(crate) async fn run_clear_all(config: &AppConfig) -> anyhow::Result<()> {
    let cache = crate::runtime::open_cache(config).await?;
    cache.clear_all().await?;
    println!("cleared all cache entries");
    Ok(())
}

pub(crate) async fn run_clear_platform(config: &AppConfig, platform: Platform) -> anyhow::Result<()> {
    let cache = crate::runtime::open_cache(config).await?;
    cache.clear_platform(platform).await?;
    println!("cleared cache entry for {platform}");
    Ok(())
}
