use hotsearch_core::{AppConfig, Platform};
use hotsearch_pipeline::{HealthMonitor, PlatformHealth};

/// Prints health as read from the cache tier.
///
/// Failure counters live in the server process, so the report here is based
/// on cached data alone.
///
/// # Errors
///
/// Returns an error if the cache tier cannot be opened.
pub(crate) async fn run_health(config: &AppConfig, platform: Option<Platform>) -> anyhow::Result<()> {
    let cache = crate::runtime::open_cache(config).await?;
    let monitor = HealthMonitor::new(config.failure_threshold);

    let report = match platform {
        Some(platform) => vec![monitor.check(platform, &cache).await],
        None => monitor.check_all(&cache).await,
    };

    println!("{}", format_header());
    for entry in &report {
        println!("{}", format_row(entry));
    }
    Ok(())
}

fn format_header() -> String {
    format!("{:<10}{:<10}{:<7}{:<22}MESSAGE", "PLATFORM", "STATUS", "ITEMS", "LAST UPDATED")
}

fn format_row(entry: &PlatformHealth) -> String {
    let status = match entry.status {
        hotsearch_pipeline::HealthStatus::Up => "UP",
        hotsearch_pipeline::HealthStatus::Degraded => "DEGRADED",
        hotsearch_pipeline::HealthStatus::Down => "DOWN",
    };
    let last_updated = entry.last_updated.map_or_else(
        || "-".to_string(),
        |at| at.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    format!(
        "{:<10}{:<10}{:<7}{:<22}{}",
        entry.platform.as_str(),
        status,
        entry.dataset_size,
        last_updated,
        entry.message
    )
}
