//! Async helper functions for cache maintenance

use crate::cache::{self, CacheStats, ClearResult};

/// Remove interrupted downloads and trim the image cache to `max_cache_mb`
pub async fn prepare_cache(max_cache_mb: u64) -> anyhow::Result<CacheStats> {
    let stats = tokio::task::spawn_blocking(move || -> anyhow::Result<CacheStats> {
        cache::cleanup_temp_files();
        cache::enforce_cache_limit(max_cache_mb)?;
        Ok(cache::calculate_cache_stats())
    })
    .await??;

    tracing::info!(
        "Image cache ready: {} files, {} MB",
        stats.file_count,
        stats.total_mb()
    );
    Ok(stats)
}

/// Delete every cached image
pub async fn clear_cache() -> anyhow::Result<ClearResult> {
    let result = tokio::task::spawn_blocking(cache::clear_all_cache).await??;
    Ok(result)
}
