//! Cache management module
//!
//! Handles cache size calculation, cleanup, and automatic eviction for the
//! image loader's directory.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{info, warn};

use crate::utils::images_cache_dir;

/// Information about a cached file
#[derive(Debug)]
struct CacheEntry {
    path: PathBuf,
    size: u64,
    modified: SystemTime,
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total size in bytes
    pub total_bytes: u64,
    /// Number of files
    pub file_count: usize,
}

impl CacheStats {
    /// Get total size in megabytes
    pub fn total_mb(&self) -> u64 {
        self.total_bytes / (1024 * 1024)
    }
}

/// Get all cache directories
fn cache_directories() -> Vec<PathBuf> {
    vec![images_cache_dir()]
}

/// Collect all cache entries from a directory
fn collect_entries(dir: &PathBuf) -> Vec<CacheEntry> {
    let mut entries = Vec::new();

    if !dir.exists() {
        return entries;
    }

    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!("Failed to read cache directory {:?}: {}", dir, e);
            return entries;
        }
    };

    for entry in read_dir.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        entries.push(CacheEntry {
            path,
            size: metadata.len(),
            modified,
        });
    }

    entries
}

/// Calculate cache statistics
pub fn calculate_cache_stats() -> CacheStats {
    stats_in(&cache_directories())
}

fn stats_in(dirs: &[PathBuf]) -> CacheStats {
    let mut stats = CacheStats::default();

    for dir in dirs {
        for entry in collect_entries(dir) {
            stats.total_bytes += entry.size;
            stats.file_count += 1;
        }
    }

    stats
}

/// Clear all cache
pub fn clear_all_cache() -> Result<ClearResult, CacheError> {
    clear_in(&cache_directories())
}

fn clear_in(dirs: &[PathBuf]) -> Result<ClearResult, CacheError> {
    let mut result = ClearResult::default();

    for dir in dirs {
        if !dir.exists() {
            continue;
        }

        for entry in collect_entries(dir) {
            match fs::remove_file(&entry.path) {
                Ok(_) => {
                    result.files_deleted += 1;
                    result.bytes_freed += entry.size;
                }
                Err(e) => {
                    warn!("Failed to delete cache file {:?}: {}", entry.path, e);
                    result.errors += 1;
                }
            }
        }
    }

    info!(
        "Cache cleared: {} files deleted, {} MB freed, {} errors",
        result.files_deleted,
        result.mb_freed(),
        result.errors
    );

    if result.files_deleted == 0 && result.errors > 0 {
        return Err(CacheError::Io(format!(
            "{} cache files could not be deleted",
            result.errors
        )));
    }

    Ok(result)
}

/// Enforce cache size limit by deleting oldest files
pub fn enforce_cache_limit(max_cache_mb: u64) -> Result<ClearResult, CacheError> {
    enforce_limit_in(&cache_directories(), max_cache_mb * 1024 * 1024)
}

fn enforce_limit_in(dirs: &[PathBuf], max_bytes: u64) -> Result<ClearResult, CacheError> {
    let mut result = ClearResult::default();

    let mut all_entries: Vec<CacheEntry> = Vec::new();
    for dir in dirs {
        all_entries.extend(collect_entries(dir));
    }

    let current_size: u64 = all_entries.iter().map(|e| e.size).sum();

    if current_size <= max_bytes {
        info!(
            "Cache size {} MB is within limit {} MB",
            current_size / (1024 * 1024),
            max_bytes / (1024 * 1024)
        );
        return Ok(result);
    }

    // Oldest first
    all_entries.sort_by(|a, b| a.modified.cmp(&b.modified));

    let target_free = current_size - max_bytes;

    for entry in all_entries {
        if result.bytes_freed >= target_free {
            break;
        }

        match fs::remove_file(&entry.path) {
            Ok(_) => {
                result.files_deleted += 1;
                result.bytes_freed += entry.size;
            }
            Err(e) => {
                warn!("Failed to delete cache file {:?}: {}", entry.path, e);
                result.errors += 1;
            }
        }
    }

    info!(
        "Cache cleanup: {} files deleted, {} MB freed (target was {} MB)",
        result.files_deleted,
        result.mb_freed(),
        target_free / (1024 * 1024)
    );

    Ok(result)
}

/// Result of a cache clear operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearResult {
    pub files_deleted: usize,
    pub bytes_freed: u64,
    pub errors: usize,
}

impl ClearResult {
    /// Get bytes freed in megabytes
    pub fn mb_freed(&self) -> u64 {
        self.bytes_freed / (1024 * 1024)
    }
}

/// Clean up orphan .tmp files from incomplete downloads
///
/// This should be called at application startup to remove any temp files
/// left behind from interrupted downloads.
pub fn cleanup_temp_files() -> ClearResult {
    cleanup_temp_in(&cache_directories())
}

fn cleanup_temp_in(dirs: &[PathBuf]) -> ClearResult {
    let mut result = ClearResult::default();

    for entry in dirs.iter().flat_map(collect_entries) {
        if entry.path.extension().is_none_or(|e| e != "tmp") {
            continue;
        }

        match fs::remove_file(&entry.path) {
            Ok(_) => {
                info!(
                    "Cleaned up orphan temp file: {:?} ({} bytes)",
                    entry.path, entry.size
                );
                result.files_deleted += 1;
                result.bytes_freed += entry.size;
            }
            Err(e) => {
                warn!("Failed to delete temp file {:?}: {}", entry.path, e);
                result.errors += 1;
            }
        }
    }

    if result.files_deleted > 0 {
        info!(
            "Temp file cleanup: {} files deleted, {} bytes freed",
            result.files_deleted, result.bytes_freed
        );
    }

    result
}

/// Cache operation errors
#[derive(Debug, Clone)]
pub enum CacheError {
    Io(String),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Io(e) => write!(f, "Cache IO error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write_file(dir: &std::path::Path, name: &str, size: usize, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, vec![0u8; size]).unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
        path
    }

    #[test]
    fn stats_count_every_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.png", 100, 0);
        write_file(dir.path(), "b.jpg", 50, 0);

        let stats = stats_in(&[dir.path().to_path_buf()]);
        assert_eq!(
            stats,
            CacheStats {
                total_bytes: 150,
                file_count: 2
            }
        );
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(stats_in(&[missing.clone()]), CacheStats::default());
        assert_eq!(cleanup_temp_in(&[missing]), ClearResult::default());
    }

    #[test]
    fn limit_evicts_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let oldest = write_file(dir.path(), "old.png", 100, 300);
        let middle = write_file(dir.path(), "mid.png", 100, 200);
        let newest = write_file(dir.path(), "new.png", 100, 100);

        let result = enforce_limit_in(&[dir.path().to_path_buf()], 150).unwrap();

        assert_eq!(result.files_deleted, 2);
        assert_eq!(result.bytes_freed, 200);
        assert!(!oldest.exists());
        assert!(!middle.exists());
        assert!(newest.exists());
    }

    #[test]
    fn limit_within_budget_deletes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_file(dir.path(), "a.png", 100, 0);

        let result = enforce_limit_in(&[dir.path().to_path_buf()], 1000).unwrap();
        assert_eq!(result, ClearResult::default());
        assert!(file.exists());
    }

    #[test]
    fn cleanup_removes_only_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let temp = write_file(dir.path(), "abc.tmp", 10, 0);
        let image = write_file(dir.path(), "abc.png", 10, 0);

        let result = cleanup_temp_in(&[dir.path().to_path_buf()]);
        assert_eq!(result.files_deleted, 1);
        assert!(!temp.exists());
        assert!(image.exists());
    }

    #[test]
    fn clear_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.png", 10, 0);
        write_file(dir.path(), "b.tmp", 20, 0);

        let result = clear_in(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(result.files_deleted, 2);
        assert_eq!(result.bytes_freed, 30);
        assert_eq!(stats_in(&[dir.path().to_path_buf()]).file_count, 0);
    }
}
