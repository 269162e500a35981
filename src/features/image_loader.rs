//! Remote image loading with an on-disk cache
//!
//! Images are stored under the cache directory, keyed by a hash of their URL.
//! The file extension follows the downloaded bytes, not the URL.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;
use reqwest::StatusCode;
use reqwest::header::IF_MODIFIED_SINCE;
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::utils::{detect_image_format, find_cached_image, images_cache_dir};

/// Per-request behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// Revalidate a cached copy with the server before using it
    pub refresh_cached: bool,
    /// Try again even if this URL failed before
    pub retry_failed: bool,
}

impl LoadOptions {
    pub const REFRESH_AND_RETRY: Self = Self {
        refresh_cached: true,
        retry_failed: true,
    };
}

/// A cached image ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Loads and caches remote images
#[derive(Debug)]
pub struct ImageLoader {
    client: reqwest::Client,
    dir: PathBuf,
    /// URLs whose last attempt failed
    failed: Mutex<HashSet<String>>,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(images_cache_dir())
    }
}

impl ImageLoader {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            dir,
            failed: Mutex::new(HashSet::new()),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.dir
    }

    /// File stem used for `url` in the cache
    pub fn cache_key(url: &str) -> String {
        format!("{:016x}", xxh3_64(url.as_bytes()))
    }

    /// Fetch `url`, going through the cache
    pub async fn load(&self, url: &str, options: LoadOptions) -> Result<LoadedImage, LoaderError> {
        if url.is_empty() {
            return Err(LoaderError::InvalidUrl);
        }

        if !options.retry_failed && self.failed.lock().contains(url) {
            return Err(LoaderError::Blacklisted);
        }

        let result = match self.fetch(url, options).await {
            Ok(path) => read_dimensions(path),
            Err(e) => Err(e),
        };

        match &result {
            Ok(image) => {
                self.failed.lock().remove(url);
                debug!(
                    "Loaded {} -> {:?} ({}x{})",
                    url, image.path, image.width, image.height
                );
            }
            Err(e) => {
                warn!("Failed to load image {}: {}", url, e);
                self.failed.lock().insert(url.to_string());
            }
        }

        result
    }

    async fn fetch(&self, url: &str, options: LoadOptions) -> Result<PathBuf, LoaderError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| LoaderError::Io(e.to_string()))?;

        let stem = Self::cache_key(url);
        let cached = find_cached_image(&self.dir, &stem);

        if let Some(path) = &cached {
            if !options.refresh_cached {
                return Ok(path.clone());
            }
        }

        let mut request = self.client.get(url);
        if let Some(since) = cached.as_deref().and_then(modified_since) {
            request = request.header(IF_MODIFIED_SINCE, since);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return match cached {
                    Some(path) => {
                        debug!("Revalidation of {} failed ({}), using cached copy", url, e);
                        Ok(path)
                    }
                    None => Err(LoaderError::Http(e.to_string())),
                };
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            if let Some(path) = cached {
                return Ok(path);
            }
        }
        if !status.is_success() {
            return match cached {
                Some(path) => {
                    debug!("Revalidation of {} returned {}, using cached copy", url, status);
                    Ok(path)
                }
                None => Err(LoaderError::Status(status.as_u16())),
            };
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoaderError::Http(e.to_string()))?;

        self.store(&stem, &bytes, cached.as_deref()).await
    }

    /// Write through a temp file so readers never see a partial image
    async fn store(
        &self,
        stem: &str,
        bytes: &[u8],
        previous: Option<&Path>,
    ) -> Result<PathBuf, LoaderError> {
        let temp_path = self.dir.join(format!("{}.tmp", stem));
        let final_path = self
            .dir
            .join(format!("{}.{}", stem, detect_image_format(bytes)));

        if let Err(e) = tokio::fs::write(&temp_path, bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(LoaderError::Io(e.to_string()));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(LoaderError::Io(e.to_string()));
        }

        // Format changed on the server side, drop the stale copy
        if let Some(previous) = previous.filter(|p| *p != final_path.as_path()) {
            let _ = tokio::fs::remove_file(previous).await;
        }

        Ok(final_path)
    }
}

fn read_dimensions(path: PathBuf) -> Result<LoadedImage, LoaderError> {
    match image::image_dimensions(&path) {
        Ok((width, height)) => Ok(LoadedImage {
            path,
            width,
            height,
        }),
        Err(e) => {
            // Undecodable bytes would otherwise be served from cache forever
            let _ = std::fs::remove_file(&path);
            Err(LoaderError::Decode(e.to_string()))
        }
    }
}

/// HTTP date of the cached file's modification time
fn modified_since(path: &Path) -> Option<String> {
    let modified: SystemTime = std::fs::metadata(path).ok()?.modified().ok()?;
    let modified: chrono::DateTime<chrono::Utc> = modified.into();
    Some(modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

/// Image loading errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    InvalidUrl,
    Io(String),
    Http(String),
    Status(u16),
    Decode(String),
    /// The URL failed before and retrying was not requested
    Blacklisted,
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::InvalidUrl => write!(f, "Invalid image URL"),
            LoaderError::Io(e) => write!(f, "Image cache IO error: {}", e),
            LoaderError::Http(e) => write!(f, "Image request failed: {}", e),
            LoaderError::Status(code) => write!(f, "Image request returned status {}", code),
            LoaderError::Decode(e) => write!(f, "Image decode error: {}", e),
            LoaderError::Blacklisted => write!(f, "Image previously failed to load"),
        }
    }
}

impl std::error::Error for LoaderError {}
