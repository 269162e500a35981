//! Application settings persistence
//!
//! Handles saving and loading the carousel defaults and the demo gallery.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::loop_view::{CaptionPosition, DEFAULT_INTERVAL, IndicatorPosition};

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Carousel behavior and layout
    #[serde(default)]
    pub loop_view: LoopViewSettings,
    /// Images shown by the demo window
    #[serde(default = "default_gallery")]
    pub gallery: Vec<GalleryItem>,
    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Carousel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopViewSettings {
    /// Seconds between automatic page advances
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,
    #[serde(default)]
    pub caption_position: CaptionPosition,
    #[serde(default)]
    pub indicator_position: IndicatorPosition,
}

fn default_interval_secs() -> f64 {
    DEFAULT_INTERVAL.as_secs_f64()
}

impl Default for LoopViewSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            caption_position: CaptionPosition::default(),
            indicator_position: IndicatorPosition::default(),
        }
    }
}

impl LoopViewSettings {
    /// Auto-advance interval, falling back to the default for unusable values
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_INTERVAL)
    }
}

/// One image of the demo gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

fn default_gallery() -> Vec<GalleryItem> {
    [
        ("https://picsum.photos/id/1015/1200/500", "River valley"),
        ("https://picsum.photos/id/1018/1200/500", "Mountain range"),
        ("https://picsum.photos/id/1039/1200/500", "Waterfall"),
        ("https://picsum.photos/id/1043/1200/500", "Forest path"),
    ]
    .into_iter()
    .map(|(url, caption)| GalleryItem {
        url: url.to_string(),
        caption: Some(caption.to_string()),
    })
    .collect()
}

/// Storage-related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Maximum image cache size in MB
    #[serde(default = "default_max_cache_mb")]
    pub max_cache_mb: u64,
}

fn default_max_cache_mb() -> u64 {
    256
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            max_cache_mb: default_max_cache_mb(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            loop_view: LoopViewSettings::default(),
            gallery: default_gallery(),
            storage: StorageSettings::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "loopview", "LoopView")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return defaults if not found
    pub fn load() -> Self {
        Self::file_path()
            .and_then(|path| match Self::load_from_file(&path) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    tracing::debug!("Using default settings ({}): {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SettingsError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Save settings to the default file
    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(path) = Self::file_path() {
            self.save_to_file(&path)
        } else {
            Err(SettingsError::Io(
                "Could not determine config directory".to_string(),
            ))
        }
    }

    /// Save settings to a specific file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Io(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| SettingsError::Io(e.to_string()))?;
        Ok(())
    }

    /// Gallery URLs and captions in the shape the loop view expects
    ///
    /// Captions are only passed when every item has one.
    pub fn gallery_lists(&self) -> (Vec<String>, Option<Vec<String>>) {
        let urls = self.gallery.iter().map(|item| item.url.clone()).collect();
        let tips = self
            .gallery
            .iter()
            .map(|item| item.caption.clone())
            .collect::<Option<Vec<_>>>();
        (urls, tips.filter(|tips| !tips.is_empty()))
    }
}

/// Errors that can occur with settings
#[derive(Debug, Clone)]
pub enum SettingsError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_usable() {
        let settings = Settings::default();
        assert_eq!(settings.loop_view.interval(), DEFAULT_INTERVAL);
        assert_eq!(settings.storage.max_cache_mb, 256);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "loop_view": { "caption_position": "split" } }"#).unwrap();
        assert_eq!(settings.loop_view.caption_position, CaptionPosition::Split);
        assert_eq!(
            settings.loop_view.indicator_position,
            IndicatorPosition::Center
        );
        assert_eq!(settings.loop_view.interval_secs, 5.0);
        assert_eq!(settings.gallery, default_gallery());
    }

    #[test]
    fn unusable_interval_uses_default() {
        for secs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let settings = LoopViewSettings {
                interval_secs: secs,
                ..Default::default()
            };
            assert_eq!(settings.interval(), DEFAULT_INTERVAL, "secs={}", secs);
        }

        let settings = LoopViewSettings {
            interval_secs: 2.5,
            ..Default::default()
        };
        assert_eq!(settings.interval(), Duration::from_millis(2500));
    }

    #[test]
    fn gallery_lists_drop_partial_captions() {
        let mut settings = Settings {
            gallery: vec![
                GalleryItem {
                    url: "a".into(),
                    caption: Some("first".into()),
                },
                GalleryItem {
                    url: "b".into(),
                    caption: None,
                },
            ],
            ..Default::default()
        };
        let (urls, tips) = settings.gallery_lists();
        assert_eq!(urls, ["a", "b"]);
        assert_eq!(tips, None);

        settings.gallery[1].caption = Some("second".into());
        let (_, tips) = settings.gallery_lists();
        assert_eq!(tips, Some(vec!["first".to_string(), "second".to_string()]));
    }

    #[test]
    fn save_and_load_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.loop_view.indicator_position = IndicatorPosition::Right;
        settings.save_to_file(&path).unwrap();

        assert_eq!(Settings::load_from_file(&path).unwrap(), settings);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Settings::load_from_file(&path),
            Err(SettingsError::Parse(_))
        ));
    }
}
