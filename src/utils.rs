//! Utility functions

use std::path::{Path, PathBuf};

// ============================================================================
// Image Extensions
// ============================================================================

/// Common image file extensions for cache lookup
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "gif", "webp", "bmp"];

/// Find an existing cached image file with any common extension
///
/// # Arguments
/// * `dir` - The directory to search in
/// * `stem` - The filename without extension (e.g., "3f2a9c0e1b7d4a55")
///
/// # Returns
/// The path to the existing file if found, None otherwise
pub fn find_cached_image(dir: &Path, stem: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|p| p.exists())
}

/// Detect image format from magic bytes
/// Returns the correct file extension (without dot)
pub fn detect_image_format(bytes: &[u8]) -> &'static str {
    if bytes.len() < 8 {
        return "jpg"; // Default fallback
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "png";
    }

    // JPEG: FF D8 FF
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "jpg";
    }

    // GIF: 47 49 46 38
    if bytes.starts_with(&[0x47, 0x49, 0x46, 0x38]) {
        return "gif";
    }

    // WebP: 52 49 46 46 ... 57 45 42 50
    if bytes.len() >= 12 && bytes.starts_with(&[0x52, 0x49, 0x46, 0x46]) && &bytes[8..12] == b"WEBP"
    {
        return "webp";
    }

    // BMP: 42 4D
    if bytes.starts_with(&[0x42, 0x4D]) {
        return "bmp";
    }

    "jpg"
}

// ============================================================================
// Paths
// ============================================================================

/// Get the base cache directory for loopview
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loopview")
}

/// Get the remote images cache directory
pub fn images_cache_dir() -> PathBuf {
    cache_dir().join("images")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_formats() {
        assert_eq!(
            detect_image_format(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]),
            "png"
        );
        assert_eq!(
            detect_image_format(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0]),
            "jpg"
        );
        assert_eq!(detect_image_format(b"GIF89a\0\0\0"), "gif");
        assert_eq!(detect_image_format(b"RIFF\x10\0\0\0WEBPVP8 "), "webp");
        assert_eq!(detect_image_format(b"BM\0\0\0\0\0\0\0\0"), "bmp");
    }

    #[test]
    fn short_or_unknown_input_falls_back_to_jpg() {
        assert_eq!(detect_image_format(&[]), "jpg");
        assert_eq!(detect_image_format(b"\x89PNG"), "jpg");
        assert_eq!(detect_image_format(b"plain text here"), "jpg");
    }

    #[test]
    fn finds_cached_image_with_any_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_cached_image(dir.path(), "abc"), None);

        let path = dir.path().join("abc.webp");
        std::fs::write(&path, b"x").unwrap();
        assert_eq!(find_cached_image(dir.path(), "abc"), Some(path));
        assert_eq!(find_cached_image(dir.path(), "abd"), None);
    }

    #[test]
    fn images_dir_is_under_cache_dir() {
        assert!(images_cache_dir().starts_with(cache_dir()));
        assert!(cache_dir().ends_with("loopview"));
    }
}
