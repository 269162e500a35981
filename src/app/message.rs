//! Application messages

use iced::Size;

use crate::cache::{CacheStats, ClearResult};
use crate::ui::components::LoopViewEvent;

/// Application messages
#[derive(Clone)]
pub enum Message {
    /// No-op message
    Noop,

    // ============ Loop view ============
    /// Event for the carousel
    LoopView(LoopViewEvent),
    /// A carousel page was tapped (real index)
    ImageSelected(usize),
    /// Move the caption to its next placement
    CycleCaptionPosition,
    /// Move the page indicator to its next placement
    CycleIndicatorPosition,
    /// Pause or resume auto-advance
    ToggleTimer,
    /// Show the gallery from settings again
    ReloadGallery,

    // ============ Settings ============
    /// Save settings
    SaveSettings,

    // ============ Storage ============
    /// Startup cache maintenance finished
    CachePrepared(Result<CacheStats, String>),
    /// Clear the image cache
    ClearCache,
    /// Cache clear finished
    CacheCleared(Result<ClearResult, String>),

    // ============ Window ============
    /// Window resized
    WindowResized(Size),
}

// Manual Debug implementation to keep high-frequency ticks short in logs
impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        macro_rules! simple {
            ($name:literal) => { write!(f, $name) };
            ($name:literal, $($arg:tt)*) => { write!(f, concat!($name, "({})"), format_args!($($arg)*)) };
        }

        match self {
            Self::Noop => simple!("Noop"),
            Self::LoopView(LoopViewEvent::ImageLoaded(url, result)) => {
                simple!("LoopView::ImageLoaded", "{}, ok={}", url, result.is_ok())
            }
            Self::LoopView(LoopViewEvent::CursorMoved(_)) => simple!("LoopView::CursorMoved"),
            Self::LoopView(event) => simple!("LoopView", "{:?}", event),
            Self::ImageSelected(i) => simple!("ImageSelected", "{}", i),
            Self::CycleCaptionPosition => simple!("CycleCaptionPosition"),
            Self::CycleIndicatorPosition => simple!("CycleIndicatorPosition"),
            Self::ToggleTimer => simple!("ToggleTimer"),
            Self::ReloadGallery => simple!("ReloadGallery"),
            Self::SaveSettings => simple!("SaveSettings"),
            Self::CachePrepared(r) => simple!("CachePrepared", "ok={}", r.is_ok()),
            Self::ClearCache => simple!("ClearCache"),
            Self::CacheCleared(r) => simple!("CacheCleared", "ok={}", r.is_ok()),
            Self::WindowResized(size) => {
                simple!("WindowResized", "{}x{}", size.width, size.height)
            }
        }
    }
}
