// src/app/state.rs
//! Application state definitions

use std::sync::Arc;

use iced::Size;

use crate::cache::CacheStats;
use crate::features::Settings;
use crate::features::image_loader::ImageLoader;
use crate::ui::components::LoopViewState;

use super::message::Message;

/// Main application state
pub struct App {
    /// Core infrastructure (settings, image loader, cache)
    pub core: CoreState,
    /// UI state (carousel, status line)
    pub ui: UiState,
}

/// Core Infrastructure & Services
pub struct CoreState {
    pub settings: Settings,
    pub loader: Arc<ImageLoader>,
    /// Image cache usage, known once startup maintenance ran
    pub cache_stats: Option<CacheStats>,
    pub window_size: Size,
}

/// UI state
pub struct UiState {
    pub loop_view: LoopViewState<Message>,
    /// Real index of the last tapped page
    pub last_selected: Option<usize>,
    /// One-line status shown under the carousel
    pub status: Option<String>,
}

impl CoreState {
    pub fn new(settings: Settings, window_size: Size) -> Self {
        Self {
            settings,
            loader: Arc::new(ImageLoader::default()),
            cache_stats: None,
            window_size,
        }
    }
}

impl UiState {
    pub fn new(core: &CoreState, loop_view_height: f32) -> Self {
        let loop_view = LoopViewState::new(
            Arc::clone(&core.loader),
            core.settings.loop_view.caption_position,
            core.settings.loop_view.indicator_position,
        )
        .height(loop_view_height);

        Self {
            loop_view,
            last_selected: None,
            status: None,
        }
    }
}
