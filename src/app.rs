//! Main application module
//!
//! A small host window around the loop view: shows the gallery from
//! settings, reports selections and lets the placements be cycled.

pub mod helpers;
mod message;
mod state;
mod update;
mod view;

use std::sync::Arc;

use iced::{Size, Task, Theme};

use crate::features::Settings;
use crate::features::loop_view::OnSelect;
pub use message::Message;
pub use state::{App, CoreState, UiState};

/// Initial window size
pub const WINDOW_SIZE: Size = Size::new(960.0, 600.0);
/// Height of the carousel pages
pub const LOOP_VIEW_HEIGHT: f32 = 320.0;
/// Space around the carousel
pub const CONTENT_PADDING: f32 = 24.0;

impl App {
    /// Create new application instance
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let max_cache_mb = settings.storage.max_cache_mb;

        let core = CoreState::new(settings, WINDOW_SIZE);
        let mut ui = UiState::new(&core, LOOP_VIEW_HEIGHT);
        ui.loop_view
            .set_page_width(layout_logic::page_width(WINDOW_SIZE.width));

        tracing::info!(
            "Starting with {} gallery images",
            core.settings.gallery.len()
        );

        // The gallery is shown once the cache is trimmed, so cleanup never
        // races a download
        let init_task = Task::perform(helpers::prepare_cache(max_cache_mb), |result| {
            Message::CachePrepared(result.map_err(|e| e.to_string()))
        });

        (Self { core, ui }, init_task)
    }

    /// Hand the gallery from settings to the loop view
    pub fn show_gallery(&mut self) -> Task<Message> {
        let (urls, tips) = self.core.settings.gallery_lists();
        let on_select: OnSelect<Message> = Arc::new(Message::ImageSelected);

        self.ui
            .loop_view
            .show_images(
                urls,
                tips,
                self.core.settings.loop_view.interval(),
                Some(on_select),
            )
            .map(Message::LoopView)
    }

    /// Application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Window title with the visible page
    pub fn title(&self) -> String {
        let count = self.ui.loop_view.page_count();
        if count == 0 {
            "LoopView".to_string()
        } else {
            format!(
                "LoopView - {}/{}",
                self.ui.loop_view.current_page() + 1,
                count
            )
        }
    }

    /// Subscriptions for the carousel timer, animation frames and window resizes
    pub fn subscription(&self) -> iced::Subscription<Message> {
        let loop_view_sub = self.ui.loop_view.subscription().map(Message::LoopView);

        let resize_sub =
            iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size));

        iced::Subscription::batch([loop_view_sub, resize_sub])
    }
}

/// Size calculations kept separate for testability
pub mod layout_logic {
    use super::CONTENT_PADDING;

    /// Width of one carousel page for a window of `window_width`
    pub fn page_width(window_width: f32) -> f32 {
        (window_width - CONTENT_PADDING * 2.0).max(1.0)
    }

    /// Whether a resize changes the page width enough to relayout
    pub fn needs_relayout(old_width: f32, new_width: f32) -> bool {
        (page_width(old_width) - page_width(new_width)).abs() >= 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::layout_logic::*;
    use super::CONTENT_PADDING;

    #[test]
    fn page_width_subtracts_padding() {
        assert_eq!(page_width(1000.0), 1000.0 - CONTENT_PADDING * 2.0);
    }

    #[test]
    fn page_width_never_collapses() {
        assert_eq!(page_width(0.0), 1.0);
        assert_eq!(page_width(CONTENT_PADDING), 1.0);
    }

    #[test]
    fn relayout_only_on_width_change() {
        assert!(!needs_relayout(800.0, 800.0));
        assert!(!needs_relayout(800.0, 800.2));
        assert!(needs_relayout(800.0, 640.0));
    }
}
