// src/app/view.rs
//! Application view rendering

use iced::widget::{Space, button, column, container, row, text};
use iced::{Alignment, Element, Fill, Padding};

use super::message::Message;
use super::{App, CONTENT_PADDING};
use crate::ui::theme;

impl App {
    /// Build the window content
    pub fn view(&self) -> Element<'_, Message> {
        let loop_view = self.ui.loop_view.view().map(Message::LoopView);

        let status = self
            .ui
            .status
            .clone()
            .unwrap_or_else(|| "Tap an image to select it".to_string());

        let cache_line = match &self.core.cache_stats {
            Some(stats) => format!(
                "Image cache: {} files, {} MB",
                stats.file_count,
                stats.total_mb()
            ),
            None => "Image cache: checking...".to_string(),
        };

        let info = column![
            text(status).size(16),
            text(cache_line)
                .size(12)
                .style(|t: &iced::Theme| text::Style {
                    color: Some(theme::text_secondary(t))
                }),
        ]
        .spacing(4);

        let timer_label = if self.ui.loop_view.is_timer_running() {
            "Pause"
        } else {
            "Resume"
        };

        let controls = row![
            control(
                format!("Caption: {}", self.ui.loop_view.caption_position()),
                Message::CycleCaptionPosition
            ),
            control(
                format!("Indicator: {}", self.ui.loop_view.indicator_position()),
                Message::CycleIndicatorPosition
            ),
            control(timer_label.to_string(), Message::ToggleTimer),
            Space::new().width(Fill),
            control("Reload".to_string(), Message::ReloadGallery),
            control("Clear cache".to_string(), Message::ClearCache),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        container(
            column![loop_view, info, controls]
                .spacing(20)
                .padding(Padding::new(CONTENT_PADDING)),
        )
        .width(Fill)
        .height(Fill)
        .style(theme::app_background)
        .into()
    }
}

fn control<'a>(label: String, message: Message) -> Element<'a, Message> {
    button(text(label).size(13))
        .padding(Padding::new(8.0).left(16).right(16))
        .style(theme::control_button)
        .on_press(message)
        .into()
}
