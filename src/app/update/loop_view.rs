// src/app/update/loop_view.rs
//! Carousel message handlers

use iced::Task;
use tracing::{debug, info, warn};

use crate::app::message::Message;
use crate::app::state::App;

impl App {
    /// Handle carousel-related messages
    pub fn handle_loop_view(&mut self, message: &Message) -> Option<Task<Message>> {
        match message {
            Message::LoopView(event) => {
                let (task, selected) = self.ui.loop_view.update(event.clone());
                let task = task.map(Message::LoopView);
                Some(match selected {
                    Some(selected) => Task::batch([task, Task::done(selected)]),
                    None => task,
                })
            }

            Message::ImageSelected(index) => {
                info!("Gallery image {} selected", index);
                self.ui.last_selected = Some(*index);
                let caption = self
                    .core
                    .settings
                    .gallery
                    .get(*index)
                    .and_then(|item| item.caption.as_deref());
                self.ui.status = Some(match caption {
                    Some(caption) => format!("Selected #{}: {}", index + 1, caption),
                    None => format!("Selected #{}", index + 1),
                });
                Some(Task::none())
            }

            Message::CycleCaptionPosition => {
                let position = self.ui.loop_view.caption_position().next();
                debug!("Caption position -> {}", position);
                self.ui.loop_view.set_caption_position(position);
                self.core.settings.loop_view.caption_position = position;
                Some(Task::done(Message::SaveSettings))
            }

            Message::CycleIndicatorPosition => {
                let position = self.ui.loop_view.indicator_position().next();
                debug!("Indicator position -> {}", position);
                self.ui.loop_view.set_indicator_position(position);
                self.core.settings.loop_view.indicator_position = position;
                Some(Task::done(Message::SaveSettings))
            }

            Message::ToggleTimer => {
                if self.ui.loop_view.is_timer_running() {
                    self.ui.loop_view.stop_timer();
                } else {
                    self.ui.loop_view.start_timer();
                }
                Some(Task::none())
            }

            Message::ReloadGallery => Some(self.show_gallery()),

            Message::SaveSettings => {
                if let Err(e) = self.core.settings.save() {
                    warn!("Failed to save settings: {}", e);
                }
                Some(Task::none())
            }

            _ => None,
        }
    }
}
