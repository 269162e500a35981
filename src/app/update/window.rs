// src/app/update/window.rs
//! Window message handlers

use iced::Task;

use crate::app::layout_logic;
use crate::app::message::Message;
use crate::app::state::App;

impl App {
    /// Handle window-related messages
    pub fn handle_window(&mut self, message: &Message) -> Option<Task<Message>> {
        match message {
            Message::WindowResized(size) => {
                let old = std::mem::replace(&mut self.core.window_size, *size);
                if layout_logic::needs_relayout(old.width, size.width) {
                    self.ui
                        .loop_view
                        .set_page_width(layout_logic::page_width(size.width));
                    self.ui.loop_view.relayout();
                }
                Some(Task::none())
            }

            Message::Noop => Some(Task::none()),

            _ => None,
        }
    }
}
