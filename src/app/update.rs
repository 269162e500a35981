//! Message update handlers - thin dispatcher delegating to submodules

mod loop_view;
mod storage;
mod window;

use iced::Task;

use super::{App, Message};

impl App {
    /// Handle messages by delegating to appropriate submodule handlers
    pub fn update(&mut self, message: Message) -> Task<Message> {
        if let Some(task) = self.handle_loop_view(&message) {
            return task;
        }
        if let Some(task) = self.handle_storage(&message) {
            return task;
        }
        if let Some(task) = self.handle_window(&message) {
            return task;
        }

        // Default: no task
        Task::none()
    }
}
