// src/app/update/storage.rs
//! Image cache message handlers

use iced::Task;
use tracing::{error, info};

use crate::app::helpers;
use crate::app::message::Message;
use crate::app::state::App;

impl App {
    /// Handle cache-related messages
    pub fn handle_storage(&mut self, message: &Message) -> Option<Task<Message>> {
        match message {
            Message::CachePrepared(result) => {
                match result {
                    Ok(stats) => self.core.cache_stats = Some(stats.clone()),
                    Err(e) => error!("Cache maintenance failed: {}", e),
                }
                Some(self.show_gallery())
            }

            Message::ClearCache => {
                Some(Task::perform(helpers::clear_cache(), |result| {
                    Message::CacheCleared(result.map_err(|e| e.to_string()))
                }))
            }

            Message::CacheCleared(result) => {
                match result {
                    Ok(cleared) => {
                        info!("Cleared {} cached images", cleared.files_deleted);
                        self.core.cache_stats = Some(Default::default());
                        self.ui.status =
                            Some(format!("Cache cleared, {} MB freed", cleared.mb_freed()));
                    }
                    Err(e) => {
                        error!("Failed to clear cache: {}", e);
                        self.ui.status = Some(format!("Cache clear failed: {}", e));
                    }
                }
                self.ui.loop_view.forget_images();
                Some(self.show_gallery())
            }

            _ => None,
        }
    }
}
