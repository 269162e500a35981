//! Feature modules - business logic separated from UI
//!
//! Each feature module contains the core logic for a specific functionality.
//! Features should not depend on UI components directly.

pub mod image_loader;
pub mod loop_view;
pub mod settings;

pub use settings::Settings;
