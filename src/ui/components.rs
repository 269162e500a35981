//! UI Components module - composite widgets with their own event handling
//!
//! # Design Principles
//!
//! - **Self-contained**: each component owns its state and emits its own events
//! - **Host-agnostic**: components never import from `crate::app`; hosts map
//!   component events into their messages
//! - **Logic elsewhere**: state machines live in `crate::features`

pub mod loop_view;
pub mod loop_view_cell;

pub use loop_view::{Event as LoopViewEvent, LoopViewState};
