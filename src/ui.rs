//! UI module for the loop view and its demo window
//!
//! # Architecture
//!
//! - **Components** (`components`): the loop view and its cells
//! - **Theme** (`theme`): colors and widget styles

pub mod components;
pub mod theme;
