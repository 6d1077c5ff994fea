//! UI components for Markpad
//!
//! This module contains the header bar and the formatting toolbar.

mod header;
mod toolbar;

pub use header::{app_title, show_header, HeaderAction};
pub use toolbar::{Toolbar, ToolbarAction, ToolbarState};
