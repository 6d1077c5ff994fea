//! Editor module for Markpad
//!
//! This module contains the document buffer, the snippet insertion engine,
//! the toolbar command table and the text editor widget.

mod buffer;
mod commands;
mod widget;

pub use buffer::{Document, Selection, TABLE_TEMPLATE};
pub use commands::{command_for_shortcut, commands_in, CommandAction, ToolbarCommand, ToolbarGroup};
pub use widget::EditorWidget;

#[cfg(test)]
pub use commands::command;
