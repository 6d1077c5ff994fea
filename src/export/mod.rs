//! Document Export Module for Markpad
//!
//! This module exports the buffer either as raw markdown or as a standalone
//! HTML page, and delivers the result to disk.
//!
//! # Architecture
//!
//! - `options.rs` - Export formats and the artifact type
//! - `html.rs` - HTML document generation with direction-aware styling
//! - `file.rs` - Markdown export and staged file writing

mod file;
mod html;
mod options;

pub use file::{export_markdown, write_artifact};
pub use html::export_html;
pub use options::ExportFormat;
