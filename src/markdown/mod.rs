//! Markdown parsing, rendering, and preview module
//!
//! This module provides markdown parsing and HTML rendering using the comrak
//! library (CommonMark + GFM, superscript, subscript and dollar math), plus a
//! read-only egui preview with syntect-highlighted code blocks.
//!
//! # Example
//! ```ignore
//! use crate::markdown::{render_to_html, MarkdownPreview, PreviewCache};
//!
//! let html = render_to_html("# Hello\n\nThis is **bold** text.");
//! let doc = cache.get(document.content_version(), &document.content);
//! MarkdownPreview::new(doc).show(ui);
//! ```

mod parser;
mod preview;
mod syntax;

pub use parser::render_to_html;
pub use preview::{MarkdownPreview, PreviewCache};
