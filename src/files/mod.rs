//! File dialogs module for Markpad
//!
//! Native dialogs for choosing where exports go and which image to upload.

mod dialogs;

pub use dialogs::{pick_image_dialog, save_export_dialog};
