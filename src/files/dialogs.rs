//! Native file dialog integration using the rfd crate
//!
//! This module provides the save dialog used by exports and the picker used
//! by image upload.

use crate::config::Direction;
use crate::export::ExportFormat;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Image types accepted by the upload picker.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "ico", "tif", "tiff"];

/// Opens a native save dialog for an export.
///
/// The dialog is pre-filled with the format's suggested file name.
/// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
pub fn save_export_dialog(
    format: ExportFormat,
    initial_dir: Option<&Path>,
    direction: Direction,
) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title(format.label(direction))
        .set_file_name(format.file_name())
        .add_filter(format.filter_name(), &[format.extension()])
        .add_filter("All Files", &["*"]);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file()
}

/// Opens a native file dialog for picking an image to upload.
///
/// Returns `Some(PathBuf)` if a file was selected, `None` if cancelled.
pub fn pick_image_dialog(initial_dir: Option<&Path>, direction: Direction) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title(direction.pick("Upload Image", "رفع صورة"))
        .add_filter(direction.pick("Images", "صور"), IMAGE_EXTENSIONS);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}
