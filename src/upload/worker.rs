//! Background image uploads
//!
//! One upload runs at a time on a worker thread. The UI thread polls for the
//! result each frame and never blocks on the network.

use super::naming::object_name;
use super::storage::StorageClient;
use crate::editor::{Document, Selection};
use crate::error::{Error, Result};
use crate::string_utils::char_len;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

// ─────────────────────────────────────────────────────────────────────────────
// Upload Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a finished upload.
#[derive(Debug)]
pub struct UploadOutcome {
    /// Name of the picked file, used as the image alt text
    pub file_name: String,
    /// Public URL of the uploaded image
    pub result: Result<String>,
}

impl UploadOutcome {
    /// Insert `![file_name](url)` at `selection` when the upload succeeded.
    ///
    /// The selection moves right with the text it covered. A failed upload
    /// leaves the document and the selection untouched and returns the error.
    pub fn apply(self, document: &mut Document, selection: &mut Option<Selection>) -> Result<bool> {
        let url = self.result?;
        let markdown = format!("![{}]({})", self.file_name, url);
        if !document.insert(*selection, &markdown, "") {
            return Ok(false);
        }
        *selection = selection.map(|s| s.shifted(char_len(&markdown)));
        Ok(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Image Uploader
// ─────────────────────────────────────────────────────────────────────────────

struct PendingUpload {
    file_name: String,
    receiver: Receiver<UploadOutcome>,
}

/// Runs image uploads off the UI thread.
pub struct ImageUploader {
    client: Arc<dyn StorageClient>,
    pending: Option<PendingUpload>,
}

impl ImageUploader {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            pending: None,
        }
    }

    /// Whether an upload is in flight (or finished but not yet polled).
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Start uploading the image at `path`.
    ///
    /// Returns `false` without touching the file or the network while
    /// another upload is pending. Read and validation failures are reported
    /// through [`poll`](Self::poll) like any other failure.
    pub fn start(&mut self, path: &Path) -> bool {
        if self.is_busy() {
            debug!("Upload of {} rejected: another upload is pending", path.display());
            return false;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let (sender, receiver) = channel();

        match read_image(path, &file_name) {
            Ok((bytes, content_type)) => {
                let client = Arc::clone(&self.client);
                let name = object_name(&file_name);
                let alt = file_name.clone();
                info!("Uploading {} as {}", file_name, name);

                thread::spawn(move || {
                    let result = client.upload(&name, bytes, content_type);
                    let _ = sender.send(UploadOutcome {
                        file_name: alt,
                        result,
                    });
                });
            }
            Err(e) => {
                let _ = sender.send(UploadOutcome {
                    file_name: file_name.clone(),
                    result: Err(e),
                });
            }
        }

        self.pending = Some(PendingUpload {
            file_name,
            receiver,
        });
        true
    }

    /// Check for a finished upload without blocking.
    pub fn poll(&mut self) -> Option<UploadOutcome> {
        let pending = self.pending.as_ref()?;
        let outcome = match pending.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => UploadOutcome {
                file_name: pending.file_name.clone(),
                result: Err(Error::Application(
                    "upload worker stopped unexpectedly".to_string(),
                )),
            },
        };

        self.pending = None;
        if let Err(e) = &outcome.result {
            warn!("Upload of {} failed: {}", outcome.file_name, e);
        }
        Some(outcome)
    }
}

/// Read the file and check that it is an image.
fn read_image(path: &Path, file_name: &str) -> Result<(Vec<u8>, &'static str)> {
    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes)
        .map_err(|_| Error::UnsupportedImage(file_name.to_string()))?;
    Ok((bytes, format.to_mime_type()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
