//! Image upload module for Markpad
//!
//! Picked images are pushed to an object-storage bucket on a worker thread
//! and embedded in the document by their public URL.

mod naming;
mod storage;
mod worker;

pub use storage::HttpStorageClient;
pub use worker::{ImageUploader, UploadOutcome};
