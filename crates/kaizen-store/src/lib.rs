// ABOUTME: Storage layer for kaizen, holding uploaded files on local disk.
// ABOUTME: Saves files keyed by name and extracts text from plain-text-like uploads.

pub mod uploads;

pub use uploads::{StoredUpload, TEXT_EXTENSIONS, UploadError, UploadStore, is_text_file};
