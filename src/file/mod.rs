//! Uploaded file handling.

mod storage;

pub use storage::{FileStorage, ImageKind, StoredFile};
