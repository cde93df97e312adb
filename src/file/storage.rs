//! On-disk storage for applicant uploads.
//!
//! Files are grouped by owner and named by a fresh UUID:
//! ```text
//! {base_path}/
//! ├── 0190f0a6-.../
//! │   ├── 3f2c...-....png
//! │   └── 9ab1...-....jpg
//! └── ...
//! ```
//! Client-supplied filenames never reach the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::Result;

/// Image formats accepted for upload, identified by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

impl ImageKind {
    /// Detect the format from the leading bytes. The declared content type
    /// and filename are ignored.
    pub fn sniff(content: &[u8]) -> Option<Self> {
        if content.starts_with(PNG_MAGIC) {
            Some(ImageKind::Png)
        } else if content.starts_with(JPEG_MAGIC) {
            Some(ImageKind::Jpeg)
        } else {
            None
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }

    /// Preferred file extension for this format.
    pub fn extension(self) -> &'static str {
        mime_guess::get_mime_extensions_str(self.mime_type())
            .and_then(|exts| exts.iter().find(|e| matches!(**e, "png" | "jpg")))
            .copied()
            .unwrap_or(match self {
                ImageKind::Png => "png",
                ImageKind::Jpeg => "jpg",
            })
    }
}

/// Result of writing an upload to disk.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: Uuid,
    pub path: PathBuf,
    /// Hex SHA-256 of the content.
    pub sha256: String,
}

/// Storage service for uploaded files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `base_path`, creating the directory.
    ///
    /// The root is canonicalized so stored paths are absolute.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        let base_path = fs::canonicalize(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Directory holding a user's uploads.
    pub fn user_dir(&self, user_id: Uuid) -> PathBuf {
        self.base_path.join(user_id.to_string())
    }

    /// Write `content` into the owner's directory under a new name.
    pub fn save(&self, user_id: Uuid, content: &[u8], kind: ImageKind) -> Result<StoredFile> {
        let dir = self.user_dir(user_id);
        fs::create_dir_all(&dir)?;

        let id = Uuid::new_v4();
        let path = dir.join(format!("{id}.{}", kind.extension()));
        fs::write(&path, content)?;

        Ok(StoredFile {
            id,
            path,
            sha256: format!("{:x}", Sha256::digest(content)),
        })
    }

    /// Remove a stored file. Returns false if it was already gone.
    pub fn delete(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
