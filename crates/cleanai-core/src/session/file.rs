//! Selected dataset files.

use bytes::Bytes;

/// Number of bytes in one mebibyte.
pub const MIB: u64 = 1_048_576;

/// A file chosen by the visitor in the selection control.
///
/// The content is reference counted, so cloning a handle never copies the
/// file. Handles are not mutated after validation; a new upload submission
/// replaces the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    name: String,
    size: u64,
    content: Bytes,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// A file that was measured while streaming but whose content was
    /// dropped because it had already passed the size limit.
    pub fn discarded(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            content: Bytes::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

/// Formats a byte count as mebibytes with two decimals, e.g. `2.00 MB`.
pub fn format_mib(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / MIB as f64)
}
