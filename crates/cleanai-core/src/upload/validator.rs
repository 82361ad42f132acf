use serde::{Deserialize, Serialize};

use crate::config::UploadConfig;
use crate::session::{FileHandle, MIB, format_mib};

/// Why a selected file was kept out of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub file_name: String,
    pub size_bytes: u64,
    /// Human-readable reason shown inline on the upload page.
    pub reason: String,
}

/// Result of validating one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Outcome of validating a whole selection.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Accepted files, in selection order.
    pub accepted: Vec<FileHandle>,
    pub rejected: Vec<Rejection>,
}

/// Enforces the size limit on selected files.
///
/// File type is filtered by the selection control through its extension
/// list; content format is not re-checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileValidator {
    max_file_bytes: u64,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(MIB)
    }
}

impl FileValidator {
    /// Creates a validator that accepts files strictly smaller than
    /// `max_file_bytes`.
    pub fn new(max_file_bytes: u64) -> Self {
        Self { max_file_bytes }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.max_file_bytes)
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    pub fn validate(&self, candidate: &FileHandle) -> Verdict {
        let size = candidate.size();
        if size < self.max_file_bytes {
            return Verdict::Accepted;
        }

        Verdict::Rejected(Rejection {
            file_name: candidate.name().to_string(),
            size_bytes: size,
            reason: format!(
                "{} is {}; files must be smaller than {}.",
                candidate.name(),
                format_mib(size),
                format_mib(self.max_file_bytes)
            ),
        })
    }

    pub fn validate_batch(&self, candidates: impl IntoIterator<Item = FileHandle>) -> BatchReport {
        let mut report = BatchReport::default();
        for candidate in candidates {
            match self.validate(&candidate) {
                Verdict::Accepted => {
                    tracing::debug!(
                        "[FileValidator] Accepted {} ({} bytes)",
                        candidate.name(),
                        candidate.size()
                    );
                    report.accepted.push(candidate);
                }
                Verdict::Rejected(rejection) => {
                    tracing::info!("[FileValidator] Rejected: {}", rejection.reason);
                    report.rejected.push(rejection);
                }
            }
        }
        report
    }
}
