//! Contract of the dataset processing backend.
//!
//! The backend receives the accepted files plus a free-text instruction and
//! answers with a short report. Its result becomes an assistant message when
//! the session moves from `loading` to `chat`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::FileHandle;

/// Structured result returned by the processing backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub message: String,
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub columns: Option<u64>,
    #[serde(default)]
    pub command_used: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ProcessingReport {
    /// Renders the report as the text of an assistant message.
    pub fn summary(&self) -> String {
        let mut summary = self.message.clone();
        if let (Some(rows), Some(columns)) = (self.rows, self.columns) {
            summary.push_str(&format!(" The result has {rows} rows and {columns} columns."));
        }
        if let Some(url) = &self.download_url {
            summary.push_str(&format!(" Download it from {url}"));
        }
        summary
    }
}

#[async_trait]
pub trait DatasetProcessor: Send + Sync {
    /// Submits the files and instruction. `Ok(None)` means there is nothing
    /// to report back to the chat.
    async fn process(
        &self,
        files: &[FileHandle],
        instruction: &str,
    ) -> Result<Option<ProcessingReport>>;
}

/// Used when no backend is configured: resolves at once with no report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateProcessor;

#[async_trait]
impl DatasetProcessor for ImmediateProcessor {
    async fn process(
        &self,
        files: &[FileHandle],
        _instruction: &str,
    ) -> Result<Option<ProcessingReport>> {
        tracing::debug!("[ImmediateProcessor] Skipping backend for {} file(s)", files.len());
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_includes_shape_and_link() {
        let report = ProcessingReport {
            message: "Data processed successfully!".to_string(),
            rows: Some(120),
            columns: Some(8),
            command_used: Some("clean".to_string()),
            download_url: Some("/download/processed_sales.xlsx".to_string()),
        };
        assert_eq!(
            report.summary(),
            "Data processed successfully! The result has 120 rows and 8 columns. \
             Download it from /download/processed_sales.xlsx"
        );
    }

    #[test]
    fn test_report_decodes_backend_json() {
        let report: ProcessingReport =
            serde_json::from_str(r#"{"message":"done","rows":3,"columns":2}"#).unwrap();
        assert_eq!(report.rows, Some(3));
        assert!(report.download_url.is_none());
        assert_eq!(report.summary(), "done The result has 3 rows and 2 columns.");
    }

    #[tokio::test]
    async fn test_immediate_processor_reports_nothing() {
        let files = vec![FileHandle::new("a.csv", b"x".to_vec())];
        let report = ImmediateProcessor.process(&files, "clean").await.unwrap();
        assert!(report.is_none());
    }
}
