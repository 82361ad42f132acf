//! HTTP client for the dataset processing service.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

use cleanai_core::config::BackendConfig;
use cleanai_core::error::{CleanAiError, Result};
use cleanai_core::processor::{DatasetProcessor, ProcessingReport};
use cleanai_core::session::FileHandle;

/// Body returned by the processing service, on success or failure.
#[derive(Debug, Default, Deserialize)]
pub struct BackendReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub rows: Option<u64>,
    #[serde(default)]
    pub columns: Option<u64>,
    #[serde(default)]
    pub command_used: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Error detail of framework-generated error responses.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl BackendReply {
    pub fn into_report(self) -> Result<ProcessingReport> {
        if let Some(error) = self.error {
            return Err(CleanAiError::backend(error));
        }
        if let Some(detail) = self.detail {
            let detail = match detail {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            };
            return Err(CleanAiError::backend(detail));
        }
        let message = self
            .message
            .ok_or_else(|| CleanAiError::backend("response has neither message nor error"))?;

        Ok(ProcessingReport {
            message,
            rows: self.rows,
            columns: self.columns,
            command_used: self.command_used,
            download_url: self.download_url,
        })
    }
}

/// Posts the accepted files to the processing endpoint as multipart form
/// data: one `file` part per file plus the `command` text.
#[derive(Debug)]
pub struct HttpProcessor {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    timeout: Duration,
}

impl HttpProcessor {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|e| CleanAiError::config(format!("invalid backend endpoint {endpoint}: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            timeout,
        })
    }

    /// `None` when no endpoint is configured.
    pub fn from_config(config: &BackendConfig) -> Result<Option<Self>> {
        config
            .endpoint
            .as_deref()
            .map(|endpoint| Self::new(endpoint, Duration::from_secs(config.timeout_secs)))
            .transpose()
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Download links come back relative to the service.
    fn absolute_url(&self, link: &str) -> String {
        self.endpoint
            .join(link)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| link.to_string())
    }
}

#[async_trait]
impl DatasetProcessor for HttpProcessor {
    async fn process(
        &self,
        files: &[FileHandle],
        instruction: &str,
    ) -> Result<Option<ProcessingReport>> {
        let mut form = Form::new().text("command", instruction.to_string());
        for file in files {
            let part = Part::bytes(file.content().to_vec()).file_name(file.name().to_string());
            form = form.part("file", part);
        }

        tracing::info!(
            "[HttpProcessor] Posting {} file(s) to {}",
            files.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("command", instruction)])
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CleanAiError::backend(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CleanAiError::backend(format!("failed to read response: {e}")))?;

        let reply: BackendReply = match serde_json::from_str(&body) {
            Ok(reply) => reply,
            Err(_) if !status.is_success() => {
                return Err(CleanAiError::backend(format!("{status}: {body}")));
            }
            Err(e) => {
                return Err(CleanAiError::backend(format!("unexpected response: {e}")));
            }
        };
        if !status.is_success() && reply.error.is_none() && reply.detail.is_none() {
            return Err(CleanAiError::backend(format!("{status}: {body}")));
        }

        let mut report = reply.into_report()?;
        if let Some(link) = report.download_url.take() {
            report.download_url = Some(self.absolute_url(&link));
        }
        tracing::info!("[HttpProcessor] {}", report.message);
        Ok(Some(report))
    }
}
