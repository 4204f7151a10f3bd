//! HTTP Source Gateway.
//!
//! Talks to the JSON endpoints exposed over the scraped site's API. Each
//! call retries retryable failures (timeouts, connection errors, 5xx) up
//! to a bounded attempt ceiling before surfacing `SourceUnavailable`;
//! fatal failures (4xx, malformed payloads) surface immediately.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::SourceConfig;
use crate::error::{AppError, Result};
use crate::models::{RecordKind, SourceGroup, SourceRecord};

use super::SourceGateway;

/// HTTP client for the source site.
pub struct HttpSource {
    client: Client,
    base_url: String,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl HttpSource {
    /// Create a source client from configuration.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_attempts: config.retry_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    async fn try_fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Fetch JSON with bounded retries on retryable failures.
    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let mut last_error: Option<AppError> = None;

        for attempt in 1..=self.retry_attempts {
            match self.try_fetch(&url).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    log::warn!(
                        "Source fetch {} failed (attempt {}/{}): {}",
                        url,
                        attempt,
                        self.retry_attempts,
                        e
                    );
                    last_error = Some(e);
                    if attempt < self.retry_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "retries exhausted".to_string());
        Err(AppError::source(url, message))
    }

    async fn fetch_records(&self, path: &str, kind: RecordKind) -> Result<Vec<SourceRecord>> {
        let mut records: Vec<SourceRecord> = self.fetch_json(path).await?;
        for rec in &mut records {
            rec.kind = kind;
        }
        Ok(records)
    }
}

#[async_trait]
impl SourceGateway for HttpSource {
    async fn list_groups(&self) -> Result<Vec<SourceGroup>> {
        self.fetch_json("groups").await
    }

    async fn get_group_lessons(&self, group_ext_id: &str) -> Result<Vec<SourceRecord>> {
        self.fetch_records(&format!("groups/{group_ext_id}/lessons"), RecordKind::Lesson)
            .await
    }

    async fn get_group_exams(&self, group_ext_id: &str) -> Result<Vec<SourceRecord>> {
        self.fetch_records(&format!("groups/{group_ext_id}/exams"), RecordKind::Exam)
            .await
    }
}
