//! HTTP Store Gateway.
//!
//! Thin REST client over the store-of-record API. Reference creation goes
//! through a single get-or-create endpoint so concurrent duplicate
//! attempts resolve on the store side instead of erroring here.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::json;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::models::{RecordInsert, ReferenceEntity, ReferenceKind, StoredGroup, StoredRecord};

use super::StoreGateway;

/// HTTP client for the store of record.
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    /// Create a store client from configuration.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl StoreGateway for HttpStore {
    async fn list_groups(&self) -> Result<Vec<StoredGroup>> {
        let response = self
            .client
            .get(self.url("groups"))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn create_group(&self, name: &str, ext_id: &str) -> Result<StoredGroup> {
        let response = self
            .client
            .post(self.url("groups"))
            .json(&json!({ "name": name, "ext_id": ext_id }))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn get_or_create_reference(
        &self,
        kind: ReferenceKind,
        ext_key: &str,
        name: &str,
    ) -> Result<ReferenceEntity> {
        let response = self
            .client
            .post(self.url("references"))
            .json(&json!({ "kind": kind, "ext_key": ext_key, "name": name }))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn get_group_records(&self, group_id: i64) -> Result<Vec<StoredRecord>> {
        let response = self
            .client
            .get(self.url(&format!("groups/{group_id}/records")))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn create_record(&self, insert: &RecordInsert) -> Result<StoredRecord> {
        let response = self
            .client
            .post(self.url("records"))
            .json(insert)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn update_record(&self, id: i64, insert: &RecordInsert) -> Result<()> {
        self.client
            .put(self.url(&format!("records/{id}")))
            .json(insert)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_record(&self, id: i64) -> Result<()> {
        self.client
            .delete(self.url(&format!("records/{id}")))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn patch_group_synced_at(&self, group_id: i64, at: DateTime<Utc>) -> Result<()> {
        self.client
            .patch(self.url(&format!("groups/{group_id}")))
            .json(&json!({ "last_synced_at": at }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
