use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;

use super::resource::{MasterDataService, StatusToggle};
use crate::api::{unwrap_data, ByteStream};
use crate::error::ClientError;
use crate::models::MasterData;

/// Outcome of a spreadsheet import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub imported: Option<u64>,
}

#[async_trait]
impl StatusToggle for MasterDataService {
    async fn toggle_status(&self, id: u64, status: bool) -> Result<bool, ClientError> {
        let path = format!("{}/toggle-status", self.member(id));
        let body = json!({ "status": status });
        let value: Value = self.client().patch_json(&path, &body).await?;

        // Server answers `{data: {status}}`; fall back to the requested value
        let reported = match unwrap_data(value).get("status") {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().map_or(status, |v| v != 0),
            Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "active"),
            _ => status,
        };
        tracing::info!(id, status = reported, "master data status changed");
        Ok(reported)
    }
}

impl MasterDataService {
    /// Distinct type names (`/master-data-types`)
    pub async fn types(&self) -> Result<Vec<String>, ClientError> {
        let value: Value = self.client().get_json("master-data-types", &[]).await?;
        Ok(serde_json::from_value(unwrap_data(value))?)
    }

    /// Active records for dropdowns (`/active-master-data`)
    pub async fn active(&self) -> Result<Vec<MasterData>, ClientError> {
        let value: Value = self.client().get_json("active-master-data", &[]).await?;
        Ok(serde_json::from_value(unwrap_data(value))?)
    }

    /// Upload a spreadsheet as multipart field `file`
    pub async fn import_from_file(&self, path: &Path) -> Result<ImportResult, ClientError> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import.xlsx".to_string());
        self.import_bytes(file_name, contents).await
    }

    pub async fn import_bytes(&self, file_name: String, contents: Vec<u8>) -> Result<ImportResult, ClientError> {
        let size = contents.len();
        let form = Form::new().part("file", Part::bytes(contents).file_name(file_name.clone()));
        let value: Value = self
            .client()
            .post_multipart(&format!("{}/import", self.collection()), form)
            .await?;
        tracing::info!(file = %file_name, bytes = size, "master data imported");

        Ok(match value {
            Value::Object(_) => serde_json::from_value(value)?,
            _ => ImportResult::default(),
        })
    }

    /// Raw spreadsheet bytes from `/master-data/export`
    pub async fn export_all(&self) -> Result<ByteStream, ClientError> {
        self.client()
            .get_stream(&format!("{}/export", self.collection()))
            .await
    }

    /// Stream the export into `path`, returning the number of bytes written
    pub async fn export_to_file(&self, path: &Path) -> Result<u64, ClientError> {
        let mut stream = self.export_all().await?;
        let mut file = tokio::fs::File::create(path).await?;
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        tracing::info!(path = %path.display(), bytes = written, "master data exported");
        Ok(written)
    }
}
