//! Wire types and HTTP client for the vector-search service.
//!
//! Every endpoint is a JSON-over-HTTP POST against a fixed origin. Calls are
//! independently fire-and-forget: a transport failure or non-success status
//! is caught here, logged, and degraded to `None` — callers treat that as
//! "nothing happened", never as data. There is no retry anywhere.

use anyhow::{bail, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ApiConfig;

// ============ Wire types ============

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesRequest {
    pub owner: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub category_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadRequest {
    pub owner: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub documents: Vec<DocumentUpload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_update: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentUpload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub document: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub document_ids: Vec<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub owner: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub text: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroids: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub documents: Vec<SearchDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchDocument {
    #[serde(default)]
    pub external_id: Option<String>,
    pub document: serde_json::Value,
    pub document_id: u64,
    pub document_similarity: f32,
    #[serde(default)]
    pub centroid_similarity: f32,
}

impl SearchDocument {
    /// Server-echoed document rendered as display text. String payloads pass
    /// through verbatim; anything else falls back to its JSON form.
    pub fn document_text(&self) -> String {
        match &self.document {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<String>>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct DeleteOwnerRequest {
    owner: String,
}

#[derive(Debug, Serialize)]
struct DeleteCategoryRequest {
    owner: String,
    category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_id: Option<u64>,
}

// ============ Client ============

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Only the connect phase is bounded on the shared client; a per-request
    /// timeout is applied to JSON calls below. Chat streams for an unbounded
    /// time and must not carry a whole-request deadline.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub async fn categories(&self, owner: &str) -> Option<Vec<String>> {
        let request = CategoriesRequest {
            owner: owner.to_string(),
        };
        match self
            .post_json::<_, CategoriesResponse>("/api/categories", &request)
            .await
        {
            Ok(response) => Some(response.category_names),
            Err(err) => {
                tracing::error!(error = %err, "Error getting categories");
                None
            }
        }
    }

    pub async fn upload(&self, request: &UploadRequest) -> Option<UploadResponse> {
        match self.post_json("/api/upload", request).await {
            Ok(response) => Some(response),
            Err(err) => {
                tracing::error!(error = %err, "Error uploading");
                None
            }
        }
    }

    pub async fn search(&self, request: &SearchRequest) -> Option<SearchResponse> {
        match self.post_json("/api/search", request).await {
            Ok(response) => Some(response),
            Err(err) => {
                tracing::error!(error = %err, "Error searching");
                None
            }
        }
    }

    pub async fn delete_owner(&self, owner: &str) -> bool {
        let request = DeleteOwnerRequest {
            owner: owner.to_string(),
        };
        match self
            .post_json::<_, serde_json::Value>("/api/delete/owner", &request)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(error = %err, "Error deleting owner");
                false
            }
        }
    }

    pub async fn delete_category(&self, owner: &str, category: &str) -> bool {
        let request = DeleteCategoryRequest {
            owner: owner.to_string(),
            category: category.to_string(),
            document_id: None,
        };
        match self
            .post_json::<_, serde_json::Value>("/api/delete/category", &request)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(error = %err, "Error deleting category");
                false
            }
        }
    }

    pub async fn delete_document(&self, owner: &str, category: &str, document_id: u64) -> bool {
        let request = DeleteCategoryRequest {
            owner: owner.to_string(),
            category: category.to_string(),
            document_id: Some(document_id),
        };
        match self
            .post_json::<_, serde_json::Value>("/api/delete/category", &request)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(error = %err, "Error deleting document");
                false
            }
        }
    }

    /// Opens the streamed chat response. Status errors surface here so the
    /// stream consumer can hand them to its sink.
    pub(crate) async fn open_chat_stream(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .header(reqwest::header::ACCEPT, "text/plain")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("chat API error {}: {}", status, body_text);
        }

        Ok(response)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("API error {}: {}", status, body_text);
        }

        Ok(response.json().await?)
    }
}
