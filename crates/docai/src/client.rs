//! HTTP client for the document-understanding service

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client as HttpClient;
use serde_json::json;
use tracing::debug;

use crate::{DocAiError, ProcessResponse, ProcessorRef};

/// Capability boundary to the remote document-understanding service
///
/// One implementation talks HTTP; tests inject fakes that return canned
/// entity lists without any network dependency.
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    /// Run the given processor over a raw document
    async fn process(
        &self,
        processor: &ProcessorRef,
        content: &[u8],
        mime_type: &str,
    ) -> Result<ProcessResponse, DocAiError>;
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpDocumentAiConfig {
    /// Cloud project owning the processors
    pub project_id: String,

    /// OAuth2 bearer token presented on every call
    pub access_token: String,

    /// Endpoint override; when unset, each processor's regional endpoint
    /// is used
    pub endpoint: Option<String>,
}

/// `DocumentProcessor` backed by the service's REST surface
///
/// Holds a single long-lived [`reqwest::Client`], safe for unbounded
/// concurrent use.
pub struct HttpDocumentAi {
    http: HttpClient,
    config: HttpDocumentAiConfig,
}

impl HttpDocumentAi {
    #[must_use]
    pub fn new(config: HttpDocumentAiConfig) -> Self {
        Self {
            http: HttpClient::new(),
            config,
        }
    }

    fn process_url(&self, processor: &ProcessorRef) -> String {
        let endpoint = self
            .config
            .endpoint
            .clone()
            .unwrap_or_else(|| processor.default_endpoint());

        format!(
            "{}/v1/{}:process",
            endpoint.trim_end_matches('/'),
            processor.resource_name(&self.config.project_id)
        )
    }
}

#[async_trait]
impl DocumentProcessor for HttpDocumentAi {
    async fn process(
        &self,
        processor: &ProcessorRef,
        content: &[u8],
        mime_type: &str,
    ) -> Result<ProcessResponse, DocAiError> {
        let url = self.process_url(processor);
        debug!("Processing {} byte document via {}", content.len(), url);

        let body = json!({
            "rawDocument": {
                "content": BASE64.encode(content),
                "mimeType": mime_type,
            }
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DocAiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<ProcessResponse>().await?)
    }
}
