//! API client for the content search backend.

use crate::config::{ClientCredentials, TuiConfig};
use async_trait::async_trait;
use libsearch_core::{SearchRequest, ServerResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

/// Anything that can answer a content search.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn content_search(&self, request: &SearchRequest) -> Result<ServerResponse, ApiClientError>;
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    search_url: String,
    auth_header: HeaderMap,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let auth_header = build_auth_headers(&config.auth)?;
        Ok(Self {
            client,
            search_url: search_url(&config.api_base_url, &config.search_path),
            auth_header,
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    async fn post_json<T, B>(&self, body: &B) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let request_id = uuid::Uuid::now_v7().to_string();
        let response = self
            .client
            .post(&self.search_url)
            .headers(self.auth_header.clone())
            .header("x-request-id", request_id.as_str())
            .json(body)
            .send()
            .await?;
        tracing::debug!(request_id = %request_id, status = response.status().as_u16(), "search response received");
        self.parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let text = response.text().await?;
            Err(ApiClientError::InvalidResponse(error_message(status.as_u16(), &text)))
        }
    }
}

#[async_trait]
impl SearchBackend for RestClient {
    async fn content_search(&self, request: &SearchRequest) -> Result<ServerResponse, ApiClientError> {
        self.post_json(&request.to_envelope()).await
    }
}

/// Error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    params: ApiErrorParams,
}

#[derive(Debug, Deserialize)]
struct ApiErrorParams {
    err: Option<String>,
    errmsg: Option<String>,
}

fn error_message(status: u16, text: &str) -> String {
    if let Ok(body) = serde_json::from_str::<ApiErrorBody>(text) {
        if let Some(message) = body.params.errmsg {
            let code = body.params.err.unwrap_or_else(|| status.to_string());
            return format!("{}: {}", code, message);
        }
    }
    format!("HTTP {}: {}", status, text)
}

fn search_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn build_auth_headers(auth: &ClientCredentials) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &auth.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    if let Some(jwt) = &auth.jwt {
        let value = format!("Bearer {}", jwt);
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&value).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}
