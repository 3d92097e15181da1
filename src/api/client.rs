use crate::error::ApiError;
use crate::{map_api_error, map_json_error};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("persona-view/", env!("CARGO_PKG_VERSION"));

/// The fetch capability the query layer depends on.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` relative to the gateway root and decode the body as JSON.
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;
}

/// Resource paths appended to the gateway root.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ResourcePaths {
    pub home: String,
    pub about: String,
    pub all: String,
    /// Prefix of the single-record path; the id is appended verbatim.
    pub one: String,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            home: "/plantilla/".to_string(),
            about: "/plantilla/acercade".to_string(),
            all: "/plantilla/getTodas".to_string(),
            one: "/plantilla/getPorId/".to_string(),
        }
    }
}

impl ResourcePaths {
    pub fn record(&self, id: &str) -> String {
        format!("{}{}", self.one, id)
    }
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    pub base_url: String,
    timeout_secs: u64,
}

impl GatewayClient {
    // Create baseClient with default settings
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: String, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Unreachable {
                endpoint: "client_init".to_string(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(GatewayClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    pub async fn handle_response<T>(&self, response: Response, endpoint: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();

        if status.is_success() {
            map_json_error!(response.json::<T>().await, endpoint)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            match status.as_u16() {
                408 | 504 => Err(ApiError::Timeout {
                    timeout_secs: self.timeout_secs,
                    endpoint: endpoint.to_string(),
                }),
                _ => Err(ApiError::Http {
                    status: status.as_u16(),
                    endpoint: endpoint.to_string(),
                    message: error_text,
                }),
            }
        }
    }
}

#[async_trait]
impl Transport for GatewayClient {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        log::debug!("GET {}{}", self.base_url, path);

        let response = map_api_error!(
            self.build_request(Method::GET, path).send().await,
            path,
            self.timeout_secs
        )?;

        self.handle_response(response, path).await
    }
}
