//! Reqwest-based implementation of the remote API client.

use super::ApiClient;
use herald_config::ApiConfig;
use herald_core::{HeraldError, HeraldResult};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Claims for the per-request signing token.
#[derive(Debug, Serialize)]
struct RequestClaims {
    /// Issuer (client identifier).
    iss: String,
    /// Issued at timestamp.
    iat: i64,
}

/// HTTP client for the remote notification API.
///
/// Each request carries a freshly-signed HS256 bearer token; the remote
/// side validates `iss` against the shared secret registered for that
/// client.
pub struct RestApiClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    encoding_key: EncodingKey,
}

impl RestApiClient {
    /// Create a new client from configuration.
    pub fn from_config(config: &ApiConfig) -> HeraldResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                HeraldError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Signs a short-lived bearer token for one request.
    fn bearer_token(&self) -> HeraldResult<String> {
        let claims = RequestClaims {
            iss: self.client_id.clone(),
            iat: Utc::now().timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| HeraldError::internal(format!("Failed to sign request: {}", e)))
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> HeraldResult<Value> {
        let token = self.bearer_token()?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| HeraldError::internal(format!("Request to remote API failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<Value>().await.map_err(|e| {
                HeraldError::internal(format!("Failed to parse response body: {}", e))
            });
        }

        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Err(error_from_response(status.as_u16(), &body))
    }
}

/// Maps a non-2xx response body to a `RemoteApi` error.
///
/// Validation failures arrive as `{"result": "error", "message": {field:
/// [messages]}}`; other failures carry a plain string message or no body
/// at all.
fn error_from_response(status: u16, body: &Value) -> HeraldError {
    let mut fields = HashMap::new();

    let message = match body.get("message") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Object(map)) => {
            for (field, messages) in map {
                let first = match messages {
                    Value::String(message) => Some(message.clone()),
                    Value::Array(list) => list
                        .first()
                        .and_then(Value::as_str)
                        .map(ToString::to_string),
                    _ => None,
                };
                if let Some(message) = first {
                    fields.insert(field.clone(), message);
                }
            }
            let mut parts: Vec<String> = fields
                .iter()
                .map(|(field, message)| format!("{}: {}", field, message))
                .collect();
            parts.sort();
            parts.join("; ")
        }
        _ => format!("Remote API returned status {}", status),
    };

    HeraldError::RemoteApi {
        status,
        message,
        fields,
    }
}

#[async_trait]
impl ApiClient for RestApiClient {
    async fn get(&self, path: &str, params: &[(&str, String)]) -> HeraldResult<Value> {
        debug!("GET {}", path);
        let mut request = self.http.get(self.url(path));
        if !params.is_empty() {
            request = request.query(params);
        }
        self.execute(request).await
    }

    async fn post(&self, path: &str, body: &Value) -> HeraldResult<Value> {
        debug!("POST {}", path);
        self.execute(self.http.post(self.url(path)).json(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> HeraldResult<Value> {
        debug!("PUT {}", path);
        self.execute(self.http.put(self.url(path)).json(body)).await
    }

    async fn delete(&self, path: &str) -> HeraldResult<Value> {
        debug!("DELETE {}", path);
        self.execute(self.http.delete(self.url(path))).await
    }
}
