//! HTTP implementation of the collaborator seams.

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use atp_config::ClientConfig;
use atp_protocols::error::{AtpError, AuthError, ToolError, TransportError};
use atp_protocols::oauth::{AuthorizationUrl, ConnectionStatus};
use atp_protocols::toolkit::{ExecuteRequest, ExecuteResponse, ToolRoute, ToolkitContext};

use crate::backend::{OAuthBackend, ToolInvoker, ToolkitBackend};

/// Toolkit backend, tool endpoint and OAuth backend over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
    api_key: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let base = Url::parse(&config.endpoint_base())
            .map_err(|e| TransportError::Network(format!("invalid base URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(TransportError::Network(format!(
                "invalid base URL: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(header::AUTHORIZATION, format!("Bearer {key}")),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        self.authorize(request)
            .send()
            .await
            .map_err(classify)
    }
}

/// Only failures before the request left the client are safe to repeat.
fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else if error.is_connect() {
        TransportError::Network(error.to_string())
    } else {
        TransportError::Interrupted(error.to_string())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let body = response.text().await.map_err(classify)?;
    serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
}

/// Error message of a non-success response: the `error` field when present,
/// otherwise the raw body.
async fn failure(response: Response) -> (StatusCode, Option<String>, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ExecuteResponse>(&body) {
        Ok(ExecuteResponse::Failure { error, kind }) => (status, kind, error),
        _ => (status, None, body),
    }
}

fn status_error(status: StatusCode, message: String) -> TransportError {
    TransportError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Map a failed execution back onto the tool error taxonomy where the
/// server told us which failure it was.
fn execution_error(tool_name: &str, status: StatusCode, kind: Option<&str>, message: String) -> AtpError {
    match kind {
        Some("unknown_tool") => ToolError::UnknownTool(tool_name.to_string()).into(),
        Some("handler_error") => ToolError::HandlerError(
            message
                .strip_prefix("Handler error: ")
                .map(str::to_string)
                .unwrap_or(message),
        )
        .into(),
        Some("handler_timeout") => {
            let millis = message
                .split_whitespace()
                .find_map(|w| w.parse().ok())
                .unwrap_or_default();
            ToolError::HandlerTimeout(millis).into()
        }
        _ => status_error(status, message).into(),
    }
}

#[async_trait]
impl ToolkitBackend for HttpBackend {
    async fn context(
        &self,
        toolkit_id: &str,
        provider: &str,
        user_prompt: Option<&str>,
    ) -> Result<ToolkitContext, AtpError> {
        let url = self.url(&["toolkits", toolkit_id, "context"]);
        let mut query = vec![("provider", provider)];
        if let Some(prompt) = user_prompt {
            query.push(("user_prompt", prompt));
        }
        debug!("GET {}", url);

        let response = self.send(self.client.get(url).query(&query)).await?;
        if !response.status().is_success() {
            let (status, _, message) = failure(response).await;
            return Err(status_error(status, message).into());
        }
        Ok(decode(response).await?)
    }

    async fn resolve(&self, toolkit_id: &str, tool_name: &str) -> Result<ToolRoute, AtpError> {
        let url = self.url(&["toolkits", toolkit_id, "tools", tool_name]);
        debug!("GET {}", url);

        let response = self.send(self.client.get(url)).await?;
        match response.status() {
            s if s.is_success() => Ok(decode(response).await?),
            StatusCode::NOT_FOUND => Err(ToolError::UnknownTool(tool_name.to_string()).into()),
            _ => {
                let (status, _, message) = failure(response).await;
                Err(status_error(status, message).into())
            }
        }
    }
}

#[async_trait]
impl ToolInvoker for HttpBackend {
    async fn invoke(&self, route: &ToolRoute, request: &ExecuteRequest) -> Result<Value, AtpError> {
        debug!("POST {} ({})", route.endpoint, request.tool_name);
        let response = self
            .send(self.client.post(&route.endpoint).json(request))
            .await?;

        if !response.status().is_success() {
            let (status, kind, message) = failure(response).await;
            return Err(execution_error(&request.tool_name, status, kind.as_deref(), message));
        }
        match decode::<ExecuteResponse>(response).await? {
            ExecuteResponse::Success { result } => Ok(result),
            ExecuteResponse::Failure { error, .. } => Err(ToolError::HandlerError(error).into()),
        }
    }
}

#[async_trait]
impl OAuthBackend for HttpBackend {
    async fn initiate(
        &self,
        platform_id: &str,
        external_user_id: &str,
    ) -> Result<AuthorizationUrl, AtpError> {
        let url = self.url(&["oauth", "connections"]);
        let body = json!({
            "platform_id": platform_id,
            "external_user_id": external_user_id,
        });

        let response = self.send(self.client.post(url).json(&body)).await?;
        match response.status() {
            s if s.is_success() => Ok(decode(response).await?),
            StatusCode::NOT_FOUND => Err(AuthError::PlatformNotFound(platform_id.to_string()).into()),
            _ => {
                let (status, _, message) = failure(response).await;
                Err(status_error(status, message).into())
            }
        }
    }

    async fn status(
        &self,
        platform_id: &str,
        external_user_id: &str,
    ) -> Result<ConnectionStatus, AtpError> {
        let url = self.url(&["oauth", "connections", platform_id, external_user_id]);

        let response = self.send(self.client.get(url)).await?;
        match response.status() {
            s if s.is_success() => Ok(decode(response).await?),
            StatusCode::NOT_FOUND => Err(AuthError::PlatformNotFound(platform_id.to_string()).into()),
            _ => {
                let (status, _, message) = failure(response).await;
                Err(status_error(status, message).into())
            }
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
