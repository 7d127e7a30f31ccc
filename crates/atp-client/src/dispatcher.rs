//! Tool-call dispatch.
//!
//! `call_tool` turns one model turn's provider-shaped tool calls into
//! provider-shaped results:
//!
//! 1. Normalize the payload with the provider's adapter.
//! 2. Run every call concurrently, bounded by `max_concurrency`: resolve the
//!    route, pick the credential, invoke the endpoint with retry.
//! 3. Write each outcome into the slot of its originating call, so output
//!    order is input order whatever the completion order.
//! 4. Denormalize for the provider.
//!
//! A failing call becomes an error result in its slot. It never aborts the batch.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use atp_config::ClientConfig;
use atp_core::ProviderRegistry;
use atp_protocols::error::{AtpError, AuthError, TransportError};
use atp_protocols::tool::{AuthType, CanonicalToolCall, CanonicalToolResult};
use atp_protocols::toolkit::{ExecuteRequest, ToolRoute, ToolkitContext};

use crate::backend::{ToolInvoker, ToolkitBackend};
use crate::conversation::ConversationState;
use crate::http::HttpBackend;
use crate::oauth::OAuthConnector;
use crate::providers::default_providers;
use crate::retry::RetryPolicy;

/// Per-turn options for [`ToolExecutionDispatcher::call_tool`].
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Prompt that produced the calls, forwarded for backend-side logging.
    pub user_prompt: Option<String>,
    /// Static credential for tools with key or bearer auth.
    pub auth_token: Option<String>,
    /// User whose OAuth connection backs delegated-auth tools.
    pub external_user_id: Option<String>,
}

impl CallOptions {
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_user_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = Some(prompt.into());
        self
    }

    pub fn with_external_user(mut self, user_id: impl Into<String>) -> Self {
        self.external_user_id = Some(user_id.into());
        self
    }
}

/// Executes model-produced tool calls against remote toolkits.
#[derive(Clone)]
pub struct ToolExecutionDispatcher {
    backend: Arc<dyn ToolkitBackend>,
    invoker: Arc<dyn ToolInvoker>,
    providers: Arc<ProviderRegistry>,
    oauth: Option<Arc<OAuthConnector>>,
    retry: RetryPolicy,
    max_concurrency: usize,
}

impl ToolExecutionDispatcher {
    pub fn new(
        backend: Arc<dyn ToolkitBackend>,
        invoker: Arc<dyn ToolInvoker>,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            backend,
            invoker,
            providers,
            oauth: None,
            retry: RetryPolicy::default(),
            max_concurrency: 8,
        }
    }

    /// Dispatcher over HTTP with the three built-in provider adapters.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = Arc::new(HttpBackend::new(config)?);
        Ok(Self::new(http.clone(), http, Arc::new(default_providers()))
            .with_retry(RetryPolicy::from(&config.retry))
            .with_max_concurrency(config.max_concurrency))
    }

    pub fn with_oauth(mut self, connector: Arc<OAuthConnector>) -> Self {
        self.oauth = Some(connector);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    pub fn providers(&self) -> &Arc<ProviderRegistry> {
        &self.providers
    }

    /// Tool schemas of a toolkit, shaped for `provider`.
    ///
    /// Fetched fresh on every call; availability and auth may change between turns.
    pub async fn get_toolkit_context(
        &self,
        toolkit_id: &str,
        provider: &str,
        user_prompt: Option<&str>,
    ) -> Result<ToolkitContext, AtpError> {
        let adapter = self.providers.resolve(provider)?;
        self.retry
            .run("toolkit context", || {
                self.backend.context(toolkit_id, adapter.id(), user_prompt)
            })
            .await
    }

    /// Execute a provider's tool calls and return provider-shaped results,
    /// one per call, in call order.
    ///
    /// Fails only when the provider is unsupported or the payload cannot be
    /// parsed. Per-call failures are returned as error results.
    pub async fn call_tool(
        &self,
        toolkit_id: &str,
        tool_calls: &Value,
        provider: &str,
        options: &CallOptions,
    ) -> Result<Vec<Value>, AtpError> {
        let adapter = self.providers.resolve(provider)?;
        let calls = adapter.normalize_calls(tool_calls)?;
        let results = self.execute_all(toolkit_id, calls, options).await;
        Ok(adapter.denormalize_results(&results))
    }

    /// Like [`call_tool`](Self::call_tool), but append the results to
    /// `conversation` as the provider's follow-up messages.
    pub async fn call_tool_into(
        &self,
        toolkit_id: &str,
        tool_calls: &Value,
        provider: &str,
        options: &CallOptions,
        conversation: &mut ConversationState,
    ) -> Result<(), AtpError> {
        let adapter = self.providers.resolve(provider)?;
        let calls = adapter.normalize_calls(tool_calls)?;
        let results = self.execute_all(toolkit_id, calls, options).await;
        conversation.extend_tool_results(adapter.as_ref(), &results);
        Ok(())
    }

    /// Execute canonical calls. Output has one result per call, in call order.
    pub async fn execute_all(
        &self,
        toolkit_id: &str,
        calls: Vec<CanonicalToolCall>,
        options: &CallOptions,
    ) -> Vec<CanonicalToolResult> {
        if calls.is_empty() {
            return Vec::new();
        }
        info!(
            "Dispatching {} tool calls to toolkit {}",
            calls.len(),
            toolkit_id
        );

        let limit = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();
        for (index, call) in calls.iter().cloned().enumerate() {
            let this = self.clone();
            let limit = limit.clone();
            let toolkit_id = toolkit_id.to_string();
            let options = options.clone();
            tasks.spawn(async move {
                let _permit = limit.acquire_owned().await;
                let outcome = this.execute_one(&toolkit_id, &call, &options).await;
                let result = match outcome {
                    Ok(content) => CanonicalToolResult::success(&call, content),
                    Err(e) => {
                        debug!("Tool call {} ({}) failed: {}", call.call_id, call.name, e);
                        CanonicalToolResult::failure(&call, failure_message(&e))
                    }
                };
                (index, result)
            });
        }

        let mut slots: Vec<Option<CanonicalToolResult>> = vec![None; calls.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => error!("Tool call task failed: {}", e),
            }
        }

        let results: Vec<CanonicalToolResult> = slots
            .into_iter()
            .zip(&calls)
            .map(|(slot, call)| {
                slot.unwrap_or_else(|| CanonicalToolResult::failure(call, "tool call task failed"))
            })
            .collect();

        let failed = results.iter().filter(|r| r.is_error).count();
        info!(
            "Toolkit {} batch finished: {} ok, {} failed",
            toolkit_id,
            results.len() - failed,
            failed
        );
        results
    }

    async fn execute_one(
        &self,
        toolkit_id: &str,
        call: &CanonicalToolCall,
        options: &CallOptions,
    ) -> Result<Value, AtpError> {
        let route = self
            .retry
            .run("tool resolution", || self.backend.resolve(toolkit_id, &call.name))
            .await?;

        let request = ExecuteRequest {
            tool_name: call.name.clone(),
            arguments: call.arguments.clone(),
            auth_token: self.credential(&route, options)?,
        };

        self.retry
            .run(&format!("tool call {}", call.name), || {
                self.invoker.invoke(&route, &request)
            })
            .await
    }

    /// Static token for key/bearer tools, the user's OAuth credential for
    /// delegated tools.
    fn credential(&self, route: &ToolRoute, options: &CallOptions) -> Result<Option<String>, AuthError> {
        if route.auth_type != AuthType::OAuth {
            return Ok(options.auth_token.clone());
        }

        let platform_id = route.auth_provider.clone().unwrap_or_default();
        let external_user_id = options.external_user_id.clone().unwrap_or_default();
        let not_established = || AuthError::AuthNotEstablished {
            platform_id: platform_id.clone(),
            external_user_id: external_user_id.clone(),
        };

        match &self.oauth {
            Some(oauth) if !external_user_id.is_empty() => oauth
                .credential(&platform_id, &external_user_id)
                .map(Some),
            _ => Err(not_established()),
        }
    }
}

/// Message placed in an error result's `{"error": ...}` content.
fn failure_message(err: &AtpError) -> String {
    match err {
        AtpError::Tool(e) => e.to_string(),
        AtpError::Provider(e) => e.to_string(),
        AtpError::Auth(e) => e.to_string(),
        AtpError::Transport(e) => e.to_string(),
        AtpError::Serialization(e) => e.to_string(),
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
