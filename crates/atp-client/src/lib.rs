//! # ATP Client
//!
//! LLM-facing side of the Agent Tool Protocol.
//!
//! - [`ToolExecutionDispatcher`] - Fetches toolkit context and executes
//!   provider-shaped tool calls against remote toolkits
//! - [`OAuthConnector`] - Delegated authorization for tools that act on a
//!   user's behalf
//! - [`ConversationState`] - Owned message log for one conversation
//! - [`HttpBackend`] - HTTP implementation of the collaborator seams
//!
//! ## Example
//!
//! ```no_run
//! use atp_client::{CallOptions, ConversationState, ToolExecutionDispatcher};
//! use atp_config::ClientConfig;
//!
//! # async fn turn(model_response: serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = ToolExecutionDispatcher::from_config(&ClientConfig::default())?;
//! let context = dispatcher.get_toolkit_context("coingecko", "mistralai", None).await?;
//!
//! let mut conversation = ConversationState::new();
//! conversation.push_user("What is the price of bitcoin?");
//! // ... send context.tools and conversation.messages() to the model ...
//!
//! let options = CallOptions::default().with_auth_token("CG-key");
//! conversation.push_assistant(model_response["choices"][0]["message"].clone());
//! dispatcher
//!     .call_tool_into("coingecko", &model_response, "mistralai", &options, &mut conversation)
//!     .await?;
//! # let _ = context;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod conversation;
pub mod dispatcher;
pub mod http;
pub mod oauth;
pub mod providers;
pub mod retry;

pub use backend::{OAuthBackend, ToolInvoker, ToolkitBackend};
pub use conversation::ConversationState;
pub use dispatcher::{CallOptions, ToolExecutionDispatcher};
pub use http::HttpBackend;
pub use oauth::OAuthConnector;
pub use providers::default_providers;
pub use retry::RetryPolicy;
