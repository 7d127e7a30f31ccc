//! Anthropic tool-use adapter for ATP.

mod adapter;
mod api;

pub use adapter::AnthropicAdapter;
