//! OpenAI tool-call adapter for ATP.

mod adapter;
mod api;

pub use adapter::OpenAIAdapter;
