//! Mistral tool-call adapter for ATP.

mod adapter;
mod api;

pub use adapter::MistralAdapter;
