//! # ATP Core
//!
//! In-memory registries shared by the tool host and the LLM-facing client.
//!
//! - [`ToolRegistry`] - Ordered catalog of locally implemented tools
//! - [`ProviderRegistry`] - Provider adapters addressable by id or alias

pub mod registry;

pub use registry::{ProviderRegistry, ToolRegistry};
