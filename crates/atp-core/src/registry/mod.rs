//! Registries for tools and provider adapters.

mod provider;
mod tool;

pub use provider::ProviderRegistry;
pub use tool::ToolRegistry;
