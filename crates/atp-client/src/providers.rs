//! Built-in provider adapters.

use std::sync::Arc;

use atp_core::ProviderRegistry;
use atp_provider_anthropic::AnthropicAdapter;
use atp_provider_mistral::MistralAdapter;
use atp_provider_openai::OpenAIAdapter;

/// Registry with the OpenAI, Anthropic and Mistral adapters.
pub fn default_providers() -> ProviderRegistry {
    let registry = ProviderRegistry::new();
    registry.register(Arc::new(OpenAIAdapter::new()));
    registry.register(Arc::new(AnthropicAdapter::new()));
    registry.register(Arc::new(MistralAdapter::new()));
    registry
}
