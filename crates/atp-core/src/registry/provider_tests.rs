use super::*;
use atp_protocols::tool::{CanonicalToolCall, CanonicalToolResult, ToolSchema};
use serde_json::{json, Value};

struct MockAdapter {
    id: &'static str,
    aliases: &'static [&'static str],
}

impl ProviderAdapter for MockAdapter {
    fn id(&self) -> &str {
        self.id
    }

    fn aliases(&self) -> &[&str] {
        self.aliases
    }

    fn normalize_calls(&self, _payload: &Value) -> Result<Vec<CanonicalToolCall>, ProviderError> {
        Ok(Vec::new())
    }

    fn denormalize_results(&self, results: &[CanonicalToolResult]) -> Vec<Value> {
        results.iter().map(|r| json!(r.call_id)).collect()
    }

    fn tool_schema(&self, tool: &ToolSchema) -> Value {
        json!(tool.name)
    }
}

#[test]
fn test_resolve_by_id_and_alias() {
    let registry = ProviderRegistry::new();
    registry.register(Arc::new(MockAdapter {
        id: "mistral",
        aliases: &["mistralai"],
    }));

    assert_eq!(registry.resolve("mistral").unwrap().id(), "mistral");
    assert_eq!(registry.resolve("MistralAI").unwrap().id(), "mistral");
    assert!(registry.contains(" mistral "));
}

#[test]
fn test_unsupported_provider() {
    let registry = ProviderRegistry::new();
    let err = registry.resolve("cohere").err().unwrap();
    assert_eq!(err, ProviderError::UnsupportedProvider("cohere".to_string()));
}

#[test]
fn test_list_ids_sorted() {
    let registry = ProviderRegistry::new();
    registry.register(Arc::new(MockAdapter { id: "openai", aliases: &[] }));
    registry.register(Arc::new(MockAdapter { id: "anthropic", aliases: &["claude"] }));
    assert_eq!(registry.list_ids(), vec!["anthropic", "openai"]);
}
