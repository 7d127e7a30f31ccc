//! Provider registry for tool-call adapters.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use atp_protocols::error::ProviderError;
use atp_protocols::provider::ProviderAdapter;

/// Registry resolving provider names, including aliases, to adapters.
pub struct ProviderRegistry {
    adapters: DashMap<String, Arc<dyn ProviderAdapter>>,
    aliases: DashMap<String, String>,
}

impl ProviderRegistry {
    /// Create an empty provider registry.
    pub fn new() -> Self {
        Self {
            adapters: DashMap::new(),
            aliases: DashMap::new(),
        }
    }

    /// Register an adapter under its id and aliases, replacing any previous one.
    pub fn register(&self, adapter: Arc<dyn ProviderAdapter>) {
        let id = normalize(adapter.id());
        for alias in adapter.aliases() {
            self.aliases.insert(normalize(alias), id.clone());
        }
        debug!("Registered provider adapter: {}", id);
        self.adapters.insert(id, adapter);
    }

    /// Resolve a provider name or alias.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
        let key = normalize(name);
        let id = self
            .aliases
            .get(&key)
            .map(|id| id.clone())
            .unwrap_or(key);
        self.adapters
            .get(&id)
            .map(|a| a.clone())
            .ok_or_else(|| ProviderError::UnsupportedProvider(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// List canonical provider ids, sorted.
    pub fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.adapters.iter().map(|a| a.key().clone()).collect();
        ids.sort();
        ids
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
