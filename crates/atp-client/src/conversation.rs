//! Owned conversation log threaded through each turn.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use atp_protocols::provider::ProviderAdapter;
use atp_protocols::tool::CanonicalToolResult;

/// Messages of one conversation, in the provider's own message shapes.
///
/// Each turn takes `&mut ConversationState`, so two conversations never share
/// history by accident.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    messages: Vec<Value>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages
            .push(json!({ "role": "user", "content": content.into() }));
    }

    /// Append an assistant message as returned by the provider, tool calls included.
    pub fn push_assistant(&mut self, message: Value) {
        self.messages.push(message);
    }

    pub fn push_assistant_text(&mut self, content: impl Into<String>) {
        self.messages
            .push(json!({ "role": "assistant", "content": content.into() }));
    }

    /// Append one turn's tool results as `provider`'s follow-up messages.
    pub fn extend_tool_results(
        &mut self,
        provider: &dyn ProviderAdapter,
        results: &[CanonicalToolResult],
    ) {
        self.messages.extend(provider.follow_up_messages(results));
    }

    pub fn messages(&self) -> &[Value] {
        &self.messages
    }

    /// Messages prefixed with a role prompt, e.g. a system instruction for one step.
    pub fn with_prompt(&self, prompt: &Value) -> Vec<Value> {
        std::iter::once(prompt.clone())
            .chain(self.messages.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
