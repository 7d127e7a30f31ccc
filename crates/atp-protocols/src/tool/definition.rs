//! Tool definition types.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::ToolHandler;
use crate::error::ToolError;

/// How a tool's remote call is authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// No credential required.
    #[default]
    None,
    /// Static key supplied by the caller.
    ApiKey,
    /// Static bearer token supplied by the caller.
    Bearer,
    /// Delegated credential from an established OAuth connection.
    #[serde(alias = "oauth2")]
    OAuth,
}

impl AuthType {
    /// Whether the credential comes from an OAuth connection instead of the caller.
    pub fn is_delegated(self) -> bool {
        matches!(self, Self::OAuth)
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::ApiKey => "api_key",
            Self::Bearer => "bearer",
            Self::OAuth => "oauth",
        };
        f.write_str(s)
    }
}

/// Public metadata of a tool, safe to hand to any caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique name within a registry.
    pub name: String,

    /// Parameter names, in declaration order.
    #[serde(default)]
    pub parameters: Vec<String>,

    /// Parameters that must be present on every call.
    #[serde(default)]
    pub required_parameters: Vec<String>,

    /// What the tool does, shown to the model.
    #[serde(default)]
    pub description: String,

    /// Third-party service the credential belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_provider: Option<String>,

    #[serde(default)]
    pub auth_type: AuthType,

    /// Credential slot name on the auth provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_with: Option<String>,

    /// Optional JSON Schema fragments per parameter.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameter_schemas: BTreeMap<String, Value>,
}

impl ToolSchema {
    /// JSON Schema object describing the parameters.
    ///
    /// Parameters without an explicit fragment are advertised as strings.
    pub fn parameters_schema(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                let schema = self
                    .parameter_schemas
                    .get(p)
                    .cloned()
                    .unwrap_or_else(|| json!({ "type": "string" }));
                (p.clone(), schema)
            })
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_parameters,
        })
    }
}

/// A tool as registered with a registry: public schema plus handler.
#[derive(Clone)]
pub struct ToolDefinition {
    pub schema: ToolSchema,
    pub handler: Option<Arc<dyn ToolHandler>>,
}

impl ToolDefinition {
    /// Create a new tool definition with no parameters and no handler.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            schema: ToolSchema {
                name: name.into(),
                parameters: Vec::new(),
                required_parameters: Vec::new(),
                description: description.into(),
                auth_provider: None,
                auth_type: AuthType::None,
                auth_with: None,
                parameter_schemas: BTreeMap::new(),
            },
            handler: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Set the declared parameters.
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.parameters = params.into_iter().map(Into::into).collect();
        self
    }

    /// Set the required parameters.
    pub fn with_required<I, S>(mut self, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.required_parameters = required.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a JSON Schema fragment to one parameter.
    pub fn with_parameter_schema(mut self, param: impl Into<String>, schema: Value) -> Self {
        self.schema.parameter_schemas.insert(param.into(), schema);
        self
    }

    /// Set auth metadata.
    pub fn with_auth(
        mut self,
        auth_provider: Option<String>,
        auth_type: AuthType,
        auth_with: Option<String>,
    ) -> Self {
        self.schema.auth_provider = auth_provider;
        self.schema.auth_type = auth_type;
        self.schema.auth_with = auth_with;
        self
    }

    /// Set the handler.
    pub fn with_handler(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Check the definition's structural invariants.
    pub fn validate(&self) -> Result<(), ToolError> {
        let schema = &self.schema;
        if schema.name.trim().is_empty() {
            return Err(ToolError::Validation("tool name must not be empty".to_string()));
        }
        if let Some(missing) = schema
            .required_parameters
            .iter()
            .find(|r| !schema.parameters.contains(r))
        {
            return Err(ToolError::Validation(format!(
                "required parameter '{}' of tool {} is not a declared parameter",
                missing, schema.name
            )));
        }
        if self.handler.is_none() {
            return Err(ToolError::Validation(format!(
                "tool {} has no handler",
                schema.name
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("schema", &self.schema)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
