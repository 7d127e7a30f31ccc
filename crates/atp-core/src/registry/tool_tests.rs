use super::*;
use atp_protocols::tool::{handler_fn, ToolArguments};
use serde_json::{json, Value};

fn constant(value: Value) -> Arc<dyn atp_protocols::ToolHandler> {
    handler_fn(move |_args: ToolArguments| {
        let value = value.clone();
        async move { Ok::<_, ToolError>(value) }
    })
}

fn tool(name: &str, marker: &str) -> ToolDefinition {
    ToolDefinition::new(name, format!("{name} tool"))
        .with_params(["name"])
        .with_required(["name"])
        .with_handler(constant(json!(marker)))
}

#[test]
fn test_register_and_lookup() {
    let registry = ToolRegistry::new();
    registry.register(tool("hello_world", "v1")).unwrap();

    assert!(registry.contains("hello_world"));
    assert_eq!(registry.len(), 1);
    let def = registry.lookup("hello_world").unwrap();
    assert_eq!(def.schema.required_parameters, vec!["name".to_string()]);
}

#[test]
fn test_lookup_unknown() {
    let registry = ToolRegistry::new();
    let err = registry.lookup("missing").unwrap_err();
    assert_eq!(err, ToolError::UnknownTool("missing".to_string()));
}

#[test]
fn test_invalid_definition_rejected() {
    let registry = ToolRegistry::new();
    let bad = ToolDefinition::new("bad", "bad")
        .with_params(["a"])
        .with_required(["b"])
        .with_handler(constant(Value::Null));
    assert!(matches!(registry.register(bad), Err(ToolError::Validation(_))));

    let no_handler = ToolDefinition::new("bare", "bare");
    assert!(matches!(registry.register(no_handler), Err(ToolError::Validation(_))));
    assert!(registry.is_empty());
}

#[test]
fn test_list_preserves_registration_order() {
    let registry = ToolRegistry::new();
    for name in ["zeta", "alpha", "mid"] {
        registry.register(tool(name, name)).unwrap();
    }
    let names: Vec<String> = registry.schemas().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn test_reregister_replaces_in_place() {
    let registry = ToolRegistry::new();
    registry.register(tool("a", "v1")).unwrap();
    registry.register(tool("b", "b")).unwrap();
    registry.register(tool("a", "v2")).unwrap();

    assert_eq!(registry.len(), 2);
    let names: Vec<String> = registry.schemas().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["a", "b"]);

    let handler = registry.lookup("a").unwrap().handler.clone().unwrap();
    assert_eq!(handler.call(ToolArguments::new()).await.unwrap(), json!("v2"));
}

#[test]
fn test_unregister() {
    let registry = ToolRegistry::new();
    registry.register(tool("a", "a")).unwrap();
    registry.register(tool("b", "b")).unwrap();
    assert!(registry.unregister("a").is_some());
    assert!(registry.unregister("a").is_none());
    let names: Vec<String> = registry.schemas().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["b"]);
}

#[test]
fn test_concurrent_readers_see_whole_definitions() {
    let registry = Arc::new(ToolRegistry::new());
    registry.register(tool("a", "v0")).unwrap();

    let writer = {
        let registry = Arc::clone(&registry);
        std::thread::spawn(move || {
            for i in 0..200 {
                let def = ToolDefinition::new("a", format!("rev {i}"))
                    .with_params(["name", "extra"])
                    .with_required(["name"])
                    .with_handler(constant(json!(i)));
                registry.register(def).unwrap();
            }
        })
    };

    for _ in 0..200 {
        let def = registry.lookup("a").unwrap();
        let schema = &def.schema;
        assert!(schema.required_parameters.iter().all(|r| schema.parameters.contains(r)));
    }
    writer.join().unwrap();
    assert_eq!(registry.len(), 1);
}
