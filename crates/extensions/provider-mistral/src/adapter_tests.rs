    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_native_arguments() {
        let payload = json!({
            "choices": [{
                "message": {
                    "tool_calls": [
                        { "id": "call_345", "name": "hello_world", "arguments": { "name": "Charlie" } }
                    ]
                }
            }]
        });
        let calls = MistralAdapter.normalize_calls(&payload).unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].call_id, "call_345");
        assert_eq!(calls[0].arguments["name"], "Charlie");
    }

    #[test]
    fn test_normalize_function_wrapper_with_string_arguments() {
        let list = json!([
            { "id": "a1", "function": { "name": "get_info", "arguments": "{}" } },
            { "id": "a2", "function": { "name": "hello_world", "arguments": "{\"name\":\"Eve\"}" } }
        ]);
        let calls = MistralAdapter.normalize_calls(&list).unwrap();
        assert_eq!(calls[0].name, "get_info");
        assert_eq!(calls[1].arguments["name"], "Eve");
    }

    #[test]
    fn test_call_without_name_is_malformed() {
        let list = json!([{ "id": "x", "arguments": {} }]);
        assert!(matches!(
            MistralAdapter.normalize_calls(&list),
            Err(ProviderError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_malformed_string_arguments() {
        let list = json!([{ "id": "x", "name": "hello_world", "arguments": "{name:" }]);
        assert!(matches!(
            MistralAdapter.normalize_calls(&list),
            Err(ProviderError::MalformedArguments { .. })
        ));
    }

    #[test]
    fn test_denormalize_tool_messages() {
        let list = json!([
            { "id": "c1", "name": "hello_world", "arguments": { "name": "Charlie" } },
            { "id": "c2", "name": "get_info", "arguments": {} }
        ]);
        let calls = MistralAdapter.normalize_calls(&list).unwrap();
        let results: Vec<CanonicalToolResult> = calls
            .iter()
            .map(|c| CanonicalToolResult::success(c, json!({ "ok": c.name })))
            .collect();
        let messages = MistralAdapter.denormalize_results(&results);
        assert_eq!(messages.len(), 2);
        for (message, call) in messages.iter().zip(&calls) {
            assert_eq!(message["role"], "tool");
            assert_eq!(message["tool_call_id"], call.call_id.as_str());
            assert_eq!(message["name"], call.name.as_str());
        }
        let content: Value = serde_json::from_str(messages[0]["content"].as_str().unwrap()).unwrap();
        assert_eq!(content["ok"], "hello_world");
    }

    #[test]
    fn test_tool_schema_nests_function() {
        let schema = ToolSchema {
            name: "hello_world".into(),
            parameters: vec!["name".into()],
            required_parameters: vec!["name".into()],
            description: "Returns a greeting message.".into(),
            auth_provider: None,
            auth_type: Default::default(),
            auth_with: None,
            parameter_schemas: Default::default(),
        };
        let tool = MistralAdapter.tool_schema(&schema);
        assert_eq!(tool["type"], "function");
        assert_eq!(tool["function"]["name"], "hello_world");
        assert_eq!(tool["function"]["parameters"]["properties"]["name"]["type"], "string");
    }
