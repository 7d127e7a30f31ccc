    use super::*;
    use atp_protocols::tool::ToolArguments;
    use serde_json::json;

    fn chat_response() -> Value {
        json!({
            "choices": [{
                "message": {
                    "tool_calls": [
                        {
                            "id": "call_123",
                            "type": "function",
                            "function": { "name": "hello_world", "arguments": "{\"name\": \"Alice\"}" }
                        },
                        {
                            "id": "call_456",
                            "type": "function",
                            "function": { "name": "get_info", "arguments": "{}" }
                        }
                    ]
                }
            }]
        })
    }

    #[test]
    fn test_normalize_full_response() {
        let calls = OpenAIAdapter.normalize_calls(&chat_response()).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].call_id, "call_123");
        assert_eq!(calls[0].name, "hello_world");
        assert_eq!(calls[0].arguments["name"], "Alice");
        assert_eq!(calls[1].call_id, "call_456");
        assert!(calls[1].arguments.is_empty());
    }

    #[test]
    fn test_normalize_bare_list() {
        let list = chat_response()["choices"][0]["message"]["tool_calls"].clone();
        let calls = OpenAIAdapter.normalize_calls(&list).unwrap();
        let ids: Vec<&str> = calls.iter().map(|c| c.call_id.as_str()).collect();
        assert_eq!(ids, vec!["call_123", "call_456"]);
    }

    #[test]
    fn test_malformed_arguments() {
        let list = json!([{ "id": "call_1", "function": { "name": "hello_world", "arguments": "{name:" } }]);
        let err = OpenAIAdapter.normalize_calls(&list).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedArguments { ref call_id, .. } if call_id == "call_1"));
    }

    #[test]
    fn test_responses_output_items() {
        let payload = json!({
            "output": [
                { "type": "reasoning", "id": "rs_1" },
                { "type": "function_call", "id": "fc_1", "call_id": "call_a", "name": "get_info", "arguments": "{}" },
                { "type": "message", "id": "msg_1", "content": [] },
                { "type": "function_call", "id": "fc_2", "call_id": "call_b", "name": "hello_world", "arguments": "{\"name\":\"Bo\"}" }
            ]
        });
        let calls = OpenAIAdapter.normalize_calls(&payload).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].call_id, "call_a");
        assert_eq!(calls[1].arguments["name"], "Bo");
    }

    #[test]
    fn test_missing_id_gets_fallback() {
        let list = json!([{ "function": { "name": "get_info", "arguments": "" } }]);
        let calls = OpenAIAdapter.normalize_calls(&list).unwrap();
        assert!(calls[0].call_id.starts_with("call_"));
    }

    #[test]
    fn test_no_tool_calls_in_message() {
        let payload = json!({ "choices": [{ "message": { "content": "hi" } }] });
        assert!(OpenAIAdapter.normalize_calls(&payload).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_scalar_payload() {
        assert!(matches!(
            OpenAIAdapter.normalize_calls(&json!("nope")),
            Err(ProviderError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_denormalize_function_call_output() {
        let calls = OpenAIAdapter.normalize_calls(&chat_response()).unwrap();
        let results = vec![
            CanonicalToolResult::success(&calls[0], json!({ "message": "Hello, Alice!" })),
            CanonicalToolResult::failure(&calls[1], "Handler error: down"),
        ];
        let out = OpenAIAdapter.denormalize_results(&results);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["type"], "function_call_output");
        assert_eq!(out[0]["call_id"], "call_123");
        let decoded: Value = serde_json::from_str(out[0]["output"].as_str().unwrap()).unwrap();
        assert_eq!(decoded["message"], "Hello, Alice!");
        assert_eq!(out[1]["call_id"], "call_456");
        assert!(out[1]["output"].as_str().unwrap().contains("down"));
    }

    #[test]
    fn test_tool_schema_shape() {
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
        let tool = OpenAIAdapter.tool_schema(&schema);
        assert_eq!(tool["type"], "function");
        assert_eq!(tool["name"], "hello_world");
        assert_eq!(tool["parameters"]["required"], json!(["name"]));
    }

    #[test]
    fn test_arguments_are_canonical_maps() {
        let calls = OpenAIAdapter.normalize_calls(&chat_response()).unwrap();
        let expected: ToolArguments = serde_json::from_value(json!({ "name": "Alice" })).unwrap();
        assert_eq!(calls[0].arguments, expected);
    }
