//! Integration tests for argument decoding and dispatch

use ai_lib_tools::codec::{decode_tool_definition, encode_tool_definition};
use ai_lib_tools::dispatch::{dispatch, invoke, neutral_envelope, InMemoryErrorSink};
use ai_lib_tools::schema::{IntegerKind, ParameterType};
use ai_lib_tools::{CallError, FunctionDescriptor, InvocationOutcome, ParameterSpec, ToolErrorKind};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn converter(seen: Arc<Mutex<Vec<(f64, String)>>>) -> FunctionDescriptor {
    FunctionDescriptor::builder("to_fahrenheit")
        .description("Convert a temperature")
        .param(ParameterSpec::required("celsius", ParameterType::float()))
        .param_with_default(
            ParameterSpec::optional("unit", ParameterType::enumeration(["C", "F"])),
            json!("C"),
        )
        .bind_fn(move |args| {
            let celsius: f64 = args.get(0)?;
            let unit: String = args.get(1)?;
            seen.lock().unwrap().push((celsius, unit.clone()));
            Ok::<_, CallError>(json!({"fahrenheit": celsius * 9.0 / 5.0 + 32.0, "unit": unit}))
        })
        .unwrap()
}

#[tokio::test]
async fn test_optional_parameter_takes_declared_default() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let tool = converter(seen.clone());
    let sink = InMemoryErrorSink::default();

    let out = dispatch(&tool, Some(r#"{"celsius":100}"#), &sink, CancellationToken::new()).await;

    assert_eq!(out, json!({"fahrenheit": 212.0, "unit": "C"}));
    assert_eq!(*seen.lock().unwrap(), vec![(100.0, "C".to_string())]);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_null_arguments_report_parse_error_once() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let tool = converter(seen.clone());
    let sink = InMemoryErrorSink::default();

    let out = dispatch(&tool, None, &sink, CancellationToken::new()).await;

    assert_eq!(out, json!({"isSuccess": true}));
    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ToolErrorKind::ArgumentParseError);
    assert_eq!(errors[0].tool(), Some("to_fahrenheit"));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_object_arguments_are_parse_errors() {
    let tool = converter(Arc::default());
    for args in ["null", "[1,2]", "\"celsius\"", "{\"celsius\":"] {
        let sink = InMemoryErrorSink::default();
        let out = dispatch(&tool, Some(args), &sink, CancellationToken::new()).await;
        assert_eq!(out, neutral_envelope(), "{}", args);
        assert_eq!(sink.errors()[0].kind, ToolErrorKind::ArgumentParseError, "{}", args);
    }
}

#[tokio::test]
async fn test_integer_array_is_passed_positionally() {
    let seen = Arc::new(Mutex::new(None));
    let captured = seen.clone();
    let tool = FunctionDescriptor::builder("sum")
        .param(ParameterSpec::required(
            "values",
            ParameterType::array(ParameterType::integer(IntegerKind::I64)),
        ))
        .bind_fn(move |args| {
            let values: Vec<i64> = args.get(0)?;
            let total: i64 = values.iter().sum();
            *captured.lock().unwrap() = Some(values);
            Ok::<_, CallError>(total)
        })
        .unwrap();
    let sink = InMemoryErrorSink::default();

    let out = dispatch(&tool, Some(r#"{"values":[1,2,3]}"#), &sink, CancellationToken::new()).await;

    assert_eq!(out, json!(6));
    assert_eq!(*seen.lock().unwrap(), Some(vec![1, 2, 3]));
}

#[tokio::test]
async fn test_failing_callable_reports_once_and_returns_envelope() {
    let ledger = Arc::new(Mutex::new(Vec::<String>::new()));
    let writes = ledger.clone();
    let tool = FunctionDescriptor::builder("transfer")
        .param(ParameterSpec::required("amount", ParameterType::integer(IntegerKind::U32)))
        .bind_fn(move |args| {
            let amount: u32 = args.get(0)?;
            if amount > 100 {
                return Err(CallError::new("insufficient funds"));
            }
            writes.lock().unwrap().push(format!("moved {}", amount));
            Ok(())
        })
        .unwrap();
    let sink = InMemoryErrorSink::default();

    let out = dispatch(&tool, Some(r#"{"amount":500}"#), &sink, CancellationToken::new()).await;

    assert_eq!(out, json!({"isSuccess": true}));
    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ToolErrorKind::CallableThrew);
    assert_eq!(errors[0].message, "insufficient funds");
    assert!(ledger.lock().unwrap().is_empty());

    // A unit result is also the neutral envelope, but without a report.
    let out = dispatch(&tool, Some(r#"{"amount":5}"#), &sink, CancellationToken::new()).await;
    assert_eq!(out, json!({"isSuccess": true}));
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_concurrent_dispatches_do_not_share_arguments() {
    let tool = Arc::new(
        FunctionDescriptor::builder("echo")
            .param(ParameterSpec::required("id", ParameterType::integer(IntegerKind::I64)))
            .param(ParameterSpec::required("tag", ParameterType::string()))
            .bind_async(|args| async move {
                let id: i64 = args.get(0)?;
                // Yield so other dispatches interleave with this one.
                tokio::time::sleep(Duration::from_millis((id % 5) as u64)).await;
                let tag: String = args.get(1)?;
                Ok::<_, CallError>(json!([id, tag]))
            })
            .unwrap(),
    );
    let sink = Arc::new(InMemoryErrorSink::default());

    let handles: Vec<_> = (0..64i64)
        .map(|id| {
            let tool = tool.clone();
            let sink = sink.clone();
            tokio::spawn(async move {
                let args = json!({"id": id, "tag": format!("call-{}", id)}).to_string();
                dispatch(&tool, Some(args.as_str()), sink.as_ref(), CancellationToken::new()).await
            })
        })
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        let out = handle.await.unwrap();
        assert_eq!(out, json!([id, format!("call-{}", id)]));
    }
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_missing_required_parameter_names_it() {
    let tool = converter(Arc::default());
    let sink = InMemoryErrorSink::default();

    let outcome = invoke(&tool, Some(r#"{"unit":"F"}"#), &sink, CancellationToken::new()).await;

    assert_eq!(
        outcome,
        InvocationOutcome::Error {
            kind: ToolErrorKind::MissingRequiredParameter,
            message: "missing required parameter 'celsius'".to_string(),
        }
    );
    assert_eq!(sink.errors()[0].parameter(), Some("celsius"));
}

#[tokio::test]
async fn test_enum_members_match_case_insensitively() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let tool = converter(seen.clone());
    let sink = InMemoryErrorSink::default();

    dispatch(&tool, Some(r#"{"celsius":"0","unit":"f"}"#), &sink, CancellationToken::new()).await;
    assert_eq!(*seen.lock().unwrap(), vec![(0.0, "F".to_string())]);

    let out = dispatch(&tool, Some(r#"{"celsius":0,"unit":"K"}"#), &sink, CancellationToken::new()).await;
    assert_eq!(out, neutral_envelope());
    assert_eq!(sink.errors()[0].kind, ToolErrorKind::UnknownEnumMember);
    assert_eq!(sink.errors()[0].parameter(), Some("unit"));
}

#[tokio::test]
async fn test_schema_only_descriptor_is_not_invocable() {
    let tool = converter(Arc::default());
    let remote = decode_tool_definition(&encode_tool_definition(&tool));
    let sink = InMemoryErrorSink::default();

    let out = dispatch(&remote, Some(r#"{"celsius":1}"#), &sink, CancellationToken::new()).await;

    assert_eq!(out, neutral_envelope());
    assert_eq!(sink.errors()[0].kind, ToolErrorKind::NotInvocable);
}

#[tokio::test]
async fn test_empty_arguments_dispatch_zero_parameter_tool() {
    let tool = FunctionDescriptor::builder("now")
        .bind_fn(|_| Ok::<_, CallError>("12:00"))
        .unwrap();
    let sink = InMemoryErrorSink::default();

    for args in ["", "  ", "{}"] {
        let out = dispatch(&tool, Some(args), &sink, CancellationToken::new()).await;
        assert_eq!(out, json!("12:00"));
    }
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_cancellation_token_is_injected() {
    let tool = FunctionDescriptor::builder("wait")
        .param(ParameterSpec::required("ms", ParameterType::integer(IntegerKind::U64)))
        .cancellation()
        .bind_async(|args| async move {
            let ms: u64 = args.get(0)?;
            let token = args
                .cancellation()
                .cloned()
                .ok_or_else(|| CallError::new("no token"))?;
            tokio::select! {
                _ = token.cancelled() => Ok::<_, CallError>("cancelled"),
                _ = tokio::time::sleep(Duration::from_millis(ms)) => Ok("done"),
            }
        })
        .unwrap();
    let sink = InMemoryErrorSink::default();

    let token = CancellationToken::new();
    token.cancel();
    let out = dispatch(&tool, Some(r#"{"ms":60000}"#), &sink, token).await;

    assert_eq!(out, json!("cancelled"));
    assert!(sink.is_empty());
}

#[test]
fn test_dispatch_from_blocking_context() {
    let tool = converter(Arc::default());
    let sink = InMemoryErrorSink::default();
    let out: Value = tokio_test::block_on(dispatch(
        &tool,
        Some(r#"{"celsius":-40,"unit":"F"}"#),
        &sink,
        CancellationToken::new(),
    ));
    assert_eq!(out["fahrenheit"], json!(-40.0));
}
