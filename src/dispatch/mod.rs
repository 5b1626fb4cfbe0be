//! 参数解码与调度模块：解码工具调用参数、类型转换、调用绑定函数并编码结果。
//!
//! # Argument Decoder & Dispatcher
//!
//! Turns a tool call's JSON arguments into a bound invocation of the
//! descriptor's callable and encodes the outcome as JSON.
//!
//! Dispatch never fails from the caller's point of view: every failure is
//! reported to an [`ErrorSink`] and the neutral envelope `{"isSuccess":true}`
//! is returned in place of a result.
//!
//! | Step | Failure kind |
//! |------|--------------|
//! | Parse arguments into a fresh bundle | `ArgumentParseError` |
//! | Locate the bound callable | `NotInvocable` |
//! | Bind each declared slot in order | `MissingRequiredParameter`, `TypeCoercionError`, `UnknownEnumMember` |
//! | Invoke and await | `CallableThrew` |
//!
//! ```rust
//! use ai_lib_tools::dispatch::{dispatch, InMemoryErrorSink};
//! use ai_lib_tools::function::{FunctionDescriptor, ParameterSpec};
//! use ai_lib_tools::schema::ParameterType;
//! use ai_lib_tools::CallError;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let to_f = FunctionDescriptor::builder("to_fahrenheit")
//!     .param(ParameterSpec::required("celsius", ParameterType::float()))
//!     .bind_fn(|args| Ok::<_, CallError>(args.get::<f64>(0)? * 9.0 / 5.0 + 32.0))
//!     .unwrap();
//!
//! let sink = InMemoryErrorSink::default();
//! let out = dispatch(&to_f, Some(r#"{"celsius": 100}"#), &sink, CancellationToken::new()).await;
//! assert_eq!(out, serde_json::json!(212.0));
//! assert!(sink.is_empty());
//! # });
//! ```

mod coerce;
pub mod sink;

pub use sink::{
    noop_sink, CompositeErrorSink, ErrorSink, InMemoryErrorSink, NoopErrorSink, TracingErrorSink,
};

use crate::error::{ErrorContext, ToolError, ToolErrorKind};
use crate::function::{CallArgs, FunctionDescriptor, Signature, Slot};
use futures::FutureExt;
use serde_json::{json, Map, Value};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Parameter name → untyped JSON value, built fresh for every dispatch.
pub type ArgumentBundle = Map<String, Value>;

/// `{"isSuccess":true}`, returned for `null` results and in place of failures.
pub fn neutral_envelope() -> Value {
    json!({ "isSuccess": true })
}

/// Result of one invocation. Native error types never cross this boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    Success(Value),
    Error { kind: ToolErrorKind, message: String },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success(_))
    }

    /// Wire form: the result's JSON, or the neutral envelope.
    pub fn into_json(self) -> Value {
        match self {
            InvocationOutcome::Success(Value::Null) | InvocationOutcome::Error { .. } => {
                neutral_envelope()
            }
            InvocationOutcome::Success(value) => value,
        }
    }
}

/// Decode `arguments`, invoke the descriptor's callable and encode the result.
///
/// `arguments` is the tool call's JSON-encoded arguments object. An empty
/// string means no arguments.
pub async fn dispatch(
    descriptor: &FunctionDescriptor,
    arguments: Option<&str>,
    on_error: &dyn ErrorSink,
    cancellation: CancellationToken,
) -> Value {
    invoke(descriptor, arguments, on_error, cancellation)
        .await
        .into_json()
}

/// Like [`dispatch`], but keeps the outcome typed.
pub async fn invoke(
    descriptor: &FunctionDescriptor,
    arguments: Option<&str>,
    on_error: &dyn ErrorSink,
    cancellation: CancellationToken,
) -> InvocationOutcome {
    let tool = descriptor.name();
    debug!(tool, "dispatching tool call");
    match run(descriptor, arguments, cancellation).await {
        Ok(value) => {
            debug!(tool, "tool call finished");
            InvocationOutcome::Success(value)
        }
        Err(error) => {
            warn!(
                tool,
                kind = %error.kind,
                parameter = error.parameter().unwrap_or_default(),
                "tool call failed: {}",
                error.message
            );
            let outcome = InvocationOutcome::Error {
                kind: error.kind,
                message: error.message.clone(),
            };
            on_error.report(error);
            outcome
        }
    }
}

async fn run(
    descriptor: &FunctionDescriptor,
    arguments: Option<&str>,
    cancellation: CancellationToken,
) -> Result<Value, ToolError> {
    let tool = descriptor.name();
    let bundle = parse_arguments(arguments)
        .map_err(|message| failure(tool, ToolErrorKind::ArgumentParseError, message, None))?;

    let callable = descriptor.callable().ok_or_else(|| {
        failure(
            tool,
            ToolErrorKind::NotInvocable,
            "descriptor has no bound callable",
            None,
        )
    })?;

    let args = bind(descriptor, callable.signature(), &bundle, cancellation)?;

    match AssertUnwindSafe(callable.call(args)).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(failure(tool, ToolErrorKind::CallableThrew, e.message, None)),
        Err(panic) => Err(failure(
            tool,
            ToolErrorKind::CallableThrew,
            format!("callable panicked: {}", panic_message(&*panic)),
            None,
        )),
    }
}

/// Parse the arguments text into a bundle.
pub fn parse_arguments(arguments: Option<&str>) -> Result<ArgumentBundle, String> {
    let text = arguments.ok_or_else(|| "arguments are missing".to_string())?;
    if text.trim().is_empty() {
        return Ok(ArgumentBundle::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!(
            "arguments must be a JSON object, got {}",
            json_kind(&other)
        )),
        Err(e) => Err(format!("arguments are not valid JSON: {}", e)),
    }
}

fn bind(
    descriptor: &FunctionDescriptor,
    signature: &Signature,
    bundle: &ArgumentBundle,
    cancellation: CancellationToken,
) -> Result<CallArgs, ToolError> {
    let tool = descriptor.name();
    let mut args = CallArgs::new();
    for slot in signature.slots() {
        let slot = match slot {
            Slot::Cancellation => {
                args.push_cancellation(cancellation.clone());
                continue;
            }
            Slot::Value(slot) => slot,
        };
        let value = match bundle.get(&slot.name) {
            // An explicit null for an optional parameter means "use the default".
            Some(Value::Null) if slot.optional => slot.default.clone().unwrap_or(Value::Null),
            Some(raw) => coerce::coerce(raw, &slot.ty, descriptor.types(), &slot.name)
                .map_err(|f| failure(tool, f.kind, f.message, Some(&f.path)))?,
            None if slot.optional => slot.default.clone().unwrap_or(Value::Null),
            None => {
                return Err(failure(
                    tool,
                    ToolErrorKind::MissingRequiredParameter,
                    format!("missing required parameter '{}'", slot.name),
                    Some(&slot.name),
                ))
            }
        };
        args.push_value(&slot.name, value);
    }
    Ok(args)
}

fn context(tool: &str, parameter: Option<&str>) -> ErrorContext {
    let ctx = ErrorContext::new().with_source(tool);
    match parameter {
        Some(p) => ctx.with_field_path(p),
        None => ctx,
    }
}

fn failure(
    tool: &str,
    kind: ToolErrorKind,
    message: impl Into<String>,
    parameter: Option<&str>,
) -> ToolError {
    ToolError::new(kind, message).with_context(context(tool, parameter))
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{CallError, FnCallable, ParameterSpec};
    use crate::schema::{IntegerKind, ParameterType};

    fn echo_unit() -> FunctionDescriptor {
        FunctionDescriptor::builder("echo_unit")
            .param(ParameterSpec::required("celsius", ParameterType::float()))
            .param_with_default(
                ParameterSpec::optional("unit", ParameterType::enumeration(["C", "F"])),
                json!("C"),
            )
            .bind_fn(|args| {
                let unit: String = args.get(1)?;
                Ok::<_, CallError>(unit)
            })
            .unwrap()
    }

    #[test]
    fn parse_arguments_edge_cases() {
        assert!(parse_arguments(None).is_err());
        assert!(parse_arguments(Some("  ")).unwrap().is_empty());
        assert!(parse_arguments(Some("[1]")).unwrap_err().contains("an array"));
        assert!(parse_arguments(Some("null")).is_err());
        assert!(parse_arguments(Some("{oops")).is_err());
        assert_eq!(parse_arguments(Some(r#"{"a":1}"#)).unwrap()["a"], 1);
    }

    #[test]
    fn outcome_wire_form() {
        assert_eq!(InvocationOutcome::Success(Value::Null).into_json(), neutral_envelope());
        assert_eq!(InvocationOutcome::Success(json!(3)).into_json(), json!(3));
        let err = InvocationOutcome::Error {
            kind: ToolErrorKind::CallableThrew,
            message: "x".into(),
        };
        assert!(!err.is_success());
        assert_eq!(err.into_json(), neutral_envelope());
    }

    #[tokio::test]
    async fn explicit_null_uses_default() {
        let sink = InMemoryErrorSink::default();
        let out = dispatch(
            &echo_unit(),
            Some(r#"{"celsius": 1, "unit": null}"#),
            &sink,
            CancellationToken::new(),
        )
        .await;
        assert_eq!(out, json!("C"));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn coercion_failure_names_the_element() {
        let sum = FunctionDescriptor::builder("sum")
            .param(ParameterSpec::required(
                "values",
                ParameterType::array(ParameterType::integer(IntegerKind::I32)),
            ))
            .bind_fn(|args| Ok::<_, CallError>(args.get::<Vec<i32>>(0)?.iter().sum::<i32>()))
            .unwrap();
        let sink = InMemoryErrorSink::default();
        let out = dispatch(
            &sum,
            Some(r#"{"values": [1, "two"]}"#),
            &sink,
            CancellationToken::new(),
        )
        .await;
        assert_eq!(out, neutral_envelope());
        let errors = sink.errors();
        assert_eq!(errors[0].kind, ToolErrorKind::TypeCoercionError);
        assert_eq!(errors[0].parameter(), Some("values[1]"));
        assert_eq!(errors[0].tool(), Some("sum"));
    }

    #[tokio::test]
    async fn panics_are_reported_as_callable_threw() {
        let boom = FunctionDescriptor::builder("boom")
            .bind(FnCallable::from_fn(Signature::new(), |_| -> Result<(), CallError> {
                panic!("kaboom")
            }))
            .unwrap();
        let sink = InMemoryErrorSink::default();
        let out = dispatch(&boom, Some("{}"), &sink, CancellationToken::new()).await;
        assert_eq!(out, neutral_envelope());
        let errors = sink.errors();
        assert_eq!(errors[0].kind, ToolErrorKind::CallableThrew);
        assert!(errors[0].message.contains("kaboom"));
    }
}
