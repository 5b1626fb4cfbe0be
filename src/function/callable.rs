//! Typed call adapters: the bridge between decoded arguments and native code.
//!
//! A [`Callable`] is created once at registration time. It declares its
//! parameter order as a [`Signature`] and receives fully bound positional
//! [`CallArgs`] at dispatch time; no reflection happens during dispatch.

use crate::schema::ParameterType;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A value parameter declared by a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSlot {
    pub name: String,
    pub ty: ParameterType,
    pub optional: bool,
    /// Value used when an optional parameter is absent from the arguments.
    pub default: Option<Value>,
}

/// One position in a callable's parameter list.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Value(ValueSlot),
    /// Reserved marker: receives the dispatch's cancellation token.
    Cancellation,
}

/// Declared parameter order of a callable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    slots: Vec<Slot>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a required parameter.
    pub fn param(mut self, name: impl Into<String>, ty: ParameterType) -> Self {
        self.slots.push(Slot::Value(ValueSlot {
            name: name.into(),
            ty,
            optional: false,
            default: None,
        }));
        self
    }

    /// Append an optional parameter. Without an explicit default the
    /// parameter defaults to JSON `null`.
    pub fn optional(
        mut self,
        name: impl Into<String>,
        ty: ParameterType,
        default: Option<Value>,
    ) -> Self {
        self.slots.push(Slot::Value(ValueSlot {
            name: name.into(),
            ty,
            optional: true,
            default: Some(default.unwrap_or(Value::Null)),
        }));
        self
    }

    /// Append the cancellation marker.
    pub fn cancellation(mut self) -> Self {
        self.slots.push(Slot::Cancellation);
        self
    }

    pub(crate) fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Value slots in declaration order, skipping the cancellation marker.
    pub fn value_slots(&self) -> impl Iterator<Item = &ValueSlot> {
        self.slots.iter().filter_map(|s| match s {
            Slot::Value(v) => Some(v),
            Slot::Cancellation => None,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Error raised by a callable. Dispatch reports it as `CallableThrew`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CallError {
    pub message: String,
}

impl CallError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A bound argument.
#[derive(Debug, Clone)]
pub enum Arg {
    Value(Value),
    Cancellation(CancellationToken),
}

/// Positional arguments bound for a single invocation.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    names: Vec<Option<String>>,
    args: Vec<Arg>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_value(&mut self, name: &str, value: Value) {
        self.names.push(Some(name.to_string()));
        self.args.push(Arg::Value(value));
    }

    pub(crate) fn push_cancellation(&mut self, token: CancellationToken) {
        self.names.push(None);
        self.args.push(Arg::Cancellation(token));
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Raw JSON value at `index`, `None` for the cancellation slot.
    pub fn value(&self, index: usize) -> Option<&Value> {
        match self.args.get(index)? {
            Arg::Value(v) => Some(v),
            Arg::Cancellation(_) => None,
        }
    }

    /// Deserialize the argument at `index` into a native type.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, CallError> {
        let value = self
            .value(index)
            .ok_or_else(|| CallError::new(format!("no value argument at position {}", index)))?;
        serde_json::from_value(value.clone())
            .map_err(|e| CallError::new(format!("argument {}: {}", index, e)))
    }

    /// Deserialize the argument bound to parameter `name`.
    pub fn get_named<T: DeserializeOwned>(&self, name: &str) -> Result<T, CallError> {
        let index = self
            .names
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .ok_or_else(|| CallError::new(format!("no argument named '{}'", name)))?;
        self.get(index)
    }

    /// The injected cancellation token, if the signature declares one.
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.args.iter().find_map(|a| match a {
            Arg::Cancellation(t) => Some(t),
            Arg::Value(_) => None,
        })
    }
}

/// A native function exposed as a tool.
#[async_trait]
pub trait Callable: Send + Sync {
    fn signature(&self) -> &Signature;

    /// Invoke with fully bound arguments. `Value::Null` means "no result".
    async fn call(&self, args: CallArgs) -> Result<Value, CallError>;
}

type AdapterFn = dyn Fn(CallArgs) -> BoxFuture<'static, Result<Value, CallError>> + Send + Sync;

/// Closure-backed [`Callable`].
pub struct FnCallable {
    signature: Signature,
    f: Box<AdapterFn>,
}

impl FnCallable {
    /// Adapt a synchronous closure.
    pub fn from_fn<F, R, E>(signature: Signature, f: F) -> Arc<dyn Callable>
    where
        F: Fn(CallArgs) -> Result<R, E> + Send + Sync + 'static,
        R: Serialize + 'static,
        E: Display + 'static,
    {
        let adapter = move |args: CallArgs| {
            let out = encode_return(f(args));
            futures::future::ready(out).boxed()
        };
        Arc::new(Self {
            signature,
            f: Box::new(adapter),
        })
    }

    /// Adapt an asynchronous closure; dispatch awaits it to completion.
    pub fn from_async<F, Fut, R, E>(signature: Signature, f: F) -> Arc<dyn Callable>
    where
        F: Fn(CallArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Serialize + Send + 'static,
        E: Display + Send + 'static,
    {
        let adapter = move |args: CallArgs| {
            let fut = f(args);
            async move { encode_return(fut.await) }.boxed()
        };
        Arc::new(Self {
            signature,
            f: Box::new(adapter),
        })
    }
}

fn encode_return<R: Serialize, E: Display>(out: Result<R, E>) -> Result<Value, CallError> {
    let value = out.map_err(|e| CallError::new(e.to_string()))?;
    serde_json::to_value(value)
        .map_err(|e| CallError::new(format!("result is not serializable: {}", e)))
}

#[async_trait]
impl Callable for FnCallable {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    async fn call(&self, args: CallArgs) -> Result<Value, CallError> {
        (self.f)(args).await
    }
}
