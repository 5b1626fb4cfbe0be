//! Function descriptors: what a tool is called, what it takes, and how to run it.

use super::callable::{CallArgs, Callable, FnCallable, Signature, Slot, ValueSlot};
use crate::config::SchemaConfig;
use crate::error::{ErrorContext, ToolError, ToolErrorKind};
use crate::schema::{ParameterType, ParametersSchemaBuilder, SchemaSynthesizer, TypeTable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

/// A declared tool parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParameterType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSpec {
    pub fn required(name: impl Into<String>, ty: ParameterType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            description: None,
        }
    }

    pub fn optional(name: impl Into<String>, ty: ParameterType) -> Self {
        Self {
            optional: true,
            ..Self::required(name, ty)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Where the `parameters` schema of a descriptor comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ParametersSchema {
    /// Synthesized from the declared parameters, cached at creation.
    Synthesized(Value),
    /// Supplied verbatim (pass-through mode).
    Raw(Value),
}

impl ParametersSchema {
    pub fn value(&self) -> &Value {
        match self {
            ParametersSchema::Synthesized(v) | ParametersSchema::Raw(v) => v,
        }
    }
}

/// A tool: name, description, ordered parameters and either a bound callable
/// or a pass-through schema. Immutable after creation.
#[derive(Clone)]
pub struct FunctionDescriptor {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
    schema: ParametersSchema,
    callable: Option<Arc<dyn Callable>>,
    types: Arc<TypeTable>,
}

impl std::fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("schema", &self.schema)
            .field("invocable", &self.callable.is_some())
            .finish()
    }
}

impl FunctionDescriptor {
    /// Describe a native function with the default synthesizer.
    pub fn describe(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParameterSpec>,
        callable: Arc<dyn Callable>,
    ) -> Result<Self> {
        Self::describe_with(
            &SchemaSynthesizer::new(),
            name,
            description,
            parameters,
            Some(callable),
        )
    }

    /// Describe a function without binding it. The result can be encoded
    /// but not dispatched.
    pub fn declare(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParameterSpec>,
    ) -> Result<Self> {
        Self::describe_with(&SchemaSynthesizer::new(), name, description, parameters, None)
    }

    /// Describe a function against a specific type table and schema config.
    pub fn describe_with(
        synthesizer: &SchemaSynthesizer,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParameterSpec>,
        callable: Option<Arc<dyn Callable>>,
    ) -> Result<Self> {
        let name = name.into();
        check_unique(&name, &parameters)?;
        if let Some(callable) = &callable {
            check_signature(&name, &parameters, callable.signature())?;
        }

        let mut builder = ParametersSchemaBuilder::new();
        for param in &parameters {
            let schema = synthesizer.synthesize(&param.ty, param.description.as_deref())?;
            builder = builder.add_property(param.name.clone(), schema);
            if !param.optional {
                builder = builder.require(param.name.clone());
            }
        }

        Ok(Self {
            name,
            description: description.into(),
            parameters,
            schema: ParametersSchema::Synthesized(builder.build()),
            callable,
            types: synthesizer.table().clone(),
        })
    }

    /// Pass-through descriptor: `schema` is emitted verbatim and the
    /// descriptor cannot be dispatched.
    pub fn pass_through(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            schema: ParametersSchema::Raw(schema),
            callable: None,
            types: Arc::default(),
        }
    }

    /// Pass-through descriptor whose schema is derived from a Rust type.
    pub fn from_json_schema<T: schemars::JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let schema = serde_json::to_value(schemars::schema_for!(T))?;
        Ok(Self::pass_through(name, description, schema))
    }

    /// Start building a native descriptor whose callable signature follows
    /// the declared parameters.
    pub fn builder(name: impl Into<String>) -> FunctionBuilder {
        FunctionBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The `parameters` schema emitted in the tool definition.
    pub fn parameters_schema(&self) -> &Value {
        self.schema.value()
    }

    pub fn schema(&self) -> &ParametersSchema {
        &self.schema
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self.schema, ParametersSchema::Raw(_))
    }

    pub fn callable(&self) -> Option<&Arc<dyn Callable>> {
        self.callable.as_ref()
    }

    pub fn is_invocable(&self) -> bool {
        self.callable.is_some()
    }

    /// Named composite types the parameters may reference.
    pub fn types(&self) -> &TypeTable {
        &self.types
    }
}

fn check_unique(tool: &str, parameters: &[ParameterSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for param in parameters {
        if !seen.insert(param.name.as_str()) {
            return Err(ToolError::new(
                ToolErrorKind::DuplicateParameter,
                format!("parameter '{}' is declared more than once", param.name),
            )
            .with_context(
                ErrorContext::new()
                    .with_field_path(param.name.clone())
                    .with_source(tool),
            )
            .into());
        }
    }
    Ok(())
}

fn check_signature(tool: &str, parameters: &[ParameterSpec], signature: &Signature) -> Result<()> {
    let declared: Vec<(&str, &ParameterType, bool)> = parameters
        .iter()
        .map(|p| (p.name.as_str(), &p.ty, p.optional))
        .collect();
    let expected: Vec<(&str, &ParameterType, bool)> = signature
        .value_slots()
        .map(|s| (s.name.as_str(), &s.ty, s.optional))
        .collect();
    if declared == expected {
        return Ok(());
    }
    let render = |items: &[(&str, &ParameterType, bool)]| {
        items
            .iter()
            .map(|(n, t, optional)| {
                let marker = if *optional { "?" } else { "" };
                format!("{}{}: {}", n, marker, t.label())
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    Err(Error::SignatureMismatch {
        tool: tool.to_string(),
        declared: render(&declared),
        expected: render(&expected),
    })
}

/// Builder producing a descriptor and its callable signature in one pass.
///
/// ```rust
/// use ai_lib_tools::function::{FunctionDescriptor, ParameterSpec};
/// use ai_lib_tools::schema::ParameterType;
/// use ai_lib_tools::CallError;
///
/// let to_f = FunctionDescriptor::builder("to_fahrenheit")
///     .description("Convert Celsius to Fahrenheit")
///     .param(ParameterSpec::required("celsius", ParameterType::float()))
///     .bind_fn(|args| {
///         let c: f64 = args.get(0)?;
///         Ok::<_, CallError>(c * 9.0 / 5.0 + 32.0)
///     })
///     .unwrap();
/// assert!(to_f.is_invocable());
/// ```
#[derive(Debug, Clone)]
pub struct FunctionBuilder {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
    signature: Signature,
    synthesizer: SchemaSynthesizer,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            signature: Signature::new(),
            synthesizer: SchemaSynthesizer::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn types(mut self, types: Arc<TypeTable>) -> Self {
        self.synthesizer = self.synthesizer.with_table(types);
        self
    }

    pub fn schema_config(mut self, config: SchemaConfig) -> Self {
        self.synthesizer = self.synthesizer.with_config(config);
        self
    }

    pub fn synthesizer(mut self, synthesizer: SchemaSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Declare a parameter. Optional parameters default to `null`.
    pub fn param(self, spec: ParameterSpec) -> Self {
        self.push(spec, None)
    }

    /// Declare an optional parameter with a default value.
    pub fn param_with_default(self, spec: ParameterSpec, default: Value) -> Self {
        let spec = ParameterSpec {
            optional: true,
            ..spec
        };
        self.push(spec, Some(default))
    }

    /// Insert the cancellation marker at the current position.
    pub fn cancellation(mut self) -> Self {
        self.signature.push(Slot::Cancellation);
        self
    }

    fn push(mut self, spec: ParameterSpec, default: Option<Value>) -> Self {
        let default = if spec.optional {
            Some(default.unwrap_or(Value::Null))
        } else {
            None
        };
        self.signature.push(Slot::Value(ValueSlot {
            name: spec.name.clone(),
            ty: spec.ty.clone(),
            optional: spec.optional,
            default,
        }));
        self.parameters.push(spec);
        self
    }

    /// Bind a prepared callable. Its signature must match the declared parameters.
    pub fn bind(self, callable: Arc<dyn Callable>) -> Result<FunctionDescriptor> {
        FunctionDescriptor::describe_with(
            &self.synthesizer,
            self.name,
            self.description,
            self.parameters,
            Some(callable),
        )
    }

    /// Bind a synchronous closure.
    pub fn bind_fn<F, R, E>(mut self, f: F) -> Result<FunctionDescriptor>
    where
        F: Fn(CallArgs) -> std::result::Result<R, E> + Send + Sync + 'static,
        R: Serialize + 'static,
        E: Display + 'static,
    {
        let signature = std::mem::take(&mut self.signature);
        self.bind(FnCallable::from_fn(signature, f))
    }

    /// Bind an asynchronous closure.
    pub fn bind_async<F, Fut, R, E>(mut self, f: F) -> Result<FunctionDescriptor>
    where
        F: Fn(CallArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
        R: Serialize + Send + 'static,
        E: Display + Send + 'static,
    {
        let signature = std::mem::take(&mut self.signature);
        self.bind(FnCallable::from_async(signature, f))
    }

    /// Finish without a callable (schema-only descriptor).
    pub fn declare(self) -> Result<FunctionDescriptor> {
        FunctionDescriptor::describe_with(
            &self.synthesizer,
            self.name,
            self.description,
            self.parameters,
            None,
        )
    }
}
