//! Native type descriptions used as input to schema synthesis and coercion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Integer kinds, carrying the width/signedness hint of the native type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    I64,
    Isize,
    U32,
    U64,
    Usize,
}

impl IntegerKind {
    /// Inclusive bounds of the kind, widened to `i128`.
    pub fn bounds(&self) -> (i128, i128) {
        match self {
            IntegerKind::I8 => (i8::MIN as i128, i8::MAX as i128),
            IntegerKind::U8 => (0, u8::MAX as i128),
            IntegerKind::I16 => (i16::MIN as i128, i16::MAX as i128),
            IntegerKind::U16 => (0, u16::MAX as i128),
            IntegerKind::I32 => (i32::MIN as i128, i32::MAX as i128),
            IntegerKind::I64 | IntegerKind::Isize => (i64::MIN as i128, i64::MAX as i128),
            IntegerKind::U32 => (0, u32::MAX as i128),
            IntegerKind::U64 | IntegerKind::Usize => (0, u64::MAX as i128),
        }
    }
}

/// Floating point kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatKind {
    F32,
    F64,
    Decimal,
}

/// Textual formats a string parameter may carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    #[default]
    Plain,
    /// Exactly one character.
    Char,
    Uri,
    Guid,
    DateTime,
    Duration,
}

/// A writable member of a composite type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParameterType,
}

/// A composite type: ordered writable members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    #[serde(default)]
    pub members: Vec<Member>,
}

impl ObjectType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, name: impl Into<String>, ty: ParameterType) -> Self {
        self.members.push(Member {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Description of a native parameter type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum ParameterType {
    Boolean,
    Integer(IntegerKind),
    Float(FloatKind),
    String(StringFormat),
    Enum(Vec<String>),
    Array(Box<ParameterType>),
    Object(ObjectType),
    /// Reference to a composite registered in a [`TypeTable`].
    Named(String),
}

impl ParameterType {
    pub fn boolean() -> Self {
        ParameterType::Boolean
    }

    pub fn integer(kind: IntegerKind) -> Self {
        ParameterType::Integer(kind)
    }

    pub fn float() -> Self {
        ParameterType::Float(FloatKind::F64)
    }

    pub fn string() -> Self {
        ParameterType::String(StringFormat::Plain)
    }

    pub fn formatted(format: StringFormat) -> Self {
        ParameterType::String(format)
    }

    pub fn enumeration<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParameterType::Enum(members.into_iter().map(Into::into).collect())
    }

    pub fn array(element: ParameterType) -> Self {
        ParameterType::Array(Box::new(element))
    }

    pub fn object(object: ObjectType) -> Self {
        ParameterType::Object(object)
    }

    pub fn named(name: impl Into<String>) -> Self {
        ParameterType::Named(name.into())
    }

    /// Short label used in error messages.
    pub fn label(&self) -> String {
        match self {
            ParameterType::Boolean => "boolean".to_string(),
            ParameterType::Integer(k) => format!("{:?}", k).to_lowercase(),
            ParameterType::Float(k) => format!("{:?}", k).to_lowercase(),
            ParameterType::String(StringFormat::Plain) => "string".to_string(),
            ParameterType::String(f) => format!("string({:?})", f).to_lowercase(),
            ParameterType::Enum(m) => format!("enum[{}]", m.join(",")),
            ParameterType::Array(e) => format!("array<{}>", e.label()),
            ParameterType::Object(_) => "object".to_string(),
            ParameterType::Named(n) => n.clone(),
        }
    }
}

/// Registry of named composite types, built once at registration time.
///
/// Named references are how self-referential composites are expressed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTable {
    types: HashMap<String, ObjectType>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, object: ObjectType) -> &mut Self {
        self.types.insert(name.into(), object);
        self
    }

    pub fn with(mut self, name: impl Into<String>, object: ObjectType) -> Self {
        self.register(name, object);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&ObjectType> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
