//! 类型模式合成模块：将原生参数类型描述转换为 JSON Schema 片段。
//!
//! # Schema Module
//!
//! Type-schema synthesis: turns an explicit native type description
//! ([`ParameterType`]) into the JSON-Schema dialect used in tool definitions.
//!
//! ## Mapping
//!
//! | Type | Schema |
//! |------|--------|
//! | `Boolean` | `{"type":"boolean"}` |
//! | `Integer(i8/u8/i16/u16)` | `{"type":"integer","description":<range>}` |
//! | `Integer(i32/i64/isize)` | `{"type":"integer"}` |
//! | `Integer(u32/u64/usize)`, `Float` | `{"type":"integer","description":<note>}` |
//! | `String(..)` | `{"type":"string"}` plus a format note when formatted |
//! | `Enum` | `{"type":"string","enum":[...]}` |
//! | `Array` | `{"type":"array","items":...}` |
//! | `Object` / `Named` | `{"type":"object","properties":{...}}` |
//!
//! Every node also carries a description unless the placeholder is disabled
//! (see [`SchemaConfig`](crate::config::SchemaConfig)).
//!
//! ## Example
//!
//! ```rust
//! use ai_lib_tools::schema::{synthesize, ParameterType};
//!
//! let schema = synthesize(&ParameterType::enumeration(["C", "F"]), Some("unit")).unwrap();
//! assert_eq!(schema["type"], "string");
//! assert_eq!(schema["enum"][1], "F");
//! ```

pub mod error;
pub mod parameters;
pub mod synthesizer;
pub mod types;

pub use error::SchemaError;
pub use parameters::ParametersSchemaBuilder;
pub use synthesizer::{synthesize, type_info, SchemaSynthesizer};
pub use types::{
    FloatKind, IntegerKind, Member, ObjectType, ParameterType, StringFormat, TypeTable,
};
