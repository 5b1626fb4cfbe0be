//! 函数描述模块：工具名称、参数列表与原生可调用对象的绑定。
//!
//! # Function Module
//!
//! A [`FunctionDescriptor`] combines a tool's name, description and ordered
//! [`ParameterSpec`]s with either a bound [`Callable`] or a pass-through raw
//! schema. Parameter schemas are synthesized once, when the descriptor is
//! created, and cached for its lifetime.
//!
//! | Constructor | Callable | Schema |
//! |-------------|----------|--------|
//! | [`FunctionDescriptor::describe`] / [`FunctionDescriptor::builder`] | yes | synthesized |
//! | [`FunctionDescriptor::declare`] | no | synthesized |
//! | [`FunctionDescriptor::pass_through`] | no | raw |
//! | [`decode_tool_definition`](crate::codec::decode_tool_definition) | no | raw |

pub mod callable;
pub mod descriptor;

pub use callable::{Arg, CallArgs, CallError, Callable, FnCallable, Signature, Slot, ValueSlot};
pub use descriptor::{FunctionBuilder, FunctionDescriptor, ParameterSpec, ParametersSchema};
