//! Coercion of untyped JSON arguments to declared parameter types.

use crate::error::ToolErrorKind;
use crate::schema::{FloatKind, IntegerKind, ObjectType, ParameterType, StringFormat, TypeTable};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

// yyyy-mm-dd, optionally followed by a time of day and an offset.
static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(?:[Tt ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:[Zz]|[+-]\d{2}:?\d{2})?)?$")
        .expect("date-time pattern is valid")
});

// [-][d.]hh:mm[:ss[.fff]] or ISO 8601 PnYnMnDTnHnMnS.
static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:-?(?:\d+\.)?\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?|-?P(?:\d+Y)?(?:\d+M)?(?:\d+W)?(?:\d+D)?(?:T(?:\d+H)?(?:\d+M)?(?:\d+(?:\.\d+)?S)?)?)$",
    )
    .expect("duration pattern is valid")
});

/// Why a value could not be coerced, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CoercionFailure {
    pub kind: ToolErrorKind,
    /// Path of the offending value, e.g. `values[2]` or `origin.x`.
    pub path: String,
    pub message: String,
}

impl CoercionFailure {
    fn mismatch(path: &str, ty: &ParameterType, value: &Value) -> Self {
        Self {
            kind: ToolErrorKind::TypeCoercionError,
            path: path.to_string(),
            message: format!("expected {}, got {}", ty.label(), describe(value)),
        }
    }
}

fn describe(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() > 64 {
        let head: String = text.chars().take(61).collect();
        format!("{}...", head)
    } else {
        text
    }
}

/// Coerce `value` to `ty`. `path` names the value in failure reports.
pub(crate) fn coerce(
    value: &Value,
    ty: &ParameterType,
    types: &TypeTable,
    path: &str,
) -> Result<Value, CoercionFailure> {
    let fail = || CoercionFailure::mismatch(path, ty, value);
    match ty {
        ParameterType::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err(fail()),
        },
        ParameterType::Integer(kind) => integer(value, *kind).ok_or_else(fail),
        ParameterType::Float(kind) => float(value, *kind).ok_or_else(fail),
        ParameterType::String(format) => {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return Err(fail()),
            };
            if matches_format(&text, *format) {
                Ok(Value::String(text))
            } else {
                Err(fail())
            }
        }
        ParameterType::Enum(members) => {
            let text = value.as_str().ok_or_else(fail)?;
            members
                .iter()
                .find(|m| m.eq_ignore_ascii_case(text.trim()))
                .map(|m| Value::String(m.clone()))
                .ok_or_else(|| CoercionFailure {
                    kind: ToolErrorKind::UnknownEnumMember,
                    path: path.to_string(),
                    message: format!("'{}' is not one of [{}]", text, members.join(", ")),
                })
        }
        ParameterType::Array(element) => {
            let items = value.as_array().ok_or_else(fail)?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| coerce(item, element, types, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        ParameterType::Object(object) => {
            let map = value.as_object().ok_or_else(fail)?;
            object_members(map, object, types, path)
        }
        ParameterType::Named(name) => {
            let map = value.as_object().ok_or_else(fail)?;
            match types.resolve(name) {
                Some(object) => object_members(map, object, types, path),
                // Unresolved names are plain objects.
                None => Ok(value.clone()),
            }
        }
    }
}

fn object_members(
    map: &Map<String, Value>,
    object: &ObjectType,
    types: &TypeTable,
    path: &str,
) -> Result<Value, CoercionFailure> {
    let mut out = map.clone();
    for member in &object.members {
        if let Some(v) = map.get(&member.name) {
            let coerced = coerce(v, &member.ty, types, &format!("{}.{}", path, member.name))?;
            out.insert(member.name.clone(), coerced);
        }
    }
    Ok(Value::Object(out))
}

fn integer(value: &Value, kind: IntegerKind) -> Option<Value> {
    let wide: i128 = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i as i128
            } else if let Some(u) = n.as_u64() {
                u as i128
            } else {
                let f = n.as_f64()?;
                if !f.is_finite() || f.fract() != 0.0 || f.abs() > 1.9e19 {
                    return None;
                }
                f as i128
            }
        }
        Value::String(s) => s.trim().parse::<i128>().ok()?,
        _ => return None,
    };
    let (min, max) = kind.bounds();
    if wide < min || wide > max {
        return None;
    }
    if wide < 0 {
        i64::try_from(wide).ok().map(Value::from)
    } else {
        u64::try_from(wide).ok().map(Value::from)
    }
}

fn float(value: &Value, kind: FloatKind) -> Option<Value> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !f.is_finite() {
        return None;
    }
    if kind == FloatKind::F32 && f.abs() > f32::MAX as f64 {
        return None;
    }
    match value {
        Value::Number(_) => Some(value.clone()),
        _ => Number::from_f64(f).map(Value::Number),
    }
}

fn matches_format(text: &str, format: StringFormat) -> bool {
    match format {
        StringFormat::Plain => true,
        StringFormat::Char => text.chars().count() == 1,
        StringFormat::Uri => url::Url::parse(text).is_ok(),
        StringFormat::Guid => uuid::Uuid::parse_str(text).is_ok(),
        StringFormat::DateTime => DATE_TIME.is_match(text),
        StringFormat::Duration => DURATION.is_match(text),
    }
}
