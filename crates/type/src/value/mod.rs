// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod into;
mod record;
mod r#type;

pub use into::IntoValue;
pub use r#type::Type;
pub use record::Record;

/// A flat JSON object as stored by the `json-flat` format.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// A value, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// A 4-byte signed integer
	Int4(i32),
	/// An 8-byte signed integer
	Int8(i64),
	/// A UTF-8 encoded text.
	Utf8(String),
	/// A decoded compact record
	Record(Record),
	/// A flat JSON object
	Json(JsonObject),
}

impl Value {
	pub fn undefined() -> Self {
		Value::Undefined
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int4(v: impl Into<i32>) -> Self {
		Value::Int4(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn get_type(&self) -> Type {
		match self {
			Value::Undefined => Type::Undefined,
			Value::Boolean(_) => Type::Boolean,
			Value::Int4(_) => Type::Int4,
			Value::Int8(_) => Type::Int8,
			Value::Utf8(_) => Type::Utf8,
			Value::Record(_) => Type::Record,
			Value::Json(_) => Type::Json,
		}
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Boolean(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_i32(&self) -> Option<i32> {
		match self {
			Value::Int4(v) => Some(*v),
			Value::Int8(v) => i32::try_from(*v).ok(),
			_ => None,
		}
	}

	/// Integers of either width, widened.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int4(v) => Some(*v as i64),
			Value::Int8(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Utf8(v) => Some(v.as_str()),
			_ => None,
		}
	}

	pub fn as_record(&self) -> Option<&Record> {
		match self {
			Value::Record(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_json(&self) -> Option<&crate::value::JsonObject> {
		match self {
			Value::Json(v) => Some(v),
			_ => None,
		}
	}

	/// SQL equality: integers compare numerically across widths and an
	/// undefined operand never matches anything, itself included.
	pub fn sql_eq(&self, other: &Value) -> bool {
		match (self, other) {
			(Value::Undefined, _) | (_, Value::Undefined) => false,
			(Value::Int4(_) | Value::Int8(_), Value::Int4(_) | Value::Int8(_)) => {
				self.as_i64() == other.as_i64()
			}
			_ => self == other,
		}
	}

	/// Converts a scalar JSON value into a value of the requested type.
	///
	/// Returns `None` when the JSON value cannot represent that type.
	pub fn from_json(json: &serde_json::Value, target: Type) -> Option<Value> {
		match (json, target) {
			(serde_json::Value::Null, _) => Some(Value::Undefined),
			(serde_json::Value::Bool(b), Type::Boolean) => Some(Value::Boolean(*b)),
			(serde_json::Value::Number(n), Type::Int4) => {
				n.as_i64().and_then(|v| i32::try_from(v).ok()).map(Value::Int4)
			}
			(serde_json::Value::Number(n), Type::Int8) => n.as_i64().map(Value::Int8),
			(serde_json::Value::String(s), Type::Utf8) => Some(Value::Utf8(s.clone())),
			_ => None,
		}
	}

	/// The JSON representation of a scalar; structured values have none.
	pub fn to_json(&self) -> Option<serde_json::Value> {
		match self {
			Value::Undefined => Some(serde_json::Value::Null),
			Value::Boolean(v) => Some(serde_json::Value::Bool(*v)),
			Value::Int4(v) => Some(serde_json::Value::from(*v)),
			Value::Int8(v) => Some(serde_json::Value::from(*v)),
			Value::Utf8(v) => Some(serde_json::Value::String(v.clone())),
			Value::Record(_) | Value::Json(_) => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => f.write_str("null"),
			Value::Boolean(v) => write!(f, "{v}"),
			Value::Int4(v) => write!(f, "{v}"),
			Value::Int8(v) => write!(f, "{v}"),
			Value::Utf8(v) => f.write_str(v),
			Value::Record(v) => write!(f, "{v}"),
			Value::Json(v) => match serde_json::to_string(v) {
				Ok(text) => f.write_str(&text),
				Err(_) => Err(std::fmt::Error),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	mod sql_eq {
		use crate::Value;

		#[test]
		fn test_integers_compare_across_widths() {
			assert!(Value::Int4(9540576).sql_eq(&Value::Int8(9540576)));
			assert!(Value::Int8(-1).sql_eq(&Value::Int4(-1)));
			assert!(!Value::Int4(1).sql_eq(&Value::Int8(2)));
		}

		#[test]
		fn test_undefined_never_matches() {
			assert!(!Value::Undefined.sql_eq(&Value::Undefined));
			assert!(!Value::Undefined.sql_eq(&Value::Int4(1)));
			assert!(!Value::utf8("a").sql_eq(&Value::Undefined));
		}

		#[test]
		fn test_strings() {
			assert!(Value::utf8("AU").sql_eq(&Value::utf8("AU")));
			assert!(!Value::utf8("AU").sql_eq(&Value::utf8("au")));
			assert!(!Value::utf8("1").sql_eq(&Value::Int4(1)));
		}
	}

	mod json {
		use crate::{Type, Value};

		#[test]
		fn test_from_json() {
			let json = serde_json::json!(354644);
			assert_eq!(Value::from_json(&json, Type::Int4), Some(Value::Int4(354644)));
			assert_eq!(Value::from_json(&json, Type::Int8), Some(Value::Int8(354644)));
			assert_eq!(Value::from_json(&json, Type::Utf8), None);
			assert_eq!(Value::from_json(&serde_json::Value::Null, Type::Utf8), Some(Value::Undefined));
		}

		#[test]
		fn test_from_json_int4_out_of_range() {
			let json = serde_json::json!(i64::MAX);
			assert_eq!(Value::from_json(&json, Type::Int4), None);
		}

		#[test]
		fn test_to_json() {
			assert_eq!(Value::utf8("AU").to_json(), Some(serde_json::json!("AU")));
			assert_eq!(Value::Int8(5).to_json(), Some(serde_json::json!(5)));
			assert_eq!(Value::Undefined.to_json(), Some(serde_json::Value::Null));
		}
	}

	#[test]
	fn test_get_type() {
		assert_eq!(Value::Int4(1).get_type(), Type::Int4);
		assert_eq!(Value::utf8("x").get_type(), Type::Utf8);
		assert_eq!(Value::Undefined.get_type(), Type::Undefined);
	}

	#[test]
	fn test_display() {
		assert_eq!(Value::Int4(1).to_string(), "1");
		assert_eq!(Value::utf8("London").to_string(), "London");
		assert_eq!(Value::Undefined.to_string(), "null");
	}
}
