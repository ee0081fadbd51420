// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Raw payloads of scalar map values: fixed-width little-endian integers,
//! a single byte for booleans and plain UTF-8 for strings.

use gridkv_type::{Error, Result, Type, Value};

pub fn encode_scalar(value: &Value) -> Result<Vec<u8>> {
	match value {
		Value::Boolean(v) => Ok(vec![*v as u8]),
		Value::Int4(v) => Ok(v.to_le_bytes().to_vec()),
		Value::Int8(v) => Ok(v.to_le_bytes().to_vec()),
		Value::Utf8(v) => Ok(v.as_bytes().to_vec()),
		other => Err(Error::malformed_payload(format!("{} is not a scalar value", other.get_type()))),
	}
}

/// Decodes a scalar payload as `target`. Integer payloads of either width
/// are accepted for either integer type as long as the value fits.
pub fn decode_scalar(bytes: &[u8], target: Type) -> Result<Value> {
	match target {
		Type::Boolean => match bytes {
			[0] => Ok(Value::Boolean(false)),
			[1] => Ok(Value::Boolean(true)),
			_ => Err(Error::malformed_payload(format!("{} bytes are not a boolean", bytes.len()))),
		},
		Type::Int4 | Type::Int8 => {
			let wide = match bytes.len() {
				4 => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64,
				8 => {
					let mut array = [0u8; 8];
					array.copy_from_slice(bytes);
					i64::from_le_bytes(array)
				}
				len => return Err(Error::malformed_payload(format!("{len} bytes are not an integer"))),
			};
			if target == Type::Int8 {
				return Ok(Value::Int8(wide));
			}
			i32::try_from(wide)
				.map(Value::Int4)
				.map_err(|_| Error::malformed_payload(format!("{wide} does not fit into {target}")))
		}
		Type::Utf8 => String::from_utf8(bytes.to_vec())
			.map(Value::Utf8)
			.map_err(|_| Error::malformed_payload("string payload is not valid utf8")),
		other => Err(Error::malformed_payload(format!("{other} is not a scalar type"))),
	}
}
