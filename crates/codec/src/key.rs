// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Canonical, order-preserving key bytes.
//!
//! Every key starts with a tag byte, followed by:
//!
//! * boolean: `0x00` for `false`, `0x01` for `true`.
//! * integer (either width): i64 big-endian, sign bit flipped.
//! * string: `0x00` escaped as `0x00ff`, terminated with `0x0000`.
//! * compact: the encoded record bytes.
//! * json: the serialized object, keys in sorted order.
//!
//! Integers are widened before encoding, so `1` as int32 and as int64 map to
//! the same entry.

use std::fmt::{Debug, Formatter};

use gridkv_type::{Error, JsonObject, Result, Value};

const TAG_BOOLEAN: u8 = 0x01;
const TAG_INTEGER: u8 = 0x02;
const TAG_UTF8: u8 = 0x03;
const TAG_COMPACT: u8 = 0x04;
const TAG_JSON: u8 = 0x05;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EncodedKey(Vec<u8>);

/// A key taken apart again.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyPayload<'a> {
	Scalar(Value),
	Compact(&'a [u8]),
	Json(JsonObject),
}

impl EncodedKey {
	pub fn boolean(value: bool) -> Self {
		EncodedKey(vec![TAG_BOOLEAN, value as u8])
	}

	pub fn integer(value: i64) -> Self {
		let mut bytes = Vec::with_capacity(9);
		bytes.push(TAG_INTEGER);
		bytes.extend_from_slice(&((value as u64) ^ (1 << 63)).to_be_bytes());
		EncodedKey(bytes)
	}

	pub fn utf8(value: &str) -> Self {
		let mut bytes = Vec::with_capacity(value.len() + 3);
		bytes.push(TAG_UTF8);
		for &b in value.as_bytes() {
			match b {
				0x00 => bytes.extend_from_slice(&[0x00, 0xff]),
				b => bytes.push(b),
			}
		}
		bytes.extend_from_slice(&[0x00, 0x00]);
		EncodedKey(bytes)
	}

	pub fn compact(encoded: &[u8]) -> Self {
		let mut bytes = Vec::with_capacity(encoded.len() + 1);
		bytes.push(TAG_COMPACT);
		bytes.extend_from_slice(encoded);
		EncodedKey(bytes)
	}

	pub fn json(object: &JsonObject) -> Result<Self> {
		let mut bytes = vec![TAG_JSON];
		serde_json::to_writer(&mut bytes, object)
			.map_err(|err| Error::malformed_payload(format!("json key: {err}")))?;
		Ok(EncodedKey(bytes))
	}

	/// Encodes a scalar or JSON key. Records have to go through the codec
	/// first and use [`EncodedKey::compact`].
	pub fn from_value(value: &Value) -> Result<Self> {
		match value {
			Value::Boolean(v) => Ok(Self::boolean(*v)),
			Value::Int4(v) => Ok(Self::integer(*v as i64)),
			Value::Int8(v) => Ok(Self::integer(*v)),
			Value::Utf8(v) => Ok(Self::utf8(v)),
			Value::Json(v) => Self::json(v),
			Value::Undefined => Err(Error::malformed_payload("null cannot be used as a key")),
			Value::Record(_) => Err(Error::malformed_payload("record keys must be compact encoded")),
		}
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn decode(&self) -> Result<KeyPayload<'_>> {
		let (tag, rest) =
			self.0.split_first().ok_or_else(|| Error::malformed_payload("empty key"))?;
		match *tag {
			TAG_BOOLEAN => match rest {
				[0] => Ok(KeyPayload::Scalar(Value::Boolean(false))),
				[1] => Ok(KeyPayload::Scalar(Value::Boolean(true))),
				_ => Err(Error::malformed_payload("invalid boolean key")),
			},
			TAG_INTEGER => {
				let bytes: [u8; 8] =
					rest.try_into().map_err(|_| Error::malformed_payload("invalid integer key"))?;
				let value = (u64::from_be_bytes(bytes) ^ (1 << 63)) as i64;
				Ok(KeyPayload::Scalar(Value::Int8(value)))
			}
			TAG_UTF8 => Ok(KeyPayload::Scalar(Value::Utf8(decode_utf8(rest)?))),
			TAG_COMPACT => Ok(KeyPayload::Compact(rest)),
			TAG_JSON => serde_json::from_slice(rest)
				.map(KeyPayload::Json)
				.map_err(|err| Error::malformed_payload(format!("json key: {err}"))),
			other => Err(Error::malformed_payload(format!("unknown key tag {other}"))),
		}
	}
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
	let mut out = Vec::with_capacity(bytes.len());
	let mut iter = bytes.iter();
	loop {
		match iter.next() {
			Some(0x00) => match iter.next() {
				Some(0x00) => break,
				Some(0xff) => out.push(0x00),
				_ => return Err(Error::malformed_payload("invalid escape in string key")),
			},
			Some(b) => out.push(*b),
			None => return Err(Error::malformed_payload("unterminated string key")),
		}
	}
	if iter.next().is_some() {
		return Err(Error::malformed_payload("trailing bytes after string key"));
	}
	String::from_utf8(out).map_err(|_| Error::malformed_payload("string key is not valid utf8"))
}

impl Debug for EncodedKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("EncodedKey(0x")?;
		for b in &self.0 {
			write!(f, "{b:02x}")?;
		}
		f.write_str(")")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn hex(key: &EncodedKey) -> String {
		key.as_bytes().iter().map(|b| format!("{b:02x}")).collect()
	}

	#[test]
	fn test_integer_bytes() {
		assert_eq!(hex(&EncodedKey::integer(i64::MIN)), "020000000000000000");
		assert_eq!(hex(&EncodedKey::integer(-1)), "027fffffffffffffff");
		assert_eq!(hex(&EncodedKey::integer(0)), "028000000000000000");
		assert_eq!(hex(&EncodedKey::integer(1)), "028000000000000001");
		assert_eq!(hex(&EncodedKey::integer(i64::MAX)), "02ffffffffffffffff");
	}

	#[test]
	fn test_string_bytes() {
		assert_eq!(hex(&EncodedKey::utf8("")), "030000");
		assert_eq!(hex(&EncodedKey::utf8("a\0b")), "036100ff620000");
	}

	#[test]
	fn test_integer_widths_share_a_key() {
		assert_eq!(
			EncodedKey::from_value(&Value::Int4(7)).unwrap(),
			EncodedKey::from_value(&Value::Int8(7)).unwrap()
		);
	}

	#[test]
	fn test_order_preserving() {
		let mut keys: Vec<EncodedKey> = [5i64, -3, 0, i64::MAX, -1000].iter().map(|v| EncodedKey::integer(*v)).collect();
		keys.sort();
		let decoded: Vec<Value> = keys
			.iter()
			.map(|k| match k.decode().unwrap() {
				KeyPayload::Scalar(v) => v,
				other => panic!("unexpected {other:?}"),
			})
			.collect();
		assert_eq!(
			decoded,
			vec![Value::Int8(-1000), Value::Int8(-3), Value::Int8(0), Value::Int8(5), Value::Int8(i64::MAX)]
		);

		assert!(EncodedKey::utf8("AU") < EncodedKey::utf8("GB"));
		assert!(EncodedKey::utf8("a") < EncodedKey::utf8("a\0"));
	}

	#[test]
	fn test_decode() {
		assert_eq!(EncodedKey::utf8("x\0y").decode().unwrap(), KeyPayload::Scalar(Value::utf8("x\0y")));
		assert_eq!(EncodedKey::boolean(true).decode().unwrap(), KeyPayload::Scalar(Value::Boolean(true)));
		assert_eq!(EncodedKey::compact(&[1, 2, 3]).decode().unwrap(), KeyPayload::Compact(&[1, 2, 3]));

		let mut object = JsonObject::new();
		object.insert("id".to_string(), serde_json::json!(1));
		assert_eq!(EncodedKey::json(&object).unwrap().decode().unwrap(), KeyPayload::Json(object));
	}

	#[test]
	fn test_null_key() {
		assert!(matches!(EncodedKey::from_value(&Value::Undefined), Err(Error::MalformedPayload { .. })));
	}

	#[test]
	fn test_json_key_is_canonical() {
		let mut a = JsonObject::new();
		a.insert("b".to_string(), serde_json::json!(2));
		a.insert("a".to_string(), serde_json::json!(1));
		let mut b = JsonObject::new();
		b.insert("a".to_string(), serde_json::json!(1));
		b.insert("b".to_string(), serde_json::json!(2));
		assert_eq!(EncodedKey::json(&a).unwrap(), EncodedKey::json(&b).unwrap());
	}
}
