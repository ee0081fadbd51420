// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_type::JsonObject;

/// The value half of a map entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MapValue {
	/// Compact-encoded record or scalar payload.
	Binary(Vec<u8>),
	/// Flat JSON object.
	Json(JsonObject),
}

impl MapValue {
	pub fn as_binary(&self) -> Option<&[u8]> {
		match self {
			MapValue::Binary(bytes) => Some(bytes),
			MapValue::Json(_) => None,
		}
	}

	pub fn as_json(&self) -> Option<&JsonObject> {
		match self {
			MapValue::Json(object) => Some(object),
			MapValue::Binary(_) => None,
		}
	}
}

impl From<Vec<u8>> for MapValue {
	fn from(bytes: Vec<u8>) -> Self {
		MapValue::Binary(bytes)
	}
}

impl From<JsonObject> for MapValue {
	fn from(object: JsonObject) -> Self {
		MapValue::Json(object)
	}
}
