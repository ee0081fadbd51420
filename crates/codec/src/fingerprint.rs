// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3;

use crate::schema::{FieldKind, SchemaField};

/// xxHash3 64-bit digest of a schema's type name and fields.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub u64);

impl From<u64> for Fingerprint {
	fn from(value: u64) -> Self {
		Fingerprint(value)
	}
}

impl From<Fingerprint> for u64 {
	fn from(fingerprint: Fingerprint) -> Self {
		fingerprint.0
	}
}

impl Display for Fingerprint {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:016x}", self.0)
	}
}

pub(crate) fn fingerprint(type_name: &str, fields: &[SchemaField]) -> Fingerprint {
	let mut buffer = Vec::with_capacity(64);
	buffer.extend_from_slice(type_name.as_bytes());
	buffer.push(0);
	for field in fields {
		buffer.extend_from_slice(field.name.as_bytes());
		buffer.push(0);
		buffer.push(field.kind.tag() as u8);
		if let FieldKind::Record(nested) = &field.kind {
			buffer.extend_from_slice(nested.as_bytes());
			buffer.push(0);
		}
	}
	Fingerprint(xxh3::xxh3_64(&buffer))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn field(name: &str, kind: FieldKind) -> SchemaField {
		SchemaField {
			name: name.to_string(),
			kind,
		}
	}

	#[test]
	fn test_type_name_matters() {
		let fields = vec![field("name", FieldKind::Utf8)];
		assert_ne!(fingerprint("user", &fields), fingerprint("admin", &fields));
	}

	#[test]
	fn test_field_order_matters() {
		let a = vec![field("a", FieldKind::Utf8), field("b", FieldKind::Utf8)];
		let b = vec![field("b", FieldKind::Utf8), field("a", FieldKind::Utf8)];
		assert_ne!(fingerprint("t", &a), fingerprint("t", &b));
	}

	#[test]
	fn test_nested_type_name_matters() {
		let a = vec![field("home", FieldKind::Record("city".to_string()))];
		let b = vec![field("home", FieldKind::Record("town".to_string()))];
		assert_ne!(fingerprint("user", &a), fingerprint("user", &b));
	}

	#[test]
	fn test_display_is_hex() {
		assert_eq!(Fingerprint(255).to_string(), "00000000000000ff");
	}
}
