// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashSet,
	fmt::{Display, Formatter},
};

use gridkv_type::{Error, Result, Type};
use serde::{Deserialize, Serialize};

use crate::fingerprint::{Fingerprint, fingerprint};

/// The kind of a schema field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
	Utf8,
	Int4,
	Int8,
	Boolean,
	/// A nested record, resolved by type name through the registry.
	Record(String),
}

impl FieldKind {
	pub fn tag(&self) -> FieldTag {
		match self {
			FieldKind::Utf8 => FieldTag::Utf8,
			FieldKind::Int4 => FieldTag::Int4,
			FieldKind::Int8 => FieldTag::Int8,
			FieldKind::Boolean => FieldTag::Boolean,
			FieldKind::Record(_) => FieldTag::Record,
		}
	}

	pub fn value_type(&self) -> Type {
		match self {
			FieldKind::Utf8 => Type::Utf8,
			FieldKind::Int4 => Type::Int4,
			FieldKind::Int8 => Type::Int8,
			FieldKind::Boolean => Type::Boolean,
			FieldKind::Record(_) => Type::Record,
		}
	}

	/// The kind a SQL column of the given type is stored as.
	pub fn from_type(ty: Type) -> Option<FieldKind> {
		match ty {
			Type::Utf8 => Some(FieldKind::Utf8),
			Type::Int4 => Some(FieldKind::Int4),
			Type::Int8 => Some(FieldKind::Int8),
			Type::Boolean => Some(FieldKind::Boolean),
			Type::Record | Type::Json | Type::Undefined => None,
		}
	}
}

impl Display for FieldKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			FieldKind::Utf8 => f.write_str("string"),
			FieldKind::Int4 => f.write_str("int32"),
			FieldKind::Int8 => f.write_str("int64"),
			FieldKind::Boolean => f.write_str("boolean"),
			FieldKind::Record(type_name) => write!(f, "record<{type_name}>"),
		}
	}
}

/// The one-byte tag stored in the field index of an encoded record.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag {
	Undefined = 0,
	Boolean = 1,
	Int4 = 2,
	Int8 = 3,
	Utf8 = 4,
	Record = 5,
}

impl FieldTag {
	pub fn from_u8(tag: u8) -> Option<FieldTag> {
		match tag {
			0 => Some(FieldTag::Undefined),
			1 => Some(FieldTag::Boolean),
			2 => Some(FieldTag::Int4),
			3 => Some(FieldTag::Int8),
			4 => Some(FieldTag::Utf8),
			5 => Some(FieldTag::Record),
			_ => None,
		}
	}
}

impl Display for FieldTag {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			FieldTag::Undefined => f.write_str("undefined"),
			FieldTag::Boolean => f.write_str("boolean"),
			FieldTag::Int4 => f.write_str("int32"),
			FieldTag::Int8 => f.write_str("int64"),
			FieldTag::Utf8 => f.write_str("string"),
			FieldTag::Record => f.write_str("record"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
	pub name: String,
	pub kind: FieldKind,
}

/// An ordered list of named, typed fields identified by a type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
	type_name: String,
	fields: Vec<SchemaField>,
	fingerprint: Fingerprint,
}

impl Schema {
	pub fn new(type_name: impl Into<String>, fields: Vec<SchemaField>) -> Result<Self> {
		let type_name = type_name.into();

		let mut seen = HashSet::with_capacity(fields.len());
		for field in &fields {
			if !seen.insert(field.name.as_str()) {
				return Err(Error::DuplicateFieldName {
					type_name,
					field: field.name.clone(),
				});
			}
		}

		let fingerprint = fingerprint(&type_name, &fields);
		Ok(Self {
			type_name,
			fields,
			fingerprint,
		})
	}

	pub fn builder(type_name: impl Into<String>) -> SchemaBuilder {
		SchemaBuilder {
			type_name: type_name.into(),
			fields: Vec::new(),
		}
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn fields(&self) -> &[SchemaField] {
		&self.fields
	}

	pub fn field(&self, name: &str) -> Option<&SchemaField> {
		self.fields.iter().find(|f| f.name == name)
	}

	pub fn fingerprint(&self) -> Fingerprint {
		self.fingerprint
	}
}

pub struct SchemaBuilder {
	type_name: String,
	fields: Vec<SchemaField>,
}

impl SchemaBuilder {
	pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
		self.fields.push(SchemaField {
			name: name.into(),
			kind,
		});
		self
	}

	pub fn build(self) -> Result<Schema> {
		Schema::new(self.type_name, self.fields)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn city() -> Schema {
		Schema::builder("city")
			.field("country", FieldKind::Utf8)
			.field("city", FieldKind::Utf8)
			.field("population", FieldKind::Int4)
			.build()
			.unwrap()
	}

	#[test]
	fn test_field_lookup() {
		let schema = city();
		assert_eq!(schema.type_name(), "city");
		assert_eq!(schema.fields().len(), 3);
		assert_eq!(schema.field("population").map(|f| &f.kind), Some(&FieldKind::Int4));
		assert!(schema.field("mayor").is_none());
	}

	#[test]
	fn test_duplicate_field_name() {
		let err = Schema::builder("city")
			.field("city", FieldKind::Utf8)
			.field("city", FieldKind::Int4)
			.build()
			.unwrap_err();
		assert_eq!(
			err,
			Error::DuplicateFieldName {
				type_name: "city".to_string(),
				field: "city".to_string(),
			}
		);
	}

	#[test]
	fn test_fingerprint_is_deterministic() {
		assert_eq!(city().fingerprint(), city().fingerprint());
	}

	#[test]
	fn test_fingerprint_depends_on_fields() {
		let other = Schema::builder("city")
			.field("country", FieldKind::Utf8)
			.field("city", FieldKind::Utf8)
			.field("population", FieldKind::Int8)
			.build()
			.unwrap();
		assert_ne!(city().fingerprint(), other.fingerprint());
	}

	#[test]
	fn test_tag_round_trip() {
		for tag in [
			FieldTag::Undefined,
			FieldTag::Boolean,
			FieldTag::Int4,
			FieldTag::Int8,
			FieldTag::Utf8,
			FieldTag::Record,
		] {
			assert_eq!(FieldTag::from_u8(tag as u8), Some(tag));
		}
		assert_eq!(FieldTag::from_u8(42), None);
	}
}
