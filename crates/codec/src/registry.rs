// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, sync::Arc};

use gridkv_type::{Error, NotFoundKind, Record, Result};
use tracing::{debug, instrument};

use crate::{
	CompactReader, CompactSerializer, CompactWriter,
	fingerprint::Fingerprint,
	reader::{decode, read_fingerprint},
	schema::Schema,
	writer::encode,
};

/// Collects schemas at startup. Turned into an immutable [`TypeRegistry`] by
/// [`TypeRegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
	schemas: Vec<Arc<Schema>>,
}

impl TypeRegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a schema under its type name.
	///
	/// Registering an identical schema twice is a no-op; a different schema
	/// under a taken type name fails with `DuplicateTypeName`.
	#[instrument(name = "codec::registry::register", level = "debug", skip(self, schema), fields(type_name = %schema.type_name()))]
	pub fn register(&mut self, schema: Schema) -> Result<&mut Self> {
		if let Some(existing) = self.schemas.iter().find(|s| s.type_name() == schema.type_name()) {
			if **existing == schema {
				debug!("schema already registered");
				return Ok(self);
			}
			return Err(Error::DuplicateTypeName {
				type_name: schema.type_name().to_string(),
			});
		}
		self.schemas.push(Arc::new(schema));
		Ok(self)
	}

	/// Builder-style variant of [`TypeRegistryBuilder::register`].
	pub fn with(mut self, schema: Schema) -> Result<Self> {
		self.register(schema)?;
		Ok(self)
	}

	pub fn build(self) -> TypeRegistry {
		let mut by_name = HashMap::with_capacity(self.schemas.len());
		let mut by_fingerprint = HashMap::with_capacity(self.schemas.len());
		for schema in self.schemas {
			by_fingerprint.insert(schema.fingerprint(), schema.clone());
			by_name.insert(schema.type_name().to_string(), schema);
		}
		TypeRegistry(Arc::new(TypeRegistryInner {
			by_name,
			by_fingerprint,
		}))
	}
}

#[derive(Debug, Default)]
struct TypeRegistryInner {
	by_name: HashMap<String, Arc<Schema>>,
	by_fingerprint: HashMap<Fingerprint, Arc<Schema>>,
}

/// Type name to schema lookup, fixed once built and shared by clone.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry(Arc<TypeRegistryInner>);

impl TypeRegistry {
	pub fn builder() -> TypeRegistryBuilder {
		TypeRegistryBuilder::new()
	}

	pub fn empty() -> Self {
		Self::default()
	}

	pub fn get(&self, type_name: &str) -> Option<&Arc<Schema>> {
		self.0.by_name.get(type_name)
	}

	pub fn resolve(&self, type_name: &str) -> Result<&Arc<Schema>> {
		self.get(type_name).ok_or_else(|| Error::not_found(NotFoundKind::Type, type_name))
	}

	pub fn by_fingerprint(&self, fingerprint: Fingerprint) -> Option<&Arc<Schema>> {
		self.0.by_fingerprint.get(&fingerprint)
	}

	pub fn len(&self) -> usize {
		self.0.by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.by_name.is_empty()
	}

	/// Encodes a record with the schema registered under its type name.
	pub fn encode(&self, record: &Record) -> Result<Vec<u8>> {
		let schema = self.resolve(record.type_name())?;
		encode(self, schema, record)
	}

	/// Decodes a payload with the schema whose fingerprint it carries.
	pub fn decode(&self, bytes: &[u8]) -> Result<Record> {
		let fingerprint = read_fingerprint(bytes)?;
		let schema = self
			.by_fingerprint(fingerprint)
			.ok_or_else(|| Error::not_found(NotFoundKind::Type, fingerprint.to_string()))?;
		decode(self, schema, bytes)
	}

	pub fn serialize<S: CompactSerializer>(&self, serializer: &S, value: &S::Target) -> Result<Vec<u8>> {
		let schema = self.resolve(serializer.type_name())?;
		let mut writer = CompactWriter::new(self, schema);
		serializer.write(&mut writer, value)?;
		writer.finish()
	}

	pub fn deserialize<S: CompactSerializer>(&self, serializer: &S, bytes: &[u8]) -> Result<S::Target> {
		let schema = self.resolve(serializer.type_name())?;
		let reader = CompactReader::new(self, schema, bytes)?;
		serializer.read(&reader)
	}
}

#[cfg(test)]
mod tests {
	use gridkv_type::{Error, Record, Value};

	use super::*;
	use crate::schema::FieldKind;

	fn city() -> Schema {
		Schema::builder("city")
			.field("country", FieldKind::Utf8)
			.field("city", FieldKind::Utf8)
			.field("population", FieldKind::Int4)
			.build()
			.unwrap()
	}

	mod register {
		use super::*;

		#[test]
		fn test_identical_schema_is_noop() {
			let mut builder = TypeRegistry::builder();
			builder.register(city()).unwrap();
			builder.register(city()).unwrap();
			assert_eq!(builder.build().len(), 1);
		}

		#[test]
		fn test_different_schema_same_name() {
			let mut builder = TypeRegistry::builder();
			builder.register(city()).unwrap();
			let other = Schema::builder("city").field("name", FieldKind::Utf8).build().unwrap();
			let err = builder.register(other).unwrap_err();
			assert_eq!(
				err,
				Error::DuplicateTypeName {
					type_name: "city".to_string()
				}
			);
		}
	}

	#[test]
	fn test_resolve_unknown_type() {
		let registry = TypeRegistry::empty();
		assert_eq!(registry.resolve("city").unwrap_err(), Error::not_found(NotFoundKind::Type, "city"));
	}

	#[test]
	fn test_encode_decode_by_type_name() {
		let registry = TypeRegistry::builder().with(city()).unwrap().build();
		let record = Record::new("city")
			.with("country", "United Kingdom")
			.with("city", "London")
			.with("population", 9540576);

		let bytes = registry.encode(&record).unwrap();
		let decoded = registry.decode(&bytes).unwrap();
		assert_eq!(decoded, record);
		assert_eq!(decoded.get("city"), Some(&Value::utf8("London")));
	}

	#[test]
	fn test_decode_unknown_fingerprint() {
		let writer_registry = TypeRegistry::builder().with(city()).unwrap().build();
		let bytes = writer_registry
			.encode(&Record::new("city").with("country", "France").with("city", "Paris").with("population", 1))
			.unwrap();

		let err = TypeRegistry::empty().decode(&bytes).unwrap_err();
		assert!(matches!(
			err,
			Error::NotFound {
				kind: NotFoundKind::Type,
				..
			}
		));
	}
}
