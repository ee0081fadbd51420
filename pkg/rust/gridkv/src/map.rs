// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_codec::{CompactSerializer, EncodedKey, TypeRegistry};
use gridkv_store::{MapStore, MapValue, Scan};
use gridkv_type::{Error, IntoValue, JsonObject, Record, Result, Value};

/// Key-value view of a single map.
///
/// Keys are given as values: scalars use the scalar key encoding and
/// records are compact encoded, so a key written here is found by the SQL
/// layer under the matching `__key` column.
#[derive(Clone)]
pub struct MapHandle {
	name: String,
	store: MapStore,
	registry: TypeRegistry,
}

impl MapHandle {
	pub(crate) fn new(name: String, store: MapStore, registry: TypeRegistry) -> Self {
		Self {
			name,
			store,
			registry,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn put(&self, key: impl IntoValue, value: impl Into<MapValue>) -> Result<Option<MapValue>> {
		self.store.put(&self.name, self.key(key)?, value.into())
	}

	pub fn get(&self, key: impl IntoValue) -> Result<Option<MapValue>> {
		self.store.get(&self.name, &self.key(key)?)
	}

	pub fn delete(&self, key: impl IntoValue) -> Result<Option<MapValue>> {
		self.store.delete(&self.name, &self.key(key)?)
	}

	/// Stores `value` only if `key` is absent. Returns the present value
	/// otherwise.
	pub fn put_if_absent(&self, key: impl IntoValue, value: impl Into<MapValue>) -> Result<Option<MapValue>> {
		self.store.put_if_absent(&self.name, self.key(key)?, value.into())
	}

	pub fn contains_key(&self, key: impl IntoValue) -> Result<bool> {
		self.store.contains_key(&self.name, &self.key(key)?)
	}

	pub fn put_record(&self, key: impl IntoValue, record: &Record) -> Result<Option<MapValue>> {
		let bytes = self.registry.encode(record)?;
		self.put(key, bytes)
	}

	pub fn get_record(&self, key: impl IntoValue) -> Result<Option<Record>> {
		match self.get(key)? {
			None => Ok(None),
			Some(MapValue::Binary(bytes)) => self.registry.decode(&bytes).map(Some),
			Some(MapValue::Json(_)) => Err(Error::malformed_payload(format!(
				"value in map '{}' is json, not a compact record",
				self.name
			))),
		}
	}

	pub fn put_json(&self, key: impl IntoValue, object: JsonObject) -> Result<Option<MapValue>> {
		self.put(key, object)
	}

	/// Stores a caller-defined struct through its serializer.
	pub fn put_with<S: CompactSerializer>(
		&self,
		serializer: &S,
		key: impl IntoValue,
		value: &S::Target,
	) -> Result<Option<MapValue>> {
		let bytes = self.registry.serialize(serializer, value)?;
		self.put(key, bytes)
	}

	pub fn get_with<S: CompactSerializer>(&self, serializer: &S, key: impl IntoValue) -> Result<Option<S::Target>> {
		match self.get(key)? {
			None => Ok(None),
			Some(MapValue::Binary(bytes)) => self.registry.deserialize(serializer, &bytes).map(Some),
			Some(MapValue::Json(_)) => Err(Error::malformed_payload(format!(
				"value in map '{}' is json, not a compact record",
				self.name
			))),
		}
	}

	pub fn size(&self) -> Result<usize> {
		self.store.size(&self.name)
	}

	pub fn clear(&self) -> Result<()> {
		self.store.clear(&self.name)
	}

	pub fn scan(&self) -> Result<Scan> {
		self.store.scan(&self.name)
	}

	fn key(&self, key: impl IntoValue) -> Result<EncodedKey> {
		match key.into_value() {
			Value::Record(record) => Ok(EncodedKey::compact(&self.registry.encode(&record)?)),
			value => EncodedKey::from_value(&value),
		}
	}
}
