// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_codec::{EncodedKey, KeyPayload, TypeRegistry, decode, decode_scalar, encode, encode_scalar};
use gridkv_store::MapValue;
use gridkv_type::{Error, JsonObject, Record, Result, Type, Value};
use indexmap::IndexMap;

use crate::{
	Format,
	mapping::{Column, ColumnRole, KEY_COLUMN, Mapping, VALUE_COLUMN},
};

impl Mapping {
	/// A declared column, or the implicit `__key` / `this` column of a
	/// structured format.
	pub fn selectable(&self, name: &str) -> Option<Column> {
		if let Some(column) = self.column(name) {
			return Some(column.clone());
		}
		match name {
			KEY_COLUMN => Some(Column {
				name: KEY_COLUMN.to_string(),
				ty: self.key_type(),
				role: ColumnRole::Key,
			}),
			VALUE_COLUMN => Some(Column {
				name: VALUE_COLUMN.to_string(),
				ty: self.value_type(),
				role: ColumnRole::Value,
			}),
			_ => None,
		}
	}

	/// Converts `value` to the type of `column`. Integers widen freely and
	/// narrow only when they fit.
	pub fn coerce(&self, column: &Column, value: Value) -> Result<Value> {
		let coerced = match (column.ty, value) {
			(_, Value::Undefined) => Value::Undefined,
			(Type::Int4, Value::Int4(v)) => Value::Int4(v),
			(Type::Int4, Value::Int8(v)) => i32::try_from(v).map(Value::Int4).map_err(|_| {
				Error::schema_mismatch(&self.name, &column.name, Type::Int4, format!("{v} (out of range)"))
			})?,
			(Type::Int8, Value::Int4(v)) => Value::Int8(v as i64),
			(Type::Int8, Value::Int8(v)) => Value::Int8(v),
			(Type::Utf8, v @ Value::Utf8(_)) => v,
			(Type::Boolean, v @ Value::Boolean(_)) => v,
			(Type::Record, v @ Value::Record(_)) => v,
			(Type::Json, v @ Value::Json(_)) => v,
			(ty, v) => return Err(Error::schema_mismatch(&self.name, &column.name, ty, v.get_type())),
		};
		Ok(coerced)
	}

	/// Builds the key and value of a map entry from column values. Columns
	/// left out are undefined.
	pub fn encode_entry(
		&self,
		registry: &TypeRegistry,
		values: &IndexMap<String, Value>,
	) -> Result<(EncodedKey, MapValue)> {
		let key = self.encode_key(registry, values)?;
		let value = self.encode_value(registry, values)?;
		Ok((key, value))
	}

	fn encode_key(&self, registry: &TypeRegistry, values: &IndexMap<String, Value>) -> Result<EncodedKey> {
		match &self.key_format {
			Format::Int | Format::Varchar => {
				let key = values.get(KEY_COLUMN).unwrap_or(&Value::Undefined);
				if key.is_undefined() {
					return Err(Error::schema_mismatch(&self.name, KEY_COLUMN, self.key_type(), "null"));
				}
				EncodedKey::from_value(key)
			}
			Format::JsonFlat => EncodedKey::json(&self.json_object(values, true)?),
			Format::Compact {
				..
			} => {
				let schema = self.key_schema.as_deref().ok_or_else(|| self.missing_schema(KEY_COLUMN))?;
				let record = self.record(schema.type_name(), values, true);
				Ok(EncodedKey::compact(&encode(registry, schema, &record)?))
			}
		}
	}

	fn encode_value(&self, registry: &TypeRegistry, values: &IndexMap<String, Value>) -> Result<MapValue> {
		match &self.value_format {
			Format::Int | Format::Varchar => {
				let value = values.get(VALUE_COLUMN).unwrap_or(&Value::Undefined);
				if value.is_undefined() {
					return Err(Error::schema_mismatch(&self.name, VALUE_COLUMN, self.value_type(), "null"));
				}
				Ok(MapValue::Binary(encode_scalar(value)?))
			}
			Format::JsonFlat => Ok(MapValue::Json(self.json_object(values, false)?)),
			Format::Compact {
				..
			} => {
				let schema = self.value_schema.as_deref().ok_or_else(|| self.missing_schema(VALUE_COLUMN))?;
				let record = self.record(schema.type_name(), values, false);
				Ok(MapValue::Binary(encode(registry, schema, &record)?))
			}
		}
	}

	fn fields(&self, key: bool) -> impl Iterator<Item = (&str, &Column)> {
		self.columns.iter().filter_map(move |c| match &c.role {
			ColumnRole::KeyField(field) if key => Some((field.as_str(), c)),
			ColumnRole::ValueField(field) if !key => Some((field.as_str(), c)),
			_ => None,
		})
	}

	fn record(&self, type_name: &str, values: &IndexMap<String, Value>, key: bool) -> Record {
		let mut record = Record::new(type_name);
		for (field, column) in self.fields(key) {
			if let Some(value) = values.get(&column.name) {
				record.set(field, value.clone());
			}
		}
		record
	}

	fn json_object(&self, values: &IndexMap<String, Value>, key: bool) -> Result<JsonObject> {
		let mut object = JsonObject::new();
		for (field, column) in self.fields(key) {
			let value = values.get(&column.name).unwrap_or(&Value::Undefined);
			let json = value.to_json().ok_or_else(|| {
				Error::schema_mismatch(&self.name, &column.name, column.ty, value.get_type())
			})?;
			object.insert(field.to_string(), json);
		}
		Ok(object)
	}

	fn missing_schema(&self, column: &str) -> Error {
		Error::schema_mismatch(&self.name, column, "a compact schema", "none")
	}

	/// Projects an encoded key back into the `__key` column value.
	pub fn decode_key(&self, registry: &TypeRegistry, key: &EncodedKey) -> Result<Value> {
		match (&self.key_format, key.decode()?) {
			(Format::Int | Format::Varchar, KeyPayload::Scalar(value)) => {
				let column = self.selectable(KEY_COLUMN).ok_or_else(|| self.missing_schema(KEY_COLUMN))?;
				self.coerce(&column, value)
			}
			(Format::JsonFlat, KeyPayload::Json(object)) => Ok(Value::Json(object)),
			(Format::Compact {
				..
			}, KeyPayload::Compact(bytes)) => {
				let schema = self.key_schema.as_deref().ok_or_else(|| self.missing_schema(KEY_COLUMN))?;
				Ok(Value::Record(decode(registry, schema, bytes)?))
			}
			(format, payload) => Err(Error::schema_mismatch(
				&self.name,
				KEY_COLUMN,
				format,
				match payload {
					KeyPayload::Scalar(v) => v.get_type().to_string(),
					KeyPayload::Compact(_) => "compact".to_string(),
					KeyPayload::Json(_) => "json-flat".to_string(),
				},
			)),
		}
	}

	/// The key under which an entry whose `__key` equals `key` is stored, or
	/// `None` when no entry can have that key.
	pub fn lookup_key(&self, registry: &TypeRegistry, key: &Value) -> Result<Option<EncodedKey>> {
		if key.is_undefined() {
			return Ok(None);
		}
		match (&self.key_format, key) {
			(Format::Int | Format::Varchar, _) => {
				let column = self.selectable(KEY_COLUMN).ok_or_else(|| self.missing_schema(KEY_COLUMN))?;
				match self.coerce(&column, key.clone()) {
					Ok(key) => EncodedKey::from_value(&key).map(Some),
					Err(_) => Ok(None),
				}
			}
			(Format::JsonFlat, Value::Json(object)) => EncodedKey::json(object).map(Some),
			(Format::Compact {
				..
			}, Value::Record(record)) => {
				let schema = self.key_schema.as_deref().ok_or_else(|| self.missing_schema(KEY_COLUMN))?;
				// a record the key schema cannot encode equals no stored key
				Ok(encode(registry, schema, record).ok().map(|bytes| EncodedKey::compact(&bytes)))
			}
			_ => Ok(None),
		}
	}

	/// Projects a stored value back into the `this` column value.
	pub fn decode_value(&self, registry: &TypeRegistry, value: &MapValue) -> Result<Value> {
		match (&self.value_format, value) {
			(Format::Int | Format::Varchar, MapValue::Binary(bytes)) => decode_scalar(bytes, self.value_type()),
			(Format::JsonFlat, MapValue::Json(object)) => Ok(Value::Json(object.clone())),
			(Format::Compact {
				..
			}, MapValue::Binary(bytes)) => {
				let schema =
					self.value_schema.as_deref().ok_or_else(|| self.missing_schema(VALUE_COLUMN))?;
				Ok(Value::Record(decode(registry, schema, bytes)?))
			}
			(format, MapValue::Binary(_)) => {
				Err(Error::schema_mismatch(&self.name, VALUE_COLUMN, format, "binary"))
			}
			(format, MapValue::Json(_)) => Err(Error::schema_mismatch(&self.name, VALUE_COLUMN, format, "json")),
		}
	}

	/// The value of `column` in the entry whose decoded halves are `key` and
	/// `value`.
	pub fn column_value(&self, column: &Column, key: &Value, value: &Value) -> Result<Value> {
		let raw = match &column.role {
			ColumnRole::Key => return Ok(key.clone()),
			ColumnRole::Value => return Ok(value.clone()),
			ColumnRole::KeyField(field) => field_of(key, field, column.ty),
			ColumnRole::ValueField(field) => field_of(value, field, column.ty),
		};
		match raw {
			Some(v) => self.coerce(column, v),
			None => Err(Error::schema_mismatch(&self.name, &column.name, column.ty, "json of another type")),
		}
	}
}

fn field_of(container: &Value, field: &str, ty: Type) -> Option<Value> {
	match container {
		Value::Record(record) => Some(record.get(field).cloned().unwrap_or(Value::Undefined)),
		Value::Json(object) => match object.get(field) {
			Some(json) => Value::from_json(json, ty),
			None => Some(Value::Undefined),
		},
		_ => Some(Value::Undefined),
	}
}

#[cfg(test)]
mod tests {
	use gridkv_testing::fixture;

	use super::*;
	use crate::{ColumnToCreate, MappingToCreate};

	fn mapping(registry: &TypeRegistry, columns: &[(&str, Type)], options: &[(&str, &str)]) -> Mapping {
		Mapping::from_declaration(
			registry,
			MappingToCreate {
				name: "m".to_string(),
				columns: columns
					.iter()
					.map(|(n, ty)| ColumnToCreate {
						name: n.to_string(),
						ty: *ty,
					})
					.collect(),
				options: options.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
			},
		)
		.unwrap()
	}

	fn row(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
		pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
	}

	#[test]
	fn test_compact_value_round_trip() {
		let registry = fixture::registry();
		let m = mapping(
			&registry,
			&[("__key", Type::Int4), ("country", Type::Utf8), ("city", Type::Utf8), ("population", Type::Int4)],
			&[("keyFormat", "int"), ("valueFormat", "compact"), ("valueCompactTypeName", "city")],
		);

		let (key, value) = m
			.encode_entry(
				&registry,
				&row(&[
					("__key", Value::Int4(1)),
					("city", Value::utf8("London")),
					("country", Value::utf8("United Kingdom")),
					("population", Value::Int4(9540576)),
				]),
			)
			.unwrap();

		let key = m.decode_key(&registry, &key).unwrap();
		let value = m.decode_value(&registry, &value).unwrap();
		assert_eq!(key, Value::Int4(1));
		assert_eq!(value.as_record().and_then(|r| r.get("city")), Some(&Value::utf8("London")));

		let population = m.column("population").unwrap();
		assert_eq!(m.column_value(population, &key, &value).unwrap(), Value::Int4(9540576));

		// the same bytes decode through the registry, so map.get_record sees the row
		let stored = m
			.encode_entry(&registry, &row(&[("__key", Value::Int4(1)), ("city", Value::utf8("London"))]))
			.unwrap()
			.1;
		let record = registry.decode(stored.as_binary().unwrap()).unwrap();
		assert_eq!(record.get("population"), Some(&Value::Undefined));
	}

	#[test]
	fn test_json_flat_round_trip() {
		let registry = TypeRegistry::empty();
		let m = mapping(
			&registry,
			&[("__key", Type::Utf8), ("country", Type::Utf8), ("population", Type::Int8)],
			&[("keyFormat", "varchar"), ("valueFormat", "json-flat")],
		);

		let (key, value) = m
			.encode_entry(
				&registry,
				&row(&[
					("__key", Value::utf8("AU")),
					("country", Value::utf8("Australia")),
					("population", Value::Int8(25_000_000)),
				]),
			)
			.unwrap();

		let object = value.as_json().unwrap();
		assert_eq!(object.get("country"), Some(&serde_json::json!("Australia")));

		let key = m.decode_key(&registry, &key).unwrap();
		let value = m.decode_value(&registry, &value).unwrap();
		assert_eq!(key, Value::utf8("AU"));
		assert_eq!(
			m.column_value(m.column("population").unwrap(), &key, &value).unwrap(),
			Value::Int8(25_000_000)
		);
	}

	#[test]
	fn test_scalar_value_needs_this() {
		let registry = TypeRegistry::empty();
		let m = mapping(
			&registry,
			&[("__key", Type::Int4), ("this", Type::Utf8)],
			&[("keyFormat", "int"), ("valueFormat", "varchar")],
		);
		let err = m.encode_entry(&registry, &row(&[("__key", Value::Int4(1))])).unwrap_err();
		assert_eq!(err, Error::schema_mismatch("m", "this", "VARCHAR", "null"));

		let (_, value) =
			m.encode_entry(&registry, &row(&[("__key", Value::Int4(1)), ("this", Value::utf8("x"))])).unwrap();
		assert_eq!(m.decode_value(&registry, &value).unwrap(), Value::utf8("x"));
	}

	#[test]
	fn test_null_key() {
		let registry = TypeRegistry::empty();
		let m = mapping(
			&registry,
			&[("__key", Type::Int4), ("this", Type::Utf8)],
			&[("keyFormat", "int"), ("valueFormat", "varchar")],
		);
		let err = m.encode_entry(&registry, &row(&[("this", Value::utf8("x"))])).unwrap_err();
		assert!(matches!(err, Error::SchemaMismatch { ref field, .. } if field == "__key"));
	}

	#[test]
	fn test_coerce() {
		let registry = TypeRegistry::empty();
		let m = mapping(
			&registry,
			&[("__key", Type::Int4), ("this", Type::Int8)],
			&[("keyFormat", "int"), ("valueFormat", "int")],
		);
		let key = m.column("__key").unwrap();
		let this = m.column("this").unwrap();

		assert_eq!(m.coerce(key, Value::Int8(5)).unwrap(), Value::Int4(5));
		assert!(matches!(m.coerce(key, Value::Int8(i64::MAX)), Err(Error::SchemaMismatch { .. })));
		assert_eq!(m.coerce(this, Value::Int4(5)).unwrap(), Value::Int8(5));
		assert!(matches!(m.coerce(this, Value::utf8("5")), Err(Error::SchemaMismatch { .. })));
		assert_eq!(m.coerce(this, Value::Undefined).unwrap(), Value::Undefined);
	}

	#[test]
	fn test_implicit_columns() {
		let registry = fixture::registry();
		let m = mapping(
			&registry,
			&[("__key", Type::Int4), ("city", Type::Utf8)],
			&[("keyFormat", "int"), ("valueFormat", "compact"), ("valueCompactTypeName", "city")],
		);
		assert_eq!(m.selectable("this").map(|c| c.ty), Some(Type::Record));
		assert_eq!(m.selectable("__key").map(|c| c.ty), Some(Type::Int4));
		assert!(m.selectable("mayor").is_none());
	}

	#[test]
	fn test_key_of_another_format() {
		let registry = TypeRegistry::empty();
		let m = mapping(
			&registry,
			&[("__key", Type::Int4), ("this", Type::Utf8)],
			&[("keyFormat", "int"), ("valueFormat", "varchar")],
		);
		let err = m.decode_key(&registry, &EncodedKey::utf8("x")).unwrap_err();
		assert!(matches!(err, Error::SchemaMismatch { .. }));
	}

	mod lookup_key {
		use super::*;

		fn users(registry: &TypeRegistry) -> Mapping {
			mapping(
				registry,
				&[("__key.name", Type::Utf8), ("__key.country", Type::Utf8), ("city", Type::Utf8)],
				&[("keyFormat", "compact"), ("keyCompactTypeName", "user"), ("valueFormat", "json-flat")],
			)
		}

		#[test]
		fn test_compact_record_key() {
			let registry = fixture::registry();
			let m = users(&registry);
			let (stored, _) = m
				.encode_entry(
					&registry,
					&row(&[
						("__key.name", Value::utf8("ann")),
						("__key.country", Value::utf8("UK")),
						("city", Value::utf8("Leeds")),
					]),
				)
				.unwrap();

			let decoded = m.decode_key(&registry, &stored).unwrap();
			assert_eq!(m.lookup_key(&registry, &decoded).unwrap(), Some(stored.clone()));

			// field order of the lookup record does not matter
			let reordered = Record::new("user").with("country", "UK").with("name", "ann");
			assert_eq!(m.lookup_key(&registry, &Value::Record(reordered)).unwrap(), Some(stored));
		}

		#[test]
		fn test_compact_key_of_other_shape_matches_nothing() {
			let registry = fixture::registry();
			let m = users(&registry);
			let city = Value::Record(fixture::city("UK", "Leeds", 1));
			assert_eq!(m.lookup_key(&registry, &city).unwrap(), None);
			assert_eq!(m.lookup_key(&registry, &Value::utf8("ann")).unwrap(), None);
			assert_eq!(m.lookup_key(&registry, &Value::Undefined).unwrap(), None);
		}

		#[test]
		fn test_scalar_key_is_coerced() {
			let registry = TypeRegistry::empty();
			let m = mapping(
				&registry,
				&[("__key", Type::Int8), ("this", Type::Utf8)],
				&[("keyFormat", "int"), ("valueFormat", "varchar")],
			);
			assert_eq!(m.lookup_key(&registry, &Value::Int4(7)).unwrap(), Some(EncodedKey::integer(7)));
			assert_eq!(m.lookup_key(&registry, &Value::utf8("7")).unwrap(), None);
		}
	}
}
