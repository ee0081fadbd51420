// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_type::{Error, NotFoundKind, Record, Result, Value};
use tracing::instrument;

use crate::{
	TypeRegistry,
	schema::{FieldKind, FieldTag, Schema},
};

/// Encodes `record` with `schema`.
///
/// Fields the record leaves out are written as undefined. A field the schema
/// does not declare fails with `NotFound`, a value of the wrong kind with
/// `SchemaMismatch`.
#[instrument(name = "codec::encode", level = "trace", skip_all, fields(type_name = %schema.type_name()))]
pub fn encode(registry: &TypeRegistry, schema: &Schema, record: &Record) -> Result<Vec<u8>> {
	if record.type_name() != schema.type_name() {
		return Err(Error::schema_mismatch(schema.type_name(), "", schema.type_name(), record.type_name()));
	}

	for (name, _) in record.fields() {
		if schema.field(name).is_none() {
			return Err(Error::not_found(NotFoundKind::Field, format!("{}.{}", schema.type_name(), name)));
		}
	}

	let field_count = u16::try_from(schema.fields().len())
		.map_err(|_| Error::malformed_payload(format!("'{}' has too many fields", schema.type_name())))?;

	let mut index = Vec::new();
	let mut data = Vec::new();

	for field in schema.fields() {
		let value = record.get(&field.name).unwrap_or(&Value::Undefined);
		let offset = data.len();
		let tag = write_payload(registry, schema, &field.name, &field.kind, value, &mut data)?;
		let length = data.len() - offset;

		let name_len = u16::try_from(field.name.len())
			.map_err(|_| Error::malformed_payload(format!("field name '{}' is too long", field.name)))?;
		index.extend_from_slice(&name_len.to_le_bytes());
		index.extend_from_slice(field.name.as_bytes());
		index.push(tag as u8);
		index.extend_from_slice(&to_u32(offset)?.to_le_bytes());
		index.extend_from_slice(&to_u32(length)?.to_le_bytes());
	}

	let mut result = Vec::with_capacity(10 + index.len() + data.len());
	result.extend_from_slice(&schema.fingerprint().0.to_le_bytes());
	result.extend_from_slice(&field_count.to_le_bytes());
	result.extend_from_slice(&index);
	result.extend_from_slice(&data);
	Ok(result)
}

fn to_u32(value: usize) -> Result<u32> {
	u32::try_from(value).map_err(|_| Error::malformed_payload("record exceeds 4 GiB"))
}

fn write_payload(
	registry: &TypeRegistry,
	schema: &Schema,
	field: &str,
	kind: &FieldKind,
	value: &Value,
	out: &mut Vec<u8>,
) -> Result<FieldTag> {
	match (kind, value) {
		(_, Value::Undefined) => Ok(FieldTag::Undefined),
		(FieldKind::Boolean, Value::Boolean(v)) => {
			out.push(*v as u8);
			Ok(FieldTag::Boolean)
		}
		(FieldKind::Int4, Value::Int4(v)) => {
			out.extend_from_slice(&v.to_le_bytes());
			Ok(FieldTag::Int4)
		}
		(FieldKind::Int8, Value::Int4(_) | Value::Int8(_)) => {
			let v = value.as_i64().unwrap_or_default();
			out.extend_from_slice(&v.to_le_bytes());
			Ok(FieldTag::Int8)
		}
		(FieldKind::Utf8, Value::Utf8(v)) => {
			out.extend_from_slice(&to_u32(v.len())?.to_le_bytes());
			out.extend_from_slice(v.as_bytes());
			Ok(FieldTag::Utf8)
		}
		(FieldKind::Record(type_name), Value::Record(nested)) => {
			let nested_schema = registry.resolve(type_name)?;
			out.extend_from_slice(&encode(registry, nested_schema, nested)?);
			Ok(FieldTag::Record)
		}
		(kind, value) => Err(Error::schema_mismatch(schema.type_name(), field, kind, value.get_type())),
	}
}

/// Field-by-field record construction, checked against a schema on every
/// write.
pub struct CompactWriter<'a> {
	registry: &'a TypeRegistry,
	schema: &'a Schema,
	record: Record,
}

impl<'a> CompactWriter<'a> {
	pub fn new(registry: &'a TypeRegistry, schema: &'a Schema) -> Self {
		Self {
			registry,
			schema,
			record: Record::new(schema.type_name()),
		}
	}

	pub fn write_string(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
		self.write(name, FieldKind::Utf8, Value::Utf8(value.into()))
	}

	pub fn write_int32(&mut self, name: &str, value: i32) -> Result<()> {
		self.write(name, FieldKind::Int4, Value::Int4(value))
	}

	pub fn write_int64(&mut self, name: &str, value: i64) -> Result<()> {
		self.write(name, FieldKind::Int8, Value::Int8(value))
	}

	pub fn write_boolean(&mut self, name: &str, value: bool) -> Result<()> {
		self.write(name, FieldKind::Boolean, Value::Boolean(value))
	}

	pub fn write_record(&mut self, name: &str, value: Record) -> Result<()> {
		let kind = FieldKind::Record(value.type_name().to_string());
		self.write(name, kind, Value::Record(value))
	}

	pub fn write_undefined(&mut self, name: &str) -> Result<()> {
		self.declared(name)?;
		self.record.set(name, Value::Undefined);
		Ok(())
	}

	fn declared(&self, name: &str) -> Result<&FieldKind> {
		self.schema
			.field(name)
			.map(|f| &f.kind)
			.ok_or_else(|| Error::not_found(NotFoundKind::Field, format!("{}.{}", self.schema.type_name(), name)))
	}

	fn write(&mut self, name: &str, kind: FieldKind, value: Value) -> Result<()> {
		let declared = self.declared(name)?;
		if *declared != kind {
			return Err(Error::schema_mismatch(self.schema.type_name(), name, declared, kind));
		}
		self.record.set(name, value);
		Ok(())
	}

	pub fn finish(self) -> Result<Vec<u8>> {
		encode(self.registry, self.schema, &self.record)
	}
}
