// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_type::{Error, NotFoundKind, Record, Result, Value};
use tracing::instrument;

use crate::{
	TypeRegistry,
	fingerprint::Fingerprint,
	schema::{FieldKind, FieldTag, Schema},
};

const HEADER_LEN: usize = 10;

/// Decodes `bytes` with `schema`.
///
/// Fields the schema does not know are skipped. Fields the schema declares
/// but the payload lacks come back as undefined.
#[instrument(name = "codec::decode", level = "trace", skip_all, fields(type_name = %schema.type_name()))]
pub fn decode(registry: &TypeRegistry, schema: &Schema, bytes: &[u8]) -> Result<Record> {
	let reader = CompactReader::new(registry, schema, bytes)?;
	let mut record = Record::new(schema.type_name());
	for field in schema.fields() {
		record.set(field.name.as_str(), reader.read_value(&field.name)?);
	}
	Ok(record)
}

pub(crate) fn read_fingerprint(bytes: &[u8]) -> Result<Fingerprint> {
	let mut cursor = Cursor::new(bytes);
	Ok(Fingerprint(cursor.u64()?))
}

#[derive(Debug)]
struct IndexEntry<'a> {
	name: &'a str,
	tag: FieldTag,
	offset: usize,
	length: usize,
}

/// Random access to the fields of an encoded record.
///
/// Only the header and field index are parsed up front; a field's payload is
/// decoded when it is read.
#[derive(Debug)]
pub struct CompactReader<'a> {
	registry: &'a TypeRegistry,
	schema: &'a Schema,
	fingerprint: Fingerprint,
	entries: Vec<IndexEntry<'a>>,
	data: &'a [u8],
}

impl<'a> CompactReader<'a> {
	pub fn new(registry: &'a TypeRegistry, schema: &'a Schema, bytes: &'a [u8]) -> Result<Self> {
		if bytes.len() < HEADER_LEN {
			return Err(Error::malformed_payload(format!(
				"payload of {} bytes is shorter than the header",
				bytes.len()
			)));
		}

		let mut cursor = Cursor::new(bytes);
		let fingerprint = Fingerprint(cursor.u64()?);
		let count = cursor.u16()? as usize;

		let mut entries: Vec<IndexEntry<'a>> = Vec::with_capacity(count);
		for _ in 0..count {
			let name_len = cursor.u16()? as usize;
			let name = std::str::from_utf8(cursor.take(name_len)?)
				.map_err(|_| Error::malformed_payload("field name is not valid utf8"))?;
			let raw_tag = cursor.u8()?;
			let tag = FieldTag::from_u8(raw_tag)
				.ok_or_else(|| Error::malformed_payload(format!("unknown field tag {raw_tag}")))?;
			let offset = cursor.u32()? as usize;
			let length = cursor.u32()? as usize;

			if entries.iter().any(|e| e.name == name) {
				return Err(Error::malformed_payload(format!("field '{name}' is indexed twice")));
			}
			entries.push(IndexEntry {
				name,
				tag,
				offset,
				length,
			});
		}

		let data = cursor.rest();
		for entry in &entries {
			let end = entry.offset.checked_add(entry.length);
			if end.is_none_or(|end| end > data.len()) {
				return Err(Error::malformed_payload(format!(
					"field '{}' points past the end of the payload",
					entry.name
				)));
			}
		}

		Ok(Self {
			registry,
			schema,
			fingerprint,
			entries,
			data,
		})
	}

	pub fn fingerprint(&self) -> Fingerprint {
		self.fingerprint
	}

	pub fn schema(&self) -> &Schema {
		self.schema
	}

	/// Names of the fields present in the payload, in index order.
	pub fn field_names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|e| e.name)
	}

	pub fn has_field(&self, name: &str) -> bool {
		self.entry(name).is_some()
	}

	fn entry(&self, name: &str) -> Option<&IndexEntry<'a>> {
		self.entries.iter().find(|e| e.name == name)
	}

	fn payload(&self, entry: &IndexEntry<'a>) -> &'a [u8] {
		&self.data[entry.offset..entry.offset + entry.length]
	}

	pub fn read_string(&self, name: &str) -> Result<Option<String>> {
		match self.read_as(name, FieldKind::Utf8)? {
			Value::Utf8(v) => Ok(Some(v)),
			_ => Ok(None),
		}
	}

	pub fn read_int32(&self, name: &str) -> Result<Option<i32>> {
		match self.read_as(name, FieldKind::Int4)? {
			Value::Int4(v) => Ok(Some(v)),
			_ => Ok(None),
		}
	}

	pub fn read_int64(&self, name: &str) -> Result<Option<i64>> {
		match self.read_as(name, FieldKind::Int8)? {
			Value::Int8(v) => Ok(Some(v)),
			_ => Ok(None),
		}
	}

	pub fn read_boolean(&self, name: &str) -> Result<Option<bool>> {
		match self.read_as(name, FieldKind::Boolean)? {
			Value::Boolean(v) => Ok(Some(v)),
			_ => Ok(None),
		}
	}

	pub fn read_record(&self, name: &str) -> Result<Option<Record>> {
		let kind = match self.schema.field(name) {
			Some(field) => field.kind.clone(),
			None => return Err(self.undeclared(name)),
		};
		if !matches!(kind, FieldKind::Record(_)) {
			return Err(Error::schema_mismatch(self.schema.type_name(), name, &kind, FieldTag::Record));
		}
		match self.read_value(name)? {
			Value::Record(v) => Ok(Some(v)),
			_ => Ok(None),
		}
	}

	/// Reads a field declared by the reader schema, checking that the
	/// requested accessor kind matches both the declaration and the payload.
	fn read_as(&self, name: &str, requested: FieldKind) -> Result<Value> {
		let declared = self.schema.field(name).ok_or_else(|| self.undeclared(name))?;
		if declared.kind != requested {
			return Err(Error::schema_mismatch(self.schema.type_name(), name, &declared.kind, &requested));
		}
		self.read_value(name)
	}

	/// Reads a field by name. Declared fields are checked against the
	/// declaration; undeclared fields present in the payload are decoded by
	/// their tag. Absent fields read as undefined.
	pub fn read_value(&self, name: &str) -> Result<Value> {
		let Some(entry) = self.entry(name) else {
			return Ok(Value::Undefined);
		};

		if entry.tag == FieldTag::Undefined {
			return Ok(Value::Undefined);
		}

		let payload = self.payload(entry);
		match self.schema.field(name) {
			Some(declared) => {
				if declared.kind.tag() != entry.tag {
					return Err(Error::schema_mismatch(
						self.schema.type_name(),
						name,
						&declared.kind,
						entry.tag,
					));
				}
				let nested = match &declared.kind {
					FieldKind::Record(type_name) => Some(&**self.registry.resolve(type_name)?),
					_ => None,
				};
				self.decode_payload(name, entry.tag, payload, nested)
			}
			None => self.decode_payload(name, entry.tag, payload, None),
		}
	}

	fn decode_payload(&self, name: &str, tag: FieldTag, payload: &[u8], nested: Option<&Schema>) -> Result<Value> {
		let mut cursor = Cursor::new(payload);
		let value = match tag {
			FieldTag::Undefined => Value::Undefined,
			FieldTag::Boolean => match cursor.u8()? {
				0 => Value::Boolean(false),
				1 => Value::Boolean(true),
				other => {
					return Err(Error::malformed_payload(format!(
						"field '{name}' holds {other}, not a boolean"
					)));
				}
			},
			FieldTag::Int4 => Value::Int4(cursor.u32()? as i32),
			FieldTag::Int8 => Value::Int8(cursor.u64()? as i64),
			FieldTag::Utf8 => {
				let len = cursor.u32()? as usize;
				let text = std::str::from_utf8(cursor.take(len)?)
					.map_err(|_| Error::malformed_payload(format!("field '{name}' is not valid utf8")))?;
				Value::Utf8(text.to_string())
			}
			FieldTag::Record => {
				let record = match nested {
					Some(schema) => decode(self.registry, schema, payload)?,
					None => self.registry.decode(payload)?,
				};
				return Ok(Value::Record(record));
			}
		};

		if !cursor.rest().is_empty() {
			return Err(Error::malformed_payload(format!("field '{name}' has trailing bytes")));
		}
		Ok(value)
	}

	fn undeclared(&self, name: &str) -> Error {
		Error::not_found(NotFoundKind::Field, format!("{}.{}", self.schema.type_name(), name))
	}
}

struct Cursor<'a> {
	bytes: &'a [u8],
	position: usize,
}

impl<'a> Cursor<'a> {
	fn new(bytes: &'a [u8]) -> Self {
		Self {
			bytes,
			position: 0,
		}
	}

	fn take(&mut self, len: usize) -> Result<&'a [u8]> {
		let end = self.position.checked_add(len).filter(|end| *end <= self.bytes.len()).ok_or_else(|| {
			Error::malformed_payload(format!(
				"truncated payload: wanted {len} bytes at offset {}, {} available",
				self.position,
				self.bytes.len().saturating_sub(self.position)
			))
		})?;
		let slice = &self.bytes[self.position..end];
		self.position = end;
		Ok(slice)
	}

	fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut array = [0u8; N];
		array.copy_from_slice(self.take(N)?);
		Ok(array)
	}

	fn u8(&mut self) -> Result<u8> {
		Ok(self.take_array::<1>()?[0])
	}

	fn u16(&mut self) -> Result<u16> {
		Ok(u16::from_le_bytes(self.take_array()?))
	}

	fn u32(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.take_array()?))
	}

	fn u64(&mut self) -> Result<u64> {
		Ok(u64::from_le_bytes(self.take_array()?))
	}

	fn rest(&mut self) -> &'a [u8] {
		let rest = &self.bytes[self.position..];
		self.position = self.bytes.len();
		rest
	}
}
