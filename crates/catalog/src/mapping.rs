// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashSet, sync::Arc};

use gridkv_codec::{FieldKind, Schema, SchemaField, TypeRegistry};
use gridkv_type::{Error, Result, Type};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::format::{Format, Side};

pub const KEY_COLUMN: &str = "__key";
pub const VALUE_COLUMN: &str = "this";
const KEY_FIELD_PREFIX: &str = "__key.";

/// Where a column's value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
	/// The whole key of a scalar key format.
	Key,
	/// A field of a structured key.
	KeyField(String),
	/// The whole value of a scalar value format.
	Value,
	/// A field of a structured value.
	ValueField(String),
}

impl ColumnRole {
	pub fn of(name: &str) -> ColumnRole {
		if name == KEY_COLUMN {
			ColumnRole::Key
		} else if let Some(field) = name.strip_prefix(KEY_FIELD_PREFIX) {
			ColumnRole::KeyField(field.to_string())
		} else if name == VALUE_COLUMN {
			ColumnRole::Value
		} else {
			ColumnRole::ValueField(name.to_string())
		}
	}

	pub fn is_key(&self) -> bool {
		matches!(self, ColumnRole::Key | ColumnRole::KeyField(_))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
	pub name: String,
	pub ty: Type,
	pub role: ColumnRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnToCreate {
	pub name: String,
	pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingToCreate {
	pub name: String,
	pub columns: Vec<ColumnToCreate>,
	pub options: IndexMap<String, String>,
}

/// A named view over a map: how keys and values are encoded and which
/// columns a row exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
	pub name: String,
	pub map_name: String,
	pub columns: Vec<Column>,
	pub key_format: Format,
	pub value_format: Format,
	pub options: IndexMap<String, String>,
	pub(crate) key_schema: Option<Arc<Schema>>,
	pub(crate) value_schema: Option<Arc<Schema>>,
}

impl Mapping {
	pub fn column(&self, name: &str) -> Option<&Column> {
		self.columns.iter().find(|c| c.name == name)
	}

	pub fn column_names(&self) -> impl Iterator<Item = &str> {
		self.columns.iter().map(|c| c.name.as_str())
	}

	/// The type of the implicit `__key` column.
	pub fn key_type(&self) -> Type {
		match &self.key_format {
			Format::Int | Format::Varchar => self.column(KEY_COLUMN).map(|c| c.ty).unwrap_or(Type::Undefined),
			Format::JsonFlat => Type::Json,
			Format::Compact {
				..
			} => Type::Record,
		}
	}

	/// The type of the implicit `this` column.
	pub fn value_type(&self) -> Type {
		match &self.value_format {
			Format::Int | Format::Varchar => self.column(VALUE_COLUMN).map(|c| c.ty).unwrap_or(Type::Undefined),
			Format::JsonFlat => Type::Json,
			Format::Compact {
				..
			} => Type::Record,
		}
	}

	pub fn key_schema(&self) -> Option<&Schema> {
		self.key_schema.as_deref()
	}

	pub fn value_schema(&self) -> Option<&Schema> {
		self.value_schema.as_deref()
	}

	/// Validates a mapping declaration against the column naming rules and
	/// the registered schemas.
	pub fn from_declaration(registry: &TypeRegistry, to_create: MappingToCreate) -> Result<Mapping> {
		let MappingToCreate {
			name,
			columns,
			options,
		} = to_create;

		let key_format = Format::from_options(&options, Side::Key)?;
		let value_format = Format::from_options(&options, Side::Value)?;

		let columns = if columns.is_empty() {
			derive_columns(&name, &key_format, &value_format)?
		} else {
			columns
		};

		let mut seen = HashSet::new();
		let columns: Vec<Column> = columns
			.into_iter()
			.map(|c| {
				if !seen.insert(c.name.clone()) {
					return Err(Error::malformed_statement(format!("column '{}' is declared twice", c.name)));
				}
				Ok(Column {
					role: ColumnRole::of(&c.name),
					name: c.name,
					ty: c.ty,
				})
			})
			.collect::<Result<_>>()?;

		check_side(&name, &columns, &key_format, Side::Key)?;
		check_side(&name, &columns, &value_format, Side::Value)?;

		let key_schema = structured_schema(registry, &columns, &key_format, Side::Key)?;
		let value_schema = structured_schema(registry, &columns, &value_format, Side::Value)?;

		Ok(Mapping {
			map_name: name.clone(),
			name,
			columns,
			key_format,
			value_format,
			options,
			key_schema,
			value_schema,
		})
	}
}

/// Columns of a mapping declared without a column list: only possible when
/// both sides are scalar.
fn derive_columns(mapping: &str, key_format: &Format, value_format: &Format) -> Result<Vec<ColumnToCreate>> {
	let scalar_type = |format: &Format| match format {
		Format::Int => Some(Type::Int4),
		Format::Varchar => Some(Type::Utf8),
		Format::JsonFlat
		| Format::Compact {
			..
		} => None,
	};
	match (scalar_type(key_format), scalar_type(value_format)) {
		(Some(key), Some(value)) => Ok(vec![
			ColumnToCreate {
				name: KEY_COLUMN.to_string(),
				ty: key,
			},
			ColumnToCreate {
				name: VALUE_COLUMN.to_string(),
				ty: value,
			},
		]),
		_ => Err(Error::malformed_statement(format!(
			"mapping '{mapping}' declares no columns and its formats are not both scalar"
		))),
	}
}

fn check_side(mapping: &str, columns: &[Column], format: &Format, side: Side) -> Result<()> {
	let (whole, whole_name) = match side {
		Side::Key => (ColumnRole::Key, KEY_COLUMN),
		Side::Value => (ColumnRole::Value, VALUE_COLUMN),
	};
	let on_side = |c: &&Column| match side {
		Side::Key => c.role.is_key(),
		Side::Value => !c.role.is_key(),
	};

	let whole_columns: Vec<&Column> = columns.iter().filter(|c| c.role == whole).collect();
	let field_columns: Vec<&Column> = columns.iter().filter(on_side).filter(|c| c.role != whole).collect();

	if format.is_scalar() {
		let [column] = whole_columns.as_slice() else {
			return Err(Error::malformed_statement(format!(
				"mapping '{mapping}' with {format} format needs exactly one '{whole_name}' column"
			)));
		};
		if let Some(field) = field_columns.first() {
			return Err(Error::malformed_statement(format!(
				"column '{}' is not allowed with {format} format",
				field.name
			)));
		}
		let fits = match format {
			Format::Int => column.ty.is_integer(),
			_ => column.ty == Type::Utf8,
		};
		if !fits {
			return Err(Error::schema_mismatch(mapping, whole_name, format, column.ty));
		}
	} else {
		if let Some(column) = whole_columns.first() {
			return Err(Error::malformed_statement(format!(
				"column '{}' is not allowed with {format} format",
				column.name
			)));
		}
		if side == Side::Key && field_columns.is_empty() {
			return Err(Error::malformed_statement(format!(
				"mapping '{mapping}' with {format} key format needs '__key.<field>' columns"
			)));
		}
		if let Some(column) = field_columns.iter().find(|c| FieldKind::from_type(c.ty).is_none()) {
			return Err(Error::malformed_statement(format!(
				"column '{}' has type {} which cannot be stored",
				column.name, column.ty
			)));
		}
	}
	Ok(())
}

fn field_name(column: &Column) -> Option<&str> {
	match &column.role {
		ColumnRole::KeyField(field) | ColumnRole::ValueField(field) => Some(field),
		ColumnRole::Key | ColumnRole::Value => None,
	}
}

/// Resolves the schema of a compact side: the registered one when the type
/// is known, otherwise one derived from the declared columns.
fn structured_schema(
	registry: &TypeRegistry,
	columns: &[Column],
	format: &Format,
	side: Side,
) -> Result<Option<Arc<Schema>>> {
	let Format::Compact {
		type_name,
	} = format
	else {
		return Ok(None);
	};

	let declared: Vec<(&str, &Column)> = columns
		.iter()
		.filter(|c| c.role.is_key() == (side == Side::Key))
		.filter_map(|c| field_name(c).map(|f| (f, c)))
		.collect();

	if let Some(schema) = registry.get(type_name) {
		for (field, column) in &declared {
			let expected = FieldKind::from_type(column.ty);
			match schema.field(field) {
				Some(f) if Some(&f.kind) == expected.as_ref() => {}
				Some(f) => return Err(Error::schema_mismatch(type_name, *field, &f.kind, column.ty)),
				None => return Err(Error::schema_mismatch(type_name, *field, "no such field", column.ty)),
			}
		}
		return Ok(Some(schema.clone()));
	}

	let fields = declared
		.into_iter()
		.filter_map(|(field, column)| {
			FieldKind::from_type(column.ty).map(|kind| SchemaField {
				name: field.to_string(),
				kind,
			})
		})
		.collect();
	Ok(Some(Arc::new(Schema::new(type_name.clone(), fields)?)))
}

#[cfg(test)]
mod tests {
	use gridkv_testing::fixture;

	use super::*;

	fn declare(name: &str, columns: &[(&str, Type)], options: &[(&str, &str)]) -> MappingToCreate {
		MappingToCreate {
			name: name.to_string(),
			columns: columns
				.iter()
				.map(|(n, ty)| ColumnToCreate {
					name: n.to_string(),
					ty: *ty,
				})
				.collect(),
			options: options.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
		}
	}

	fn cities(options: &[(&str, &str)]) -> MappingToCreate {
		declare(
			"cities",
			&[("__key", Type::Int4), ("country", Type::Utf8), ("city", Type::Utf8), ("population", Type::Int4)],
			options,
		)
	}

	const COMPACT_CITY: &[(&str, &str)] =
		&[("keyFormat", "int"), ("valueFormat", "compact"), ("valueCompactTypeName", "city")];

	mod roles {
		use super::*;

		#[test]
		fn test_column_roles() {
			assert_eq!(ColumnRole::of("__key"), ColumnRole::Key);
			assert_eq!(ColumnRole::of("__key.id"), ColumnRole::KeyField("id".to_string()));
			assert_eq!(ColumnRole::of("this"), ColumnRole::Value);
			assert_eq!(ColumnRole::of("city"), ColumnRole::ValueField("city".to_string()));
		}
	}

	mod compact {
		use super::*;

		#[test]
		fn test_registered_schema_is_used() {
			let registry = fixture::registry();
			let mapping = Mapping::from_declaration(&registry, cities(COMPACT_CITY)).unwrap();
			assert_eq!(mapping.map_name, "cities");
			assert_eq!(mapping.value_schema().map(|s| s.fingerprint()), Some(fixture::city_schema().fingerprint()));
			assert_eq!(mapping.key_type(), Type::Int4);
			assert_eq!(mapping.value_type(), Type::Record);
		}

		#[test]
		fn test_column_kind_must_match_registered_field() {
			let registry = fixture::registry();
			let declaration = declare(
				"cities",
				&[("__key", Type::Int4), ("population", Type::Utf8)],
				COMPACT_CITY,
			);
			assert_eq!(
				Mapping::from_declaration(&registry, declaration).unwrap_err(),
				Error::schema_mismatch("city", "population", "int32", "VARCHAR")
			);
		}

		#[test]
		fn test_column_must_exist_in_registered_schema() {
			let registry = fixture::registry();
			let declaration =
				declare("cities", &[("__key", Type::Int4), ("mayor", Type::Utf8)], COMPACT_CITY);
			assert!(matches!(
				Mapping::from_declaration(&registry, declaration),
				Err(Error::SchemaMismatch { .. })
			));
		}

		#[test]
		fn test_unregistered_schema_is_derived() {
			let registry = TypeRegistry::empty();
			let mapping = Mapping::from_declaration(&registry, cities(COMPACT_CITY)).unwrap();
			let schema = mapping.value_schema().unwrap();
			let fields: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
			assert_eq!(fields, vec!["country", "city", "population"]);
		}
	}

	mod rules {
		use super::*;

		#[test]
		fn test_scalar_key_needs_key_column() {
			let declaration = declare(
				"m",
				&[("name", Type::Utf8)],
				&[("keyFormat", "int"), ("valueFormat", "json-flat")],
			);
			assert!(matches!(
				Mapping::from_declaration(&TypeRegistry::empty(), declaration),
				Err(Error::MalformedStatement { .. })
			));
		}

		#[test]
		fn test_scalar_value_rejects_field_columns() {
			let declaration = declare(
				"m",
				&[("__key", Type::Int4), ("this", Type::Utf8), ("extra", Type::Utf8)],
				&[("keyFormat", "int"), ("valueFormat", "varchar")],
			);
			assert!(matches!(
				Mapping::from_declaration(&TypeRegistry::empty(), declaration),
				Err(Error::MalformedStatement { .. })
			));
		}

		#[test]
		fn test_scalar_type_must_fit_format() {
			let declaration = declare(
				"m",
				&[("__key", Type::Utf8), ("this", Type::Utf8)],
				&[("keyFormat", "int"), ("valueFormat", "varchar")],
			);
			assert_eq!(
				Mapping::from_declaration(&TypeRegistry::empty(), declaration).unwrap_err(),
				Error::schema_mismatch("m", "__key", "int", "VARCHAR")
			);
		}

		#[test]
		fn test_structured_key_fields() {
			let declaration = declare(
				"m",
				&[("__key.id", Type::Int8), ("name", Type::Utf8)],
				&[("keyFormat", "json-flat"), ("valueFormat", "json-flat")],
			);
			let mapping = Mapping::from_declaration(&TypeRegistry::empty(), declaration).unwrap();
			assert_eq!(mapping.column("__key.id").map(|c| &c.role), Some(&ColumnRole::KeyField("id".to_string())));
			assert_eq!(mapping.key_type(), Type::Json);
		}

		#[test]
		fn test_scalar_columns_are_derived() {
			let declaration = declare("capitals", &[], &[("keyFormat", "varchar"), ("valueFormat", "varchar")]);
			let mapping = Mapping::from_declaration(&TypeRegistry::empty(), declaration).unwrap();
			assert_eq!(mapping.column_names().collect::<Vec<_>>(), vec!["__key", "this"]);
			assert_eq!(mapping.key_type(), Type::Utf8);
			assert_eq!(mapping.value_type(), Type::Utf8);
		}

		#[test]
		fn test_no_columns_with_structured_format() {
			let declaration = declare("m", &[], &[("keyFormat", "int"), ("valueFormat", "json-flat")]);
			assert!(matches!(
				Mapping::from_declaration(&TypeRegistry::empty(), declaration),
				Err(Error::MalformedStatement { .. })
			));
		}

		#[test]
		fn test_duplicate_column() {
			let declaration = declare(
				"m",
				&[("__key", Type::Int4), ("this", Type::Utf8), ("this", Type::Utf8)],
				&[("keyFormat", "int"), ("valueFormat", "varchar")],
			);
			assert!(matches!(
				Mapping::from_declaration(&TypeRegistry::empty(), declaration),
				Err(Error::MalformedStatement { .. })
			));
		}

		#[test]
		fn test_unsupported_format() {
			let declaration =
				declare("m", &[("__key", Type::Int4)], &[("keyFormat", "java"), ("valueFormat", "varchar")]);
			assert!(matches!(
				Mapping::from_declaration(&TypeRegistry::empty(), declaration),
				Err(Error::UnsupportedFormat { .. })
			));
		}
	}
}
