// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// All value types a row column or record field can carry
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
	/// A boolean: true or false.
	Boolean,
	/// A 4-byte signed integer
	Int4,
	/// An 8-byte signed integer
	Int8,
	/// A UTF-8 encoded text.
	Utf8,
	/// A compact record of a registered schema
	Record,
	/// A flat JSON object
	Json,
	/// Value is not defined (think null in common programming languages)
	Undefined,
}

impl Type {
	pub fn is_integer(&self) -> bool {
		matches!(self, Type::Int4 | Type::Int8)
	}

	/// Parses the SQL spelling used in `CREATE MAPPING` column lists.
	pub fn from_sql(name: &str) -> Option<Type> {
		match name.to_ascii_uppercase().as_str() {
			"INT" | "INTEGER" | "INT4" => Some(Type::Int4),
			"BIGINT" | "INT8" => Some(Type::Int8),
			"VARCHAR" | "TEXT" | "UTF8" => Some(Type::Utf8),
			"BOOLEAN" | "BOOL" => Some(Type::Boolean),
			_ => None,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Boolean => f.write_str("BOOLEAN"),
			Type::Int4 => f.write_str("INT"),
			Type::Int8 => f.write_str("BIGINT"),
			Type::Utf8 => f.write_str("VARCHAR"),
			Type::Record => f.write_str("RECORD"),
			Type::Json => f.write_str("JSON"),
			Type::Undefined => f.write_str("UNDEFINED"),
		}
	}
}
