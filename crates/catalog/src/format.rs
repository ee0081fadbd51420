// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use gridkv_type::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const KEY_FORMAT: &str = "keyFormat";
pub const VALUE_FORMAT: &str = "valueFormat";
pub const KEY_COMPACT_TYPE_NAME: &str = "keyCompactTypeName";
pub const VALUE_COMPACT_TYPE_NAME: &str = "valueCompactTypeName";

/// How the key or the value half of a map entry is represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
	/// Fixed-width integer.
	Int,
	/// UTF-8 string.
	Varchar,
	/// Flat JSON object.
	JsonFlat,
	/// Compact record of the named type.
	Compact {
		type_name: String,
	},
}

/// Which half of the entry a format describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
	Key,
	Value,
}

impl Side {
	fn format_option(self) -> &'static str {
		match self {
			Side::Key => KEY_FORMAT,
			Side::Value => VALUE_FORMAT,
		}
	}

	fn compact_type_option(self) -> &'static str {
		match self {
			Side::Key => KEY_COMPACT_TYPE_NAME,
			Side::Value => VALUE_COMPACT_TYPE_NAME,
		}
	}
}

impl Format {
	/// Reads the format of one side from the mapping options.
	pub fn from_options(options: &IndexMap<String, String>, side: Side) -> Result<Format> {
		let option = side.format_option();
		let name = options
			.get(option)
			.ok_or_else(|| Error::malformed_statement(format!("missing option '{option}'")))?;

		match name.to_ascii_lowercase().as_str() {
			"int" | "integer" => Ok(Format::Int),
			"varchar" => Ok(Format::Varchar),
			"json-flat" => Ok(Format::JsonFlat),
			"compact" => {
				let type_option = side.compact_type_option();
				let type_name = options.get(type_option).ok_or_else(|| {
					Error::malformed_statement(format!(
						"option '{type_option}' is required for the compact format"
					))
				})?;
				Ok(Format::Compact {
					type_name: type_name.clone(),
				})
			}
			_ => Err(Error::UnsupportedFormat {
				format: name.clone(),
			}),
		}
	}

	/// Scalar formats carry a single column (`__key` or `this`); structured
	/// ones carry one column per field.
	pub fn is_scalar(&self) -> bool {
		matches!(self, Format::Int | Format::Varchar)
	}
}

impl Display for Format {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Format::Int => f.write_str("int"),
			Format::Varchar => f.write_str("varchar"),
			Format::JsonFlat => f.write_str("json-flat"),
			Format::Compact {
				type_name,
			} => write!(f, "compact<{type_name}>"),
		}
	}
}
