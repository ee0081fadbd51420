// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{IntoValue, Value};

/// An instance of a named schema: the type name plus its field values in
/// write order.
///
/// Records are plain owned data. Encoding copies them into bytes and decoding
/// builds a fresh record, so a record held by a caller never aliases a map
/// entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
	type_name: String,
	fields: IndexMap<String, Value>,
}

impl Record {
	pub fn new(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			fields: IndexMap::new(),
		}
	}

	/// Builder-style setter.
	pub fn with(mut self, name: impl Into<String>, value: impl IntoValue) -> Self {
		self.set(name, value);
		self
	}

	pub fn set(&mut self, name: impl Into<String>, value: impl IntoValue) {
		self.fields.insert(name.into(), value.into_value());
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.fields.iter().map(|(name, value)| (name.as_str(), value))
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

impl Display for Record {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{{", self.type_name)?;
		for (idx, (name, value)) in self.fields.iter().enumerate() {
			if idx > 0 {
				f.write_str(", ")?;
			}
			match value {
				Value::Utf8(s) => write!(f, "{name}: '{s}'")?,
				other => write!(f, "{name}: {other}")?,
			}
		}
		f.write_str("}")
	}
}
