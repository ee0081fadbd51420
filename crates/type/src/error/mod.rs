// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
	Mapping,
	Type,
	Column,
	Field,
}

impl Display for NotFoundKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			NotFoundKind::Mapping => f.write_str("mapping"),
			NotFoundKind::Type => f.write_str("type"),
			NotFoundKind::Column => f.write_str("column"),
			NotFoundKind::Field => f.write_str("field"),
		}
	}
}

/// Every failure the codec, store, catalog and executor can report.
///
/// All variants are recoverable; callers match on them to decide what to do.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	#[error("field '{field}' of '{type_name}' is {actual}, expected {expected}")]
	SchemaMismatch {
		type_name: String,
		field: String,
		expected: String,
		actual: String,
	},

	#[error("type name '{type_name}' is already registered with a different schema")]
	DuplicateTypeName {
		type_name: String,
	},

	#[error("field '{field}' is declared more than once in '{type_name}'")]
	DuplicateFieldName {
		type_name: String,
		field: String,
	},

	#[error("malformed compact payload: {reason}")]
	MalformedPayload {
		reason: String,
	},

	#[error("unsupported format '{format}'")]
	UnsupportedFormat {
		format: String,
	},

	#[error("mapping '{name}' already exists")]
	MappingExists {
		name: String,
	},

	#[error("{kind} '{name}' not found")]
	NotFound {
		kind: NotFoundKind,
		name: String,
	},

	#[error("statement expects {expected} parameters, {actual} supplied")]
	ParameterCountMismatch {
		expected: usize,
		actual: usize,
	},

	#[error("insert of tuple {tuple} failed: {cause}")]
	InsertFailed {
		tuple: usize,
		cause: Box<Error>,
	},

	#[error("malformed statement at position {position} near '{token}': {message}")]
	MalformedStatement {
		message: String,
		token: String,
		position: usize,
	},

	#[error("map store unavailable: {reason}")]
	StoreUnavailable {
		reason: String,
	},
}

impl Error {
	pub fn schema_mismatch(
		type_name: impl Into<String>,
		field: impl Into<String>,
		expected: impl Display,
		actual: impl Display,
	) -> Self {
		Error::SchemaMismatch {
			type_name: type_name.into(),
			field: field.into(),
			expected: expected.to_string(),
			actual: actual.to_string(),
		}
	}

	pub fn malformed_payload(reason: impl Into<String>) -> Self {
		Error::MalformedPayload {
			reason: reason.into(),
		}
	}

	pub fn not_found(kind: NotFoundKind, name: impl Into<String>) -> Self {
		Error::NotFound {
			kind,
			name: name.into(),
		}
	}

	/// A statement-level failure that has no single offending token.
	pub fn malformed_statement(message: impl Into<String>) -> Self {
		Error::MalformedStatement {
			message: message.into(),
			token: String::new(),
			position: 0,
		}
	}

	pub fn store_unavailable(reason: impl Into<String>) -> Self {
		Error::StoreUnavailable {
			reason: reason.into(),
		}
	}

	pub fn insert_failed(tuple: usize, cause: Error) -> Self {
		Error::InsertFailed {
			tuple,
			cause: Box::new(cause),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_not_found_message() {
		let err = Error::not_found(NotFoundKind::Mapping, "cities");
		assert_eq!(err.to_string(), "mapping 'cities' not found");
	}

	#[test]
	fn test_insert_failed_keeps_cause() {
		let err = Error::insert_failed(
			2,
			Error::UnsupportedFormat {
				format: "java".to_string(),
			},
		);
		assert_eq!(err.to_string(), "insert of tuple 2 failed: unsupported format 'java'");
		match err {
			Error::InsertFailed {
				tuple,
				cause,
			} => {
				assert_eq!(tuple, 2);
				assert!(matches!(*cause, Error::UnsupportedFormat { .. }));
			}
			_ => panic!("expected InsertFailed"),
		}
	}

	#[test]
	fn test_malformed_statement_message() {
		let err = Error::MalformedStatement {
			message: "expected FROM".to_string(),
			token: "cities".to_string(),
			position: 14,
		};
		assert_eq!(err.to_string(), "malformed statement at position 14 near 'cities': expected FROM");
	}
}
