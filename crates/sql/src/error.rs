// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// A statement that could not be tokenized or parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at position {position} near '{token}'")]
pub struct ParseError {
	pub message: String,
	/// Text of the offending token; empty at end of input.
	pub token: String,
	/// Byte offset of the offending token.
	pub position: usize,
}

impl ParseError {
	pub fn new(message: impl Into<String>, token: impl Into<String>, position: usize) -> Self {
		Self {
			message: message.into(),
			token: token.into(),
			position,
		}
	}
}

impl From<ParseError> for gridkv_type::Error {
	fn from(err: ParseError) -> Self {
		gridkv_type::Error::MalformedStatement {
			message: err.message,
			token: err.token,
			position: err.position,
		}
	}
}
