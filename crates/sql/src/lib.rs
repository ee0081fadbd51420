// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The SQL subset understood by gridkv: mapping DDL, `INSERT`, `SELECT`
//! with an optional equality join and `DELETE`.

pub mod ast;
mod error;
mod parse;
pub mod token;

pub use error::ParseError;
use tracing::instrument;

pub use crate::ast::Parsed;

/// Parses one statement. A trailing `;` is accepted.
#[instrument(name = "sql::parse", level = "trace", skip(sql))]
pub fn parse(sql: &str) -> Result<Parsed, ParseError> {
	parse::parse(sql)
}
