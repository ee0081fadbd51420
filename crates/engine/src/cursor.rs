// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use gridkv_type::{Result, Value};

/// One result row. Column names are shared by every row of a cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
	columns: Arc<[String]>,
	values: Vec<Value>,
}

impl Row {
	pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
		debug_assert_eq!(columns.len(), values.len());
		Self {
			columns,
			values,
		}
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	/// The value of the first column called `name`.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.columns.iter().position(|c| c == name).map(|idx| &self.values[idx])
	}

	pub fn get_index(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	pub fn into_values(self) -> Vec<Value> {
		self.values
	}
}

type Rows = Box<dyn Iterator<Item = Result<Row>> + Send>;

/// Forward-only result of a statement.
///
/// Rows are produced on demand from the underlying map scans. The cursor is
/// fused: after the last row, or after an error has been returned, it yields
/// nothing more. Statements that change data or the catalog carry an update
/// count and no rows.
pub struct RowCursor {
	columns: Arc<[String]>,
	update_count: Option<u64>,
	rows: Option<Rows>,
}

impl RowCursor {
	pub(crate) fn rows(columns: Arc<[String]>, rows: impl Iterator<Item = Result<Row>> + Send + 'static) -> Self {
		Self {
			columns,
			update_count: None,
			rows: Some(Box::new(rows)),
		}
	}

	pub(crate) fn update(count: u64) -> Self {
		Self {
			columns: Arc::from(Vec::new()),
			update_count: Some(count),
			rows: None,
		}
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	/// Rows affected by a DML statement, `Some(0)` for DDL and `None` for
	/// queries.
	pub fn update_count(&self) -> Option<u64> {
		self.update_count
	}

	/// Releases the underlying scans. Safe to call at any point.
	pub fn close(&mut self) {
		self.rows = None;
	}

	pub fn is_closed(&self) -> bool {
		self.rows.is_none()
	}

	/// Drains the cursor, stopping at the first error.
	pub fn collect_rows(self) -> Result<Vec<Row>> {
		self.collect()
	}
}

impl Iterator for RowCursor {
	type Item = Result<Row>;

	fn next(&mut self) -> Option<Self::Item> {
		let rows = self.rows.as_mut()?;
		match rows.next() {
			Some(Ok(row)) => Some(Ok(row)),
			Some(Err(err)) => {
				self.rows = None;
				Some(Err(err))
			}
			None => {
				self.rows = None;
				None
			}
		}
	}
}

impl std::fmt::Debug for RowCursor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RowCursor")
			.field("columns", &self.columns)
			.field("update_count", &self.update_count)
			.field("closed", &self.is_closed())
			.finish()
	}
}
