// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_catalog::{Column, Mapping};
use gridkv_codec::{EncodedKey, TypeRegistry};
use gridkv_sql::ast::{Expr, InsertStatement};
use gridkv_store::MapValue;
use gridkv_type::{Error, NotFoundKind, Params, Result, Value};
use indexmap::IndexMap;
use tracing::debug;

use crate::{Executor, RowCursor, scope::constant};

impl Executor {
	/// Converts every tuple first and writes only if all of them convert.
	/// The writes themselves are independent puts.
	pub(crate) fn insert(&self, insert: InsertStatement, params: &Params) -> Result<RowCursor> {
		let mapping = self.catalog.resolve(&insert.mapping)?;
		let columns = target_columns(&mapping, &insert.columns)?;
		let registry = self.catalog.registry();

		let entries = insert
			.rows
			.iter()
			.enumerate()
			.map(|(tuple, exprs)| {
				entry(&mapping, registry, &columns, exprs, params).map_err(|cause| Error::insert_failed(tuple, cause))
			})
			.collect::<Result<Vec<_>>>()?;

		let count = entries.len() as u64;
		for (key, value) in entries {
			self.store.put(&mapping.map_name, key, value)?;
		}
		debug!(mapping = %mapping.name, count, "rows inserted");
		Ok(RowCursor::update(count))
	}
}

/// The declared columns an INSERT writes, in value order.
fn target_columns(mapping: &Mapping, names: &[String]) -> Result<Vec<Column>> {
	if names.is_empty() {
		return Ok(mapping.columns.clone());
	}
	let mut columns = Vec::with_capacity(names.len());
	for name in names {
		let column = mapping
			.column(name)
			.ok_or_else(|| Error::not_found(NotFoundKind::Column, format!("{}.{name}", mapping.name)))?;
		if columns.iter().any(|c: &Column| c.name == column.name) {
			return Err(Error::malformed_statement(format!("column '{name}' is listed more than once")));
		}
		columns.push(column.clone());
	}
	Ok(columns)
}

fn entry(
	mapping: &Mapping,
	registry: &TypeRegistry,
	columns: &[Column],
	exprs: &[Expr],
	params: &Params,
) -> Result<(EncodedKey, MapValue)> {
	if exprs.len() != columns.len() {
		return Err(Error::malformed_statement(format!(
			"expected {} values, found {}",
			columns.len(),
			exprs.len()
		)));
	}

	let mut values: IndexMap<String, Value> = IndexMap::with_capacity(columns.len());
	for (column, expr) in columns.iter().zip(exprs) {
		let value = constant(expr, params)?.ok_or_else(|| {
			Error::malformed_statement(format!("value for '{}' must be a literal or parameter", column.name))
		})?;
		values.insert(column.name.clone(), mapping.coerce(column, value)?);
	}
	mapping.encode_entry(registry, &values)
}
