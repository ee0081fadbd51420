// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{iter, sync::Arc};

use gridkv_codec::{EncodedKey, TypeRegistry};
use gridkv_sql::ast::{SelectColumn, SelectStatement};
use gridkv_store::{MapStore, MapValue};
use gridkv_type::{Params, Result};
use tracing::{instrument, trace};

use crate::{
	Executor, Row, RowCursor,
	scope::{Entry, Operand, Predicate, Scope, Source},
};

type Rows = Box<dyn Iterator<Item = Result<Row>> + Send>;

/// Everything a lazily evaluated SELECT needs once execution has started.
struct SelectPlan {
	registry: TypeRegistry,
	scope: Scope,
	predicate: Predicate,
	projection: Vec<Operand>,
	columns: Arc<[String]>,
}

impl SelectPlan {
	fn decode(&self, source: usize, key: &EncodedKey, value: &MapValue) -> Result<Entry> {
		self.scope.decode(&self.registry, source, key, value)
	}

	/// The projected row if `entries` satisfy the predicate.
	fn emit(&self, entries: &[&Entry]) -> Result<Option<Row>> {
		if !self.predicate.matches(&self.scope, entries)? {
			return Ok(None);
		}
		let values = self
			.projection
			.iter()
			.map(|operand| self.scope.eval(operand, entries))
			.collect::<Result<Vec<_>>>()?;
		Ok(Some(Row::new(self.columns.clone(), values)))
	}
}

impl Executor {
	#[instrument(name = "engine::select", level = "trace", skip_all)]
	pub(crate) fn select(&self, select: SelectStatement, params: &Params) -> Result<RowCursor> {
		let mut sources = vec![Source::new(&select.from, self.catalog.resolve(&select.from.name)?)];
		if let Some(join) = &select.join {
			sources.push(Source::new(&join.table, self.catalog.resolve(&join.table.name)?));
		}
		let scope = Scope::new(sources);

		let (names, projection) = project(&scope, &select.columns, params)?;
		let conditions = select.join.iter().map(|j| &j.on).chain(select.where_clause.iter());
		let predicate = scope.predicate(conditions, params)?;

		let plan = Arc::new(SelectPlan {
			registry: self.catalog.registry().clone(),
			scope,
			predicate,
			projection,
			columns: Arc::from(names),
		});
		let columns = plan.columns.clone();

		let rows = if select.join.is_some() {
			self.join(plan)?
		} else {
			self.single(plan)?
		};
		Ok(RowCursor::rows(columns, rows))
	}

	fn single(&self, plan: Arc<SelectPlan>) -> Result<Rows> {
		let entries = entries(&self.store, &plan)?;
		Ok(Box::new(entries.filter_map(move |entry| {
			entry.and_then(|(key, value)| plan.decode(0, &key, &value)).and_then(|e| plan.emit(&[&e])).transpose()
		})))
	}

	/// Nested-loop join: the right map is scanned again for every left entry.
	fn join(&self, plan: Arc<SelectPlan>) -> Result<Rows> {
		let left = entries(&self.store, &plan)?;
		let store = self.store.clone();
		let right_map = plan.scope.source(1).mapping.map_name.clone();

		Ok(Box::new(left.flat_map(move |entry| -> Rows {
			let left = match entry.and_then(|(key, value)| plan.decode(0, &key, &value)) {
				Ok(left) => left,
				Err(err) => return Box::new(iter::once(Err(err))),
			};
			let right = match store.scan(&right_map) {
				Ok(scan) => scan,
				Err(err) => return Box::new(iter::once(Err(err))),
			};
			let plan = plan.clone();
			Box::new(right.filter_map(move |entry| {
				entry.and_then(|(key, value)| plan.decode(1, &key, &value))
					.and_then(|right| plan.emit(&[&left, &right]))
					.transpose()
			}))
		})))
	}
}

/// Entries of the first source: a point lookup when the predicate pins its
/// whole key, a scan otherwise.
fn entries(store: &MapStore, plan: &SelectPlan) -> Result<Box<dyn Iterator<Item = Result<(EncodedKey, MapValue)>> + Send>> {
	let mapping = &plan.scope.source(0).mapping;

	if let Some(value) = plan.predicate.point_key() {
		trace!(mapping = %mapping.name, "point lookup");
		let Some(key) = mapping.lookup_key(&plan.registry, value)? else {
			return Ok(Box::new(iter::empty()));
		};
		let found = store.get(&mapping.map_name, &key)?;
		return Ok(Box::new(found.map(|value| Ok((key, value))).into_iter()));
	}

	Ok(Box::new(store.scan(&mapping.map_name)?))
}

/// Column names and operands of the select list. `*` expands to the
/// declared columns of each source in order.
fn project(scope: &Scope, columns: &[SelectColumn], params: &Params) -> Result<(Vec<String>, Vec<Operand>)> {
	let mut names = Vec::new();
	let mut operands = Vec::new();
	for (idx, column) in columns.iter().enumerate() {
		match column {
			SelectColumn::AllColumns => {
				for (source, s) in scope.sources().iter().enumerate() {
					for column in &s.mapping.columns {
						names.push(column.name.clone());
						operands.push(Operand::Column {
							source,
							column: column.clone(),
						});
					}
				}
			}
			SelectColumn::Expr {
				expr,
				alias,
			} => {
				let operand = scope.resolve(expr, params)?;
				let name = match (alias, &operand) {
					(Some(alias), _) => alias.clone(),
					(
						None,
						Operand::Column {
							column,
							..
						},
					) => column.name.clone(),
					(None, Operand::Value(_)) => format!("EXPR${idx}"),
				};
				names.push(name);
				operands.push(operand);
			}
		}
	}
	Ok((names, operands))
}
