// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_codec::EncodedKey;
use gridkv_sql::ast::{DeleteStatement, TableRef};
use gridkv_type::{Params, Result};
use tracing::debug;

use crate::{
	Executor, RowCursor,
	scope::{Scope, Source},
};

impl Executor {
	/// Removes matching entries. The update count is the number of entries
	/// this statement actually removed.
	pub(crate) fn delete(&self, delete: DeleteStatement, params: &Params) -> Result<RowCursor> {
		let mapping = self.catalog.resolve(&delete.mapping)?;
		let table = TableRef {
			name: delete.mapping.clone(),
			alias: None,
		};
		let scope = Scope::new(vec![Source::new(&table, mapping.clone())]);
		let predicate = scope.predicate(delete.where_clause.iter(), params)?;
		let registry = self.catalog.registry();

		let mut keys: Vec<EncodedKey> = Vec::new();
		for entry in self.store.scan(&mapping.map_name)? {
			let (key, value) = entry?;
			if !predicate.is_empty() {
				let decoded = scope.decode(registry, 0, &key, &value)?;
				if !predicate.matches(&scope, &[&decoded])? {
					continue;
				}
			}
			keys.push(key);
		}

		let mut removed = 0u64;
		for key in &keys {
			if self.store.delete(&mapping.map_name, key)?.is_some() {
				removed += 1;
			}
		}
		debug!(mapping = %mapping.name, removed, "rows deleted");
		Ok(RowCursor::update(removed))
	}
}
