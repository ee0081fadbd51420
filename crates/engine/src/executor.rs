// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use gridkv_catalog::Catalog;
use gridkv_sql::ast::Statement;
use gridkv_store::MapStore;
use gridkv_type::{Error, Params, Result};
use tracing::instrument;

use crate::RowCursor;

/// Runs SQL statements against a catalog and the map store it describes.
#[derive(Clone)]
pub struct Executor(Arc<ExecutorInner>);

pub struct ExecutorInner {
	pub(crate) catalog: Catalog,
	pub(crate) store: MapStore,
}

impl Deref for Executor {
	type Target = ExecutorInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Executor {
	pub fn new(catalog: Catalog, store: MapStore) -> Self {
		Self(Arc::new(ExecutorInner {
			catalog,
			store,
		}))
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	pub fn store(&self) -> &MapStore {
		&self.store
	}

	/// Parses and runs one statement. `?` markers bind to `params` in order;
	/// their count must match exactly.
	#[instrument(name = "engine::execute", level = "debug", skip(self, params), fields(sql = %sql))]
	pub fn execute(&self, sql: &str, params: impl Into<Params>) -> Result<RowCursor> {
		let parsed = gridkv_sql::parse(sql)?;
		let params = params.into();
		if parsed.parameters != params.len() {
			return Err(Error::ParameterCountMismatch {
				expected: parsed.parameters,
				actual: params.len(),
			});
		}

		match parsed.statement {
			Statement::CreateMapping(create) => self.create_mapping(create),
			Statement::DropMapping(drop) => self.drop_mapping(drop),
			Statement::ShowMappings => Ok(self.show_mappings()),
			Statement::Insert(insert) => self.insert(insert, &params),
			Statement::Select(select) => self.select(select, &params),
			Statement::Delete(delete) => self.delete(delete, &params),
		}
	}
}
