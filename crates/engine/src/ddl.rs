// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use gridkv_catalog::{ColumnToCreate, MappingToCreate};
use gridkv_sql::ast::{CreateMappingStatement, DropMappingStatement};
use gridkv_type::{Error, Result, Value};
use tracing::debug;

use crate::{Executor, Row, RowCursor};

/// The only map type a mapping can be declared over.
const MAP_TYPE: &str = "IMap";

impl Executor {
	pub(crate) fn create_mapping(&self, create: CreateMappingStatement) -> Result<RowCursor> {
		if !create.map_type.eq_ignore_ascii_case(MAP_TYPE) {
			return Err(Error::UnsupportedFormat {
				format: create.map_type,
			});
		}

		let mapping = self.catalog.create_mapping(
			MappingToCreate {
				name: create.name,
				columns: create
					.columns
					.into_iter()
					.map(|c| ColumnToCreate {
						name: c.name,
						ty: c.ty,
					})
					.collect(),
				options: create.options,
			},
			create.replace,
		)?;
		debug!(mapping = %mapping.name, replace = create.replace, "mapping created");
		Ok(RowCursor::update(0))
	}

	pub(crate) fn drop_mapping(&self, drop: DropMappingStatement) -> Result<RowCursor> {
		if self.catalog.drop_mapping(&drop.name, drop.if_exists)? {
			debug!(mapping = %drop.name, "mapping dropped");
		}
		Ok(RowCursor::update(0))
	}

	pub(crate) fn show_mappings(&self) -> RowCursor {
		let columns: Arc<[String]> = Arc::from(vec!["name".to_string()]);
		let rows = self
			.catalog
			.list()
			.into_iter()
			.map(|m| Row::new(columns.clone(), vec![Value::Utf8(m.name.clone())]))
			.collect::<Vec<_>>();
		RowCursor::rows(columns, rows.into_iter().map(Ok))
	}
}
