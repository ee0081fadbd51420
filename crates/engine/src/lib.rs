// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Executes the gridkv SQL subset.
//!
//! Statements are parsed, bound against the mapping catalog and run against
//! the map store. Queries return a lazy [`RowCursor`]; rows are decoded from
//! map entries as the cursor advances.

mod cursor;
mod ddl;
mod delete;
mod executor;
mod insert;
mod scope;
mod select;

pub use cursor::{Row, RowCursor};
pub use executor::{Executor, ExecutorInner};
pub use gridkv_type::{Error, Result};
