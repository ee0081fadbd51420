// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod catalog;
mod entry;
mod format;
mod mapping;

pub use catalog::Catalog;
pub use format::{Format, KEY_COMPACT_TYPE_NAME, KEY_FORMAT, Side, VALUE_COMPACT_TYPE_NAME, VALUE_FORMAT};
pub use gridkv_type::{Error, Result};
pub use mapping::{Column, ColumnRole, ColumnToCreate, KEY_COLUMN, Mapping, MappingToCreate, VALUE_COLUMN};
