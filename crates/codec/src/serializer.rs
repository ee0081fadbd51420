// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_type::Result;

use crate::{CompactReader, CompactWriter};

/// Moves a caller-defined struct in and out of the compact format.
///
/// The schema is looked up in the registry by [`CompactSerializer::type_name`],
/// so every write through the [`CompactWriter`] is checked against it.
pub trait CompactSerializer: Send + Sync {
	type Target;

	fn type_name(&self) -> &str;

	fn write(&self, writer: &mut CompactWriter<'_>, value: &Self::Target) -> Result<()>;

	fn read(&self, reader: &CompactReader<'_>) -> Result<Self::Target>;
}
