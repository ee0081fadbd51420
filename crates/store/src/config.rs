// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod defaults {
	/// Number of logical partitions keys are spread over.
	pub const PARTITION_COUNT: usize = 271;
	/// Number of keys whose values a scan fetches per round trip.
	pub const SCAN_BATCH_SIZE: usize = 256;
}

/// Configuration of a [`crate::MapStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
	/// Number of partitions of the bundled memory router. Does not need to be
	/// a power of two; `0` is treated as `1`.
	///
	/// Default: 271
	pub partition_count: usize,
	/// Keys fetched per batch while scanning; `0` is treated as `1`.
	///
	/// Default: 256
	pub scan_batch_size: usize,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			partition_count: defaults::PARTITION_COUNT,
			scan_batch_size: defaults::SCAN_BATCH_SIZE,
		}
	}
}

impl StoreConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn partition_count(mut self, count: usize) -> Self {
		self.partition_count = count;
		self
	}

	pub fn scan_batch_size(mut self, size: usize) -> Self {
		self.scan_batch_size = size;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = StoreConfig::new();
		assert_eq!(config.partition_count, 271);
		assert_eq!(config.scan_batch_size, defaults::SCAN_BATCH_SIZE);
	}

	#[test]
	fn test_setters() {
		let config = StoreConfig::new().partition_count(8).scan_batch_size(2);
		assert_eq!(config.partition_count, 8);
		assert_eq!(config.scan_batch_size, 2);
	}
}
