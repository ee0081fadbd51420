// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_store::StoreConfig;

/// Default configuration values
pub mod defaults {
	/// Name of the cluster a client joins when none is configured.
	pub const CLUSTER_NAME: &str = "dev";
}

/// Everything a [`crate::Client`] is built from. Passed explicitly; there is
/// no process-wide client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
	/// Default: "dev"
	pub cluster_name: String,
	pub store: StoreConfig,
}

impl ClientConfig {
	pub fn new() -> Self {
		Self {
			cluster_name: defaults::CLUSTER_NAME.to_string(),
			store: StoreConfig::default(),
		}
	}

	pub fn with_cluster_name(mut self, name: impl Into<String>) -> Self {
		self.cluster_name = name.into();
		self
	}

	pub fn with_store(mut self, store: StoreConfig) -> Self {
		self.store = store;
		self
	}
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = ClientConfig::default();
		assert_eq!(config.cluster_name, "dev");
		assert_eq!(config.store.partition_count, gridkv_store::defaults::PARTITION_COUNT);
	}

	#[test]
	fn test_builder() {
		let config = ClientConfig::new()
			.with_cluster_name("pr-3814")
			.with_store(StoreConfig::new().partition_count(16).scan_batch_size(8));
		assert_eq!(config.cluster_name, "pr-3814");
		assert_eq!(config.store.partition_count, 16);
		assert_eq!(config.store.scan_batch_size, 8);
	}
}
