// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_codec::EncodedKey;
use gridkv_type::Result;

use crate::MapValue;

pub type PartitionId = usize;

/// Access to the partitions holding map entries.
///
/// Implementations serialise writes within a partition, which makes
/// operations on a single key linearizable. Transport-backed routers report
/// connectivity failures as `StoreUnavailable`.
pub trait PartitionRouter: Send + Sync {
	fn partition_count(&self) -> usize;

	fn get(&self, map: &str, partition: PartitionId, key: &EncodedKey) -> Result<Option<MapValue>>;

	/// Fetches several keys of one partition. Absent keys yield `None`.
	fn get_many(&self, map: &str, partition: PartitionId, keys: &[EncodedKey]) -> Result<Vec<Option<MapValue>>> {
		keys.iter().map(|key| self.get(map, partition, key)).collect()
	}

	/// Stores `value` and returns the value it replaced.
	fn put(&self, map: &str, partition: PartitionId, key: EncodedKey, value: MapValue) -> Result<Option<MapValue>>;

	/// Stores `value` only if `key` is absent. Returns the existing value
	/// otherwise.
	fn put_if_absent(
		&self,
		map: &str,
		partition: PartitionId,
		key: EncodedKey,
		value: MapValue,
	) -> Result<Option<MapValue>>;

	fn remove(&self, map: &str, partition: PartitionId, key: &EncodedKey) -> Result<Option<MapValue>>;

	/// The keys of `map` currently held by `partition`.
	fn keys(&self, map: &str, partition: PartitionId) -> Result<Vec<EncodedKey>>;

	fn len(&self, map: &str, partition: PartitionId) -> Result<usize> {
		Ok(self.keys(map, partition)?.len())
	}

	fn clear(&self, map: &str) -> Result<()>;
}
