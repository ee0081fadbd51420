// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use crossbeam_skiplist::SkipMap;
use gridkv_codec::EncodedKey;
use gridkv_type::{Error, Result};
use parking_lot::Mutex;
use tracing::warn;

use crate::{MapValue, PartitionId, PartitionRouter};

type Entries = SkipMap<EncodedKey, MapValue>;

/// In-process router: every partition lives in this process.
#[derive(Clone)]
pub struct MemoryRouter(Arc<MemoryRouterInner>);

pub struct MemoryRouterInner {
	partitions: Vec<Partition>,
}

struct Partition {
	writer: Mutex<()>,
	maps: SkipMap<String, Arc<Entries>>,
}

impl Partition {
	fn new() -> Self {
		Self {
			writer: Mutex::new(()),
			maps: SkipMap::new(),
		}
	}

	fn entries(&self, map: &str) -> Option<Arc<Entries>> {
		self.maps.get(map).map(|entry| entry.value().clone())
	}

	fn entries_or_create(&self, map: &str) -> Arc<Entries> {
		self.maps.get_or_insert_with(map.to_string(), || Arc::new(SkipMap::new())).value().clone()
	}
}

impl Deref for MemoryRouter {
	type Target = MemoryRouterInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl MemoryRouter {
	pub fn new(partition_count: usize) -> Self {
		let count = if partition_count == 0 {
			warn!("partition count of 0 requested, using 1");
			1
		} else {
			partition_count
		};
		Self(Arc::new(MemoryRouterInner {
			partitions: (0..count).map(|_| Partition::new()).collect(),
		}))
	}

	fn partition(&self, partition: PartitionId) -> Result<&Partition> {
		self.partitions.get(partition).ok_or_else(|| {
			Error::store_unavailable(format!(
				"partition {partition} is not owned by this router ({} partitions)",
				self.partitions.len()
			))
		})
	}
}

impl PartitionRouter for MemoryRouter {
	fn partition_count(&self) -> usize {
		self.partitions.len()
	}

	fn get(&self, map: &str, partition: PartitionId, key: &EncodedKey) -> Result<Option<MapValue>> {
		let partition = self.partition(partition)?;
		Ok(partition.entries(map).and_then(|entries| entries.get(key).map(|entry| entry.value().clone())))
	}

	fn put(&self, map: &str, partition: PartitionId, key: EncodedKey, value: MapValue) -> Result<Option<MapValue>> {
		let partition = self.partition(partition)?;
		let _guard = partition.writer.lock();
		let entries = partition.entries_or_create(map);
		let previous = entries.get(&key).map(|entry| entry.value().clone());
		entries.insert(key, value);
		Ok(previous)
	}

	fn put_if_absent(
		&self,
		map: &str,
		partition: PartitionId,
		key: EncodedKey,
		value: MapValue,
	) -> Result<Option<MapValue>> {
		let partition = self.partition(partition)?;
		let _guard = partition.writer.lock();
		let entries = partition.entries_or_create(map);
		if let Some(existing) = entries.get(&key) {
			return Ok(Some(existing.value().clone()));
		}
		entries.insert(key, value);
		Ok(None)
	}

	fn remove(&self, map: &str, partition: PartitionId, key: &EncodedKey) -> Result<Option<MapValue>> {
		let partition = self.partition(partition)?;
		let _guard = partition.writer.lock();
		Ok(partition.entries(map).and_then(|entries| entries.remove(key).map(|entry| entry.value().clone())))
	}

	fn keys(&self, map: &str, partition: PartitionId) -> Result<Vec<EncodedKey>> {
		let partition = self.partition(partition)?;
		Ok(partition
			.entries(map)
			.map(|entries| entries.iter().map(|entry| entry.key().clone()).collect())
			.unwrap_or_default())
	}

	fn len(&self, map: &str, partition: PartitionId) -> Result<usize> {
		let partition = self.partition(partition)?;
		Ok(partition.entries(map).map(|entries| entries.len()).unwrap_or(0))
	}

	fn clear(&self, map: &str) -> Result<()> {
		for partition in &self.partitions {
			let _guard = partition.writer.lock();
			partition.maps.remove(map);
		}
		Ok(())
	}
}
