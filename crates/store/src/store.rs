// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use gridkv_codec::EncodedKey;
use gridkv_type::Result;
use tracing::{debug, instrument};
use xxhash_rust::xxh3;

use crate::{MapValue, MemoryRouter, PartitionId, PartitionRouter, Scan, StoreConfig};

/// Named maps spread over the partitions of a [`PartitionRouter`].
#[derive(Clone)]
pub struct MapStore(Arc<MapStoreInner>);

pub struct MapStoreInner {
	router: Arc<dyn PartitionRouter>,
	config: StoreConfig,
}

impl Deref for MapStore {
	type Target = MapStoreInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl MapStore {
	/// A store backed by an in-process [`MemoryRouter`].
	pub fn new(config: StoreConfig) -> Self {
		let router = MemoryRouter::new(config.partition_count);
		Self::with_router(config, Arc::new(router))
	}

	/// A store backed by `router`. The router decides the partition count.
	pub fn with_router(config: StoreConfig, router: Arc<dyn PartitionRouter>) -> Self {
		Self(Arc::new(MapStoreInner {
			router,
			config,
		}))
	}

	pub fn config(&self) -> &StoreConfig {
		&self.config
	}

	pub fn partition_count(&self) -> usize {
		self.router.partition_count().max(1)
	}

	pub fn partition_of(&self, key: &EncodedKey) -> PartitionId {
		(xxh3::xxh3_64(key.as_bytes()) % self.partition_count() as u64) as PartitionId
	}

	#[instrument(name = "store::put", level = "trace", skip(self, key, value))]
	pub fn put(&self, map: &str, key: EncodedKey, value: MapValue) -> Result<Option<MapValue>> {
		let partition = self.partition_of(&key);
		self.router.put(map, partition, key, value)
	}

	#[instrument(name = "store::get", level = "trace", skip(self, key))]
	pub fn get(&self, map: &str, key: &EncodedKey) -> Result<Option<MapValue>> {
		self.router.get(map, self.partition_of(key), key)
	}

	#[instrument(name = "store::delete", level = "trace", skip(self, key))]
	pub fn delete(&self, map: &str, key: &EncodedKey) -> Result<Option<MapValue>> {
		self.router.remove(map, self.partition_of(key), key)
	}

	#[instrument(name = "store::put_if_absent", level = "trace", skip(self, key, value))]
	pub fn put_if_absent(&self, map: &str, key: EncodedKey, value: MapValue) -> Result<Option<MapValue>> {
		let partition = self.partition_of(&key);
		self.router.put_if_absent(map, partition, key, value)
	}

	/// Puts every entry in turn. Entries are applied independently; a failure
	/// leaves the earlier ones in place.
	#[instrument(name = "store::put_all", level = "trace", skip(self, entries))]
	pub fn put_all(&self, map: &str, entries: impl IntoIterator<Item = (EncodedKey, MapValue)>) -> Result<()> {
		for (key, value) in entries {
			self.put(map, key, value)?;
		}
		Ok(())
	}

	pub fn contains_key(&self, map: &str, key: &EncodedKey) -> Result<bool> {
		Ok(self.get(map, key)?.is_some())
	}

	#[instrument(name = "store::size", level = "trace", skip(self))]
	pub fn size(&self, map: &str) -> Result<usize> {
		let mut size = 0;
		for partition in 0..self.router.partition_count() {
			size += self.router.len(map, partition)?;
		}
		Ok(size)
	}

	#[instrument(name = "store::clear", level = "debug", skip(self))]
	pub fn clear(&self, map: &str) -> Result<()> {
		self.router.clear(map)?;
		debug!("map cleared");
		Ok(())
	}

	/// Captures the key set of `map` and returns a lazy walk over it.
	#[instrument(name = "store::scan", level = "trace", skip(self))]
	pub fn scan(&self, map: &str) -> Result<Scan> {
		let mut snapshot = Vec::new();
		for partition in 0..self.router.partition_count() {
			snapshot.extend(self.router.keys(map, partition)?.into_iter().map(|key| (partition, key)));
		}
		Ok(Scan::new(self.router.clone(), map.to_string(), snapshot, self.config.scan_batch_size))
	}
}
