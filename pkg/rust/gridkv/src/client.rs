// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use gridkv_catalog::Catalog;
use gridkv_codec::TypeRegistry;
use gridkv_engine::Executor;
use gridkv_store::{MapStore, PartitionRouter};
use tracing::{info, instrument};

use crate::{ClientConfig, MapHandle};

/// Entry point of the library: owns the store, the mapping catalog and the
/// SQL executor built on top of them. Cheap to clone.
#[derive(Clone)]
pub struct Client(Arc<ClientInner>);

pub struct ClientInner {
	config: ClientConfig,
	registry: TypeRegistry,
	catalog: Catalog,
	store: MapStore,
	executor: Executor,
}

impl Deref for Client {
	type Target = ClientInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Client {
	/// A client over in-process partitions.
	pub fn new(config: ClientConfig, registry: TypeRegistry) -> Self {
		let store = MapStore::new(config.store.clone());
		Self::start(config, registry, store)
	}

	/// A client whose partitions live behind `router`.
	pub fn with_router(config: ClientConfig, registry: TypeRegistry, router: Arc<dyn PartitionRouter>) -> Self {
		let store = MapStore::with_router(config.store.clone(), router);
		Self::start(config, registry, store)
	}

	#[instrument(name = "client::start", level = "debug", skip_all, fields(cluster = %config.cluster_name))]
	fn start(config: ClientConfig, registry: TypeRegistry, store: MapStore) -> Self {
		let catalog = Catalog::new(registry.clone());
		let executor = Executor::new(catalog.clone(), store.clone());
		info!(
			cluster = %config.cluster_name,
			partitions = store.partition_count(),
			types = registry.len(),
			"client started"
		);
		Self(Arc::new(ClientInner {
			config,
			registry,
			catalog,
			store,
			executor,
		}))
	}

	/// SQL access to the mapped maps.
	pub fn sql(&self) -> &Executor {
		&self.executor
	}

	/// Direct key-value access to the map `name`. Maps exist implicitly.
	pub fn map(&self, name: impl Into<String>) -> MapHandle {
		MapHandle::new(name.into(), self.store.clone(), self.registry.clone())
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	pub fn registry(&self) -> &TypeRegistry {
		&self.registry
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}
}
