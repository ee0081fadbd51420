// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use crossbeam_skiplist::SkipMap;
use gridkv_codec::TypeRegistry;
use gridkv_type::{Error, NotFoundKind, Result};
use tracing::{debug, instrument};

use crate::mapping::{Mapping, MappingToCreate};

/// In-memory mapping catalog. Lookups never block; creating and replacing a
/// mapping swaps a fully built `Arc<Mapping>` in one step.
#[derive(Clone)]
pub struct Catalog(Arc<CatalogInner>);

pub struct CatalogInner {
	registry: TypeRegistry,
	mappings: SkipMap<String, Arc<Mapping>>,
}

impl Deref for Catalog {
	type Target = CatalogInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Default for Catalog {
	fn default() -> Self {
		Self::new(TypeRegistry::empty())
	}
}

impl Catalog {
	pub fn new(registry: TypeRegistry) -> Self {
		Self(Arc::new(CatalogInner {
			registry,
			mappings: SkipMap::new(),
		}))
	}

	pub fn registry(&self) -> &TypeRegistry {
		&self.registry
	}

	#[instrument(name = "catalog::mapping::create", level = "debug", skip(self, to_create), fields(name = %to_create.name))]
	pub fn create_mapping(&self, to_create: MappingToCreate, replace: bool) -> Result<Arc<Mapping>> {
		let mapping = Arc::new(Mapping::from_declaration(&self.registry, to_create)?);
		let name = mapping.name.clone();

		if replace {
			self.mappings.insert(name, mapping.clone());
			debug!("mapping created or replaced");
			return Ok(mapping);
		}

		let entry = self.mappings.get_or_insert(name.clone(), mapping.clone());
		if !Arc::ptr_eq(entry.value(), &mapping) {
			return Err(Error::MappingExists {
				name,
			});
		}
		debug!("mapping created");
		Ok(mapping)
	}

	/// Removes a mapping. The entries of its map are left alone. Returns
	/// whether a mapping was removed.
	#[instrument(name = "catalog::mapping::drop", level = "debug", skip(self))]
	pub fn drop_mapping(&self, name: &str, if_exists: bool) -> Result<bool> {
		match self.mappings.remove(name) {
			Some(_) => {
				debug!("mapping dropped");
				Ok(true)
			}
			None if if_exists => Ok(false),
			None => Err(Error::not_found(NotFoundKind::Mapping, name)),
		}
	}

	pub fn find(&self, name: &str) -> Option<Arc<Mapping>> {
		self.mappings.get(name).map(|entry| entry.value().clone())
	}

	#[instrument(name = "catalog::mapping::resolve", level = "trace", skip(self))]
	pub fn resolve(&self, name: &str) -> Result<Arc<Mapping>> {
		self.find(name).ok_or_else(|| Error::not_found(NotFoundKind::Mapping, name))
	}

	/// All mappings, ordered by name.
	pub fn list(&self) -> Vec<Arc<Mapping>> {
		self.mappings.iter().map(|entry| entry.value().clone()).collect()
	}
}

#[cfg(test)]
mod tests {
	use std::{
		sync::atomic::{AtomicBool, Ordering},
		thread,
	};

	use gridkv_testing::fixture;
	use gridkv_type::Type;

	use super::*;
	use crate::{ColumnToCreate, Format};

	fn declaration(name: &str, value_format: &str) -> MappingToCreate {
		let value_type = if value_format == "int" {
			Type::Int8
		} else {
			Type::Utf8
		};
		MappingToCreate {
			name: name.to_string(),
			columns: vec![
				ColumnToCreate {
					name: "__key".to_string(),
					ty: Type::Int4,
				},
				ColumnToCreate {
					name: "this".to_string(),
					ty: value_type,
				},
			],
			options: [("keyFormat", "int"), ("valueFormat", value_format)]
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect(),
		}
	}

	#[test]
	fn test_create_and_resolve() {
		let catalog = Catalog::new(fixture::registry());
		catalog.create_mapping(declaration("cities", "varchar"), false).unwrap();

		let mapping = catalog.resolve("cities").unwrap();
		assert_eq!(mapping.value_format, Format::Varchar);
		assert_eq!(
			catalog.resolve("countries").unwrap_err(),
			Error::not_found(NotFoundKind::Mapping, "countries")
		);
	}

	#[test]
	fn test_create_existing() {
		let catalog = Catalog::default();
		catalog.create_mapping(declaration("cities", "varchar"), false).unwrap();
		assert_eq!(
			catalog.create_mapping(declaration("cities", "int"), false).unwrap_err(),
			Error::MappingExists {
				name: "cities".to_string()
			}
		);
		assert_eq!(catalog.resolve("cities").unwrap().value_format, Format::Varchar);
	}

	#[test]
	fn test_replace() {
		let catalog = Catalog::default();
		catalog.create_mapping(declaration("cities", "varchar"), false).unwrap();
		catalog.create_mapping(declaration("cities", "int"), true).unwrap();
		assert_eq!(catalog.resolve("cities").unwrap().value_format, Format::Int);
	}

	#[test]
	fn test_failed_declaration_keeps_previous() {
		let catalog = Catalog::default();
		catalog.create_mapping(declaration("cities", "varchar"), false).unwrap();
		assert!(catalog.create_mapping(declaration("cities", "java"), true).is_err());
		assert_eq!(catalog.resolve("cities").unwrap().value_format, Format::Varchar);
	}

	#[test]
	fn test_drop() {
		let catalog = Catalog::default();
		catalog.create_mapping(declaration("cities", "varchar"), false).unwrap();

		assert!(catalog.drop_mapping("cities", false).unwrap());
		assert!(!catalog.drop_mapping("cities", true).unwrap());
		assert_eq!(
			catalog.drop_mapping("cities", false).unwrap_err(),
			Error::not_found(NotFoundKind::Mapping, "cities")
		);
	}

	#[test]
	fn test_list_is_sorted() {
		let catalog = Catalog::default();
		for name in ["trades", "cities", "country"] {
			catalog.create_mapping(declaration(name, "varchar"), false).unwrap();
		}
		let names: Vec<String> = catalog.list().iter().map(|m| m.name.clone()).collect();
		assert_eq!(names, vec!["cities", "country", "trades"]);
	}

	#[test]
	fn test_concurrent_create_has_one_winner() {
		let catalog = Catalog::default();
		let handles: Vec<_> = (0..8)
			.map(|_| {
				let catalog = catalog.clone();
				thread::spawn(move || catalog.create_mapping(declaration("cities", "varchar"), false).is_ok())
			})
			.collect();
		let winners = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
		assert_eq!(winners, 1);
	}

	// Readers racing a stream of replacements only ever see one of the two
	// complete declarations.
	#[test]
	fn test_replace_is_atomic_for_readers() {
		let catalog = Catalog::default();
		catalog.create_mapping(declaration("cities", "varchar"), false).unwrap();
		let stop = Arc::new(AtomicBool::new(false));

		let readers: Vec<_> = (0..4)
			.map(|_| {
				let catalog = catalog.clone();
				let stop = stop.clone();
				thread::spawn(move || {
					let mut reads = 0usize;
					while !stop.load(Ordering::Relaxed) || reads == 0 {
						let mapping = catalog.resolve("cities").unwrap();
						let this = mapping.column("this").unwrap();
						match mapping.value_format {
							Format::Varchar => assert_eq!(this.ty, Type::Utf8),
							Format::Int => assert_eq!(this.ty, Type::Int8),
							ref other => panic!("unexpected format {other}"),
						}
						reads += 1;
					}
					reads
				})
			})
			.collect();

		for i in 0..500 {
			let format = if i % 2 == 0 {
				"int"
			} else {
				"varchar"
			};
			catalog.create_mapping(declaration("cities", format), true).unwrap();
		}
		stop.store(true, Ordering::Relaxed);

		for reader in readers {
			assert!(reader.join().unwrap() > 0);
		}
	}
}
