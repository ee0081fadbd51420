// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! A partitioned key-value map client with compact serialization and a
//! small embedded SQL layer.
//!
//! ```ignore
//! use gridkv::{Client, ClientConfig, params};
//!
//! let client = Client::new(ClientConfig::default(), registry);
//! client.sql().execute("CREATE MAPPING cities ...", ())?;
//! let rows = client.sql().execute("SELECT __key, this FROM cities WHERE __key = ?", params![1])?;
//! ```

mod client;
mod config;
mod map;

pub use client::{Client, ClientInner};
pub use config::{ClientConfig, defaults};
pub use gridkv_catalog as catalog;
pub use gridkv_codec as codec;
pub use gridkv_codec::{CompactReader, CompactSerializer, CompactWriter, FieldKind, Schema, TypeRegistry};
pub use gridkv_engine as engine;
pub use gridkv_engine::{Executor, Row, RowCursor};
pub use gridkv_sql as sql;
pub use gridkv_store as store;
pub use gridkv_store::{MapValue, PartitionRouter, Scan, StoreConfig};
pub use gridkv_type::{Error, IntoValue, JsonObject, Params, Record, Result, Type, Value, params};
pub use map::MapHandle;
