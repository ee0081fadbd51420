// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod config;
mod memory;
mod router;
mod scan;
mod store;
mod value;

pub use config::{StoreConfig, defaults};
pub use gridkv_type::{Error, Result};
pub use memory::MemoryRouter;
pub use router::{PartitionId, PartitionRouter};
pub use scan::Scan;
pub use store::MapStore;
pub use value::MapValue;
