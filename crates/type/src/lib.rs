// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod error;
pub mod params;
pub mod value;

pub use error::{Error, NotFoundKind};
pub use params::Params;
pub use value::{IntoValue, JsonObject, Record, Type, Value};

pub type Result<T> = std::result::Result<T, Error>;
