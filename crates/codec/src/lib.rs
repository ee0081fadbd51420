// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Compact record codec.
//!
//! An encoded record is a header (schema fingerprint and field count), a
//! field index of `(name, tag, offset, length)` entries, and the data
//! section. The index allows single fields to be read without decoding the
//! rest of the record, and lets decoders skip fields they do not know.

mod fingerprint;
mod key;
mod reader;
mod registry;
mod scalar;
mod schema;
mod serializer;
mod writer;

pub use fingerprint::Fingerprint;
pub use gridkv_type::{Error, Result};
pub use key::{EncodedKey, KeyPayload};
pub use reader::{CompactReader, decode};
pub use registry::{TypeRegistry, TypeRegistryBuilder};
pub use scalar::{decode_scalar, encode_scalar};
pub use schema::{FieldKind, FieldTag, Schema, SchemaBuilder, SchemaField};
pub use serializer::CompactSerializer;
pub use writer::{CompactWriter, encode};
