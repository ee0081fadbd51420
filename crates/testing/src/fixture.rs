// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_codec::{FieldKind, Schema, TypeRegistry};
use gridkv_type::Record;

pub fn city_schema() -> Schema {
	Schema::new(
		"city",
		vec![field("country", FieldKind::Utf8), field("city", FieldKind::Utf8), field("population", FieldKind::Int4)],
	)
	.unwrap()
}

pub fn user_schema() -> Schema {
	Schema::new("user", vec![field("name", FieldKind::Utf8), field("country", FieldKind::Utf8)]).unwrap()
}

/// A registry with the `city` and `user` types.
pub fn registry() -> TypeRegistry {
	TypeRegistry::builder().with(city_schema()).unwrap().with(user_schema()).unwrap().build()
}

pub fn city(country: &str, city: &str, population: i32) -> Record {
	Record::new("city").with("country", country).with("city", city).with("population", population)
}

/// The cities the client examples insert.
pub fn cities() -> Vec<(i32, Record)> {
	vec![
		(1, city("United Kingdom", "London", 9540576)),
		(2, city("United Kingdom", "Manchester", 2770434)),
		(3, city("United States", "New York", 19223191)),
		(4, city("United States", "Los Angeles", 3985520)),
		(5, city("Türkiye", "Istanbul", 15636243)),
		(6, city("Türkiye", "Ankara", 5309690)),
		(7, city("Brazil", "Sao Paulo", 22429800)),
	]
}

fn field(name: &str, kind: FieldKind) -> gridkv_codec::SchemaField {
	gridkv_codec::SchemaField {
		name: name.to_string(),
		kind,
	}
}
