// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use gridkv_catalog::{Column, ColumnRole, Mapping};
use gridkv_codec::{EncodedKey, TypeRegistry};
use gridkv_sql::ast::{BinaryOp, Expr, TableRef};
use gridkv_store::MapValue;
use gridkv_type::{Error, NotFoundKind, Params, Result, Value};

/// A mapping as it appears in a statement's FROM or JOIN clause.
pub(crate) struct Source {
	pub qualifier: String,
	pub name: String,
	pub mapping: Arc<Mapping>,
}

impl Source {
	pub(crate) fn new(table: &TableRef, mapping: Arc<Mapping>) -> Self {
		Self {
			qualifier: table.qualifier().to_string(),
			name: table.name.clone(),
			mapping,
		}
	}

	fn answers_to(&self, qualifier: &str) -> bool {
		self.qualifier == qualifier || self.name == qualifier
	}
}

/// The decoded `__key` and `this` of one map entry.
pub(crate) struct Entry {
	pub key: Value,
	pub value: Value,
}

#[derive(Debug, Clone)]
pub(crate) enum Operand {
	Column {
		source: usize,
		column: Column,
	},
	Value(Value),
}

/// Column name resolution over the sources of one statement.
pub(crate) struct Scope {
	sources: Vec<Source>,
}

impl Scope {
	pub(crate) fn new(sources: Vec<Source>) -> Self {
		Self {
			sources,
		}
	}

	pub(crate) fn sources(&self) -> &[Source] {
		&self.sources
	}

	pub(crate) fn source(&self, index: usize) -> &Source {
		&self.sources[index]
	}

	pub(crate) fn resolve(&self, expr: &Expr, params: &Params) -> Result<Operand> {
		if let Some(value) = constant(expr, params)? {
			return Ok(Operand::Value(value));
		}
		match expr {
			Expr::Identifier(name) => self.resolve_unqualified(name),
			Expr::QualifiedIdentifier(qualifier, name) => {
				match self.sources.iter().position(|s| s.answers_to(qualifier)) {
					Some(source) => match self.sources[source].mapping.selectable(name) {
						Some(column) => Ok(Operand::Column {
							source,
							column,
						}),
						None => Err(Error::not_found(NotFoundKind::Column, format!("{qualifier}.{name}"))),
					},
					// `__key.field` names a key field column, not a table
					None => self.resolve_unqualified(&format!("{qualifier}.{name}")),
				}
			}
			_ => Err(Error::malformed_statement("expected a column, literal or parameter")),
		}
	}

	fn resolve_unqualified(&self, name: &str) -> Result<Operand> {
		let mut found = None;
		for (source, s) in self.sources.iter().enumerate() {
			if let Some(column) = s.mapping.selectable(name) {
				if found.is_some() {
					return Err(Error::MalformedStatement {
						message: "ambiguous column".to_string(),
						token: name.to_string(),
						position: 0,
					});
				}
				found = Some(Operand::Column {
					source,
					column,
				});
			}
		}
		found.ok_or_else(|| Error::not_found(NotFoundKind::Column, name))
	}

	/// Binds every `a = b` of a conjunction. Anything but equalities joined
	/// with AND is rejected.
	pub(crate) fn predicate<'a>(
		&self,
		exprs: impl IntoIterator<Item = &'a Expr>,
		params: &Params,
	) -> Result<Predicate> {
		let mut equalities = Vec::new();
		for expr in exprs {
			for conjunct in expr.conjuncts() {
				match conjunct {
					Expr::BinaryOp {
						left,
						op: BinaryOp::Eq,
						right,
					} => equalities.push((self.resolve(left, params)?, self.resolve(right, params)?)),
					_ => return Err(Error::malformed_statement("only equality predicates are supported")),
				}
			}
		}
		Ok(Predicate {
			equalities,
		})
	}

	pub(crate) fn decode(&self, registry: &TypeRegistry, source: usize, key: &EncodedKey, value: &MapValue) -> Result<Entry> {
		let mapping = &self.sources[source].mapping;
		Ok(Entry {
			key: mapping.decode_key(registry, key)?,
			value: mapping.decode_value(registry, value)?,
		})
	}

	/// Evaluates `operand` against one entry per source.
	pub(crate) fn eval(&self, operand: &Operand, entries: &[&Entry]) -> Result<Value> {
		match operand {
			Operand::Value(value) => Ok(value.clone()),
			Operand::Column {
				source,
				column,
			} => {
				let entry = entries[*source];
				self.sources[*source].mapping.column_value(column, &entry.key, &entry.value)
			}
		}
	}
}

#[derive(Debug, Default)]
pub(crate) struct Predicate {
	equalities: Vec<(Operand, Operand)>,
}

impl Predicate {
	pub(crate) fn is_empty(&self) -> bool {
		self.equalities.is_empty()
	}

	pub(crate) fn matches(&self, scope: &Scope, entries: &[&Entry]) -> Result<bool> {
		for (left, right) in &self.equalities {
			if !scope.eval(left, entries)?.sql_eq(&scope.eval(right, entries)?) {
				return Ok(false);
			}
		}
		Ok(true)
	}

	/// The constant compared with the whole key of the first source, if any.
	pub(crate) fn point_key(&self) -> Option<&Value> {
		self.equalities.iter().find_map(|pair| match pair {
			(
				Operand::Column {
					source: 0,
					column,
				},
				Operand::Value(value),
			)
			| (
				Operand::Value(value),
				Operand::Column {
					source: 0,
					column,
				},
			) if column.role == ColumnRole::Key => Some(value),
			_ => None,
		})
	}
}

/// The value of a literal or parameter, `None` for column references.
pub(crate) fn constant(expr: &Expr, params: &Params) -> Result<Option<Value>> {
	let value = match expr {
		Expr::IntegerLiteral(n) => i32::try_from(*n).map(Value::Int4).unwrap_or(Value::Int8(*n)),
		Expr::StringLiteral(s) => Value::Utf8(s.clone()),
		Expr::BoolLiteral(b) => Value::Boolean(*b),
		Expr::Null => Value::Undefined,
		Expr::Parameter(index) => match params.get_positional(*index) {
			Some(value) => value.clone(),
			None => {
				return Err(Error::ParameterCountMismatch {
					expected: index + 1,
					actual: params.len(),
				});
			}
		},
		_ => return Ok(None),
	};
	Ok(Some(value))
}

#[cfg(test)]
mod tests {
	use gridkv_catalog::{Catalog, ColumnToCreate, MappingToCreate};
	use gridkv_testing::fixture;
	use gridkv_type::Type;

	use super::*;

	fn mapping(catalog: &Catalog, name: &str, columns: &[(&str, Type)]) -> Arc<Mapping> {
		catalog.create_mapping(
			MappingToCreate {
				name: name.to_string(),
				columns: columns
					.iter()
					.map(|(n, ty)| ColumnToCreate {
						name: n.to_string(),
						ty: *ty,
					})
					.collect(),
				options: [("keyFormat", "int"), ("valueFormat", "json-flat")]
					.iter()
					.map(|(k, v)| (k.to_string(), v.to_string()))
					.collect(),
			},
			false,
		)
		.unwrap()
	}

	fn scope() -> Scope {
		let catalog = Catalog::new(fixture::registry());
		let country = mapping(&catalog, "country", &[("__key", Type::Int4), ("isoCode", Type::Utf8), ("name", Type::Utf8)]);
		let city = mapping(&catalog, "city", &[("__key", Type::Int4), ("country", Type::Utf8), ("name", Type::Utf8)]);
		Scope::new(vec![
			Source::new(
				&TableRef {
					name: "country".into(),
					alias: Some("c1".into()),
				},
				country,
			),
			Source::new(
				&TableRef {
					name: "city".into(),
					alias: None,
				},
				city,
			),
		])
	}

	fn source_of(operand: Operand) -> usize {
		match operand {
			Operand::Column {
				source,
				..
			} => source,
			Operand::Value(_) => panic!("expected column"),
		}
	}

	#[test]
	fn test_unqualified_unique_column() {
		let scope = scope();
		assert_eq!(source_of(scope.resolve(&Expr::Identifier("isoCode".into()), &Params::None).unwrap()), 0);
		assert_eq!(source_of(scope.resolve(&Expr::Identifier("country".into()), &Params::None).unwrap()), 1);
	}

	#[test]
	fn test_ambiguous_column() {
		let err = scope().resolve(&Expr::Identifier("name".into()), &Params::None).unwrap_err();
		assert!(matches!(err, Error::MalformedStatement { ref token, .. } if token == "name"));
	}

	#[test]
	fn test_qualified_by_alias_or_name() {
		let scope = scope();
		let by_alias = Expr::QualifiedIdentifier("c1".into(), "name".into());
		let by_name = Expr::QualifiedIdentifier("city".into(), "name".into());
		assert_eq!(source_of(scope.resolve(&by_alias, &Params::None).unwrap()), 0);
		assert_eq!(source_of(scope.resolve(&by_name, &Params::None).unwrap()), 1);
	}

	#[test]
	fn test_unknown_column() {
		let err = scope().resolve(&Expr::Identifier("population".into()), &Params::None).unwrap_err();
		assert_eq!(err, Error::not_found(NotFoundKind::Column, "population"));
	}

	#[test]
	fn test_parameter_binding() {
		let params = Params::Positional(vec![Value::utf8("TR")]);
		match scope().resolve(&Expr::Parameter(0), &params).unwrap() {
			Operand::Value(value) => assert_eq!(value, Value::utf8("TR")),
			_ => panic!("expected value"),
		}
	}

	#[test]
	fn test_point_key() {
		let scope = scope();
		let expr = Expr::BinaryOp {
			left: Box::new(Expr::IntegerLiteral(7)),
			op: BinaryOp::Eq,
			right: Box::new(Expr::QualifiedIdentifier("c1".into(), "__key".into())),
		};
		let predicate = scope.predicate([&expr], &Params::None).unwrap();
		assert_eq!(predicate.point_key(), Some(&Value::Int4(7)));
	}

	#[test]
	fn test_non_equality_rejected() {
		let err = scope().predicate([&Expr::Identifier("name".into())], &Params::None).unwrap_err();
		assert!(matches!(err, Error::MalformedStatement { .. }));
	}
}
