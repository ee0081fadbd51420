// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_type::Type;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	CreateMapping(CreateMappingStatement),
	DropMapping(DropMappingStatement),
	ShowMappings,
	Insert(InsertStatement),
	Select(SelectStatement),
	Delete(DeleteStatement),
}

/// A statement together with the number of `?` markers it contains.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
	pub statement: Statement,
	pub parameters: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateMappingStatement {
	pub name: String,
	pub replace: bool,
	/// Empty when the column list is omitted.
	pub columns: Vec<ColumnDef>,
	/// The `TYPE` clause as written, e.g. `IMap`.
	pub map_type: String,
	pub options: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
	pub name: String,
	pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropMappingStatement {
	pub name: String,
	pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
	pub mapping: String,
	/// Empty means the mapping's declared column order.
	pub columns: Vec<String>,
	pub rows: Vec<Vec<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
	pub columns: Vec<SelectColumn>,
	pub from: TableRef,
	pub join: Option<JoinClause>,
	pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
	pub mapping: String,
	pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
	AllColumns,
	Expr {
		expr: Expr,
		alias: Option<String>,
	},
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
	pub name: String,
	pub alias: Option<String>,
}

impl TableRef {
	/// The name columns of this table are qualified with.
	pub fn qualifier(&self) -> &str {
		self.alias.as_deref().unwrap_or(&self.name)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
	Inner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
	pub join_type: JoinType,
	pub table: TableRef,
	pub on: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Identifier(String),
	QualifiedIdentifier(String, String),
	IntegerLiteral(i64),
	StringLiteral(String),
	BoolLiteral(bool),
	Null,
	/// Zero-based position of a `?` marker.
	Parameter(usize),
	BinaryOp {
		left: Box<Expr>,
		op: BinaryOp,
		right: Box<Expr>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
	Eq,
	And,
}

impl Expr {
	/// Splits a conjunction into its operands.
	pub fn conjuncts(&self) -> Vec<&Expr> {
		match self {
			Expr::BinaryOp {
				left,
				op: BinaryOp::And,
				right,
			} => {
				let mut result = left.conjuncts();
				result.extend(right.conjuncts());
				result
			}
			other => vec![other],
		}
	}
}
