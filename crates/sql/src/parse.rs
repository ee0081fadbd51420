// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use gridkv_type::Type;
use indexmap::IndexMap;

use crate::{
	ParseError,
	ast::*,
	token::{Keyword, Token, TokenKind, tokenize},
};

pub fn parse(sql: &str) -> Result<Parsed, ParseError> {
	let tokens = tokenize(sql)?;
	let mut parser = Parser {
		tokens,
		pos: 0,
		parameters: 0,
		end: sql.len(),
	};
	let statement = parser.parse_statement()?;
	parser.skip(&TokenKind::Semicolon);
	if let Some(token) = parser.peek() {
		return Err(parser.error_at(token, "unexpected token after end of statement"));
	}
	Ok(Parsed {
		statement,
		parameters: parser.parameters,
	})
}

struct Parser {
	tokens: Vec<Token>,
	pos: usize,
	parameters: usize,
	end: usize,
}

impl Parser {
	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.pos)
	}

	fn peek_kind(&self) -> Option<&TokenKind> {
		self.peek().map(|t| &t.kind)
	}

	fn advance(&mut self) -> Option<Token> {
		let token = self.tokens.get(self.pos).cloned();
		if token.is_some() {
			self.pos += 1;
		}
		token
	}

	fn error_at(&self, token: &Token, message: impl Into<String>) -> ParseError {
		ParseError::new(message, token.kind.to_string(), token.position)
	}

	/// An error pointing at the current token, or at the end of input.
	fn error(&self, message: impl Into<String>) -> ParseError {
		match self.peek() {
			Some(token) => self.error_at(token, message),
			None => ParseError::new(message, "", self.end),
		}
	}

	fn is_keyword(&self, keyword: Keyword) -> bool {
		matches!(self.peek_kind(), Some(TokenKind::Keyword(k)) if *k == keyword)
	}

	fn skip_keyword(&mut self, keyword: Keyword) -> bool {
		if self.is_keyword(keyword) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
		if self.skip_keyword(keyword) {
			Ok(())
		} else {
			Err(self.error(format!("expected {}", keyword.as_str())))
		}
	}

	fn skip(&mut self, kind: &TokenKind) -> bool {
		if self.peek_kind() == Some(kind) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
		if self.skip(&kind) {
			Ok(())
		} else {
			Err(self.error(format!("expected '{kind}'")))
		}
	}

	fn parse_identifier(&mut self) -> Result<String, ParseError> {
		match self.peek_kind() {
			Some(TokenKind::Ident(name)) | Some(TokenKind::QuotedIdent(name)) => {
				let name = name.clone();
				self.pos += 1;
				Ok(name)
			}
			_ => Err(self.error("expected identifier")),
		}
	}

	/// A column name as written in DDL and INSERT lists. Dotted names such
	/// as `__key.isoCode` are joined.
	fn parse_column_name(&mut self) -> Result<String, ParseError> {
		let mut name = self.parse_identifier()?;
		while self.skip(&TokenKind::Dot) {
			name.push('.');
			name.push_str(&self.parse_identifier()?);
		}
		Ok(name)
	}

	fn parse_string(&mut self) -> Result<String, ParseError> {
		match self.peek_kind() {
			Some(TokenKind::StringLit(s)) => {
				let s = s.clone();
				self.pos += 1;
				Ok(s)
			}
			_ => Err(self.error("expected string literal")),
		}
	}

	fn parse_comma_list<T>(
		&mut self,
		mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
	) -> Result<Vec<T>, ParseError> {
		let mut items = vec![item(self)?];
		while self.skip(&TokenKind::Comma) {
			items.push(item(self)?);
		}
		Ok(items)
	}

	fn parse_statement(&mut self) -> Result<Statement, ParseError> {
		match self.peek_kind() {
			Some(TokenKind::Keyword(Keyword::Create)) => self.parse_create_mapping(),
			Some(TokenKind::Keyword(Keyword::Drop)) => self.parse_drop_mapping(),
			Some(TokenKind::Keyword(Keyword::Show)) => {
				self.pos += 1;
				self.expect_keyword(Keyword::Mappings)?;
				Ok(Statement::ShowMappings)
			}
			Some(TokenKind::Keyword(Keyword::Insert)) => self.parse_insert(),
			Some(TokenKind::Keyword(Keyword::Select)) => self.parse_select(),
			Some(TokenKind::Keyword(Keyword::Delete)) => self.parse_delete(),
			_ => Err(self.error("expected CREATE, DROP, SHOW, INSERT, SELECT or DELETE")),
		}
	}

	fn parse_create_mapping(&mut self) -> Result<Statement, ParseError> {
		self.expect_keyword(Keyword::Create)?;
		let replace = if self.skip_keyword(Keyword::Or) {
			self.expect_keyword(Keyword::Replace)?;
			true
		} else {
			false
		};
		self.expect_keyword(Keyword::Mapping)?;
		let name = self.parse_identifier()?;

		let columns = if self.skip(&TokenKind::OpenParen) {
			let columns = self.parse_comma_list(|p| p.parse_column_def())?;
			self.expect(TokenKind::CloseParen)?;
			columns
		} else {
			Vec::new()
		};

		self.expect_keyword(Keyword::Type)?;
		let map_type = self.parse_identifier()?;

		let mut options = IndexMap::new();
		if self.skip_keyword(Keyword::Options) {
			self.expect(TokenKind::OpenParen)?;
			for (key, value) in self.parse_comma_list(|p| {
				let key = p.parse_string()?;
				p.expect(TokenKind::Eq)?;
				let value = p.parse_string()?;
				Ok((key, value))
			})? {
				options.insert(key, value);
			}
			self.expect(TokenKind::CloseParen)?;
		}

		Ok(Statement::CreateMapping(CreateMappingStatement {
			name,
			replace,
			columns,
			map_type,
			options,
		}))
	}

	fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
		let name = self.parse_column_name()?;
		let ty = match self.peek() {
			Some(Token {
				kind: TokenKind::Ident(ty),
				..
			}) => match Type::from_sql(ty) {
				Some(ty) => ty,
				None => return Err(self.error("unknown column type")),
			},
			_ => return Err(self.error("expected column type")),
		};
		self.pos += 1;
		Ok(ColumnDef {
			name,
			ty,
		})
	}

	fn parse_drop_mapping(&mut self) -> Result<Statement, ParseError> {
		self.expect_keyword(Keyword::Drop)?;
		self.expect_keyword(Keyword::Mapping)?;
		let if_exists = if self.skip_keyword(Keyword::If) {
			self.expect_keyword(Keyword::Exists)?;
			true
		} else {
			false
		};
		let name = self.parse_identifier()?;
		Ok(Statement::DropMapping(DropMappingStatement {
			name,
			if_exists,
		}))
	}

	fn parse_insert(&mut self) -> Result<Statement, ParseError> {
		self.expect_keyword(Keyword::Insert)?;
		self.expect_keyword(Keyword::Into)?;
		let mapping = self.parse_identifier()?;

		let columns = if self.skip(&TokenKind::OpenParen) {
			let columns = self.parse_comma_list(|p| p.parse_column_name())?;
			self.expect(TokenKind::CloseParen)?;
			columns
		} else {
			Vec::new()
		};

		self.expect_keyword(Keyword::Values)?;
		let rows = self.parse_comma_list(|p| {
			p.expect(TokenKind::OpenParen)?;
			let values = p.parse_comma_list(|p| p.parse_expr())?;
			p.expect(TokenKind::CloseParen)?;
			Ok(values)
		})?;

		Ok(Statement::Insert(InsertStatement {
			mapping,
			columns,
			rows,
		}))
	}

	fn parse_select(&mut self) -> Result<Statement, ParseError> {
		self.expect_keyword(Keyword::Select)?;
		let columns = self.parse_comma_list(|p| p.parse_select_column())?;

		self.expect_keyword(Keyword::From)?;
		let from = self.parse_table_ref()?;

		let join = if self.is_keyword(Keyword::Inner) || self.is_keyword(Keyword::Join) {
			self.skip_keyword(Keyword::Inner);
			self.expect_keyword(Keyword::Join)?;
			let table = self.parse_table_ref()?;
			self.expect_keyword(Keyword::On)?;
			let on = self.parse_expr()?;
			Some(JoinClause {
				join_type: JoinType::Inner,
				table,
				on,
			})
		} else {
			None
		};

		let where_clause = self.parse_where()?;

		Ok(Statement::Select(SelectStatement {
			columns,
			from,
			join,
			where_clause,
		}))
	}

	fn parse_select_column(&mut self) -> Result<SelectColumn, ParseError> {
		if self.skip(&TokenKind::Asterisk) {
			return Ok(SelectColumn::AllColumns);
		}
		let expr = self.parse_expr()?;
		let alias = if self.skip_keyword(Keyword::As) {
			Some(self.parse_identifier()?)
		} else if matches!(self.peek_kind(), Some(TokenKind::Ident(_)) | Some(TokenKind::QuotedIdent(_))) {
			Some(self.parse_identifier()?)
		} else {
			None
		};
		Ok(SelectColumn::Expr {
			expr,
			alias,
		})
	}

	fn parse_table_ref(&mut self) -> Result<TableRef, ParseError> {
		let name = self.parse_identifier()?;
		let alias = if self.skip_keyword(Keyword::As) {
			Some(self.parse_identifier()?)
		} else if matches!(self.peek_kind(), Some(TokenKind::Ident(_)) | Some(TokenKind::QuotedIdent(_))) {
			Some(self.parse_identifier()?)
		} else {
			None
		};
		Ok(TableRef {
			name,
			alias,
		})
	}

	fn parse_delete(&mut self) -> Result<Statement, ParseError> {
		self.expect_keyword(Keyword::Delete)?;
		self.expect_keyword(Keyword::From)?;
		let mapping = self.parse_identifier()?;
		let where_clause = self.parse_where()?;
		Ok(Statement::Delete(DeleteStatement {
			mapping,
			where_clause,
		}))
	}

	fn parse_where(&mut self) -> Result<Option<Expr>, ParseError> {
		if self.skip_keyword(Keyword::Where) {
			Ok(Some(self.parse_expr()?))
		} else {
			Ok(None)
		}
	}

	fn parse_expr(&mut self) -> Result<Expr, ParseError> {
		let mut left = self.parse_comparison()?;
		while self.skip_keyword(Keyword::And) {
			let right = self.parse_comparison()?;
			left = Expr::BinaryOp {
				left: Box::new(left),
				op: BinaryOp::And,
				right: Box::new(right),
			};
		}
		Ok(left)
	}

	fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
		let left = self.parse_primary()?;
		if self.skip(&TokenKind::Eq) {
			let right = self.parse_primary()?;
			return Ok(Expr::BinaryOp {
				left: Box::new(left),
				op: BinaryOp::Eq,
				right: Box::new(right),
			});
		}
		Ok(left)
	}

	fn parse_primary(&mut self) -> Result<Expr, ParseError> {
		let Some(Token {
			kind,
			position,
		}) = self.advance()
		else {
			return Err(self.error("expected expression"));
		};
		let expr = match kind {
			TokenKind::Ident(name) | TokenKind::QuotedIdent(name) => {
				if self.skip(&TokenKind::Dot) {
					let column = self.parse_column_name()?;
					Expr::QualifiedIdentifier(name, column)
				} else {
					Expr::Identifier(name)
				}
			}
			TokenKind::Integer(n) => match i64::try_from(n) {
				Ok(n) => Expr::IntegerLiteral(n),
				Err(_) => return Err(ParseError::new("integer literal out of range", n.to_string(), position)),
			},
			TokenKind::Minus => match self.advance() {
				Some(Token {
					kind: TokenKind::Integer(n),
					position,
				}) => match 0i64.checked_sub_unsigned(n) {
					Some(n) => Expr::IntegerLiteral(n),
					None => {
						return Err(ParseError::new(
							"integer literal out of range",
							format!("-{n}"),
							position,
						));
					}
				},
				_ => return Err(ParseError::new("expected integer after '-'", "-", position)),
			},
			TokenKind::StringLit(s) => Expr::StringLiteral(s),
			TokenKind::Keyword(Keyword::True) => Expr::BoolLiteral(true),
			TokenKind::Keyword(Keyword::False) => Expr::BoolLiteral(false),
			TokenKind::Keyword(Keyword::Null) => Expr::Null,
			TokenKind::Question => {
				let index = self.parameters;
				self.parameters += 1;
				Expr::Parameter(index)
			}
			TokenKind::OpenParen => {
				let expr = self.parse_expr()?;
				self.expect(TokenKind::CloseParen)?;
				expr
			}
			other => return Err(ParseError::new("expected expression", other.to_string(), position)),
		};
		Ok(expr)
	}
}
