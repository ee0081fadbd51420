// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use crate::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub kind: TokenKind,
	/// Byte offset of the first character in the statement text.
	pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
	// Keywords
	Keyword(Keyword),
	// Identifiers
	Ident(String),
	QuotedIdent(String),
	// Literals
	/// Magnitude only; a leading `-` is a separate token.
	Integer(u64),
	StringLit(String),
	// Operators & punctuation
	Asterisk,   // *
	Comma,      // ,
	Dot,        // .
	Semicolon,  // ;
	OpenParen,  // (
	CloseParen, // )
	Minus,      // -
	Eq,         // =
	Question,   // ?
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
	And,
	As,
	Create,
	Delete,
	Drop,
	Exists,
	False,
	From,
	If,
	Inner,
	Insert,
	Into,
	Join,
	Mapping,
	Mappings,
	Null,
	On,
	Options,
	Or,
	Replace,
	Select,
	Show,
	True,
	Type,
	Values,
	Where,
}

impl Keyword {
	fn from_word(upper: &str) -> Option<Keyword> {
		let keyword = match upper {
			"AND" => Keyword::And,
			"AS" => Keyword::As,
			"CREATE" => Keyword::Create,
			"DELETE" => Keyword::Delete,
			"DROP" => Keyword::Drop,
			"EXISTS" => Keyword::Exists,
			"FALSE" => Keyword::False,
			"FROM" => Keyword::From,
			"IF" => Keyword::If,
			"INNER" => Keyword::Inner,
			"INSERT" => Keyword::Insert,
			"INTO" => Keyword::Into,
			"JOIN" => Keyword::Join,
			"MAPPING" => Keyword::Mapping,
			"MAPPINGS" => Keyword::Mappings,
			"NULL" => Keyword::Null,
			"ON" => Keyword::On,
			"OPTIONS" => Keyword::Options,
			"OR" => Keyword::Or,
			"REPLACE" => Keyword::Replace,
			"SELECT" => Keyword::Select,
			"SHOW" => Keyword::Show,
			"TRUE" => Keyword::True,
			"TYPE" => Keyword::Type,
			"VALUES" => Keyword::Values,
			"WHERE" => Keyword::Where,
			_ => return None,
		};
		Some(keyword)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Keyword::And => "AND",
			Keyword::As => "AS",
			Keyword::Create => "CREATE",
			Keyword::Delete => "DELETE",
			Keyword::Drop => "DROP",
			Keyword::Exists => "EXISTS",
			Keyword::False => "FALSE",
			Keyword::From => "FROM",
			Keyword::If => "IF",
			Keyword::Inner => "INNER",
			Keyword::Insert => "INSERT",
			Keyword::Into => "INTO",
			Keyword::Join => "JOIN",
			Keyword::Mapping => "MAPPING",
			Keyword::Mappings => "MAPPINGS",
			Keyword::Null => "NULL",
			Keyword::On => "ON",
			Keyword::Options => "OPTIONS",
			Keyword::Or => "OR",
			Keyword::Replace => "REPLACE",
			Keyword::Select => "SELECT",
			Keyword::Show => "SHOW",
			Keyword::True => "TRUE",
			Keyword::Type => "TYPE",
			Keyword::Values => "VALUES",
			Keyword::Where => "WHERE",
		}
	}
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			TokenKind::Keyword(keyword) => f.write_str(keyword.as_str()),
			TokenKind::Ident(name) => f.write_str(name),
			TokenKind::QuotedIdent(name) => write!(f, "\"{name}\""),
			TokenKind::Integer(n) => write!(f, "{n}"),
			TokenKind::StringLit(s) => write!(f, "'{}'", s.replace('\'', "''")),
			TokenKind::Asterisk => f.write_str("*"),
			TokenKind::Comma => f.write_str(","),
			TokenKind::Dot => f.write_str("."),
			TokenKind::Semicolon => f.write_str(";"),
			TokenKind::OpenParen => f.write_str("("),
			TokenKind::CloseParen => f.write_str(")"),
			TokenKind::Minus => f.write_str("-"),
			TokenKind::Eq => f.write_str("="),
			TokenKind::Question => f.write_str("?"),
		}
	}
}

pub fn tokenize(sql: &str) -> Result<Vec<Token>, ParseError> {
	let mut tokens = Vec::new();
	let mut chars = sql.char_indices().peekable();

	while let Some(&(position, c)) = chars.peek() {
		// Skip whitespace
		if c.is_whitespace() {
			chars.next();
			continue;
		}

		// Skip line comments (-- ...)
		if c == '-' && sql[position..].starts_with("--") {
			while let Some(&(_, c)) = chars.peek() {
				if c == '\n' {
					break;
				}
				chars.next();
			}
			continue;
		}

		let punctuation = match c {
			'*' => Some(TokenKind::Asterisk),
			',' => Some(TokenKind::Comma),
			'.' => Some(TokenKind::Dot),
			';' => Some(TokenKind::Semicolon),
			'(' => Some(TokenKind::OpenParen),
			')' => Some(TokenKind::CloseParen),
			'-' => Some(TokenKind::Minus),
			'=' => Some(TokenKind::Eq),
			'?' => Some(TokenKind::Question),
			_ => None,
		};
		if let Some(kind) = punctuation {
			chars.next();
			tokens.push(Token {
				kind,
				position,
			});
			continue;
		}

		// String literals and quoted identifiers
		if c == '\'' || c == '"' {
			chars.next();
			let mut s = String::new();
			let mut closed = false;
			while let Some((_, ch)) = chars.next() {
				if ch == c {
					// a doubled quote is an escaped quote
					if chars.peek().is_some_and(|&(_, next)| next == c) {
						s.push(c);
						chars.next();
						continue;
					}
					closed = true;
					break;
				}
				s.push(ch);
			}
			if !closed {
				let what = if c == '\'' {
					"unterminated string literal"
				} else {
					"unterminated quoted identifier"
				};
				return Err(ParseError::new(what, &sql[position..], position));
			}
			let kind = if c == '\'' {
				TokenKind::StringLit(s)
			} else {
				TokenKind::QuotedIdent(s)
			};
			tokens.push(Token {
				kind,
				position,
			});
			continue;
		}

		// Integer literals
		if c.is_ascii_digit() {
			let mut end = position;
			while let Some(&(idx, ch)) = chars.peek() {
				if !ch.is_ascii_digit() {
					break;
				}
				end = idx + ch.len_utf8();
				chars.next();
			}
			let text = &sql[position..end];
			let n: u64 = text
				.parse()
				.map_err(|_| ParseError::new("integer literal out of range", text, position))?;
			tokens.push(Token {
				kind: TokenKind::Integer(n),
				position,
			});
			continue;
		}

		// Identifiers and keywords
		if c.is_alphabetic() || c == '_' {
			let mut end = position;
			while let Some(&(idx, ch)) = chars.peek() {
				if !(ch.is_alphanumeric() || ch == '_') {
					break;
				}
				end = idx + ch.len_utf8();
				chars.next();
			}
			let word = &sql[position..end];
			let kind = match Keyword::from_word(&word.to_ascii_uppercase()) {
				Some(keyword) => TokenKind::Keyword(keyword),
				None => TokenKind::Ident(word.to_string()),
			};
			tokens.push(Token {
				kind,
				position,
			});
			continue;
		}

		return Err(ParseError::new("unexpected character", c.to_string(), position));
	}

	Ok(tokens)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kinds(sql: &str) -> Vec<TokenKind> {
		tokenize(sql).unwrap().into_iter().map(|t| t.kind).collect()
	}

	#[test]
	fn test_simple_select() {
		assert_eq!(
			kinds("SELECT __key, this FROM cities"),
			vec![
				TokenKind::Keyword(Keyword::Select),
				TokenKind::Ident("__key".into()),
				TokenKind::Comma,
				TokenKind::Ident("this".into()),
				TokenKind::Keyword(Keyword::From),
				TokenKind::Ident("cities".into()),
			]
		);
	}

	#[test]
	fn test_keywords_are_case_insensitive() {
		assert_eq!(
			kinds("select From wHeRe"),
			vec![
				TokenKind::Keyword(Keyword::Select),
				TokenKind::Keyword(Keyword::From),
				TokenKind::Keyword(Keyword::Where),
			]
		);
	}

	#[test]
	fn test_identifiers_keep_case() {
		assert_eq!(kinds("isoCode"), vec![TokenKind::Ident("isoCode".into())]);
	}

	#[test]
	fn test_string_literal_escape() {
		assert_eq!(kinds("'it''s'"), vec![TokenKind::StringLit("it's".into())]);
	}

	#[test]
	fn test_quoted_identifier() {
		assert_eq!(kinds("\"select\""), vec![TokenKind::QuotedIdent("select".into())]);
	}

	#[test]
	fn test_line_comment() {
		assert_eq!(
			kinds("SELECT -- everything\n*"),
			vec![TokenKind::Keyword(Keyword::Select), TokenKind::Asterisk]
		);
	}

	#[test]
	fn test_parameter_marker_and_positions() {
		let tokens = tokenize("a = ?").unwrap();
		assert_eq!(tokens[1].kind, TokenKind::Eq);
		assert_eq!(tokens[1].position, 2);
		assert_eq!(tokens[2].kind, TokenKind::Question);
		assert_eq!(tokens[2].position, 4);
	}

	#[test]
	fn test_positions_are_byte_offsets() {
		let tokens = tokenize("'Türkiye' x").unwrap();
		assert_eq!(tokens[1].position, 11);
	}

	#[test]
	fn test_unterminated_string() {
		let err = tokenize("SELECT 'abc").unwrap_err();
		assert_eq!(err.position, 7);
		assert_eq!(err.message, "unterminated string literal");
	}

	#[test]
	fn test_unexpected_character() {
		let err = tokenize("SELECT a < b").unwrap_err();
		assert_eq!(err.token, "<");
		assert_eq!(err.position, 9);
	}

	#[test]
	fn test_integer_overflow() {
		assert!(tokenize("99999999999999999999").is_err());
	}
}
