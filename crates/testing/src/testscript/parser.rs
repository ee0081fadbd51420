// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt;

/// A statement line of a script, without its `> ` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
	pub text: String,
	/// 1-based line number in the script.
	pub line: usize,
}

/// Consecutive commands followed by the output they are expected to
/// produce. Blocks are separated by blank lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
	/// Blank and comment lines preceding the block, verbatim.
	pub leading: String,
	pub commands: Vec<Command>,
	/// The statement lines, verbatim.
	pub statements: String,
	pub expected: String,
	pub line: usize,
}

/// A parsed script. Rendering the blocks with their expected output
/// reproduces the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
	pub blocks: Vec<Block>,
	/// Blank and comment lines after the last block.
	pub trailing: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
	pub message: String,
	pub line: usize,
}

impl fmt::Display for ParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "parse error at line {}: {}", self.line, self.message)
	}
}

impl std::error::Error for ParseError {}

pub(crate) fn parse(input: &str) -> Result<Script, ParseError> {
	let mut blocks = Vec::new();
	let mut current: Option<Block> = None;
	let mut pending = String::new();

	for (idx, raw) in input.split_inclusive('\n').enumerate() {
		let line = idx + 1;
		let raw = if raw.ends_with('\n') {
			raw.to_string()
		} else {
			format!("{raw}\n")
		};

		if raw.trim().is_empty() {
			if let Some(block) = current.take() {
				blocks.push(block);
			}
			pending.push_str(&raw);
			continue;
		}

		if current.is_none() && raw.starts_with('#') {
			pending.push_str(&raw);
			continue;
		}

		if let Some(text) = raw.strip_prefix('>') {
			let block = current.get_or_insert_with(|| Block {
				leading: std::mem::take(&mut pending),
				commands: Vec::new(),
				statements: String::new(),
				expected: String::new(),
				line,
			});
			if !block.expected.is_empty() {
				return Err(ParseError {
					message: "statement after expected output; separate blocks with a blank line".to_string(),
					line,
				});
			}
			block.commands.push(Command {
				text: text.trim().to_string(),
				line,
			});
			block.statements.push_str(&raw);
			continue;
		}

		match current.as_mut() {
			Some(block) => block.expected.push_str(&raw),
			None => {
				return Err(ParseError {
					message: format!("expected a '>' statement, found '{}'", raw.trim_end()),
					line,
				});
			}
		}
	}

	if let Some(block) = current.take() {
		blocks.push(block);
	}
	Ok(Script {
		blocks,
		trailing: pending,
	})
}
