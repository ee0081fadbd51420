// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{error::Error, fmt::Write as _, io::Write as _, path::Path};

use goldenfile::Mint;

use crate::testscript::{Block, Command, parser::parse};

/// Runs script statements, returning their output.
pub trait Runner {
	/// Runs one statement. An error is rendered as `error: <message>` and
	/// compared like any other output.
	fn run(&mut self, command: &Command) -> Result<String, Box<dyn Error>>;

	/// Called once before the first block.
	fn start_script(&mut self) -> Result<(), Box<dyn Error>> {
		Ok(())
	}
}

/// Runs the script at `path`, writing the actual output through a golden
/// file. Panics if it differs from the script. With `UPDATE_GOLDENFILES=1`
/// the script is replaced by the actual output instead.
pub fn run_path<R: Runner, P: AsRef<Path>>(runner: &mut R, path: P) -> std::io::Result<()> {
	let path = path.as_ref();
	let Some(dir) = path.parent() else {
		return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("invalid path '{path:?}'")));
	};
	let Some(filename) = path.file_name() else {
		return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("invalid path '{path:?}'")));
	};

	let input = std::fs::read_to_string(path)?;
	let output = generate(runner, &input)?;

	Mint::new(dir).new_goldenfile(filename)?.write_all(output.as_bytes())
}

/// The script with every block's expected output replaced by the actual one.
pub fn generate<R: Runner>(runner: &mut R, input: &str) -> std::io::Result<String> {
	let script = parse(input).map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;

	runner.start_script().map_err(|err| std::io::Error::other(err.to_string()))?;

	let mut output = String::with_capacity(input.len());
	for block in &script.blocks {
		output.push_str(&block.leading);
		output.push_str(&block.statements);
		output.push_str(&run_block(runner, block));
	}
	output.push_str(&script.trailing);
	Ok(output)
}

fn run_block<R: Runner>(runner: &mut R, block: &Block) -> String {
	let mut output = String::new();
	for command in &block.commands {
		match runner.run(command) {
			Ok(out) => output.push_str(&out),
			Err(err) => {
				let _ = writeln!(output, "error: {err}");
			}
		}
	}
	output
}
