// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Line-oriented test scripts.
//!
//! A script is a sequence of blocks separated by blank lines. Each block is
//! one or more statements prefixed with `> `, followed by the output the
//! statements are expected to produce. Lines starting with `#` between
//! blocks are comments.
//!
//! The actual output is written through a golden file, so a mismatch fails
//! with a diff and `UPDATE_GOLDENFILES=1` rewrites the script.
//!
//! ```text
//! # cities
//! > INSERT INTO cities (__key, city) VALUES (1, 'London')
//! count: 1
//!
//! > SELECT __key, city FROM cities
//! __key | city
//! 1 | London
//! ```

mod parser;
mod runner;

pub use parser::{Block, Command, ParseError, Script};
pub use runner::{Runner, generate, run_path};
