// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{error::Error, fmt::Write, path::Path};

use gridkv_catalog::Catalog;
use gridkv_engine::Executor;
use gridkv_store::{MapStore, StoreConfig};
use gridkv_testing::{
	fixture,
	testscript::{Command, Runner, run_path},
};
use test_each_file::test_each_path;

test_each_path! { in "crates/engine/tests/scripts" as scripts => run_test }

fn run_test(path: &Path) {
	run_path(&mut TestRunner::new(), path).expect("test failed")
}

/// Runs each statement against a fresh executor per script. Query rows are
/// printed sorted so scripts do not depend on partition order.
pub struct TestRunner {
	executor: Executor,
}

impl TestRunner {
	fn new() -> Self {
		gridkv_testing::tracing::init();
		Self {
			executor: Executor::new(Catalog::new(fixture::registry()), MapStore::new(StoreConfig::default())),
		}
	}
}

impl Runner for TestRunner {
	fn run(&mut self, command: &Command) -> Result<String, Box<dyn Error>> {
		let mut output = String::new();
		let cursor = self.executor.execute(&command.text, ())?;

		if let Some(count) = cursor.update_count() {
			let ddl = command
				.text
				.split_whitespace()
				.next()
				.is_some_and(|word| word.eq_ignore_ascii_case("CREATE") || word.eq_ignore_ascii_case("DROP"));
			if ddl {
				writeln!(output, "ok")?;
			} else {
				writeln!(output, "count: {count}")?;
			}
			return Ok(output);
		}

		writeln!(output, "{}", cursor.columns().join(" | "))?;
		let mut lines = Vec::new();
		for row in cursor {
			let row = row?;
			lines.push(row.values().iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" | "));
		}
		lines.sort();
		for line in lines {
			writeln!(output, "{line}")?;
		}
		Ok(output)
	}
}
