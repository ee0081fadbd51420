// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use uuid::Uuid;

/// Removes the directory when dropped, unwinding included.
struct Cleanup(PathBuf);

impl Drop for Cleanup {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.0);
	}
}

/// Runs `f` with a fresh directory under the system temp dir and removes
/// the directory afterwards, also when `f` panics.
pub fn temp_dir<F>(f: F) -> std::io::Result<()>
where
	F: FnOnce(&Path) -> std::io::Result<()>,
{
	let path = env::temp_dir().join(format!("gridkv-{}", Uuid::new_v4()));
	fs::create_dir(&path)?;
	let cleanup = Cleanup(path);
	f(&cleanup.0)
}
