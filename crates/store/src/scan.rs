// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::VecDeque, sync::Arc};

use gridkv_codec::EncodedKey;
use gridkv_type::Result;

use crate::{MapValue, PartitionId, PartitionRouter};

/// Lazy walk over the entries of one map.
///
/// The key set is captured when the scan is created; values are fetched in
/// batches while iterating. Keys removed after the snapshot are skipped and
/// keys added after it are not visited. A failed fetch is reported once and
/// ends the scan.
pub struct Scan {
	router: Arc<dyn PartitionRouter>,
	map: String,
	snapshot: Arc<[(PartitionId, EncodedKey)]>,
	batch_size: usize,
	position: usize,
	buffer: VecDeque<(EncodedKey, MapValue)>,
	done: bool,
}

impl Scan {
	pub(crate) fn new(
		router: Arc<dyn PartitionRouter>,
		map: String,
		snapshot: Vec<(PartitionId, EncodedKey)>,
		batch_size: usize,
	) -> Self {
		Self {
			router,
			map,
			snapshot: snapshot.into(),
			batch_size: batch_size.max(1),
			position: 0,
			buffer: VecDeque::new(),
			done: false,
		}
	}

	pub fn map(&self) -> &str {
		&self.map
	}

	/// Number of keys captured at scan start.
	pub fn snapshot_len(&self) -> usize {
		self.snapshot.len()
	}

	/// Starts over on the same key snapshot.
	pub fn restart(&mut self) {
		self.position = 0;
		self.buffer.clear();
		self.done = false;
	}

	fn fill(&mut self) -> Result<()> {
		while self.buffer.is_empty() && self.position < self.snapshot.len() {
			let partition = self.snapshot[self.position].0;
			let end = self.snapshot[self.position..]
				.iter()
				.take(self.batch_size)
				.take_while(|(p, _)| *p == partition)
				.count() + self.position;

			let keys: Vec<EncodedKey> = self.snapshot[self.position..end].iter().map(|(_, k)| k.clone()).collect();
			let values = self.router.get_many(&self.map, partition, &keys)?;
			self.position = end;

			for (key, value) in keys.into_iter().zip(values) {
				if let Some(value) = value {
					self.buffer.push_back((key, value));
				}
			}
		}
		Ok(())
	}
}

impl Iterator for Scan {
	type Item = Result<(EncodedKey, MapValue)>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}
		if let Err(err) = self.fill() {
			self.done = true;
			return Some(Err(err));
		}
		match self.buffer.pop_front() {
			Some(entry) => Some(Ok(entry)),
			None => {
				self.done = true;
				None
			}
		}
	}
}
