// ---------------------------------------------------------------------------
// SnapshotHandle: shared, atomically replaceable dataset
// ---------------------------------------------------------------------------
//
// Readers clone the current `Arc` and drop the lock straight away, so a
// prediction keeps working on the snapshot it started with even if a reload
// lands halfway through. A reload builds the new dataset outside the lock and
// only swaps the pointer under it.
// ---------------------------------------------------------------------------

use std::sync::{Arc, PoisonError, RwLock};

use crate::dataset::Dataset;
use crate::error::RecError;

/// An immutable dataset tagged with the reload that produced it.
pub struct Snapshot {
	pub generation: u64,
	pub dataset: Dataset,
}

#[derive(Default)]
pub struct SnapshotHandle {
	current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotHandle {
	pub fn new() -> Self {
		Self::default()
	}

	/// Handle that starts out serving `dataset`.
	pub fn with_dataset(dataset: Dataset) -> Self {
		let handle = Self::new();
		handle.replace(dataset);
		handle
	}

	/// The snapshot in effect right now.
	pub fn current(&self) -> Result<Arc<Snapshot>, RecError> {
		let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
		let snapshot = guard.as_ref().map(Arc::clone);
		snapshot.ok_or(RecError::NotLoaded)
	}

	pub fn is_loaded(&self) -> bool {
		self.current
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.is_some()
	}

	/// Install `dataset` as the new snapshot and return it. The previous
	/// snapshot stays alive until its last reader drops it.
	pub fn replace(&self, dataset: Dataset) -> Arc<Snapshot> {
		let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
		let generation = guard.as_ref().map_or(1, |s| s.generation + 1);
		let snapshot = Arc::new(Snapshot {
			generation,
			dataset,
		});
		*guard = Some(Arc::clone(&snapshot));
		drop(guard);

		tracing::info!(
			generation,
			records = snapshot.dataset.len(),
			"Dataset snapshot installed"
		);
		snapshot
	}
}
