// ---------------------------------------------------------------------------
// Dataset files: `{ "reviews": [...], "books": [...] }`, optionally gzipped
// ---------------------------------------------------------------------------
//
// Plain JSON and gzip-compressed JSON are both accepted on read; gzip is
// recognised by its magic bytes, not by the file extension.
// ---------------------------------------------------------------------------

use std::io::Read;
use std::path::Path;

use flate2::read::{GzDecoder, GzEncoder};
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::dataset::{drop_unrated, Dataset};
use crate::error::RecError;
use crate::types::{Book, Review};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetFile {
	pub reviews: Vec<Review>,
	pub books: Vec<Book>,
}

// ---------------------------------------------------------------------------
// Gzip
// ---------------------------------------------------------------------------

pub fn compress(data: &[u8]) -> Result<Vec<u8>, RecError> {
	let mut encoder = GzEncoder::new(data, Compression::new(6));
	let mut compressed = Vec::new();
	encoder.read_to_end(&mut compressed)?;
	Ok(compressed)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>, RecError> {
	let mut decoder = GzDecoder::new(data);
	let mut decompressed = Vec::new();
	decoder.read_to_end(&mut decompressed)?;
	Ok(decompressed)
}

/// Check if data starts with gzip magic bytes (0x1f, 0x8b).
pub fn is_gzipped(data: &[u8]) -> bool {
	data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

// ---------------------------------------------------------------------------
// Read / write
// ---------------------------------------------------------------------------

pub fn read_dataset_file(path: &Path) -> Result<DatasetFile, RecError> {
	let raw = std::fs::read(path)?;
	let bytes = if is_gzipped(&raw) {
		decompress(&raw)?
	} else {
		raw
	};
	serde_json::from_slice(&bytes).map_err(|e| {
		RecError::Serialization(format!("Invalid dataset file {}: {}", path.display(), e))
	})
}

pub fn write_dataset_file(path: &Path, file: &DatasetFile, gzip: bool) -> Result<(), RecError> {
	let json = serde_json::to_vec(file)?;
	let bytes = if gzip { compress(&json)? } else { json };
	std::fs::write(path, bytes)?;
	Ok(())
}

/// Read a dataset file, drop unrated reviews, and join.
pub fn load_dataset_file(path: &Path) -> Result<Dataset, RecError> {
	let file = read_dataset_file(path)?;
	tracing::info!(
		path = %path.display(),
		reviews = file.reviews.len(),
		books = file.books.len(),
		"Read dataset file"
	);
	Dataset::load(&drop_unrated(file.reviews), &file.books)
}
