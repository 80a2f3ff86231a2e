// ---------------------------------------------------------------------------
// BookrecServer: JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes incoming JSON-RPC 2.0 requests (NDJSON over stdin) to the dataset
// snapshot and the recommender: a main `run()` loop, a `dispatch()` match,
// and free-standing handler functions for each method.
// ---------------------------------------------------------------------------

use std::io::{self, BufRead};
use std::path::PathBuf;

use serde::Deserialize;

use crate::dataset::{drop_unrated, Dataset};
use crate::dataset_file::load_dataset_file;
use crate::error::RecError;
use crate::protocol::{JsonRpcRequest, RpcFailure};
use crate::recommender::{RecommendConfig, Recommender};
use crate::snapshot::Snapshot;
use crate::transport::NdjsonTransport;
use crate::types::{Book, Review};

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// JSON-RPC server that answers requests from a [`Recommender`].
pub struct BookrecServer {
	transport: NdjsonTransport,
	recommender: Recommender,
}

impl BookrecServer {
	pub fn new(transport: NdjsonTransport, recommender: Recommender) -> Self {
		Self {
			transport,
			recommender,
		}
	}

	/// Main loop: read JSON-RPC messages from stdin, dispatch to handlers.
	///
	/// A line that is not valid UTF-8 or not a request gets a parse error
	/// reply with id 0; the loop only stops at end of input or on a read
	/// failure.
	pub fn run(&mut self) -> Result<(), RecError> {
		let stdin = io::stdin();
		let reader = stdin.lock();

		for chunk in reader.split(b'\n') {
			let bytes = chunk?;
			let line = match std::str::from_utf8(&bytes) {
				Ok(line) => line,
				Err(e) => {
					tracing::warn!("Request is not valid UTF-8: {}", e);
					self.transport
						.write_failure(0, &RpcFailure::Parse("invalid UTF-8".into()));
					continue;
				}
			};
			if line.trim().is_empty() {
				continue;
			}

			let request: JsonRpcRequest = match serde_json::from_str(line) {
				Ok(r) => r,
				Err(e) => {
					tracing::warn!("Failed to parse request: {}", e);
					self.transport
						.write_failure(0, &RpcFailure::Parse("invalid JSON".into()));
					continue;
				}
			};

			self.dispatch(request);
		}

		Ok(())
	}

	// ── Dispatch ──────────────────────────────────────────────────────────

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		match self.route(&req.method, req.params) {
			Ok(value) => self.transport.write_response(id, value),
			Err(failure) => {
				if let RpcFailure::Engine(e) = &failure {
					tracing::warn!(method = %req.method, code = e.code(), "Request failed: {}", e);
				}
				self.transport.write_failure(id, &failure);
			}
		}
	}

	fn route(
		&self,
		method: &str,
		params: serde_json::Value,
	) -> Result<serde_json::Value, RpcFailure> {
		let result = match method {
			// -- Dataset -------------------------------------------------
			"dataset/load" => handle_load(&self.recommender, params),
			"dataset/loadFile" => handle_load_file(&self.recommender, params),
			"dataset/stats" => self
				.recommender
				.snapshots()
				.current()
				.map(|s| snapshot_summary(&s)),

			// -- Recommendation ------------------------------------------
			"recommend/predict" => handle_predict(&self.recommender, params),

			// -- Catalog -------------------------------------------------
			"catalog/books" => handle_catalog_books(&self.recommender, params),
			"catalog/bookStats" => handle_book_stats(&self.recommender, params),

			// -- Unknown -------------------------------------------------
			_ => return Err(RpcFailure::MethodNotFound(method.to_string())),
		};
		result.map_err(RpcFailure::from)
	}
}

// ---------------------------------------------------------------------------
// Param types
// ---------------------------------------------------------------------------

fn parse_params<T: serde::de::DeserializeOwned>(params: serde_json::Value) -> Result<T, RecError> {
	serde_json::from_value(params)
		.map_err(|e| RecError::Serialization(format!("Invalid params: {}", e)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadParams {
	reviews: Vec<Review>,
	books: Vec<Book>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadFileParams {
	path: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictParams {
	title: String,
	max_entries: Option<usize>,
	min_reviewers: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookIdsParams {
	ids: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookIdParams {
	id: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn snapshot_summary(snapshot: &Snapshot) -> serde_json::Value {
	serde_json::json!({
		"generation": snapshot.generation,
		"stats": snapshot.dataset.stats(),
	})
}

fn handle_load(
	recommender: &Recommender,
	params: serde_json::Value,
) -> Result<serde_json::Value, RecError> {
	let p: LoadParams = parse_params(params)?;
	let dataset = Dataset::load(&drop_unrated(p.reviews), &p.books)?;
	let snapshot = recommender.snapshots().replace(dataset);
	Ok(snapshot_summary(&snapshot))
}

fn handle_load_file(
	recommender: &Recommender,
	params: serde_json::Value,
) -> Result<serde_json::Value, RecError> {
	let p: LoadFileParams = parse_params(params)?;
	let dataset = load_dataset_file(&p.path)?;
	let snapshot = recommender.snapshots().replace(dataset);
	Ok(snapshot_summary(&snapshot))
}

fn handle_predict(
	recommender: &Recommender,
	params: serde_json::Value,
) -> Result<serde_json::Value, RecError> {
	let p: PredictParams = parse_params(params)?;
	let defaults = recommender.config();
	let config = RecommendConfig {
		min_reviewers: p.min_reviewers.unwrap_or(defaults.min_reviewers),
		max_entries: p.max_entries.unwrap_or(defaults.max_entries),
	};
	let recommendations = recommender.predict_with(&p.title, &config)?;
	Ok(serde_json::json!({ "recommendations": recommendations }))
}

fn handle_catalog_books(
	recommender: &Recommender,
	params: serde_json::Value,
) -> Result<serde_json::Value, RecError> {
	let p: BookIdsParams = parse_params(params)?;
	let snapshot = recommender.snapshots().current()?;
	let books = snapshot.dataset.books(&p.ids);
	Ok(serde_json::json!({ "books": books }))
}

fn handle_book_stats(
	recommender: &Recommender,
	params: serde_json::Value,
) -> Result<serde_json::Value, RecError> {
	let p: BookIdParams = parse_params(params)?;
	let snapshot = recommender.snapshots().current()?;
	let stats = snapshot.dataset.book_stats(&p.id)?;
	Ok(serde_json::to_value(stats)?)
}
