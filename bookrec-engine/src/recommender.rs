// ---------------------------------------------------------------------------
// Recommender: predict() over the current snapshot
// ---------------------------------------------------------------------------
//
// relevance filter -> reviewer threshold -> rating matrix -> correlation ->
// ranking. Every unsatisfiable request (unknown title, too few reviewers,
// seed dropped by the threshold) yields an empty list rather than an error.
// ---------------------------------------------------------------------------

use std::sync::Arc;

use crate::correlation::{build_matrix, correlate};
use crate::dataset::Dataset;
use crate::error::RecError;
use crate::ranker::{rank, DEFAULT_MAX_ENTRIES};
use crate::relevance::{apply_threshold, relevant_reviews, DEFAULT_MIN_REVIEWERS};
use crate::snapshot::SnapshotHandle;
use crate::types::CandidateResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendConfig {
	/// Distinct reviewers a title needs within the relevant subset.
	pub min_reviewers: usize,
	/// Maximum number of recommendations returned.
	pub max_entries: usize,
}

impl Default for RecommendConfig {
	fn default() -> Self {
		Self {
			min_reviewers: DEFAULT_MIN_REVIEWERS,
			max_entries: DEFAULT_MAX_ENTRIES,
		}
	}
}

/// Recommend titles whose ratings correlate with those of `title`.
pub fn predict(dataset: &Dataset, title: &str, config: &RecommendConfig) -> Vec<CandidateResult> {
	let title = title.to_lowercase();
	if !dataset.contains_title(&title) {
		tracing::debug!(title = %title, "No prediction available: unknown title");
		return Vec::new();
	}

	let relevant = relevant_reviews(dataset, &title);
	let filtered = apply_threshold(&relevant, config.min_reviewers);
	if filtered.is_empty() {
		tracing::debug!(title = %title, "No prediction available: no title meets the reviewer threshold");
		return Vec::new();
	}

	let matrix = build_matrix(&filtered);
	let Some(correlations) = correlate(&matrix, &title) else {
		tracing::debug!(title = %title, "No prediction available: seed title below the reviewer threshold");
		return Vec::new();
	};

	let results = rank(&filtered, &correlations, &title, config.max_entries);
	tracing::debug!(
		title = %title,
		candidates = correlations.len(),
		returned = results.len(),
		"Prediction complete"
	);
	results
}

/// Owns the shared snapshot handle and the configured defaults.
pub struct Recommender {
	snapshots: Arc<SnapshotHandle>,
	config: RecommendConfig,
}

impl Recommender {
	pub fn new(snapshots: Arc<SnapshotHandle>, config: RecommendConfig) -> Self {
		Self { snapshots, config }
	}

	pub fn config(&self) -> &RecommendConfig {
		&self.config
	}

	pub fn snapshots(&self) -> &Arc<SnapshotHandle> {
		&self.snapshots
	}

	/// Predict with per-call settings.
	pub fn predict_with(
		&self,
		title: &str,
		config: &RecommendConfig,
	) -> Result<Vec<CandidateResult>, RecError> {
		let snapshot = self.snapshots.current()?;
		Ok(predict(&snapshot.dataset, title, config))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{Book, Review};

	fn users(n: usize) -> Vec<String> {
		(1..=n).map(|i| format!("u{}", i)).collect()
	}

	/// Nine reviewers rate the seed "A" and each of the given candidates.
	/// Each rule maps (reviewer index, seed rating) to the candidate rating.
	fn scenario(candidates: &[(&str, fn(usize, i32) -> i32)]) -> Dataset {
		let mut books = vec![Book::new("isbn-a", "A", "author a")];
		let mut reviews = Vec::new();
		let seed_ratings = [2, 4, 3, 6, 5, 8, 7, 9, 1];
		for (i, user) in users(9).iter().enumerate() {
			reviews.push(Review::new(user.clone(), "isbn-a", seed_ratings[i]));
		}
		for (title, f) in candidates {
			let id = format!("isbn-{}", title);
			books.push(Book::new(id.clone(), *title, "other"));
			for (i, user) in users(9).iter().enumerate() {
				reviews.push(Review::new(user.clone(), id.clone(), f(i, seed_ratings[i])));
			}
		}
		Dataset::load(&reviews, &books).unwrap()
	}

	fn offset(_: usize, a: i32) -> i32 {
		a + 1
	}

	fn inverse(_: usize, a: i32) -> i32 {
		10 - a
	}

	fn constant(_: usize, _: i32) -> i32 {
		5
	}

	fn noisy(i: usize, a: i32) -> i32 {
		if i % 2 == 0 {
			a
		} else {
			(11 - a).min(10)
		}
	}

	fn mostly(i: usize, a: i32) -> i32 {
		if i == 0 {
			9
		} else {
			a
		}
	}

	#[test]
	fn unknown_title_predicts_nothing() {
		let ds = scenario(&[("B", offset)]);
		assert!(predict(&ds, "missing", &RecommendConfig::default()).is_empty());
	}

	#[test]
	fn offset_ratings_correlate_perfectly() {
		let ds = scenario(&[("B", offset)]);
		let results = predict(&ds, "a", &RecommendConfig::default());
		assert_eq!(results.len(), 1);
		assert_eq!(results[0].title, "b");
		assert_eq!(results[0].book_id, "isbn-b");
		assert!((results[0].correlation.unwrap() - 1.0).abs() < 1e-9);
		// u9 rated the seed 1, so B got 2: the smallest reviewer mean
		assert_eq!(results[0].avg_rating, 2.0);
	}

	#[test]
	fn seed_lookup_ignores_case() {
		let ds = scenario(&[("B", offset)]);
		let lower = predict(&ds, "a", &RecommendConfig::default());
		let upper = predict(&ds, "A", &RecommendConfig::default());
		assert_eq!(lower, upper);
		assert!(!lower.is_empty());
	}

	#[test]
	fn sparse_seed_predicts_nothing() {
		let books = vec![Book::new("a", "A", "x"), Book::new("b", "B", "y")];
		let mut reviews = Vec::new();
		for user in users(3) {
			reviews.push(Review::new(user.clone(), "a", 5));
		}
		for user in users(9) {
			reviews.push(Review::new(user, "b", 7));
		}
		let ds = Dataset::load(&reviews, &books).unwrap();
		assert!(predict(&ds, "A", &RecommendConfig::default()).is_empty());
	}

	#[test]
	fn threshold_counts_reviewers_within_relevant_subset() {
		// "B" has eight reviewers overall, but only the two seed reviewers
		// are relevant.
		let books = vec![
			Book::new("a", "A", "x"),
			Book::new("b", "B", "y"),
		];
		let mut reviews = Vec::new();
		for user in users(8).iter().take(2) {
			reviews.push(Review::new(user.clone(), "a", 6));
		}
		for user in users(8) {
			reviews.push(Review::new(user, "b", 6));
		}
		let ds = Dataset::load(&reviews, &books).unwrap();
		// only u1,u2 are relevant, so nothing reaches 8 reviewers
		assert!(predict(&ds, "a", &RecommendConfig::default()).is_empty());
		// with a lower threshold the seed survives
		let relaxed = RecommendConfig {
			min_reviewers: 2,
			..Default::default()
		};
		let results = predict(&ds, "a", &relaxed);
		assert_eq!(results.len(), 1);
		// constant ratings on both sides
		assert_eq!(results[0].correlation, None);
	}

	#[test]
	fn results_sorted_with_undefined_last_and_bounded() {
		let ds = scenario(&[
			("B", offset),
			("C", inverse),
			("D", constant),
			("E", noisy),
			("F", mostly),
		]);
		let results = predict(&ds, "a", &RecommendConfig::default());
		assert_eq!(results.len(), 5);
		let corr: Vec<Option<f64>> = results.iter().map(|r| r.correlation).collect();
		for pair in corr.windows(2) {
			match (pair[0], pair[1]) {
				(Some(x), Some(y)) => assert!(x >= y),
				(None, Some(_)) => panic!("undefined correlation ranked above a defined one"),
				_ => {}
			}
		}
		assert_eq!(results.last().unwrap().title, "d");
		assert_eq!(results.last().unwrap().correlation, None);
	}

	#[test]
	fn max_entries_keeps_the_strongest() {
		let ds = scenario(&[
			("B", offset),
			("C", inverse),
			("D", constant),
			("E", noisy),
			("F", mostly),
		]);
		let config = RecommendConfig {
			max_entries: 2,
			..Default::default()
		};
		let results = predict(&ds, "a", &config);
		let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
		assert_eq!(titles, vec!["b", "f"]);
	}

	#[test]
	fn prediction_is_idempotent() {
		let ds = scenario(&[("B", offset), ("C", inverse), ("E", noisy)]);
		let config = RecommendConfig::default();
		assert_eq!(predict(&ds, "a", &config), predict(&ds, "a", &config));
	}

	#[test]
	fn custom_threshold_is_honoured() {
		let books = vec![Book::new("a", "A", "x"), Book::new("b", "B", "y")];
		let mut reviews = Vec::new();
		for (i, user) in users(4).into_iter().enumerate() {
			reviews.push(Review::new(user.clone(), "a", i as i32 + 2));
			reviews.push(Review::new(user, "b", i as i32 + 5));
		}
		let ds = Dataset::load(&reviews, &books).unwrap();
		assert!(predict(&ds, "a", &RecommendConfig::default()).is_empty());
		let config = RecommendConfig {
			min_reviewers: 4,
			..Default::default()
		};
		let results = predict(&ds, "a", &config);
		assert_eq!(results.len(), 1);
		assert!((results[0].correlation.unwrap() - 1.0).abs() < 1e-9);
	}

	#[test]
	fn recommender_requires_a_loaded_snapshot() {
		let recommender = Recommender::new(Arc::new(SnapshotHandle::new()), RecommendConfig::default());
		let config = *recommender.config();
		assert!(matches!(
			recommender.predict_with("a", &config),
			Err(RecError::NotLoaded)
		));

		recommender.snapshots().replace(scenario(&[("B", offset)]));
		assert_eq!(recommender.predict_with("a", &config).unwrap().len(), 1);
	}
}
