// ---------------------------------------------------------------------------
// Relevance filter: which rows take part in a prediction
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use crate::dataset::Dataset;
use crate::types::JoinedRecord;

/// Minimum number of distinct reviewers a title needs to be correlated.
pub const DEFAULT_MIN_REVIEWERS: usize = 8;

/// Every row written by a reviewer of the seed title.
///
/// The seed's author is taken from the first row carrying that title, and
/// only reviewers of (title, author) count. When several books share a title
/// under different authors, whichever was loaded first decides. The returned
/// rows span *all* titles those reviewers rated, in load order.
pub fn relevant_reviews<'a>(dataset: &'a Dataset, seed_title: &str) -> Vec<&'a JoinedRecord> {
	let title = seed_title.to_lowercase();
	let seed_rows = dataset.title_rows(&title);
	let Some(&first) = seed_rows.first() else {
		return Vec::new();
	};
	let author = dataset.record(first).author.as_str();

	let mut reviewers: Vec<&str> = Vec::new();
	let mut seen: HashSet<&str> = HashSet::new();
	for &pos in seed_rows {
		let record = dataset.record(pos);
		if record.author == author && seen.insert(record.user_id.as_str()) {
			reviewers.push(record.user_id.as_str());
		}
	}

	let mut positions: Vec<usize> = reviewers
		.iter()
		.flat_map(|user| dataset.user_rows(user).iter().copied())
		.collect();
	positions.sort_unstable();

	tracing::debug!(
		title = %title,
		author = %author,
		reviewers = reviewers.len(),
		rows = positions.len(),
		"Collected relevant reviews"
	);

	positions.into_iter().map(|p| dataset.record(p)).collect()
}

/// Keep only rows whose title has at least `min_reviewers` distinct
/// reviewers within `subset`. The seed title gets no exemption.
pub fn apply_threshold<'a>(
	subset: &[&'a JoinedRecord],
	min_reviewers: usize,
) -> Vec<&'a JoinedRecord> {
	let mut reviewers_per_title: HashMap<&str, HashSet<&str>> = HashMap::new();
	for record in subset {
		reviewers_per_title
			.entry(record.title.as_str())
			.or_default()
			.insert(record.user_id.as_str());
	}

	let kept: HashSet<&str> = reviewers_per_title
		.into_iter()
		.filter(|(_, users)| users.len() >= min_reviewers)
		.map(|(title, _)| title)
		.collect();

	tracing::debug!(
		min_reviewers,
		titles = kept.len(),
		"Applied reviewer threshold"
	);

	if kept.is_empty() {
		return Vec::new();
	}

	subset
		.iter()
		.copied()
		.filter(|r| kept.contains(r.title.as_str()))
		.collect()
}
