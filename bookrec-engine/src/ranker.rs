// ---------------------------------------------------------------------------
// Ranker: candidate rows, ordering, and the top-N cut
// ---------------------------------------------------------------------------

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::types::{CandidateResult, JoinedRecord};

/// Default length of a recommendation list.
pub const DEFAULT_MAX_ENTRIES: usize = 10;

/// Smallest per-reviewer mean rating of a title.
///
/// This is what callers receive as `avg_rating`: the minimum over reviewer
/// means, not the mean of all ratings.
pub fn min_reviewer_mean(rows: &[&JoinedRecord]) -> Option<f64> {
	let mut per_reviewer: HashMap<&str, (f64, u32)> = HashMap::new();
	for record in rows {
		let entry = per_reviewer.entry(record.user_id.as_str()).or_insert((0.0, 0));
		entry.0 += record.rating as f64;
		entry.1 += 1;
	}
	per_reviewer
		.values()
		.map(|&(sum, n)| sum / n as f64)
		.min_by(f64::total_cmp)
}

/// Descending by correlation, undefined correlations last.
pub fn compare_correlation(a: Option<f64>, b: Option<f64>) -> Ordering {
	match (a, b) {
		(Some(x), Some(y)) => y.total_cmp(&x),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

/// Build one [`CandidateResult`] per correlated title, order them, and keep
/// the first `max_entries`.
///
/// Ties keep the order of `correlations` (lexicographic by title). The book id
/// is the id of the first filtered row carrying the title.
pub fn rank(
	filtered: &[&JoinedRecord],
	correlations: &BTreeMap<String, Option<f64>>,
	seed_title: &str,
	max_entries: usize,
) -> Vec<CandidateResult> {
	let mut rows_by_title: HashMap<&str, Vec<&JoinedRecord>> = HashMap::new();
	for &record in filtered {
		rows_by_title
			.entry(record.title.as_str())
			.or_default()
			.push(record);
	}

	let mut results: Vec<CandidateResult> = correlations
		.iter()
		.filter(|(title, _)| title.as_str() != seed_title)
		.filter_map(|(title, &correlation)| {
			let rows = rows_by_title.get(title.as_str())?;
			let first = rows.first()?;
			Some(CandidateResult {
				book_id: first.book_id.clone(),
				title: title.clone(),
				correlation,
				avg_rating: min_reviewer_mean(rows)?,
			})
		})
		.collect();

	results.sort_by(|a, b| compare_correlation(a.correlation, b.correlation));
	results.truncate(max_entries);
	results
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(user: &str, book_id: &str, title: &str, rating: u8) -> JoinedRecord {
		JoinedRecord {
			user_id: user.into(),
			book_id: book_id.into(),
			rating,
			title: title.into(),
			author: "someone".into(),
		}
	}

	#[test]
	fn avg_rating_is_minimum_of_reviewer_means() {
		let rows = vec![
			row("u1", "b1", "b", 8),
			row("u1", "b1", "b", 10),
			row("u2", "b1", "b", 6),
			row("u3", "b1", "b", 7),
		];
		let refs: Vec<&JoinedRecord> = rows.iter().collect();
		// reviewer means: 9, 6, 7 -> min 6 (the plain mean would be 7.75)
		assert_eq!(min_reviewer_mean(&refs), Some(6.0));
		assert_eq!(min_reviewer_mean(&[]), None);
	}

	#[test]
	fn ordering_puts_undefined_last() {
		let mut values = vec![None, Some(0.2), Some(-0.5), None, Some(0.9)];
		values.sort_by(|a, b| compare_correlation(*a, *b));
		assert_eq!(values, vec![Some(0.9), Some(0.2), Some(-0.5), None, None]);
	}

	#[test]
	fn rank_sorts_truncates_and_skips_seed() {
		let rows = vec![
			row("u1", "s1", "seed", 5),
			row("u1", "c1", "c", 4),
			row("u1", "d1", "d", 6),
			row("u1", "e1", "e", 3),
			row("u2", "e2", "e", 9),
		];
		let refs: Vec<&JoinedRecord> = rows.iter().collect();
		let mut corr = BTreeMap::new();
		corr.insert("seed".to_string(), Some(1.0));
		corr.insert("c".to_string(), None);
		corr.insert("d".to_string(), Some(0.1));
		corr.insert("e".to_string(), Some(0.7));

		let ranked = rank(&refs, &corr, "seed", 10);
		let titles: Vec<&str> = ranked.iter().map(|r| r.title.as_str()).collect();
		assert_eq!(titles, vec!["e", "d", "c"]);
		// first row wins for the id
		assert_eq!(ranked[0].book_id, "e1");
		assert_eq!(ranked[0].avg_rating, 3.0);

		let top = rank(&refs, &corr, "seed", 2);
		assert_eq!(top.len(), 2);
		assert!(rank(&refs, &corr, "seed", 0).is_empty());
	}

	#[test]
	fn ties_keep_title_order() {
		let rows = vec![
			row("u1", "z1", "zeta", 5),
			row("u1", "a1", "alpha", 5),
			row("u1", "m1", "mu", 5),
		];
		let refs: Vec<&JoinedRecord> = rows.iter().collect();
		let corr: BTreeMap<String, Option<f64>> = ["zeta", "alpha", "mu"]
			.iter()
			.map(|t| (t.to_string(), Some(0.5)))
			.collect();
		let ranked = rank(&refs, &corr, "seed", 10);
		let titles: Vec<&str> = ranked.iter().map(|r| r.title.as_str()).collect();
		assert_eq!(titles, vec!["alpha", "mu", "zeta"]);
	}
}
