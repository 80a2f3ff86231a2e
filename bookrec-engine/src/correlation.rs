// ---------------------------------------------------------------------------
// Correlation engine: reviewer × title matrix and Pearson correlation
// ---------------------------------------------------------------------------
//
// The matrix is stored column-major: title → (reviewer → mean rating).
// Absent cells mean "not rated" and are never treated as zero; every
// correlation only uses reviewers present in both columns.
// ---------------------------------------------------------------------------

use std::collections::BTreeMap;
#[cfg(test)]
use std::collections::BTreeSet;

use crate::types::JoinedRecord;

/// Paired variance at or below this is treated as a constant column.
const VARIANCE_EPSILON: f64 = 1e-12;

/// Request-scoped pivot of filtered reviews.
#[derive(Debug, Clone, Default)]
pub struct RatingMatrix {
	columns: BTreeMap<String, BTreeMap<String, f64>>,
}

impl RatingMatrix {
	/// Group by (reviewer, title), average, and pivot.
	pub fn build(filtered: &[&JoinedRecord]) -> Self {
		let mut sums: BTreeMap<&str, BTreeMap<&str, (f64, u32)>> = BTreeMap::new();
		for record in filtered {
			let cell = sums
				.entry(record.title.as_str())
				.or_default()
				.entry(record.user_id.as_str())
				.or_insert((0.0, 0));
			cell.0 += record.rating as f64;
			cell.1 += 1;
		}

		let columns = sums
			.into_iter()
			.map(|(title, cells)| {
				let column: BTreeMap<String, f64> = cells
					.into_iter()
					.map(|(user, (sum, n))| (user.to_string(), sum / n as f64))
					.collect();
				(title.to_string(), column)
			})
			.collect();

		Self { columns }
	}

	/// Column titles in lexicographic order.
	pub fn titles(&self) -> impl Iterator<Item = &str> {
		self.columns.keys().map(String::as_str)
	}

	/// Distinct reviewers across all columns.
	#[cfg(test)]
	pub(crate) fn reviewers(&self) -> BTreeSet<&str> {
		self.columns
			.values()
			.flat_map(|c| c.keys().map(String::as_str))
			.collect()
	}

	pub fn column(&self, title: &str) -> Option<&BTreeMap<String, f64>> {
		self.columns.get(title)
	}

	#[cfg(test)]
	pub(crate) fn cell(&self, reviewer: &str, title: &str) -> Option<f64> {
		self.columns.get(title)?.get(reviewer).copied()
	}
}

pub fn build_matrix(filtered: &[&JoinedRecord]) -> RatingMatrix {
	RatingMatrix::build(filtered)
}

/// Values of two columns restricted to reviewers present in both, in
/// reviewer order.
pub fn paired(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> (Vec<f64>, Vec<f64>) {
	a.iter()
		.filter_map(|(user, &x)| b.get(user).map(|&y| (x, y)))
		.unzip()
}

/// Pearson correlation coefficient of two equally long samples.
///
/// `None` with fewer than two pairs, mismatched lengths, or when either
/// sample is constant. The result is clamped to [-1, 1].
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
	if xs.len() != ys.len() || xs.len() < 2 {
		return None;
	}

	let n = xs.len() as f64;
	let mean_x = xs.iter().sum::<f64>() / n;
	let mean_y = ys.iter().sum::<f64>() / n;

	let (cov, var_x, var_y) = xs
		.iter()
		.zip(ys)
		.fold((0.0, 0.0, 0.0), |(cov, vx, vy), (&x, &y)| {
			let dx = x - mean_x;
			let dy = y - mean_y;
			(cov + dx * dy, vx + dx * dx, vy + dy * dy)
		});

	if var_x <= VARIANCE_EPSILON || var_y <= VARIANCE_EPSILON {
		return None;
	}

	let r = cov / (var_x.sqrt() * var_y.sqrt());
	if !r.is_finite() {
		return None;
	}
	Some(r.clamp(-1.0, 1.0))
}

/// Correlation of every other column against the seed column.
///
/// `None` when the seed title is not a column of the matrix (for example when
/// it fell below the reviewer threshold). Inner `None` values mark undefined
/// correlations.
pub fn correlate(
	matrix: &RatingMatrix,
	seed_title: &str,
) -> Option<BTreeMap<String, Option<f64>>> {
	let seed = matrix.column(seed_title)?;
	let correlations = matrix
		.columns
		.iter()
		.filter(|(title, _)| title.as_str() != seed_title)
		.map(|(title, column)| {
			let (xs, ys) = paired(seed, column);
			(title.clone(), pearson(&xs, &ys))
		})
		.collect();
	Some(correlations)
}
