use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Input collections
// ---------------------------------------------------------------------------

/// A single user rating. `rating == 0` is the "no rating" sentinel and must be
/// dropped before the review reaches [`crate::dataset::Dataset::load`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
	#[serde(deserialize_with = "identifier")]
	pub user_id: String,
	#[serde(deserialize_with = "identifier")]
	pub book_id: String,
	pub rating: i32,
}

impl Review {
	pub fn new(user_id: impl Into<String>, book_id: impl Into<String>, rating: i32) -> Self {
		Self {
			user_id: user_id.into(),
			book_id: book_id.into(),
			rating,
		}
	}
}

/// A catalog entry. Only `book_id`, `title` and `author` take part in
/// recommendation; the rest is carried for catalog lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Book {
	#[serde(deserialize_with = "identifier")]
	pub book_id: String,
	pub title: String,
	pub author: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub year: Option<i32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub publisher: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_small: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_medium: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_large: Option<String>,
}

impl Book {
	pub fn new(
		book_id: impl Into<String>,
		title: impl Into<String>,
		author: impl Into<String>,
	) -> Self {
		Self {
			book_id: book_id.into(),
			title: title.into(),
			author: author.into(),
			..Default::default()
		}
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
	Text(String),
	Number(i64),
}

/// User ids arrive as integers from some exports and as strings from others.
fn identifier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(match RawIdentifier::deserialize(deserializer)? {
		RawIdentifier::Text(s) => s,
		RawIdentifier::Number(n) => n.to_string(),
	})
}

// ---------------------------------------------------------------------------
// Working rows
// ---------------------------------------------------------------------------

/// One row of the review ⋈ book join. All strings are lower-case.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
	pub user_id: String,
	pub book_id: String,
	pub rating: u8,
	pub title: String,
	pub author: String,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// One recommended title.
///
/// `avg_rating` is the *minimum* of the per-reviewer mean ratings for the
/// title, not the overall mean. Consumers have always seen this value under
/// the `avgRating` name, so the name stays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResult {
	pub book_id: String,
	pub title: String,
	/// `None` when the correlation is undefined (too few paired reviewers or
	/// a constant column).
	pub correlation: Option<f64>,
	pub avg_rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
	pub records: usize,
	pub reviewers: usize,
	pub books: usize,
	pub titles: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
	pub book_id: String,
	pub rating_count: usize,
	/// `None` when the book has no admitted ratings.
	pub mean_rating: Option<f64>,
}
