// ---------------------------------------------------------------------------
// Dataset: the joined ratings ⋈ books table
// ---------------------------------------------------------------------------
//
// Built once from the review and book collections, immutable afterwards.
// Every string column of the joined rows is lower-cased so title lookups are
// case-insensitive. Secondary indexes map titles, reviewers and book ids to
// row positions; positions always refer to `records` in load order.
// ---------------------------------------------------------------------------

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::RecError;
use crate::types::{Book, BookStats, DatasetStats, JoinedRecord, Review};

/// Highest rating on the scale. `0` is the unrated sentinel.
pub const MAX_RATING: i32 = 10;

/// Remove reviews carrying the `0` "no rating" sentinel.
///
/// This belongs to ingestion: [`Dataset::load`] assumes it already happened
/// and does not repeat the check.
pub fn drop_unrated(reviews: Vec<Review>) -> Vec<Review> {
	let before = reviews.len();
	let kept: Vec<Review> = reviews.into_iter().filter(|r| r.rating != 0).collect();
	if kept.len() < before {
		tracing::debug!(dropped = before - kept.len(), "Dropped unrated reviews");
	}
	kept
}

pub struct Dataset {
	records: Vec<JoinedRecord>,
	by_title: HashMap<String, Vec<usize>>,
	by_user: HashMap<String, Vec<usize>>,
	by_book: HashMap<String, Vec<usize>>,
	catalog: HashMap<String, Book>,
}

impl Dataset {
	/// Inner-join `reviews` with `books` on the case-folded book id and
	/// lower-case the result.
	///
	/// Fails with [`RecError::InvalidInput`] when either collection is empty,
	/// when a required field is blank, or when a rating is off the scale. A
	/// join with no matching ids is not an error: it yields an empty dataset
	/// that simply never predicts anything.
	pub fn load(reviews: &[Review], books: &[Book]) -> Result<Self, RecError> {
		if reviews.is_empty() {
			return Err(RecError::InvalidInput("reviews collection is empty".into()));
		}
		if books.is_empty() {
			return Err(RecError::InvalidInput("books collection is empty".into()));
		}

		// Book ids are folded to lower case before the join, and the first book
		// carrying a folded id wins. The join, the catalog and the per-book
		// index all share that one key.
		let mut catalog: HashMap<String, Book> = HashMap::with_capacity(books.len());
		for (i, book) in books.iter().enumerate() {
			validate_book(i, book)?;
			match catalog.entry(book.book_id.to_lowercase()) {
				Entry::Occupied(_) => {
					tracing::debug!(book_id = %book.book_id, "Skipping book with duplicate id");
				}
				Entry::Vacant(slot) => {
					slot.insert(book.clone());
				}
			}
		}

		let mut records = Vec::with_capacity(reviews.len());
		for (i, review) in reviews.iter().enumerate() {
			validate_review(i, review)?;
			let key = review.book_id.to_lowercase();
			let Some(book) = catalog.get(&key) else {
				continue;
			};
			records.push(JoinedRecord {
				user_id: review.user_id.to_lowercase(),
				book_id: key,
				// validate_review bounds the value to 0..=MAX_RATING
				rating: review.rating as u8,
				title: book.title.to_lowercase(),
				author: book.author.to_lowercase(),
			});
		}

		let mut by_title: HashMap<String, Vec<usize>> = HashMap::new();
		let mut by_user: HashMap<String, Vec<usize>> = HashMap::new();
		let mut by_book: HashMap<String, Vec<usize>> = HashMap::new();
		for (pos, record) in records.iter().enumerate() {
			by_title.entry(record.title.clone()).or_default().push(pos);
			by_user.entry(record.user_id.clone()).or_default().push(pos);
			by_book.entry(record.book_id.clone()).or_default().push(pos);
		}

		let dataset = Self {
			records,
			by_title,
			by_user,
			by_book,
			catalog,
		};

		let stats = dataset.stats();
		tracing::info!(
			records = stats.records,
			reviewers = stats.reviewers,
			books = stats.books,
			titles = stats.titles,
			skipped = reviews.len() - stats.records,
			"Dataset joined"
		);

		Ok(dataset)
	}

	// -- Table access --------------------------------------------------------

	pub fn records(&self) -> &[JoinedRecord] {
		&self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// `title` must already be lower-case.
	pub fn contains_title(&self, title: &str) -> bool {
		self.by_title.contains_key(title)
	}

	/// Row positions for a lower-case title, in load order.
	pub fn title_rows(&self, title: &str) -> &[usize] {
		self.by_title.get(title).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Row positions for a lower-case reviewer id, in load order.
	pub fn user_rows(&self, user_id: &str) -> &[usize] {
		self.by_user.get(user_id).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn record(&self, pos: usize) -> &JoinedRecord {
		&self.records[pos]
	}

	pub fn stats(&self) -> DatasetStats {
		DatasetStats {
			records: self.records.len(),
			reviewers: self.by_user.len(),
			books: self.by_book.len(),
			titles: self.by_title.len(),
		}
	}

	// -- Catalog -------------------------------------------------------------

	/// Catalog entry for a book id, compared case-insensitively.
	pub fn book(&self, book_id: &str) -> Option<&Book> {
		self.catalog.get(&book_id.to_lowercase())
	}

	/// Catalog entries in the order the ids were given. Unknown ids are
	/// skipped.
	pub fn books(&self, book_ids: &[String]) -> Vec<&Book> {
		book_ids.iter().filter_map(|id| self.book(id)).collect()
	}

	/// Number of admitted ratings for a book and their mean.
	pub fn book_stats(&self, book_id: &str) -> Result<BookStats, RecError> {
		let key = book_id.to_lowercase();
		if !self.catalog.contains_key(&key) {
			return Err(RecError::NotFound(book_id.to_string()));
		}
		let rows = self.by_book.get(&key).map(Vec::as_slice).unwrap_or(&[]);
		let mean_rating = if rows.is_empty() {
			None
		} else {
			let sum: f64 = rows.iter().map(|&p| self.records[p].rating as f64).sum();
			Some(sum / rows.len() as f64)
		};
		Ok(BookStats {
			book_id: key,
			rating_count: rows.len(),
			mean_rating,
		})
	}
}

fn validate_book(index: usize, book: &Book) -> Result<(), RecError> {
	if book.book_id.trim().is_empty() {
		return Err(RecError::InvalidInput(format!(
			"book at index {} has an empty bookId",
			index
		)));
	}
	if book.title.trim().is_empty() {
		return Err(RecError::InvalidInput(format!(
			"book '{}' has an empty title",
			book.book_id
		)));
	}
	Ok(())
}

fn validate_review(index: usize, review: &Review) -> Result<(), RecError> {
	if review.user_id.trim().is_empty() {
		return Err(RecError::InvalidInput(format!(
			"review at index {} has an empty userId",
			index
		)));
	}
	if review.book_id.trim().is_empty() {
		return Err(RecError::InvalidInput(format!(
			"review at index {} has an empty bookId",
			index
		)));
	}
	if !(0..=MAX_RATING).contains(&review.rating) {
		return Err(RecError::InvalidInput(format!(
			"review at index {} has rating {} outside 0..={}",
			index, review.rating, MAX_RATING
		)));
	}
	Ok(())
}
