use std::path::PathBuf;

use clap::Parser;

use crate::ranker::DEFAULT_MAX_ENTRIES;
use crate::recommender::RecommendConfig;
use crate::relevance::DEFAULT_MIN_REVIEWERS;

#[derive(Parser, Debug)]
#[command(
	name = "bookrec-engine",
	about = "Book recommendations from rating correlations over JSON-RPC / NDJSON stdio"
)]
pub struct CliArgs {
	/// Dataset file (`{"reviews": [...], "books": [...]}`, plain or gzipped JSON)
	/// to load at startup
	#[arg(long, env = "BOOKREC_DATA")]
	pub data: Option<PathBuf>,

	/// Distinct reviewers a title needs before it is correlated
	#[arg(long, default_value_t = DEFAULT_MIN_REVIEWERS, env = "BOOKREC_MIN_REVIEWERS")]
	pub min_reviewers: usize,

	/// Default number of recommendations per request
	#[arg(long, default_value_t = DEFAULT_MAX_ENTRIES, env = "BOOKREC_MAX_ENTRIES")]
	pub max_entries: usize,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info", env = "BOOKREC_LOG_LEVEL")]
	pub log_level: String,
}

impl CliArgs {
	pub fn recommend_config(&self) -> RecommendConfig {
		RecommendConfig {
			min_reviewers: self.min_reviewers,
			max_entries: self.max_entries,
		}
	}
}
