use std::sync::Arc;

use anyhow::{Context, Result};
use bookrec_engine::config::CliArgs;
use bookrec_engine::dataset_file::load_dataset_file;
use bookrec_engine::recommender::Recommender;
use bookrec_engine::server::BookrecServer;
use bookrec_engine::snapshot::SnapshotHandle;
use bookrec_engine::transport::NdjsonTransport;
use clap::Parser;

fn main() -> Result<()> {
	let args = CliArgs::parse();

	// stdout carries the protocol, logs go to stderr
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	let snapshots = match &args.data {
		Some(path) => {
			let dataset = load_dataset_file(path)
				.with_context(|| format!("Failed to load dataset from {}", path.display()))?;
			Arc::new(SnapshotHandle::with_dataset(dataset))
		}
		None => Arc::new(SnapshotHandle::new()),
	};

	let config = args.recommend_config();
	tracing::info!(
		min_reviewers = config.min_reviewers,
		max_entries = config.max_entries,
		loaded = snapshots.is_loaded(),
		"bookrec-engine ready"
	);

	let recommender = Recommender::new(snapshots, config);
	let mut server = BookrecServer::new(NdjsonTransport::new(), recommender);
	server.run()?;
	Ok(())
}
