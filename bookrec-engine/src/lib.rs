pub mod config;
pub mod correlation;
pub mod dataset;
pub mod dataset_file;
pub mod error;
pub mod protocol;
pub mod ranker;
pub mod recommender;
pub mod relevance;
pub mod server;
pub mod snapshot;
pub mod transport;
pub mod types;
