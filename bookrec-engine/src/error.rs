use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecError {
	#[error("Invalid input: {0}")]
	InvalidInput(String),
	#[error("Dataset not loaded: call dataset/load or dataset/loadFile first")]
	NotLoaded,
	#[error("Book not found: {0}")]
	NotFound(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl RecError {
	pub fn code(&self) -> &str {
		match self {
			Self::InvalidInput(_) => "BOOKREC_INVALID_INPUT",
			Self::NotLoaded => "BOOKREC_NOT_LOADED",
			Self::NotFound(_) => "BOOKREC_NOT_FOUND",
			Self::Io(_) => "BOOKREC_IO",
			Self::Serialization(_) => "BOOKREC_SERIALIZATION",
		}
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		serde_json::json!({
			"bookrecCode": self.code(),
			"message": self.to_string(),
		})
	}
}

impl From<serde_json::Error> for RecError {
	fn from(e: serde_json::Error) -> Self {
		Self::Serialization(e.to_string())
	}
}
