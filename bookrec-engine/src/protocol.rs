// ---------------------------------------------------------------------------
// JSON-RPC 2.0 message shapes
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::error::RecError;

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Every engine-level failure; the `data` payload carries the `bookrecCode`.
pub const BOOKREC_ERROR: i32 = -32000;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
	pub id: u64,
	pub method: String,
	#[serde(default)]
	pub params: serde_json::Value,
}

/// Why a request got an error reply instead of a result.
#[derive(Debug)]
pub enum RpcFailure {
	/// The line was not a request (bad UTF-8, bad JSON, missing fields).
	Parse(String),
	MethodNotFound(String),
	Engine(RecError),
}

impl RpcFailure {
	pub fn code(&self) -> i32 {
		match self {
			Self::Parse(_) => PARSE_ERROR,
			Self::MethodNotFound(_) => METHOD_NOT_FOUND,
			Self::Engine(_) => BOOKREC_ERROR,
		}
	}

	pub fn message(&self) -> String {
		match self {
			Self::Parse(detail) => format!("Parse error: {}", detail),
			Self::MethodNotFound(method) => format!("Unknown method: {}", method),
			Self::Engine(e) => e.to_string(),
		}
	}

	pub fn data(&self) -> Option<serde_json::Value> {
		match self {
			Self::Engine(e) => Some(e.to_json_rpc_error()),
			_ => None,
		}
	}
}

impl From<RecError> for RpcFailure {
	fn from(e: RecError) -> Self {
		Self::Engine(e)
	}
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
	jsonrpc: &'static str,
	id: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	result: Option<serde_json::Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Serialize)]
struct JsonRpcErrorBody {
	code: i32,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
	pub fn success(id: u64, result: serde_json::Value) -> Self {
		Self {
			jsonrpc: "2.0",
			id,
			result: Some(result),
			error: None,
		}
	}

	pub fn failure(id: u64, failure: &RpcFailure) -> Self {
		Self {
			jsonrpc: "2.0",
			id,
			result: None,
			error: Some(JsonRpcErrorBody {
				code: failure.code(),
				message: failure.message(),
				data: failure.data(),
			}),
		}
	}
}
