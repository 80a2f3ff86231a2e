use std::io::{self, Write};

use crate::protocol::{JsonRpcResponse, RpcFailure};

/// Writes one JSON-RPC message per line to stdout.
#[derive(Default)]
pub struct NdjsonTransport;

impl NdjsonTransport {
	pub fn new() -> Self {
		Self
	}

	pub fn write_response(&self, id: u64, result: serde_json::Value) {
		self.write_line(&JsonRpcResponse::success(id, result));
	}

	pub fn write_failure(&self, id: u64, failure: &RpcFailure) {
		self.write_line(&JsonRpcResponse::failure(id, failure));
	}

	fn write_line(&self, response: &JsonRpcResponse) {
		let mut stdout = io::stdout().lock();
		if let Err(e) = serde_json::to_writer(&mut stdout, response) {
			tracing::error!("Failed to serialize response: {}", e);
			return;
		}
		let _ = writeln!(stdout);
		let _ = stdout.flush();
	}
}
