//! Error kinds for the pipeline (spec.md §7).
//!
//! `ConfigError` is only ever produced while loading a [`crate::config::RouteConfig`]
//! and is fatal at load time. `GatewayError` is produced per-request and is
//! always rendered into a well-formed [`crate::http::Response`]; it never
//! crosses the HTTP boundary as a Rust error.

use http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("duplicate endpoint id {id:?} after case-folding")]
	DuplicateEndpoint { id: String },
	#[error("url pattern {pattern:?} does not contain the {{Endpoint_IDs}} placeholder")]
	MissingPlaceholder { pattern: String },
	#[error("url pattern {pattern:?} contains more than one {{Endpoint_IDs}} placeholder")]
	RepeatedPlaceholder { pattern: String },
	#[error("failed to parse config: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("failed to read config: {0}")]
	Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
	/// Inbound URL matched no configured pattern (spec.md §7.2).
	#[error("no route matches this url")]
	NoRoute,
	/// An endpoint id referenced in the request's placeholder region has no
	/// entry in the configured endpoint map (spec.md §7.1).
	#[error("unknown endpoint id {id:?}")]
	UnknownEndpoint { id: String },
	/// A programmer invariant was violated (e.g. splitting a pattern on its
	/// placeholder did not yield exactly two parts). Reported as 500
	/// (spec.md §7, final paragraph).
	#[error("internal invariant violated: {0}")]
	Invariant(&'static str),
}

impl GatewayError {
	pub fn status(&self) -> StatusCode {
		match self {
			GatewayError::NoRoute => StatusCode::NOT_FOUND,
			GatewayError::UnknownEndpoint { .. } => StatusCode::NOT_FOUND,
			GatewayError::Invariant(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
