//! The Inbound Request snapshot (spec.md §3): an immutable capture of the
//! request the pipeline was invoked with. Owned by the pipeline for the
//! lifetime of the request; backends never see this struct directly, only
//! the per-backend requests the dispatcher builds from it.

use bytes::Bytes;
use http::{HeaderMap, Method};

#[derive(Debug, Clone)]
pub struct InboundRequest {
	pub method: Method,
	/// Full URL as seen by the pipeline (scheme + authority + path + query),
	/// used for route matching and endpoint expansion.
	pub url: String,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl InboundRequest {
	/// The special `Proxy-Aggregator-Body: response-metadata` header that
	/// selects the Metadata Reducer (spec.md §4.4, §6).
	pub fn wants_metadata(&self) -> bool {
		crate::http::header_equals_ignore_case(
			&self.headers,
			http::header::HeaderName::from_static("proxy-aggregator-body"),
			"response-metadata",
		)
	}
}
