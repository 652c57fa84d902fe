//! Single Reducer (spec.md §4.5): verbatim passthrough of the one backend
//! response, subject only to the shared header fix-up. The body is buffered
//! into `Bytes` like every other reducer's output, but never inspected or
//! rewritten — status, headers (past the fix-up) and body bytes all cross
//! unchanged.

use crate::client::BackendResponse;
use crate::http::headers::strip_connection_headers;

use super::OutboundResponse;

pub async fn reduce(response: BackendResponse) -> OutboundResponse {
	let status = response.status;
	let mut headers = response.headers.clone();
	strip_connection_headers(&mut headers);
	let body = response
		.into_bytes()
		.await
		.unwrap_or_else(|_| bytes::Bytes::new());
	OutboundResponse { status, headers, body }
}
