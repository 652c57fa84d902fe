//! Error Reducer (spec.md §4.7): when at least one backend failed, prefer
//! surfacing one response verbatim over a collapsed status — but only the
//! one the route's `priority_errors` list says matters most. Anything else
//! falls back to the same aggregate envelope the Multiple Reducer uses.
//!
//! Grounded on `original_source/curryproxy/routes/endpoints_route.py`'s
//! error-priority handling, which walks the configured priority list in
//! order and returns the first backend response whose status matches.

use crate::client::BackendResponse;
use crate::http::headers::strip_connection_headers;

use super::multiple::aggregate_responses;
use super::OutboundResponse;

pub async fn reduce(responses: Vec<BackendResponse>, priority_errors: &[u16]) -> OutboundResponse {
	if let Some(idx) = pick_priority_match(&responses, priority_errors) {
		let response = responses
			.into_iter()
			.nth(idx)
			.expect("idx came from this same responses slice");
		let status = response.status;
		let mut headers = response.headers.clone();
		strip_connection_headers(&mut headers);
		let body = response.into_bytes().await.unwrap_or_default();
		return OutboundResponse { status, headers, body };
	}
	aggregate_responses(responses).await
}

/// Returns the index of the first response whose status matches the
/// highest-priority entry in `priority_errors` that any response has. The
/// list is checked in the order it was configured, not sorted — the
/// earliest-listed status that appears wins, even if a later-listed one
/// also appears.
fn pick_priority_match(responses: &[BackendResponse], priority_errors: &[u16]) -> Option<usize> {
	for &wanted in priority_errors {
		if let Some(idx) = responses.iter().position(|r| r.status.as_u16() == wanted) {
			return Some(idx);
		}
	}
	None
}
