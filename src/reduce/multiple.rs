//! Multiple Reducer (spec.md §4.6): chooses between the merge path (JSON
//! array concatenation) and the aggregate path (structured envelope +
//! status collapse).
//!
//! Grounded on `original_source/curryproxy/responses/multiple_response.py`
//! (`_merge_responses`, `_aggregate_responses`) — including its exact
//! integer-only bucket rule, preserved as spec.md §9 requires (no
//! floating-point division, or `201/200` would round away from `1`).

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde_json::Value;

use crate::client::BackendResponse;
use crate::http::headers::fix_up_rewritten_body;
use crate::http::{accept_prefers_json, classify_content_type, ContentTypeClass};
use crate::request::InboundRequest;

use super::OutboundResponse;

pub async fn reduce(inbound: &InboundRequest, responses: Vec<BackendResponse>) -> OutboundResponse {
	let buffered = buffer_all(responses).await;

	if merge_eligible(inbound, &buffered) {
		if let Some(merged) = try_merge(&buffered) {
			return merged;
		}
		// A response declared application/json but failed to parse: merge
		// precondition failure, not an error — fall back to aggregate
		// (spec.md §9 open question, resolved in DESIGN.md).
	}
	aggregate(&buffered)
}

/// Buffers `responses` and runs the aggregate path directly, skipping the
/// merge-eligibility check. Used by the Error Reducer once it has decided
/// no priority-listed status is present (spec.md §4.7).
pub(crate) async fn aggregate_responses(responses: Vec<BackendResponse>) -> OutboundResponse {
	let buffered = buffer_all(responses).await;
	aggregate(&buffered)
}

struct Buffered {
	status: StatusCode,
	headers: HeaderMap,
	body: Bytes,
}

async fn buffer_all(responses: Vec<BackendResponse>) -> Vec<Buffered> {
	let mut out = Vec::with_capacity(responses.len());
	for response in responses {
		let status = response.status;
		let headers = response.headers.clone();
		let body = response.into_bytes().await.unwrap_or_default();
		out.push(Buffered { status, headers, body });
	}
	out
}

fn merge_eligible(inbound: &InboundRequest, buffered: &[Buffered]) -> bool {
	inbound.method == http::Method::GET
		&& accept_prefers_json(&inbound.headers)
		&& buffered
			.iter()
			.all(|b| classify_content_type(&b.headers) == ContentTypeClass::Json)
		&& buffered.iter().all(|b| b.status == StatusCode::OK)
}

fn try_merge(buffered: &[Buffered]) -> Option<OutboundResponse> {
	let mut result = Vec::new();
	for b in buffered {
		let parsed: Value = serde_json::from_slice(&b.body).ok()?;
		match parsed {
			Value::Array(items) => result.extend(items),
			other => result.push(other),
		}
	}

	let status = buffered[0].status;
	let mut headers = buffered[0].headers.clone();
	let body = Bytes::from(serde_json::to_vec(&Value::Array(result)).ok()?);
	fix_up_rewritten_body(&mut headers, body.len());
	Some(OutboundResponse { status, headers, body })
}

fn aggregate(buffered: &[Buffered]) -> OutboundResponse {
	let statuses: Vec<u16> = buffered.iter().map(|b| b.status.as_u16()).collect();
	let status = StatusCode::from_u16(status_collapse(&statuses)).unwrap_or(StatusCode::BAD_GATEWAY);

	let entries: Vec<Value> = buffered
		.iter()
		.map(|b| {
			serde_json::json!({
				"status": b.status.as_u16(),
				"body": String::from_utf8(b.body.to_vec()).ok(),
			})
		})
		.collect();
	let body = Bytes::from(serde_json::to_vec(&Value::Array(entries)).expect("json array always serializes"));

	let mut headers = HeaderMap::new();
	headers.insert(
		http::header::CONTENT_TYPE,
		http::HeaderValue::from_static("application/json"),
	);
	fix_up_rewritten_body(&mut headers, body.len());
	OutboundResponse { status, headers, body }
}

/// The status-collapse rule (spec.md §4.6): default 502; among the
/// backend statuses below 500, if more than one remains, collapse their
/// max to its hundreds bucket by testing `400, 300, 200, 100` in order for
/// the first `B` with `floor(max / B) == 1`. A lone `<500` status does not
/// override the 502 default (see DESIGN.md Open Question 1).
pub fn status_collapse(statuses: &[u16]) -> u16 {
	let below_500: Vec<u16> = statuses.iter().copied().filter(|&s| s < 500).collect();
	if below_500.len() > 1 {
		let max = *below_500.iter().max().expect("non-empty, just checked len > 1");
		for bucket in [400u16, 300, 200, 100] {
			if max / bucket == 1 {
				return bucket;
			}
		}
	}
	502
}
