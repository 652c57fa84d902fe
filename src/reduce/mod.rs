//! Response reduction (spec.md §4.4–4.9): collapses the ordered array of
//! backend responses into exactly one outbound response.
//!
//! Modeled as a tagged variant with a pure selector, per spec.md §9's
//! design note ("model reducers as a tagged variant... the selector is a
//! pure function of (header, count, max-status)").

pub mod error;
pub mod metadata;
pub mod multiple;
pub mod single;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::client::BackendResponse;
use crate::request::InboundRequest;

/// The final, once-built response handed off to the HTTP front end
/// (spec.md §3).
pub struct OutboundResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

/// Which reducer variant applies to this request (spec.md §4.4).
#[derive(Debug, PartialEq, Eq)]
enum Selection {
	Metadata,
	Single,
	Error,
	Multiple,
}

fn select(inbound: &InboundRequest, responses: &[BackendResponse]) -> Selection {
	if inbound.wants_metadata() {
		Selection::Metadata
	} else if responses.len() == 1 {
		Selection::Single
	} else if responses.iter().any(|r| r.status.as_u16() >= 400) {
		Selection::Error
	} else {
		Selection::Multiple
	}
}

/// Reduces `responses` (one per `backend_urls` entry, same order) into the
/// single [`OutboundResponse`] for this request.
pub async fn reduce(
	inbound: &InboundRequest,
	backend_urls: &[String],
	responses: Vec<BackendResponse>,
	priority_errors: &[u16],
) -> OutboundResponse {
	match select(inbound, &responses) {
		Selection::Metadata => metadata::reduce(backend_urls, responses).await,
		Selection::Single => {
			let response = responses
				.into_iter()
				.next()
				.expect("Selection::Single implies exactly one response");
			single::reduce(response).await
		},
		Selection::Error => error::reduce(responses, priority_errors).await,
		Selection::Multiple => multiple::reduce(inbound, responses).await,
	}
}

#[cfg(test)]
mod selector_test {
	use http::HeaderMap;

	use super::*;
	use crate::client::BackendResponse;

	fn resp(status: u16) -> BackendResponse {
		BackendResponse::synthetic_error(StatusCode::from_u16(status).unwrap(), "")
	}

	fn inbound_with(headers: HeaderMap) -> InboundRequest {
		InboundRequest {
			method: http::Method::GET,
			url: "http://p/a/x".to_string(),
			headers,
			body: bytes::Bytes::new(),
		}
	}

	#[test]
	fn metadata_header_wins_regardless_of_count() {
		let mut headers = HeaderMap::new();
		headers.insert(
			http::HeaderName::from_static("proxy-aggregator-body"),
			"Response-Metadata".parse().unwrap(),
		);
		let inbound = inbound_with(headers);
		assert_eq!(select(&inbound, &[resp(200)]), Selection::Metadata);
	}

	#[test]
	fn single_backend_without_metadata_header() {
		let inbound = inbound_with(HeaderMap::new());
		assert_eq!(select(&inbound, &[resp(200)]), Selection::Single);
	}

	#[test]
	fn any_error_status_routes_to_error_reducer() {
		let inbound = inbound_with(HeaderMap::new());
		assert_eq!(select(&inbound, &[resp(200), resp(404)]), Selection::Error);
	}

	#[test]
	fn all_success_routes_to_multiple_reducer() {
		let inbound = inbound_with(HeaderMap::new());
		assert_eq!(select(&inbound, &[resp(200), resp(200)]), Selection::Multiple);
	}
}
