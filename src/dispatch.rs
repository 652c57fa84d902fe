//! Fan-Out Dispatcher (spec.md §4.3): issues one request per backend URL
//! concurrently and waits for every one to produce a response or a
//! synthetic failure. Task-per-backend with a join barrier (spec.md §9
//! design note) — a worker pool would be overkill since fan-out width is
//! the (typically small) endpoint-id count.
//!
//! Grounded on the teacher's single-backend `PolicyClient::call` in
//! `crates/agentgateway/src/proxy/httpproxy.rs`, generalized here to N
//! concurrent calls collected on a `tokio::task::JoinSet`.

use http::{StatusCode, Uri};
use tokio::task::JoinSet;
use tracing::warn;

use crate::client::{BackendResponse, Client};
use crate::http::{Body, Request};
use crate::request::InboundRequest;

/// Runs all backend calls concurrently and returns responses in the same
/// order as `backend_urls`, regardless of completion order (spec.md §5,
/// testable property 1). Every slot is filled: a transport error, or a
/// malformed backend URL, becomes a synthetic >=500 [`BackendResponse`] so
/// reducers always see a uniform response array (spec.md §4.3 failure
/// model).
pub async fn dispatch(
	client: &Client,
	backend_urls: Vec<String>,
	inbound: &InboundRequest,
) -> Vec<BackendResponse> {
	let n = backend_urls.len();
	let mut set: JoinSet<(usize, BackendResponse)> = JoinSet::new();

	for (idx, url) in backend_urls.into_iter().enumerate() {
		let client = client.clone();
		let req = build_backend_request(inbound, &url);
		set.spawn(async move {
			let response = match req {
				Ok(req) => match client.call(req).await {
					Ok(resp) => resp,
					Err(e) => {
						warn!(backend = %url, error = %e, "backend transport error");
						BackendResponse::synthetic_error(StatusCode::BAD_GATEWAY, e.to_string())
					},
				},
				Err(e) => {
					warn!(backend = %url, error = %e, "could not build backend request");
					BackendResponse::synthetic_error(StatusCode::BAD_GATEWAY, e)
				},
			};
			(idx, response)
		});
	}

	let mut slots: Vec<Option<BackendResponse>> = (0..n).map(|_| None).collect();
	while let Some(joined) = set.join_next().await {
		let (idx, response) = joined.expect("dispatcher task panicked");
		slots[idx] = Some(response);
	}
	slots
		.into_iter()
		.map(|s| s.expect("every backend slot is filled before the join barrier returns"))
		.collect()
}

/// Builds the outbound-to-backend request: body/method/headers copied from
/// the inbound request with `Accept-Encoding` forced to `gzip,identity` and
/// `Host` removed so the transport sets it per target (spec.md §4.3, §6).
/// Redirects are not followed and TLS is verified by the shared [`Client`],
/// not per-request.
fn build_backend_request(inbound: &InboundRequest, url: &str) -> Result<Request, String> {
	let uri: Uri = url.parse().map_err(|e| format!("invalid backend url {url:?}: {e}"))?;

	let mut headers = inbound.headers.clone();
	headers.insert(
		http::header::ACCEPT_ENCODING,
		http::HeaderValue::from_static("gzip,identity"),
	);
	headers.remove(http::header::HOST);

	let mut builder = http::Request::builder().method(inbound.method.clone()).uri(uri);
	*builder.headers_mut().expect("builder has no error yet") = headers;
	builder
		.body(Body::from(inbound.body.clone()))
		.map_err(|e| format!("failed to build backend request: {e}"))
}

#[cfg(test)]
mod dispatch_test {
	use std::collections::HashMap;

	use wiremock::matchers::{method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	use super::*;
	use crate::expand::expand;
	use crate::route::match_url;

	fn inbound(url: &str) -> InboundRequest {
		InboundRequest {
			method: http::Method::GET,
			url: url.to_string(),
			headers: http::HeaderMap::new(),
			body: bytes::Bytes::new(),
		}
	}

	#[tokio::test]
	async fn preserves_order_regardless_of_completion_order() {
		let slow = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/items"))
			.respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(60)).set_body_string("slow"))
			.mount(&slow)
			.await;
		let fast = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/items"))
			.respond_with(ResponseTemplate::new(200).set_body_string("fast"))
			.mount(&fast)
			.await;

		let patterns = vec!["http://p/{Endpoint_IDs}/items".to_string()];
		let endpoints = HashMap::from([
			("slow".to_string(), slow.uri()),
			("fast".to_string(), fast.uri()),
		]);
		let url = "http://p/slow,fast/items";
		let pattern = match_url(&patterns, url).unwrap();
		let backend_urls = expand(url, pattern, &endpoints).unwrap();

		let client = Client::new();
		let responses = dispatch(&client, backend_urls, &inbound(url)).await;
		assert_eq!(responses.len(), 2);
		let bodies: Vec<_> = futures::future::join_all(responses.into_iter().map(|r| r.into_bytes()))
			.await
			.into_iter()
			.map(|b| b.unwrap())
			.collect();
		assert_eq!(bodies[0], "slow".as_bytes());
		assert_eq!(bodies[1], "fast".as_bytes());
	}

	#[tokio::test]
	async fn transport_failure_becomes_synthetic_5xx() {
		let responses = dispatch(
			&Client::new(),
			vec!["http://127.0.0.1:1/unreachable".to_string()],
			&inbound("http://p/a/x"),
		)
		.await;
		assert_eq!(responses.len(), 1);
		assert!(responses[0].status.is_server_error());
	}
}
