//! Metadata Reducer (spec.md §4.8): when the caller opts in via
//! `Proxy-Aggregator-Body: response-metadata`, the bodies are discarded
//! entirely and replaced with a JSON array describing each backend call —
//! useful for callers that only want to know what happened, not what came
//! back.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde_json::Value;

use crate::client::BackendResponse;
use crate::http::headers::fix_up_rewritten_body;

use super::OutboundResponse;

pub async fn reduce(backend_urls: &[String], responses: Vec<BackendResponse>) -> OutboundResponse {
	let entries: Vec<Value> = backend_urls
		.iter()
		.zip(responses.iter())
		.map(|(url, response)| {
			let headers: serde_json::Map<String, Value> = response
				.headers
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|v| (name.as_str().to_string(), Value::String(v.to_string())))
				})
				.collect();
			serde_json::json!({
				"url": url,
				"status": response.status.as_u16(),
				"headers": headers,
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
	OutboundResponse { status: StatusCode::OK, headers, body }
}

#[cfg(test)]
mod metadata_test {
	use http::HeaderValue;

	use super::*;

	#[tokio::test]
	async fn envelope_carries_url_status_and_headers_without_bodies() {
		let mut resp = BackendResponse::synthetic_error(StatusCode::NOT_FOUND, "body that should not appear");
		resp.headers.insert(http::header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

		let urls = vec!["http://backend-a.internal/items".to_string()];
		let out = reduce(&urls, vec![resp]).await;

		assert_eq!(out.status, StatusCode::OK);
		let body: Value = serde_json::from_slice(&out.body).unwrap();
		let arr = body.as_array().unwrap();
		assert_eq!(arr.len(), 1);
		assert_eq!(arr[0]["url"], "http://backend-a.internal/items");
		assert_eq!(arr[0]["status"], 404);
		assert_eq!(arr[0]["headers"]["x-content-type-options"], "nosniff");
		assert!(arr[0].get("body").is_none());
	}
}
