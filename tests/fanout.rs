//! End-to-end scenarios: inbound request -> route match -> fan-out ->
//! reduce, driven straight through the axum app with `wiremock` backend
//! doubles standing in for the real endpoints.

use std::sync::Arc;

use fanout_gateway::client::Client;
use fanout_gateway::config::RouteConfig;
use fanout_gateway::server::{app, AppState};
use http::{Method, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method as wm_method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn build_app(config_json: &str) -> axum::Router {
	let config = RouteConfig::parse(config_json).expect("valid test config");
	let state = Arc::new(AppState { config, client: Client::new() });
	app(state)
}

fn request(method: Method, url: &str, accept_json: bool, metadata: bool) -> http::Request<axum::body::Body> {
	let mut builder = http::Request::builder().method(method).uri(url);
	if accept_json {
		builder = builder.header(http::header::ACCEPT, "application/json");
	}
	if metadata {
		builder = builder.header("Proxy-Aggregator-Body", "response-metadata");
	}
	builder.body(axum::body::Body::empty()).unwrap()
}

async fn body_json(response: http::Response<axum::body::Body>) -> Value {
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn merge_path_concatenates_json_arrays() {
	let a = MockServer::start().await;
	Mock::given(wm_method("GET"))
		.and(path("/items"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"id": 1}])))
		.mount(&a)
		.await;
	let b = MockServer::start().await;
	Mock::given(wm_method("GET"))
		.and(path("/items"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"id": 2}])))
		.mount(&b)
		.await;

	let config = format!(
		r#"{{"routes": [{{"url_patterns": ["http://gw/{{Endpoint_IDs}}/items"], "endpoints": {{"a": "{}", "b": "{}"}}, "priority_errors": []}}]}}"#,
		a.uri(),
		b.uri()
	);
	let app = build_app(&config).await;

	let req = request(Method::GET, "http://gw/a,b/items", true, false);
	let response = app.oneshot(req).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers().get(http::header::CONTENT_TYPE).unwrap(), "application/json");
	let body = body_json(response).await;
	assert_eq!(body, serde_json::json!([{"id": 1}, {"id": 2}]));
}

#[tokio::test]
async fn error_reducer_prefers_priority_listed_status() {
	let ok_backend = MockServer::start().await;
	Mock::given(wm_method("GET"))
		.and(path("/x"))
		.respond_with(ResponseTemplate::new(200).set_body_string("ok"))
		.mount(&ok_backend)
		.await;
	let not_found_backend = MockServer::start().await;
	Mock::given(wm_method("GET"))
		.and(path("/x"))
		.respond_with(ResponseTemplate::new(404).set_body_string("missing"))
		.mount(&not_found_backend)
		.await;

	let config = format!(
		r#"{{"routes": [{{"url_patterns": ["http://gw/{{Endpoint_IDs}}/x"], "endpoints": {{"ok": "{}", "missing": "{}"}}, "priority_errors": [401, 404, 500]}}]}}"#,
		ok_backend.uri(),
		not_found_backend.uri()
	);
	let app = build_app(&config).await;

	let req = request(Method::GET, "http://gw/ok,missing/x", false, false);
	let response = app.oneshot(req).await.unwrap();
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	assert_eq!(bytes, "missing".as_bytes());
}

#[tokio::test]
async fn status_collapse_bucket_for_unlisted_errors() {
	let backends: Vec<(MockServer, u16)> = {
		let mut v = Vec::new();
		for status in [201u16, 202, 503] {
			let server = MockServer::start().await;
			Mock::given(wm_method("GET"))
				.and(path("/y"))
				.respond_with(ResponseTemplate::new(status).set_body_string(status.to_string()))
				.mount(&server)
				.await;
			v.push((server, status));
		}
		v
	};

	let endpoints = format!(
		r#"{{"c201": "{}", "c202": "{}", "c503": "{}"}}"#,
		backends[0].0.uri(),
		backends[1].0.uri(),
		backends[2].0.uri()
	);
	let config = format!(
		r#"{{"routes": [{{"url_patterns": ["http://gw/{{Endpoint_IDs}}/y"], "endpoints": {endpoints}, "priority_errors": []}}]}}"#
	);
	let app = build_app(&config).await;

	let req = request(Method::GET, "http://gw/c201,c202,c503/y", false, false);
	let response = app.oneshot(req).await.unwrap();
	// below-500 statuses are [201, 202]; max 202 collapses to the 200 bucket.
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn single_endpoint_passes_through_verbatim_without_host_leaking() {
	let backend = MockServer::start().await;
	Mock::given(wm_method("GET"))
		.and(path("/solo"))
		.respond_with(move |req: &wiremock::Request| {
			if req.headers.get("host").map(|h| h.to_str().unwrap()).unwrap_or_default().contains("gw") {
				ResponseTemplate::new(400).set_body_string("host leaked")
			} else {
				ResponseTemplate::new(201)
					.set_body_string("solo body")
					.insert_header("content-type", "text/plain")
			}
		})
		.mount(&backend)
		.await;

	let config = format!(
		r#"{{"routes": [{{"url_patterns": ["http://gw/{{Endpoint_IDs}}/solo"], "endpoints": {{"only": "{}"}}, "priority_errors": []}}]}}"#,
		backend.uri()
	);
	let app = build_app(&config).await;

	let req = request(Method::GET, "http://gw/only/solo", false, false);
	let response = app.oneshot(req).await.unwrap();
	assert_eq!(response.status(), StatusCode::CREATED);
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	assert_eq!(bytes, "solo body".as_bytes());
}

#[tokio::test]
async fn metadata_header_yields_envelope_without_bodies() {
	let a = MockServer::start().await;
	Mock::given(wm_method("GET"))
		.and(path("/meta"))
		.respond_with(ResponseTemplate::new(200).set_body_string("should not appear"))
		.mount(&a)
		.await;

	let config = format!(
		r#"{{"routes": [{{"url_patterns": ["http://gw/{{Endpoint_IDs}}/meta"], "endpoints": {{"a": "{}"}}, "priority_errors": []}}]}}"#,
		a.uri()
	);
	let app = build_app(&config).await;

	let req = request(Method::GET, "http://gw/a/meta", false, true);
	let response = app.oneshot(req).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	let arr = body.as_array().unwrap();
	assert_eq!(arr.len(), 1);
	assert_eq!(arr[0]["status"], 200);
	assert!(arr[0].get("body").is_none());
}

#[tokio::test]
async fn unmatched_url_returns_404() {
	let config = r#"{"routes": [{"url_patterns": ["http://gw/{Endpoint_IDs}/known"], "endpoints": {"a": "http://127.0.0.1:9"}, "priority_errors": []}]}"#;
	let app = build_app(config).await;

	let req = request(Method::GET, "http://gw/unknown/path", false, false);
	let response = app.oneshot(req).await.unwrap();
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
