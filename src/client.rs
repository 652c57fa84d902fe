//! Backend HTTP client (spec.md §4.3): a pooled, TLS-verifying hyper client
//! shared by every fan-out call. Connections are pooled by the transport
//! layer; the pipeline itself manages no sockets (spec.md §5).
//!
//! Grounded on `crates/agentgateway/src/client/mod.rs`, which wraps
//! `hyper_util::client::legacy::Client<Connector, Body, PoolKey>` the same
//! way; simplified here to a single plaintext-or-TLS connector since the
//! pipeline has no mesh/HBONE transport to select between.

use std::fmt;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as LegacyClient;
use hyper_util::rt::TokioExecutor;

use crate::http::{Body, HeaderMap, StatusCode};

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
	#[error("backend request failed: {0}")]
	Request(#[from] hyper_util::client::legacy::Error),
	#[error("failed to read backend response body: {0}")]
	Body(String),
}

#[derive(Clone)]
pub struct Client {
	inner: LegacyClient<HttpsConnector<HttpConnector>, Body>,
}

impl fmt::Debug for Client {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Client").finish()
	}
}

impl Default for Client {
	fn default() -> Self {
		Self::new()
	}
}

impl Client {
	pub fn new() -> Self {
		let https = hyper_rustls::HttpsConnectorBuilder::new()
			.with_webpki_roots()
			.https_or_http()
			.enable_http1()
			.enable_http2()
			.build();
		Client {
			inner: LegacyClient::builder(TokioExecutor::new()).build(https),
		}
	}

	/// Issues `req` and returns the backend's status/headers immediately on
	/// arrival; the body is returned unread so the caller (a reducer) can
	/// choose to stream it through verbatim or buffer it for JSON merging.
	/// Redirects are never followed: this is a direct hyper call, not a
	/// policy that would chase `Location` headers.
	pub async fn call(&self, req: crate::http::Request) -> Result<BackendResponse, TransportError> {
		let res = self.inner.request(req).await?;
		let (parts, body) = res.into_parts();
		Ok(BackendResponse {
			status: parts.status,
			headers: parts.headers,
			body: Body::new(body),
		})
	}
}

/// A backend's response, consumed exactly once by whichever reducer
/// receives it (spec.md §3 lifecycle).
pub struct BackendResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	body: Body,
}

impl BackendResponse {
	pub fn synthetic_error(status: StatusCode, message: impl Into<String>) -> Self {
		let message = message.into();
		let mut headers = HeaderMap::new();
		headers.insert(
			http::header::CONTENT_TYPE,
			http::HeaderValue::from_static("text/plain"),
		);
		BackendResponse {
			status,
			headers,
			body: Body::from(message),
		}
	}

	/// Hands back the raw body for verbatim passthrough (the Single
	/// Reducer, spec.md §4.5). Consumes `self`.
	pub fn into_body(self) -> Body {
		self.body
	}

	/// Buffers the full body into memory. Consumes `self`.
	pub async fn into_bytes(self) -> Result<Bytes, TransportError> {
		self
			.body
			.collect()
			.await
			.map(|c| c.to_bytes())
			.map_err(|e| TransportError::Body(e.to_string()))
	}

	/// Buffers and parses the body as JSON. Consumes `self`.
	pub async fn into_json(self) -> Result<serde_json::Value, TransportError> {
		let bytes = self.into_bytes().await?;
		serde_json::from_slice(&bytes).map_err(|e| TransportError::Body(e.to_string()))
	}
}
