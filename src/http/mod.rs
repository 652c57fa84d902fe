//! Shared HTTP type aliases and small helpers used across the pipeline.

pub mod headers;

use crate::error::GatewayError;

pub type Body = axum_core::body::Body;
pub type Request = ::http::Request<Body>;
pub type Response = ::http::Response<Body>;
pub use ::http::header;
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};

/// Coarse content-type classification, used by the reduction selector and
/// the merge-precondition check.
#[derive(Debug, PartialEq, Eq)]
pub enum ContentTypeClass {
	Json,
	Other,
}

pub fn classify_content_type(h: &HeaderMap) -> ContentTypeClass {
	let Some(content_type) = h.get(header::CONTENT_TYPE) else {
		return ContentTypeClass::Other;
	};
	let Ok(content_type_str) = content_type.to_str() else {
		return ContentTypeClass::Other;
	};
	let Ok(mime) = content_type_str.parse::<mime::Mime>() else {
		return ContentTypeClass::Other;
	};
	match (mime.type_(), mime.subtype()) {
		(mime::APPLICATION, mime::JSON) => ContentTypeClass::Json,
		_ => ContentTypeClass::Other,
	}
}

pub fn accept_prefers_json(h: &HeaderMap) -> bool {
	h.get(header::ACCEPT)
		.and_then(|v| v.to_str().ok())
		.map(|v| v.to_ascii_lowercase().contains("application/json"))
		.unwrap_or(false)
}

pub fn header_equals_ignore_case(h: &HeaderMap, name: HeaderName, want: &str) -> bool {
	h.get(name)
		.and_then(|v| v.to_str().ok())
		.map(|v| v.eq_ignore_ascii_case(want))
		.unwrap_or(false)
}

pub fn merge_in_headers(additional_headers: Option<HeaderMap>, dest: &mut HeaderMap) {
	if let Some(rh) = additional_headers {
		for (k, v) in rh.into_iter() {
			let Some(k) = k else { continue };
			dest.insert(k, v);
		}
	}
}

/// Build a well-formed error response from a [`GatewayError`]. The core
/// never propagates a Rust error across the HTTP boundary (spec.md §7).
pub fn error_response(err: &GatewayError) -> Response {
	let msg = err.to_string();
	::http::Response::builder()
		.status(err.status())
		.header(header::CONTENT_TYPE, "text/plain")
		.body(Body::from(msg))
		.expect("status/header/body are all valid")
}
