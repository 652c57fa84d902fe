//! Shared header fix-up pass (spec.md §4.9).
//!
//! Applied by every reducer right before its response is handed to the
//! HTTP front end: hop-by-hop headers are stripped, `Content-Encoding` is
//! cleared whenever the body has been rewritten, and `Content-Length` is
//! recomputed from the final body bytes.

use super::{HeaderMap, HeaderName, header};

/// Headers that are always hop-by-hop, independent of whether the body was
/// rewritten, mirroring the teacher's `HOP_HEADERS` table in
/// `proxy/httpproxy.rs`.
static CONNECTION_HEADERS: [HeaderName; 2] = [header::CONNECTION, header::TRANSFER_ENCODING];

/// Strip the headers that are always hop-by-hop. Safe to call on a
/// verbatim passthrough response (spec.md §4.5) where the body — and thus
/// `Content-Length` — is untouched.
pub fn strip_connection_headers(headers: &mut HeaderMap) {
	for h in CONNECTION_HEADERS.iter() {
		headers.remove(h);
	}
}

/// A reducer that produces a fresh body must additionally clear
/// `Content-Encoding` (the old encoding no longer describes the new bytes)
/// and set `Content-Length` to the new body's length (spec.md §4.9).
pub fn fix_up_rewritten_body(headers: &mut HeaderMap, body_len: usize) {
	strip_connection_headers(headers);
	headers.remove(header::CONTENT_LENGTH);
	headers.remove(header::CONTENT_ENCODING);
	headers.insert(header::CONTENT_LENGTH, body_len.into());
}
