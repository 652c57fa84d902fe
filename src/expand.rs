//! Endpoint Expander (spec.md §4.2).
//!
//! Given a URL already known to match one of a route's patterns, extracts
//! the comma-separated endpoint id list from the placeholder region,
//! resolves each id against the route's endpoint map, and appends the
//! trailing portion of the URL to each resolved backend base URL.
//!
//! Grounded on `original_source/curryproxy/routes/endpoints_route.py::_create_forwarded_urls`:
//! percent-decode, trim, case-fold each token before lookup; output count
//! always equals input token count, so duplicate ids in the request
//! intentionally produce duplicate backend calls (spec.md §4.2 invariant).

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::error::GatewayError;
use crate::route::capture;

/// Resolves `url` against `pattern` (the pattern the caller already matched
/// via [`crate::route::match_url`]) into the ordered list of backend URLs
/// to fan out to.
pub fn expand(
	url: &str,
	pattern: &str,
	endpoints: &HashMap<String, String>,
) -> Result<Vec<String>, GatewayError> {
	let (captured, trailing) = capture(pattern, url)
		.ok_or(GatewayError::Invariant("matched pattern failed to re-capture its own url"))?;

	captured
		.split(',')
		.map(|token| {
			let decoded = percent_decode_str(token)
				.decode_utf8()
				.map_err(|_| GatewayError::UnknownEndpoint { id: token.to_string() })?;
			let id = decoded.trim().to_lowercase();
			endpoints
				.get(&id)
				.map(|base| format!("{base}{trailing}"))
				.ok_or(GatewayError::UnknownEndpoint { id })
		})
		.collect()
}
