//! URL-Pattern Matcher (spec.md §4.1) and the capture primitive shared with
//! the Endpoint Expander (spec.md §4.2).
//!
//! The literal placeholder `{Endpoint_IDs}` acts as a wildcard matching any
//! non-empty string; everything else in the pattern — including characters
//! that would be regex metacharacters — is matched literally, and
//! case-insensitively. Matching is anchored at the start of the URL only
//! (not the end): the wildcard greedily captures up to the *last* place the
//! suffix literal reoccurs, leaving whatever follows as the trailing
//! portion the expander appends to each backend URL. This mirrors Python's
//! greedy `.*` + `re.match` (anchored-at-start) behavior in
//! `original_source/curryproxy/routes/endpoints_route.py::_create_forwarded_urls`,
//! with one deliberate divergence: spec.md requires the wildcard to match a
//! *non-empty* string, so a capture that would be empty is treated as "no
//! match" rather than silently accepted the way Python's bare `.*` would.

pub const ENDPOINT_IDS_PLACEHOLDER: &str = "{Endpoint_IDs}";

/// Splits a pattern on its (single, pre-validated) placeholder occurrence
/// into `(prefix, suffix)`.
pub fn split_pattern(pattern: &str) -> (&str, &str) {
	let idx = pattern
		.find(ENDPOINT_IDS_PLACEHOLDER)
		.expect("patterns are validated to contain the placeholder at load time");
	let prefix = &pattern[..idx];
	let suffix = &pattern[idx + ENDPOINT_IDS_PLACEHOLDER.len()..];
	(prefix, suffix)
}

/// Matches `url` against `pattern`, returning `(captured, trailing)` on
/// success: `captured` is the raw (still percent-encoded) placeholder
/// region and `trailing` is whatever follows prefix + captured + suffix.
/// Comparison is case-insensitive; captured indices are ASCII-lowercased
/// for the search only, original bytes are returned.
pub fn capture<'u>(pattern: &str, url: &'u str) -> Option<(&'u str, &'u str)> {
	let (prefix, suffix) = split_pattern(pattern);
	if url.len() < prefix.len() {
		return None;
	}
	let prefix_ok = url[..prefix.len()].eq_ignore_ascii_case(prefix);
	if !prefix_ok {
		return None;
	}
	let rest = &url[prefix.len()..];

	if suffix.is_empty() {
		return if rest.is_empty() { None } else { Some((rest, "")) };
	}

	let rest_lower = rest.to_ascii_lowercase();
	let suffix_lower = suffix.to_ascii_lowercase();
	let idx = rest_lower.rfind(&suffix_lower)?;
	if idx == 0 {
		// The only place the suffix occurs leaves the wildcard empty.
		return None;
	}
	Some((&rest[..idx], &rest[idx + suffix.len()..]))
}

/// Finds the first configured pattern whose prefix/wildcard/suffix matches
/// `url`. Returns the matched pattern literal, or `None` if no pattern
/// matches (the caller rejects this with a 404-like error, spec.md §4.1).
pub fn match_url<'a>(patterns: &'a [String], url: &str) -> Option<&'a str> {
	patterns
		.iter()
		.find(|pattern| capture(pattern, url).is_some())
		.map(String::as_str)
}
