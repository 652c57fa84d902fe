//! Route configuration: the external loader's output (spec.md §3, §6).
//!
//! Shape matches SPEC_FULL.md §6: a list of routes, each with ordered URL
//! patterns, a case-insensitive endpoint id -> backend base URL map, and an
//! ordered priority-error list. Deserialization follows the teacher's
//! config-struct style (`crates/agentgateway/src/config.rs`); the
//! duplicate-id and missing-placeholder checks run once, at load time,
//! exactly as spec.md §7.1 requires.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::route::ENDPOINT_IDS_PLACEHOLDER;

#[derive(Debug, Clone, Deserialize)]
pub struct RawRouteConfig {
	pub routes: Vec<RawRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRoute {
	pub url_patterns: Vec<String>,
	pub endpoints: HashMap<String, String>,
	#[serde(default)]
	pub priority_errors: Vec<u16>,
}

/// A single route, ready for request-time matching and expansion. Endpoint
/// ids have already been case-folded so lookups at request time are a
/// simple map access (spec.md §3 invariant).
#[derive(Debug, Clone)]
pub struct Route {
	pub url_patterns: Vec<String>,
	pub endpoints: HashMap<String, String>,
	pub priority_errors: Vec<u16>,
}

#[derive(Debug, Clone, Default)]
pub struct RouteConfig {
	pub routes: Vec<Route>,
}

impl RouteConfig {
	pub fn from_raw(raw: RawRouteConfig) -> Result<Self, ConfigError> {
		let routes = raw
			.routes
			.into_iter()
			.map(Route::from_raw)
			.collect::<Result<Vec<_>, _>>()?;
		Ok(RouteConfig { routes })
	}

	pub fn parse(contents: &str) -> Result<Self, ConfigError> {
		let raw: RawRouteConfig = serde_json::from_str(contents)?;
		Self::from_raw(raw)
	}

	pub async fn load_file(path: &Path) -> Result<Self, ConfigError> {
		let contents = tokio::fs::read_to_string(path).await?;
		Self::parse(&contents)
	}

	/// Iterates routes in configuration order and returns the first whose
	/// pattern set matches `url`, alongside the exact pattern that matched.
	pub fn find_route_for_url(&self, url: &str) -> Option<(&Route, &str)> {
		self
			.routes
			.iter()
			.find_map(|route| crate::route::match_url(&route.url_patterns, url).map(|p| (route, p)))
	}
}

impl Route {
	fn from_raw(raw: RawRoute) -> Result<Self, ConfigError> {
		for pattern in &raw.url_patterns {
			let count = pattern.matches(ENDPOINT_IDS_PLACEHOLDER).count();
			if count == 0 {
				return Err(ConfigError::MissingPlaceholder {
					pattern: pattern.clone(),
				});
			}
			if count > 1 {
				return Err(ConfigError::RepeatedPlaceholder {
					pattern: pattern.clone(),
				});
			}
		}

		let mut endpoints = HashMap::with_capacity(raw.endpoints.len());
		for (id, url) in raw.endpoints {
			let folded = id.to_lowercase();
			if endpoints.insert(folded.clone(), url).is_some() {
				return Err(ConfigError::DuplicateEndpoint { id: folded });
			}
		}

		Ok(Route {
			url_patterns: raw.url_patterns,
			endpoints,
			priority_errors: raw.priority_errors,
		})
	}
}
