//! Thin axum HTTP front end (spec.md §6): captures the inbound request as an
//! [`InboundRequest`] snapshot, then hands it to the matcher/expander/
//! dispatcher/reducer pipeline. Holds no pipeline logic itself.

use std::sync::Arc;

use axum::routing::any;
use axum::Router;
use http_body_util::BodyExt;
use tracing::warn;

use crate::client::Client;
use crate::config::RouteConfig;
use crate::dispatch::dispatch;
use crate::error::GatewayError;
use crate::expand::expand;
use crate::http::{error_response, Body, Request, Response};
use crate::reduce::reduce;
use crate::request::InboundRequest;

pub struct AppState {
	pub config: RouteConfig,
	pub client: Client,
}

/// Builds the axum app: every method and path falls through to the single
/// pipeline handler, since route matching is the pipeline's own job
/// (spec.md §4.1), not the HTTP framework's.
pub fn app(state: Arc<AppState>) -> Router {
	Router::new().fallback(any(handle)).with_state(state)
}

async fn handle(axum::extract::State(state): axum::extract::State<Arc<AppState>>, req: Request) -> Response {
	match handle_inner(&state, req).await {
		Ok(resp) => resp,
		Err(err) => {
			warn!(error = %err, "request rejected before dispatch");
			error_response(&err)
		},
	}
}

async fn handle_inner(state: &AppState, req: Request) -> Result<Response, GatewayError> {
	let (parts, body) = req.into_parts();
	let body_bytes = body
		.collect()
		.await
		.map_err(|_| GatewayError::Invariant("failed to read inbound request body"))?
		.to_bytes();
	let url = full_url(&parts);

	let inbound = InboundRequest {
		method: parts.method,
		url: url.clone(),
		headers: parts.headers,
		body: body_bytes,
	};

	let (route, pattern) = state.config.find_route_for_url(&url).ok_or(GatewayError::NoRoute)?;
	let backend_urls = expand(&url, pattern, &route.endpoints)?;
	let responses = dispatch(&state.client, backend_urls.clone(), &inbound).await;
	let out = reduce(&inbound, &backend_urls, responses, &route.priority_errors).await;

	let mut builder = http::Response::builder().status(out.status);
	*builder.headers_mut().expect("builder has no error yet") = out.headers;
	Ok(
		builder
			.body(Body::from(out.body))
			.expect("status, headers and body are all valid"),
	)
}

/// Reassembles the scheme + authority + path + query seen by the route
/// matcher and expander (spec.md §3). Axum's request URI is origin-form for
/// plain HTTP/1.1 requests, so the authority comes from `Host` and the
/// scheme defaults to `http` (this gateway sits behind a TLS-terminating
/// front door per spec.md §6, not as the edge TLS listener itself).
fn full_url(parts: &http::request::Parts) -> String {
	let scheme = parts.uri.scheme_str().unwrap_or("http");
	let authority = parts
		.uri
		.authority()
		.map(|a| a.as_str().to_string())
		.or_else(|| {
			parts
				.headers
				.get(http::header::HOST)
				.and_then(|v| v.to_str().ok())
				.map(str::to_string)
		})
		.unwrap_or_default();
	let path_and_query = parts.uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
	format!("{scheme}://{authority}{path_and_query}")
}
