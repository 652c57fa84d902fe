//! Fan-out/reduce HTTP gateway core: matches an inbound request against a
//! configured route, expands it into one request per backend, dispatches
//! them concurrently, and reduces the responses into one outbound
//! response. See SPEC_FULL.md for the full component design.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod expand;
pub mod http;
pub mod reduce;
pub mod request;
pub mod route;
pub mod server;

pub use client::Client;
pub use config::RouteConfig;
pub use request::InboundRequest;
