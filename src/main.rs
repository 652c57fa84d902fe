use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use fanout_gateway::client::Client;
use fanout_gateway::config::RouteConfig;
use fanout_gateway::server::{app, AppState};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
	/// Route config as raw JSON bytes.
	#[arg(short, long, value_name = "config")]
	config: Option<bytes::Bytes>,

	/// Route config read from a file.
	#[arg(short, long, value_name = "file")]
	file: Option<std::path::PathBuf>,

	/// Address to bind the gateway to.
	#[arg(long, default_value = "0.0.0.0:8080")]
	addr: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
		.with_writer(std::io::stderr)
		.with_ansi(false)
		.init();

	let args = Args::parse();

	let route_config = match (args.file, args.config) {
		(Some(path), None) => RouteConfig::load_file(&path).await?,
		(None, Some(bytes)) => {
			let contents = std::str::from_utf8(&bytes)?;
			RouteConfig::parse(contents)?
		},
		(Some(_), Some(_)) => {
			eprintln!("config error: both --file and --config cannot be provided, exiting");
			std::process::exit(1);
		},
		(None, None) => {
			eprintln!("error: either --file or --config must be provided, exiting");
			std::process::exit(1);
		},
	};

	let state = Arc::new(AppState {
		config: route_config,
		client: Client::new(),
	});

	let listener = tokio::net::TcpListener::bind(args.addr).await?;
	tracing::info!(addr = %args.addr, "listener established");
	axum::serve(listener, app(state)).await?;
	Ok(())
}
