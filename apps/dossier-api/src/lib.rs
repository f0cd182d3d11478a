pub mod envelope;
pub mod middleware;
pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use axum::http::{HeaderName, HeaderValue};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = dossier_config::load(&args.config)?;

	dossier_observe::logging::init(&config.service.log_level);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let correlation_header = HeaderName::from_bytes(config.service.correlation_header.as_bytes())?;
	let cors = build_cors(&config.service.cors_allowed_origins)?;
	let state = AppState::new(config).await?;
	// correlation is layered last so it runs outermost, ahead of CORS
	let app = routes::router(state.clone())
		.layer(cors)
		.layer(axum::middleware::from_fn_with_state(correlation_header, middleware::correlation));
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(http_addr = %http_addr, "HTTP server listening.");

	axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	state.service.db.close().await;

	tracing::info!("Shut down cleanly.");

	Ok(())
}

fn build_cors(origins: &[String]) -> color_eyre::Result<CorsLayer> {
	if origins.iter().any(|origin| origin == "*") {
		return Ok(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));
	}

	let parsed = origins
		.iter()
		.map(|origin| origin.parse::<HeaderValue>())
		.collect::<Result<Vec<_>, _>>()?;

	Ok(CorsLayer::new()
		.allow_origin(AllowOrigin::list(parsed))
		.allow_methods(Any)
		.allow_headers(Any))
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %err, "Failed to listen for the shutdown signal.");
	}
}
