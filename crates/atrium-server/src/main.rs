// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Atrium operations console server binary.

use atrium_server::{create_app_state, create_router};
use axum::http::HeaderValue;
use clap::{Parser, Subcommand};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Atrium server - HTTP server for the Atrium operations console.
#[derive(Parser, Debug)]
#[command(
	name = "atrium-server",
	about = "Atrium operations console server",
	version
)]
struct Args {
	/// Subcommands for atrium-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Parse CLI arguments
	let args = Args::parse();

	// Handle subcommands that should not start the server
	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	// Load configuration
	let config = atrium_server_config::load_config()?;

	// Setup tracing
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);
	if config.logging.json {
		registry.with(tracing_subscriber::fmt::layer().json()).init();
	} else {
		registry.with(tracing_subscriber::fmt::layer()).init();
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		environment = %config.auth.environment,
		"starting atrium-server"
	);

	let addr = config.socket_addr();

	// dev_mode opens CORS to any origin; otherwise only the configured
	// console origin may call the API.
	let cors = if config.auth.dev_mode {
		CorsLayer::new()
			.allow_origin(Any)
			.allow_methods(Any)
			.allow_headers(Any)
	} else {
		CorsLayer::new()
			.allow_origin(config.http.base_url.parse::<HeaderValue>()?)
			.allow_methods(Any)
			.allow_headers(Any)
	};

	let state = create_app_state(config);

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(cors);

	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	// Run server with graceful shutdown
	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
