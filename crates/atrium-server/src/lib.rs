// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP server for the Atrium operations console.
//!
//! Wires the role/session core (`atrium-server-auth`) into an axum
//! application: a session-loading middleware in front of every route, JSON
//! guards on API routes, redirect guards on pages, and the impersonation
//! admin API.

pub mod auth_middleware;
pub mod error;
pub mod extract;
pub mod guard_middleware;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::{
	routing::{get, post},
	Router,
};
use atrium_server_auth::{GuardConfig, SessionSource};
use atrium_server_config::ServerConfig;

use crate::guard_middleware::{RedirectGuard, RequireRoles};
use crate::store::MemoryTokenStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
	/// Token store backing sign-in and impersonation writes.
	pub store: Arc<MemoryTokenStore>,
	/// Session resolver used by the session-loading middleware. Defaults to
	/// the token store itself; tests substitute failing sources here.
	pub session_source: Arc<dyn SessionSource>,
	pub config: Arc<ServerConfig>,
}

/// Build application state from resolved configuration.
pub fn create_app_state(config: ServerConfig) -> AppState {
	let store = Arc::new(MemoryTokenStore::new());
	AppState {
		session_source: store.clone(),
		store,
		config: Arc::new(config),
	}
}

/// Build the full application router.
pub fn create_router(state: AppState) -> Router {
	let login_path = state.config.auth.login_path.clone();
	let unauthorized_path = state.config.auth.unauthorized_path.clone();

	// Starting an impersonation is admin-only; inspecting and stopping only
	// need an authenticated session because the actor's effective role is the
	// assumed one mid-impersonation.
	let impersonation_start = Router::new()
		.route("/api/admin/impersonate", post(routes::admin::start_impersonation))
		.route_layer(RequireRoles::admin());

	let impersonation_manage = Router::new()
		.route(
			"/api/admin/impersonate/state",
			get(routes::admin::impersonation_state),
		)
		.route(
			"/api/admin/impersonate/stop",
			post(routes::admin::stop_impersonation),
		)
		.route_layer(RequireRoles::authenticated());

	let collab_pages = Router::new()
		.route("/collab/workspace", get(routes::pages::collab_workspace))
		.route_layer(RedirectGuard::new(
			GuardConfig::collab().with_redirect_to(unauthorized_path.clone()),
			login_path.clone(),
		));

	let field_pages = Router::new()
		.route("/field/dispatch", get(routes::pages::field_dispatch))
		.route_layer(RedirectGuard::new(
			GuardConfig::field_tech().with_redirect_to(unauthorized_path),
			login_path.clone(),
		));

	Router::new()
		.route("/", get(routes::pages::index))
		.route("/health", get(routes::health::health))
		.route("/login", get(routes::pages::login))
		.route("/unauthorized", get(routes::pages::unauthorized))
		.route("/auth/callback", post(routes::auth::callback))
		.route("/auth/signout", post(routes::auth::signout))
		.route("/api/session", get(routes::auth::current_session))
		.route("/api/me", get(routes::auth::me))
		.route("/admin/dashboard", get(routes::pages::admin_dashboard))
		.route("/security/dashboard", get(routes::pages::security_dashboard))
		.route("/dba/console", get(routes::pages::dba_console))
		.route("/devops/pipelines", get(routes::pages::devops_pipelines))
		.route("/tcc/board", get(routes::pages::tcc_board))
		.merge(impersonation_start)
		.merge(impersonation_manage)
		.merge(collab_pages)
		.merge(field_pages)
		.layer(axum::middleware::from_fn_with_state(
			state.clone(),
			auth_middleware::load_session,
		))
		.with_state(state)
}
