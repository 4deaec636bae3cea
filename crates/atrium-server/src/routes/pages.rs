// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server-rendered console pages.
//!
//! The role-restricted pages demonstrate both protection shapes: the
//! dashboard handlers guard inline via
//! [`guard_component`](crate::guard_middleware::guard_component), while
//! `/collab/workspace` and `/field/dispatch` sit behind
//! [`RedirectGuard`](crate::guard_middleware::RedirectGuard) route layers in
//! the router.

use axum::{
	extract::{Query, State},
	http::Uri,
	response::{Html, IntoResponse, Response},
};
use atrium_server_auth::GuardConfig;
use serde::Deserialize;

use crate::extract::OptionalAuth;
use crate::guard_middleware::guard_component;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
	#[serde(rename = "callbackUrl")]
	pub callback_url: Option<String>,
}

/// GET /login
pub async fn login(Query(query): Query<LoginQuery>) -> Html<String> {
	let destination = query.callback_url.as_deref().unwrap_or("/");
	Html(format!(
		"<h1>Sign in</h1><p>You will be returned to {destination} after signing in.</p>"
	))
}

/// GET /unauthorized
pub async fn unauthorized() -> Html<&'static str> {
	Html("<h1>Access denied</h1><p>Your role does not grant access to that page.</p>")
}

/// GET /
pub async fn index(OptionalAuth(session): OptionalAuth) -> Html<String> {
	match session.user {
		Some(user) => Html(format!(
			"<h1>Atrium</h1><p>Signed in as {} ({})</p>",
			user.email.as_deref().unwrap_or("unknown"),
			user.role
		)),
		None => Html("<h1>Atrium</h1><p><a href=\"/login\">Sign in</a></p>".to_string()),
	}
}

async fn guarded_page(
	state: &AppState,
	session: atrium_server_auth::Session,
	uri: &Uri,
	config: GuardConfig,
	body: &'static str,
) -> Response {
	let config = config.with_redirect_to(state.config.auth.unauthorized_path.clone());
	guard_component(
		&session,
		&config,
		&state.config.auth.login_path,
		uri.path(),
		|| async move { Html(body).into_response() },
	)
	.await
}

/// GET /admin/dashboard
pub async fn admin_dashboard(
	State(state): State<AppState>,
	OptionalAuth(session): OptionalAuth,
	uri: Uri,
) -> Response {
	guarded_page(
		&state,
		session,
		&uri,
		GuardConfig::admin(),
		"<h1>Admin dashboard</h1>",
	)
	.await
}

/// GET /security/dashboard
pub async fn security_dashboard(
	State(state): State<AppState>,
	OptionalAuth(session): OptionalAuth,
	uri: Uri,
) -> Response {
	guarded_page(
		&state,
		session,
		&uri,
		GuardConfig::security(),
		"<h1>Security dashboard</h1>",
	)
	.await
}

/// GET /dba/console
pub async fn dba_console(
	State(state): State<AppState>,
	OptionalAuth(session): OptionalAuth,
	uri: Uri,
) -> Response {
	guarded_page(
		&state,
		session,
		&uri,
		GuardConfig::dba(),
		"<h1>Database console</h1>",
	)
	.await
}

/// GET /devops/pipelines
pub async fn devops_pipelines(
	State(state): State<AppState>,
	OptionalAuth(session): OptionalAuth,
	uri: Uri,
) -> Response {
	guarded_page(
		&state,
		session,
		&uri,
		GuardConfig::devops(),
		"<h1>Deployment pipelines</h1>",
	)
	.await
}

/// GET /tcc/board
pub async fn tcc_board(
	State(state): State<AppState>,
	OptionalAuth(session): OptionalAuth,
	uri: Uri,
) -> Response {
	guarded_page(
		&state,
		session,
		&uri,
		GuardConfig::tcc(),
		"<h1>Control centre board</h1>",
	)
	.await
}

/// GET /collab/workspace (behind a RedirectGuard route layer)
pub async fn collab_workspace() -> Html<&'static str> {
	Html("<h1>Collaboration workspace</h1>")
}

/// GET /field/dispatch (behind a RedirectGuard route layer)
pub async fn field_dispatch() -> Html<&'static str> {
	Html("<h1>Field dispatch</h1>")
}
