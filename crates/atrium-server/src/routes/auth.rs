// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-in, sign-out, and session inspection endpoints.

use axum::{
	extract::{Query, State},
	http::{header::SET_COOKIE, HeaderMap, StatusCode},
	response::{AppendHeaders, IntoResponse, Redirect, Response},
	Json,
};
use atrium_server_auth::{
	extract_roles, extract_session_cookie_with_name, shape_session, shape_token, IdentityProfile,
	UserId,
};
use serde::Deserialize;

use crate::extract::{OptionalAuth, RequireAuth};
use crate::AppState;

/// Sign-in payload: the identity-provider profile, with an optional stable
/// user id supplied by the upstream callback.
#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
	#[serde(default)]
	pub id: Option<uuid::Uuid>,
	#[serde(flatten)]
	pub profile: IdentityProfile,
}

/// Query parameters accepted by the sign-in callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
	/// Where to send the browser after the cookie is set. Absent for API
	/// clients, which get the session JSON instead.
	#[serde(rename = "callbackUrl")]
	pub callback_url: Option<String>,
}

/// POST /auth/callback
///
/// Shapes a token from the provider profile, stores it, and issues the
/// session cookie. Browser flows pass `callbackUrl` and are redirected there;
/// API clients omit it and receive the shaped session. When the request
/// already carries a valid session (token refresh mid-impersonation), the
/// prior token's impersonation state is carried forward.
pub async fn callback(
	State(state): State<AppState>,
	Query(query): Query<CallbackQuery>,
	headers: HeaderMap,
	Json(req): Json<CallbackRequest>,
) -> Response {
	let prior = match extract_session_cookie_with_name(&headers, &state.config.auth.cookie_name) {
		Some(session_id) => state.store.get_token(&session_id).await,
		None => None,
	};

	let roles = extract_roles(&req.profile);
	let user_id = req.id.map(UserId::new).unwrap_or_else(UserId::generate);
	let token = shape_token(user_id, &req.profile, &roles, prior.as_ref());

	tracing::info!(
		user_id = %token.id,
		role = %token.role,
		email = token.email.as_deref().unwrap_or("<none>"),
		"user signed in"
	);

	let session = shape_session(&token);
	let session_id = state.store.issue(token).await;

	let cookie = format!(
		"{}={session_id}; Path=/; HttpOnly; SameSite=Lax",
		state.config.auth.cookie_name
	);
	let headers = AppendHeaders([(SET_COOKIE, cookie)]);

	match query.callback_url.as_deref() {
		Some(destination) => (headers, Redirect::to(destination)).into_response(),
		None => (headers, Json(session)).into_response(),
	}
}

/// POST /auth/signout
///
/// Revokes the session and clears the cookie. Idempotent for clients: a
/// request without a valid session still gets the cleared cookie.
pub async fn signout(State(state): State<AppState>, headers: HeaderMap) -> Response {
	if let Some(session_id) =
		extract_session_cookie_with_name(&headers, &state.config.auth.cookie_name)
	{
		if state.store.revoke(&session_id).await {
			tracing::info!("user signed out");
		}
	}

	let cookie = format!(
		"{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
		state.config.auth.cookie_name
	);
	(
		StatusCode::NO_CONTENT,
		AppendHeaders([(SET_COOKIE, cookie)]),
	)
		.into_response()
}

/// GET /api/session
///
/// Returns the caller's session view; anonymous callers get an empty object
/// rather than an error so clients can poll this unconditionally.
pub async fn current_session(OptionalAuth(session): OptionalAuth) -> Response {
	Json(session).into_response()
}

/// GET /api/me
///
/// Like `/api/session` but 401s for anonymous callers, for clients that want
/// the distinction surfaced as a status code.
pub async fn me(RequireAuth(current): RequireAuth) -> Response {
	Json(current.session).into_response()
}
