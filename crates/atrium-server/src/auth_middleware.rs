// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session-loading middleware.
//!
//! Runs in front of every route: resolves the session id (the session cookie,
//! or `Authorization: Bearer` for non-browser clients) through the configured
//! [`SessionSource`](atrium_server_auth::SessionSource) and inserts the
//! resulting [`Session`] into request extensions. A missing credential, an
//! unknown session id, and a backend failure all degrade to the anonymous
//! session; downstream guards never see a lookup error widen access.

use axum::{
	extract::{Request, State},
	middleware::Next,
	response::Response,
};
use atrium_server_auth::{extract_bearer_token, extract_session_cookie_with_name, Session};

use crate::AppState;

/// The resolved session of an authenticated request, keyed for handlers that
/// need to write back through the store (sign-out, impersonation).
#[derive(Debug, Clone)]
pub struct CurrentSession {
	/// Opaque session identifier from the cookie or bearer token.
	pub id: String,
	pub session: Session,
}

/// Resolve the request's session and stash it in extensions.
///
/// The cookie wins when both credentials are present.
pub async fn load_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
	let session_id = extract_session_cookie_with_name(req.headers(), &state.config.auth.cookie_name)
		.or_else(|| extract_bearer_token(req.headers()));

	let session = match session_id {
		Some(session_id) => match state.session_source.fetch_session(&session_id).await {
			Ok(Some(session)) => {
				req.extensions_mut().insert(CurrentSession {
					id: session_id,
					session: session.clone(),
				});
				session
			}
			Ok(None) => {
				tracing::debug!("session id did not resolve, treating as unauthenticated");
				Session::anonymous()
			}
			Err(error) => {
				tracing::warn!(%error, "session lookup failed, treating as unauthenticated");
				Session::anonymous()
			}
		},
		None => Session::anonymous(),
	};

	req.extensions_mut().insert(session);
	next.run(req).await
}
