// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Impersonation administration endpoints.
//!
//! Starting an impersonation requires the admin role (enforced by a
//! [`RequireRoles`](crate::guard_middleware::RequireRoles) route layer).
//! Inspecting and stopping require only an authenticated session, because a
//! mid-impersonation admin's effective role is the assumed one; the state
//! endpoint additionally rejects callers who are neither admin nor currently
//! impersonating so ordinary users cannot probe it.

use axum::{extract::State, response::{IntoResponse, Response}, Json};
use atrium_server_auth::{Role, Token};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::RequireAuth;
use crate::guard_middleware::{forbidden_response, unauthorized_response};
use crate::AppState;

/// Request body for starting an impersonation.
#[derive(Debug, Deserialize)]
pub struct ImpersonateRequest {
	/// Role to assume.
	pub role: Role,
	/// Free-text justification, recorded in the audit log.
	pub reason: String,
}

/// Impersonation state as reported to admin tooling.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpersonationStateResponse {
	pub is_impersonating: bool,
	pub role: Role,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub original_roles: Vec<Role>,
}

impl From<&Token> for ImpersonationStateResponse {
	fn from(token: &Token) -> Self {
		Self {
			is_impersonating: token.is_impersonating,
			role: token.role,
			original_roles: token.original_roles.clone(),
		}
	}
}

/// GET /api/admin/impersonate/state
pub async fn impersonation_state(
	State(state): State<AppState>,
	RequireAuth(current): RequireAuth,
) -> Response {
	let Some(token) = state.store.get_token(&current.id).await else {
		return unauthorized_response();
	};

	if token.role != Role::Admin && !token.is_impersonating {
		return forbidden_response();
	}

	Json(ImpersonationStateResponse::from(&token)).into_response()
}

/// POST /api/admin/impersonate
pub async fn start_impersonation(
	State(state): State<AppState>,
	RequireAuth(current): RequireAuth,
	Json(req): Json<ImpersonateRequest>,
) -> Response {
	let Some(token) = state.store.get_token(&current.id).await else {
		return unauthorized_response();
	};

	let impersonating = match token.begin_impersonation(req.role) {
		Ok(token) => token,
		// Only AlreadyImpersonating can occur here.
		Err(err) => return ApiError::Conflict(err.to_string()).into_response(),
	};

	tracing::info!(
		actor = %impersonating.id,
		email = impersonating.email.as_deref().unwrap_or("<none>"),
		assumed_role = %req.role,
		reason = %req.reason,
		"impersonation started"
	);

	if !state.store.update(&current.id, impersonating.clone()).await {
		return unauthorized_response();
	}

	Json(ImpersonationStateResponse::from(&impersonating)).into_response()
}

/// POST /api/admin/impersonate/stop
pub async fn stop_impersonation(
	State(state): State<AppState>,
	RequireAuth(current): RequireAuth,
) -> Response {
	let Some(token) = state.store.get_token(&current.id).await else {
		return unauthorized_response();
	};

	let restored = match token.end_impersonation() {
		Ok(token) => token,
		// Only NotImpersonating can occur here.
		Err(err) => return ApiError::NotFound(err.to_string()).into_response(),
	};

	tracing::info!(
		actor = %restored.id,
		email = restored.email.as_deref().unwrap_or("<none>"),
		restored_role = %restored.role,
		"impersonation stopped"
	);

	if !state.store.update(&current.id, restored.clone()).await {
		return unauthorized_response();
	}

	Json(ImpersonationStateResponse::from(&restored)).into_response()
}
