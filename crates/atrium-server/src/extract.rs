// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Handler-level session extractors.

use axum::{extract::FromRequestParts, http::request::Parts, response::Response};
use atrium_server_auth::Session;

use crate::auth_middleware::CurrentSession;
use crate::guard_middleware::unauthorized_response;

/// Extractor that rejects unauthenticated requests with 401.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub CurrentSession);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = Response;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		parts
			.extensions
			.get::<CurrentSession>()
			.filter(|current| current.session.is_authenticated())
			.cloned()
			.map(RequireAuth)
			.ok_or_else(unauthorized_response)
	}
}

/// Extractor that always succeeds, yielding the anonymous session when the
/// request carries no usable credentials.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Session);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(OptionalAuth(
			parts
				.extensions
				.get::<Session>()
				.cloned()
				.unwrap_or_else(Session::anonymous),
		))
	}
}
