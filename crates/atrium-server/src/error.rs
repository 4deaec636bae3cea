// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API error response types.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};

/// Standard error response body for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Machine-readable error code.
	pub error: String,
	/// Human-readable message.
	pub message: String,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
		}
	}
}

/// Errors surfaced by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error("conflict: {0}")]
	Conflict(String),

	#[error("not found: {0}")]
	NotFound(String),

	#[error("forbidden: {0}")]
	Forbidden(String),
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let (status, code) = match &self {
			ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
			ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
			ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
		};
		let message = match self {
			ApiError::Conflict(m) | ApiError::NotFound(m) | ApiError::Forbidden(m) => m,
		};
		(status, Json(ErrorResponse::new(code, message))).into_response()
	}
}
