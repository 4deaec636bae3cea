// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session lookup abstraction.
//!
//! The HTTP layer resolves a session identifier to a [`Session`] through this
//! trait once per request; no per-request caching sits in front of it.
//! Callers treat every failure as unauthenticated - a broken backend must
//! never widen access.

use crate::session::Session;
use async_trait::async_trait;

/// Why a session lookup failed.
#[derive(Debug, thiserror::Error)]
pub enum SessionFetchError {
	/// The backing store could not be reached or errored.
	#[error("session backend error: {0}")]
	Backend(String),
	/// The stored record exists but could not be interpreted.
	#[error("stored session record is malformed")]
	Malformed,
}

/// Resolves session identifiers to sessions.
#[async_trait]
pub trait SessionSource: Send + Sync {
	/// Fetch the session for `session_id`.
	///
	/// `Ok(None)` means the identifier is unknown or expired; an error means
	/// the lookup itself failed. Callers map both to an anonymous session.
	async fn fetch_session(&self, session_id: &str) -> Result<Option<Session>, SessionFetchError>;
}
