// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory token store.
//!
//! Maps opaque session identifiers to [`Token`]s. Tokens are the single
//! mutable authentication record; the impersonation endpoints rewrite them in
//! place and every request re-derives its [`Session`] view from the stored
//! token, so a rewrite is visible on the very next request.

use std::collections::HashMap;

use async_trait::async_trait;
use atrium_server_auth::{shape_session, Session, SessionFetchError, SessionSource, Token};
use tokio::sync::RwLock;

/// In-memory session-to-token map.
#[derive(Default)]
pub struct MemoryTokenStore {
	sessions: RwLock<HashMap<String, Token>>,
}

impl MemoryTokenStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store a token under a fresh opaque session identifier.
	pub async fn issue(&self, token: Token) -> String {
		let session_id = uuid::Uuid::new_v4().to_string();
		self.sessions
			.write()
			.await
			.insert(session_id.clone(), token);
		session_id
	}

	/// Fetch the token for a session identifier.
	pub async fn get_token(&self, session_id: &str) -> Option<Token> {
		self.sessions.read().await.get(session_id).cloned()
	}

	/// Replace the token for an existing session. Returns false when the
	/// session is unknown.
	pub async fn update(&self, session_id: &str, token: Token) -> bool {
		let mut sessions = self.sessions.write().await;
		match sessions.get_mut(session_id) {
			Some(slot) => {
				*slot = token;
				true
			}
			None => false,
		}
	}

	/// Remove a session. Returns false when the session is unknown.
	pub async fn revoke(&self, session_id: &str) -> bool {
		self.sessions.write().await.remove(session_id).is_some()
	}
}

#[async_trait]
impl SessionSource for MemoryTokenStore {
	async fn fetch_session(&self, session_id: &str) -> Result<Option<Session>, SessionFetchError> {
		Ok(self
			.get_token(session_id)
			.await
			.map(|token| shape_session(&token)))
	}
}
