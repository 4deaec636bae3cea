// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Impersonation state transitions.
//!
//! Impersonation lets an administrator temporarily assume another role to see
//! the console exactly as that role sees it. The state machine has two states
//! (normal, impersonating) and two transitions, both expressed as pure token
//! rewrites here; the HTTP layer owns admin gating, persistence, and audit
//! logging. Nesting is rejected: starting a second impersonation while one is
//! active fails rather than stacking or silently switching.

use crate::session::Token;
use crate::types::Role;

/// Why an impersonation transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ImpersonationError {
	/// A start was requested while an impersonation is already active.
	#[error("an impersonation is already active; stop it before starting another")]
	AlreadyImpersonating,
	/// A stop was requested but no impersonation is active.
	#[error("no impersonation is active")]
	NotImpersonating,
}

impl Token {
	/// Begin impersonating `assumed`, stashing the real role for restore.
	///
	/// Fails with [`ImpersonationError::AlreadyImpersonating`] when the token
	/// is already impersonating. Assuming the role the token already holds is
	/// permitted; the transition is still recorded so the stop path behaves
	/// identically.
	pub fn begin_impersonation(&self, assumed: Role) -> Result<Token, ImpersonationError> {
		if self.is_impersonating {
			return Err(ImpersonationError::AlreadyImpersonating);
		}

		let mut token = self.clone();
		token.original_roles = vec![self.role];
		token.role = assumed;
		token.is_impersonating = true;
		Ok(token)
	}

	/// End the active impersonation, restoring the stashed role.
	///
	/// Fails with [`ImpersonationError::NotImpersonating`] when no
	/// impersonation is active. A token whose restore list was lost falls
	/// back to the default role rather than staying stuck in the assumed one.
	pub fn end_impersonation(&self) -> Result<Token, ImpersonationError> {
		if !self.is_impersonating {
			return Err(ImpersonationError::NotImpersonating);
		}

		let mut token = self.clone();
		token.role = self.original_roles.first().copied().unwrap_or_default();
		token.original_roles = Vec::new();
		token.is_impersonating = false;
		Ok(token)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::UserId;

	fn admin_token() -> Token {
		Token {
			id: UserId::generate(),
			email: Some("admin@example.com".to_string()),
			name: None,
			image: None,
			role: Role::Admin,
			groups: Vec::new(),
			is_impersonating: false,
			original_roles: Vec::new(),
		}
	}

	#[test]
	fn begin_swaps_role_and_records_original() {
		let token = admin_token().begin_impersonation(Role::Dba).unwrap();
		assert_eq!(token.role, Role::Dba);
		assert!(token.is_impersonating);
		assert_eq!(token.original_roles, vec![Role::Admin]);
	}

	#[test]
	fn nested_begin_is_rejected() {
		let token = admin_token().begin_impersonation(Role::Dba).unwrap();
		assert_eq!(
			token.begin_impersonation(Role::Security),
			Err(ImpersonationError::AlreadyImpersonating)
		);
		// The active impersonation is untouched by the failed attempt.
		assert_eq!(token.role, Role::Dba);
	}

	#[test]
	fn end_restores_original_role() {
		let token = admin_token()
			.begin_impersonation(Role::FieldTech)
			.unwrap()
			.end_impersonation()
			.unwrap();
		assert_eq!(token.role, Role::Admin);
		assert!(!token.is_impersonating);
		assert!(token.original_roles.is_empty());
	}

	#[test]
	fn end_without_active_impersonation_is_rejected() {
		assert_eq!(
			admin_token().end_impersonation(),
			Err(ImpersonationError::NotImpersonating)
		);
	}

	#[test]
	fn end_with_lost_restore_data_falls_back_to_default() {
		let mut token = admin_token().begin_impersonation(Role::Tcc).unwrap();
		token.original_roles.clear();

		let restored = token.end_impersonation().unwrap();
		assert_eq!(restored.role, Role::User);
	}

	#[test]
	fn self_impersonation_is_permitted() {
		let token = admin_token().begin_impersonation(Role::Admin).unwrap();
		assert!(token.is_impersonating);
		assert_eq!(token.end_impersonation().unwrap().role, Role::Admin);
	}
}
