// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-based authorization predicate and guard configuration.
//!
//! [`has_required_roles`] is the single decision point every protection shape
//! (route middleware, redirect guard, component guard) funnels through. It
//! fails closed: an absent session, an anonymous session, and an empty
//! allowed-role list with `require_all` set all deny.
//!
//! [`GuardConfig`] packages a guard's inputs with named constructors for the
//! console's protected areas. Every named area implicitly admits
//! administrators alongside the area's own role.

use crate::session::Session;
use crate::types::Role;

/// Where a wrong-role (authenticated but unauthorized) page request lands.
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/unauthorized";

/// The core authorization decision.
///
/// With `require_all` false, the session's effective role must be a member of
/// `allowed_roles`. With `require_all` true the session must satisfy every
/// entry, which under a single-role model means `allowed_roles` is a
/// singleton naming the session's role.
pub fn has_required_roles(
	session: Option<&Session>,
	allowed_roles: &[Role],
	require_all: bool,
) -> bool {
	let Some(session) = session else {
		return false;
	};
	if require_all {
		session.has_all_roles(allowed_roles)
	} else {
		session.has_any_role(allowed_roles)
	}
}

/// Configuration for one guarded route or component.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardConfig {
	/// Roles admitted to the guarded surface.
	pub allowed_roles: Vec<Role>,
	/// Require every entry instead of any entry.
	pub require_all: bool,
	/// Destination for authenticated users holding the wrong role.
	pub redirect_to: String,
}

impl Default for GuardConfig {
	fn default() -> Self {
		GuardConfig {
			allowed_roles: Vec::new(),
			require_all: false,
			redirect_to: DEFAULT_UNAUTHORIZED_PATH.to_string(),
		}
	}
}

impl GuardConfig {
	/// Guard admitting an explicit role list.
	pub fn allowing(allowed_roles: Vec<Role>) -> Self {
		GuardConfig {
			allowed_roles,
			..Default::default()
		}
	}

	/// Administrators only.
	pub fn admin() -> Self {
		Self::allowing(vec![Role::Admin])
	}

	/// Security team, plus administrators.
	pub fn security() -> Self {
		Self::allowing(vec![Role::Admin, Role::Security])
	}

	/// DevOps engineers, plus administrators.
	pub fn devops() -> Self {
		Self::allowing(vec![Role::Admin, Role::Devops])
	}

	/// Database administrators, plus administrators.
	pub fn dba() -> Self {
		Self::allowing(vec![Role::Admin, Role::Dba])
	}

	/// Collaboration team, plus administrators.
	pub fn collab() -> Self {
		Self::allowing(vec![Role::Admin, Role::Collab])
	}

	/// Field technicians, plus administrators.
	pub fn field_tech() -> Self {
		Self::allowing(vec![Role::Admin, Role::FieldTech])
	}

	/// Technology control centre operators, plus administrators.
	pub fn tcc() -> Self {
		Self::allowing(vec![Role::Admin, Role::Tcc])
	}

	pub fn with_require_all(mut self, require_all: bool) -> Self {
		self.require_all = require_all;
		self
	}

	pub fn with_redirect_to(mut self, redirect_to: impl Into<String>) -> Self {
		self.redirect_to = redirect_to.into();
		self
	}

	/// Evaluate this guard against a session.
	pub fn allows(&self, session: Option<&Session>) -> bool {
		has_required_roles(session, &self.allowed_roles, self.require_all)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::{shape_session, Token};
	use crate::types::UserId;

	fn session_with(role: Role) -> Session {
		shape_session(&Token {
			id: UserId::generate(),
			email: None,
			name: None,
			image: None,
			role,
			groups: Vec::new(),
			is_impersonating: false,
			original_roles: Vec::new(),
		})
	}

	mod predicate {
		use super::*;

		#[test]
		fn missing_session_denies() {
			assert!(!has_required_roles(None, &[Role::Admin], false));
			assert!(!has_required_roles(None, &[], false));
		}

		#[test]
		fn anonymous_session_denies() {
			let session = Session::anonymous();
			assert!(!has_required_roles(Some(&session), &[Role::User], false));
		}

		#[test]
		fn any_semantics_accept_membership() {
			let session = session_with(Role::Dba);
			assert!(has_required_roles(
				Some(&session),
				&[Role::Admin, Role::Dba],
				false
			));
			assert!(!has_required_roles(
				Some(&session),
				&[Role::Admin, Role::Security],
				false
			));
		}

		#[test]
		fn all_semantics_require_singleton_equality() {
			let session = session_with(Role::Dba);
			assert!(has_required_roles(Some(&session), &[Role::Dba], true));
			assert!(!has_required_roles(
				Some(&session),
				&[Role::Dba, Role::Admin],
				true
			));
			assert!(!has_required_roles(Some(&session), &[], true));
		}

		#[test]
		fn all_semantics_reject_duplicated_singleton() {
			let session = session_with(Role::Dba);
			assert!(!has_required_roles(
				Some(&session),
				&[Role::Dba, Role::Dba],
				true
			));
		}

		#[test]
		fn empty_allowed_list_denies_under_any_semantics() {
			let session = session_with(Role::Admin);
			assert!(!has_required_roles(Some(&session), &[], false));
		}
	}

	mod config {
		use super::*;

		#[test]
		fn named_guards_admit_admin() {
			let admin = session_with(Role::Admin);
			for guard in [
				GuardConfig::security(),
				GuardConfig::devops(),
				GuardConfig::dba(),
				GuardConfig::collab(),
				GuardConfig::field_tech(),
				GuardConfig::tcc(),
			] {
				assert!(guard.allows(Some(&admin)), "{:?}", guard.allowed_roles);
			}
		}

		#[test]
		fn named_guards_admit_their_own_role_only_otherwise() {
			let dba = session_with(Role::Dba);
			assert!(GuardConfig::dba().allows(Some(&dba)));
			assert!(!GuardConfig::security().allows(Some(&dba)));
			assert!(!GuardConfig::admin().allows(Some(&dba)));
		}

		#[test]
		fn default_redirect_is_unauthorized_page() {
			assert_eq!(GuardConfig::admin().redirect_to, DEFAULT_UNAUTHORIZED_PATH);
			assert_eq!(
				GuardConfig::admin().with_redirect_to("/denied").redirect_to,
				"/denied"
			);
		}
	}
}
