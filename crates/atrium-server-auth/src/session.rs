// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token and session shaping.
//!
//! Two artifacts flow out of a sign-in:
//!
//! - a [`Token`]: the durable server-side record, shaped once at sign-in by
//!   [`shape_token`] and rewritten only by the impersonation operations;
//! - a [`Session`]: the client-visible projection, derived from the token on
//!   every request by [`shape_session`].
//!
//! Shaping is total: malformed or missing fields degrade to defaults rather
//!   than failing the sign-in. The session projection caps group membership at
//! [`MAX_SESSION_GROUPS`] entries and exposes `original_roles` only while an
//! impersonation is active, so a non-impersonating session never leaks the
//! field at all.

use crate::profile::IdentityProfile;
use crate::types::{Role, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of directory groups carried into the client session.
///
/// The token keeps the full list; the projection truncates to keep the
/// serialized session cookie-sized for tenants with large directories.
pub const MAX_SESSION_GROUPS: usize = 5;

// =============================================================================
// Token
// =============================================================================

/// Durable server-side authentication record for one signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
	/// Stable user identifier.
	pub id: UserId,
	/// Primary email address.
	#[serde(default)]
	pub email: Option<String>,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Avatar image URL.
	#[serde(default)]
	pub image: Option<String>,
	/// Effective primary role. While impersonating this is the assumed role.
	#[serde(default)]
	pub role: Role,
	/// Full directory group list, untruncated.
	#[serde(default)]
	pub groups: Vec<String>,
	/// True while an impersonation is active.
	#[serde(default)]
	pub is_impersonating: bool,
	/// Real roles to restore when impersonation ends. Non-empty iff
	/// `is_impersonating` is true.
	#[serde(default)]
	pub original_roles: Vec<Role>,
}

/// Shape a token from a fresh identity-provider profile.
///
/// `roles` is the output of [`crate::profile::extract_roles`]; the first
/// entry becomes the primary role and an empty list falls back to
/// [`Role::User`]. When `prior` carries an active impersonation (token
/// re-issuance mid-impersonation), the impersonation state is carried forward
/// instead of being silently reset by the refresh.
pub fn shape_token(
	id: UserId,
	profile: &IdentityProfile,
	roles: &[Role],
	prior: Option<&Token>,
) -> Token {
	let mut token = Token {
		id,
		email: profile.email.clone(),
		name: profile.name.clone(),
		image: profile.image.clone(),
		role: roles.first().copied().unwrap_or_default(),
		groups: profile.groups.clone(),
		is_impersonating: false,
		original_roles: Vec::new(),
	};

	if let Some(prior) = prior {
		if prior.is_impersonating {
			token.role = prior.role;
			token.is_impersonating = true;
			token.original_roles = prior.original_roles.clone();
		}
	}

	token
}

impl Token {
	/// Reconstruct a token from an arbitrary JSON payload.
	///
	/// Providers and upstream middleware nest fields inconsistently, so each
	/// field is resolved through an ordered lookup: the top level first, then
	/// an `additionalFields` object, then a `data` object. The first location
	/// where the field is present wins. Reconstruction is total - missing or
	/// mistyped fields degrade to defaults, and a payload with no usable `id`
	/// gets the nil identifier.
	pub fn from_payload(payload: &Value) -> Token {
		let id = resolve_field(payload, "id")
			.and_then(Value::as_str)
			.and_then(|raw| raw.parse::<uuid::Uuid>().ok())
			.map(UserId::new)
			.unwrap_or_else(|| UserId::new(uuid::Uuid::nil()));

		let role = resolve_field(payload, "role")
			.and_then(Value::as_str)
			.and_then(Role::from_claim)
			.unwrap_or_default();

		Token {
			id,
			email: resolve_string(payload, "email"),
			name: resolve_string(payload, "name"),
			image: resolve_string(payload, "image"),
			role,
			groups: resolve_string_array(payload, "groups"),
			is_impersonating: resolve_field(payload, "isImpersonating")
				.and_then(Value::as_bool)
				.unwrap_or(false),
			original_roles: resolve_field(payload, "originalRoles")
				.and_then(Value::as_array)
				.map(|values| {
					values
						.iter()
						.filter_map(Value::as_str)
						.filter_map(Role::from_claim)
						.collect()
				})
				.unwrap_or_default(),
		}
	}
}

/// Resolve a field through the ordered payload locations.
fn resolve_field<'a>(payload: &'a Value, key: &str) -> Option<&'a Value> {
	if let Some(value) = payload.get(key) {
		return Some(value);
	}
	for nested in ["additionalFields", "data"] {
		if let Some(value) = payload.get(nested).and_then(|v| v.get(key)) {
			return Some(value);
		}
	}
	None
}

fn resolve_string(payload: &Value, key: &str) -> Option<String> {
	resolve_field(payload, key)
		.and_then(Value::as_str)
		.map(str::to_string)
}

fn resolve_string_array(payload: &Value, key: &str) -> Vec<String> {
	resolve_field(payload, key)
		.and_then(Value::as_array)
		.map(|values| {
			values
				.iter()
				.filter_map(Value::as_str)
				.map(str::to_string)
				.collect()
		})
		.unwrap_or_default()
}

// =============================================================================
// Session
// =============================================================================

/// Client-visible view of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
	pub id: UserId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	pub role: Role,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub groups: Vec<String>,
	pub is_impersonating: bool,
	/// Present only while impersonating.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub original_roles: Vec<Role>,
}

/// A request-scoped session: either anonymous or carrying a user view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user: Option<SessionUser>,
}

impl Session {
	/// The session of an unauthenticated request.
	pub fn anonymous() -> Self {
		Session { user: None }
	}

	pub fn is_authenticated(&self) -> bool {
		self.user.is_some()
	}

	/// The effective primary role, if authenticated.
	pub fn role(&self) -> Option<Role> {
		self.user.as_ref().map(|u| u.role)
	}

	pub fn has_role(&self, role: Role) -> bool {
		self.role() == Some(role)
	}

	pub fn has_any_role(&self, roles: &[Role]) -> bool {
		self.role().is_some_and(|r| roles.contains(&r))
	}

	/// True only when `roles` is exactly one entry and it names the
	/// session's effective role. A session carries a single role, so any
	/// longer list (duplicates included) cannot be fully satisfied.
	pub fn has_all_roles(&self, roles: &[Role]) -> bool {
		match self.role() {
			Some(r) => roles.len() == 1 && roles[0] == r,
			None => false,
		}
	}
}

/// Project a token into the client-visible session view.
///
/// Groups are truncated to [`MAX_SESSION_GROUPS`] and `original_roles` is
/// carried only while impersonating, even if stale restore data lingers on
/// the token.
pub fn shape_session(token: &Token) -> Session {
	let groups = token
		.groups
		.iter()
		.take(MAX_SESSION_GROUPS)
		.cloned()
		.collect();

	Session {
		user: Some(SessionUser {
			id: token.id,
			email: token.email.clone(),
			name: token.name.clone(),
			image: token.image.clone(),
			role: token.role,
			groups,
			is_impersonating: token.is_impersonating,
			original_roles: if token.is_impersonating {
				token.original_roles.clone()
			} else {
				Vec::new()
			},
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn user_id() -> UserId {
		UserId::new(uuid::Uuid::from_u128(7))
	}

	fn signed_in_token(role: Role) -> Token {
		Token {
			id: user_id(),
			email: Some("ops@example.com".to_string()),
			name: Some("Ops Person".to_string()),
			image: None,
			role,
			groups: Vec::new(),
			is_impersonating: false,
			original_roles: Vec::new(),
		}
	}

	mod token_shaping {
		use super::*;

		#[test]
		fn first_extracted_role_becomes_primary() {
			let token = shape_token(
				user_id(),
				&IdentityProfile::default(),
				&[Role::Dba, Role::Admin],
				None,
			);
			assert_eq!(token.role, Role::Dba);
		}

		#[test]
		fn empty_role_list_defaults_to_user() {
			let token = shape_token(user_id(), &IdentityProfile::default(), &[], None);
			assert_eq!(token.role, Role::User);
			assert!(!token.is_impersonating);
		}

		#[test]
		fn token_keeps_full_group_list() {
			let profile = IdentityProfile {
				groups: (0..8).map(|i| format!("group-{i}")).collect(),
				..Default::default()
			};
			let token = shape_token(user_id(), &profile, &[Role::Admin], None);
			assert_eq!(token.groups.len(), 8);
		}

		#[test]
		fn reissuance_preserves_active_impersonation() {
			let mut prior = signed_in_token(Role::Dba);
			prior.is_impersonating = true;
			prior.original_roles = vec![Role::Admin];

			let token = shape_token(
				user_id(),
				&IdentityProfile::default(),
				&[Role::Admin],
				Some(&prior),
			);
			assert_eq!(token.role, Role::Dba);
			assert!(token.is_impersonating);
			assert_eq!(token.original_roles, vec![Role::Admin]);
		}

		#[test]
		fn reissuance_without_impersonation_uses_fresh_claims() {
			let prior = signed_in_token(Role::Dba);
			let token = shape_token(
				user_id(),
				&IdentityProfile::default(),
				&[Role::Security],
				Some(&prior),
			);
			assert_eq!(token.role, Role::Security);
		}
	}

	mod payload_reconstruction {
		use super::*;

		#[test]
		fn top_level_fields_win() {
			let payload = json!({
				"id": uuid::Uuid::from_u128(7).to_string(),
				"role": "admin",
				"additionalFields": { "role": "user" },
			});
			let token = Token::from_payload(&payload);
			assert_eq!(token.id, user_id());
			assert_eq!(token.role, Role::Admin);
		}

		#[test]
		fn falls_back_to_additional_fields_then_data() {
			let payload = json!({
				"additionalFields": { "role": "dba" },
				"data": { "role": "admin", "email": "x@y.z" },
			});
			let token = Token::from_payload(&payload);
			assert_eq!(token.role, Role::Dba);
			assert_eq!(token.email.as_deref(), Some("x@y.z"));
		}

		#[test]
		fn garbage_payload_degrades_to_defaults() {
			let token = Token::from_payload(&json!({ "role": 42, "groups": "nope" }));
			assert_eq!(token.id, UserId::new(uuid::Uuid::nil()));
			assert_eq!(token.role, Role::User);
			assert!(token.groups.is_empty());
			assert!(!token.is_impersonating);
		}

		#[test]
		fn impersonation_fields_round_trip() {
			let payload = json!({
				"role": "tcc",
				"isImpersonating": true,
				"originalRoles": ["admin"],
			});
			let token = Token::from_payload(&payload);
			assert!(token.is_impersonating);
			assert_eq!(token.original_roles, vec![Role::Admin]);
		}
	}

	mod session_projection {
		use super::*;

		#[test]
		fn groups_are_capped() {
			let mut token = signed_in_token(Role::Admin);
			token.groups = (0..8).map(|i| format!("group-{i}")).collect();

			let session = shape_session(&token);
			let user = session.user.unwrap();
			assert_eq!(user.groups.len(), MAX_SESSION_GROUPS);
			assert_eq!(user.groups[0], "group-0");
			assert_eq!(user.groups[4], "group-4");
		}

		#[test]
		fn original_roles_present_iff_impersonating() {
			let mut token = signed_in_token(Role::Dba);
			token.original_roles = vec![Role::Admin];

			// Stale restore data without the flag must not surface.
			let session = shape_session(&token);
			assert!(session.user.as_ref().unwrap().original_roles.is_empty());

			token.is_impersonating = true;
			let session = shape_session(&token);
			assert_eq!(
				session.user.unwrap().original_roles,
				vec![Role::Admin]
			);
		}

		#[test]
		fn serialized_session_omits_empty_impersonation_fields() {
			let session = shape_session(&signed_in_token(Role::User));
			let json = serde_json::to_value(&session).unwrap();
			let user = &json["user"];
			assert!(user.get("originalRoles").is_none());
			assert_eq!(user["isImpersonating"], json!(false));
			assert_eq!(user["role"], json!("user"));
		}
	}

	mod predicates {
		use super::*;

		#[test]
		fn anonymous_session_fails_every_check() {
			let session = Session::anonymous();
			assert!(!session.is_authenticated());
			assert!(!session.has_role(Role::Admin));
			assert!(!session.has_any_role(&[Role::Admin, Role::User]));
			assert!(!session.has_all_roles(&[Role::User]));
		}

		#[test]
		fn has_any_role_matches_membership() {
			let session = shape_session(&signed_in_token(Role::Security));
			assert!(session.has_any_role(&[Role::Admin, Role::Security]));
			assert!(!session.has_any_role(&[Role::Admin, Role::Dba]));
		}

		#[test]
		fn has_all_roles_requires_singleton_match() {
			let session = shape_session(&signed_in_token(Role::Security));
			assert!(session.has_all_roles(&[Role::Security]));
			assert!(!session.has_all_roles(&[Role::Security, Role::Admin]));
			assert!(!session.has_all_roles(&[Role::Security, Role::Security]));
			assert!(!session.has_all_roles(&[]));
		}
	}
}
