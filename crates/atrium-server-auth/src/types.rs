// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! This module defines:
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs ([`UserId`],
//!   [`SessionId`]) preventing accidental mixing
//! - **[`Role`]**: the closed role vocabulary of the console, with a total
//!   privilege ranking and parsing from raw identity-provider claim values
//!
//! The role set is fixed at build time. Exactly one role is current for a
//! session at any moment; multi-role membership only survives transiently in
//! extracted claim lists and in `original_roles` while impersonating.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(SessionId, "Unique identifier for a session.");

// =============================================================================
// Roles
// =============================================================================

/// The closed role vocabulary of the console.
///
/// Roles are ordered by privilege: [`Role::Admin`] outranks everything,
/// [`Role::User`] is the lowest-privilege default assigned when no claim
/// resolves. The serialized form is the lowercase role name (`"fieldtech"`,
/// not `"field_tech"`), matching what the console persists in tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Full console access; implicitly allowed by every named guard.
	Admin,
	/// Security operations: incidents, policies, endpoint posture.
	Security,
	/// DevOps: pipelines, deployments, infrastructure inventory.
	Devops,
	/// Database administration.
	Dba,
	/// Collaboration tooling administration.
	Collab,
	/// Field technicians: dispatch and on-site work orders.
	#[serde(rename = "fieldtech")]
	FieldTech,
	/// Technology control center operators.
	Tcc,
	/// Baseline authenticated user; the default when no claim resolves.
	User,
}

impl Role {
	/// Returns all roles in rank order (highest privilege first).
	pub fn all() -> &'static [Role] {
		&[
			Role::Admin,
			Role::Security,
			Role::Devops,
			Role::Dba,
			Role::Collab,
			Role::FieldTech,
			Role::Tcc,
			Role::User,
		]
	}

	/// Privilege rank of this role; lower is more privileged.
	pub fn rank(&self) -> u8 {
		match self {
			Role::Admin => 0,
			Role::Security => 1,
			Role::Devops => 2,
			Role::Dba => 3,
			Role::Collab => 4,
			Role::FieldTech => 5,
			Role::Tcc => 6,
			Role::User => 7,
		}
	}

	/// Returns true if this role outranks or equals the given role.
	pub fn outranks(&self, other: &Role) -> bool {
		self.rank() <= other.rank()
	}

	/// Parse a raw identity-provider claim value into a role.
	///
	/// Matching is case-insensitive and tolerates the separator and alias
	/// variations observed across providers (`"Field-Tech"`,
	/// `"field_technician"`, `"Global Administrator"`, ...). Unrecognized
	/// values return `None` and are dropped by the claim extractor, never
	/// errored.
	pub fn from_claim(raw: &str) -> Option<Role> {
		let normalized: String = raw
			.trim()
			.chars()
			.filter(|c| !matches!(c, ' ' | '-' | '_' | '.'))
			.collect::<String>()
			.to_lowercase();

		match normalized.as_str() {
			"admin" | "administrator" | "globaladministrator" => Some(Role::Admin),
			"security" | "securityadministrator" | "securityreader" => Some(Role::Security),
			"devops" => Some(Role::Devops),
			"dba" | "databaseadministrator" => Some(Role::Dba),
			"collab" | "collaboration" => Some(Role::Collab),
			"fieldtech" | "fieldtechnician" => Some(Role::FieldTech),
			"tcc" => Some(Role::Tcc),
			"user" | "member" => Some(Role::User),
			_ => None,
		}
	}
}

impl Default for Role {
	/// The lowest-privilege role, assigned whenever no claim resolves.
	fn default() -> Self {
		Role::User
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Role::Admin => write!(f, "admin"),
			Role::Security => write!(f, "security"),
			Role::Devops => write!(f, "devops"),
			Role::Dba => write!(f, "dba"),
			Role::Collab => write!(f, "collab"),
			Role::FieldTech => write!(f, "fieldtech"),
			Role::Tcc => write!(f, "tcc"),
			Role::User => write!(f, "user"),
		}
	}
}
