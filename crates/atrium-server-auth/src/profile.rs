// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity-provider profile model and role-claim extraction.
//!
//! The identity provider asserts role membership in one of several payload
//! shapes depending on how the tenant directory is configured:
//!
//! - a plain `roles` array,
//! - an application-role `appRoles` array,
//! - a `wids` array of well-known directory role template IDs,
//! - a namespaced role-claim key ([`ROLE_CLAIM_KEY`]).
//!
//! [`extract_roles`] inspects these locations in that fixed priority order and
//! normalizes the **first** non-empty candidate into the [`Role`] vocabulary.
//! Candidates are never merged: a tenant that populates both `roles` and
//! `appRoles` gets only `roles`. Unrecognized claim values are dropped, not
//! errored, and an entirely claimless profile yields an empty list, which
//! downstream token shaping turns into the default role.

use crate::types::Role;
use serde::{Deserialize, Serialize};

/// The namespaced role-claim key emitted by WS-Fed/SAML-bridged tenants.
pub const ROLE_CLAIM_KEY: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Well-known directory role template IDs carried in the `wids` claim.
///
/// Only the templates the console cares about are mapped; anything else in
/// `wids` is dropped like any other unrecognized claim value.
const WELL_KNOWN_WIDS: &[(&str, Role)] = &[
	// Global Administrator
	("62e90394-69f5-4237-9190-012177145e10", Role::Admin),
	// Security Administrator
	("194ae4cb-b126-40b2-bd5b-6091b380977d", Role::Security),
	// Security Reader
	("5d6b6bb7-de71-4623-b4af-96380a352509", Role::Security),
];

/// Raw sign-in payload from the external identity provider.
///
/// Produced once per sign-in and not retained; the claim extractor and token
/// shaper consume it immediately. All fields are optional because the provider
/// payload is dictated externally - this core only documents the fields it
/// reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityProfile {
	/// Primary email address, if the provider released it.
	#[serde(default)]
	pub email: Option<String>,
	/// Display name, if set.
	#[serde(default)]
	pub name: Option<String>,
	/// Avatar image URL, if available.
	#[serde(default)]
	pub image: Option<String>,
	/// Plain role claim array (highest-priority candidate).
	#[serde(default)]
	pub roles: Option<Vec<String>>,
	/// Application-role claim array.
	#[serde(default, rename = "appRoles")]
	pub app_roles: Option<Vec<String>>,
	/// Well-known directory role template IDs.
	#[serde(default)]
	pub wids: Option<Vec<String>>,
	/// Namespaced role claim (lowest-priority candidate).
	#[serde(default, rename = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role")]
	pub namespaced_roles: Option<Vec<String>>,
	/// Directory group memberships, copied verbatim into the token.
	#[serde(default)]
	pub groups: Vec<String>,
}

/// A single claim-extraction strategy: a named location in the profile and a
/// pure lookup for its raw values.
struct ClaimStrategy {
	source: &'static str,
	lookup: fn(&IdentityProfile) -> Option<&[String]>,
}

/// Candidate claim locations in fixed priority order; first non-empty wins.
const CLAIM_STRATEGIES: &[ClaimStrategy] = &[
	ClaimStrategy {
		source: "roles",
		lookup: |p| p.roles.as_deref(),
	},
	ClaimStrategy {
		source: "appRoles",
		lookup: |p| p.app_roles.as_deref(),
	},
	ClaimStrategy {
		source: "wids",
		lookup: |p| p.wids.as_deref(),
	},
	ClaimStrategy {
		source: ROLE_CLAIM_KEY,
		lookup: |p| p.namespaced_roles.as_deref(),
	},
];

/// Extract a normalized, ordered role list from an identity profile.
///
/// The first claim location with a non-empty array is selected; later
/// locations are ignored even when they would resolve to more roles. The
/// returned list preserves the claim order, deduplicated on first occurrence.
/// Returns an empty list when no candidate is non-empty; callers default the
/// primary role to [`Role::User`] in that case.
pub fn extract_roles(profile: &IdentityProfile) -> Vec<Role> {
	for strategy in CLAIM_STRATEGIES {
		let Some(raw) = (strategy.lookup)(profile) else {
			continue;
		};
		if raw.is_empty() {
			continue;
		}

		let mut roles = Vec::new();
		for value in raw {
			let Some(role) = parse_claim_value(strategy.source, value) else {
				tracing::debug!(source = strategy.source, value = %value, "dropping unrecognized role claim");
				continue;
			};
			if !roles.contains(&role) {
				roles.push(role);
			}
		}

		tracing::debug!(
			source = strategy.source,
			resolved = roles.len(),
			"extracted role claims"
		);
		return roles;
	}

	Vec::new()
}

/// Map one raw claim value to the role vocabulary.
///
/// `wids` values are directory role template IDs and go through the
/// well-known table; every other source parses by name.
fn parse_claim_value(source: &str, value: &str) -> Option<Role> {
	if source == "wids" {
		let needle = value.trim();
		return WELL_KNOWN_WIDS
			.iter()
			.find(|(wid, _)| wid.eq_ignore_ascii_case(needle))
			.map(|(_, role)| *role);
	}

	Role::from_claim(value)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn profile() -> IdentityProfile {
		IdentityProfile {
			email: Some("ops@example.com".to_string()),
			name: Some("Ops Person".to_string()),
			..Default::default()
		}
	}

	mod priority_order {
		use super::*;

		#[test]
		fn roles_wins_over_app_roles() {
			let mut p = profile();
			p.roles = Some(vec!["Admin".to_string()]);
			p.app_roles = Some(vec!["DBA".to_string()]);

			assert_eq!(extract_roles(&p), vec![Role::Admin]);
		}

		#[test]
		fn empty_roles_falls_through_to_app_roles() {
			let mut p = profile();
			p.roles = Some(Vec::new());
			p.app_roles = Some(vec!["devops".to_string()]);

			assert_eq!(extract_roles(&p), vec![Role::Devops]);
		}

		#[test]
		fn wids_used_when_earlier_candidates_absent() {
			let mut p = profile();
			p.wids = Some(vec!["62e90394-69f5-4237-9190-012177145e10".to_string()]);

			assert_eq!(extract_roles(&p), vec![Role::Admin]);
		}

		#[test]
		fn namespaced_claim_is_last_resort() {
			let mut p = profile();
			p.namespaced_roles = Some(vec!["security".to_string()]);

			assert_eq!(extract_roles(&p), vec![Role::Security]);
		}

		#[test]
		fn no_merging_across_sources() {
			let mut p = profile();
			p.roles = Some(vec!["tcc".to_string()]);
			p.wids = Some(vec!["62e90394-69f5-4237-9190-012177145e10".to_string()]);

			// wids would add Admin - first-match-wins means it never runs.
			assert_eq!(extract_roles(&p), vec![Role::Tcc]);
		}
	}

	mod normalization {
		use super::*;

		#[test]
		fn unrecognized_values_are_dropped_not_errored() {
			let mut p = profile();
			p.roles = Some(vec![
				"Admin".to_string(),
				"totally-made-up".to_string(),
				"dba".to_string(),
			]);

			assert_eq!(extract_roles(&p), vec![Role::Admin, Role::Dba]);
		}

		#[test]
		fn a_fully_unrecognized_list_yields_empty() {
			let mut p = profile();
			p.roles = Some(vec!["nope".to_string(), "also-nope".to_string()]);

			assert_eq!(extract_roles(&p), Vec::<Role>::new());
		}

		#[test]
		fn duplicates_collapse_preserving_first_occurrence() {
			let mut p = profile();
			p.roles = Some(vec![
				"dba".to_string(),
				"admin".to_string(),
				"DBA".to_string(),
			]);

			assert_eq!(extract_roles(&p), vec![Role::Dba, Role::Admin]);
		}

		#[test]
		fn security_reader_wid_maps_to_security() {
			let mut p = profile();
			p.wids = Some(vec!["5d6b6bb7-de71-4623-b4af-96380a352509".to_string()]);

			assert_eq!(extract_roles(&p), vec![Role::Security]);
		}

		#[test]
		fn unknown_wids_are_dropped() {
			let mut p = profile();
			p.wids = Some(vec![
				"00000000-0000-0000-0000-000000000000".to_string(),
				"194ae4cb-b126-40b2-bd5b-6091b380977d".to_string(),
			]);

			assert_eq!(extract_roles(&p), vec![Role::Security]);
		}
	}

	mod empty_profiles {
		use super::*;

		#[test]
		fn all_claim_fields_absent_yields_empty() {
			assert_eq!(extract_roles(&profile()), Vec::<Role>::new());
		}

		#[test]
		fn all_claim_fields_empty_yields_empty() {
			let mut p = profile();
			p.roles = Some(Vec::new());
			p.app_roles = Some(Vec::new());
			p.wids = Some(Vec::new());
			p.namespaced_roles = Some(Vec::new());

			assert_eq!(extract_roles(&p), Vec::<Role>::new());
		}
	}

	mod deserialization {
		use super::*;

		#[test]
		fn parses_namespaced_claim_key() {
			let json = format!(
				"{{\"email\":\"a@b.c\",\"{ROLE_CLAIM_KEY}\":[\"admin\"]}}"
			);
			let p: IdentityProfile = serde_json::from_str(&json).unwrap();
			assert_eq!(p.namespaced_roles, Some(vec!["admin".to_string()]));
		}

		#[test]
		fn parses_app_roles_camel_case() {
			let p: IdentityProfile =
				serde_json::from_str("{\"appRoles\":[\"dba\"]}").unwrap();
			assert_eq!(p.app_roles, Some(vec!["dba".to_string()]));
		}

		#[test]
		fn tolerates_unknown_fields() {
			let p: IdentityProfile = serde_json::from_str(
				"{\"email\":\"a@b.c\",\"oid\":\"x\",\"tid\":\"y\"}",
			)
			.unwrap();
			assert_eq!(p.email.as_deref(), Some("a@b.c"));
		}
	}
}
