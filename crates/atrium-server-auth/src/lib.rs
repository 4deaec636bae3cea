// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization core for the Atrium operations console.
//!
//! This crate contains the pure parts of Atrium's authentication and
//! authorization model:
//!
//! - [`Role`] - the closed role vocabulary and its ranking
//! - [`IdentityProfile`] / [`extract_roles`] - normalization of identity
//!   provider claims into the role vocabulary
//! - [`Token`] / [`Session`] - the persisted principal representation and its
//!   per-request reconstruction
//! - [`has_required_roles`] / [`GuardConfig`] - the authorization predicate and
//!   per-guard configuration consumed by route and component protection
//! - [`SessionSource`] - the injected session-fetch capability
//!
//! Everything here is side-effect free except [`SessionSource`], which is the
//! single async seam to the external auth provider. Guards and shaping never
//! fail: malformed upstream data degrades to defaults, and authorization
//! failures are ordinary `false` results for the caller to surface.

pub mod guard;
pub mod headers;
pub mod impersonation;
pub mod profile;
pub mod session;
pub mod source;
pub mod types;

pub use guard::{has_required_roles, GuardConfig, DEFAULT_UNAUTHORIZED_PATH};
pub use headers::{
	extract_bearer_token, extract_session_cookie, extract_session_cookie_with_name,
	SESSION_COOKIE_NAME,
};
pub use impersonation::ImpersonationError;
pub use profile::{extract_roles, IdentityProfile, ROLE_CLAIM_KEY};
pub use session::{shape_session, shape_token, Session, SessionUser, Token, MAX_SESSION_GROUPS};
pub use source::{SessionFetchError, SessionSource};
pub use types::{Role, SessionId, UserId};
