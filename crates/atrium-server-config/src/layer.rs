// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The top-level mergeable configuration layer.

use serde::Deserialize;

use crate::sections::{AuthConfigLayer, HttpConfigLayer, LoggingConfigLayer};

/// A partial server configuration from one source, merged by precedence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub auth: Option<AuthConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ServerConfigLayer {
	/// Merge `other` over `self` field-by-field.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		match (&mut self.http, other.http) {
			(Some(base), Some(over)) => base.merge(over),
			(slot @ None, Some(over)) => *slot = Some(over),
			_ => {}
		}
		match (&mut self.auth, other.auth) {
			(Some(base), Some(over)) => base.merge(over),
			(slot @ None, Some(over)) => *slot = Some(over),
			_ => {}
		}
		match (&mut self.logging, other.logging) {
			(Some(base), Some(over)) => base.merge(over),
			(slot @ None, Some(over)) => *slot = Some(over),
			_ => {}
		}
	}
}
