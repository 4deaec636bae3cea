// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections: resolved structs and their mergeable layers.

use serde::Deserialize;

// =============================================================================
// HTTP
// =============================================================================

/// HTTP listener configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
	pub base_url: String,
}

impl Default for HttpConfig {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 8080,
			base_url: "http://localhost:8080".to_string(),
		}
	}
}

/// HTTP configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfigLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub base_url: Option<String>,
}

impl HttpConfigLayer {
	pub fn merge(&mut self, other: HttpConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
	}

	pub fn finalize(self) -> HttpConfig {
		let defaults = HttpConfig::default();
		HttpConfig {
			host: self.host.unwrap_or(defaults.host),
			port: self.port.unwrap_or(defaults.port),
			base_url: self.base_url.unwrap_or(defaults.base_url),
		}
	}
}

// =============================================================================
// Auth
// =============================================================================

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Name of the session cookie.
	pub cookie_name: String,
	/// Where unauthenticated page requests are redirected.
	pub login_path: String,
	/// Where authenticated-but-unauthorized page requests are redirected.
	pub unauthorized_path: String,
	/// Relax cross-origin restrictions for local development, allowing any
	/// CORS origin instead of only `http.base_url`. Never valid in production.
	pub dev_mode: bool,
	/// Deployment environment name ("development", "production", ...).
	pub environment: String,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			cookie_name: "atrium_session".to_string(),
			login_path: "/login".to_string(),
			unauthorized_path: "/unauthorized".to_string(),
			dev_mode: false,
			environment: "development".to_string(),
		}
	}
}

/// Auth configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub cookie_name: Option<String>,
	#[serde(default)]
	pub login_path: Option<String>,
	#[serde(default)]
	pub unauthorized_path: Option<String>,
	#[serde(default)]
	pub dev_mode: Option<bool>,
	#[serde(default)]
	pub environment: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.cookie_name.is_some() {
			self.cookie_name = other.cookie_name;
		}
		if other.login_path.is_some() {
			self.login_path = other.login_path;
		}
		if other.unauthorized_path.is_some() {
			self.unauthorized_path = other.unauthorized_path;
		}
		if other.dev_mode.is_some() {
			self.dev_mode = other.dev_mode;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		let defaults = AuthConfig::default();
		AuthConfig {
			cookie_name: self.cookie_name.unwrap_or(defaults.cookie_name),
			login_path: self.login_path.unwrap_or(defaults.login_path),
			unauthorized_path: self.unauthorized_path.unwrap_or(defaults.unauthorized_path),
			dev_mode: self.dev_mode.unwrap_or(defaults.dev_mode),
			environment: self.environment.unwrap_or(defaults.environment),
		}
	}
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct LoggingConfig {
	/// Tracing filter directive, e.g. `info` or `atrium_server=debug`.
	pub level: String,
	/// Emit JSON-formatted log lines instead of human-readable ones.
	pub json: bool,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			json: false,
		}
	}
}

/// Logging configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub json: Option<bool>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.json.is_some() {
			self.json = other.json;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		let defaults = LoggingConfig::default();
		LoggingConfig {
			level: self.level.unwrap_or(defaults.level),
			json: self.json.unwrap_or(defaults.json),
		}
	}
}
