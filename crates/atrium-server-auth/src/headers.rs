// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential extraction from HTTP request headers.

use http::header::{HeaderMap, AUTHORIZATION, COOKIE};

/// Default name for the session cookie.
pub const SESSION_COOKIE_NAME: &str = "atrium_session";

/// Extract the session identifier from the Cookie header.
///
/// Looks for the default session cookie. Returns `None` when the cookie is
/// not present.
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
	extract_session_cookie_with_name(headers, SESSION_COOKIE_NAME)
}

/// Extract the session identifier from the Cookie header with a custom
/// cookie name.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let cookie = cookie.trim();
			let (name, value) = cookie.split_once('=')?;

			if name == cookie_name {
				Some(value.to_string())
			} else {
				None
			}
		})
}

/// Extract a bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`. Returns `None` when
/// the header is absent or malformed. Treat the returned value as a secret.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(|token| token.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::HeaderValue;

	fn headers_with(name: http::header::HeaderName, value: &str) -> HeaderMap {
		let mut headers = HeaderMap::new();
		headers.insert(name, HeaderValue::from_str(value).unwrap());
		headers
	}

	mod session_cookie {
		use super::*;

		#[test]
		fn extracts_default_cookie() {
			let headers = headers_with(COOKIE, "atrium_session=abc123");
			assert_eq!(extract_session_cookie(&headers), Some("abc123".to_string()));
		}

		#[test]
		fn extracts_among_multiple_cookies() {
			let headers =
				headers_with(COOKIE, "theme=dark; atrium_session=abc123; lang=en");
			assert_eq!(extract_session_cookie(&headers), Some("abc123".to_string()));
		}

		#[test]
		fn missing_cookie_header_returns_none() {
			assert_eq!(extract_session_cookie(&HeaderMap::new()), None);
		}

		#[test]
		fn wrong_cookie_name_returns_none() {
			let headers = headers_with(COOKIE, "other_session=abc123");
			assert_eq!(extract_session_cookie(&headers), None);
		}

		#[test]
		fn custom_name_is_honoured() {
			let headers = headers_with(COOKIE, "custom=xyz");
			assert_eq!(
				extract_session_cookie_with_name(&headers, "custom"),
				Some("xyz".to_string())
			);
		}
	}

	mod bearer_token {
		use super::*;

		#[test]
		fn extracts_bearer_token() {
			let headers = headers_with(AUTHORIZATION, "Bearer tok_123");
			assert_eq!(extract_bearer_token(&headers), Some("tok_123".to_string()));
		}

		#[test]
		fn rejects_non_bearer_schemes() {
			let headers = headers_with(AUTHORIZATION, "Basic dXNlcjpwYXNz");
			assert_eq!(extract_bearer_token(&headers), None);
		}

		#[test]
		fn missing_header_returns_none() {
			assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
		}
	}
}
