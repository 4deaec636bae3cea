// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route-level authorization layers.
//!
//! Two Tower layers cover the two protected surfaces:
//!
//! - [`RequireRoles`] for API routes: denies with JSON bodies, 401 for
//!   unauthenticated and 403 for wrong-role requests.
//! - [`RedirectGuard`] for page routes: redirects unauthenticated requests to
//!   the login page with a `callbackUrl` back to the requested path, and
//!   wrong-role requests to the guard's unauthorized page.
//!
//! Both read the [`Session`] placed in request extensions by the
//! session-loading middleware and fail closed when it is absent. Handlers
//! that render guarded fragments inline use [`guard_component`], which
//! applies the same decision without a layer.
//!
//! Denials are logged with the subject's email and role; session identifiers
//! are never logged.

use axum::{
	body::Body,
	http::{Request, StatusCode},
	response::{IntoResponse, Redirect, Response},
	Json,
};
use atrium_server_auth::{GuardConfig, Role, Session};
use pin_project_lite::pin_project;
use std::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
};
use tower::{Layer, Service};

/// 401 response with the exact body API clients match on.
pub fn unauthorized_response() -> Response {
	(
		StatusCode::UNAUTHORIZED,
		Json(serde_json::json!({ "error": "Unauthorized" })),
	)
		.into_response()
}

/// 403 response with the exact body API clients match on.
pub fn forbidden_response() -> Response {
	(
		StatusCode::FORBIDDEN,
		Json(serde_json::json!({ "error": "Forbidden" })),
	)
		.into_response()
}

/// Redirect an unauthenticated page request to login, carrying the requested
/// path so the login flow can return the user where they started.
pub fn login_redirect(login_path: &str, requested_path: &str) -> Response {
	Redirect::to(&format!("{login_path}?callbackUrl={requested_path}")).into_response()
}

fn log_denied(session: &Session, allowed_roles: &[Role], reason: &str) {
	match &session.user {
		Some(user) => tracing::info!(
			email = user.email.as_deref().unwrap_or("<none>"),
			role = %user.role,
			?allowed_roles,
			"authorization denied: {reason}"
		),
		None => tracing::debug!(?allowed_roles, "authorization denied: {reason}"),
	}
}

// =============================================================================
// RequireRoles: API route layer
// =============================================================================

/// Route layer for role checks on API routes.
///
/// An empty role list admits any authenticated session; a non-empty list is
/// evaluated with any-of semantics unless `require_all` is set.
#[derive(Clone)]
pub struct RequireRoles {
	allowed_roles: Vec<Role>,
	require_all: bool,
}

impl RequireRoles {
	/// Admit any authenticated session.
	pub fn authenticated() -> Self {
		Self {
			allowed_roles: Vec::new(),
			require_all: false,
		}
	}

	/// Admit administrators only.
	pub fn admin() -> Self {
		Self::any_of(vec![Role::Admin])
	}

	/// Admit sessions holding any of `allowed_roles`.
	pub fn any_of(allowed_roles: Vec<Role>) -> Self {
		Self {
			allowed_roles,
			require_all: false,
		}
	}

	pub fn with_require_all(mut self, require_all: bool) -> Self {
		self.require_all = require_all;
		self
	}

	fn permits(&self, session: &Session) -> bool {
		if self.allowed_roles.is_empty() && !self.require_all {
			return session.is_authenticated();
		}
		atrium_server_auth::has_required_roles(Some(session), &self.allowed_roles, self.require_all)
	}
}

impl<S> Layer<S> for RequireRoles {
	type Service = RequireRolesService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequireRolesService {
			inner,
			requirement: self.clone(),
		}
	}
}

/// Service wrapper for [`RequireRoles`].
#[derive(Clone)]
pub struct RequireRolesService<S> {
	inner: S,
	requirement: RequireRoles,
}

impl<S> Service<Request<Body>> for RequireRolesService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = GuardFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let session = req
			.extensions()
			.get::<Session>()
			.cloned()
			.unwrap_or_else(Session::anonymous);

		if !session.is_authenticated() {
			log_denied(&session, &self.requirement.allowed_roles, "not authenticated");
			return GuardFuture::Rejected {
				resp: Some(unauthorized_response()),
			};
		}

		if !self.requirement.permits(&session) {
			log_denied(
				&session,
				&self.requirement.allowed_roles,
				"insufficient role",
			);
			return GuardFuture::Rejected {
				resp: Some(forbidden_response()),
			};
		}

		GuardFuture::Inner {
			fut: self.inner.call(req),
		}
	}
}

// =============================================================================
// RedirectGuard: page route layer
// =============================================================================

/// Route layer for role checks on server-rendered pages.
#[derive(Clone)]
pub struct RedirectGuard {
	config: GuardConfig,
	login_path: String,
}

impl RedirectGuard {
	pub fn new(config: GuardConfig, login_path: impl Into<String>) -> Self {
		Self {
			config,
			login_path: login_path.into(),
		}
	}
}

impl<S> Layer<S> for RedirectGuard {
	type Service = RedirectGuardService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RedirectGuardService {
			inner,
			guard: self.clone(),
		}
	}
}

/// Service wrapper for [`RedirectGuard`].
#[derive(Clone)]
pub struct RedirectGuardService<S> {
	inner: S,
	guard: RedirectGuard,
}

impl<S> Service<Request<Body>> for RedirectGuardService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = GuardFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let session = req
			.extensions()
			.get::<Session>()
			.cloned()
			.unwrap_or_else(Session::anonymous);

		if !session.is_authenticated() {
			return GuardFuture::Rejected {
				resp: Some(login_redirect(&self.guard.login_path, req.uri().path())),
			};
		}

		if !self.guard.config.allows(Some(&session)) {
			log_denied(&session, &self.guard.config.allowed_roles, "insufficient role");
			return GuardFuture::Rejected {
				resp: Some(Redirect::to(&self.guard.config.redirect_to).into_response()),
			};
		}

		GuardFuture::Inner {
			fut: self.inner.call(req),
		}
	}
}

pin_project! {
	/// Shared future for the guard services.
	#[project = GuardFutureProj]
	pub enum GuardFuture<F> {
		Inner { #[pin] fut: F },
		Rejected { resp: Option<Response> },
	}
}

impl<F, E> Future for GuardFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project() {
			GuardFutureProj::Inner { fut } => fut.poll(cx),
			GuardFutureProj::Rejected { resp } => {
				Poll::Ready(Ok(resp.take().expect("polled after completion")))
			}
		}
	}
}

// =============================================================================
// Component guard
// =============================================================================

/// Guard an inline-rendered fragment with the same decision as
/// [`RedirectGuard`]: redirect to login when unauthenticated, to the guard's
/// unauthorized page on wrong role, otherwise render.
pub async fn guard_component<F, Fut>(
	session: &Session,
	config: &GuardConfig,
	login_path: &str,
	requested_path: &str,
	render: F,
) -> Response
where
	F: FnOnce() -> Fut,
	Fut: Future<Output = Response>,
{
	if !session.is_authenticated() {
		return login_redirect(login_path, requested_path);
	}

	if !config.allows(Some(session)) {
		log_denied(session, &config.allowed_roles, "insufficient role");
		return Redirect::to(&config.redirect_to).into_response();
	}

	render().await
}
