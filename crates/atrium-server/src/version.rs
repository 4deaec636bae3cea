// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information and version utilities for atrium-server.

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"atrium-server version: {}\n\
         Git SHA:               {}\n\
         Platform:              {}-{}",
		env!("CARGO_PKG_VERSION"),
		option_env!("ATRIUM_GIT_SHA").unwrap_or("unknown"),
		std::env::consts::OS,
		std::env::consts::ARCH,
	)
}
