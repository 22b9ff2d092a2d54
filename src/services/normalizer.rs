// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{Result, ScanError};
use crate::models::scan::{ScanMode, ScanRequest};

/// A validated scan request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    /// Absolute URL of the page to scan
    pub url: String,
    /// `scheme://host[:port]`, used to build well-known file URLs
    pub origin: String,
    pub robots_url: String,
    pub mode: ScanMode,
}

impl ScanTarget {
    /// Absolute URL of a well-known path on the target's origin
    pub fn origin_url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }
}

/// Validate and canonicalize a raw request.
///
/// Fails with `InvalidRequest` when the URL or mode is missing, the mode is not
/// exactly `block` or `allow`, or the URL cannot be parsed.
pub fn normalize_request(request: &ScanRequest) -> Result<ScanTarget> {
    let raw_url = request.url.as_deref().map(str::trim).unwrap_or_default();
    let mode = request.mode.as_deref().unwrap_or_default();

    if raw_url.is_empty() || mode.is_empty() {
        return Err(ScanError::InvalidRequest(
            "Missing required fields: url, mode".to_string(),
        ));
    }

    let mode = ScanMode::parse(mode).ok_or_else(|| {
        ScanError::InvalidRequest(r#"Mode must be "block" or "allow""#.to_string())
    })?;

    let with_scheme = if raw_url.starts_with("http://") || raw_url.starts_with("https://") {
        raw_url.to_string()
    } else {
        format!("https://{raw_url}")
    };

    let parsed = url::Url::parse(&with_scheme)
        .map_err(|e| ScanError::InvalidRequest(format!("Invalid URL: {e}")))?;

    if parsed.host_str().is_none() {
        return Err(ScanError::InvalidRequest("URL has no host".to_string()));
    }

    let origin = parsed.origin().ascii_serialization();
    let robots_url = format!("{origin}/robots.txt");

    Ok(ScanTarget {
        url: parsed.to_string(),
        origin,
        robots_url,
        mode,
    })
}
