// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Data captured by the fetcher. Retrieval failures are recorded here as plain
//! values so every check can turn them into a score.

use std::collections::HashMap;
use std::time::Duration;

/// Bodies of this size or less are treated as placeholders, not real files.
pub const DISCOVERY_MIN_BYTES: usize = 10;

/// Well-known AI discovery file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryFile {
    pub path: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Discovery files probed on every scan, in report order
pub const DISCOVERY_FILES: [DiscoveryFile; 4] = [
    DiscoveryFile {
        path: "/llms.txt",
        name: "llms.txt",
        description: "LLM-friendly site description",
    },
    DiscoveryFile {
        path: "/llms-full.txt",
        name: "llms-full.txt",
        description: "Full LLM content",
    },
    DiscoveryFile {
        path: "/ai.txt",
        name: "ai.txt",
        description: "AI crawler permissions",
    },
    DiscoveryFile {
        path: "/.well-known/ai-plugin.json",
        name: "ai-plugin.json",
        description: "OpenAI plugin manifest",
    },
];

/// The scanned page as seen by an anonymous HTTP client
#[derive(Debug, Clone, Default)]
pub struct RetrievedPage {
    /// Body decoded as UTF-8, truncated at the body cap
    pub html: String,
    /// URL after following redirects
    pub final_url: String,
    /// HTTP status, 0 when no response arrived
    pub status: u16,
    /// Lower-cased header names; repeated headers joined with ", "
    pub headers: HashMap<String, String>,
    pub latency: Duration,
    /// Set when the request failed before a response arrived
    pub fetch_error: Option<String>,
}

impl RetrievedPage {
    /// Page record for a request that never got a response
    pub fn unreachable(url: &str, error: String) -> Self {
        Self {
            final_url: url.to_string(),
            fetch_error: Some(error),
            ..Self::default()
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn latency_ms(&self) -> u64 {
        u64::try_from(self.latency.as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievedRobotsFile {
    pub content: String,
    pub found: bool,
}

impl RetrievedRobotsFile {
    pub fn found(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            found: true,
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

/// What a single discovery-file request returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    Found { bytes: usize },
    /// Successful response whose body is too small to be a real file
    Empty { bytes: usize },
    /// Non-success HTTP status
    Missing { status: u16 },
    /// Network error or timeout
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFileProbe {
    pub file: DiscoveryFile,
    pub outcome: DiscoveryOutcome,
}

impl DiscoveryFileProbe {
    /// Classify a successful response body
    pub fn from_body(file: DiscoveryFile, bytes: usize) -> Self {
        let outcome = if bytes > DISCOVERY_MIN_BYTES {
            DiscoveryOutcome::Found { bytes }
        } else {
            DiscoveryOutcome::Empty { bytes }
        };
        Self { file, outcome }
    }

    pub fn found(&self) -> bool {
        matches!(self.outcome, DiscoveryOutcome::Found { .. })
    }
}

/// Everything fetched for one scan
#[derive(Debug, Clone)]
pub struct RetrievedSite {
    pub robots: RetrievedRobotsFile,
    pub page: RetrievedPage,
    pub discovery: Vec<DiscoveryFileProbe>,
}
