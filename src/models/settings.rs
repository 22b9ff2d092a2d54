// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "BotCheck/1.0 (https://botcheck.app)";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Process-wide scanner configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct ScannerSettings {
    pub bind_addr: SocketAddr,
    /// Descriptive user-agent sent with every outbound request
    pub user_agent: String,
    /// Optional JSON catalog replacing the built-in crawler list
    pub crawlers_file: Option<PathBuf>,
    pub robots_timeout: Duration,
    pub page_timeout: Duration,
    pub discovery_timeout: Duration,
    /// Page bodies are truncated once this many bytes have been read
    pub max_body_bytes: usize,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            crawlers_file: None,
            robots_timeout: Duration::from_secs(10),
            page_timeout: Duration::from_secs(10),
            discovery_timeout: Duration::from_secs(5),
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ScannerSettings {
    /// Read `BOTCHECK_*` variables, falling back to defaults for unset ones
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(addr) = lookup("BOTCHECK_BIND_ADDR") {
            settings.bind_addr = addr
                .parse()
                .with_context(|| format!("BOTCHECK_BIND_ADDR is not a socket address: {addr}"))?;
        }
        if let Some(agent) = lookup("BOTCHECK_USER_AGENT").filter(|a| !a.trim().is_empty()) {
            settings.user_agent = agent;
        }
        settings.crawlers_file = lookup("BOTCHECK_CRAWLERS_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(settings)
    }
}
