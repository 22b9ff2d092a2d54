// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use utoipa::ToSchema;

/// Catalog compiled into the binary, used when no override file is configured
const BUILTIN_CATALOG: &str = include_str!("../../data/crawlers.json");

/// Whether an operator states that its crawler honours robots.txt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCompliance", into = "RawCompliance")]
pub enum RobotsCompliance {
    Compliant,
    NonCompliant,
    /// Compliance with a qualification, e.g. "user-initiated fetches only"
    Caveat(String),
}

// Catalog files and API clients use `true`, `false` or a free-text caveat.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCompliance {
    Flag(bool),
    Caveat(String),
}

impl From<RawCompliance> for RobotsCompliance {
    fn from(raw: RawCompliance) -> Self {
        match raw {
            RawCompliance::Flag(true) => RobotsCompliance::Compliant,
            RawCompliance::Flag(false) => RobotsCompliance::NonCompliant,
            RawCompliance::Caveat(text) => RobotsCompliance::Caveat(text),
        }
    }
}

impl From<RobotsCompliance> for RawCompliance {
    fn from(compliance: RobotsCompliance) -> Self {
        match compliance {
            RobotsCompliance::Compliant => RawCompliance::Flag(true),
            RobotsCompliance::NonCompliant => RawCompliance::Flag(false),
            RobotsCompliance::Caveat(text) => RawCompliance::Caveat(text),
        }
    }
}

/// A known AI crawler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerIdentity {
    /// Display name, also used to recognise the major crawlers in insights
    pub name: String,
    /// Product token matched against `User-agent` lines in robots.txt
    pub user_agent: String,
    pub operator: String,
    pub purpose: String,
    /// `true`, `false` or a caveat string
    #[schema(value_type = Object)]
    pub respects_robots: RobotsCompliance,
}

/// A crawler together with the robots.txt decision for the scanned URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CrawlerVerdict {
    #[serde(flatten)]
    pub crawler: CrawlerIdentity,
    pub allowed: bool,
}

/// The fixed, ordered list of crawlers every scan is evaluated against.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CrawlerCatalog {
    crawlers: Vec<CrawlerIdentity>,
}

impl CrawlerCatalog {
    /// Catalog shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG).context("Built-in crawler catalog is invalid")
    }

    /// Load the catalog from `path`, or the built-in one when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read crawler catalog {}", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("Invalid crawler catalog {}", path.display()))
            }
            None => Self::builtin(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let catalog: CrawlerCatalog = serde_json::from_str(raw)?;
        if catalog.crawlers.is_empty() {
            bail!("Crawler catalog must list at least one crawler");
        }
        Ok(catalog)
    }

    pub fn new(crawlers: Vec<CrawlerIdentity>) -> Self {
        Self { crawlers }
    }

    pub fn crawlers(&self) -> &[CrawlerIdentity] {
        &self.crawlers
    }

    pub fn len(&self) -> usize {
        self.crawlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crawlers.is_empty()
    }
}
