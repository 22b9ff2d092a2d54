// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::crawler::CrawlerVerdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What the site owner wants from AI crawlers.
///
/// The mode picks the weight table and flips the polarity of every check:
/// a signal that protects content scores high under `Block` and low under `Allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Maximize protection from AI crawlers
    Block,
    /// Maximize discoverability by AI crawlers
    Allow,
}

impl ScanMode {
    /// Parse a mode token. Only the exact lowercase tokens are accepted.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "block" => Some(ScanMode::Block),
            "allow" => Some(ScanMode::Allow),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanMode::Block => write!(f, "block"),
            ScanMode::Allow => write!(f, "allow"),
        }
    }
}

/// Raw scan request as received from a caller.
///
/// Both fields are optional at this level so that a missing field is reported
/// as an invalid request rather than a body decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Page to scan; `https://` is assumed when no scheme is given
    pub url: Option<String>,
    /// Either `"block"` or `"allow"`
    pub mode: Option<String>,
}

/// Identifier of one of the seven checks, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum CheckId {
    RobotsTxt,
    MetaDirectives,
    HttpHeaders,
    AiDiscoveryFiles,
    ResponseStability,
    PaywallDetection,
    ContentStructure,
}

impl CheckId {
    /// Every check, in report order.
    pub const ALL: [CheckId; 7] = [
        CheckId::RobotsTxt,
        CheckId::MetaDirectives,
        CheckId::HttpHeaders,
        CheckId::AiDiscoveryFiles,
        CheckId::ResponseStability,
        CheckId::PaywallDetection,
        CheckId::ContentStructure,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckId::RobotsTxt => "🤖 robots.txt",
            CheckId::MetaDirectives => "🏷️ Meta Directives",
            CheckId::HttpHeaders => "📡 HTTP Headers",
            CheckId::AiDiscoveryFiles => "📄 AI Discovery Files",
            CheckId::ResponseStability => "⚡ Response Speed",
            CheckId::PaywallDetection => "🚪 Access Control",
            CheckId::ContentStructure => "🏗️ Page Structure",
        }
    }

    /// Percentage this check contributes to the final score.
    /// Each mode's column sums to 100.
    pub fn weight(&self, mode: ScanMode) -> u32 {
        match (self, mode) {
            (CheckId::RobotsTxt, ScanMode::Block) => 35,
            (CheckId::RobotsTxt, ScanMode::Allow) => 30,
            (CheckId::MetaDirectives, ScanMode::Block) => 20,
            (CheckId::MetaDirectives, ScanMode::Allow) => 15,
            (CheckId::HttpHeaders, ScanMode::Block) => 15,
            (CheckId::HttpHeaders, ScanMode::Allow) => 10,
            (CheckId::AiDiscoveryFiles, ScanMode::Block) => 5,
            (CheckId::AiDiscoveryFiles, ScanMode::Allow) => 10,
            (CheckId::ResponseStability, ScanMode::Block) => 5,
            (CheckId::ResponseStability, ScanMode::Allow) => 15,
            (CheckId::PaywallDetection, _) => 10,
            (CheckId::ContentStructure, _) => 10,
        }
    }
}

/// Outcome bucket of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    /// `pass` from 70, `warn` from 40, `fail` below.
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => CheckStatus::Pass,
            40..=69 => CheckStatus::Warn,
            _ => CheckStatus::Fail,
        }
    }
}

/// Suggested fix for a check, optionally with a snippet the user can copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_lang: Option<String>,
}

impl Recommendation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            snippet: None,
            snippet_lang: None,
        }
    }

    pub fn with_snippet(
        text: impl Into<String>,
        snippet: impl Into<String>,
        lang: &str,
    ) -> Self {
        Self {
            text: text.into(),
            snippet: Some(snippet.into()),
            snippet_lang: Some(lang.to_string()),
        }
    }
}

/// Result of one check. Status and weight are derived from the score and the mode
/// when the result is built, so they can never disagree with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckResult {
    pub id: CheckId,
    pub name: String,
    /// 0-100, higher is better for the selected mode
    pub score: u8,
    /// Percentage used in the weighted final score
    pub weight: u32,
    pub status: CheckStatus,
    pub summary: String,
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
}

impl CheckResult {
    pub fn new(
        id: CheckId,
        mode: ScanMode,
        score: u8,
        summary: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        let score = score.min(100);
        Self {
            id,
            name: id.display_name().to_string(),
            score,
            weight: id.weight(mode),
            status: CheckStatus::from_score(score),
            summary: summary.into(),
            details,
            recommendation: None,
        }
    }

    pub fn with_recommendation(mut self, recommendation: Option<Recommendation>) -> Self {
        self.recommendation = recommendation;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Good,
    Warning,
    Tip,
}

/// Short narrative hint shown above the per-check breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub text: String,
}

impl Insight {
    pub fn new(kind: InsightKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Everything a scan returns. The only record handed to callers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Normalized URL that was scanned
    pub url: String,
    pub mode: ScanMode,
    /// Weighted final score, 0-100
    pub score: u8,
    /// Always seven entries, in `CheckId::ALL` order
    pub checks: Vec<CheckResult>,
    pub robots_txt_found: bool,
    pub robots_txt_url: String,
    pub bots: Vec<CrawlerVerdict>,
    pub summary: String,
    pub scanned_at: DateTime<Utc>,
    pub insights: Vec<Insight>,
}

/// Error body returned for rejected or failed scans
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
