// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::crawler::CrawlerVerdict;
use crate::models::scan::{CheckId, CheckResult, CheckStatus, Insight, InsightKind, ScanMode};

/// Insights kept after generation
pub const MAX_INSIGHTS: usize = 4;

/// Crawlers whose exclusion hurts visibility the most
const MAJOR_CRAWLERS_ALLOW: [&str; 4] = ["GPTBot", "ClaudeBot", "Google-Extended", "PerplexityBot"];

/// Crawlers a blocker most needs to keep out
const MAJOR_CRAWLERS_BLOCK: [&str; 5] = [
    "GPTBot",
    "ClaudeBot",
    "Google-Extended",
    "PerplexityBot",
    "CCBot",
];

/// Score, summary and insights combined from the seven checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub score: u8,
    pub summary: String,
    pub insights: Vec<Insight>,
}

/// `round(Σ score·weight / Σ weight)`, 0 when no weight is present
pub fn weighted_score(checks: &[CheckResult]) -> u8 {
    let total_weight: u32 = checks.iter().map(|c| c.weight).sum();
    if total_weight == 0 {
        return 0;
    }
    let weighted: f64 = checks
        .iter()
        .map(|c| f64::from(c.score) * f64::from(c.weight))
        .sum();
    (weighted / f64::from(total_weight)).round().clamp(0.0, 100.0) as u8
}

fn count_status(checks: &[CheckResult], status: CheckStatus) -> usize {
    checks.iter().filter(|c| c.status == status).count()
}

fn score_of(checks: &[CheckResult], id: CheckId) -> Option<u8> {
    checks.iter().find(|c| c.id == id).map(|c| c.score)
}

pub fn summarize(checks: &[CheckResult], score: u8, mode: ScanMode) -> String {
    let total = checks.len();
    let passing = count_status(checks, CheckStatus::Pass);
    let failing = count_status(checks, CheckStatus::Fail);
    let attention = if failing == 1 {
        "1 check need attention.".to_string()
    } else {
        format!("{failing} checks need attention.")
    };

    match (mode, score) {
        (ScanMode::Block, 80..) => format!(
            "Strong AI protection. {passing} of {total} checks indicate effective blocking."
        ),
        (ScanMode::Block, 50..) => format!(
            "Moderate protection. Some AI crawlers may still access your content. {attention}"
        ),
        (ScanMode::Block, _) => format!(
            "Weak AI protection. Most crawlers can freely access your content. \
             {failing} of {total} checks are failing."
        ),
        (ScanMode::Allow, 80..) => format!(
            "Excellent AI visibility. {passing} of {total} checks confirm your content \
             is accessible to AI systems."
        ),
        (ScanMode::Allow, 50..) => format!(
            "Moderate visibility. Some issues may prevent AI from fully accessing your content. \
             {attention}"
        ),
        (ScanMode::Allow, _) => format!(
            "Poor AI visibility. Your site is largely invisible to AI systems. \
             {failing} of {total} checks are failing."
        ),
    }
}

fn allow_insights(checks: &[CheckResult], verdicts: &[CrawlerVerdict], score: u8) -> Vec<Insight> {
    let mut insights = Vec::new();
    let total = verdicts.len();
    let allowed = verdicts.iter().filter(|v| v.allowed).count();

    if score >= 80 {
        insights.push(Insight::new(
            InsightKind::Good,
            format!(
                "Your site is well-configured for AI visibility. {allowed}/{total} crawlers can reach your content."
            ),
        ));
    } else if allowed * 2 > total {
        insights.push(Insight::new(
            InsightKind::Good,
            format!("Most AI crawlers ({allowed}/{total}) can access your content."),
        ));
    }

    let blocked_major: Vec<&str> = verdicts
        .iter()
        .filter(|v| !v.allowed && MAJOR_CRAWLERS_ALLOW.contains(&v.crawler.name.as_str()))
        .map(|v| v.crawler.name.as_str())
        .collect();
    if !blocked_major.is_empty() {
        insights.push(Insight::new(
            InsightKind::Warning,
            format!(
                "Major AI crawlers blocked: {}. These are high-traffic AI systems.",
                blocked_major.join(", ")
            ),
        ));
    }

    if score_of(checks, CheckId::AiDiscoveryFiles).is_some_and(|s| s < 50) {
        insights.push(Insight::new(
            InsightKind::Tip,
            "Add an llms.txt file to help AI systems understand your site's content and structure.",
        ));
    }

    if score_of(checks, CheckId::ContentStructure).is_some_and(|s| s < 50) {
        insights.push(Insight::new(
            InsightKind::Tip,
            "Improve your HTML structure (headings, meta tags, structured data) so AI can better parse your content.",
        ));
    }

    if score_of(checks, CheckId::RobotsTxt) == Some(100) && score < 80 {
        insights.push(Insight::new(
            InsightKind::Tip,
            "robots.txt looks good, but other factors are limiting visibility. Check the details below.",
        ));
    }

    insights
}

fn block_insights(checks: &[CheckResult], verdicts: &[CrawlerVerdict], score: u8) -> Vec<Insight> {
    let mut insights = Vec::new();
    let total = verdicts.len();
    let blocked = verdicts.iter().filter(|v| !v.allowed).count();

    if score >= 80 {
        insights.push(Insight::new(
            InsightKind::Good,
            format!("Strong protection. {blocked}/{total} AI crawlers are blocked."),
        ));
    }

    let exposed_major: Vec<&str> = verdicts
        .iter()
        .filter(|v| v.allowed && MAJOR_CRAWLERS_BLOCK.contains(&v.crawler.name.as_str()))
        .map(|v| v.crawler.name.as_str())
        .collect();
    if !exposed_major.is_empty() {
        insights.push(Insight::new(
            InsightKind::Warning,
            format!(
                "Still exposed: {} can access your content.",
                exposed_major.join(", ")
            ),
        ));
    }

    if score < 50 {
        insights.push(Insight::new(
            InsightKind::Tip,
            "Your content is largely unprotected. Start with robots.txt — it's the most impactful and easiest fix.",
        ));
    }

    if score_of(checks, CheckId::MetaDirectives).is_some_and(|s| s < 50) {
        insights.push(Insight::new(
            InsightKind::Tip,
            "Add noai and noimageai meta tags for an extra layer of protection beyond robots.txt.",
        ));
    }

    insights
}

/// Rule-based insights in generation order, truncated to [`MAX_INSIGHTS`]
pub fn generate_insights(
    checks: &[CheckResult],
    verdicts: &[CrawlerVerdict],
    score: u8,
    mode: ScanMode,
) -> Vec<Insight> {
    let mut insights = match mode {
        ScanMode::Allow => allow_insights(checks, verdicts, score),
        ScanMode::Block => block_insights(checks, verdicts, score),
    };
    insights.truncate(MAX_INSIGHTS);
    insights
}

pub fn aggregate(checks: &[CheckResult], verdicts: &[CrawlerVerdict], mode: ScanMode) -> Aggregate {
    let score = weighted_score(checks);
    Aggregate {
        score,
        summary: summarize(checks, score, mode),
        insights: generate_insights(checks, verdicts, score, mode),
    }
}
