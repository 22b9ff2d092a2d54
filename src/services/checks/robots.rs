// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use super::{name_list, percent};
use crate::models::crawler::{CrawlerCatalog, CrawlerIdentity, CrawlerVerdict};
use crate::models::retrieval::RetrievedRobotsFile;
use crate::models::scan::{CheckId, CheckResult, Recommendation, ScanMode};
use texting_robots::Robot;
use tracing::debug;

/// How many crawler names the details line spells out
const NAMED_CRAWLERS_LIMIT: usize = 5;

/// The robots.txt check also decides the per-crawler verdicts
#[derive(Debug, Clone)]
pub struct RobotsEvaluation {
    pub check: CheckResult,
    pub verdicts: Vec<CrawlerVerdict>,
}

/// Decide whether `crawler` may fetch `target_url` under the given rules.
///
/// Matching follows the robots exclusion standard: the group for the crawler's
/// token (or `*`) applies and the longest matching path rule wins.
/// A version suffix on a group's `User-agent` line (`GPTBot/1.0`) is ignored.
/// Rules that cannot be parsed or that belong to another origin allow access.
pub fn is_allowed(
    crawler: &CrawlerIdentity,
    robots_txt: &str,
    robots_url: &str,
    target_url: &str,
) -> bool {
    if !same_origin(robots_url, target_url) {
        return true;
    }
    let robots_txt = strip_agent_versions(robots_txt);
    match Robot::new(&crawler.user_agent, robots_txt.as_bytes()) {
        Ok(robot) => robot.allowed(target_url),
        Err(e) => {
            debug!(crawler = %crawler.name, error = %e, "robots.txt could not be parsed");
            true
        }
    }
}

/// Cut `User-agent` values at the first `/` so versioned tokens match
fn strip_agent_versions(robots_txt: &str) -> String {
    robots_txt
        .lines()
        .map(|line| match line.trim_start().split_once(':') {
            Some((key, value)) if key.trim().eq_ignore_ascii_case("user-agent") => {
                let token = value.split('/').next().unwrap_or(value).trim();
                format!("User-agent: {token}")
            }
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn same_origin(a: &str, b: &str) -> bool {
    match (url::Url::parse(a), url::Url::parse(b)) {
        (Ok(a), Ok(b)) => a.origin() == b.origin(),
        _ => false,
    }
}

pub fn check_robots_txt(
    robots: &RetrievedRobotsFile,
    target_url: &str,
    robots_url: &str,
    catalog: &CrawlerCatalog,
    mode: ScanMode,
) -> RobotsEvaluation {
    let verdicts: Vec<CrawlerVerdict> = catalog
        .crawlers()
        .iter()
        .map(|crawler| CrawlerVerdict {
            crawler: crawler.clone(),
            allowed: !robots.found
                || is_allowed(crawler, &robots.content, robots_url, target_url),
        })
        .collect();

    let total = verdicts.len();
    let allowed: Vec<&CrawlerVerdict> = verdicts.iter().filter(|v| v.allowed).collect();
    let blocked: Vec<&CrawlerVerdict> = verdicts.iter().filter(|v| !v.allowed).collect();

    let mut details = Vec::new();
    let score = match (mode, robots.found) {
        (ScanMode::Block, false) => {
            details.push("No robots.txt found — all bots have unrestricted access".to_string());
            0
        }
        (ScanMode::Allow, false) => {
            details.push("No robots.txt found — all bots can access by default".to_string());
            100
        }
        (ScanMode::Block, true) => {
            details.push(format!("{} of {total} AI crawlers blocked", blocked.len()));
            if !allowed.is_empty() {
                details.push(format!("Still allowed: {}", names_of(&allowed)));
            }
            percent(blocked.len(), total)
        }
        (ScanMode::Allow, true) => {
            details.push(format!(
                "{} of {total} AI crawlers can access your site",
                allowed.len()
            ));
            if !blocked.is_empty() {
                details.push(format!("Blocked: {}", names_of(&blocked)));
            }
            percent(allowed.len(), total)
        }
    };

    let recommendation = if score < 100 {
        recommend(mode, robots.found, &allowed, &blocked)
    } else {
        None
    };

    let summary = if robots.found {
        format!("{}/{total} bots blocked", blocked.len())
    } else {
        "No robots.txt found".to_string()
    };

    RobotsEvaluation {
        check: CheckResult::new(CheckId::RobotsTxt, mode, score, summary, details)
            .with_recommendation(recommendation),
        verdicts,
    }
}

fn names_of(verdicts: &[&CrawlerVerdict]) -> String {
    let names: Vec<&str> = verdicts.iter().map(|v| v.crawler.name.as_str()).collect();
    name_list(&names, NAMED_CRAWLERS_LIMIT)
}

/// One `User-agent` group per misaligned crawler
fn robots_snippet(header: &str, verdicts: &[&CrawlerVerdict], rule: &str) -> String {
    let groups: Vec<String> = verdicts
        .iter()
        .map(|v| format!("User-agent: {}\n{rule}: /\n", v.crawler.user_agent))
        .collect();
    format!("{header}\n{}", groups.join("\n"))
}

fn recommend(
    mode: ScanMode,
    found: bool,
    allowed: &[&CrawlerVerdict],
    blocked: &[&CrawlerVerdict],
) -> Option<Recommendation> {
    match mode {
        ScanMode::Block if !found => Some(Recommendation::with_snippet(
            "Create a robots.txt file to block AI crawlers.",
            robots_snippet("# Add to your robots.txt", allowed, "Disallow"),
            "txt",
        )),
        ScanMode::Block if !allowed.is_empty() => Some(Recommendation::with_snippet(
            format!(
                "Add these {} bots to your robots.txt to block them.",
                allowed.len()
            ),
            robots_snippet("# Add to your robots.txt", allowed, "Disallow"),
            "txt",
        )),
        ScanMode::Allow if !blocked.is_empty() => Some(Recommendation::with_snippet(
            format!(
                "Remove or allow these {} bots in your robots.txt.",
                blocked.len()
            ),
            robots_snippet("# Allow AI crawlers in robots.txt", blocked, "Allow"),
            "txt",
        )),
        _ => None,
    }
}
