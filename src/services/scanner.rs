// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Scan orchestration: normalize the request, retrieve the site, run the
//! seven checks and aggregate them into a [`ScanResult`].

use crate::error::{Result, ScanError};
use crate::models::crawler::CrawlerCatalog;
use crate::models::retrieval::RetrievedSite;
use crate::models::scan::{ScanRequest, ScanResult};
use crate::models::settings::ScannerSettings;
use crate::services::aggregator::aggregate;
use crate::services::checks::{
    check_access_control, check_ai_discovery_files, check_content_structure, check_http_headers,
    check_meta_directives, check_response_stability, check_robots_txt, AccessInput,
};
use crate::services::fetcher::Fetcher;
use crate::services::logging::redact_url;
use crate::services::normalizer::{normalize_request, ScanTarget};
use chrono::{DateTime, Utc};
use scraper::Html;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Runs scans. Cheap to share: every scan is independent and nothing is cached.
pub struct Scanner {
    fetcher: Fetcher,
    catalog: Arc<CrawlerCatalog>,
}

impl Scanner {
    pub fn new(settings: &ScannerSettings, catalog: Arc<CrawlerCatalog>) -> anyhow::Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(settings)?,
            catalog,
        })
    }

    pub fn catalog(&self) -> &CrawlerCatalog {
        &self.catalog
    }

    /// Scan one URL.
    ///
    /// Only a malformed request fails with `InvalidRequest`. Network problems
    /// end up inside the result, so any reachable-or-not site yields a score.
    pub async fn scan(&self, request: &ScanRequest) -> Result<ScanResult> {
        let target = normalize_request(request)?;
        let started = Instant::now();
        info!(url = %redact_url(&target.url), mode = %target.mode, "Scan started");

        let site = self.fetcher.retrieve(&target).await;
        let scanned_at = Utc::now();

        // HTML parsing and rule matching are CPU-bound
        let catalog = Arc::clone(&self.catalog);
        let result = tokio::task::spawn_blocking(move || {
            evaluate(&target, &site, &catalog, scanned_at)
        })
        .await
        .map_err(|e| {
            error!(error = %e, "Scan evaluation failed");
            ScanError::Unexpected(format!("Scan evaluation failed: {e}"))
        })?;

        info!(
            url = %redact_url(&result.url),
            mode = %result.mode,
            score = result.score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scan finished"
        );
        Ok(result)
    }
}

/// Run every check against already-retrieved data and assemble the result.
///
/// Pure: the same inputs always produce the same result. The page is parsed
/// once and shared by the HTML-based checks.
pub fn evaluate(
    target: &ScanTarget,
    site: &RetrievedSite,
    catalog: &CrawlerCatalog,
    scanned_at: DateTime<Utc>,
) -> ScanResult {
    let mode = target.mode;
    let document = Html::parse_document(&site.page.html);

    let robots = check_robots_txt(
        &site.robots,
        &target.url,
        &target.robots_url,
        catalog,
        mode,
    );
    let access = AccessInput {
        document: &document,
        status: site.page.status,
        final_url: &site.page.final_url,
        requested_url: &target.url,
    };

    let checks = vec![
        robots.check,
        check_meta_directives(&document, mode),
        check_http_headers(&site.page, mode),
        check_ai_discovery_files(&site.discovery, &target.origin, mode),
        check_response_stability(&site.page, mode),
        check_access_control(&access, mode),
        check_content_structure(&document, mode),
    ];

    let aggregate = aggregate(&checks, &robots.verdicts, mode);

    ScanResult {
        url: target.url.clone(),
        mode,
        score: aggregate.score,
        checks,
        robots_txt_found: site.robots.found,
        robots_txt_url: target.robots_url.clone(),
        bots: robots.verdicts,
        summary: aggregate.summary,
        scanned_at,
        insights: aggregate.insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::retrieval::{
        DiscoveryFileProbe, DiscoveryOutcome, RetrievedPage, RetrievedRobotsFile, DISCOVERY_FILES,
    };
    use crate::models::scan::{CheckId, ScanMode};
    use std::collections::HashMap;
    use std::time::Duration;

    fn target(mode: ScanMode) -> ScanTarget {
        normalize_request(&ScanRequest {
            url: Some("example.com/post".to_string()),
            mode: Some(mode.to_string()),
        })
        .unwrap()
    }

    fn site(robots: Option<&str>) -> RetrievedSite {
        RetrievedSite {
            robots: match robots {
                Some(content) => RetrievedRobotsFile::found(content),
                None => RetrievedRobotsFile::missing(),
            },
            page: RetrievedPage {
                html: r#"<html lang="en"><head><meta name="robots" content="noai"></head>
                    <body><main><h1>Post</h1></main></body></html>"#
                    .to_string(),
                final_url: "https://example.com/post".to_string(),
                status: 200,
                headers: HashMap::from([("content-type".to_string(), "text/html".to_string())]),
                latency: Duration::from_millis(250),
                fetch_error: None,
            },
            discovery: DISCOVERY_FILES
                .iter()
                .map(|file| DiscoveryFileProbe {
                    file: *file,
                    outcome: DiscoveryOutcome::Missing { status: 404 },
                })
                .collect(),
        }
    }

    fn scanned_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_checks_in_fixed_order() {
        let catalog = CrawlerCatalog::builtin().unwrap();
        let result = evaluate(&target(ScanMode::Block), &site(None), &catalog, scanned_at());
        let ids: Vec<CheckId> = result.checks.iter().map(|c| c.id).collect();
        assert_eq!(ids, CheckId::ALL.to_vec());
        assert_eq!(result.bots.len(), catalog.len());
        assert!(!result.robots_txt_found);
        assert_eq!(result.robots_txt_url, "https://example.com/robots.txt");
        assert_eq!(result.url, "https://example.com/post");
        assert!(result.insights.len() <= 4);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let catalog = CrawlerCatalog::builtin().unwrap();
        let site = site(Some("User-agent: GPTBot\nDisallow: /\n"));
        let first = evaluate(&target(ScanMode::Allow), &site, &catalog, scanned_at());
        let second = evaluate(&target(ScanMode::Allow), &site, &catalog, scanned_at());
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_mode_switch_flips_scores_not_verdicts() {
        let catalog = CrawlerCatalog::builtin().unwrap();
        let site = site(Some("User-agent: GPTBot\nDisallow: /\n"));
        let block = evaluate(&target(ScanMode::Block), &site, &catalog, scanned_at());
        let allow = evaluate(&target(ScanMode::Allow), &site, &catalog, scanned_at());

        let verdicts = |r: &ScanResult| -> Vec<(String, bool)> {
            r.bots
                .iter()
                .map(|v| (v.crawler.name.clone(), v.allowed))
                .collect()
        };
        assert_eq!(verdicts(&block), verdicts(&allow));
        assert!(!block.bots.iter().find(|v| v.crawler.name == "GPTBot").unwrap().allowed);

        // Weights follow the mode
        assert_eq!(block.checks[0].weight, 35);
        assert_eq!(allow.checks[0].weight, 30);

        // noai meta protects in block mode and hurts in allow mode
        assert_eq!(block.checks[1].score, 100);
        assert_eq!(allow.checks[1].score, 0);

        // Structure scores are complements
        assert_eq!(
            u32::from(block.checks[6].score) + u32::from(allow.checks[6].score),
            100
        );
    }

    #[test]
    fn test_unreachable_page_still_scores() {
        let catalog = CrawlerCatalog::builtin().unwrap();
        let mut site = site(None);
        site.page = RetrievedPage::unreachable("https://example.com/post", "connection refused".into());
        let result = evaluate(&target(ScanMode::Allow), &site, &catalog, scanned_at());
        assert_eq!(result.checks.len(), 7);
        assert_eq!(result.checks[4].summary, "Site unreachable");
        assert!(result.bots.iter().all(|v| v.allowed));
    }

    #[tokio::test]
    async fn test_scan_rejects_invalid_request() {
        let catalog = Arc::new(CrawlerCatalog::builtin().unwrap());
        let scanner = Scanner::new(&ScannerSettings::default(), catalog).unwrap();
        let err = scanner
            .scan(&ScanRequest {
                url: Some("example.com".to_string()),
                mode: Some("maybe".to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ScanError::InvalidRequest(r#"Mode must be "block" or "allow""#.to_string())
        );
    }
}
