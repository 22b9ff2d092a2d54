// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::retrieval::RetrievedPage;
use crate::models::scan::{CheckId, CheckResult, Recommendation, ScanMode};

/// `X-Robots-Tag` tokens, matched as substrings of the lower-cased header
const X_ROBOTS_TOKENS: [&str; 5] = ["noindex", "nofollow", "noai", "noimageai", "none"];

/// Findings that keep a page out of AI systems in allow mode
const BLOCKING_FINDINGS: [&str; 4] = ["noai", "none", "noindex", "noimageai"];

fn score(findings: &[&str], mode: ScanMode) -> u8 {
    let has = |finding: &str| findings.iter().any(|f| *f == finding);
    match mode {
        ScanMode::Block if has("noai") || has("none") => 100,
        ScanMode::Block if has("noindex") => 80,
        ScanMode::Block if has("restrictive-cache") => 40,
        ScanMode::Block => 0,
        ScanMode::Allow if BLOCKING_FINDINGS.iter().any(|f| has(*f)) => 0,
        ScanMode::Allow => 100,
    }
}

pub fn check_http_headers(page: &RetrievedPage, mode: ScanMode) -> CheckResult {
    let mut details = Vec::new();
    let mut findings: Vec<&str> = Vec::new();

    match page.header("x-robots-tag") {
        Some(tag) => {
            details.push(format!("X-Robots-Tag: \"{tag}\""));
            let lower = tag.to_lowercase();
            findings.extend(X_ROBOTS_TOKENS.iter().copied().filter(|t| lower.contains(t)));
        }
        None => details.push("No X-Robots-Tag header".to_string()),
    }

    if let Some(cache_control) = page.header("cache-control") {
        details.push(format!("Cache-Control: \"{cache_control}\""));
        if cache_control.contains("no-store") || cache_control.contains("private") {
            findings.push("restrictive-cache");
        }
    }

    // Informational only
    if let Some(content_type) = page.header("content-type") {
        details.push(format!("Content-Type: \"{content_type}\""));
    }

    match page.header("access-control-allow-origin") {
        Some(cors) => {
            details.push(format!("CORS: \"{cors}\""));
            if cors == "*" {
                findings.push("open-cors");
            }
        }
        None => details.push("No CORS header (cross-origin access restricted)".to_string()),
    }

    let score = score(&findings, mode);

    let recommendation = match mode {
        _ if score >= 70 => None,
        ScanMode::Block => Some(Recommendation::with_snippet(
            "Add X-Robots-Tag headers to block AI crawlers at the server level.",
            "# Nginx\nadd_header X-Robots-Tag \"noai, noimageai\" always;\n\n\
             # Apache (.htaccess)\nHeader set X-Robots-Tag \"noai, noimageai\"\n\n\
             # Cloudflare (Transform Rules)\n# Add response header: X-Robots-Tag = noai, noimageai",
            "bash",
        )),
        ScanMode::Allow => Some(Recommendation::with_snippet(
            "Remove X-Robots-Tag headers that block AI crawlers.",
            "# Check your server config for X-Robots-Tag headers\n\
             # Remove any containing: noai, noimageai, noindex, none",
            "bash",
        )),
    };

    let summary = if findings.is_empty() {
        "No AI-specific headers".to_string()
    } else {
        format!("Found: {}", findings.join(", "))
    };

    CheckResult::new(CheckId::HttpHeaders, mode, score, summary, details)
        .with_recommendation(recommendation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(headers: &[(&str, &str)]) -> RetrievedPage {
        RetrievedPage {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..RetrievedPage::default()
        }
    }

    #[test]
    fn test_no_headers() {
        let page = page_with(&[("content-type", "text/html")]);
        let block = check_http_headers(&page, ScanMode::Block);
        assert_eq!(block.score, 0);
        assert_eq!(block.summary, "No AI-specific headers");
        assert_eq!(
            block.details,
            vec![
                "No X-Robots-Tag header".to_string(),
                "Content-Type: \"text/html\"".to_string(),
                "No CORS header (cross-origin access restricted)".to_string(),
            ]
        );
        assert_eq!(block.recommendation.unwrap().snippet_lang.as_deref(), Some("bash"));

        let allow = check_http_headers(&page, ScanMode::Allow);
        assert_eq!(allow.score, 100);
        assert!(allow.recommendation.is_none());
    }

    #[test]
    fn test_noai_header() {
        let page = page_with(&[("x-robots-tag", "noai, noimageai")]);
        let check = check_http_headers(&page, ScanMode::Block);
        assert_eq!(check.score, 100);
        assert_eq!(check.summary, "Found: noai, noimageai");
        assert_eq!(check_http_headers(&page, ScanMode::Allow).score, 0);
    }

    #[test]
    fn test_noindex_header() {
        let page = page_with(&[("x-robots-tag", "NoIndex")]);
        assert_eq!(check_http_headers(&page, ScanMode::Block).score, 80);
        assert_eq!(check_http_headers(&page, ScanMode::Allow).score, 0);
    }

    #[test]
    fn test_restrictive_cache_is_a_soft_signal() {
        let page = page_with(&[("cache-control", "private, max-age=0")]);
        let block = check_http_headers(&page, ScanMode::Block);
        assert_eq!(block.score, 40);
        assert_eq!(block.summary, "Found: restrictive-cache");
        assert_eq!(check_http_headers(&page, ScanMode::Allow).score, 100);
    }

    #[test]
    fn test_open_cors_is_reported_but_not_scored() {
        let page = page_with(&[("access-control-allow-origin", "*")]);
        let check = check_http_headers(&page, ScanMode::Block);
        assert_eq!(check.score, 0);
        assert_eq!(check.summary, "Found: open-cors");
        assert!(check.details.contains(&"CORS: \"*\"".to_string()));
        assert_eq!(check_http_headers(&page, ScanMode::Allow).score, 100);
    }

    #[test]
    fn test_unreachable_page_has_no_headers() {
        let page = RetrievedPage::unreachable("https://example.com/", "boom".to_string());
        assert_eq!(check_http_headers(&page, ScanMode::Allow).score, 100);
        assert_eq!(check_http_headers(&page, ScanMode::Block).score, 0);
    }
}
