// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::retrieval::RetrievedPage;
use crate::models::scan::{CheckId, CheckResult, Recommendation, ScanMode};

/// Map response latency onto 10-100, faster is higher
pub fn latency_score(latency_ms: u64) -> u8 {
    match latency_ms {
        0..=499 => 100,
        500..=1499 => 80,
        1500..=2999 => 50,
        3000..=4999 => 30,
        _ => 10,
    }
}

fn unreachable(page: &RetrievedPage, error: &str, mode: ScanMode) -> CheckResult {
    let score = match mode {
        ScanMode::Block => 80,
        ScanMode::Allow => 0,
    };
    let recommendation = match mode {
        ScanMode::Allow => Some(Recommendation::with_snippet(
            "Your site is unreachable. Crawlers can't access content they can't load.",
            format!(
                "# Check your server is running and responding\ncurl -I {}",
                page.final_url
            ),
            "bash",
        )),
        ScanMode::Block => None,
    };

    CheckResult::new(
        CheckId::ResponseStability,
        mode,
        score,
        "Site unreachable",
        vec![format!("Fetch error: {error}")],
    )
    .with_recommendation(recommendation)
}

/// Score availability and speed of the page response.
///
/// A failed fetch short-circuits: it is good news for blocking and fatal for
/// visibility. Block mode scores `100 - latency_score`, so a fast, successful
/// response is the worst case for a site trying to keep crawlers out.
pub fn check_response_stability(page: &RetrievedPage, mode: ScanMode) -> CheckResult {
    if let Some(error) = &page.fetch_error {
        return unreachable(page, error, mode);
    }

    let latency_ms = page.latency_ms();
    let status = page.status;
    let status_ok = (200..400).contains(&status);
    let latency_score = latency_score(latency_ms);

    let score = match (mode, status_ok) {
        (ScanMode::Block, false) => 70,
        (ScanMode::Block, true) => 100 - latency_score,
        (ScanMode::Allow, false) => 20,
        (ScanMode::Allow, true) => latency_score,
    };

    let summary = if !status_ok {
        format!("HTTP {status} — non-success response")
    } else if latency_ms < 500 {
        format!("Fast response ({latency_ms}ms)")
    } else if latency_ms < 2000 {
        format!("Moderate response ({latency_ms}ms)")
    } else {
        format!("Slow response ({latency_ms}ms)")
    };

    let recommendation = (mode == ScanMode::Allow && latency_ms > 2000).then(|| {
        Recommendation::text(
            "Slow pages cause crawlers to time out or skip your content. Improve server response time.",
        )
    });

    CheckResult::new(
        CheckId::ResponseStability,
        mode,
        score,
        summary,
        vec![
            format!("HTTP status: {status}"),
            format!("Latency: {latency_ms}ms"),
        ],
    )
    .with_recommendation(recommendation)
}
