// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use super::first_attr;
use crate::models::scan::{CheckId, CheckResult, Recommendation, ScanMode};
use scraper::{Html, Selector};
use serde_json::Value;

/// Fragments of a redirect target that suggest a login or signup wall
const LOGIN_URL_KEYWORDS: [&str; 5] = ["login", "signin", "auth", "subscribe", "register"];

const PAYWALL_PHRASES: [&str; 8] = [
    "subscribe to continue",
    "sign in to read",
    "create an account",
    "members only",
    "premium content",
    "paywall",
    "subscription required",
    "log in to view",
];

/// Everything the access-control check needs from the page fetch
#[derive(Debug, Clone, Copy)]
pub struct AccessInput<'a> {
    pub document: &'a Html,
    pub status: u16,
    /// URL after redirects
    pub final_url: &'a str,
    /// Normalized URL that was requested
    pub requested_url: &'a str,
}

/// True when a JSON-LD value declares itself not free to access
fn declares_not_free(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().any(declares_not_free),
        Value::Object(map) => matches!(
            map.get("isAccessibleForFree"),
            Some(Value::Bool(false))
        ) || matches!(
            map.get("isAccessibleForFree"),
            Some(Value::String(s)) if s == "False"
        ),
        _ => false,
    }
}

/// One `jsonld-paywall` signal per script block that declares paid access.
/// Blocks that are not valid JSON are skipped.
fn jsonld_paywall_blocks(document: &Html) -> usize {
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return 0;
    };
    document
        .select(&selector)
        .filter_map(|script| serde_json::from_str::<Value>(&script.text().collect::<String>()).ok())
        .filter(declares_not_free)
        .count()
}

fn collect_signals(input: &AccessInput<'_>, details: &mut Vec<String>) -> Vec<&'static str> {
    let mut signals = Vec::new();

    if input.status == 401 || input.status == 403 {
        signals.push("auth-required");
        details.push(format!("HTTP {} — authentication required", input.status));
    }

    if input.final_url != input.requested_url {
        let final_lower = input.final_url.to_lowercase();
        if LOGIN_URL_KEYWORDS.iter().any(|k| final_lower.contains(k)) {
            signals.push("login-redirect");
            details.push(format!("Redirected to login/auth page: {}", input.final_url));
        }
    }

    let body_text = input
        .document
        .root_element()
        .text()
        .collect::<String>()
        .to_lowercase();
    if let Some(phrase) = PAYWALL_PHRASES.iter().find(|p| body_text.contains(*p)) {
        signals.push("paywall-text");
        details.push(format!("Paywall indicator found: \"{phrase}\""));
    }

    let schema_value = first_attr(
        input.document,
        r#"[itemtype*="CreativeWork"] [itemprop="isAccessibleForFree"]"#,
        "content",
    );
    if matches!(schema_value, Some("false" | "False")) {
        signals.push("schema-paywall");
        details.push("Schema.org indicates content is not free".to_string());
    }

    for _ in 0..jsonld_paywall_blocks(input.document) {
        signals.push("jsonld-paywall");
        details.push("JSON-LD indicates content is not free".to_string());
    }

    signals
}

fn score(signals: &[&str], mode: ScanMode) -> u8 {
    let auth_required = signals.contains(&"auth-required");
    match mode {
        ScanMode::Block if auth_required => 100,
        ScanMode::Block if signals.len() >= 2 => 80,
        ScanMode::Block if signals.len() == 1 => 60,
        ScanMode::Block => 0,
        ScanMode::Allow if auth_required => 0,
        ScanMode::Allow if signals.len() >= 2 => 20,
        ScanMode::Allow if signals.len() == 1 => 50,
        ScanMode::Allow => 100,
    }
}

/// Detect paywalls, login walls and "not free" structured data
pub fn check_access_control(input: &AccessInput<'_>, mode: ScanMode) -> CheckResult {
    let mut details = Vec::new();
    let signals = collect_signals(input, &mut details);

    if signals.is_empty() {
        details.push("No paywall or login wall detected".to_string());
    }

    let score = score(&signals, mode);

    let recommendation = match mode {
        ScanMode::Allow if !signals.is_empty() => Some(Recommendation::text(
            "Paywalls and login walls prevent AI crawlers from accessing your content. \
             Consider making key pages publicly accessible.",
        )),
        ScanMode::Block if signals.is_empty() => Some(Recommendation::with_snippet(
            "Your content is publicly accessible. Add authentication or use schema markup \
             to signal restricted access.",
            "<!-- Add to JSON-LD to signal paywall -->\n\
             <script type=\"application/ld+json\">\n\
             {\n  \"@context\": \"https://schema.org\",\n  \"@type\": \"WebPage\",\n  \
             \"isAccessibleForFree\": false\n}\n\
             </script>",
            "html",
        )),
        _ => None,
    };

    let summary = match signals.len() {
        0 => "No paywall detected".to_string(),
        1 => "1 paywall signal detected".to_string(),
        n => format!("{n} paywall signals detected"),
    };

    CheckResult::new(CheckId::PaywallDetection, mode, score, summary, details)
        .with_recommendation(recommendation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/article";

    fn run(html: &str, status: u16, final_url: &str, mode: ScanMode) -> CheckResult {
        let document = Html::parse_document(html);
        let input = AccessInput {
            document: &document,
            status,
            final_url,
            requested_url: URL,
        };
        check_access_control(&input, mode)
    }

    #[test]
    fn test_open_page() {
        let html = "<html><body><p>Free for everyone</p></body></html>";
        let block = run(html, 200, URL, ScanMode::Block);
        assert_eq!(block.score, 0);
        assert_eq!(block.summary, "No paywall detected");
        assert_eq!(block.details, vec!["No paywall or login wall detected".to_string()]);
        assert_eq!(
            block.recommendation.unwrap().snippet_lang.as_deref(),
            Some("html")
        );

        let allow = run(html, 200, URL, ScanMode::Allow);
        assert_eq!(allow.score, 100);
        assert!(allow.recommendation.is_none());
    }

    #[test]
    fn test_auth_required_dominates() {
        let block = run("<html></html>", 401, URL, ScanMode::Block);
        assert_eq!(block.score, 100);
        assert_eq!(block.details[0], "HTTP 401 — authentication required");
        assert_eq!(run("<html></html>", 403, URL, ScanMode::Allow).score, 0);
    }

    #[test]
    fn test_login_redirect() {
        let check = run("<html></html>", 200, "https://example.com/Login?next=/article", ScanMode::Block);
        assert_eq!(check.score, 60);
        assert_eq!(check.summary, "1 paywall signal detected");
        assert_eq!(
            check.details[0],
            "Redirected to login/auth page: https://example.com/Login?next=/article"
        );
    }

    #[test]
    fn test_keyword_in_unchanged_url_is_ignored() {
        let document = Html::parse_document("<html></html>");
        let input = AccessInput {
            document: &document,
            status: 200,
            final_url: "https://example.com/login",
            requested_url: "https://example.com/login",
        };
        assert_eq!(check_access_control(&input, ScanMode::Block).score, 0);
    }

    #[test]
    fn test_paywall_text_stops_at_first_phrase() {
        let html = "<html><body><p>Members Only. Subscribe to continue.</p></body></html>";
        let check = run(html, 200, URL, ScanMode::Allow);
        assert_eq!(check.score, 50);
        assert_eq!(check.details, vec!["Paywall indicator found: \"subscribe to continue\"".to_string()]);
    }

    #[test]
    fn test_microdata_paywall() {
        let html = r#"<html><body>
            <div itemscope itemtype="https://schema.org/CreativeWork">
                <meta itemprop="isAccessibleForFree" content="False">
            </div></body></html>"#;
        let check = run(html, 200, URL, ScanMode::Block);
        assert_eq!(check.score, 60);
        assert_eq!(check.details[0], "Schema.org indicates content is not free");
    }

    #[test]
    fn test_jsonld_paywall_block_mode() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"isAccessibleForFree": false}</script>
            </head><body></body></html>"#;
        let check = run(html, 200, URL, ScanMode::Block);
        assert!(check.details.contains(&"JSON-LD indicates content is not free".to_string()));
        assert!(check.score >= 60);
    }

    #[test]
    fn test_jsonld_string_false_and_arrays() {
        let html = r#"<html><head>
            <script type="application/ld+json">[{"@type": "Article", "isAccessibleForFree": "False"}]</script>
            <script type="application/ld+json">{"isAccessibleForFree": "false"}</script>
            </head></html>"#;
        let check = run(html, 200, URL, ScanMode::Block);
        // Only the capitalised string form counts, so one signal
        assert_eq!(check.summary, "1 paywall signal detected");
    }

    #[test]
    fn test_invalid_jsonld_is_ignored() {
        let html = r#"<html><head>
            <script type="application/ld+json">{ not json</script>
            <script type="application/ld+json">{"isAccessibleForFree": false}</script>
            </head></html>"#;
        let check = run(html, 200, URL, ScanMode::Block);
        assert_eq!(check.score, 60);
    }

    #[test]
    fn test_multiple_signals() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"isAccessibleForFree": false}</script>
            </head><body>Premium content for subscribers</body></html>"#;
        let block = run(html, 200, URL, ScanMode::Block);
        assert_eq!(block.score, 80);
        assert_eq!(block.summary, "2 paywall signals detected");
        let allow = run(html, 200, URL, ScanMode::Allow);
        assert_eq!(allow.score, 20);
        assert!(allow.recommendation.is_some());
    }
}
