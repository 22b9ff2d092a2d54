// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use super::{count, first_attr};
use crate::models::scan::{CheckId, CheckResult, Recommendation, ScanMode};
use scraper::Html;

/// Directives recognised in the robots meta tag's comma-separated list
const LISTED_DIRECTIVES: [&str; 5] = ["noindex", "nofollow", "none", "nosnippet", "noarchive"];

/// Directives that keep a page out of AI systems altogether
const BLOCKING_DIRECTIVES: [&str; 3] = ["noai", "none", "noindex"];

/// Collect the AI-relevant meta directives present on the page
fn find_directives(document: &Html, details: &mut Vec<String>) -> Vec<&'static str> {
    let mut found = Vec::new();

    if let Some(content) = first_attr(document, r#"meta[name="robots"]"#, "content")
        .filter(|c| !c.is_empty())
    {
        details.push(format!("robots meta: \"{content}\""));
        let lower = content.to_lowercase();
        let listed: Vec<&str> = lower.split(',').map(str::trim).collect();
        found.extend(
            LISTED_DIRECTIVES
                .iter()
                .copied()
                .filter(|directive| listed.contains(directive)),
        );
    }

    if count(document, r#"meta[name="robots"][content*="noai"]"#) > 0
        || count(document, r#"meta[name="noai"]"#) > 0
    {
        found.push("noai");
        details.push("noai directive found".to_string());
    }

    if count(document, r#"meta[name="robots"][content*="noimageai"]"#) > 0
        || count(document, r#"meta[name="noimageai"]"#) > 0
    {
        found.push("noimageai");
        details.push("noimageai directive found".to_string());
    }

    if count(document, r#"meta[name="googlebot"][content*="noai"]"#) > 0
        || count(document, r#"meta[name="google"][content*="nositelinkssearchbox"]"#) > 0
    {
        found.push("google-noai");
        details.push("Google-specific AI directive found".to_string());
    }

    found
}

fn score(found: &[&str], mode: ScanMode) -> u8 {
    let has = |directive: &str| found.iter().any(|f| *f == directive);
    match mode {
        ScanMode::Block if has("noai") || has("none") => 100,
        ScanMode::Block if has("noindex") => 70,
        ScanMode::Block if !found.is_empty() => 50,
        ScanMode::Block => 0,
        ScanMode::Allow if found.is_empty() => 100,
        ScanMode::Allow if BLOCKING_DIRECTIVES.iter().any(|d| has(*d)) => 0,
        ScanMode::Allow => 50,
    }
}

pub fn check_meta_directives(document: &Html, mode: ScanMode) -> CheckResult {
    let mut details = Vec::new();
    let found = find_directives(document, &mut details);

    if found.is_empty() {
        details.push("No AI-blocking meta directives found".to_string());
    }

    let score = score(&found, mode);

    let recommendation = match mode {
        _ if score >= 70 => None,
        ScanMode::Block => Some(Recommendation::with_snippet(
            "Add meta directives to block AI from indexing this page.",
            "<!-- Add inside <head> -->\n<meta name=\"robots\" content=\"noai, noimageai\">\n<meta name=\"robots\" content=\"noindex, nofollow\">",
            "html",
        )),
        ScanMode::Allow => Some(Recommendation::with_snippet(
            "Remove AI-blocking meta directives so crawlers can index your content.",
            "<!-- Ensure your robots meta allows indexing -->\n<meta name=\"robots\" content=\"index, follow\">",
            "html",
        )),
    };

    let summary = if found.is_empty() {
        "No AI-blocking directives".to_string()
    } else {
        format!("Found: {}", found.join(", "))
    };

    CheckResult::new(CheckId::MetaDirectives, mode, score, summary, details)
        .with_recommendation(recommendation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(head: &str) -> Html {
        Html::parse_document(&format!(
            "<html><head>{head}</head><body><p>Hello</p></body></html>"
        ))
    }

    #[test]
    fn test_no_directives() {
        let doc = page("<title>Plain</title>");
        let block = check_meta_directives(&doc, ScanMode::Block);
        assert_eq!(block.score, 0);
        assert_eq!(block.summary, "No AI-blocking directives");
        assert!(block.recommendation.is_some());

        let allow = check_meta_directives(&doc, ScanMode::Allow);
        assert_eq!(allow.score, 100);
        assert!(allow.recommendation.is_none());
    }

    #[test]
    fn test_noai_scores_full_for_block() {
        let doc = page(r#"<meta name="robots" content="noai, noimageai">"#);
        let check = check_meta_directives(&doc, ScanMode::Block);
        assert_eq!(check.score, 100);
        assert_eq!(check.summary, "Found: noai, noimageai");
        assert!(check.recommendation.is_none());

        assert_eq!(check_meta_directives(&doc, ScanMode::Allow).score, 0);
    }

    #[test]
    fn test_none_directive() {
        let doc = page(r#"<meta name="robots" content="NONE">"#);
        assert_eq!(check_meta_directives(&doc, ScanMode::Block).score, 100);
        assert_eq!(check_meta_directives(&doc, ScanMode::Allow).score, 0);
    }

    #[test]
    fn test_noindex_scores_seventy() {
        let doc = page(r#"<meta name="robots" content="noindex, nofollow">"#);
        let check = check_meta_directives(&doc, ScanMode::Block);
        assert_eq!(check.score, 70);
        assert_eq!(check.summary, "Found: noindex, nofollow");
        assert_eq!(check.details[0], "robots meta: \"noindex, nofollow\"");
        assert_eq!(check_meta_directives(&doc, ScanMode::Allow).score, 0);
    }

    #[test]
    fn test_soft_directive_scores_fifty() {
        let doc = page(r#"<meta name="robots" content="nosnippet">"#);
        assert_eq!(check_meta_directives(&doc, ScanMode::Block).score, 50);
        assert_eq!(check_meta_directives(&doc, ScanMode::Allow).score, 50);
    }

    #[test]
    fn test_dedicated_meta_names() {
        let doc = page(r#"<meta name="noai"><meta name="noimageai">"#);
        let check = check_meta_directives(&doc, ScanMode::Block);
        assert_eq!(check.summary, "Found: noai, noimageai");
        assert_eq!(check.score, 100);
    }

    #[test]
    fn test_google_specific_signal() {
        let doc = page(r#"<meta name="googlebot" content="noai">"#);
        let check = check_meta_directives(&doc, ScanMode::Block);
        assert_eq!(check.summary, "Found: google-noai");
        assert_eq!(check.score, 50);
        assert_eq!(check_meta_directives(&doc, ScanMode::Allow).score, 50);
    }
}
