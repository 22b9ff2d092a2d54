// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use super::{count, first_attr};
use crate::models::scan::{CheckId, CheckResult, Recommendation, ScanMode};
use scraper::Html;

/// Number of quality signals a page can earn
const MAX_POINTS: u32 = 7;

const MIN_DESCRIPTION_CHARS: usize = 20;

const EXAMPLE_MARKUP: &str = "<!-- Example structured data -->\n\
<script type=\"application/ld+json\">\n\
{\n  \"@context\": \"https://schema.org\",\n  \"@type\": \"WebPage\",\n  \
\"name\": \"Your Page Title\",\n  \"description\": \"Your page description\"\n}\n\
</script>\n\n\
<!-- Meta description -->\n\
<meta name=\"description\" content=\"Your page description here\">\n\n\
<!-- Open Graph -->\n\
<meta property=\"og:title\" content=\"Your Page Title\">\n\
<meta property=\"og:description\" content=\"Your page description\">";

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Structural facts read off the document once
struct PageStructure<'a> {
    has_article: bool,
    has_main: bool,
    h1: usize,
    h2: usize,
    json_ld: usize,
    microdata: usize,
    description: Option<&'a str>,
    og_title: bool,
    og_description: bool,
    lang: Option<&'a str>,
    has_nav: bool,
    has_footer: bool,
}

impl<'a> PageStructure<'a> {
    fn read(document: &'a Html) -> Self {
        Self {
            has_article: count(document, "article") > 0,
            has_main: count(document, "main") > 0,
            h1: count(document, "h1"),
            h2: count(document, "h2"),
            json_ld: count(document, r#"script[type="application/ld+json"]"#),
            microdata: count(document, "[itemscope]"),
            description: first_attr(document, r#"meta[name="description"]"#, "content"),
            og_title: count(document, r#"meta[property="og:title"]"#) > 0,
            og_description: count(document, r#"meta[property="og:description"]"#) > 0,
            lang: first_attr(document, "html", "lang").filter(|l| !l.is_empty()),
            has_nav: count(document, "nav") > 0,
            has_footer: count(document, "footer") > 0,
        }
    }

    fn has_description(&self) -> bool {
        self.description
            .is_some_and(|d| d.chars().count() > MIN_DESCRIPTION_CHARS)
    }

    fn has_structured_data(&self) -> bool {
        self.json_ld > 0 || self.microdata > 0
    }

    /// Score in half points, so a lone `<h1>` can earn 1 of 2
    fn half_points(&self, details: &mut Vec<String>) -> u32 {
        let mut half_points = 0;

        if self.has_article || self.has_main {
            half_points += 2;
            let containers: Vec<&str> = [
                self.has_article.then_some("<article>"),
                self.has_main.then_some("<main>"),
            ]
            .into_iter()
            .flatten()
            .collect();
            details.push(format!("✓ Semantic containers: {}", containers.join(" ")));
        } else {
            details.push("✗ No <article> or <main> tags found".to_string());
        }

        if self.h1 == 1 && self.h2 > 0 {
            half_points += 2;
            details.push(format!("✓ Good heading structure: 1 <h1>, {} <h2>", self.h2));
        } else if self.h1 >= 1 {
            half_points += 1;
            details.push(format!(
                "⚠ {}, {} <h2> tags",
                plural(self.h1, "<h1> tag"),
                self.h2
            ));
        } else {
            details.push("✗ No <h1> tag found".to_string());
        }

        if self.has_structured_data() {
            half_points += 2;
            let sources: Vec<String> = [
                (self.json_ld > 0).then(|| plural(self.json_ld, "JSON-LD block")),
                (self.microdata > 0).then(|| plural(self.microdata, "microdata element")),
            ]
            .into_iter()
            .flatten()
            .collect();
            details.push(format!("✓ Structured data: {}", sources.join(" ")));
        } else {
            details.push("✗ No structured data (JSON-LD or microdata)".to_string());
        }

        if self.has_description() {
            half_points += 2;
            details.push("✓ Meta description present".to_string());
        } else {
            details.push("✗ No meta description or too short".to_string());
        }

        if self.og_title && self.og_description {
            half_points += 2;
            details.push("✓ Open Graph tags present".to_string());
        } else {
            details.push("✗ Missing Open Graph tags".to_string());
        }

        match self.lang {
            Some(lang) => {
                half_points += 2;
                details.push(format!("✓ Language declared: {lang}"));
            }
            None => details.push("✗ No lang attribute on <html>".to_string()),
        }

        if self.has_nav && self.has_footer {
            half_points += 2;
            details.push("✓ Good page structure (<nav> and <footer> present)".to_string());
        } else {
            details.push(format!(
                "⚠ Page structure: {}, {}",
                if self.has_nav { "<nav> found" } else { "no <nav>" },
                if self.has_footer { "<footer> found" } else { "no <footer>" },
            ));
        }

        half_points
    }

    /// Improvements suggested to allow-mode users, most valuable first
    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.has_article && !self.has_main {
            missing.push("<main> or <article> wrapper");
        }
        if self.h1 != 1 {
            missing.push("single <h1> tag");
        }
        if !self.has_structured_data() {
            missing.push("structured data (JSON-LD)");
        }
        if !self.has_description() {
            missing.push("meta description");
        }
        if !self.og_title || !self.og_description {
            missing.push("Open Graph tags");
        }
        missing
    }
}

/// Rate how easy the page is for a machine to parse.
///
/// Allow mode scores the quality directly; block mode scores its complement,
/// since a well-structured page is easier to harvest.
pub fn check_content_structure(document: &Html, mode: ScanMode) -> CheckResult {
    let page = PageStructure::read(document);
    let mut details = Vec::new();
    let half_points = page.half_points(&mut details);

    let points = f64::from(half_points) / 2.0;
    let quality = (points / f64::from(MAX_POINTS) * 100.0).round() as u8;

    let score = match mode {
        ScanMode::Block => 100 - quality,
        ScanMode::Allow => quality,
    };

    let missing = page.missing();
    let recommendation = (mode == ScanMode::Allow && !missing.is_empty()).then(|| {
        Recommendation::with_snippet(
            format!(
                "Add {} to improve AI readability.",
                missing.iter().take(3).copied().collect::<Vec<_>>().join(", ")
            ),
            EXAMPLE_MARKUP,
            "html",
        )
    });

    let summary = format!("{}/{MAX_POINTS} quality signals", points.round() as u32);

    CheckResult::new(CheckId::ContentStructure, mode, score, summary, details)
        .with_recommendation(recommendation)
}
