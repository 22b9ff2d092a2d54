// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! The seven checks. Each is a pure function of the retrieved data and the
//! scan mode; none reads another check's output.

pub mod access;
pub mod discovery;
pub mod headers;
pub mod meta;
pub mod robots;
pub mod stability;
pub mod structure;

pub use access::{check_access_control, AccessInput};
pub use discovery::check_ai_discovery_files;
pub use headers::check_http_headers;
pub use meta::check_meta_directives;
pub use robots::{check_robots_txt, RobotsEvaluation};
pub use stability::check_response_stability;
pub use structure::check_content_structure;

use scraper::{Html, Selector};

/// `round(100 * part / total)`, 0 for an empty total
pub(crate) fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u8
}

/// Join up to `limit` names, noting how many were left out
pub(crate) fn name_list(names: &[&str], limit: usize) -> String {
    let shown = names
        .iter()
        .take(limit)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > limit {
        format!("{shown} (+{} more)", names.len() - limit)
    } else {
        shown
    }
}

pub(crate) fn count(document: &Html, css: &str) -> usize {
    let Ok(selector) = Selector::parse(css) else {
        return 0;
    };
    document.select(&selector).count()
}

/// Attribute of the first element matching `css`
pub(crate) fn first_attr<'a>(document: &'a Html, css: &str, attr: &str) -> Option<&'a str> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
}
