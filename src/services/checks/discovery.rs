// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::retrieval::{DiscoveryFileProbe, DiscoveryOutcome};
use crate::models::scan::{CheckId, CheckResult, Recommendation, ScanMode};

fn score(found: usize, mode: ScanMode) -> u8 {
    match (mode, found) {
        // Discovery files make a site easier for AI to understand
        (ScanMode::Block, 0) => 100,
        (ScanMode::Block, 1) => 60,
        (ScanMode::Block, 2) => 30,
        (ScanMode::Block, _) => 0,
        (ScanMode::Allow, 0) => 0,
        (ScanMode::Allow, 1) => 50,
        (ScanMode::Allow, 2) => 80,
        (ScanMode::Allow, _) => 100,
    }
}

fn detail(probe: &DiscoveryFileProbe) -> String {
    let name = probe.file.name;
    match probe.outcome {
        DiscoveryOutcome::Found { bytes } => {
            format!("✓ {name} found ({bytes} bytes) — {}", probe.file.description)
        }
        DiscoveryOutcome::Empty { .. } => format!("⚠ {name} exists but appears empty"),
        DiscoveryOutcome::Missing { status } => format!("✗ {name} not found (HTTP {status})"),
        DiscoveryOutcome::Unreachable => format!("✗ {name} not accessible"),
    }
}

fn starter_files_snippet(origin: &str) -> String {
    format!(
        "# Create /llms.txt in your root:\n\
         # BotCheck\n\
         > A tool to check AI crawler access to websites.\n\
         \n\
         This site provides free AI visibility analysis.\n\
         \n\
         ## Docs\n\
         - [Homepage]({origin}): Main scanning tool\n\
         \n\
         # Create /ai.txt in your root:\n\
         # See https://site.spawning.ai/spawning-ai-txt\n\
         User-Agent: *\n\
         Allowed: Yes"
    )
}

/// Score the presence of llms.txt and friends. `origin` is used in the
/// example files suggested to allow-mode users.
pub fn check_ai_discovery_files(
    probes: &[DiscoveryFileProbe],
    origin: &str,
    mode: ScanMode,
) -> CheckResult {
    let details: Vec<String> = probes.iter().map(detail).collect();
    let found: Vec<&str> = probes
        .iter()
        .filter(|p| p.found())
        .map(|p| p.file.name)
        .collect();

    let score = score(found.len(), mode);

    let recommendation = match mode {
        ScanMode::Block if !found.is_empty() => {
            let listing: Vec<String> = found.iter().map(|f| format!("# - {f}")).collect();
            Some(Recommendation::with_snippet(
                format!("Remove {} to reduce AI discoverability.", found.join(", ")),
                format!("# Delete these files from your server:\n{}", listing.join("\n")),
                "bash",
            ))
        }
        ScanMode::Allow if found.len() < 2 => Some(Recommendation::with_snippet(
            "Add AI discovery files so AI systems can understand your site.",
            starter_files_snippet(origin),
            "txt",
        )),
        _ => None,
    };

    let summary = if found.is_empty() {
        format!("No AI discovery files found (checked {})", probes.len())
    } else {
        format!(
            "{}/{} files found: {}",
            found.len(),
            probes.len(),
            found.join(", ")
        )
    };

    CheckResult::new(CheckId::AiDiscoveryFiles, mode, score, summary, details)
        .with_recommendation(recommendation)
}
