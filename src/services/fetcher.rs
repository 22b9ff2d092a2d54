// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Retrieval layer: robots.txt, the page itself and the AI discovery files.
//!
//! Every request is attempted once with its own timeout. Failures never
//! propagate; they are recorded in the returned records.

use crate::models::retrieval::{
    DiscoveryFile, DiscoveryFileProbe, DiscoveryOutcome, RetrievedPage, RetrievedRobotsFile,
    RetrievedSite, DISCOVERY_FILES,
};
use crate::models::settings::ScannerSettings;
use crate::services::logging::redact_url;
use crate::services::normalizer::ScanTarget;
use anyhow::Context;
use futures::future::join_all;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a single resource could not be retrieved
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Network(String),

    #[error("HTTP {0}")]
    Status(u16),
}

impl RetrievalError {
    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            RetrievalError::Timeout(timeout)
        } else {
            RetrievalError::Network(err.to_string())
        }
    }
}

/// HTTP client shared by all scans. Holds no per-scan state.
pub struct Fetcher {
    client: Client,
    robots_timeout: Duration,
    page_timeout: Duration,
    discovery_timeout: Duration,
    max_body_bytes: usize,
}

impl Fetcher {
    pub fn new(settings: &ScannerSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            robots_timeout: settings.robots_timeout,
            page_timeout: settings.page_timeout,
            discovery_timeout: settings.discovery_timeout,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    /// Fetch everything a scan needs. The six requests run concurrently.
    pub async fn retrieve(&self, target: &ScanTarget) -> RetrievedSite {
        let (robots, page, discovery) = tokio::join!(
            self.fetch_robots(&target.robots_url),
            self.fetch_page(&target.url),
            self.probe_discovery_files(target),
        );

        RetrievedSite {
            robots,
            page,
            discovery,
        }
    }

    /// Anything other than a readable 2xx response counts as "no robots.txt".
    pub async fn fetch_robots(&self, robots_url: &str) -> RetrievedRobotsFile {
        match self.get_success_body(robots_url, self.robots_timeout).await {
            Ok(body) => {
                debug!(url = %redact_url(robots_url), bytes = body.len(), "robots.txt found");
                RetrievedRobotsFile::found(String::from_utf8_lossy(&body))
            }
            Err(e) => {
                debug!(url = %redact_url(robots_url), error = %e, "robots.txt not found");
                RetrievedRobotsFile::missing()
            }
        }
    }

    /// Fetch the page itself, following redirects and reading at most
    /// `max_body_bytes` of the body.
    pub async fn fetch_page(&self, url: &str) -> RetrievedPage {
        let started = Instant::now();
        let response = match self
            .client
            .get(url)
            .timeout(self.page_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let error = RetrievalError::from_reqwest(e, self.page_timeout);
                warn!(url = %redact_url(url), error = %error, "page fetch failed");
                return RetrievedPage::unreachable(url, error.to_string());
            }
        };
        let latency = started.elapsed();

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = collect_headers(response.headers());

        // The timeout also covers the body; running out mid-body means the page never loaded
        let mut body = Vec::new();
        let fetch_error = match read_capped(response, self.max_body_bytes, &mut body).await {
            Ok(()) => None,
            Err(e) if e.is_timeout() => {
                let error = RetrievalError::Timeout(self.page_timeout);
                warn!(url = %redact_url(url), error = %error, bytes = body.len(), "page body timed out");
                Some(error.to_string())
            }
            Err(e) => {
                warn!(url = %redact_url(url), error = %e, bytes = body.len(), "page body read interrupted");
                None
            }
        };

        debug!(
            url = %redact_url(url),
            status,
            latency_ms = latency.as_millis() as u64,
            bytes = body.len(),
            "page fetched"
        );

        RetrievedPage {
            html: String::from_utf8_lossy(&body).into_owned(),
            final_url,
            status,
            headers,
            latency,
            fetch_error,
        }
    }

    /// Probe every discovery file on the target's origin, concurrently.
    /// The result keeps the order of `DISCOVERY_FILES`.
    pub async fn probe_discovery_files(&self, target: &ScanTarget) -> Vec<DiscoveryFileProbe> {
        join_all(
            DISCOVERY_FILES
                .iter()
                .map(|file| self.probe_discovery_file(target, *file)),
        )
        .await
    }

    async fn probe_discovery_file(
        &self,
        target: &ScanTarget,
        file: DiscoveryFile,
    ) -> DiscoveryFileProbe {
        let url = target.origin_url(file.path);
        match self.get_success_body(&url, self.discovery_timeout).await {
            Ok(body) => DiscoveryFileProbe::from_body(file, body.len()),
            Err(RetrievalError::Status(status)) => DiscoveryFileProbe {
                file,
                outcome: DiscoveryOutcome::Missing { status },
            },
            Err(e) => {
                debug!(url = %redact_url(&url), error = %e, "discovery file unreachable");
                DiscoveryFileProbe {
                    file,
                    outcome: DiscoveryOutcome::Unreachable,
                }
            }
        }
    }

    /// GET `url` and return its (capped) body if the status is 2xx and the
    /// body could be read to the end or to the cap
    async fn get_success_body(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Vec<u8>, RetrievalError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| RetrievalError::from_reqwest(e, timeout))?;

        if !response.status().is_success() {
            return Err(RetrievalError::Status(response.status().as_u16()));
        }

        let mut body = Vec::new();
        read_capped(response, self.max_body_bytes, &mut body)
            .await
            .map_err(|e| RetrievalError::from_reqwest(e, timeout))?;
        Ok(body)
    }
}

/// Read the body into `body` chunk by chunk, stopping once `cap` bytes have
/// been read. On error `body` holds whatever arrived before it.
async fn read_capped(
    mut response: Response,
    cap: usize,
    body: &mut Vec<u8>,
) -> Result<(), reqwest::Error> {
    while body.len() < cap {
        match response.chunk().await? {
            Some(chunk) => body.extend_from_slice(&chunk),
            None => break,
        }
    }
    body.truncate(cap);
    Ok(())
}

fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut collected: HashMap<String, String> = HashMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        collected
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    #[test]
    fn test_collect_headers_joins_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.append(
            HeaderName::from_static("x-robots-tag"),
            HeaderValue::from_static("noindex"),
        );
        headers.append(
            HeaderName::from_static("x-robots-tag"),
            HeaderValue::from_static("noai"),
        );
        headers.insert(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("text/html"),
        );

        let collected = collect_headers(&headers);
        assert_eq!(collected["x-robots-tag"], "noindex, noai");
        assert_eq!(collected["content-type"], "text/html");
    }

    #[test]
    fn test_retrieval_error_messages() {
        assert_eq!(RetrievalError::Status(404).to_string(), "HTTP 404");
        assert_eq!(
            RetrievalError::Timeout(Duration::from_secs(5)).to_string(),
            "request timed out after 5s"
        );
    }

    #[tokio::test]
    async fn test_fetch_page_reports_connection_failure_as_data() {
        let settings = ScannerSettings {
            page_timeout: Duration::from_secs(2),
            ..ScannerSettings::default()
        };
        let fetcher = Fetcher::new(&settings).unwrap();

        // Port 9 (discard) on localhost is not expected to accept HTTP
        let page = fetcher.fetch_page("http://127.0.0.1:9/").await;
        assert_eq!(page.status, 0);
        assert!(page.fetch_error.is_some());
        assert!(page.html.is_empty());
    }
}
