// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use botcheck::app::{create_router, AppState, VERSION};
use botcheck::error::ScanError;
use botcheck::models::crawler::CrawlerCatalog;
use botcheck::models::scan::ScanRequest;
use botcheck::models::settings::ScannerSettings;
use botcheck::services::logging::init_tracing;
use botcheck::services::scanner::Scanner;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

/// Score how accessible or how blocked a web page is to AI crawlers
#[derive(Parser)]
#[command(name = "botcheck")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address, overrides BOTCHECK_BIND_ADDR
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Scan one URL and print the result as JSON
    Scan {
        /// Page to scan; https:// is assumed when no scheme is given
        url: String,

        /// "block" to score protection, "allow" to score visibility
        #[arg(long, default_value = "block")]
        mode: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn build_scanner(settings: &ScannerSettings) -> Result<Scanner> {
    let catalog = CrawlerCatalog::load(settings.crawlers_file.as_deref())?;
    info!(crawlers = catalog.len(), "Crawler catalog loaded");
    Scanner::new(settings, Arc::new(catalog))
}

async fn serve(settings: ScannerSettings) -> Result<()> {
    let scanner = build_scanner(&settings)?;
    let app = create_router(AppState {
        scanner: Arc::new(scanner),
    });

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;

    info!(version = VERSION, addr = %settings.bind_addr, "botcheck listening");

    axum::serve(listener, app).await.context("HTTP server failed")
}

async fn scan_once(settings: ScannerSettings, url: String, mode: String, pretty: bool) -> Result<ExitCode> {
    let scanner = build_scanner(&settings)?;
    let request = ScanRequest {
        url: Some(url),
        mode: Some(mode),
    };

    match scanner.scan(&request).await {
        Ok(result) => {
            let json = if pretty {
                serde_json::to_string_pretty(&result)
            } else {
                serde_json::to_string(&result)
            }
            .context("Failed to serialize scan result")?;
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ ScanError::InvalidRequest(_)) => {
            eprintln!("error: {e}");
            Ok(ExitCode::from(2))
        }
        Err(e @ ScanError::Unexpected(_)) => {
            error!(error = %e, "Scan failed");
            eprintln!("error: {e}");
            Ok(ExitCode::from(1))
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let mut settings = ScannerSettings::from_env()?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                settings.bind_addr = bind;
            }
            serve(settings).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Scan { url, mode, pretty } => scan_once(settings, url, mode, pretty).await,
    }
}
