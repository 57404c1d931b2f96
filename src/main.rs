//! Legal Eagle - an AI-powered Australian legal research assistant.
//!
//! Takes a legal research question, searches AustLII for related cases, builds a
//! jurisdiction-aware prompt and asks the xAI Grok API for a structured research summary.

mod austlii;
mod config;
mod error;
mod llm;
mod render;
mod research;

use std::io::{BufRead, Write};

use anyhow::Result;
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use austlii::AustLiiSearcher;
use config::{AppConfig, Jurisdiction, jurisdictions};
use error::ResearchError;
use llm::GrokClient;
use research::Assistant;

type LegalAssistant = Assistant<GrokClient, AustLiiSearcher>;

/// Run one query and render its result. Returns false when the query failed.
async fn run_query(assistant: &LegalAssistant, config: &AppConfig, query: &str, jurisdiction: &'static Jurisdiction) -> Result<bool> {
    match assistant.research(query, jurisdiction).await {
        Ok(result) => {
            let mut stdout = std::io::stdout().lock();
            render::render_report(&mut stdout, &result, config.format)?;
            stdout.flush()?;
            drop(stdout);

            if config.save
                && let Err(e) = render::save_report(&config.report_dir, &result)
            {
                warn!("Could not save report: {:#}", e);
            }
            Ok(true)
        }
        Err(e @ (ResearchError::EmptyQuery | ResearchError::BudgetExceeded { .. })) => {
            warn!("⚠️  {}", e);
            Ok(false)
        }
        Err(e) => {
            error!("❌ Research failed: {}", e);
            Ok(false)
        }
    }
}

/// Read stdin lines on a plain thread.
///
/// Tokio's stdin blocks runtime shutdown until a read returns, so a pending read would
/// keep the process alive after Ctrl+C or SIGTERM. The thread is left behind on exit.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Interactive loop: one query per line until EOF, `quit` or cancellation.
///
/// `:j <name>` switches jurisdiction for the following queries.
async fn run_interactive(
    assistant: &LegalAssistant,
    config: &AppConfig,
    mut lines: mpsc::Receiver<String>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut jurisdiction = config.jurisdiction;

    eprintln!("Enter a legal query ({}). ':j <jurisdiction>' to switch, 'quit' to exit.", jurisdiction.name);

    loop {
        eprint!("legal-eagle> ");
        std::io::stderr().flush()?;

        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.recv() => line,
        };
        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            _ => {}
        }

        if let Some(name) = line.strip_prefix(":j ") {
            match jurisdictions::get_jurisdiction(name) {
                Some(j) => {
                    jurisdiction = j;
                    info!("Jurisdiction set to {} ({})", j.name, j.code);
                }
                None => warn!("Unknown jurisdiction '{}'. Run with --list-jurisdictions to see available jurisdictions", name.trim()),
            }
            continue;
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Query cancelled");
                break;
            }
            outcome = run_query(assistant, config, line, jurisdiction) => {
                outcome?;
            }
        }
    }

    Ok(())
}

/// Cancel `cancel` on Ctrl+C or SIGTERM.
async fn wait_for_shutdown(cancel: CancellationToken) {
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("🛑 Received Ctrl+C, shutting down...");
        }
        _ = async {
            #[cfg(unix)]
            {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                    }
                    Err(e) => {
                        warn!("Failed to register SIGTERM handler: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            }
            #[cfg(not(unix))]
            {
                std::future::pending::<()>().await;
            }
        } => {
            info!("🛑 Received SIGTERM, shutting down...");
        }
    }

    cancel.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments (and the .env secret file)
    let config = AppConfig::from_args();

    // Respect RUST_LOG env var, fallback to verbose flag, default to info.
    // Logs go to stderr so stdout only carries rendered results.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("⚖️  Legal Eagle v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration and load the credential before any request
    if let Err(e) = config.validate() {
        error!("❌ Configuration error: {}", e);
        std::process::exit(1);
    }

    let api_key = match config.credentials() {
        Ok(key) => key,
        Err(e) => {
            error!("❌ {}", e);
            error!("To enable AI features add GROK_API_KEY to your environment or a .env file.");
            std::process::exit(1);
        }
    };

    config.log_config();

    let backend = GrokClient::new(&config, api_key)?;
    let searcher = if config.skip_search { None } else { Some(AustLiiSearcher::new(&config)?) };
    let assistant = Assistant::new(&config, backend, searcher);

    let cancel = CancellationToken::new();
    tokio::spawn(wait_for_shutdown(cancel.clone()));

    if let Some(query) = config.query.as_deref() {
        let succeeded = tokio::select! {
            _ = cancel.cancelled() => false,
            outcome = run_query(&assistant, &config, query, config.jurisdiction) => outcome?,
        };
        if !succeeded {
            std::process::exit(1);
        }
        return Ok(());
    }

    run_interactive(&assistant, &config, spawn_stdin_reader(), cancel).await?;

    info!("✅ Legal Eagle stopped");
    Ok(())
}
