//! # UFA Ledger Node
//!
//! Process front door for the UFA ledger.
//!
//! ## Startup Sequence
//!
//! 1. Initialise telemetry (from env)
//! 2. Load configuration (from env and arguments)
//! 3. Open the ledger store (JSON file or in-memory)
//! 4. Seed the master indices
//! 5. Replay the operation script, one JSON result per line on stdout
//!
//! ## Usage
//!
//! ```text
//! ufa-node [SCRIPT]          # reads stdin when SCRIPT is omitted
//! UFA_DATA_FILE=ledger.json ufa-node ops.jsonl
//! ```

mod observer;
mod script;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use ufa_ledger::adapters::{FileLedgerStore, InMemoryLedgerStore};
use ufa_ledger::config::ServiceConfig;
use ufa_ledger::dispatch::Dispatcher;
use ufa_ledger::ports::inbound::UfaLedgerApi;
use ufa_ledger::ports::outbound::LedgerStore;
use ufa_ledger::service::UfaLedgerService;
use ufa_telemetry::{init_telemetry, TelemetryConfig};

use crate::observer::NodeObserver;

/// Node configuration.
#[derive(Debug, Clone)]
struct NodeConfig {
    service: ServiceConfig,
    /// JSON-file store location; in-memory when unset.
    data_file: Option<PathBuf>,
    /// Operation script; stdin when unset.
    script: Option<PathBuf>,
}

/// Load configuration from environment and arguments.
fn load_config() -> NodeConfig {
    let service = ServiceConfig::from_env();
    let data_file = std::env::var("UFA_DATA_FILE")
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from);
    let script = std::env::args().nth(1).map(PathBuf::from);

    NodeConfig {
        service,
        data_file,
        script,
    }
}

/// Outcome counts of a script run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RunSummary {
    succeeded: usize,
    failed: usize,
}

fn run<S: LedgerStore>(
    store: S,
    config: ServiceConfig,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<RunSummary> {
    let service = UfaLedgerService::new(store, config).with_observer(Arc::new(NodeObserver));
    service.initialize().context("Failed to initialise ledger indices")?;
    let dispatcher = Dispatcher::new(service);

    let mut summary = RunSummary::default();
    for (index, line) in input.lines().enumerate() {
        let line = line.context("Failed to read script line")?;
        let Some(response) = script::run_line(&dispatcher, index + 1, &line) else {
            continue;
        };

        if response.ok {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
        serde_json::to_writer(&mut output, &response).context("Failed to write result")?;
        writeln!(output).context("Failed to write result")?;
    }
    output.flush().context("Failed to flush results")?;

    let stats = dispatcher.api().stats();
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        agreements_created = stats.agreements_created,
        invoice_pairs_created = stats.invoice_pairs_created,
        validation_rejections = stats.validation_rejections,
        "Script finished"
    );
    Ok(summary)
}

fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialise telemetry")?;

    let config = load_config();
    info!(
        atomic_writes = config.service.atomic_writes,
        enforce_unique_records = config.service.enforce_unique_records,
        "Starting UFA ledger node v{}",
        ufa_ledger::VERSION
    );

    let input: Box<dyn BufRead> = match &config.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open script {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let output = io::stdout().lock();

    let summary = match &config.data_file {
        Some(path) => {
            let store = FileLedgerStore::open(path)
                .with_context(|| format!("Failed to open ledger file {}", path.display()))?;
            run(store, config.service, input, output)?
        }
        None => {
            warn!("UFA_DATA_FILE not set, ledger state will not outlive this process");
            run(InMemoryLedgerStore::new(), config.service, input, output)?
        }
    };

    if summary.failed > 0 {
        info!(failed = summary.failed, "Some operations were refused");
    }
    Ok(())
}
