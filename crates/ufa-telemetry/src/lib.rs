//! # UFA Telemetry
//!
//! Structured logging for the UFA ledger node.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ufa_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Logs are now written to stderr
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `UFA_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `UFA_JSON_LOGS` | `false` | One JSON object per log line |
//! | `UFA_SERVICE_NAME` | `ufa-ledger` | Service name attached to the startup log |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}

/// Initialise logging for the process.
///
/// Returns a guard to hold for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(&config)?;
    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}

/// Log an agreement-related event with standard fields.
#[macro_export]
macro_rules! log_agreement_event {
    ($level:ident, $msg:expr, $agreement_number:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            agreement_number = %$agreement_number,
            $($($field)*,)?
            "{}",
            $msg
        )
    };
}

/// Log an invoice-related event with standard fields.
#[macro_export]
macro_rules! log_invoice_event {
    ($level:ident, $msg:expr, $invoice_number:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            invoice_number = %$invoice_number,
            $($($field)*,)?
            "{}",
            $msg
        )
    };
}
