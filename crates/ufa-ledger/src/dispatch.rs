//! # Operation Dispatch
//!
//! Front door mapping an operation name plus an ordered list of string
//! arguments onto the [`UfaLedgerApi`].
//!
//! ## Argument tuples
//!
//! | Operation | Arguments |
//! |-----------|-----------|
//! | `init`, `probe`, `queryAllAgreements` | none |
//! | `createAgreement`, `updateAgreement` | number, role, JSON object |
//! | `createInvoicePair`, `validateInvoicePair` | role, JSON array of two objects |
//! | `updateInvoice` | number, JSON object |
//! | `validateAgreement` | role, JSON object |
//! | every other query | one key |
//!
//! Errors carry JSON-RPC style codes.

use crate::domain::entities::{Agreement, Invoice};
use crate::domain::value_objects::RawRecord;
use crate::errors::LedgerError;
use crate::ports::inbound::UfaLedgerApi;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info_span, warn};
use uuid::Uuid;

// =============================================================================
// OPERATION TABLE
// =============================================================================

/// The closed set of operations the ledger answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Init,
    Probe,
    CreateAgreement,
    UpdateAgreement,
    QueryAgreement,
    QueryAllAgreements,
    QueryTransactionHistory,
    ValidateAgreement,
    CreateInvoicePair,
    UpdateInvoice,
    QueryInvoice,
    QueryInvoicesForAgreement,
    QueryInvoicesForActor,
    QueryInvoiceByDocument,
    QueryDocumentLinks,
    ValidateInvoicePair,
}

/// Wire name of every operation.
pub const OPERATIONS: &[(&str, Operation)] = &[
    ("init", Operation::Init),
    ("probe", Operation::Probe),
    ("createAgreement", Operation::CreateAgreement),
    ("updateAgreement", Operation::UpdateAgreement),
    ("queryAgreement", Operation::QueryAgreement),
    ("queryAllAgreements", Operation::QueryAllAgreements),
    ("queryTransactionHistory", Operation::QueryTransactionHistory),
    ("validateAgreement", Operation::ValidateAgreement),
    ("createInvoicePair", Operation::CreateInvoicePair),
    ("updateInvoice", Operation::UpdateInvoice),
    ("queryInvoice", Operation::QueryInvoice),
    ("queryInvoicesForAgreement", Operation::QueryInvoicesForAgreement),
    ("queryInvoicesForActor", Operation::QueryInvoicesForActor),
    ("queryInvoiceByDocument", Operation::QueryInvoiceByDocument),
    ("queryDocumentLinks", Operation::QueryDocumentLinks),
    ("validateInvoicePair", Operation::ValidateInvoicePair),
];

impl Operation {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|(wire, _)| *wire == name)
            .map(|(_, op)| *op)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        OPERATIONS
            .iter()
            .find(|(_, op)| *op == self)
            .map_or("unknown", |(wire, _)| *wire)
    }

    /// True for operations that write to the store (invoke vs query).
    #[must_use]
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            Self::Init
                | Self::CreateAgreement
                | Self::UpdateAgreement
                | Self::CreateInvoicePair
                | Self::UpdateInvoice
        )
    }

    /// Number of string arguments the operation takes.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::Init | Self::Probe | Self::QueryAllAgreements => 0,
            Self::QueryAgreement
            | Self::QueryTransactionHistory
            | Self::QueryInvoice
            | Self::QueryInvoicesForAgreement
            | Self::QueryInvoicesForActor
            | Self::QueryInvoiceByDocument
            | Self::QueryDocumentLinks => 1,
            Self::ValidateAgreement
            | Self::CreateInvoicePair
            | Self::ValidateInvoicePair
            | Self::UpdateInvoice => 2,
            Self::CreateAgreement | Self::UpdateAgreement => 3,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error answered by the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl DispatchError {
    /// JSON-RPC style error code.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::MethodNotFound(_) => -32601,
            Self::InvalidParams(_) => -32602,
            Self::Ledger(LedgerError::Validation(_)) => -32001,
            Self::Ledger(e) if e.is_not_found() => -32004,
            Self::Ledger(_) => -32603,
        }
    }

    /// `{"code": .., "message": ..}`
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({ "code": self.code(), "message": self.to_string() })
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// A parsed request: one variant per operation with typed arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Init,
    Probe,
    CreateAgreement {
        agreement_number: String,
        actor_role: String,
        payload: RawRecord,
    },
    UpdateAgreement {
        agreement_number: String,
        actor_role: String,
        patch: RawRecord,
    },
    QueryAgreement { agreement_number: String },
    QueryAllAgreements,
    QueryTransactionHistory { agreement_number: String },
    ValidateAgreement { actor_role: String, payload: RawRecord },
    CreateInvoicePair { actor_role: String, payload: Vec<RawRecord> },
    UpdateInvoice { invoice_number: String, patch: RawRecord },
    QueryInvoice { invoice_number: String },
    QueryInvoicesForAgreement { agreement_number: String },
    QueryInvoicesForActor { actor: String },
    QueryInvoiceByDocument { document_number: String },
    QueryDocumentLinks { invoice_number: String },
    ValidateInvoicePair { actor_role: String, payload: Vec<RawRecord> },
}

impl Command {
    /// Resolve `name` and parse `args` into a command.
    pub fn parse(name: &str, args: &[String]) -> Result<Self, DispatchError> {
        let op =
            Operation::from_name(name).ok_or_else(|| DispatchError::MethodNotFound(name.to_string()))?;
        if args.len() != op.arity() {
            return Err(DispatchError::InvalidParams(format!(
                "{name} expects {} argument(s), got {}",
                op.arity(),
                args.len()
            )));
        }

        let arg = |i: usize| args[i].clone();
        let command = match op {
            Operation::Init => Self::Init,
            Operation::Probe => Self::Probe,
            Operation::CreateAgreement => Self::CreateAgreement {
                agreement_number: arg(0),
                actor_role: arg(1),
                payload: parse_record(&args[2])?,
            },
            Operation::UpdateAgreement => Self::UpdateAgreement {
                agreement_number: arg(0),
                actor_role: arg(1),
                patch: parse_record(&args[2])?,
            },
            Operation::QueryAgreement => Self::QueryAgreement {
                agreement_number: arg(0),
            },
            Operation::QueryAllAgreements => Self::QueryAllAgreements,
            Operation::QueryTransactionHistory => Self::QueryTransactionHistory {
                agreement_number: arg(0),
            },
            Operation::ValidateAgreement => Self::ValidateAgreement {
                actor_role: arg(0),
                payload: parse_record(&args[1])?,
            },
            Operation::CreateInvoicePair => Self::CreateInvoicePair {
                actor_role: arg(0),
                payload: parse_entries(&args[1]),
            },
            Operation::UpdateInvoice => Self::UpdateInvoice {
                invoice_number: arg(0),
                patch: parse_record(&args[1])?,
            },
            Operation::QueryInvoice => Self::QueryInvoice {
                invoice_number: arg(0),
            },
            Operation::QueryInvoicesForAgreement => Self::QueryInvoicesForAgreement {
                agreement_number: arg(0),
            },
            Operation::QueryInvoicesForActor => Self::QueryInvoicesForActor { actor: arg(0) },
            Operation::QueryInvoiceByDocument => Self::QueryInvoiceByDocument {
                document_number: arg(0),
            },
            Operation::QueryDocumentLinks => Self::QueryDocumentLinks {
                invoice_number: arg(0),
            },
            Operation::ValidateInvoicePair => Self::ValidateInvoicePair {
                actor_role: arg(0),
                payload: parse_entries(&args[1]),
            },
        };
        Ok(command)
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::Init => Operation::Init,
            Self::Probe => Operation::Probe,
            Self::CreateAgreement { .. } => Operation::CreateAgreement,
            Self::UpdateAgreement { .. } => Operation::UpdateAgreement,
            Self::QueryAgreement { .. } => Operation::QueryAgreement,
            Self::QueryAllAgreements => Operation::QueryAllAgreements,
            Self::QueryTransactionHistory { .. } => Operation::QueryTransactionHistory,
            Self::ValidateAgreement { .. } => Operation::ValidateAgreement,
            Self::CreateInvoicePair { .. } => Operation::CreateInvoicePair,
            Self::UpdateInvoice { .. } => Operation::UpdateInvoice,
            Self::QueryInvoice { .. } => Operation::QueryInvoice,
            Self::QueryInvoicesForAgreement { .. } => Operation::QueryInvoicesForAgreement,
            Self::QueryInvoicesForActor { .. } => Operation::QueryInvoicesForActor,
            Self::QueryInvoiceByDocument { .. } => Operation::QueryInvoiceByDocument,
            Self::QueryDocumentLinks { .. } => Operation::QueryDocumentLinks,
            Self::ValidateInvoicePair { .. } => Operation::ValidateInvoicePair,
        }
    }
}

fn parse_record(text: &str) -> Result<RawRecord, DispatchError> {
    serde_json::from_str(text)
        .map_err(|e| DispatchError::InvalidParams(format!("expected a JSON object of strings: {e}")))
}

/// Invoice entries; a payload that does not decode yields no entries and is
/// then refused as a missing counterpart.
fn parse_entries(text: &str) -> Vec<RawRecord> {
    serde_json::from_str(text).unwrap_or_else(|e| {
        warn!(error = %e, "Invoice payload did not decode, treating as empty");
        Vec::new()
    })
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// Routes commands to a [`UfaLedgerApi`] implementation.
pub struct Dispatcher<A: UfaLedgerApi> {
    api: A,
}

impl<A: UfaLedgerApi> Dispatcher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Parse and run one request under a fresh correlation id.
    pub fn execute(&self, name: &str, args: &[String]) -> Result<Value, DispatchError> {
        let correlation_id = Uuid::new_v4();
        let span = info_span!("dispatch", %correlation_id, operation = name);
        let _guard = span.enter();

        let command = Command::parse(name, args)?;
        debug!(mutating = command.operation().is_mutating(), "Dispatching");
        self.run(command)
    }

    /// Run an already parsed command.
    pub fn run(&self, command: Command) -> Result<Value, DispatchError> {
        let api = &self.api;
        match command {
            Command::Init => {
                api.initialize()?;
                Ok(json!({ "status": "Success" }))
            }
            Command::Probe => Ok(handle_probe()),
            Command::CreateAgreement {
                agreement_number,
                actor_role,
                payload,
            } => to_json::<Agreement>(&api.create_agreement(&agreement_number, &actor_role, &payload)?),
            Command::UpdateAgreement {
                agreement_number,
                actor_role,
                patch,
            } => to_json::<Agreement>(&api.update_agreement(&agreement_number, &actor_role, &patch)?),
            Command::QueryAgreement { agreement_number } => {
                to_json::<Agreement>(&api.query_agreement(&agreement_number)?)
            }
            Command::QueryAllAgreements => to_json(&api.query_all_agreements()?),
            Command::QueryTransactionHistory { agreement_number } => {
                to_json(&api.query_transaction_history(&agreement_number)?)
            }
            Command::ValidateAgreement {
                actor_role,
                payload,
            } => to_json(&api.validate_agreement(&actor_role, &payload)?.outcome()),
            Command::CreateInvoicePair {
                actor_role,
                payload,
            } => {
                let pair = api.create_invoice_pair(&actor_role, &payload)?;
                to_json(&[pair.customer, pair.vendor])
            }
            Command::UpdateInvoice {
                invoice_number,
                patch,
            } => to_json::<Invoice>(&api.update_invoice(&invoice_number, &patch)?),
            Command::QueryInvoice { invoice_number } => {
                to_json::<Invoice>(&api.query_invoice(&invoice_number)?)
            }
            Command::QueryInvoicesForAgreement { agreement_number } => {
                to_json(&api.query_invoices_for_agreement(&agreement_number)?)
            }
            Command::QueryInvoicesForActor { actor } => {
                to_json(&api.query_invoices_for_actor(&actor)?)
            }
            Command::QueryInvoiceByDocument { document_number } => {
                to_json::<Invoice>(&api.query_invoice_by_document(&document_number)?)
            }
            Command::QueryDocumentLinks { invoice_number } => {
                to_json(&api.query_document_links(&invoice_number)?)
            }
            Command::ValidateInvoicePair {
                actor_role,
                payload,
            } => to_json(&api.validate_invoice_pair(&actor_role, &payload)?.outcome()),
        }
    }
}

/// Liveness answer: `{"status":"Success","ts":<RFC 3339>}`.
#[must_use]
pub fn handle_probe() -> Value {
    json!({
        "status": "Success",
        "ts": chrono::Utc::now().to_rfc3339(),
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, DispatchError> {
    serde_json::to_value(value).map_err(|e| DispatchError::Ledger(e.into()))
}
