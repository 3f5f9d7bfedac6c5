//! # Service Configuration
//!
//! Store key layout and behavioural switches, with defaults and
//! environment overrides.

use crate::domain::invariants::limits;
use std::env;

/// Reserved store keys and key prefixes.
///
/// Agreement and invoice records live under their bare numbers; everything
/// else the service writes lives under one of these names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    /// Master list of agreement numbers.
    pub master_agreements: String,
    /// Master list of invoice numbers.
    pub master_invoices: String,
    /// Prefix of the per-agreement invoice list.
    pub agreement_invoices_prefix: String,
    /// Prefix of the per-agreement transaction history.
    pub history_prefix: String,
    /// Prefix of the invoice to external-document correlation list.
    pub document_links_prefix: String,
    /// Prefix under which the customer invoice is stored by document number.
    pub document_record_prefix: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            master_agreements: "ALL_RECS".to_string(),
            master_invoices: "ALL_INVOICES".to_string(),
            agreement_invoices_prefix: "UFA_INVOICE_PREFIX_".to_string(),
            history_prefix: "UFA_TRXN_HISTORY_".to_string(),
            document_links_prefix: "INVOICE_DOC_LINK_".to_string(),
            document_record_prefix: "SAP_DOC_".to_string(),
        }
    }
}

impl KeyLayout {
    #[must_use]
    pub fn agreement_invoices(&self, agreement_number: &str) -> String {
        format!("{}{agreement_number}", self.agreement_invoices_prefix)
    }

    #[must_use]
    pub fn history(&self, agreement_number: &str) -> String {
        format!("{}{agreement_number}", self.history_prefix)
    }

    #[must_use]
    pub fn document_links(&self, invoice_number: &str) -> String {
        format!("{}{invoice_number}", self.document_links_prefix)
    }

    #[must_use]
    pub fn document_record(&self, document_number: &str) -> String {
        format!("{}{document_number}", self.document_record_prefix)
    }

    /// True if a record stored under `key` would collide with service keys.
    #[must_use]
    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.master_agreements
            || key == self.master_invoices
            || [
                &self.agreement_invoices_prefix,
                &self.history_prefix,
                &self.document_links_prefix,
                &self.document_record_prefix,
            ]
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()))
    }
}

/// Ledger service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Store key layout.
    pub keys: KeyLayout,
    /// Commit each operation's writes with a single `batch_put`.
    ///
    /// When false, writes are replayed one at a time and a failing store
    /// can leave an operation partially applied.
    pub atomic_writes: bool,
    /// Refuse to create a record under a number that already has one.
    pub enforce_unique_records: bool,
    /// Upper bound for an agreement's tolerance percentage.
    pub max_tolerance_percent: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            keys: KeyLayout::default(),
            atomic_writes: true,
            enforce_unique_records: true,
            max_tolerance_percent: limits::MAX_TOLERANCE_PERCENT,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `UFA_ATOMIC_WRITES`: Commit writes as one batch (default: true)
    /// - `UFA_ENFORCE_UNIQUE`: Reject re-creation of existing records (default: true)
    /// - `UFA_MAX_TOLERANCE`: Maximum tolerance percentage (default: 10)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            keys: defaults.keys,
            atomic_writes: env_flag("UFA_ATOMIC_WRITES").unwrap_or(defaults.atomic_writes),
            enforce_unique_records: env_flag("UFA_ENFORCE_UNIQUE")
                .unwrap_or(defaults.enforce_unique_records),
            max_tolerance_percent: env::var("UFA_MAX_TOLERANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &f64| v.is_finite() && *v >= limits::MIN_TOLERANCE_PERCENT)
                .unwrap_or(defaults.max_tolerance_percent),
        }
    }

    /// Permissive settings matching a store without hardening: re-creation
    /// overwrites and writes are not batched.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            atomic_writes: false,
            enforce_unique_records: false,
            ..Self::default()
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().map(|v| {
        let v = v.to_lowercase();
        v == "true" || v == "1"
    })
}
