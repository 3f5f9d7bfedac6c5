//! # Core Domain Entities
//!
//! Typed views of the two record kinds kept in the ledger: agreements and
//! invoices. Both are stored as flat string maps; fields the schema does not
//! name are carried through untouched in `extra`.
//!
//! Records are immutable values. An update produces a new record via
//! [`FlatRecord::merged`], where patch fields win on key collision.

use crate::domain::value_objects::{amount_or_sentinel, DecimalText, RawRecord};
use crate::errors::LedgerError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// FLAT RECORD CODEC
// =============================================================================

/// Conversion between a typed record and its flat wire mapping.
pub trait FlatRecord: Serialize + DeserializeOwned + Sized {
    /// Build the typed record from a flat mapping.
    fn from_raw(raw: &RawRecord) -> Result<Self, LedgerError> {
        let value = serde_json::to_value(raw)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Flatten the record back into its wire mapping.
    fn to_raw(&self) -> Result<RawRecord, LedgerError> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Decode stored bytes.
    fn decode(bytes: &[u8]) -> Result<Self, LedgerError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode for storage.
    fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// New record with every field of `patch` written over this one.
    fn merged(&self, patch: &RawRecord) -> Result<Self, LedgerError> {
        let mut raw = self.to_raw()?;
        for (key, value) in patch {
            raw.insert(key.clone(), value.clone());
        }
        Self::from_raw(&raw)
    }
}

// =============================================================================
// AGREEMENT
// =============================================================================

/// An Upfront Agreement: a charge ceiling negotiated between buyer and seller.
///
/// The agreement number is the store key and is not part of the record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    /// Agreed net charge; must be positive at creation.
    #[serde(rename = "netCharge", default, skip_serializing_if = "Option::is_none")]
    pub net_charge: Option<DecimalText>,
    /// Allowed overrun above the net charge, in percent.
    #[serde(
        rename = "chargeTolerance",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub charge_tolerance: Option<DecimalText>,
    /// Sum of all invoice amounts raised so far.
    #[serde(
        rename = "raisedInvTotal",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub raised_inv_total: Option<DecimalText>,
    /// Caller-supplied fields outside the schema.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl FlatRecord for Agreement {}

impl Agreement {
    /// Net charge, or the sentinel when missing or unparseable.
    #[must_use]
    pub fn net_charge_value(&self) -> f64 {
        amount_or_sentinel(self.net_charge.as_ref())
    }

    /// Tolerance percentage, or the sentinel when missing or unparseable.
    #[must_use]
    pub fn tolerance_percent(&self) -> f64 {
        amount_or_sentinel(self.charge_tolerance.as_ref())
    }

    /// Running invoice total. An agreement that has never been invoiced reads as zero.
    #[must_use]
    pub fn raised_total(&self) -> f64 {
        self.raised_inv_total.as_ref().map_or(0.0, DecimalText::value)
    }

    /// Ceiling for the running total: `netCharge + netCharge * tolerance / 100`.
    #[must_use]
    pub fn max_charge(&self) -> f64 {
        let net = self.net_charge_value();
        net + net * self.tolerance_percent() / 100.0
    }

    /// Patch that moves the running total to `total`.
    #[must_use]
    pub fn raised_total_patch(total: f64) -> RawRecord {
        let mut patch = RawRecord::new();
        patch.insert(
            "raisedInvTotal".to_string(),
            DecimalText::from_value(total).as_str().to_string(),
        );
        patch
    }
}

// =============================================================================
// INVOICE
// =============================================================================

/// One side (customer or vendor) of an invoice raised against an agreement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(rename = "invoiceNumber", default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    /// Agreement this invoice is raised against.
    #[serde(rename = "ufaNumber", default, skip_serializing_if = "Option::is_none")]
    pub ufa_number: Option<String>,
    #[serde(rename = "invoiceAmt", default, skip_serializing_if = "Option::is_none")]
    pub invoice_amt: Option<DecimalText>,
    /// Opaque label of the invoicing cycle.
    #[serde(rename = "billingPeriod", default, skip_serializing_if = "Option::is_none")]
    pub billing_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Identifier assigned by the external financial system.
    #[serde(
        rename = "sapDocumentNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sap_document_number: Option<String>,
    #[serde(rename = "raisedBy", default, skip_serializing_if = "Option::is_none")]
    pub raised_by: Option<String>,
    #[serde(rename = "approverBy", default, skip_serializing_if = "Option::is_none")]
    pub approver_by: Option<String>,
    /// Caller-supplied fields outside the schema.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl FlatRecord for Invoice {}

impl Invoice {
    /// Invoice amount, or the sentinel when missing or unparseable.
    #[must_use]
    pub fn amount(&self) -> f64 {
        amount_or_sentinel(self.invoice_amt.as_ref())
    }

    #[must_use]
    pub fn invoice_number(&self) -> &str {
        text(self.invoice_number.as_ref())
    }

    #[must_use]
    pub fn ufa_number(&self) -> &str {
        text(self.ufa_number.as_ref())
    }

    #[must_use]
    pub fn billing_period(&self) -> &str {
        text(self.billing_period.as_ref())
    }

    #[must_use]
    pub fn status(&self) -> &str {
        text(self.status.as_ref())
    }

    /// External document number; empty when none was assigned.
    #[must_use]
    pub fn sap_document_number(&self) -> &str {
        text(self.sap_document_number.as_ref())
    }

    /// True if `actor` raised or approved this invoice.
    ///
    /// An empty actor matches nothing, including invoices with no raiser
    /// or approver recorded.
    #[must_use]
    pub fn involves(&self, actor: &str) -> bool {
        !actor.is_empty()
            && (self.raised_by.as_deref() == Some(actor)
                || self.approver_by.as_deref() == Some(actor))
    }
}

/// Text of an optional schema field; absent reads as empty.
fn text(field: Option<&String>) -> &str {
    field.map_or("", String::as_str)
}

/// The customer-side and vendor-side invoices created together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePair {
    pub customer: Invoice,
    pub vendor: Invoice,
}

impl InvoicePair {
    /// Decode a two-entry payload; `None` when the entry count is not exactly two.
    pub fn from_entries(entries: &[RawRecord]) -> Result<Option<Self>, LedgerError> {
        match entries {
            [customer, vendor] => Ok(Some(Self {
                customer: Invoice::from_raw(customer)?,
                vendor: Invoice::from_raw(vendor)?,
            })),
            _ => Ok(None),
        }
    }

    /// Agreement referenced by the customer invoice.
    #[must_use]
    pub fn agreement_number(&self) -> &str {
        self.customer.ufa_number()
    }

    /// Billing period of the customer invoice.
    #[must_use]
    pub fn billing_period(&self) -> &str {
        self.customer.billing_period()
    }
}

// =============================================================================
// TESTS
// =============================================================================
