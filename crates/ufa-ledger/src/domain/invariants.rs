//! # Validation Engine
//!
//! Business rules that MUST hold before an agreement or an invoice pair is
//! written. Every check here is pure: the service gathers whatever stored
//! state a rule needs into a context value and passes it in.
//!
//! ## Rules
//!
//! New agreement:
//! - Actor role is `SELLER` or `BUYER`
//! - `netCharge > 0`
//! - `0 <= chargeTolerance <= max tolerance` (10 by default)
//!
//! New invoice pair:
//! - Exactly two entries (customer, vendor) with distinct invoice numbers
//! - Both reference the same, existing agreement and billing period
//! - No invoice already raised for that agreement and billing period
//! - Equal, positive amounts
//! - `raisedInvTotal + invoiceAmt <= netCharge * (1 + tolerance / 100)`
//!
//! Checks are not short-circuited: every violation found is reported and the
//! messages are concatenated, one per line.

use crate::domain::entities::{Agreement, InvoicePair};
use crate::domain::value_objects::ActorRole;
use serde::{Deserialize, Serialize};

/// Bounds applied to agreement fields.
pub mod limits {
    /// Lowest accepted tolerance percentage.
    pub const MIN_TOLERANCE_PERCENT: f64 = 0.0;
    /// Highest accepted tolerance percentage.
    pub const MAX_TOLERANCE_PERCENT: f64 = 10.0;
}

// =============================================================================
// AGREEMENT RULES
// =============================================================================

/// Validate a new agreement payload on behalf of `actor_role`.
///
/// An unrecognised role is reported on its own; field checks only run for
/// an authorised actor.
#[must_use]
pub fn validate_new_agreement(
    actor_role: &str,
    agreement: &Agreement,
    max_tolerance_percent: f64,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    if actor_role.parse::<ActorRole>().is_err() {
        report.push(ValidationViolation::UnauthorizedRole {
            role: actor_role.to_string(),
        });
        return report;
    }

    if agreement.net_charge_value() <= 0.0 {
        report.push(ValidationViolation::InvalidNetCharge);
    }

    let tolerance = agreement.tolerance_percent();
    if !(limits::MIN_TOLERANCE_PERCENT..=max_tolerance_percent).contains(&tolerance) {
        report.push(ValidationViolation::ToleranceOutOfRange {
            max: max_tolerance_percent,
        });
    }

    report
}

// =============================================================================
// INVOICE PAIR RULES
// =============================================================================

/// Stored state an invoice-pair check depends on.
#[derive(Clone, Debug, Default)]
pub struct InvoicePairContext {
    /// The referenced agreement, if a record exists.
    pub agreement: Option<Agreement>,
    /// Billing periods of invoices already linked to the agreement.
    pub invoiced_periods: Vec<String>,
    /// Invoice numbers in the pair that already have a stored record.
    pub existing_invoice_numbers: Vec<String>,
    /// Invoice numbers in the pair that collide with reserved store keys.
    pub reserved_invoice_numbers: Vec<String>,
    /// Customer document number that already has a stored invoice copy.
    pub linked_document: Option<String>,
}

/// Validate an invoice pair against the referenced agreement.
///
/// `pair` is `None` when the payload did not hold exactly two entries.
#[must_use]
pub fn validate_invoice_pair(
    pair: Option<&InvoicePair>,
    ctx: &InvoicePairContext,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(pair) = pair else {
        report.push(ValidationViolation::MissingCounterpart);
        return report;
    };

    check_invoice_numbers(pair, ctx, &mut report);

    if pair.customer.ufa_number() != pair.vendor.ufa_number() {
        report.push(ValidationViolation::AgreementMismatch);
    }
    if pair.customer.billing_period() != pair.vendor.billing_period() {
        report.push(ValidationViolation::BillingPeriodMismatch);
    }

    let Some(agreement) = ctx.agreement.as_ref() else {
        report.push(ValidationViolation::InvalidAgreement {
            agreement_number: pair.agreement_number().to_string(),
        });
        return report;
    };

    let billing_period = pair.billing_period();
    if ctx.invoiced_periods.iter().any(|p| p == billing_period) {
        report.push(ValidationViolation::PeriodAlreadyInvoiced {
            billing_period: billing_period.to_string(),
        });
    }

    let customer_amount = pair.customer.amount();
    let vendor_amount = pair.vendor.amount();
    if customer_amount != vendor_amount {
        report.push(ValidationViolation::AmountMismatch);
    }
    if customer_amount <= 0.0 {
        report.push(ValidationViolation::InvalidInvoiceAmount);
    }

    let max_charge = agreement.max_charge();
    let attempted = agreement.raised_total() + customer_amount;
    if attempted > max_charge {
        report.push(ValidationViolation::TotalExceeded {
            attempted,
            max_charge,
        });
    }

    report
}

fn check_invoice_numbers(pair: &InvoicePair, ctx: &InvoicePairContext, report: &mut ValidationReport) {
    let customer = pair.customer.invoice_number();
    let vendor = pair.vendor.invoice_number();

    if customer.is_empty() || vendor.is_empty() {
        report.push(ValidationViolation::MissingInvoiceNumber);
    } else if customer == vendor {
        report.push(ValidationViolation::DuplicateInvoiceNumber {
            invoice_number: customer.to_string(),
        });
    }

    for number in &ctx.reserved_invoice_numbers {
        report.push(ValidationViolation::ReservedKey {
            key: number.clone(),
        });
    }
    for number in &ctx.existing_invoice_numbers {
        report.push(ValidationViolation::InvoiceAlreadyExists {
            invoice_number: number.clone(),
        });
    }
    if let Some(document_number) = &ctx.linked_document {
        report.push(ValidationViolation::DocumentAlreadyLinked {
            document_number: document_number.clone(),
        });
    }
}

// =============================================================================
// REPORT TYPES
// =============================================================================

/// Outcome of a validation pass. Empty means the request may proceed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    violations: Vec<ValidationViolation>,
}

impl ValidationReport {
    /// Build a report from a list of violations.
    #[must_use]
    pub fn from_violations(violations: Vec<ValidationViolation>) -> Self {
        Self { violations }
    }

    /// Record one more violation.
    pub fn push(&mut self, violation: ValidationViolation) {
        self.violations.push(violation);
    }

    /// Returns true if no rule was violated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn violations(&self) -> &[ValidationViolation] {
        &self.violations
    }

    /// All reasons concatenated, each on its own line. Empty on success.
    #[must_use]
    pub fn message(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("\n{v}"))
            .collect()
    }

    /// Wire form answered by the validation queries.
    #[must_use]
    pub fn outcome(&self) -> ValidationOutcome {
        ValidationOutcome {
            validation: if self.is_valid() {
                "Success".to_string()
            } else {
                "Failure".to_string()
            },
            msg: self.message(),
        }
    }
}

/// Serialized validation answer: `{"validation":"Success","msg":""}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub validation: String,
    pub msg: String,
}

/// A single business-rule violation.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationViolation {
    /// Actor role is not allowed to create agreements.
    UnauthorizedRole { role: String },
    /// Net charge missing, unparseable or not positive.
    InvalidNetCharge,
    /// Tolerance missing, unparseable or outside `[0, max]`.
    ToleranceOutOfRange { max: f64 },
    /// Record number is empty.
    MissingAgreementNumber,
    /// Record number collides with an index or history key.
    ReservedKey { key: String },
    /// An agreement is already stored under this number.
    AgreementAlreadyExists { agreement_number: String },
    /// Payload did not hold both a customer and a vendor invoice.
    MissingCounterpart,
    /// Referenced agreement does not exist.
    InvalidAgreement { agreement_number: String },
    /// An invoice was already raised for this billing period.
    PeriodAlreadyInvoiced { billing_period: String },
    /// Customer and vendor amounts differ.
    AmountMismatch,
    /// Invoice amount missing, unparseable or not positive.
    InvalidInvoiceAmount,
    /// Running total would pass the agreement ceiling.
    TotalExceeded { attempted: f64, max_charge: f64 },
    /// Customer and vendor invoices name different agreements.
    AgreementMismatch,
    /// Customer and vendor invoices name different billing periods.
    BillingPeriodMismatch,
    /// An invoice number is empty.
    MissingInvoiceNumber,
    /// Customer and vendor share one invoice number.
    DuplicateInvoiceNumber { invoice_number: String },
    /// An invoice is already stored under this number.
    InvoiceAlreadyExists { invoice_number: String },
    /// Another invoice is already stored under this external document number.
    DocumentAlreadyLinked { document_number: String },
}

impl std::fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnauthorizedRole { role } => {
                write!(f, "User is not authorized to create a UFA (role: {role})")
            }
            Self::InvalidNetCharge => write!(f, "Invalid net charge"),
            Self::ToleranceOutOfRange { max } => write!(
                f,
                "Tolerance is out of range. Should be between {} and {max}",
                limits::MIN_TOLERANCE_PERCENT
            ),
            Self::MissingAgreementNumber => write!(f, "UFA number is required"),
            Self::ReservedKey { key } => write!(f, "{key} is a reserved ledger key"),
            Self::AgreementAlreadyExists { agreement_number } => {
                write!(f, "UFA {agreement_number} already exists")
            }
            Self::MissingCounterpart => write!(f, "Invoice is missing for Customer or Vendor"),
            Self::InvalidAgreement { agreement_number } => {
                write!(f, "Invalid UFA provided: {agreement_number}")
            }
            Self::PeriodAlreadyInvoiced { billing_period } => {
                write!(f, "Invoices are already raised for {billing_period}")
            }
            Self::AmountMismatch => {
                write!(f, "Customer and Vendor Invoice Amounts are not same")
            }
            Self::InvalidInvoiceAmount => write!(f, "Invalid invoice amount"),
            Self::TotalExceeded {
                attempted,
                max_charge,
            } => write!(
                f,
                "Total invoice amount exceeded: {attempted} > {max_charge}"
            ),
            Self::AgreementMismatch => {
                write!(f, "Customer and Vendor Invoices refer to different UFAs")
            }
            Self::BillingPeriodMismatch => {
                write!(f, "Customer and Vendor Invoices refer to different billing periods")
            }
            Self::MissingInvoiceNumber => write!(f, "Invoice number is required"),
            Self::DuplicateInvoiceNumber { invoice_number } => write!(
                f,
                "Customer and Vendor Invoices share invoice number {invoice_number}"
            ),
            Self::InvoiceAlreadyExists { invoice_number } => {
                write!(f, "Invoice {invoice_number} already exists")
            }
            Self::DocumentAlreadyLinked { document_number } => {
                write!(f, "Document {document_number} is already linked to an invoice")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
