//! UFA manager: agreement records, the master agreement index and the
//! transaction history.

use super::{best_effort, UfaLedgerService};
use crate::domain::entities::{Agreement, FlatRecord};
use crate::domain::invariants::{validate_new_agreement, ValidationReport, ValidationViolation};
use crate::domain::value_objects::RawRecord;
use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::ports::outbound::LedgerStore;
use crate::store::{history, index, StagedWrites};
use tracing::debug;

impl<S: LedgerStore> UfaLedgerService<S> {
    /// Read the agreement stored under `agreement_number`.
    ///
    /// Reserved keys never resolve to an agreement.
    pub(super) fn load_agreement(
        &self,
        view: &StagedWrites<'_, S>,
        agreement_number: &str,
    ) -> Result<Agreement, LedgerError> {
        let not_found = || LedgerError::AgreementNotFound {
            agreement_number: agreement_number.to_string(),
        };
        if agreement_number.is_empty() || self.config.keys.is_reserved(agreement_number) {
            return Err(not_found());
        }

        match view.get(agreement_number)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                LedgerError::Serialization(format!("agreement {agreement_number}: {e}"))
            }),
            None => Err(not_found()),
        }
    }

    /// Field rules plus the record-number rules that need the store.
    fn check_new_agreement(
        &self,
        view: &StagedWrites<'_, S>,
        agreement_number: &str,
        actor_role: &str,
        agreement: &Agreement,
    ) -> Result<ValidationReport, LedgerError> {
        let mut report =
            validate_new_agreement(actor_role, agreement, self.config.max_tolerance_percent);

        if agreement_number.is_empty() {
            report.push(ValidationViolation::MissingAgreementNumber);
        } else if self.config.keys.is_reserved(agreement_number) {
            report.push(ValidationViolation::ReservedKey {
                key: agreement_number.to_string(),
            });
        } else if self.config.enforce_unique_records && view.contains(agreement_number)? {
            report.push(ValidationViolation::AgreementAlreadyExists {
                agreement_number: agreement_number.to_string(),
            });
        }

        Ok(report)
    }

    pub(super) fn check_agreement_payload(
        &self,
        actor_role: &str,
        payload: &RawRecord,
    ) -> Result<ValidationReport, LedgerError> {
        let agreement = Agreement::from_raw(payload)?;
        Ok(validate_new_agreement(
            actor_role,
            &agreement,
            self.config.max_tolerance_percent,
        ))
    }

    pub(super) fn create_agreement_record(
        &self,
        agreement_number: &str,
        actor_role: &str,
        payload: &RawRecord,
    ) -> Result<Agreement, LedgerError> {
        let agreement = Agreement::from_raw(payload)?;
        let mut view = StagedWrites::new(&self.store);

        let report = self.check_new_agreement(&view, agreement_number, actor_role, &agreement)?;
        if !report.is_valid() {
            return Err(self.reject("createAgreement", report));
        }

        let keys = &self.config.keys;
        view.put(agreement_number, agreement.encode()?);
        index::append(&mut view, &keys.master_agreements, &[agreement_number])?;
        history::append(&mut view, &keys.history(agreement_number), payload)?;
        self.commit(view)?;

        self.stats.lock().agreements_created += 1;
        self.emit(LedgerEvent::AgreementCreated {
            agreement_number: agreement_number.to_string(),
        });
        Ok(agreement)
    }

    /// Merge `patch` into the stored agreement and log the patch, staged only.
    ///
    /// Shared by explicit updates and the running-total roll of invoice creation.
    pub(super) fn stage_agreement_patch(
        &self,
        view: &mut StagedWrites<'_, S>,
        agreement_number: &str,
        patch: &RawRecord,
    ) -> Result<Agreement, LedgerError> {
        let current = self.load_agreement(view, agreement_number)?;
        let updated = current.merged(patch)?;

        view.put(agreement_number, updated.encode()?);
        let entries = history::append(view, &self.config.keys.history(agreement_number), patch)?;
        debug!(agreement_number, history_entries = entries, "Staged agreement patch");
        Ok(updated)
    }

    pub(super) fn update_agreement_record(
        &self,
        agreement_number: &str,
        patch: &RawRecord,
    ) -> Result<Agreement, LedgerError> {
        let mut view = StagedWrites::new(&self.store);
        let updated = self.stage_agreement_patch(&mut view, agreement_number, patch)?;
        self.commit(view)?;

        self.stats.lock().agreements_updated += 1;
        self.emit(LedgerEvent::AgreementUpdated {
            agreement_number: agreement_number.to_string(),
            fields: patch.keys().cloned().collect(),
        });
        Ok(updated)
    }

    pub(super) fn list_agreements(&self) -> Result<Vec<Agreement>, LedgerError> {
        let view = StagedWrites::new(&self.store);
        index::read_list(&view, &self.config.keys.master_agreements)?
            .iter()
            .map(|number| best_effort(self.load_agreement(&view, number), number))
            .collect()
    }

    pub(super) fn agreement_history(
        &self,
        agreement_number: &str,
    ) -> Result<Vec<RawRecord>, LedgerError> {
        let view = StagedWrites::new(&self.store);
        history::read(&view, &self.config.keys.history(agreement_number))
    }
}
