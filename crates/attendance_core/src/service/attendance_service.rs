//! Attendance marking use-case service.
//!
//! # Responsibility
//! - Load the ledger from the durable slot once per session.
//! - Open cells lazily, apply single/batch marks and save explicitly.
//! - Degrade every storage failure to a working in-memory ledger.
//!
//! # Invariants
//! - A service only exists behind an authorized `SessionContext`.
//! - `save` writes the whole ledger blob; it never writes partial cells.
//! - A failed save leaves the in-memory ledger untouched and still dirty.

use crate::model::aggregate::{CellRow, DayRow, StatusFilter};
use crate::model::calendar::{DateKey, Period};
use crate::model::ledger::AttendanceLedger;
use crate::model::student::{Student, StudentId};
use crate::roster::{RosterProvider, RosterResult, RosterScope};
use crate::session::SessionContext;
use crate::settings::CoreSettings;
use crate::store::KeyValueStore;
use log::{error, info, warn};

/// Where the working ledger came from at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Slot was empty; started from an empty ledger.
    Fresh,
    /// Slot decoded into the working ledger.
    Restored,
    /// Slot held a corrupt blob; it was discarded.
    CorruptDiscarded,
    /// Store could not be read; started from an empty ledger.
    StoreUnavailable,
}

/// Result of an explicit save action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Whole ledger written; `bytes` is the blob length.
    Saved { bytes: usize },
    /// Write skipped; the in-memory ledger stays the working copy.
    Skipped,
}

/// Session-scoped attendance service over a durable store.
pub struct AttendanceService<S: KeyValueStore> {
    store: S,
    settings: CoreSettings,
    session: SessionContext,
    ledger: AttendanceLedger,
    load_outcome: LoadOutcome,
}

impl<S: KeyValueStore> AttendanceService<S> {
    /// Loads the ledger for an authorized session.
    ///
    /// # Side effects
    /// - Reads the configured storage slot once.
    /// - Emits a `ledger_load` event; degraded loads are logged at `warn`.
    pub fn load(store: S, session: &SessionContext, settings: CoreSettings) -> Self {
        let (ledger, load_outcome) = match store.get(&settings.storage_key) {
            Ok(None) => (AttendanceLedger::new(), LoadOutcome::Fresh),
            Ok(Some(blob)) => match AttendanceLedger::try_restore(&blob) {
                Ok(ledger) => (ledger, LoadOutcome::Restored),
                Err(err) => {
                    warn!(
                        "event=ledger_load module=service status=degraded error_code=corrupt_state blob_len={} error={}",
                        blob.len(),
                        err
                    );
                    (AttendanceLedger::new(), LoadOutcome::CorruptDiscarded)
                }
            },
            Err(err) => {
                warn!(
                    "event=ledger_load module=service status=degraded error_code=store_unavailable error={}",
                    err
                );
                (AttendanceLedger::new(), LoadOutcome::StoreUnavailable)
            }
        };

        info!(
            "event=ledger_load module=service status=ok outcome={:?} dates={}",
            load_outcome,
            ledger.dates().count()
        );

        Self {
            store,
            settings,
            session: session.clone(),
            ledger,
            load_outcome,
        }
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn settings(&self) -> &CoreSettings {
        &self.settings
    }

    /// Read access for aggregation and display.
    pub fn ledger(&self) -> &AttendanceLedger {
        &self.ledger
    }

    /// Opens one cell for marking, defaulting an unseen cell to all present.
    ///
    /// Returns one row per roster member in roster order.
    pub fn open_cell(&mut self, date: DateKey, period: Period, roster: &[Student]) -> Vec<CellRow> {
        self.ledger.ensure_initialized(date, period, roster);
        self.ledger
            .cell_rows(date, period, roster, StatusFilter::All)
    }

    /// Fetches the roster for `scope` and opens the cell with it.
    pub fn open_cell_for_scope(
        &mut self,
        provider: &impl RosterProvider,
        scope: &RosterScope,
        date: DateKey,
        period: Period,
    ) -> RosterResult<(Vec<Student>, Vec<CellRow>)> {
        let roster = provider.roster(scope)?;
        let rows = self.open_cell(date, period, &roster);
        Ok((roster, rows))
    }

    pub fn mark(&mut self, date: DateKey, period: Period, student_id: &StudentId, present: bool) {
        self.ledger.set_status(date, period, student_id, present);
    }

    /// Flips one student's status and returns the new value.
    pub fn toggle(&mut self, date: DateKey, period: Period, student_id: &StudentId) -> bool {
        let present = !self.ledger.get_status(date, period, student_id);
        self.ledger.set_status(date, period, student_id, present);
        present
    }

    /// "All present" / "all absent" for one cell.
    pub fn mark_all(&mut self, date: DateKey, period: Period, roster: &[Student], present: bool) {
        self.ledger.set_batch(date, period, roster, present);
    }

    /// Percentage for one student under the configured empty-day policy.
    pub fn percentage(&self, date: DateKey, student_id: &StudentId) -> Option<u8> {
        self.ledger
            .percentage_with_policy(date, student_id, self.settings.empty_day_policy)
    }

    /// View-attendance sheet under the configured empty-day policy.
    pub fn day_sheet(&self, date: DateKey, roster: &[Student]) -> Vec<DayRow> {
        self.ledger
            .day_sheet(date, roster, self.settings.empty_day_policy)
    }

    /// Writes the whole ledger to the durable slot.
    ///
    /// # Side effects
    /// - Emits `ledger_save` with `status=ok` or `status=skipped`.
    pub fn save(&mut self) -> SaveOutcome {
        let blob = match self.ledger.encode() {
            Ok(blob) => blob,
            Err(err) => {
                error!(
                    "event=ledger_save module=service status=skipped error_code=encode_failed error={}",
                    err
                );
                return SaveOutcome::Skipped;
            }
        };

        match self.store.set(&self.settings.storage_key, blob.as_str()) {
            Ok(()) => {
                self.ledger.mark_saved();
                let bytes = blob.as_str().len();
                info!(
                    "event=ledger_save module=service status=ok bytes={}",
                    bytes
                );
                SaveOutcome::Saved { bytes }
            }
            Err(err) => {
                warn!(
                    "event=ledger_save module=service status=skipped error_code=store_write_failed error={}",
                    err
                );
                SaveOutcome::Skipped
            }
        }
    }
}
