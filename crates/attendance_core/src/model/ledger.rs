//! Attendance ledger keyed by date and class period.
//!
//! # Responsibility
//! - Hold who was present for every initialized (date, period) cell.
//! - Apply default-then-override semantics for single and batch marks.
//! - Serialize to and restore from one opaque JSON blob.
//!
//! # Invariants
//! - A missing entry means present. `get_status` never fails.
//! - `ensure_initialized` never resets an existing cell.
//! - `set_batch` replaces a cell; it never merges with earlier overrides.
//! - `restore(persist(ledger)) == ledger` for every reachable ledger.
//! - A corrupt blob restores to an empty ledger, never to an error.

use super::calendar::{DateKey, Period};
use super::student::{Student, StudentId};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Attendance map for one (date, period) pair. `true` means present.
pub type LedgerCell = BTreeMap<StudentId, bool>;

/// All initialized cells of one date.
pub type LedgerDay = BTreeMap<Period, LedgerCell>;

type LedgerRecords = BTreeMap<DateKey, LedgerDay>;

/// Durability state of one ledger cell.
///
/// `Saved` is a marker, not a value state: the statuses of a saved cell are
/// identical to what they were while it was `Edited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// No cell exists for the (date, period) pair.
    Uninitialized,
    /// Cell created with every roster member present and not edited since.
    InitializedDefault,
    /// At least one explicit mark since the last persist.
    Edited,
    /// Cell contents are flushed to the durable store.
    Saved,
}

/// Serialized ledger as stored in the durable key-value slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerBlob(String);

impl LedgerBlob {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for LedgerBlob {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ledger encode/decode failures.
#[derive(Debug)]
pub enum LedgerCodecError {
    /// The ledger could not be rendered as JSON.
    Encode(serde_json::Error),
    /// The blob is not JSON, or not shaped like a ledger.
    Malformed(serde_json::Error),
}

impl Display for LedgerCodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode attendance ledger: {err}"),
            Self::Malformed(err) => write!(f, "persisted attendance ledger is malformed: {err}"),
        }
    }
}

impl Error for LedgerCodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Malformed(err) => Some(err),
        }
    }
}

/// Per-date, per-period attendance ledger.
///
/// Equality compares attendance values only; durability markers and the
/// dirty flag are not part of ledger identity.
#[derive(Debug, Clone, Default)]
pub struct AttendanceLedger {
    records: LedgerRecords,
    cell_states: BTreeMap<(DateKey, Period), CellState>,
    dirty: bool,
}

impl PartialEq for AttendanceLedger {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for AttendanceLedger {}

impl AttendanceLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the (date, period) cell with every roster member present.
    ///
    /// Returns `true` when a cell was created, `false` when one already
    /// existed and was left untouched.
    pub fn ensure_initialized(&mut self, date: DateKey, period: Period, roster: &[Student]) -> bool {
        let day = self.records.entry(date).or_default();
        if day.contains_key(&period) {
            return false;
        }

        day.insert(period, default_cell(roster, true));
        self.cell_states
            .insert((date, period), CellState::InitializedDefault);
        true
    }

    /// Returns the stored status, or `true` when nothing is stored.
    pub fn get_status(&self, date: DateKey, period: Period, student_id: &StudentId) -> bool {
        self.cell(date, period)
            .and_then(|cell| cell.get(student_id))
            .copied()
            .unwrap_or(true)
    }

    /// Sets exactly one student's status in one cell.
    ///
    /// Creates the cell if the slot was never initialized.
    pub fn set_status(
        &mut self,
        date: DateKey,
        period: Period,
        student_id: &StudentId,
        present: bool,
    ) {
        self.records
            .entry(date)
            .or_default()
            .entry(period)
            .or_default()
            .insert(student_id.clone(), present);
        self.mark_edited(date, period);
    }

    /// Replaces the whole cell so every roster member has the same status.
    pub fn set_batch(&mut self, date: DateKey, period: Period, roster: &[Student], present: bool) {
        self.records
            .entry(date)
            .or_default()
            .insert(period, default_cell(roster, present));
        self.mark_edited(date, period);
    }

    /// Share of initialized periods on `date` the student attended, `0..=100`.
    ///
    /// A date without any initialized period counts as full attendance.
    pub fn percentage(&self, date: DateKey, student_id: &StudentId) -> u8 {
        let (present, total) = self.day_tally(date, student_id);
        rounded_percentage(present, total).unwrap_or(100)
    }

    /// Returns `(present_periods, initialized_periods)` for one student.
    pub fn day_tally(&self, date: DateKey, student_id: &StudentId) -> (u32, u32) {
        let Some(day) = self.records.get(&date) else {
            return (0, 0);
        };

        Period::all()
            .filter_map(|period| day.get(&period))
            .fold((0, 0), |(present, total), cell| {
                let attended = cell.get(student_id).copied().unwrap_or(true);
                (present + u32::from(attended), total + 1)
            })
    }

    /// Periods of `date` that have an initialized cell, ascending.
    pub fn initialized_periods(&self, date: DateKey) -> Vec<Period> {
        self.records
            .get(&date)
            .map(|day| day.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the raw cell, including entries for students no longer rostered.
    pub fn cell(&self, date: DateKey, period: Period) -> Option<&LedgerCell> {
        self.records.get(&date).and_then(|day| day.get(&period))
    }

    /// Returns the durability state of one cell.
    pub fn cell_state(&self, date: DateKey, period: Period) -> CellState {
        if self.cell(date, period).is_none() {
            return CellState::Uninitialized;
        }
        self.cell_states
            .get(&(date, period))
            .copied()
            .unwrap_or(CellState::Saved)
    }

    /// Whether any mark happened since the last persist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Dates with at least one stored day entry, ascending.
    pub fn dates(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.records.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serializes the whole ledger without touching durability markers.
    ///
    /// Output is deterministic: dates, periods and student ids are sorted.
    pub fn encode(&self) -> Result<LedgerBlob, LedgerCodecError> {
        serde_json::to_string(&self.records)
            .map(LedgerBlob)
            .map_err(LedgerCodecError::Encode)
    }

    /// Serializes the whole ledger and marks every cell as saved.
    pub fn persist(&mut self) -> Result<LedgerBlob, LedgerCodecError> {
        let blob = self.encode()?;
        self.mark_saved();
        Ok(blob)
    }

    /// Marks every cell as flushed and clears the dirty flag.
    ///
    /// Callers that write an `encode()` result themselves call this only after
    /// the write succeeded.
    pub fn mark_saved(&mut self) {
        for state in self.cell_states.values_mut() {
            *state = CellState::Saved;
        }
        self.dirty = false;
    }

    /// Decodes a persisted blob, reporting malformed input to the caller.
    pub fn try_restore(blob: &str) -> Result<Self, LedgerCodecError> {
        let records: LedgerRecords =
            serde_json::from_str(blob).map_err(LedgerCodecError::Malformed)?;
        let cell_states = records
            .iter()
            .flat_map(|(date, day)| {
                day.keys()
                    .map(move |period| ((*date, *period), CellState::Saved))
            })
            .collect();

        Ok(Self {
            records,
            cell_states,
            dirty: false,
        })
    }

    /// Decodes a persisted blob, degrading to an empty ledger when corrupt.
    ///
    /// # Side effects
    /// - Emits a `ledger_restore` warning when the blob is discarded.
    pub fn restore(blob: &str) -> Self {
        match Self::try_restore(blob) {
            Ok(ledger) => ledger,
            Err(err) => {
                warn!(
                    "event=ledger_restore module=ledger status=degraded error_code=corrupt_state blob_len={} error={}",
                    blob.len(),
                    err
                );
                Self::new()
            }
        }
    }

    fn mark_edited(&mut self, date: DateKey, period: Period) {
        self.cell_states.insert((date, period), CellState::Edited);
        self.dirty = true;
    }
}

/// `round(100 * present / total)` with integer arithmetic.
///
/// Returns `None` when `total == 0`.
pub(crate) fn rounded_percentage(present: u32, total: u32) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let present = present.min(total);
    let scaled = (200 * u64::from(present) + u64::from(total)) / (2 * u64::from(total));
    u8::try_from(scaled).ok()
}

fn default_cell(roster: &[Student], present: bool) -> LedgerCell {
    roster
        .iter()
        .map(|student| (student.id.clone(), present))
        .collect()
}
