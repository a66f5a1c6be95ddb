//! Derived attendance views over a roster.
//!
//! # Responsibility
//! - Build per-student day sheets and per-cell summaries for display.
//! - Make the empty-day percentage convention explicit.
//!
//! # Invariants
//! - Every view is driven by the roster, so ledger entries for students
//!   no longer rostered are never displayed.

use super::calendar::{DateKey, Period};
use super::ledger::{rounded_percentage, AttendanceLedger};
use super::student::{Student, StudentId};
use serde::{Deserialize, Serialize};

/// How to report a date that has no initialized period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyDayPolicy {
    /// Report 100%, matching what the dashboard always displayed.
    #[default]
    FullAttendance,
    /// Report no percentage at all.
    NoData,
}

/// Colour band for a percentage badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceBand {
    /// 90% and above.
    Good,
    /// 75% up to 90%.
    Warning,
    /// Below 75%.
    Critical,
}

impl AttendanceBand {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90..=u8::MAX => Self::Good,
            75..=89 => Self::Warning,
            _ => Self::Critical,
        }
    }
}

/// Status filter backing the All/Present/Absent tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Present,
    Absent,
}

impl StatusFilter {
    fn accepts(self, present: bool) -> bool {
        match self {
            Self::All => true,
            Self::Present => present,
            Self::Absent => !present,
        }
    }
}

/// One student's row in a day sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRow {
    pub student_id: StudentId,
    /// Status for periods 1..=7, in slot order.
    pub statuses: [bool; 7],
    /// `None` only under `EmptyDayPolicy::NoData`.
    pub percentage: Option<u8>,
    pub band: Option<AttendanceBand>,
}

impl DayRow {
    /// `P`/`A` marks for periods 1..=7.
    pub fn marks(&self) -> String {
        self.statuses
            .iter()
            .map(|present| if *present { 'P' } else { 'A' })
            .collect()
    }
}

/// One student's row in a single (date, period) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRow {
    pub student_id: StudentId,
    pub present: bool,
}

/// Present/absent counts for one cell over a roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodSummary {
    pub present: usize,
    pub absent: usize,
}

impl PeriodSummary {
    pub fn total(&self) -> usize {
        self.present + self.absent
    }
}

impl AttendanceLedger {
    /// Percentage for one student with an explicit empty-day convention.
    pub fn percentage_with_policy(
        &self,
        date: DateKey,
        student_id: &StudentId,
        policy: EmptyDayPolicy,
    ) -> Option<u8> {
        let (present, total) = self.day_tally(date, student_id);
        match (rounded_percentage(present, total), policy) {
            (Some(value), _) => Some(value),
            (None, EmptyDayPolicy::FullAttendance) => Some(100),
            (None, EmptyDayPolicy::NoData) => None,
        }
    }

    /// Builds the view-attendance sheet for `date`, one row per roster member.
    pub fn day_sheet(
        &self,
        date: DateKey,
        roster: &[Student],
        policy: EmptyDayPolicy,
    ) -> Vec<DayRow> {
        roster
            .iter()
            .map(|student| {
                let mut statuses = [true; 7];
                for (slot, period) in statuses.iter_mut().zip(Period::all()) {
                    *slot = self.get_status(date, period, &student.id);
                }
                let percentage = self.percentage_with_policy(date, &student.id, policy);
                DayRow {
                    student_id: student.id.clone(),
                    statuses,
                    percentage,
                    band: percentage.map(AttendanceBand::from_percentage),
                }
            })
            .collect()
    }

    /// Rows of one cell for the roster, narrowed by status.
    pub fn cell_rows(
        &self,
        date: DateKey,
        period: Period,
        roster: &[Student],
        filter: StatusFilter,
    ) -> Vec<CellRow> {
        roster
            .iter()
            .map(|student| CellRow {
                student_id: student.id.clone(),
                present: self.get_status(date, period, &student.id),
            })
            .filter(|row| filter.accepts(row.present))
            .collect()
    }

    /// Present/absent counts of one cell over the roster.
    pub fn period_summary(&self, date: DateKey, period: Period, roster: &[Student]) -> PeriodSummary {
        roster
            .iter()
            .fold(PeriodSummary::default(), |mut summary, student| {
                if self.get_status(date, period, &student.id) {
                    summary.present += 1;
                } else {
                    summary.absent += 1;
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{AttendanceBand, EmptyDayPolicy, StatusFilter};
    use crate::model::calendar::{DateKey, Period};
    use crate::model::ledger::AttendanceLedger;
    use crate::model::student::{Student, StudentId};

    fn roster() -> Vec<Student> {
        (1..=3_u64)
            .map(|id| Student::new(StudentId::from(id), format!("Student {id}"), format!("CS{id}")))
            .collect()
    }

    #[test]
    fn band_thresholds_match_badges() {
        assert_eq!(AttendanceBand::from_percentage(100), AttendanceBand::Good);
        assert_eq!(AttendanceBand::from_percentage(90), AttendanceBand::Good);
        assert_eq!(AttendanceBand::from_percentage(89), AttendanceBand::Warning);
        assert_eq!(AttendanceBand::from_percentage(75), AttendanceBand::Warning);
        assert_eq!(AttendanceBand::from_percentage(74), AttendanceBand::Critical);
    }

    #[test]
    fn empty_day_policy_controls_missing_data() {
        let ledger = AttendanceLedger::new();
        let date = DateKey::parse("2025-04-11").unwrap();
        let id = StudentId::from(1_u64);
        assert_eq!(
            ledger.percentage_with_policy(date, &id, EmptyDayPolicy::FullAttendance),
            Some(100)
        );
        assert_eq!(
            ledger.percentage_with_policy(date, &id, EmptyDayPolicy::NoData),
            None
        );
    }

    #[test]
    fn day_sheet_and_filters_follow_roster_only() {
        let date = DateKey::parse("2025-04-10").unwrap();
        let first = Period::new(1).unwrap();
        let second = Period::new(2).unwrap();
        let roster = roster();
        let mut ledger = AttendanceLedger::new();
        ledger.ensure_initialized(date, first, &roster);
        ledger.ensure_initialized(date, second, &roster);
        ledger.set_status(date, second, &roster[2].id, false);
        ledger.set_status(date, first, &StudentId::from(99_u64), false);

        let sheet = ledger.day_sheet(date, &roster, EmptyDayPolicy::FullAttendance);
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet[2].marks(), "PAPPPPP");
        assert_eq!(sheet[2].percentage, Some(50));
        assert_eq!(sheet[2].band, Some(AttendanceBand::Critical));
        assert_eq!(sheet[0].percentage, Some(100));

        let absent = ledger.cell_rows(date, second, &roster, StatusFilter::Absent);
        assert_eq!(absent.len(), 1);
        assert_eq!(absent[0].student_id, roster[2].id);

        let summary = ledger.period_summary(date, second, &roster);
        assert_eq!((summary.present, summary.absent, summary.total()), (2, 1, 3));
        let first_summary = ledger.period_summary(date, first, &roster);
        assert_eq!(first_summary.absent, 0);
    }
}
