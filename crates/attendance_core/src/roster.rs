//! Roster provider contract and in-memory implementation.
//!
//! # Responsibility
//! - Supply the ordered student list for a department/year/section scope.
//! - Apply the search and department filters used by roster-backed pages.
//!
//! # Invariants
//! - Providers preserve their source order; filtering never reorders.
//! - The ledger treats every returned roster as pure input.

use crate::model::student::Student;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Department filter value meaning "do not narrow by department".
pub const ALL_DEPARTMENTS: &str = "all-departments";

pub type RosterResult<T> = Result<T, RosterError>;

/// Roster lookup failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// The provider could not be reached or answered with an error.
    Unavailable(String),
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "roster unavailable: {message}"),
        }
    }
}

impl Error for RosterError {}

/// Placement scope for a roster request.
///
/// `None` fields do not narrow the result, mirroring the department → year →
/// section drill-down where each level is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterScope {
    pub department: Option<String>,
    pub year: Option<String>,
    pub section: Option<String>,
}

impl RosterScope {
    /// Scope covering every student.
    pub fn all() -> Self {
        Self::default()
    }

    /// Scope narrowed to one section of one department year.
    pub fn section(
        department: impl Into<String>,
        year: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            department: Some(department.into()),
            year: Some(year.into()),
            section: Some(section.into()),
        }
    }

    /// Whether `student` falls inside this scope. Matching is case-insensitive.
    pub fn contains(&self, student: &Student) -> bool {
        field_matches(self.department.as_deref(), &student.department)
            && field_matches(self.year.as_deref(), &student.year)
            && field_matches(self.section.as_deref(), &student.section)
    }
}

fn field_matches(expected: Option<&str>, actual: &str) -> bool {
    match expected.map(str::trim) {
        None | Some("") => true,
        Some(value) => value.eq_ignore_ascii_case(actual.trim()),
    }
}

/// Source of student rosters.
pub trait RosterProvider {
    fn roster(&self, scope: &RosterScope) -> RosterResult<Vec<Student>>;
}

/// Roster provider over a fixed, ordered student list.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    students: Vec<Student>,
}

impl StaticRoster {
    pub fn new(students: Vec<Student>) -> Self {
        Self { students }
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

impl RosterProvider for StaticRoster {
    fn roster(&self, scope: &RosterScope) -> RosterResult<Vec<Student>> {
        Ok(self
            .students
            .iter()
            .filter(|student| scope.contains(student))
            .cloned()
            .collect())
    }
}

/// Free-text search plus department slug filter applied on top of a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterQuery {
    /// Matched case-insensitively against name and roll code.
    pub search: String,
    /// Department slug (`computer-science`) or `all-departments`.
    pub department_slug: String,
}

impl Default for RosterQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            department_slug: ALL_DEPARTMENTS.to_string(),
        }
    }
}

impl RosterQuery {
    /// Returns the matching students in roster order.
    pub fn apply(&self, roster: &[Student]) -> Vec<Student> {
        roster
            .iter()
            .filter(|student| self.matches(student))
            .cloned()
            .collect()
    }

    pub fn matches(&self, student: &Student) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || student.name.to_lowercase().contains(&needle)
            || student.roll_no.to_lowercase().contains(&needle);

        let slug = self.department_slug.trim();
        let department_ok =
            slug.is_empty() || slug == ALL_DEPARTMENTS || department_slug(&student.department) == slug;

        search_ok && department_ok
    }
}

/// Lowercase, dash-joined department slug (`Computer Science` -> `computer-science`).
pub fn department_slug(department: &str) -> String {
    department
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::{department_slug, RosterProvider, RosterQuery, RosterScope, StaticRoster};
    use crate::model::student::{Student, StudentId};

    fn sample() -> Vec<Student> {
        vec![
            Student::new(StudentId::from(1_u64), "John Smith", "CS2023001")
                .placed("Computer Science", "2nd Year", "A"),
            Student::new(StudentId::from(3_u64), "Robert Johnson", "CS2023003")
                .placed("Computer Science", "2nd Year", "B"),
            Student::new(StudentId::from(4_u64), "Emily Davis", "EE2023001")
                .placed("Electrical Engineering", "2nd Year", "A"),
        ]
    }

    #[test]
    fn slug_joins_words_with_dashes() {
        assert_eq!(department_slug("Electrical  Engineering"), "electrical-engineering");
    }

    #[test]
    fn static_roster_narrows_by_scope_in_order() {
        let provider = StaticRoster::new(sample());
        assert_eq!(provider.roster(&RosterScope::all()).unwrap().len(), 3);

        let section_a = provider
            .roster(&RosterScope::section("computer science", "2nd Year", "a"))
            .unwrap();
        assert_eq!(section_a.len(), 1);
        assert_eq!(section_a[0].roll_no, "CS2023001");
    }

    #[test]
    fn query_matches_name_or_roll_and_department() {
        let query = RosterQuery {
            search: "ee2023".to_string(),
            ..RosterQuery::default()
        };
        let hits = query.apply(&sample());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Emily Davis");

        let query = RosterQuery {
            search: "o".to_string(),
            department_slug: "computer-science".to_string(),
        };
        let names: Vec<String> = query.apply(&sample()).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["John Smith", "Robert Johnson"]);
    }
}
