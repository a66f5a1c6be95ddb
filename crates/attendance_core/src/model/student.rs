//! Student roster records.
//!
//! # Responsibility
//! - Define the student record supplied by roster providers.
//! - Provide the stable identifier used as the innermost ledger key.
//!
//! # Invariants
//! - `StudentId` is never blank.
//! - The ledger never mutates a `Student`; roster providers own them.

use super::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable student identifier.
///
/// Numeric ids from the REST API are carried in their decimal text form so
/// persisted blobs keep the same keys the dashboard always used.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    /// Creates an identifier from non-blank text.
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyStudentId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<u64> for StudentId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<String> for StudentId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for StudentId {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudentId> for String {
    fn from(value: StudentId) -> Self {
        value.0
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roster record for one enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    /// Display name shown in attendance sheets.
    pub name: String,
    /// Roll/registration code, e.g. `CS2023001`.
    pub roll_no: String,
    /// Department display name, e.g. `Computer Science`.
    pub department: String,
    /// Section label, e.g. `A`.
    pub section: String,
    /// Enrollment year label, e.g. `2nd Year`.
    pub year: String,
}

impl Student {
    /// Creates a student with empty placement fields.
    ///
    /// Used by callers that only care about identity and display data.
    pub fn new(id: StudentId, name: impl Into<String>, roll_no: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            roll_no: roll_no.into(),
            department: String::new(),
            section: String::new(),
            year: String::new(),
        }
    }

    /// Sets the department/section/year placement.
    pub fn placed(
        mut self,
        department: impl Into<String>,
        year: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        self.department = department.into();
        self.year = year.into();
        self.section = section.into();
        self
    }

    /// Avatar initials derived from the display name (`John Smith` -> `JS`).
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}
