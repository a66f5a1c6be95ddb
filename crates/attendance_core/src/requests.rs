//! Typed request models for the dashboard REST collaborators.
//!
//! # Responsibility
//! - Give every entity form (department, year, section, student, user,
//!   login) its own request shape instead of a loose field bag.
//! - Validate required fields before a request leaves the client.
//!
//! # Invariants
//! - `validate()` reports the first failing field in declaration order.
//! - Validation never trims stored values; it only inspects them.

use crate::session::UserProfile;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEPARTMENT_CODE_MAX_CHARS: usize = 5;
const PASSWORD_MIN_CHARS: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    Required,
    TooLong { max: usize },
    TooShort { min: usize },
    InvalidFormat,
}

/// First invalid field of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestValidationError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl Display for RequestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            ValidationReason::Required => write!(f, "{} is required", self.field),
            ValidationReason::TooLong { max } => {
                write!(f, "{} should be {max} characters or less", self.field)
            }
            ValidationReason::TooShort { min } => {
                write!(f, "{} must be at least {min} characters", self.field)
            }
            ValidationReason::InvalidFormat => write!(f, "{} is invalid", self.field),
        }
    }
}

impl Error for RequestValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRequest {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRequest {
    pub department_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRequest {
    pub year_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionUpdate {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRequest {
    pub name: String,
    pub roll_no: String,
    pub section_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(rename = "rememberMe")]
    pub remember_me: bool,
}

/// One dashboard write, tagged by entity and action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityRequest {
    CreateDepartment(DepartmentRequest),
    CreateYear(YearRequest),
    CreateSection(SectionRequest),
    UpdateSection(SectionUpdate),
    CreateStudent(StudentRequest),
    CreateUser(UserRequest),
    Login(LoginRequest),
}

impl EntityRequest {
    /// Checks required fields and format rules for this request.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        match self {
            Self::CreateDepartment(request) => {
                required("name", &request.name)?;
                required("code", &request.code)?;
                max_chars("code", &request.code, DEPARTMENT_CODE_MAX_CHARS)
            }
            Self::CreateYear(request) => {
                required("department_id", &request.department_id)?;
                required("name", &request.name)
            }
            Self::CreateSection(request) => {
                required("year_id", &request.year_id)?;
                required("name", &request.name)
            }
            Self::UpdateSection(request) => {
                required("id", &request.id)?;
                required("name", &request.name)
            }
            Self::CreateStudent(request) => {
                required("name", &request.name)?;
                required("roll_no", &request.roll_no)
            }
            Self::CreateUser(request) => {
                required("username", &request.username)?;
                required("name", &request.name)?;
                required("email", &request.email)?;
                if !EMAIL_RE.is_match(&request.email) {
                    return Err(invalid("email", ValidationReason::InvalidFormat));
                }
                Ok(())
            }
            Self::Login(request) => {
                required("username", &request.username)?;
                if request.password.is_empty() {
                    return Err(invalid("password", ValidationReason::Required));
                }
                min_chars("password", &request.password, PASSWORD_MIN_CHARS)
            }
        }
    }
}

/// Login endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

fn invalid(field: &'static str, reason: ValidationReason) -> RequestValidationError {
    RequestValidationError { field, reason }
}

fn required(field: &'static str, value: &str) -> Result<(), RequestValidationError> {
    if value.trim().is_empty() {
        return Err(invalid(field, ValidationReason::Required));
    }
    Ok(())
}

fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), RequestValidationError> {
    if value.chars().count() > max {
        return Err(invalid(field, ValidationReason::TooLong { max }));
    }
    Ok(())
}

fn min_chars(field: &'static str, value: &str, min: usize) -> Result<(), RequestValidationError> {
    if value.chars().count() < min {
        return Err(invalid(field, ValidationReason::TooShort { min }));
    }
    Ok(())
}
