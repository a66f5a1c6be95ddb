//! Core attendance logic for the student-attendance dashboard.
//! This crate is the single source of truth for attendance invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod requests;
pub mod roster;
pub mod service;
pub mod session;
pub mod settings;
pub mod store;

pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::aggregate::{
    AttendanceBand, CellRow, DayRow, EmptyDayPolicy, PeriodSummary, StatusFilter,
};
pub use model::calendar::{DateKey, Period};
pub use model::ledger::{AttendanceLedger, CellState, LedgerBlob, LedgerCodecError};
pub use model::student::{Student, StudentId};
pub use model::ModelError;
pub use requests::{EntityRequest, LoginResponse, RequestValidationError, ValidationReason};
pub use roster::{RosterError, RosterProvider, RosterQuery, RosterScope, StaticRoster};
pub use service::attendance_service::{AttendanceService, LoadOutcome, SaveOutcome};
pub use session::{
    resolve_route, Route, RouteDecision, SessionContext, SessionError, SessionGate,
    StaticTokenSource, TokenSource, UserProfile,
};
pub use settings::{CoreSettings, SettingsError};
pub use store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
