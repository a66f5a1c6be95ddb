//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate ledger, roster and store calls into page-level actions.
//! - Keep UI layers decoupled from storage details.

pub mod attendance_service;
