//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `attendance_core` linkage.
//! - Run one deterministic mark/save/reload cycle against an in-memory store.

use attendance_core::{
    AttendanceLedger, AttendanceService, CoreSettings, DateKey, KeyValueStore,
    MemoryKeyValueStore, Period, SessionGate, StaticTokenSource, Student, StudentId,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("attendance_core ping={}", attendance_core::ping());
    println!("attendance_core version={}", attendance_core::core_version());

    match smoke_cycle() {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("smoke cycle failed: {message}");
            ExitCode::FAILURE
        }
    }
}

fn smoke_cycle() -> Result<String, String> {
    let session = SessionGate::authorize(&StaticTokenSource::signed_in("smoke"))
        .map_err(|err| err.to_string())?;
    let date = DateKey::parse("2025-04-10").map_err(|err| err.to_string())?;
    let period = Period::new(1).map_err(|err| err.to_string())?;
    let roster = vec![
        Student::new(StudentId::from(1_u64), "John Smith", "CS2023001"),
        Student::new(StudentId::from(2_u64), "Alice Parker", "CS2023002"),
    ];

    let store = MemoryKeyValueStore::new();
    let settings = CoreSettings::default();
    let storage_key = settings.storage_key.clone();
    let mut service = AttendanceService::load(&store, &session, settings);
    service.open_cell(date, period, &roster);
    service.mark(date, period, &roster[1].id, false);
    service.save();

    let blob = store
        .get(&storage_key)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| "ledger was not saved".to_string())?;
    let reloaded = AttendanceLedger::restore(&blob);

    Ok(format!(
        "attendance_core smoke s1={}% s2={}% roundtrip={}",
        reloaded.percentage(date, &roster[0].id),
        reloaded.percentage(date, &roster[1].id),
        &reloaded == service.ledger()
    ))
}
