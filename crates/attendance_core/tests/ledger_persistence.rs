use attendance_core::{
    AttendanceLedger, CellState, DateKey, LedgerCodecError, Period, Student, StudentId,
};

fn date(text: &str) -> DateKey {
    DateKey::parse(text).unwrap()
}

fn period(value: u8) -> Period {
    Period::new(value).unwrap()
}

fn roster(size: u64) -> Vec<Student> {
    (1..=size)
        .map(|id| Student::new(StudentId::from(id), format!("Student {id}"), format!("CS{id:04}")))
        .collect()
}

fn busy_ledger() -> AttendanceLedger {
    let roster = roster(5);
    let mut ledger = AttendanceLedger::new();
    let first = date("2025-04-10");
    let second = date("2025-04-11");

    ledger.ensure_initialized(first, period(1), &roster);
    ledger.set_status(first, period(1), &roster[2].id, false);
    ledger.set_batch(first, period(3), &roster[..3], false);
    ledger.set_status(first, period(3), &roster[0].id, true);
    ledger.ensure_initialized(second, period(7), &roster);
    ledger.set_status(second, period(2), &StudentId::new("gone").unwrap(), false);
    ledger
}

#[test]
fn restore_of_persist_reproduces_every_status() {
    let mut ledger = busy_ledger();
    let blob = ledger.persist().unwrap();
    let restored = AttendanceLedger::restore(blob.as_str());

    assert_eq!(restored, ledger);
    let mut ids: Vec<StudentId> = roster(5).into_iter().map(|s| s.id).collect();
    ids.push(StudentId::new("gone").unwrap());
    for d in [date("2025-04-10"), date("2025-04-11"), date("2025-04-12")] {
        for p in Period::all() {
            for id in &ids {
                assert_eq!(restored.get_status(d, p, id), ledger.get_status(d, p, id));
            }
        }
    }
}

#[test]
fn persist_is_deterministic_and_sorted() {
    let mut forward = AttendanceLedger::new();
    let mut backward = AttendanceLedger::new();
    let a = StudentId::new("a").unwrap();
    let b = StudentId::new("b").unwrap();

    forward.set_status(date("2025-04-10"), period(2), &a, false);
    forward.set_status(date("2025-04-09"), period(1), &b, true);
    backward.set_status(date("2025-04-09"), period(1), &b, true);
    backward.set_status(date("2025-04-10"), period(2), &a, false);

    let blob = forward.persist().unwrap();
    assert_eq!(blob, backward.persist().unwrap());
    assert_eq!(
        blob.as_str(),
        r#"{"2025-04-09":{"1":{"b":true}},"2025-04-10":{"2":{"a":false}}}"#
    );
}

#[test]
fn restored_cells_are_marked_saved_and_clean() {
    let mut ledger = busy_ledger();
    let blob = ledger.persist().unwrap();
    let restored = AttendanceLedger::restore(blob.as_str());

    assert!(!restored.is_dirty());
    assert_eq!(
        restored.cell_state(date("2025-04-10"), period(1)),
        CellState::Saved
    );
    assert_eq!(
        restored.cell_state(date("2025-04-10"), period(2)),
        CellState::Uninitialized
    );
}

#[test]
fn dashboard_blob_with_numeric_student_keys_restores() {
    let blob = r#"{"2025-04-10":{"1":{"1":true,"2":false},"3":{"2":true}}}"#;
    let ledger = AttendanceLedger::try_restore(blob).unwrap();
    let second = StudentId::from(2_u64);

    assert!(!ledger.get_status(date("2025-04-10"), period(1), &second));
    assert_eq!(ledger.percentage(date("2025-04-10"), &second), 50);
}

#[test]
fn corrupt_blobs_restore_to_empty_ledger() {
    let corrupt = [
        "",
        "not json",
        "[]",
        "null",
        r#"{"2025-04-10":{"9":{"1":true}}}"#,
        r#"{"yesterday":{"1":{"1":true}}}"#,
        r#"{"2025-04-10":{"1":{"1":"present"}}}"#,
        r#"{"2025-04-10":{"1":{"1":true}}"#,
    ];

    for blob in corrupt {
        let ledger = AttendanceLedger::restore(blob);
        assert!(ledger.is_empty(), "blob `{blob}` should be discarded");
        assert!(matches!(
            AttendanceLedger::try_restore(blob),
            Err(LedgerCodecError::Malformed(_))
        ));
    }
}

#[test]
fn empty_ledger_round_trips() {
    let mut ledger = AttendanceLedger::new();
    let blob = ledger.persist().unwrap();
    assert_eq!(blob.as_str(), "{}");
    assert_eq!(AttendanceLedger::restore(blob.as_str()), ledger);
}
