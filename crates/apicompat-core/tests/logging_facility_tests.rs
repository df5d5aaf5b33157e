#![allow(clippy::unwrap_used, clippy::expect_used)]

use apicompat_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_PACKAGE,
};
use apicompat_core::errors::{ApiCompatError, ExError, ExErrorKind};
use apicompat_core::logging_facility::test_capture::init_test_capture;
use apicompat_core::snapshot::parse_snapshot_bytes;
use apicompat_core::{diff_bundles, diff_snapshots, log_op_end, log_op_error, log_op_start};
use apicompat_core::{CompatPolicy, FunctionDecl, Signature, Snapshot, SnapshotBundle, TypeShape};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(starts, 1);
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ApiCompatError::InvalidName {
        package: "p".to_string(),
        name: "T.M".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_INVALID_DECLARATION"));
    assert_eq!(events[0].field(FIELD_PACKAGE), Some("p"));
    assert_eq!(events[0].field("decl_name"), Some("T.M"));
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::InvalidConfig);
    log_op_error!(op_name, err, duration_ms = 1, detail = "bad depth");

    let events = capture.events_for(op_name);
    assert_eq!(events[0].field("detail"), Some("bad depth"));
    assert_eq!(events[0].field("err_kind"), Some("InvalidConfig"));
}

#[test]
fn test_diff_snapshots_emits_boundary_events() {
    let capture = init_test_capture();
    let path = "example.com/logging/boundary";

    let before = Snapshot::builder(path)
        .function(FunctionDecl::new("F", Signature::new(vec![TypeShape::int()], vec![])))
        .build()
        .unwrap();
    let after = Snapshot::empty(path);
    diff_snapshots(&before, &after, &CompatPolicy::default());

    let ours: Vec<_> = capture
        .events_for_package(path)
        .into_iter()
        .filter(|e| e.op.as_deref() == Some("diff_snapshots") && e.event.is_some())
        .collect();
    assert_eq!(ours.len(), 2, "exactly one start and one end");
    assert_eq!(ours[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(ours[1].event.as_deref(), Some(EVENT_END));
    assert_eq!(ours[1].field("function_count"), Some("1"));
    assert_eq!(ours[1].field("breaking_count"), Some("1"));
    assert!(ours[1].field("duration_ms").is_some());
}

#[test]
fn test_diff_snapshots_logs_each_declaration() {
    let capture = init_test_capture();
    let path = "example.com/logging/per_decl";

    let snap = Snapshot::builder(path)
        .function(FunctionDecl::new("G", Signature::default()))
        .build()
        .unwrap();
    diff_snapshots(&snap, &snap, &CompatPolicy::default());

    let classified = capture.count_events(|e| {
        e.field(FIELD_PACKAGE) == Some(path)
            && e.field("decl_name") == Some("G")
            && e.field("change_kind") == Some("unchanged")
    });
    assert_eq!(classified, 1);
}

#[test]
fn test_parse_failure_emits_end_error() {
    let capture = init_test_capture();

    let result = parse_snapshot_bytes(br#"{"schema_version": 99}"#);
    assert!(result.is_err());

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("parse_snapshot_bytes")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_UNSUPPORTED_SCHEMA")
    });
    assert!(errors >= 1);
}

#[test]
fn test_breaking_count_includes_removed_in_both_diffs() {
    let capture = init_test_capture();
    let path = "example.com/logging/removed_only";

    let before = Snapshot::builder(path)
        .function(FunctionDecl::new("Gone", Signature::default()))
        .build()
        .unwrap();
    diff_bundles(
        &SnapshotBundle::try_from(before).unwrap(),
        &SnapshotBundle::try_from(Snapshot::empty(path)).unwrap(),
        &CompatPolicy::default(),
    );

    let package_end = capture
        .events_for_package(path)
        .into_iter()
        .find(|e| e.op.as_deref() == Some("diff_snapshots") && e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(package_end.field("breaking_count"), Some("1"));

    let bundle_end = capture
        .events_for("diff_bundles")
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(bundle_end.field("breaking_count"), Some("1"));
}
