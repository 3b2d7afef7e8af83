#![allow(clippy::unwrap_used)]

mod common;

use std::fs;
use std::time::Duration;

use common::Harness;
use serde_json::{Value, json};
use ztpctl::commands::status::{StatusView, status};
use ztpctl::display::renderer::Renderer;

const CODES: [&str; 7] = [
    "0:DISABLED",
    "1:INACTIVE",
    "2:ACTIVE-DISCOVERY",
    "3:NOT-STARTED",
    "4:IN-PROGRESS",
    "5:SUCCESS",
    "6:FAILED",
];

fn render(h: &Harness, view: StatusView, privileged: bool) -> String {
    let mut out = Vec::new();
    status(&h.context(privileged), view, &mut Renderer::with_writer(&mut out)).unwrap();
    String::from_utf8(out).unwrap()
}

fn finished_session() -> Value {
    json!({
        "status": "SUCCESS",
        "ztp-json-source": "dhcp-opt67 (eth0)",
        "ztp-json-version": "1.0",
        "start-timestamp": "2019-09-11 19:06:45 UTC",
        "timestamp": "2019-09-11 19:12:16 UTC",
        "ignore-result": false,
        "01-configdb-json": {
            "status": "SUCCESS",
            "start-timestamp": "2019-09-11 19:09:07 UTC",
            "timestamp": "2019-09-11 19:11:55 UTC",
            "exit-code": 0,
            "ignore-result": false
        },
        "02-connectivity-check": {
            "status": "SUCCESS",
            "start-timestamp": "2019-09-11 19:12:12 UTC",
            "timestamp": "2019-09-11 19:12:16 UTC",
            "exit-code": 0,
            "ignore-result": false
        }
    })
}

#[test]
fn terse_without_record() {
    let h = Harness::new();
    let out = render(&h, StatusView::Terse, true);
    assert!(out.contains("ZTP Service     : Inactive\n"));
    assert!(out.contains("ZTP Status      : Not Started\n"));
    assert!(!out.contains("Runtime"));
}

#[test]
fn in_progress_runtime_counts_to_now() {
    let h = Harness::new();
    h.service.active.set(true);
    h.write_state(json!({
        "status": "IN-PROGRESS",
        "start-timestamp": "2020-01-01 00:00:00 UTC",
        "timestamp": "2020-01-01 00:00:05 UTC"
    }));
    let out = render(&h, StatusView::Terse, true);
    assert!(out.contains("Runtime         : 01m 30s\n"), "{out}");
    assert!(out.contains("Timestamp       : 2020-01-01 00:01:30 UTC\n"), "{out}");
    assert!(out.contains("ZTP Service     : Processing\n"), "{out}");
}

#[test]
fn reports_read_the_shadow_copy() {
    let h = Harness::new();
    h.write_state(json!({"status": "SUCCESS"}));
    fs::write(h.shadow_path(), r#"{"ztp": {"status": "FAILED"}}"#).unwrap();
    assert_eq!(render(&h, StatusView::Coded, false), "6:FAILED\n");
}

#[test]
fn coded_view_is_always_one_known_line() {
    let records = [
        None,
        Some(json!({"status": "BOOT"})),
        Some(json!({"status": "IN-PROGRESS", "start-timestamp": "bogus"})),
        Some(json!({"status": "SUCCESS"})),
        Some(json!({"status": "FAILED", "error": "boom"})),
        Some(json!({})),
    ];
    for admin_mode in [false, true] {
        for active in [false, true] {
            for record in &records {
                let h = Harness::with_config(json!({"admin-mode": admin_mode}));
                h.service.active.set(active);
                if let Some(record) = record {
                    h.write_state(record.clone());
                }
                let out = render(&h, StatusView::Coded, true);
                let line = out.strip_suffix('\n').unwrap();
                assert!(!line.contains('\n'));
                assert!(CODES.contains(&line), "unexpected code {line:?}");
            }
        }
    }
}

#[test]
fn query_failure_reports_inactive() {
    let mut h = Harness::new();
    h.service.fail_queries = true;
    assert_eq!(render(&h, StatusView::Coded, true), "1:INACTIVE\n");
    assert!(render(&h, StatusView::Terse, true).contains("ZTP Service is not running"));
}

#[test]
fn active_discovery_uses_service_activation_time() {
    let mut h = Harness::new();
    h.service.activated_at = Some(Duration::from_secs(2000));
    h.service.active.set(true);
    // Activation later than "now" on the monotonic clock is unknown, not negative.
    assert!(!render(&h, StatusView::Terse, true).contains("Runtime"));

    h.service.activated_at = Some(Duration::from_secs(1000 - 125));
    let out = render(&h, StatusView::Terse, true);
    assert!(out.contains("ZTP Service     : Active Discovery\n"), "{out}");
    assert!(out.contains("Runtime         : 02m 05s\n"), "{out}");
    assert_eq!(render(&h, StatusView::Coded, true), "2:ACTIVE-DISCOVERY\n");
}

#[test]
fn activity_is_only_shown_to_privileged_callers() {
    let h = Harness::new();
    h.service.active.set(true);
    fs::write(
        h.activity_path(),
        "2020-01-01 00:00:30 UTC | Downloading ztp.json\n",
    )
    .unwrap();

    let root = render(&h, StatusView::Terse, true);
    assert!(root.contains("\n(01m 00s) Downloading ztp.json\n"), "{root}");

    let user = render(&h, StatusView::Terse, false);
    assert!(user.contains("\nZTP Service is active\n"), "{user}");
    assert!(!user.contains("Downloading"));
}

#[test]
fn activity_is_hidden_when_service_is_inactive() {
    let h = Harness::new();
    fs::write(h.activity_path(), "Waiting for DHCP\n").unwrap();
    let out = render(&h, StatusView::Verbose, true);
    assert!(out.contains("ZTP Service is not running"));
    assert!(!out.contains("Waiting for DHCP"));
}

#[test]
fn every_view_handles_partial_records() {
    let partial = [
        json!({}),
        json!({"status": "IN-PROGRESS"}),
        json!({"status": "FAILED", "error": "halted", "timestamp": "garbled"}),
        json!({"status": "SUCCESS", "start-timestamp": "2020-01-01 00:00:00 XYZ",
               "timestamp": "2020-01-01 00:00:09 UTC"}),
        json!({"status": "BOOT", "section": {}}),
        json!({"status": "IN-PROGRESS", "a": {"status": "IN-PROGRESS", "start-timestamp": 12}}),
        json!({"status": "mystery", "ztp-json-version": 2, "ignore-result": "true"}),
    ];
    for record in partial {
        for active in [false, true] {
            let h = Harness::new();
            h.service.active.set(active);
            h.write_state(record.clone());
            for view in [StatusView::Terse, StatusView::Verbose, StatusView::Coded] {
                let out = render(&h, view, true);
                assert!(!out.is_empty(), "{view:?} printed nothing for {record}");
            }
        }
    }
}

#[test]
fn malformed_timestamps_render_unknown() {
    let h = Harness::new();
    h.write_state(json!({
        "status": "FAILED",
        "start-timestamp": "2020-01-01 00:00:00 UTC",
        "timestamp": "2020-01-01 00:00:09 Mars/Olympus"
    }));
    let out = render(&h, StatusView::Terse, true);
    assert!(out.contains("Runtime         : unknown\n"), "{out}");
}

#[test]
fn verbose_report() {
    let h = Harness::new();
    h.write_state(finished_session());
    insta::assert_snapshot!(render(&h, StatusView::Verbose, true).trim_end(), @r"
    ========================================
    ZTP
    ========================================
    ZTP Admin Mode  : True
    ZTP Service     : Inactive
    ZTP Status      : SUCCESS
    ZTP Source      : dhcp-opt67 (eth0)
    Runtime         : 05m 31s
    Timestamp       : 2019-09-11 19:12:16 UTC
    ZTP JSON Version: 1.0
    Ignore Result   : False

    ZTP Service is not running

    ----------------------------------------
    01-configdb-json
    ----------------------------------------
    Status          : SUCCESS
    Runtime         : 02m 48s
    Timestamp       : 2019-09-11 19:11:55 UTC
    Exit Code       : 0
    Ignore Result   : False

    ----------------------------------------
    02-connectivity-check
    ----------------------------------------
    Status          : SUCCESS
    Runtime         : 04s
    Timestamp       : 2019-09-11 19:12:16 UTC
    Exit Code       : 0
    Ignore Result   : False
    ");
}

#[test]
fn terse_report_disabled() {
    let h = Harness::with_config(json!({"admin-mode": false}));
    h.write_state(finished_session());
    insta::assert_snapshot!(render(&h, StatusView::Terse, true).trim_end(), @r"
    ZTP Admin Mode  : False
    ZTP Service     : Inactive
    ZTP Status      : SUCCESS
    ZTP Source      : dhcp-opt67 (eth0)
    Runtime         : 05m 31s
    Timestamp       : 2019-09-11 19:12:16 UTC

    ZTP Service is not running

    01-configdb-json: SUCCESS
    02-connectivity-check: SUCCESS
    ");
    assert_eq!(render(&h, StatusView::Coded, true), "0:DISABLED\n");
}
