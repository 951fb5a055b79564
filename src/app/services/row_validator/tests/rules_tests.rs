//! Tests for the ordered validation rules

use super::{default_rules, record_with, valid_record};
use crate::app::services::row_validator::RowOutcome;
use crate::config::Settings;
use crate::app::services::row_validator::ValidationRules;
use crate::{ContactQuality, RejectReason};
use chrono::NaiveDate;

fn expect_rejection(outcome: RowOutcome, reason: RejectReason) {
    match outcome {
        RowOutcome::Rejected(rejected) => assert_eq!(rejected.reason, reason),
        RowOutcome::Accepted(metric) => panic!("expected {reason:?}, accepted {metric:?}"),
    }
}

#[test]
fn valid_row_is_accepted_and_normalized() {
    let outcome = default_rules().validate(&valid_record());

    let metric = match outcome {
        RowOutcome::Accepted(metric) => metric,
        RowOutcome::Rejected(rejected) => panic!("unexpected rejection: {rejected:?}"),
    };

    assert_eq!(metric.player_name, "Jo Tanaka");
    assert_eq!(
        metric.session_date,
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    );
    assert_eq!(metric.drill_type, "Tee");
    assert_eq!(metric.contact_quality, ContactQuality::Hard);
    // Numeric values are parsed but never altered
    assert_eq!(metric.exit_velocity, 88.5);
    assert_eq!(metric.launch_angle, 12.0);
    assert_eq!(metric.distance, 210.0);
    // Provenance survives validation
    assert_eq!(metric.sheet_name, "march");
    assert_eq!(metric.row_index, 2);
}

#[test]
fn each_missing_required_field_rejects_with_missing_field() {
    for column in [
        "player_name",
        "session_date",
        "drill_type",
        "exit_velocity",
        "launch_angle",
        "distance",
        "quality_of_contact",
    ] {
        let record = record_with(&[(column, "  ")]);
        expect_rejection(default_rules().validate(&record), RejectReason::MissingField);
    }
}

#[test]
fn unparseable_date_is_rejected() {
    let record = record_with(&[("session_date", "March the 14th")]);
    expect_rejection(
        default_rules().validate(&record),
        RejectReason::UnparseableDate,
    );
}

#[test]
fn alternate_date_format_is_accepted() {
    let record = record_with(&[("session_date", "03/14/2025")]);
    match default_rules().validate(&record) {
        RowOutcome::Accepted(metric) => assert_eq!(
            metric.session_date,
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        ),
        RowOutcome::Rejected(rejected) => panic!("unexpected rejection: {rejected:?}"),
    }
}

#[test]
fn out_of_range_metrics_are_rejected() {
    for (column, value) in [
        ("exit_velocity", "130.1"),
        ("exit_velocity", "-1"),
        ("launch_angle", "95"),
        ("launch_angle", "-90.5"),
        ("distance", "601"),
        ("distance", "-3"),
    ] {
        let record = record_with(&[(column, value)]);
        expect_rejection(default_rules().validate(&record), RejectReason::OutOfRange);
    }
}

#[test]
fn range_bounds_are_inclusive() {
    for (column, value) in [
        ("exit_velocity", "0"),
        ("exit_velocity", "130"),
        ("launch_angle", "-90"),
        ("launch_angle", "90"),
        ("distance", "0"),
        ("distance", "600"),
    ] {
        let record = record_with(&[(column, value)]);
        assert!(
            matches!(default_rules().validate(&record), RowOutcome::Accepted(_)),
            "{column}={value} should be accepted"
        );
    }
}

#[test]
fn non_numeric_metric_rejects_as_out_of_range() {
    let record = record_with(&[("distance", "far")]);
    expect_rejection(default_rules().validate(&record), RejectReason::OutOfRange);
}

#[test]
fn unknown_contact_quality_is_rejected() {
    let record = record_with(&[("quality_of_contact", "Crushed")]);
    expect_rejection(
        default_rules().validate(&record),
        RejectReason::InvalidCategory,
    );
}

#[test]
fn unknown_drill_type_is_rejected() {
    let record = record_with(&[("drill_type", "Pepper")]);
    expect_rejection(
        default_rules().validate(&record),
        RejectReason::InvalidCategory,
    );
}

#[test]
fn drill_type_is_canonicalized_case_insensitively() {
    let record = record_with(&[("drill_type", "LIVE bp")]);
    match default_rules().validate(&record) {
        RowOutcome::Accepted(metric) => assert_eq!(metric.drill_type, "Live BP"),
        RowOutcome::Rejected(rejected) => panic!("unexpected rejection: {rejected:?}"),
    }
}

#[test]
fn first_failing_rule_determines_the_reason() {
    // Missing field beats the bad date and bad drill also present
    let record = record_with(&[
        ("player_name", ""),
        ("session_date", "bogus"),
        ("drill_type", "Pepper"),
    ]);
    expect_rejection(default_rules().validate(&record), RejectReason::MissingField);

    // Bad date beats the out-of-range distance
    let record = record_with(&[("session_date", "bogus"), ("distance", "9000")]);
    expect_rejection(
        default_rules().validate(&record),
        RejectReason::UnparseableDate,
    );

    // Out-of-range beats the bad category
    let record = record_with(&[("distance", "9000"), ("quality_of_contact", "Crushed")]);
    expect_rejection(default_rules().validate(&record), RejectReason::OutOfRange);
}

#[test]
fn validation_is_deterministic() {
    let rules = default_rules();
    let record = record_with(&[("distance", "9000")]);
    assert_eq!(rules.validate(&record), rules.validate(&record));
    assert_eq!(
        rules.validate(&valid_record()),
        rules.validate(&valid_record())
    );
}

#[test]
fn configured_bounds_are_honored() {
    let mut settings = Settings::default();
    settings.bounds.exit_velocity = 0.0..=110.0;
    let rules = ValidationRules::from_settings(&settings);

    let record = record_with(&[("exit_velocity", "115")]);
    expect_rejection(rules.validate(&record), RejectReason::OutOfRange);
}

#[test]
fn configured_drill_allow_list_is_honored() {
    let settings = Settings::default()
        .with_drill_types(vec!["High Tee".to_string(), "Short Box".to_string()]);
    let rules = ValidationRules::from_settings(&settings);

    let accepted = record_with(&[("drill_type", "short box")]);
    match rules.validate(&accepted) {
        RowOutcome::Accepted(metric) => assert_eq!(metric.drill_type, "Short Box"),
        RowOutcome::Rejected(rejected) => panic!("unexpected rejection: {rejected:?}"),
    }

    let rejected = record_with(&[("drill_type", "Tee")]);
    expect_rejection(rules.validate(&rejected), RejectReason::InvalidCategory);
}

#[test]
fn rejected_record_keeps_the_raw_row() {
    let record = record_with(&[("distance", "-3")]);
    match default_rules().validate(&record) {
        RowOutcome::Rejected(rejected) => {
            assert_eq!(rejected.record, record);
            assert!(rejected.detail.contains("distance"));
        }
        RowOutcome::Accepted(metric) => panic!("unexpected accept: {metric:?}"),
    }
}
