#![allow(dead_code)]

use pwsummary::model::ReportSummary;

pub const VALID: &str = include_str!("../fixtures/report-valid.json");
pub const INVALID: &str = include_str!("../fixtures/report-invalid.json");
pub const WITHOUT_DURATION: &str = include_str!("../fixtures/report-without-duration.json");
pub const SHARDED: &str = include_str!("../fixtures/report-sharded.json");
pub const NESTED: &str = include_str!("../fixtures/report-nested.json");

/// Parse one of the fixture reports, panicking on failure.
pub fn parsed(data: &str) -> ReportSummary {
    pwsummary::parse_report(data).unwrap()
}
