//! Parser for the Playwright JSON reporter output.
//!
//! The report is a tree: files → suites → nested suites → specs → tests (one
//! per project) → results (one per attempt). Parsing flattens it into the
//! collections of [`ReportSummary`] and derives the run's aggregate timing.
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ReportError, Result};
use crate::model::*;

/// Separator between title segments, e.g. `chromium › login.spec.ts › logs in`.
pub const TITLE_SEPARATOR: &str = " › ";

// ---------------------------------------------------------------------------
// Raw report shape
// ---------------------------------------------------------------------------

/// Root of the JSON reporter output.
#[derive(Debug, Deserialize)]
pub struct RawReport {
    pub config: RawConfig,
    #[serde(default)]
    pub suites: Vec<RawSuite>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub workers: Option<u64>,
    #[serde(default)]
    pub shard: Option<RawShard>,
    #[serde(default)]
    pub projects: Vec<RawProject>,
    #[serde(default)]
    pub metadata: RawMetadata,
}

#[derive(Debug, Deserialize)]
pub struct RawShard {
    pub current: u64,
    pub total: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetadata {
    #[serde(default)]
    pub actual_workers: Option<u64>,
    /// Milliseconds, set by the blob/merge reporter.
    #[serde(default)]
    pub total_time: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawProject {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawSuite {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default)]
    pub specs: Vec<RawSpec>,
    #[serde(default)]
    pub suites: Vec<RawSuite>,
}

#[derive(Debug, Deserialize)]
pub struct RawSpec {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tests: Vec<RawTest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTest {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub results: Vec<RawTestResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTestResult {
    #[serde(default)]
    pub duration: f64,
    pub start_time: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Shallow shape check: an object with `config`, `errors` and `suites` keys.
#[must_use]
pub fn is_valid_report(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        ["config", "errors", "suites"]
            .iter()
            .all(|key| object.contains_key(*key))
    })
}

/// Parse the raw report text, rejecting anything that isn't a JSON report.
/// The offending payload is logged at debug level before failing.
pub fn make_report(data: &str) -> Result<RawReport> {
    let value: Value = serde_json::from_str(data)?;
    if !is_valid_report(&value) {
        debug!("Invalid report file");
        debug!("{data}");
        return Err(ReportError::InvalidFormat);
    }
    Ok(serde_json::from_value(value)?)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Parse the JSON reporter output into a [`ReportSummary`].
pub fn parse_report(data: &str) -> Result<ReportSummary> {
    let report = make_report(data)?;

    let files = parse_report_files(&report);
    let all_suites = parse_all_suites(&report);
    let suites: Vec<SuiteSummary> = all_suites.into_iter().filter(|s| s.root).collect();
    // Root suites already carry every nested spec.
    let specs: Vec<SpecSummary> = suites.iter().flat_map(|s| s.specs.clone()).collect();

    let tests: Vec<TestSummary> = specs.iter().flat_map(|s| s.tests.clone()).collect();
    let results: Vec<TestResultSummary> = tests.iter().flat_map(|t| t.results.clone()).collect();
    let by_status = |status: TestStatus| -> Vec<TestSummary> {
        tests
            .iter()
            .filter(|t| t.status == Some(status))
            .cloned()
            .collect()
    };
    let failed = by_status(TestStatus::Failed);
    let passed = by_status(TestStatus::Passed);
    let flaky = by_status(TestStatus::Flaky);
    let skipped = by_status(TestStatus::Skipped);

    let (duration, started) = total_duration(&report, &results);
    let config = &report.config;
    let workers = config
        .metadata
        .actual_workers
        .filter(|&w| w > 0)
        .or(config.workers.filter(|&w| w > 0))
        .unwrap_or(1);
    let shards = config.shard.as_ref().map_or(0, |shard| shard.total);
    let projects = config.projects.iter().map(|p| p.name.clone()).collect();

    debug!(
        "Parsed report: {} files, {} specs, {} tests, {} results",
        files.len(),
        specs.len(),
        tests.len(),
        results.len()
    );

    Ok(ReportSummary {
        version: config.version.clone(),
        started,
        duration,
        workers,
        shards,
        projects,
        files,
        suites,
        specs,
        tests,
        failed,
        passed,
        flaky,
        skipped,
        results,
    })
}

/// File names of the root suites, in report order.
#[must_use]
pub fn parse_report_files(report: &RawReport) -> Vec<String> {
    report.suites.iter().map(|suite| suite.file.clone()).collect()
}

/// Summaries of the root suites. Each one carries the specs of its whole
/// subtree.
#[must_use]
pub fn parse_report_suites(report: &RawReport) -> Vec<SuiteSummary> {
    report
        .suites
        .iter()
        .map(|suite| parse_suite(suite, &[]).0)
        .collect()
}

/// Summaries of every suite at every nesting level, parents before children.
#[must_use]
pub fn parse_all_suites(report: &RawReport) -> Vec<SuiteSummary> {
    report
        .suites
        .iter()
        .flat_map(|suite| {
            let (summary, descendants) = parse_suite(suite, &[]);
            std::iter::once(summary).chain(descendants)
        })
        .collect()
}

/// Summarize `suite` and return it with the summaries of all its descendant
/// suites (pre-order).
fn parse_suite(suite: &RawSuite, parents: &[String]) -> (SuiteSummary, Vec<SuiteSummary>) {
    let mut ancestry = parents.to_vec();
    ancestry.push(suite.title.clone());
    let Title { title, path } = build_title(&ancestry);
    let level = parents.len();

    let mut specs = Vec::new();
    let mut descendants = Vec::new();
    for child in &suite.suites {
        let (summary, nested) = parse_suite(child, &ancestry);
        specs.extend(summary.specs.iter().cloned());
        descendants.push(summary);
        descendants.extend(nested);
    }
    specs.extend(suite.specs.iter().map(|spec| parse_spec(spec, &ancestry)));

    let summary = SuiteSummary {
        file: suite.file.clone(),
        line: suite.line,
        column: suite.column,
        path,
        title,
        level,
        root: level == 0,
        specs,
    };
    (summary, descendants)
}

fn parse_spec(spec: &RawSpec, parents: &[String]) -> SpecSummary {
    let mut segments = parents.to_vec();
    segments.push(spec.title.clone());
    let Title { title, path } = build_title(&segments);
    let tests = spec
        .tests
        .iter()
        .map(|test| parse_test(test, spec, parents))
        .collect();
    SpecSummary {
        ok: spec.ok,
        file: spec.file.clone(),
        line: spec.line,
        column: spec.column,
        path,
        title,
        tests,
    }
}

fn parse_test(test: &RawTest, spec: &RawSpec, parents: &[String]) -> TestSummary {
    let mut segments = Vec::with_capacity(parents.len() + 2);
    segments.push(test.project_name.clone());
    segments.extend(parents.iter().cloned());
    segments.push(spec.title.clone());
    let Title { title, path } = build_title(&segments);
    let results = test
        .results
        .iter()
        .map(|result| TestResultSummary {
            duration: result.duration,
            started: result.start_time,
        })
        .collect();
    let status = TestStatus::from_raw(&test.status);
    if status.is_none() {
        debug!("Unknown status {:?} for test {}", test.status, title);
    }
    TestSummary {
        status,
        file: spec.file.clone(),
        line: spec.line,
        column: spec.column,
        path,
        title,
        results,
    }
}

/// A joined title plus the non-empty segments it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub title: String,
    pub path: Vec<String>,
}

/// Drop empty segments and join the rest with [`TITLE_SEPARATOR`].
#[must_use]
pub fn build_title<S: AsRef<str>>(segments: &[S]) -> Title {
    let path: Vec<String> = segments
        .iter()
        .map(|segment| segment.as_ref())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    let title = path.join(TITLE_SEPARATOR);
    Title { title, path }
}

/// Total wall time of the run and the time it started.
///
/// `metadata.totalTime` wins when present, with the start left at now.
/// Otherwise the duration spans from the earliest result start to the end of
/// the result that started last; without any results the duration is 0 and
/// the start is now.
fn total_duration(report: &RawReport, results: &[TestResultSummary]) -> (f64, DateTime<Utc>) {
    if let Some(total_time) = report.config.metadata.total_time.filter(|t| *t > 0.0) {
        return (total_time, Utc::now());
    }

    let mut sorted: Vec<&TestResultSummary> = results.iter().collect();
    sorted.sort_by_key(|result| result.started);

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return (0.0, Utc::now());
    };
    let span = last.started - first.started;
    (span.num_milliseconds() as f64 + last.duration, first.started)
}
