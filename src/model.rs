//! Normalized, read-only view of a Playwright run. The parser flattens the
//! raw suite tree into these types and the renderer only ever reads them.

use chrono::{DateTime, Utc};

/// Outcome of one test (one spec run under one project).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Passed,
    Failed,
    Flaky,
    Skipped,
}

impl TestStatus {
    /// Map a raw Playwright status. Statuses other than `expected`,
    /// `unexpected`, `flaky` and `skipped` have no outcome.
    pub fn from_raw(status: &str) -> Option<Self> {
        match status {
            "expected" => Some(TestStatus::Passed),
            "unexpected" => Some(TestStatus::Failed),
            "flaky" => Some(TestStatus::Flaky),
            "skipped" => Some(TestStatus::Skipped),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Flaky => "flaky",
            TestStatus::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suite node; `specs` holds every spec below it, descendants first.
#[derive(Debug, Clone)]
pub struct SuiteSummary {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub path: Vec<String>,
    pub title: String,
    /// Nesting depth, 0 for file-level suites.
    pub level: usize,
    pub root: bool,
    pub specs: Vec<SpecSummary>,
}

#[derive(Debug, Clone)]
pub struct SpecSummary {
    pub ok: bool,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub path: Vec<String>,
    pub title: String,
    pub tests: Vec<TestSummary>,
}

#[derive(Debug, Clone)]
pub struct TestSummary {
    /// `None` when the raw status is not one we classify.
    pub status: Option<TestStatus>,
    pub file: String,
    pub line: u32,
    pub column: u32,
    /// Project name followed by the suite ancestry and spec title.
    pub path: Vec<String>,
    pub title: String,
    pub results: Vec<TestResultSummary>,
}

impl TestSummary {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == Some(TestStatus::Passed)
    }

    #[must_use]
    pub fn failed(&self) -> bool {
        self.status == Some(TestStatus::Failed)
    }

    #[must_use]
    pub fn flaky(&self) -> bool {
        self.status == Some(TestStatus::Flaky)
    }

    #[must_use]
    pub fn skipped(&self) -> bool {
        self.status == Some(TestStatus::Skipped)
    }
}

/// One attempt of a test.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResultSummary {
    /// Milliseconds.
    pub duration: f64,
    pub started: DateTime<Utc>,
}

/// Everything the renderer needs to know about a run.
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub version: String,
    pub started: DateTime<Utc>,
    /// Total wall time in milliseconds, 0 when unknown.
    pub duration: f64,
    pub workers: u64,
    pub shards: u64,
    pub projects: Vec<String>,
    pub files: Vec<String>,
    /// Root (file-level) suites only.
    pub suites: Vec<SuiteSummary>,
    pub specs: Vec<SpecSummary>,
    pub tests: Vec<TestSummary>,
    pub failed: Vec<TestSummary>,
    pub passed: Vec<TestSummary>,
    pub flaky: Vec<TestSummary>,
    pub skipped: Vec<TestSummary>,
    pub results: Vec<TestResultSummary>,
}

impl ReportSummary {
    /// Tests with the given outcome.
    #[must_use]
    pub fn with_status(&self, status: TestStatus) -> &[TestSummary] {
        match status {
            TestStatus::Passed => &self.passed,
            TestStatus::Failed => &self.failed,
            TestStatus::Flaky => &self.flaky,
            TestStatus::Skipped => &self.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_raw() {
        assert_eq!(TestStatus::from_raw("expected"), Some(TestStatus::Passed));
        assert_eq!(TestStatus::from_raw("unexpected"), Some(TestStatus::Failed));
        assert_eq!(TestStatus::from_raw("flaky"), Some(TestStatus::Flaky));
        assert_eq!(TestStatus::from_raw("skipped"), Some(TestStatus::Skipped));
        assert_eq!(TestStatus::from_raw("interrupted"), None);
    }

    #[test]
    fn test_status_flags_are_exclusive() {
        let test = TestSummary {
            status: Some(TestStatus::Flaky),
            file: "a.spec.ts".to_string(),
            line: 1,
            column: 1,
            path: vec![],
            title: String::new(),
            results: vec![],
        };
        assert!(test.flaky());
        assert!(!test.passed() && !test.failed() && !test.skipped());

        let unknown = TestSummary { status: None, ..test };
        assert!(!unknown.passed() && !unknown.failed() && !unknown.flaky() && !unknown.skipped());
    }
}
