//! Markdown rendering of a parsed [`ReportSummary`].

use crate::formatting::{
    format_duration, pluralize, render_accordion, render_code_block, upper_case_first,
};
use crate::icons::{render_icon, IconStyle};
use crate::model::{ReportSummary, TestStatus, TestSummary};

/// Heading used when no title is configured.
pub const DEFAULT_TITLE: &str = "Playwright test results";

/// Statuses that get a collapsible list of tests, in display order.
const LISTED_STATUSES: [TestStatus; 3] = [TestStatus::Failed, TestStatus::Flaky, TestStatus::Skipped];

/// Presentation options. Empty strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub commit: Option<String>,
    pub commit_url: Option<String>,
    pub message: Option<String>,
    pub title: Option<String>,
    pub custom_info: Option<String>,
    pub report_url: Option<String>,
    pub icon_style: IconStyle,
    /// Prefix of the command printed to re-run failed and flaky tests.
    pub test_command: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Link to a commit on the hosting platform, if the repository url is known.
#[must_use]
pub fn commit_url(repo_url: Option<&str>, sha: &str) -> Option<String> {
    repo_url
        .filter(|url| !url.is_empty())
        .map(|url| format!("{url}/commit/{sha}"))
}

/// Render the summary as a Markdown document. The output depends only on the
/// arguments.
#[must_use]
pub fn render_report_summary(report: &ReportSummary, options: &RenderOptions) -> String {
    let icon = |status: &str| render_icon(status, options.icon_style);
    let mut paragraphs: Vec<String> = Vec::new();

    let title = non_empty(&options.title).unwrap_or(DEFAULT_TITLE);
    paragraphs.push(format!("### {title}"));

    // Counts by outcome
    let counts = [
        (TestStatus::Failed, ""),
        (TestStatus::Passed, "  "),
        (TestStatus::Flaky, "  "),
        (TestStatus::Skipped, ""),
    ];
    let tests: Vec<String> = counts
        .iter()
        .filter(|(status, _)| !report.with_status(*status).is_empty())
        .map(|(status, trailer)| {
            let count = report.with_status(*status).len();
            format!("{}  **{count} {status}**{trailer}", icon(status.as_str()))
        })
        .collect();
    paragraphs.push(tests.join("  \n"));

    // Run details
    paragraphs.push("#### Details".to_string());

    let mut stats: Vec<String> = Vec::new();
    if let Some(url) = non_empty(&options.report_url) {
        stats.push(format!("{}  [Open report ↗︎]({url})", icon("report")));
    }
    let test_count = report.tests.len();
    let suite_count = report.suites.len();
    stats.push(format!(
        "{}  {test_count} {} across {suite_count} {}",
        icon("stats"),
        pluralize("test", test_count as f64),
        pluralize("suite", suite_count as f64),
    ));
    let duration = if report.duration != 0.0 {
        format_duration(report.duration)
    } else {
        "unknown".to_string()
    };
    stats.push(format!("{}  {duration}", icon("duration")));
    if let Some(commit) = render_commit(options) {
        stats.push(format!("{}  {commit}", icon("commit")));
    }
    if let Some(info) = non_empty(&options.custom_info) {
        stats.push(format!("{}  {info}", icon("info")));
    }
    paragraphs.push(stats.join("  \n"));

    // Failed, flaky and skipped tests
    let details: Vec<String> = LISTED_STATUSES
        .iter()
        .filter_map(|&status| {
            let tests = report.with_status(status);
            if tests.is_empty() {
                return None;
            }
            let summary = format!("{} tests", upper_case_first(status.as_str()));
            let test_command = match status {
                TestStatus::Skipped => None,
                _ => non_empty(&options.test_command),
            };
            let content = render_test_list(tests, test_command);
            let open = status == TestStatus::Failed;
            Some(render_accordion(&summary, &content, open).trim().to_string())
        })
        .collect();
    paragraphs.push(details.join("\n"));

    paragraphs
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `message (hash)`, `hash` or their linked variants; `None` without a commit.
fn render_commit(options: &RenderOptions) -> Option<String> {
    let commit = non_empty(&options.commit)?;
    let short: String = commit.chars().take(7).collect();
    let commit_text = match non_empty(&options.commit_url) {
        Some(url) => format!("[{short}]({url})"),
        None => short,
    };
    Some(match non_empty(&options.message) {
        Some(message) => format!("{message} ({commit_text})"),
        None => commit_text,
    })
}

fn render_test_list(tests: &[TestSummary], test_command: Option<&str>) -> String {
    let list = tests
        .iter()
        .map(|test| format!("  {}", test.title))
        .collect::<Vec<_>>()
        .join("\n");
    let Some(test_command) = test_command else {
        return list;
    };

    let test_ids = tests
        .iter()
        .map(|test| format!("{}:{}", test.file, test.line))
        .collect::<Vec<_>>()
        .join(" ");
    let command = format!("{test_command} {test_ids}");
    format!("{list}\n\n{}", render_code_block(&command, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn test(status: TestStatus, title: &str, line: u32) -> TestSummary {
        TestSummary {
            status: Some(status),
            file: "app.spec.ts".to_string(),
            line,
            column: 1,
            path: vec![title.to_string()],
            title: title.to_string(),
            results: vec![],
        }
    }

    fn summary(tests: Vec<TestSummary>, duration: f64) -> ReportSummary {
        let of = |status: TestStatus| -> Vec<TestSummary> {
            tests.iter().filter(|t| t.status == Some(status)).cloned().collect()
        };
        ReportSummary {
            version: "1.40.0".to_string(),
            started: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            duration,
            workers: 1,
            shards: 0,
            projects: vec!["chromium".to_string()],
            files: vec![],
            suites: vec![],
            specs: vec![],
            failed: of(TestStatus::Failed),
            passed: of(TestStatus::Passed),
            flaky: of(TestStatus::Flaky),
            skipped: of(TestStatus::Skipped),
            results: vec![],
            tests,
        }
    }

    fn emoji_options() -> RenderOptions {
        RenderOptions {
            icon_style: IconStyle::Emojis,
            ..Default::default()
        }
    }

    #[test]
    fn test_render_full_document() {
        let report = summary(
            vec![
                test(TestStatus::Failed, "chromium › a › breaks", 3),
                test(TestStatus::Passed, "chromium › a › works", 8),
                test(TestStatus::Flaky, "chromium › a › wobbles", 12),
                test(TestStatus::Skipped, "chromium › a › later", 20),
            ],
            330000.0,
        );
        let options = RenderOptions {
            title: Some("Results".to_string()),
            test_command: Some("npx playwright test".to_string()),
            ..emoji_options()
        };

        let expected = "\
### Results

❌  **1 failed**  \n✅  **1 passed**    \n⚠️  **1 flaky**    \n⏭️  **1 skipped**

#### Details

4 tests across 0 suites  \n  5 minutes, 30 seconds

<details open><summary><strong>Failed tests</strong></summary>

chromium › a › breaks

```
npx playwright test app.spec.ts:3
```

</details>
<details ><summary><strong>Flaky tests</strong></summary>

chromium › a › wobbles

```
npx playwright test app.spec.ts:12
```

</details>
<details ><summary><strong>Skipped tests</strong></summary>

chromium › a › later

</details>";
        assert_eq!(render_report_summary(&report, &options), expected);
    }

    #[test]
    fn test_render_default_title_and_unknown_duration() {
        let out = render_report_summary(&summary(vec![], 0.0), &emoji_options());
        assert!(out.starts_with("### Playwright test results\n\n#### Details"));
        assert!(out.contains("0 tests across 0 suites"));
        assert!(out.ends_with("unknown"));
    }

    #[test]
    fn test_render_singular_nouns() {
        let out = render_report_summary(
            &summary(vec![test(TestStatus::Passed, "x", 1)], 1000.0),
            &emoji_options(),
        );
        assert!(out.contains("1 test across 0 suites"));
        assert!(out.contains("1 second"));
    }

    #[test]
    fn test_render_commit_variants() {
        let report = summary(vec![], 1000.0);
        let render = |url: Option<&str>, message: Option<&str>| {
            let options = RenderOptions {
                commit: Some("1234567890abcdef".to_string()),
                commit_url: url.map(str::to_string),
                message: message.map(str::to_string),
                ..emoji_options()
            };
            render_report_summary(&report, &options)
        };

        assert!(render(None, None).ends_with("  1234567"));
        assert!(render(Some("https://x/c"), None).ends_with("  [1234567](https://x/c)"));
        assert!(render(None, Some("Fix it")).ends_with("  Fix it (1234567)"));
        assert!(render(Some("https://x/c"), Some("Fix it")).ends_with("  Fix it ([1234567](https://x/c))"));
    }

    #[test]
    fn test_render_octicons_and_links() {
        let options = RenderOptions {
            report_url: Some("https://example.com/report".to_string()),
            custom_info: Some("See docs".to_string()),
            ..Default::default()
        };
        let out = render_report_summary(&summary(vec![test(TestStatus::Failed, "x", 1)], 500.0), &options);
        assert!(out.contains(
            "![failed](https://icongr.am/octicons/stop.svg?size=14&color=da3633)  **1 failed**"
        ));
        assert!(out.contains(
            "![report](https://icongr.am/octicons/package.svg?size=14&color=abb4bf)  [Open report ↗︎](https://example.com/report)"
        ));
        assert!(out.contains("![info](https://icongr.am/octicons/info.svg?size=14&color=abb4bf)  See docs"));
        assert!(!out.contains("```"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let report = summary(vec![test(TestStatus::Flaky, "x", 1)], 2500.0);
        let options = RenderOptions::default();
        assert_eq!(
            render_report_summary(&report, &options),
            render_report_summary(&report, &options)
        );
    }

    #[test]
    fn test_commit_url() {
        assert_eq!(
            commit_url(Some("https://github.com/o/r"), "abc").as_deref(),
            Some("https://github.com/o/r/commit/abc")
        );
        assert_eq!(commit_url(None, "abc"), None);
        assert_eq!(commit_url(Some(""), "abc"), None);
    }
}
