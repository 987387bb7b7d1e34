//! Command handler functions for the pwsummary CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::formatting::{format_duration, render_markdown_table};
use crate::github::{Context, GitHubClient};
use crate::input::load_report;
use crate::model::{ReportSummary, TestStatus};
use crate::publish::{self, Inputs};
use crate::render::{render_report_summary, RenderOptions};

/// Render the Markdown summary of a report file.
pub fn cmd_render(report_file: &Path, options: &RenderOptions) -> Result<String> {
    let report = load_report(report_file, &report_file.display().to_string())?;
    let mut out = render_report_summary(&report, options);
    out.push('\n');
    Ok(out)
}

/// Print run metadata and outcome counts as a Markdown table.
pub fn cmd_stats(report_file: &Path) -> Result<String> {
    let report = load_report(report_file, &report_file.display().to_string())?;
    let mut out = stats_table(&report);
    out.push('\n');
    Ok(out)
}

fn stats_table(report: &ReportSummary) -> String {
    let duration = if report.duration != 0.0 {
        format_duration(report.duration)
    } else {
        "unknown".to_string()
    };
    let mut rows = vec![
        vec!["Version".to_string(), report.version.clone()],
        vec!["Started".to_string(), report.started.to_rfc3339()],
        vec!["Duration".to_string(), duration],
        vec!["Workers".to_string(), report.workers.to_string()],
        vec!["Shards".to_string(), report.shards.to_string()],
        vec!["Projects".to_string(), report.projects.join(", ")],
        vec!["Files".to_string(), report.files.len().to_string()],
        vec!["Specs".to_string(), report.specs.len().to_string()],
        vec!["Tests".to_string(), report.tests.len().to_string()],
    ];
    for status in [
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Flaky,
        TestStatus::Skipped,
    ] {
        let label = crate::formatting::upper_case_first(status.as_str());
        rows.push(vec![label, report.with_status(status).len().to_string()]);
    }
    rows.push(vec!["Attempts".to_string(), report.results.len().to_string()]);

    render_markdown_table(&rows, &["Stat".to_string(), "Value".to_string()])
}

/// Post (or update) the summary comment for the current workflow run.
pub fn cmd_comment(inputs: &Inputs, token: &str) -> Result<String> {
    let ctx = Context::from_env().context("Failed to resolve GitHub context")?;
    let client = GitHubClient::new(token, &ctx.repo, &ctx.api_url);

    let outcome = publish::run(inputs, &ctx, &client)?;
    publish::warn_if_uncommented(&outcome);

    if let Ok(path) = std::env::var("GITHUB_OUTPUT") {
        publish::write_outputs(Path::new(&path), &outcome)?;
    }

    Ok(match outcome.comment_id {
        Some(id) => format!("Posted test summary as comment #{id}\n"),
        None => "Test summary was not posted as a comment\n".to_string(),
    })
}
