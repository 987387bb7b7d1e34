//! Posting the rendered summary as a single, updatable pull request comment.
//!
//! The comment is found again on later runs by a hidden HTML marker at the
//! top of its body. Failures of individual API calls are logged and fall
//! through to the next strategy (update → create → review).

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use log::{debug, error, info, warn};

use crate::github::{CommentApi, Context};
use crate::icons::IconStyle;
use crate::input::load_report;
use crate::render::{commit_url, render_report_summary, RenderOptions};

/// Identifies our comments among everything else posted on a PR.
pub const COMMENT_TOOL_ID: &str = "pwsummary";

const FORK_WARNING_TITLE: &str = "Unable to comment on PR";
const FORK_WARNING_INTRO: &str = "Unable to comment on your PR. This can happen for PRs originating from a fork without write permissions. You can copy the test results directly into a comment using the markdown summary below:";

/// User-facing inputs of the `comment` command.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub report_file: PathBuf,
    pub report_url: Option<String>,
    /// Defaults to the workflow name.
    pub report_tag: Option<String>,
    pub comment_title: Option<String>,
    pub icon_style: IconStyle,
    pub custom_info: Option<String>,
    pub test_command: Option<String>,
}

/// What a publish run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The rendered Markdown summary, without marker.
    pub summary: String,
    /// The full comment body, marker included.
    pub body: String,
    pub comment_id: Option<u64>,
}

#[must_use]
pub fn comment_marker(tag: &str) -> String {
    format!("<!-- {COMMENT_TOOL_ID} -- {tag} -->")
}

#[must_use]
pub fn comment_body(marker: &str, summary: &str) -> String {
    format!("{marker}\n\n{summary}")
}

/// Parse and render the report, then reconcile the PR comment.
///
/// Only a missing or unreadable report is an error; API failures are logged.
pub fn run(inputs: &Inputs, ctx: &Context, api: &dyn CommentApi) -> Result<Outcome> {
    let tag = inputs
        .report_tag
        .clone()
        .filter(|t| !t.is_empty())
        .or_else(|| ctx.workflow.clone())
        .unwrap_or_default();

    debug!("Report file: {}", inputs.report_file.display());
    debug!("Report url: {}", inputs.report_url.as_deref().unwrap_or("(none)"));
    debug!("Report tag: {}", if tag.is_empty() { "(none)" } else { tag.as_str() });
    debug!(
        "Comment title: {}",
        inputs.comment_title.as_deref().unwrap_or("(default)")
    );

    let event = &ctx.event;
    match event.pull_number {
        Some(number) => info!(
            "PR #{} targeting {} ({})",
            number,
            event.base.ref_name.as_deref().unwrap_or("?"),
            event.head.sha.as_deref().unwrap_or("?")
        ),
        None => info!(
            "Commit pushed onto {} ({})",
            event.base.ref_name.as_deref().unwrap_or("?"),
            event.head.sha.as_deref().unwrap_or("?")
        ),
    }

    let display_name = inputs.report_file.display().to_string();
    let report = load_report(&inputs.report_file, &display_name)?;

    let commit = event.head.sha.clone();
    let options = RenderOptions {
        commit_url: commit
            .as_deref()
            .and_then(|sha| commit_url(Some(ctx.repo_url().as_str()), sha)),
        commit,
        message: None,
        title: inputs.comment_title.clone(),
        custom_info: inputs.custom_info.clone(),
        report_url: inputs.report_url.clone(),
        icon_style: inputs.icon_style,
        test_command: inputs.test_command.clone(),
    };
    let summary = render_report_summary(&report, &options);

    let marker = comment_marker(&tag);
    let body = comment_body(&marker, &summary);

    let comment_id = match event.pull_number {
        Some(number) => publish_comment(api, number, &marker, &body),
        None => {
            info!("No PR associated with this action run. Not posting a check or comment.");
            None
        }
    };

    Ok(Outcome {
        summary,
        body,
        comment_id,
    })
}

/// Update the last comment carrying `marker`, or create a new one, falling
/// back to a review comment. Returns the id of the issue comment, if any.
pub fn publish_comment(
    api: &dyn CommentApi,
    pull_number: u64,
    marker: &str,
    body: &str,
) -> Option<u64> {
    info!("Commenting test report on PR #{}", pull_number);

    let mut comment_id = match api.list_comments(pull_number) {
        Ok(comments) => comments
            .iter()
            .rev()
            .find(|c| c.body.as_deref().is_some_and(|b| b.contains(marker)))
            .map(|c| c.id),
        Err(e) => {
            error!("Error fetching existing comments: {e:#}");
            None
        }
    };

    if let Some(id) = comment_id {
        info!("Found previous comment #{}", id);
        match api.update_comment(id, body) {
            Ok(_) => info!("Updated previous comment #{}", id),
            Err(e) => {
                error!("Error updating previous comment: {e:#}");
                comment_id = None;
            }
        }
    }

    if comment_id.is_none() {
        info!("Creating new comment");
        match api.create_comment(pull_number, body) {
            Ok(comment) => {
                info!("Created new comment #{}", comment.id);
                comment_id = Some(comment.id);
            }
            Err(e) => {
                error!("Error creating comment: {e:#}");
                info!("Submitting PR review comment instead...");
                if let Err(e) = api.create_review(pull_number, body) {
                    error!("Error creating PR review: {e:#}");
                }
            }
        }
    }

    comment_id
}

/// Workflow command that shows `body` as a warning annotation, for when the
/// comment could not be posted.
#[must_use]
pub fn fork_warning(body: &str) -> String {
    let message = format!("{FORK_WARNING_INTRO}\n\n{body}");
    format!(
        "::warning title={}::{}",
        escape_property(FORK_WARNING_TITLE),
        escape_data(&message)
    )
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

/// Append the `summary` and `comment-id` step outputs to the `GITHUB_OUTPUT`
/// file.
pub fn write_outputs(path: &Path, outcome: &Outcome) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    let comment_id = outcome.comment_id.map(|id| id.to_string()).unwrap_or_default();
    for (name, value) in [("summary", outcome.summary.as_str()), ("comment-id", comment_id.as_str())] {
        file.write_all(format_output(name, value).as_bytes())
            .context("Failed to write step output")?;
    }
    Ok(())
}

/// One `name<<delimiter` block; the delimiter never occurs in `value`.
fn format_output(name: &str, value: &str) -> String {
    let mut delimiter = format!("ghadelimiter_{}", std::process::id());
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Log and print the fork fallback when nothing was posted.
pub fn warn_if_uncommented(outcome: &Outcome) {
    if outcome.comment_id.is_none() {
        warn!("{FORK_WARNING_TITLE}");
        println!("{}", fork_warning(&outcome.body));
    }
}
