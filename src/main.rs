use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use pwsummary::cli;
use pwsummary::icons::IconStyle;
use pwsummary::publish::Inputs;
use pwsummary::render::RenderOptions;

/// Summarize Playwright JSON reports and post them on pull requests.
#[derive(Parser)]
#[command(name = "pwsummary", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Presentation flags shared by every command that renders a summary.
#[derive(Args)]
struct SummaryArgs {
    /// Path to the Playwright JSON report.
    #[arg(long, env = "INPUT_REPORT-FILE")]
    report_file: PathBuf,

    /// Link to the full HTML report.
    #[arg(long, env = "INPUT_REPORT-URL")]
    report_url: Option<String>,

    /// Heading of the summary (default: "Playwright test results").
    #[arg(long, env = "INPUT_COMMENT-TITLE")]
    comment_title: Option<String>,

    /// Icon style: octicons or emojis.
    #[arg(long, env = "INPUT_ICON-STYLE")]
    icon_style: Option<String>,

    /// Extra line of text shown under the run details.
    #[arg(long, env = "INPUT_CUSTOM-INFO")]
    custom_info: Option<String>,

    /// Command prefix for re-running failed and flaky tests,
    /// e.g. "npx playwright test".
    #[arg(long, env = "INPUT_TEST-COMMAND")]
    test_command: Option<String>,
}

impl SummaryArgs {
    fn icon_style(&self) -> Result<IconStyle> {
        match self.icon_style.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => IconStyle::from_str(s, true).map_err(|e| anyhow!("Invalid icon style: {e}")),
            None => Ok(IconStyle::default()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Post the summary as a comment on the pull request that triggered the
    /// workflow, updating the previous one if present.
    Comment {
        #[command(flatten)]
        summary: SummaryArgs,

        /// Tag distinguishing comments of several reports on one PR
        /// (default: the workflow name).
        #[arg(long, env = "INPUT_REPORT-TAG")]
        report_tag: Option<String>,

        /// GitHub token (falls back to GITHUB_TOKEN).
        #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
        github_token: Option<String>,
    },

    /// Print the Markdown summary of a report.
    Render {
        #[command(flatten)]
        summary: SummaryArgs,

        /// Commit SHA to show in the details.
        #[arg(long)]
        commit: Option<String>,

        /// Link for the commit SHA.
        #[arg(long)]
        commit_url: Option<String>,

        /// Commit message shown next to the SHA.
        #[arg(long)]
        message: Option<String>,
    },

    /// Print run metadata and outcome counts as a Markdown table.
    Stats {
        /// Path to the Playwright JSON report.
        #[arg(long, env = "INPUT_REPORT-FILE")]
        report_file: PathBuf,
    },
}

fn init_logging() {
    let debug = std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Comment {
            summary,
            report_tag,
            github_token,
        } => {
            let token = github_token
                .filter(|t| !t.is_empty())
                .or_else(|| std::env::var("GITHUB_TOKEN").ok())
                .context("A GitHub token is required (--github-token or GITHUB_TOKEN)")?;
            let inputs = Inputs {
                icon_style: summary.icon_style()?,
                report_file: summary.report_file,
                report_url: summary.report_url,
                report_tag,
                comment_title: summary.comment_title,
                custom_info: summary.custom_info,
                test_command: summary.test_command,
            };
            cli::cmd_comment(&inputs, &token)?
        }
        Commands::Render {
            summary,
            commit,
            commit_url,
            message,
        } => {
            let options = RenderOptions {
                icon_style: summary.icon_style()?,
                commit,
                commit_url,
                message,
                title: summary.comment_title,
                custom_info: summary.custom_info,
                report_url: summary.report_url,
                test_command: summary.test_command,
            };
            cli::cmd_render(&summary.report_file, &options)?
        }
        Commands::Stats { report_file } => cli::cmd_stats(&report_file)?,
    };

    print!("{output}");
    Ok(())
}
