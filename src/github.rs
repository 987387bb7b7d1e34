//! GitHub API helpers for posting the test summary on pull requests.

use std::path::Path;

use anyhow::{anyhow, bail, Context as _, Result};
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_SERVER_URL: &str = "https://github.com";
const DEFAULT_API_URL: &str = "https://api.github.com";

/// Events that can trigger a run.
pub const SUPPORTED_EVENTS: [&str; 3] = ["push", "pull_request", "pull_request_target"];

/// A branch ref and commit of one side of a push or pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitRef {
    pub ref_name: Option<String>,
    pub sha: Option<String>,
}

/// The workflow event that triggered this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub base: GitRef,
    pub head: GitRef,
    /// Set for pull request events only.
    pub pull_number: Option<u64>,
}

impl Event {
    pub fn is_pull_request(&self) -> bool {
        self.pull_number.is_some()
    }
}

fn string_at(payload: &Value, pointer: &str) -> Option<String> {
    payload.pointer(pointer)?.as_str().map(str::to_string)
}

/// Read base/head refs (and the PR number) out of an event payload.
pub fn resolve_event(event_name: &str, payload: &Value) -> Result<Event> {
    match event_name {
        "push" => Ok(Event {
            name: event_name.to_string(),
            base: GitRef {
                ref_name: string_at(payload, "/ref"),
                sha: string_at(payload, "/before"),
            },
            head: GitRef {
                ref_name: string_at(payload, "/ref"),
                sha: string_at(payload, "/after"),
            },
            pull_number: None,
        }),
        "pull_request" | "pull_request_target" => {
            let pull_number = payload
                .pointer("/pull_request/number")
                .or_else(|| payload.pointer("/number"))
                .and_then(Value::as_u64)
                .context("event payload has no pull request number")?;
            Ok(Event {
                name: event_name.to_string(),
                base: GitRef {
                    ref_name: string_at(payload, "/pull_request/base/ref"),
                    sha: string_at(payload, "/pull_request/base/sha"),
                },
                head: GitRef {
                    ref_name: string_at(payload, "/pull_request/head/ref"),
                    sha: string_at(payload, "/pull_request/head/sha"),
                },
                pull_number: Some(pull_number),
            })
        }
        _ => bail!(
            "Unsupported event type: {}. Only \"pull_request\", \"pull_request_target\", and \"push\" triggered workflows are currently supported.",
            event_name
        ),
    }
}

/// Resolved GitHub Actions context, read from environment variables.
#[derive(Debug, Clone)]
pub struct Context {
    pub event: Event,
    /// `owner/name`.
    pub repo: String,
    pub workflow: Option<String>,
    pub server_url: String,
    pub api_url: String,
}

impl Context {
    /// Build a context from the standard runner variables (`GITHUB_EVENT_NAME`,
    /// `GITHUB_EVENT_PATH`, `GITHUB_REPOSITORY`, `GITHUB_WORKFLOW`,
    /// `GITHUB_SERVER_URL`, `GITHUB_API_URL`).
    pub fn from_env() -> Result<Self> {
        let event_name = std::env::var("GITHUB_EVENT_NAME")
            .context("GITHUB_EVENT_NAME environment variable is required")?;
        let payload = match std::env::var("GITHUB_EVENT_PATH") {
            Ok(path) => read_event_payload(Path::new(&path))?,
            Err(_) => Value::Null,
        };
        let repo = std::env::var("GITHUB_REPOSITORY")
            .context("GITHUB_REPOSITORY environment variable is required")?;
        Ok(Self {
            event: resolve_event(&event_name, &payload)?,
            repo,
            workflow: std::env::var("GITHUB_WORKFLOW").ok(),
            server_url: std::env::var("GITHUB_SERVER_URL")
                .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
            api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        })
    }

    /// Web url of the repository, e.g. `https://github.com/owner/name`.
    pub fn repo_url(&self) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), self.repo)
    }
}

fn read_event_payload(path: &Path) -> Result<Value> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event payload {}", path.display()))?;
    serde_json::from_str(&data).context("Failed to parse event payload JSON")
}

// ---------------------------------------------------------------------------
// Comments API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub body: Option<String>,
}

/// The subset of the issues/pulls API needed to keep one comment per PR.
pub trait CommentApi {
    /// All comments on the issue or pull request, oldest first.
    fn list_comments(&self, issue_number: u64) -> Result<Vec<Comment>>;

    fn update_comment(&self, comment_id: u64, body: &str) -> Result<Comment>;

    fn create_comment(&self, issue_number: u64, body: &str) -> Result<Comment>;

    /// Submit a review with event `COMMENT`.
    fn create_review(&self, pull_number: u64, body: &str) -> Result<()>;
}

/// REST client for a single repository.
pub struct GitHubClient {
    token: String,
    repo: String,
    api_url: String,
}

impl GitHubClient {
    pub fn new(token: &str, repo: &str, api_url: &str) -> Self {
        Self {
            token: token.to_string(),
            repo: repo.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}/repos/{}/{}", self.api_url, self.repo, path);
        ureq::request(method, &url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", "pwsummary")
            .set("X-GitHub-Api-Version", "2022-11-28")
    }
}

/// Turn a ureq error into a readable message, including the API's response
/// body for HTTP errors.
fn api_error(action: &str, err: ureq::Error) -> anyhow::Error {
    match err {
        ureq::Error::Status(code, resp) => {
            let body = resp.into_string().unwrap_or_default();
            anyhow!("GitHub API error {} (HTTP {}): {}", action, code, body)
        }
        e => anyhow!("Failed {}: {}", action, e),
    }
}

impl CommentApi for GitHubClient {
    fn list_comments(&self, issue_number: u64) -> Result<Vec<Comment>> {
        let mut all = Vec::new();
        let mut page = 1u32;
        loop {
            let resp = self
                .request(
                    "GET",
                    &format!("issues/{}/comments?per_page=100&page={}", issue_number, page),
                )
                .call()
                .map_err(|e| api_error("listing comments", e))?;
            let comments: Vec<Comment> =
                resp.into_json().context("Failed to parse comments JSON")?;
            if comments.is_empty() {
                break;
            }
            all.extend(comments);
            page += 1;
        }
        Ok(all)
    }

    fn update_comment(&self, comment_id: u64, body: &str) -> Result<Comment> {
        let resp = self
            .request("PATCH", &format!("issues/comments/{}", comment_id))
            .send_json(serde_json::json!({ "body": body }))
            .map_err(|e| api_error("updating comment", e))?;
        resp.into_json().context("Failed to parse comment JSON")
    }

    fn create_comment(&self, issue_number: u64, body: &str) -> Result<Comment> {
        let resp = self
            .request("POST", &format!("issues/{}/comments", issue_number))
            .send_json(serde_json::json!({ "body": body }))
            .map_err(|e| api_error("creating comment", e))?;
        resp.into_json().context("Failed to parse comment JSON")
    }

    fn create_review(&self, pull_number: u64, body: &str) -> Result<()> {
        self.request("POST", &format!("pulls/{}/reviews", pull_number))
            .send_json(serde_json::json!({ "body": body, "event": "COMMENT" }))
            .map_err(|e| api_error("creating review", e))?;
        Ok(())
    }
}
