use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::{Repo, Subject};

/// Raised when the triggering event is not about an issue, pull request or
/// discussion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("this routine only supports issues, pull requests, or discussions")]
pub struct UnsupportedSubject;

#[derive(Debug, Deserialize)]
struct NumberRef {
    number: u64,
}

/// The subset of a webhook event payload needed to find the subject.
#[derive(Debug, Default, Deserialize)]
struct EventPayload {
    #[serde(default)]
    issue: Option<NumberRef>,
    #[serde(default)]
    pull_request: Option<NumberRef>,
    #[serde(default)]
    discussion: Option<NumberRef>,
}

/// What the workflow run was triggered on.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    pub repo: Repo,
    pub issue: Option<u64>,
    pub pull_request: Option<u64>,
    pub discussion: Option<u64>,
}

impl RunContext {
    pub fn new(repo: Repo) -> Self {
        Self {
            repo,
            issue: None,
            pull_request: None,
            discussion: None,
        }
    }

    /// Builds a context from a webhook payload JSON document.
    pub fn from_payload_str(repo: Repo, payload: &str) -> Result<Self> {
        let payload: EventPayload =
            serde_json::from_str(payload).context("Failed to parse event payload")?;

        Ok(Self {
            repo,
            issue: payload.issue.map(|i| i.number),
            pull_request: payload.pull_request.map(|p| p.number),
            discussion: payload.discussion.map(|d| d.number),
        })
    }

    /// Builds a context from the payload file the runner writes to
    /// `GITHUB_EVENT_PATH`.
    pub fn from_event_file(repo: Repo, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload '{}'", path.display()))?;
        Self::from_payload_str(repo, &text)
            .with_context(|| format!("Invalid event payload in '{}'", path.display()))
    }

    /// Picks the subject to operate on. An issue wins over a pull request,
    /// which wins over a discussion.
    pub fn resolve_subject(&self) -> Result<Subject, UnsupportedSubject> {
        if let Some(number) = self.issue {
            Ok(Subject::issue(number))
        } else if let Some(number) = self.pull_request {
            Ok(Subject::issue(number))
        } else if let Some(number) = self.discussion {
            Ok(Subject::discussion(number))
        } else {
            Err(UnsupportedSubject)
        }
    }
}
