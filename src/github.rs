use std::process::Command;

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;

use crate::types::{Forge, Reaction};

/// Reactions are read from a single page of this size.
const REACTIONS_PER_PAGE: u8 = 100;

pub fn get_github_token() -> Result<String> {
    // Prefer environment variables over gh CLI to avoid subprocess overhead.
    if let Ok(token) = std::env::var("GITHUB_TOKEN")
        && !token.is_empty()
    {
        return Ok(token);
    }

    if let Ok(token) = std::env::var("GH_TOKEN")
        && !token.is_empty()
    {
        return Ok(token);
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .context("No GITHUB_TOKEN or GH_TOKEN set and the gh CLI could not be run")?;

    if !output.status.success() {
        anyhow::bail!("Failed to get GitHub token from gh CLI. Please run 'gh auth login' first");
    }

    let token = String::from_utf8(output.stdout)?.trim().to_string();

    if token.is_empty() {
        anyhow::bail!("Empty token returned from gh CLI");
    }

    Ok(token)
}

/// Creates an authenticated GitHub client.
///
/// `api_url` points the client at a GitHub Enterprise Server API root; when
/// absent the public API is used.
pub fn setup_github_client(token: Option<String>, api_url: Option<&str>) -> Result<Octocrab> {
    let token = match token.filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => get_github_token().context("Failed to obtain GitHub authentication token")?,
    };

    let mut builder = Octocrab::builder().personal_token(token);
    if let Some(api_url) = api_url.filter(|u| !u.is_empty()) {
        builder = builder
            .base_uri(api_url)
            .with_context(|| format!("Invalid GitHub API URL: '{}'", api_url))?;
    }

    builder.build().context("Failed to create GitHub client")
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
}

#[derive(Serialize)]
struct CommentParams<'a> {
    body: &'a str,
}

/// [`Forge`] backed by the GitHub REST API.
pub struct GitHub {
    client: Octocrab,
}

impl GitHub {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    async fn list_reactions(&self, route: String) -> Result<Vec<Reaction>> {
        tracing::debug!("GET {}", route);
        let params = PageParams {
            per_page: REACTIONS_PER_PAGE,
        };
        self.client
            .get(&route, Some(&params))
            .await
            .with_context(|| format!("Failed to list reactions from {}", route))
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn list_issue_reactions(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
    ) -> Result<Vec<Reaction>> {
        self.list_reactions(format!(
            "/repos/{}/{}/issues/{}/reactions",
            owner, repo, issue_number
        ))
        .await
    }

    async fn list_discussion_reactions(
        &self,
        owner: &str,
        repo: &str,
        discussion_number: u64,
    ) -> Result<Vec<Reaction>> {
        self.list_reactions(format!(
            "/repos/{}/{}/discussions/{}/reactions",
            owner, repo, discussion_number
        ))
        .await
    }

    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<()> {
        tracing::debug!("Creating comment on {}/{}#{}", owner, repo, issue_number);
        self.client
            .issues(owner, repo)
            .create_comment(issue_number, body)
            .await
            .with_context(|| {
                format!(
                    "Failed to comment on issue {}/{}#{}",
                    owner, repo, issue_number
                )
            })?;
        Ok(())
    }

    async fn create_team_discussion_comment(
        &self,
        org: &str,
        team_slug: &str,
        discussion_number: u64,
        body: &str,
    ) -> Result<()> {
        let route = format!(
            "/orgs/{}/teams/{}/discussions/{}/comments",
            org, team_slug, discussion_number
        );
        tracing::debug!("POST {}", route);
        let _: serde_json::Value = self
            .client
            .post(&route, Some(&CommentParams { body }))
            .await
            .with_context(|| format!("Failed to comment on discussion via {}", route))?;
        Ok(())
    }
}
