use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Errors produced when building a [`Repo`] from user input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepoError {
    #[error("repository owner must not be empty")]
    EmptyOwner,
    #[error("repository name must not be empty")]
    EmptyName,
    #[error("repository component '{0}' must not contain '/'")]
    InvalidComponent(String),
    #[error("repository must be in format 'owner/repo', got: '{0}'")]
    InvalidFormat(String),
}

/// A GitHub repository coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let owner = owner.into();
        let name = name.into();

        if owner.trim().is_empty() {
            return Err(RepoError::EmptyOwner);
        }
        if name.trim().is_empty() {
            return Err(RepoError::EmptyName);
        }
        for part in [&owner, &name] {
            if part.contains('/') {
                return Err(RepoError::InvalidComponent(part.clone()));
            }
        }

        Ok(Self { owner, name })
    }

    /// Parses the `owner/repo` form used by `GITHUB_REPOSITORY`.
    pub fn parse(s: &str) -> Result<Self, RepoError> {
        match s.trim().split_once('/') {
            Some((owner, name)) if !name.contains('/') => Self::new(owner, name),
            _ => Err(RepoError::InvalidFormat(s.to_string())),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The user who left a reaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReactionUser {
    pub login: String,
}

/// A single reaction record as returned by the reactions API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reaction {
    pub content: String,
    pub user: ReactionUser,
}

impl Reaction {
    pub fn new(content: impl Into<String>, login: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            user: ReactionUser {
                login: login.into(),
            },
        }
    }
}

/// Which family of endpoints a subject is read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    /// Issues and pull requests share the issue endpoints.
    IssueOrPullRequest,
    Discussion,
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectKind::IssueOrPullRequest => write!(f, "issue"),
            SubjectKind::Discussion => write!(f, "discussion"),
        }
    }
}

/// The resolved thing being reacted to.
///
/// A subject is resolved once per run and then used for both the read and
/// the write, so the two always target the same family of endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub kind: SubjectKind,
    pub number: u64,
}

impl Subject {
    pub const fn issue(number: u64) -> Self {
        Self {
            kind: SubjectKind::IssueOrPullRequest,
            number,
        }
    }

    pub const fn discussion(number: u64) -> Self {
        Self {
            kind: SubjectKind::Discussion,
            number,
        }
    }

    pub async fn fetch_reactions<F>(&self, forge: &F, repo: &Repo) -> Result<Vec<Reaction>>
    where
        F: Forge + Sync + ?Sized,
    {
        match self.kind {
            SubjectKind::IssueOrPullRequest => {
                forge
                    .list_issue_reactions(repo.owner(), repo.name(), self.number)
                    .await
            }
            SubjectKind::Discussion => {
                forge
                    .list_discussion_reactions(repo.owner(), repo.name(), self.number)
                    .await
            }
        }
    }

    /// Posts `body` on the subject.
    ///
    /// Discussion comments go through the org team discussion endpoint with
    /// the repository owner as the org and the repository name as the team
    /// slug.
    pub async fn post_comment<F>(&self, forge: &F, repo: &Repo, body: &str) -> Result<()>
    where
        F: Forge + Sync + ?Sized,
    {
        match self.kind {
            SubjectKind::IssueOrPullRequest => {
                forge
                    .create_issue_comment(repo.owner(), repo.name(), self.number, body)
                    .await
            }
            SubjectKind::Discussion => {
                forge
                    .create_team_discussion_comment(repo.owner(), repo.name(), self.number, body)
                    .await
            }
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.number)
    }
}

/// Abstraction over the remote API so the tagging flow can run against a
/// mock in tests.
#[async_trait]
pub trait Forge {
    async fn list_issue_reactions(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
    ) -> Result<Vec<Reaction>>;

    async fn list_discussion_reactions(
        &self,
        owner: &str,
        repo: &str,
        discussion_number: u64,
    ) -> Result<Vec<Reaction>>;

    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<()>;

    async fn create_team_discussion_comment(
        &self,
        org: &str,
        team_slug: &str,
        discussion_number: u64,
        body: &str,
    ) -> Result<()>;
}
