use anyhow::Result;

use crate::{
    compose::{create_comment_body, mentions},
    types::{Forge, Repo, Subject},
};

/// What to look for and what to say.
#[derive(Debug, Clone, PartialEq)]
pub struct TagRequest {
    pub emoji: String,
    pub message: Option<String>,
    /// Compose the comment but never post it.
    pub dry_run: bool,
}

impl TagRequest {
    pub fn new(emoji: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            message: None,
            dry_run: false,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of a single tagging run.
#[derive(Debug, Clone, PartialEq)]
pub enum TagOutcome {
    Posted { body: String, mentions: Vec<String> },
    DryRun { body: String, mentions: Vec<String> },
    NothingToPost,
}

impl TagOutcome {
    pub fn body(&self) -> Option<&str> {
        match self {
            TagOutcome::Posted { body, .. } | TagOutcome::DryRun { body, .. } => Some(body),
            TagOutcome::NothingToPost => None,
        }
    }

    pub fn mentions(&self) -> &[String] {
        match self {
            TagOutcome::Posted { mentions, .. } | TagOutcome::DryRun { mentions, .. } => mentions,
            TagOutcome::NothingToPost => &[],
        }
    }
}

/// Fetches the reactions on `subject`, and if anyone reacted with the
/// requested emoji, posts one comment mentioning them.
///
/// Remote errors are returned as-is; nothing is retried.
pub async fn tag_users_by_reaction<F>(
    forge: &F,
    repo: &Repo,
    subject: Subject,
    request: &TagRequest,
) -> Result<TagOutcome>
where
    F: Forge + Sync + ?Sized,
{
    let reactions = subject.fetch_reactions(forge, repo).await?;
    tracing::debug!(
        "Fetched {} reaction(s) on {} in {}",
        reactions.len(),
        subject,
        repo
    );

    let Some(body) = create_comment_body(&reactions, &request.emoji, request.message.as_deref())
    else {
        tracing::info!("No users reacted with {} on {}", request.emoji, subject);
        return Ok(TagOutcome::NothingToPost);
    };
    let mentions = mentions(&reactions, &request.emoji);

    if request.dry_run {
        tracing::info!(
            "Dry run: would tag {} user(s) on {}",
            mentions.len(),
            subject
        );
        return Ok(TagOutcome::DryRun { body, mentions });
    }

    subject.post_comment(forge, repo, &body).await?;
    tracing::info!("Tagged {} user(s) on {}", mentions.len(), subject);

    Ok(TagOutcome::Posted { body, mentions })
}
