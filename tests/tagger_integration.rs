use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use reaction_tagger::{
    Forge, Reaction, Repo, RunContext, Subject, TagOutcome, TagRequest, tag_users_by_reaction,
};

/// A remote call observed by [`MockForge`].
#[derive(Debug, Clone, PartialEq)]
enum Call {
    ListIssueReactions {
        owner: String,
        repo: String,
        issue_number: u64,
    },
    ListDiscussionReactions {
        owner: String,
        repo: String,
        discussion_number: u64,
    },
    CreateIssueComment {
        owner: String,
        repo: String,
        issue_number: u64,
        body: String,
    },
    CreateTeamDiscussionComment {
        org: String,
        team_slug: String,
        discussion_number: u64,
        body: String,
    },
}

/// Mock forge that serves canned reactions and records every call.
struct MockForge {
    reactions: Vec<Reaction>,
    fail_writes: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockForge {
    fn new(reactions: Vec<Reaction>) -> Self {
        Self {
            reactions,
            fail_writes: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Forge for MockForge {
    async fn list_issue_reactions(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
    ) -> Result<Vec<Reaction>> {
        self.record(Call::ListIssueReactions {
            owner: owner.to_string(),
            repo: repo.to_string(),
            issue_number,
        });
        Ok(self.reactions.clone())
    }

    async fn list_discussion_reactions(
        &self,
        owner: &str,
        repo: &str,
        discussion_number: u64,
    ) -> Result<Vec<Reaction>> {
        self.record(Call::ListDiscussionReactions {
            owner: owner.to_string(),
            repo: repo.to_string(),
            discussion_number,
        });
        Ok(self.reactions.clone())
    }

    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<()> {
        self.record(Call::CreateIssueComment {
            owner: owner.to_string(),
            repo: repo.to_string(),
            issue_number,
            body: body.to_string(),
        });
        if self.fail_writes {
            anyhow::bail!("Resource not accessible by integration");
        }
        Ok(())
    }

    async fn create_team_discussion_comment(
        &self,
        org: &str,
        team_slug: &str,
        discussion_number: u64,
        body: &str,
    ) -> Result<()> {
        self.record(Call::CreateTeamDiscussionComment {
            org: org.to_string(),
            team_slug: team_slug.to_string(),
            discussion_number,
            body: body.to_string(),
        });
        if self.fail_writes {
            anyhow::bail!("Resource not accessible by integration");
        }
        Ok(())
    }
}

/// Forge whose reads always fail.
struct BrokenForge;

#[async_trait]
impl Forge for BrokenForge {
    async fn list_issue_reactions(&self, _: &str, _: &str, _: u64) -> Result<Vec<Reaction>> {
        anyhow::bail!("Bad credentials")
    }

    async fn list_discussion_reactions(&self, _: &str, _: &str, _: u64) -> Result<Vec<Reaction>> {
        anyhow::bail!("Bad credentials")
    }

    async fn create_issue_comment(&self, _: &str, _: &str, _: u64, _: &str) -> Result<()> {
        panic!("write after failed read")
    }

    async fn create_team_discussion_comment(
        &self,
        _: &str,
        _: &str,
        _: u64,
        _: &str,
    ) -> Result<()> {
        panic!("write after failed read")
    }
}

fn test_repo() -> Repo {
    Repo::new("owner", "repo").unwrap()
}

fn mixed_reactions() -> Vec<Reaction> {
    vec![
        Reaction::new("👍", "user1"),
        Reaction::new("👀", "user2"),
        Reaction::new("👍", "user3"),
    ]
}

fn list_issue(issue_number: u64) -> Call {
    Call::ListIssueReactions {
        owner: "owner".to_string(),
        repo: "repo".to_string(),
        issue_number,
    }
}

#[tokio::test]
async fn test_issue_with_custom_message() {
    let forge = MockForge::new(mixed_reactions());
    let request = TagRequest::new("👍").with_message("Custom message");

    let outcome = tag_users_by_reaction(&forge, &test_repo(), Subject::issue(1), &request)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        TagOutcome::Posted {
            body: "Custom message\n@user1 @user3".to_string(),
            mentions: vec!["@user1".to_string(), "@user3".to_string()],
        }
    );
    assert_eq!(
        forge.calls(),
        vec![
            list_issue(1),
            Call::CreateIssueComment {
                owner: "owner".to_string(),
                repo: "repo".to_string(),
                issue_number: 1,
                body: "Custom message\n@user1 @user3".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_issue_without_message() {
    let forge = MockForge::new(mixed_reactions());

    tag_users_by_reaction(&forge, &test_repo(), Subject::issue(1), &TagRequest::new("👍"))
        .await
        .unwrap();

    assert_eq!(
        forge.calls(),
        vec![
            list_issue(1),
            Call::CreateIssueComment {
                owner: "owner".to_string(),
                repo: "repo".to_string(),
                issue_number: 1,
                body: "@user1 @user3".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_no_matching_reactions_posts_nothing() {
    let forge = MockForge::new(vec![Reaction::new("👀", "user2")]);

    let outcome =
        tag_users_by_reaction(&forge, &test_repo(), Subject::issue(1), &TagRequest::new("👍"))
            .await
            .unwrap();

    assert_eq!(outcome, TagOutcome::NothingToPost);
    assert_eq!(forge.calls(), vec![list_issue(1)]);
}

#[tokio::test]
async fn test_discussion_event_uses_discussion_endpoints() {
    let context = RunContext::from_payload_str(test_repo(), r#"{"discussion":{"number":1}}"#)
        .unwrap();
    let subject = context.resolve_subject().unwrap();
    let forge = MockForge::new(mixed_reactions());
    let request = TagRequest::new("👍").with_message("Custom message");

    tag_users_by_reaction(&forge, &context.repo, subject, &request)
        .await
        .unwrap();

    assert_eq!(
        forge.calls(),
        vec![
            Call::ListDiscussionReactions {
                owner: "owner".to_string(),
                repo: "repo".to_string(),
                discussion_number: 1,
            },
            Call::CreateTeamDiscussionComment {
                org: "owner".to_string(),
                team_slug: "repo".to_string(),
                discussion_number: 1,
                body: "Custom message\n@user1 @user3".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_pull_request_event_uses_issue_endpoints() {
    let context = RunContext::from_payload_str(
        test_repo(),
        r#"{"action":"opened","pull_request":{"number":17}}"#,
    )
    .unwrap();
    let subject = context.resolve_subject().unwrap();
    let forge = MockForge::new(mixed_reactions());

    tag_users_by_reaction(&forge, &context.repo, subject, &TagRequest::new("👀"))
        .await
        .unwrap();

    assert_eq!(
        forge.calls(),
        vec![
            list_issue(17),
            Call::CreateIssueComment {
                owner: "owner".to_string(),
                repo: "repo".to_string(),
                issue_number: 17,
                body: "@user2".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_dry_run_never_writes() {
    let forge = MockForge::new(mixed_reactions());
    let request = TagRequest::new("👍").dry_run(true);

    let outcome = tag_users_by_reaction(&forge, &test_repo(), Subject::discussion(4), &request)
        .await
        .unwrap();

    assert_eq!(outcome.body(), Some("@user1 @user3"));
    assert!(matches!(outcome, TagOutcome::DryRun { .. }));
    assert_eq!(
        forge.calls(),
        vec![Call::ListDiscussionReactions {
            owner: "owner".to_string(),
            repo: "repo".to_string(),
            discussion_number: 4,
        }]
    );
}

#[tokio::test]
async fn test_read_failure_propagates() {
    let err = tag_users_by_reaction(
        &BrokenForge,
        &test_repo(),
        Subject::issue(1),
        &TagRequest::new("👍"),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Bad credentials");
}

#[tokio::test]
async fn test_write_failure_propagates() {
    let forge = MockForge::new(mixed_reactions()).failing_writes();

    let err = tag_users_by_reaction(&forge, &test_repo(), Subject::issue(2), &TagRequest::new("👍"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Resource not accessible by integration");
    assert_eq!(forge.calls().len(), 2);
}

#[test]
fn test_unsupported_event_is_rejected_before_any_call() {
    let context = RunContext::from_payload_str(test_repo(), r#"{"schedule":"0 0 * * *"}"#).unwrap();
    let err = context.resolve_subject().unwrap_err();
    assert_eq!(
        err.to_string(),
        "this routine only supports issues, pull requests, or discussions"
    );
}
