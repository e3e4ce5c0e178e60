//! Reaction tagger: mention everyone who reacted with a given emoji.
//!
//! Reads the reactions on the issue, pull request or discussion that
//! triggered a GitHub Actions run, and posts a single comment tagging the
//! users who reacted with the requested emoji. Issues and pull requests
//! share the issue endpoints; discussions use the discussion endpoints.

pub mod cli;
pub mod compose;
pub mod context;
pub mod github;
pub mod tagger;
pub mod types;
pub mod workflow;

pub use cli::{Config, parse_args};
pub use compose::{create_comment_body, mentions};
pub use context::{RunContext, UnsupportedSubject};
pub use github::{GitHub, setup_github_client};
pub use tagger::{TagOutcome, TagRequest, tag_users_by_reaction};
pub use types::{Forge, Reaction, ReactionUser, Repo, RepoError, Subject, SubjectKind};
