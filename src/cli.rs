use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{tagger::TagRequest, types::Repo};

/// Tag everyone who reacted to an issue, pull request or discussion with a
/// given emoji.
///
/// Every option can also be supplied through the environment the GitHub
/// Actions runner sets up for a step, so the binary works unchanged as an
/// action entrypoint.
#[derive(Parser, Debug)]
#[command(name = "reaction-tagger", version)]
struct CliArgs {
    /// Reaction content to look for (exact match, e.g. "+1", "heart", "👍")
    #[arg(short = 'e', long, env = "INPUT_EMOJI", value_name = "EMOJI")]
    pub emoji: String,

    /// Text placed on its own line above the mentions
    #[arg(short = 'm', long, env = "INPUT_MESSAGE", value_name = "TEXT")]
    pub message: Option<String>,

    /// Repository the event belongs to
    #[arg(short = 'r', long, env = "GITHUB_REPOSITORY", value_name = "OWNER/REPO")]
    pub repo: String,

    /// Webhook payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH", value_name = "FILE")]
    pub event_path: PathBuf,

    /// GitHub token (falls back to GH_TOKEN, then `gh auth token`)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// API root for GitHub Enterprise Server
    #[arg(long, env = "GITHUB_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// File to append step outputs to
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Print the comment instead of posting it
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub request: TagRequest,
    pub repo: Repo,
    pub event_path: PathBuf,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub output_file: Option<PathBuf>,
}

// The runner exports every declared input, so unset ones arrive as "".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CliArgs {
    fn into_config(self) -> Result<Config> {
        let emoji = self.emoji.trim();
        if emoji.is_empty() {
            anyhow::bail!("The emoji input must not be empty");
        }

        let repo = Repo::parse(&self.repo)
            .with_context(|| format!("Invalid repository '{}'", self.repo))?;

        let mut request = TagRequest::new(emoji).dry_run(self.dry_run);
        if let Some(message) = non_blank(self.message) {
            request = request.with_message(message.trim());
        }

        Ok(Config {
            request,
            repo,
            event_path: self.event_path,
            token: non_blank(self.token),
            api_url: non_blank(self.api_url),
            output_file: self.output_file.filter(|p| !p.as_os_str().is_empty()),
        })
    }
}

/// Parses command-line arguments, falling back to the Actions environment,
/// into a validated [`Config`].
///
/// Clap errors (including `--help` and `--version`) are returned wrapped so
/// the caller can downcast them to `clap::Error`.
pub fn parse_args<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    cli.into_config()
}
