use anyhow::Result;
use reaction_tagger::{
    Config, GitHub, RunContext, TagOutcome, parse_args, setup_github_client,
    tag_users_by_reaction, workflow,
};

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // The runner sets RUNNER_DEBUG=1 when a run is re-run with debug logging.
    let default_level = match std::env::var("RUNNER_DEBUG").as_deref() {
        Ok("1") => "debug",
        _ => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(config: Config) -> Result<()> {
    let context = RunContext::from_event_file(config.repo.clone(), &config.event_path)?;
    let subject = context.resolve_subject()?;
    tracing::debug!("Resolved {} in {}", subject, config.repo);

    let client = setup_github_client(config.token, config.api_url.as_deref())?;
    let forge = GitHub::new(client);

    let outcome = tag_users_by_reaction(&forge, &config.repo, subject, &config.request).await?;

    if let TagOutcome::DryRun { body, .. } = &outcome {
        println!("{body}");
    }

    if let Some(path) = &config.output_file {
        let tagged = outcome.mentions().join(" ");
        workflow::write_outputs(
            path,
            &[
                ("tagged-users", tagged.as_str()),
                ("comment-body", outcome.body().unwrap_or_default()),
            ],
        )?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match parse_args(std::env::args_os()) {
        Ok(config) => config,
        Err(err) => match err.downcast_ref::<clap::Error>() {
            Some(clap_err) => handle_clap_help_version(clap_err),
            None => fail(&err),
        },
    };

    if let Err(err) = run(config).await {
        fail(&err);
    }
}

fn fail(err: &anyhow::Error) -> ! {
    let message = format!("{err:#}");
    tracing::error!("{}", message);
    println!("{}", workflow::error_command(&message));
    std::process::exit(1);
}
