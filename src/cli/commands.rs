use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use reqwest::blocking::Client;
use crate::auth::{clear_credential, obtain_token_source, OAuthClientConfig, TASKS_SCOPE};
use crate::cli::output::{format_empty_notice, format_report};
use crate::config::{AppConfig, APP_DIR_NAME};
use crate::tasks::{migrate, GoogleTasksClient};
use crate::utils::date::TimeTargets;

#[derive(Parser, Debug)]
#[command(name = "move-gtasks")]
#[command(about = "Move incomplete Google tasks --from a given day --to a given day.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Date that should receive tasks. Must be formatted as YYYY-MM-DD, or be one of [yesterday, today, tomorrow].
    #[arg(short = 't', long, default_value = "tomorrow")]
    pub to: String,
    /// Date from which tasks should be pulled. Must be formatted as YYYY-MM-DD, or be one of [yesterday, today, tomorrow].
    #[arg(short = 'f', long, default_value = "today")]
    pub from: String,
    /// Clears your existing token from the filesystem before running the tool. Do this if you want to re-run the OAuth workflow.
    #[arg(short = 'c', long)]
    pub clear_token: bool,
}

const LONG_HELP: &str = "Move due-dated, incomplete Google Tasks to another day.

Adding a due date to a Google Task lets it show up in Google Calendar, but
moving tasks between days by hand is tedious: you cannot multi-select tasks
and drag them to a new day.

This tool moves every incomplete task in your \"My Tasks\" list that is due
on one day to another day.

You will need a Google Cloud Platform project with the Google Tasks API
enabled and OAuth client credentials for a desktop app. See
https://developers.google.com/tasks/quickstart for how to set one up.

Things to note:

- It is not possible to move a task to a specific time.
- It is not possible to tell recurring tasks apart from normal, dated tasks.

For example, to move tasks from one day to the same day next year:

  move-gtasks --from 2022-04-05 --to 2023-04-05

Without --to and --from, today's tasks are moved to tomorrow.";

/// Long help, naming where the client secret file is expected
pub fn long_help() -> String {
    let credentials = AppConfig::resolve_dir()
        .map(|dir| AppConfig::with_dir(dir).credentials_path.display().to_string())
        .unwrap_or_else(|_| format!("<user config dir>/{}/credentials.json", APP_DIR_NAME));
    format!("{}\n\nStore your Client OAuth creds at {}", LONG_HELP, credentials)
}

/// The full clap command, including the dynamic long help
pub fn command() -> clap::Command {
    Cli::command().long_about(long_help())
}

/// Parse process arguments and run
pub fn run() -> Result<()> {
    let matches = command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    execute(&cli)
}

/// Resolve dates, authorize, migrate, print one line per task
pub fn execute(cli: &Cli) -> Result<()> {
    // Dates first: a typo must fail before anything touches disk or network
    let targets = TimeTargets::resolve(&cli.to, &cli.from)?;
    log::debug!("Moving tasks from {} to {}", targets.from, targets.to);

    let config = AppConfig::load()?;

    if cli.clear_token {
        clear_credential(&config.token_path)?;
    }

    let oauth = OAuthClientConfig::from_file(&config.credentials_path, &[TASKS_SCOPE])?;
    let http = Client::builder()
        .user_agent(concat!("move-gtasks/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let tokens = obtain_token_source(&config, oauth, http.clone())?;
    let api = GoogleTasksClient::new(http, tokens);

    let report = migrate(&api, &config.list_name, &targets)?;
    print!("{}", format_report(&report));
    if let Some(notice) = format_empty_notice(&report) {
        eprintln!("{}", notice);
    }
    Ok(())
}
