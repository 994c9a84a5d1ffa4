//! github-to-jira
//!
//! Main entry point: one invocation performs one sync pass and prints the
//! invocation response to stdout.

use clap::{Parser, ValueEnum};
use github_to_jira::config::{
    AwsSecretStore, EnvSecretStore, FileSecretStore, SecretStore, SyncConfig,
};
use github_to_jira::handler::SECRET_ID_VAR;
use std::path::PathBuf;
use std::process;

/// Mirror GitHub issues labelled `jira` into Jira
#[derive(Parser, Debug)]
#[command(name = "github-to-jira")]
#[command(version, about, long_about = None)]
struct Cli {
    /// YAML file overriding the built-in job settings
    #[arg(short, long, env = "GITHUB_JIRA_CONFIG")]
    config: Option<PathBuf>,

    /// Identifier of the secret holding the GitHub and Jira credentials
    #[arg(long, env = SECRET_ID_VAR)]
    secret_id: Option<String>,

    /// Where secrets are read from
    #[arg(long, value_enum, env = "GITHUB_JIRA_SECRET_STORE", default_value_t = StoreKind::File)]
    secret_store: StoreKind,

    /// Directory holding one file per secret (file store)
    #[arg(long, env = "GITHUB_JIRA_SECRETS_DIR", default_value = "/run/secrets")]
    secrets_dir: PathBuf,

    /// Log as JSON lines instead of human-readable text
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// AWS Secrets Manager, using the standard AWS environment
    Aws,
    /// `<secrets-dir>/<secret-id>`
    File,
    /// Environment variable named after the secret id
    Env,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = github_to_jira::logging::init(cli.log_json) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Sync failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> github_to_jira::Result<()> {
    let config = SyncConfig::load_or_default(cli.config.as_deref())?;

    let store: Box<dyn SecretStore> = match cli.secret_store {
        StoreKind::File => Box::new(FileSecretStore::new(cli.secrets_dir)),
        StoreKind::Env => Box::new(EnvSecretStore),
        StoreKind::Aws => Box::new(AwsSecretStore::from_env().await),
    };

    let response =
        github_to_jira::handle(&config, store.as_ref(), cli.secret_id.as_deref()).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
