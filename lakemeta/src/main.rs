//! Entrypoint of the lakemeta binary

use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

mod commands {
    pub(crate) mod common;
    pub(crate) mod partition;
}

enum ReturnCode {
    Failure = 1,
}

#[derive(Debug, clap::Parser)]
#[clap(
    name = "lakemeta",
    version,
    about = "LakeMeta schema catalog command line tools",
    long_about = r#"LakeMeta schema catalog command line tools

Examples:
    # Register a partition, deriving the location from the spec
    lakemeta partition add -d sales -t events --spec date=2025-11-24 --bucket data-lake

    # Check whether a partition is registered
    lakemeta partition exists -d sales -t events --spec date=2025-11-24

    # Remove a partition
    lakemeta partition delete -d sales -t events --spec date=2025-11-24

    # Run with extra verbose logging
    LOG_FILTER=debug lakemeta partition add -d sales -t events --spec date=2025-11-24 --bucket data-lake
"#
)]
struct Config {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, clap::Parser)]
enum Command {
    /// Manage partition metadata in the catalog
    Partition(commands::partition::Config),
}

#[tokio::main]
async fn main() {
    // load all environment variables from .env before doing anything
    load_dotenv();
    init_logs();

    let config: Config = clap::Parser::parse();

    match config.command {
        None => println!("command required, -h/--help for help"),
        Some(Command::Partition(config)) => {
            if let Err(e) = commands::partition::command(config).await {
                eprintln!("Partition command failed: {e}");
                std::process::exit(ReturnCode::Failure as _)
            }
        }
    }
}

/// Source the .env file before initialising the Config struct - this sets
/// any envs in the file, which the Config struct then uses.
///
/// Precedence is given to existing env variables.
fn load_dotenv() {
    match dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            // Ignore this - a missing env file is not an error, defaults will
            // be applied when initialising the Config struct.
        }
        Err(e) => {
            eprintln!("FATAL Error loading config from: {e}");
            eprintln!("Aborting");
            std::process::exit(1);
        }
    };
}

/// Logs go to stderr so stdout stays clean for the emitted result record.
fn init_logs() {
    let filter =
        EnvFilter::try_from_env("LOG_FILTER").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
