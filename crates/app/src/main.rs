//! Probe - command line entry point
//!
//! Issues one request against the configured service and compares the
//! response with its fixture, or removes a collection.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use probe_application::{CollectionSession, CompareOutcome};
use probe_domain::{CollectionRef, FormData, FormField, Header, Headers, RecordMode};
use probe_infrastructure::{ConfigLoader, DEFAULT_FILTER, build_harness, init_tracing};
use tracing::debug;

#[derive(Parser)]
#[command(name = "probe", version)]
#[command(about = "Compare live service responses with recorded fixtures", long_about = None)]
struct Cli {
    /// Configuration file (defaults to $PROBE_CONFIG, then ./probe.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Record mode: never, missing or always
    #[arg(long, global = true)]
    record: Option<RecordMode>,

    /// Base URL of the service under test
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding fixture files
    #[arg(long, global = true)]
    fixture_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// GET a path and compare the response with its fixture
    Get {
        /// Request path, relative to the base URL
        path: String,

        /// Fixture test name
        #[arg(long, default_value = "")]
        test_name: String,

        /// Extra header, `Name: value` (repeatable)
        #[arg(long = "header", value_name = "NAME:VALUE")]
        headers: Vec<Header>,
    },

    /// POST a multipart form and compare the response with its fixture
    Post {
        /// Request path, relative to the base URL
        path: String,

        /// Text field, `name=value` (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE", value_parser = FormField::parse_text)]
        fields: Vec<FormField>,

        /// File field, `name=path` (repeatable)
        #[arg(long = "file", value_name = "NAME=PATH", value_parser = FormField::parse_file)]
        files: Vec<FormField>,

        /// Fixture test name
        #[arg(long, default_value = "")]
        test_name: String,

        /// Extra header, `Name: value` (repeatable)
        #[arg(long = "header", value_name = "NAME:VALUE")]
        headers: Vec<Header>,
    },

    /// Remove a collection from the service
    Remove {
        /// Owner of the collection
        owner: String,
        /// Collection id
        id: String,
        /// Collection version
        version: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(DEFAULT_FILTER);

    match run(cli).await {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load()?;

    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(mode) = cli.record {
        config.record_mode = mode;
    }
    if let Some(dir) = cli.fixture_dir {
        config.fixture_dir = dir;
    }
    debug!(base_url = %config.base_url, record_mode = %config.record_mode, "starting");

    let harness = build_harness(&config)?;

    let outcome = match cli.command {
        Command::Get {
            path,
            test_name,
            headers,
        } => {
            harness
                .get(&path, &test_name, headers.into_iter().collect::<Headers>())
                .await?
        }
        Command::Post {
            path,
            fields,
            files,
            test_name,
            headers,
        } => {
            let form: FormData = fields.into_iter().chain(files).collect();
            harness
                .post(&path, form, &test_name, headers.into_iter().collect::<Headers>())
                .await?
        }
        Command::Remove { owner, id, version } => {
            let reference = CollectionRef::new(owner.clone(), id, version);
            CollectionSession::new(&harness, owner)
                .remove(&reference)
                .await?;
            return Ok(format!("removed {reference}"));
        }
    };

    Ok(match outcome {
        CompareOutcome::Matched(report) => report.to_string().trim_end().to_string(),
        CompareOutcome::Recorded { location } => format!("recorded {location}"),
    })
}
