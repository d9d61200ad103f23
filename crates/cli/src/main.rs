//! Grepper CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: flags, with `GREPPER_API_KEY` and
//!    `GREPPER_BASE_URL` as fallbacks.
//! 2. **Wire observability**: `tracing-subscriber` on stderr, filtered by
//!    `RUST_LOG` (default `warn`), as text or JSON lines.
//! 3. **Run one operation**: build a [`Client`], call `search`, `answer` or
//!    `update` once, and print the result as JSON on stdout.
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Configuration error |
//! | 2 | Invalid command line |
//! | 3 | Request error |
//! | 4 | Response error |
//! | 5 | Validation error |

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use client::{
    AnswerId, ClassifiedError, Client, ClientOptions, ErrorKind, API_KEY_ENV, BASE_URL_ENV,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "grepper", version, about = "Search and update answers on Grepper")]
struct Cli {
    /// API key (Basic auth username).
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: String,

    /// Service root, e.g. https://api.grepper.com/v1
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Extra request header; repeatable.
    #[arg(long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search answers.
    Search {
        query: String,
        /// Minimum similarity score (default 60).
        #[arg(long)]
        similarity: Option<u32>,
    },
    /// Fetch one answer.
    Answer { id: u64 },
    /// Replace an answer's content.
    Update { id: u64, content: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

enum Failure {
    Setup(anyhow::Error),
    Call(ClassifiedError),
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Setup(err)
    }
}

impl From<ClassifiedError> for Failure {
    fn from(err: ClassifiedError) -> Self {
        Failure::Call(err)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(Failure::Call(err)) => {
            eprintln!("{}: {}", err.title(), err.message());
            if let Ok(report) = serde_json::to_string(&err.report()) {
                eprintln!("{report}");
            }
            ExitCode::from(exit_code(err.kind()))
        }
        Err(Failure::Setup(err)) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, Failure> {
    let options = ClientOptions {
        api_key: cli.api_key,
        headers: cli.headers,
        base_url: cli.base_url,
    };
    let client = Client::new(options).context("failed to configure client")?;
    info!(base_url = client.base_url(), "client ready");

    let output = match cli.command {
        Command::Search { query, similarity } => {
            let answers = client.search(&query, similarity).await?;
            info!(count = answers.len(), "search complete");
            serde_json::to_string_pretty(&answers)
        }
        Command::Answer { id } => {
            let answer = client.answer(AnswerId::new(id)).await?;
            serde_json::to_string_pretty(&answer)
        }
        Command::Update { id, content } => {
            let outcome = client.update(AnswerId::new(id), &content).await?;
            serde_json::to_string_pretty(&outcome)
        }
    };
    output.context("failed to encode output").map_err(Failure::from)
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Request => 3,
        ErrorKind::Response => 4,
        ErrorKind::Validation => 5,
    }
}
