//! patter terminal client entry point.

// Chat output on stdout IS the interface of this binary; logs go to stderr
// via tracing.
#![allow(clippy::print_stdout)]

mod commands;
mod repl;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// patter terminal chat client
#[derive(Parser, Debug)]
#[command(name = "patter")]
#[command(about = "Terminal client for a patter chat relay")]
#[command(version)]
struct Args {
    /// Relay address to connect to
    #[arg(short, long, default_value = "127.0.0.1:9000")]
    server: String,

    /// Display name to register; prompted for interactively when omitted or
    /// rejected
    #[arg(short, long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    repl::run(args.server, args.name).await
}
