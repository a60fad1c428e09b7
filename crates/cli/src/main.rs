// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use zerg_cli::exit_error::ExitError;
use zerg_cli::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = zerg_cli::run(cli).await {
        match err.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("error: {}", exit.message);
                }
                std::process::exit(exit.code);
            }
            None => {
                eprintln!("error: {err:?}");
                std::process::exit(1);
            }
        }
    }
}
