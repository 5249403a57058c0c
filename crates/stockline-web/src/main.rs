use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use stockline_core::YahooAdapter;
use stockline_web::{init_logging, Cli, Server, ServerError};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let cli = Cli::parse();
    init_logging(&cli.logging_config())?;

    let config = cli.server_config();
    let source = YahooAdapter::default().with_timeout_ms(config.upstream_timeout_ms);

    Server::new(config, Arc::new(source)).run().await
}
