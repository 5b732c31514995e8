use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tickerscope_core::{DataSource, ReqwestHttpClient, YahooAdapter};
use tracing_subscriber::EnvFilter;

use tickerscope_cli::cli::Cli;
use tickerscope_cli::error::CliError;
use tickerscope_cli::prompt;
use tickerscope_cli::session::{SessionConfig, SessionController};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let request = prompt::resolve_request(&cli)?;
    let author = prompt::resolve_author(&cli)?;

    let source: Box<dyn DataSource> = if cli.offline {
        Box::new(YahooAdapter::offline())
    } else {
        Box::new(YahooAdapter::online(Arc::new(ReqwestHttpClient::new())))
    };

    let session = SessionController::new(
        source.as_ref(),
        SessionConfig {
            author,
            output_root: cli.output_dir.clone(),
        },
    );

    let result = session.run(&request).await?;

    println!(
        "\nAnalyzed {} of {} ticker(s); artifacts under {}",
        result.len(),
        request.tickers().len(),
        cli.output_dir.display()
    );

    Ok(ExitCode::SUCCESS)
}
