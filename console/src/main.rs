use clap::Parser;
use fleet_app::FleetError;
use fleet_console::cli::Cli;
use fleet_console::commands;
use fleet_console::prompt::StdinConfirm;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match commands::run(cli, &mut stdout, &mut StdinConfirm).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Library errors carry their own operator text; anything else is shown as is.
fn user_message(e: &anyhow::Error) -> String {
    e.downcast_ref::<FleetError>()
        .map_or_else(|| e.to_string(), FleetError::user_message)
}
