use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use minihttp::config::ServerSettings;
use minihttp::server::WebServer;

/// Static file server with redirect and error-page tables.
#[derive(Debug, Parser)]
#[command(name = "minihttp", version)]
struct Args {
    /// Settings file (JSON, or YAML by extension). Defaults to
    /// $MINIHTTP_CONFIG, then config.json.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Soft close after this many seconds, overrides the config. 0 = never.
    #[arg(long)]
    close_after: Option<f64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let path = ServerSettings::resolve_path(args.config);
    let mut settings = ServerSettings::load(&path)?;
    if let Some(secs) = args.close_after {
        settings.close_after_secs = Some(secs);
    }

    let server = WebServer::new(settings)?;
    let handle = server.handle();
    handle.timed_close(server.settings().close_after());

    let ctrl_c = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            ctrl_c.stop();
        }
    });

    server.start().await?;
    Ok(())
}
