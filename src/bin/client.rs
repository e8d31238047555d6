use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use minihttp::client::{Endpoint, WebClient, describe_page, mirror};

/// HTTP/1.1 GET client.
///
/// With three arguments the page is printed with the resources it needs.
/// With an output directory the page and its resources are saved for
/// offline viewing.
#[derive(Debug, Parser)]
#[command(name = "minihttp-client", version)]
struct Args {
    /// Server host, e.g. 127.0.0.1
    host: String,

    /// Server port, e.g. 8080
    port: u16,

    /// Path on the server, e.g. index.html
    path: String,

    /// Save the page and its resources here
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();
    let client = WebClient::new(Endpoint::new(args.host.clone(), args.port));

    match args.output_dir {
        None => match describe_page(&client, &args.path).await {
            Some(page) => {
                println!("Status: {}", page.status_line);
                match &page.body {
                    Some(body) => println!("Content: {}", String::from_utf8_lossy(body)),
                    None => println!("Content: <none>"),
                }
                let same: Vec<_> = page.references.same_host.iter().map(|r| &r.url).collect();
                let other: Vec<_> = page.references.other_host.iter().map(|r| &r.url).collect();
                println!("The page requires the following resources too:");
                println!("From this host: {:?}", same);
                println!("From other hosts: {:?}", other);
                ExitCode::SUCCESS
            }
            None => ExitCode::FAILURE,
        },
        Some(dir) => match mirror(&client, &args.path, &dir).await {
            Ok(report) => {
                for path in &report.saved {
                    println!("Saved {}", path.display());
                }
                for reference in &report.skipped {
                    println!("Couldn't save {}", reference);
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}
