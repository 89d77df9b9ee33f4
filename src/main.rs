use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use deepdraft::Config;
use deepdraft::app;
use deepdraft::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Rustls needs a process-level crypto provider installed before the
    // first TLS client is built.
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: could not install rustls crypto provider: {e:?}");
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let config = Arc::new(Config::load_or_init()?);
    app::dispatch::dispatch(cli, config).await
}
