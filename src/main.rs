//! Repograph - interactive 3D repository activity graph

use clap::Parser;

use repograph::cli::App;
use repograph::config::Config;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let app = App::parse();

    // Initialize logging; RUST_LOG takes precedence
    let default_filter = if app.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load()?;
    tracing::debug!("Loaded configuration: {:?}", config);

    app.run(config)
}
