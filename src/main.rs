mod cli;

use anyhow::{Context, Result};
use bz_core::config::{Backend, Config};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

async fn start_server(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    backend: Option<Backend>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);
    config.apply_env();

    // CLI flags win over file and environment.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(backend) = backend {
        config.storage.backend = backend;
    }

    tracing::info!("Starting bazaar {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Server will listen on {}:{} using the {} backend",
        config.server.host,
        config.server.port,
        config.storage.backend
    );

    bz_server::start(config).await?;
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            Config::load(p).with_context(|| format!("failed to load {}", p.display()))?
        }
        None => {
            println!("No config file specified; validating defaults");
            Config::default()
        }
    };

    println!("Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Front URL: {}", config.server.front_url);
    println!("  Backend: {}", config.storage.backend);
    println!("  Images: {}", config.storage.image_dir.display());

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!("Warnings:");
        for warning in warnings {
            println!("  - {warning}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "bazaar=trace,bz_server=trace,bz_store=debug,bz_db=debug,bz_core=debug,tower_http=debug"
                .to_string()
        } else {
            "bazaar=info,bz_server=info,bz_store=info,bz_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt().with_env_filter(&env_filter).init();

    match cli.command {
        Commands::Start {
            host,
            port,
            backend,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(cli.config.as_deref(), host, port, backend))
        }
        Commands::Validate { path } => {
            let path = path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("bazaar {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
