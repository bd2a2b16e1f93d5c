//! CLI command implementations

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Subcommand};
use skurelay_core::{ProductRelay, RelayConfig, RuntimeMode};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay HTTP server
    Server {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        #[command(flatten)]
        upstream: UpstreamArgs,
    },
    /// Look up a single SKU and print the response
    Lookup {
        /// SKU to look up
        sku: String,
        #[command(flatten)]
        upstream: UpstreamArgs,
    },
}

/// Upstream selection shared by all commands.
#[derive(Args)]
pub struct UpstreamArgs {
    /// Runtime mode (production or development)
    #[arg(long, default_value = "production")]
    mode: RuntimeMode,

    /// GraphQL endpoint override
    #[arg(long)]
    upstream_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl UpstreamArgs {
    /// Selected runtime mode.
    pub fn mode(&self) -> RuntimeMode {
        self.mode
    }

    /// Applies command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut RelayConfig) {
        if let Some(url) = &self.upstream_url {
            config.upstream.endpoint = url.clone();
        }
        if let Some(seconds) = self.timeout_secs {
            config.upstream.request_timeout = Some(Duration::from_secs(seconds));
        }
    }
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<ExitCode> {
    let mut config = RelayConfig::from_env();

    match command {
        Commands::Server {
            host,
            port,
            upstream,
        } => {
            upstream.apply(&mut config);
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            start_server(config, upstream.mode()).await
        }
        Commands::Lookup { sku, upstream } => {
            upstream.apply(&mut config);
            lookup(config, upstream.mode(), &sku).await
        }
    }
}

/// Start the relay server
///
/// # Errors
/// - Server failed to start or terminated with an error
pub async fn start_server(config: RelayConfig, mode: RuntimeMode) -> anyhow::Result<ExitCode> {
    tracing::info!("Starting SKU relay in {} mode", mode);

    skurelay_web::run_server(config, mode)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    Ok(ExitCode::SUCCESS)
}

/// Perform one lookup and print the status and JSON body
///
/// # Errors
/// - Relay could not be constructed from the configuration
/// - Response body could not be rendered
pub async fn lookup(config: RelayConfig, mode: RuntimeMode, sku: &str) -> anyhow::Result<ExitCode> {
    let relay =
        ProductRelay::from_config(&config, mode).context("Failed to create product relay")?;

    let response = relay.lookup(Some(sku)).await;
    let body = serde_json::to_string_pretty(&response.body())?;

    println!("HTTP {}", response.status());
    println!("{body}");

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
