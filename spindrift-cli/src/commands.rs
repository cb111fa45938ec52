//! CLI command implementations

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Subcommand;
use spindrift_core::SpindriftConfig;
use spindrift_core::tracing_setup::{CliLogLevel, init_tracing};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the audio resolution server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Console log level
        #[arg(long, default_value = "info")]
        log_level: CliLogLevel,
        /// Directory for debug log files
        #[arg(long)]
        logs_dir: Option<PathBuf>,
    },
    /// Print the effective configuration and exit
    Config,
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve {
            host,
            port,
            log_level,
            logs_dir,
        } => serve(host, port, log_level, logs_dir).await,
        Commands::Config => show_config(),
    }
}

/// Start the resolution server
///
/// # Errors
/// - Invalid bind address, tracing setup failure, or server failure
async fn serve(
    host: String,
    port: u16,
    log_level: CliLogLevel,
    logs_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(log_level.as_tracing_level(), logs_dir.as_deref())?;

    let config = SpindriftConfig::from_env();
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    spindrift_web::run_server(config, addr).await
}

/// Print the effective provider configuration
fn show_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = SpindriftConfig::from_env();

    println!("Conversion endpoints:");
    for endpoint in &config.providers.conversion_endpoints {
        println!("  {endpoint}");
    }
    println!("Probe mirrors:");
    for mirror in &config.providers.probe_mirrors {
        println!("  {mirror}");
    }
    println!("Probe tags: {}", config.providers.probe_itags.join(", "));
    println!("Extractor APIs:");
    for base in &config.providers.extractor_api_bases {
        println!("  {base}");
    }

    Ok(())
}
