//! xcfetch - Authorize and download Apple developer packages
//!
//! This is the CLI application that drives the operations in the ops crate.

mod cli;
mod display;
mod error;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use clap::Parser;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use xcfetch_config::Config;
use xcfetch_net::{NetClient, NetConfig};
use xcfetch_ops::{OperationResult, OpsContextBuilder, OpsCtx};
use xcfetch_progress::{OutputSink, TerminalSink};
use xcfetch_types::Package;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Application error");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    // Precedence: file (or defaults) < environment < command line
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.command);

    init_tracing(cli.global.json, cli.global.debug, &config.log_dir());
    info!("Starting xcfetch v{}", env!("CARGO_PKG_VERSION"));

    // Keep stdout clean for the JSON document
    let sink = if cli.global.json {
        TerminalSink::stderr()
    } else {
        TerminalSink::stdout()
    };
    let client = NetClient::new(&NetConfig::from(&config.network))?;
    let mut ctx = OpsContextBuilder::new()
        .with_client(Arc::new(client))
        .with_sink(sink)
        .with_config(config)
        .build()?;

    // Dropping the operation on Ctrl-C leaves any `.download` file behind
    let outcome = tokio::select! {
        result = execute_command(cli.command, &mut ctx) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    let Some(result) = outcome else {
        warn!("Interrupted");
        if let Err(e) = ctx.sink.clear() {
            debug!(error = %e, "Could not erase progress line");
        }
        return Err(xcfetch_errors::Error::Cancelled.into());
    };
    let result = result?;
    OutputRenderer::new(cli.global.json).render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute the specified command
async fn execute_command<S: OutputSink>(
    command: Commands,
    ctx: &mut OpsCtx<S>,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Urls { path } => {
            let urls = xcfetch_ops::urls(&Package::from_path(path))?;
            Ok(OperationResult::Urls(urls))
        }

        Commands::Auth { path, .. } => {
            let package = Package::from_path(path);
            xcfetch_ops::authenticate(ctx, &package).await?;
            Ok(OperationResult::Authenticated { package })
        }

        Commands::Download {
            path,
            kind,
            version,
            output,
            ..
        } => {
            let package = Package::new(kind, version, path);
            let report = xcfetch_ops::download(ctx, &package, output.as_deref()).await?;
            Ok(OperationResult::Download(report))
        }
    }
}

/// Apply command-specific flags on top of file and environment settings
fn apply_cli_config(config: &mut Config, command: &Commands) {
    match command {
        Commands::Urls { .. } => {}
        Commands::Auth { cookie, .. } => {
            if let Some(cookie) = cookie {
                config.auth.session_cookie = Some(cookie.clone());
            }
        }
        Commands::Download {
            width,
            title,
            cookie,
            ..
        } => {
            if let Some(width) = width {
                config.progress.width = *width;
            }
            if let Some(title) = title {
                config.progress.title = Some(title.clone());
            }
            if let Some(cookie) = cookie {
                config.auth.session_cookie = Some(cookie.clone());
            }
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool, log_dir: &Path) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "xcfetch-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| tracing_subscriber::EnvFilter::new("info,xcfetch=debug"),
                        ),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // Nothing on the console that could interleave with the JSON document
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
}
