//! `kubectl-pvc` binary entrypoint.
//!
//! Installed on `PATH`, kubectl exposes it as `kubectl pvc`.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use pvc_cli::cli::{Cli, Commands};
use pvc_cli::commands::{InspectCommand, LsCommand};
use pvc_cli::config::{DEFAULT_NAMESPACE, PluginConfig, Settings};
use pvc_cli::output::OutputFormat;
use pvc_cli::{CliError, KubeFactSource};
use pvc_core::{ClusterSnapshot, FactSource};

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG overrides the default level
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = PluginConfig::load(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, config);
    let format = OutputFormat::new(cli.format);

    if let Some(path) = &cli.snapshot {
        let source = ClusterSnapshot::from_file(path)?;
        let namespace = settings.namespace_or(DEFAULT_NAMESPACE);
        dispatch(source, namespace, &settings, &format, &cli.command).await
    } else {
        let source = KubeFactSource::connect(
            cli.kubeconfig.as_deref(),
            settings.context.as_deref(),
            settings.request_timeout,
        )
        .await?;
        let namespace = settings.namespace_or(source.default_namespace());
        dispatch(source, namespace, &settings, &format, &cli.command).await
    }
}

async fn dispatch<S: FactSource>(
    source: S,
    namespace: String,
    settings: &Settings,
    format: &OutputFormat,
    command: &Commands,
) -> Result<(), CliError> {
    debug!(namespace = %namespace, attach_match = %settings.attach_match, "resolved settings");
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Inspect(args) => {
            let cmd = InspectCommand::new(source, namespace, settings.attach_match);
            cmd.execute(&mut stdout, format, args).await?;
        }
        Commands::Ls(args) => {
            let cmd = LsCommand::new(source, namespace);
            cmd.execute(&mut stdout, format, args).await?;
        }
    }

    Ok(())
}
