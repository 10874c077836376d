//! node-cleanup
//!
//! Removes NotReady nodes from a Kubernetes cluster.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use node_cleanup::cleanup::{self, CleanupOptions, CleanupReport};
use node_cleanup::config::CleanupConfig;
use node_cleanup::kubernetes::K8sClient;
use node_cleanup::logging::LoggingConfig;
use node_cleanup::output::{self, OutputFormat};

#[derive(Parser)]
#[command(author, version, about = "Removes NotReady nodes from a Kubernetes cluster", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only report what would have been deleted
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Kubeconfig file (defaults to KUBECONFIG, ~/.kube/config, then in-cluster)
    #[arg(long)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context
    #[arg(long)]
    context: Option<String>,

    /// Only consider nodes matching this label selector
    #[arg(short = 'l', long)]
    selector: Option<String>,

    /// Report format (table, json, yaml)
    #[arg(short, long)]
    output: Option<String>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Flags take priority over the config file and environment
    fn apply_to(self, config: &mut CleanupConfig) {
        if self.kubeconfig.is_some() {
            config.kubeconfig = self.kubeconfig;
        }
        if self.context.is_some() {
            config.context = self.context;
        }
        if self.selector.is_some() {
            config.label_selector = self.selector;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        config.dry_run |= self.dry_run;
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let mut config = CleanupConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;

    let _log_guard = LoggingConfig::from_settings(&config.logging, verbose)
        .init()
        .context("Failed to initialize logging")?;

    let format = OutputFormat::from_name(&config.output)
        .with_context(|| format!("Unknown output format '{}'", config.output))?;

    let client = K8sClient::infer(config.kubeconfig.as_deref(), config.context.as_deref())
        .await
        .context("Failed to connect to cluster")?;
    tracing::debug!(
        api_server = client.api_server(),
        context = client.context().unwrap_or("<inferred>"),
        "Connected to cluster"
    );

    let options = CleanupOptions {
        dry_run: config.dry_run,
        label_selector: config.label_selector.clone(),
    };

    let report = cleanup::run(&client, &options)
        .await
        .context("Failed to list nodes")?;

    output::print_report(&report, format)?;

    Ok(ExitCode::from(exit_status(&report)))
}

/// Exit status 1 when any deletion failed
fn exit_status(report: &CleanupReport) -> u8 {
    if report.is_success() {
        0
    } else {
        1
    }
}
