use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use pipemetrics::config::{AppConfig, OutputFormat};
use pipemetrics::runner::Target;

#[derive(Parser)]
#[command(
    name = "pipemetrics",
    about = "Delivery-performance metrics from AWS CodePipeline execution history",
    version,
    long_about = None
)]
struct Cli {
    /// Pipeline to analyze; every pipeline in the account when omitted
    pipeline: Option<String>,

    /// JSON output for machine parsing
    #[arg(long)]
    json: bool,

    /// AWS region of the pipelines
    #[arg(long)]
    region: Option<String>,

    /// Named AWS profile for credentials
    #[arg(long)]
    profile: Option<String>,

    /// Pipelines analyzed at once when covering the whole account
    #[arg(long)]
    concurrency: Option<usize>,

    /// Stop paging each pipeline's execution history after this many pages
    #[arg(long)]
    max_pages: Option<u32>,

    /// Configuration file (otherwise $PIPEMETRICS_CONFIG or /etc/pipemetrics/pipemetrics.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(region) = &self.region {
            config.aws.region = region.clone();
        }
        if let Some(profile) = &self.profile {
            config.aws.profile = Some(profile.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.fleet.concurrency = concurrency;
        }
        if let Some(max_pages) = self.max_pages {
            config.fetch.max_pages = Some(max_pages);
        }
        if self.json {
            config.output.format = OutputFormat::Json;
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::resolve(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    init_tracing(&config);
    tracing::debug!(?config, "effective configuration");

    let target = Target::from_arg(cli.pipeline.clone());
    let reports = match pipemetrics::run(&target, &config).await {
        Ok(reports) => reports,
        Err(e) => {
            tracing::error!(error = ?e, "metrics run failed");
            return Err(e);
        }
    };

    println!("{}", pipemetrics::report::render(&reports, config.output.format)?);

    Ok(())
}
