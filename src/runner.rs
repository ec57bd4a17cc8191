//! Per-target orchestration: fetch, compute, collect.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::info;

use crate::fetch::{self, FetchOptions};
use crate::metrics::MetricsReport;
use crate::source::PipelineSource;

/// Which pipelines a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Pipeline(String),
    All,
}

impl Target {
    pub fn from_arg(pipeline: Option<String>) -> Self {
        match pipeline {
            Some(name) => Target::Pipeline(name),
            None => Target::All,
        }
    }
}

/// Metrics for one pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub pipeline: String,
    /// Finished executions the metrics were computed over.
    pub executions: usize,
    pub metrics: MetricsReport,
}

/// Fetch one pipeline's history and compute its metrics.
pub async fn analyze_pipeline<S: PipelineSource + ?Sized>(
    source: &S,
    pipeline: &str,
    opts: &FetchOptions,
) -> Result<PipelineReport> {
    let executions = fetch::fetch_executions(source, pipeline, opts)
        .await
        .with_context(|| format!("failed to fetch executions for pipeline {}", pipeline))?;

    let metrics = MetricsReport::compute(&executions);
    info!(%pipeline, executions = executions.len(), "computed metrics");

    Ok(PipelineReport {
        pipeline: pipeline.to_string(),
        executions: executions.len(),
        metrics,
    })
}

/// Analyze every pipeline in the account.
///
/// Up to `concurrency` pipelines are in flight at once; results keep
/// enumeration order. The first failure aborts the whole run.
pub async fn analyze_fleet<S: PipelineSource + ?Sized>(
    source: &S,
    opts: &FetchOptions,
    concurrency: usize,
) -> Result<Vec<PipelineReport>> {
    let names = fetch::list_pipeline_names(source)
        .await
        .context("failed to enumerate pipelines")?;

    stream::iter(names)
        .map(|name| async move { analyze_pipeline(source, &name, opts).await })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

pub async fn analyze<S: PipelineSource + ?Sized>(
    source: &S,
    target: &Target,
    opts: &FetchOptions,
    concurrency: usize,
) -> Result<Vec<PipelineReport>> {
    match target {
        Target::Pipeline(name) => Ok(vec![analyze_pipeline(source, name, opts).await?]),
        Target::All => analyze_fleet(source, opts, concurrency).await,
    }
}
