//! Remote pipeline service: execution and pipeline listings.
//!
//! The two listing operations sit behind [`PipelineSource`] so the fetchers
//! can page through any backend. [`codepipeline::CodePipelineSource`] talks to
//! AWS; tests drive the fetchers with in-memory sources.

use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod codepipeline;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{operation} failed: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    #[error("execution summary for pipeline {pipeline} has no {field}")]
    MalformedSummary {
        pipeline: String,
        field: &'static str,
    },
}

/// Outcome of one pipeline execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    InProgress,
    Succeeded,
    Failed,
    /// Any other remote status (Stopped, Superseded, ...), kept verbatim.
    Other(String),
}

impl From<&str> for ExecutionStatus {
    fn from(s: &str) -> Self {
        match s {
            "InProgress" => ExecutionStatus::InProgress,
            "Succeeded" => ExecutionStatus::Succeeded,
            "Failed" => ExecutionStatus::Failed,
            other => ExecutionStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStatus::InProgress => write!(f, "InProgress"),
            ExecutionStatus::Succeeded => write!(f, "Succeeded"),
            ExecutionStatus::Failed => write!(f, "Failed"),
            ExecutionStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// One historical run of a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    pub execution_id: Option<String>,
    pub status: ExecutionStatus,
    pub start_time: DateTime<Utc>,
    pub last_update_time: DateTime<Utc>,
}

impl ExecutionSummary {
    /// Whole minutes between this run's start and its last update.
    pub fn elapsed_minutes(&self) -> i64 {
        (self.last_update_time - self.start_time).num_minutes()
    }
}

/// One page of a pipeline's execution listing, newest first.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPage {
    pub executions: Vec<ExecutionSummary>,
    pub next_token: Option<String>,
}

/// One page of the account's pipeline listing.
#[derive(Debug, Clone, Default)]
pub struct PipelinePage {
    pub names: Vec<String>,
    pub next_token: Option<String>,
}

/// Paginated listing operations of a pipeline service.
#[async_trait::async_trait]
pub trait PipelineSource: Send + Sync {
    /// List one page of executions for `pipeline`, continuing from `next_token`.
    async fn list_executions(
        &self,
        pipeline: &str,
        next_token: Option<&str>,
    ) -> Result<ExecutionPage, FetchError>;

    /// List one page of pipeline names, continuing from `next_token`.
    async fn list_pipelines(&self, next_token: Option<&str>) -> Result<PipelinePage, FetchError>;
}
