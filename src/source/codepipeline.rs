//! AWS CodePipeline backend.

use aws_sdk_codepipeline::config::Region;
use aws_sdk_codepipeline::error::DisplayErrorContext;
use aws_sdk_codepipeline::primitives::DateTime as AwsDateTime;
use aws_sdk_codepipeline::types::PipelineExecutionSummary;
use aws_sdk_codepipeline::Client;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{
    ExecutionPage, ExecutionStatus, ExecutionSummary, FetchError, PipelinePage, PipelineSource,
};
use crate::config::AwsConfig;

pub struct CodePipelineSource {
    client: Client,
}

impl CodePipelineSource {
    /// Resolve credentials through the default AWS chain and build a client
    /// pinned to the configured region.
    pub async fn connect(aws: &AwsConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(aws.region.clone()));
        if let Some(profile) = &aws.profile {
            loader = loader.profile_name(profile);
        }
        let shared = loader.load().await;
        debug!(region = %aws.region, profile = ?aws.profile, "CodePipeline client ready");
        Self {
            client: Client::new(&shared),
        }
    }
}

#[async_trait::async_trait]
impl PipelineSource for CodePipelineSource {
    async fn list_executions(
        &self,
        pipeline: &str,
        next_token: Option<&str>,
    ) -> Result<ExecutionPage, FetchError> {
        let output = self
            .client
            .list_pipeline_executions()
            .pipeline_name(pipeline)
            .set_next_token(next_token.map(str::to_owned))
            .send()
            .await
            .map_err(|e| FetchError::Remote {
                operation: "ListPipelineExecutions",
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let executions = output
            .pipeline_execution_summaries()
            .iter()
            .map(|summary| convert_summary(pipeline, summary))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ExecutionPage {
            executions,
            next_token: output.next_token().map(str::to_owned),
        })
    }

    async fn list_pipelines(&self, next_token: Option<&str>) -> Result<PipelinePage, FetchError> {
        let output = self
            .client
            .list_pipelines()
            .set_next_token(next_token.map(str::to_owned))
            .send()
            .await
            .map_err(|e| FetchError::Remote {
                operation: "ListPipelines",
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let mut names = Vec::new();
        for pipeline in output.pipelines() {
            match pipeline.name() {
                Some(name) => names.push(name.to_string()),
                None => warn!("ListPipelines returned a pipeline without a name, skipping"),
            }
        }

        Ok(PipelinePage {
            names,
            next_token: output.next_token().map(str::to_owned),
        })
    }
}

fn convert_summary(
    pipeline: &str,
    summary: &PipelineExecutionSummary,
) -> Result<ExecutionSummary, FetchError> {
    let malformed = |field| FetchError::MalformedSummary {
        pipeline: pipeline.to_string(),
        field,
    };

    let status = summary.status().ok_or_else(|| malformed("status"))?;
    let start_time = summary
        .start_time()
        .and_then(to_chrono)
        .ok_or_else(|| malformed("startTime"))?;
    let last_update_time = summary
        .last_update_time()
        .and_then(to_chrono)
        .ok_or_else(|| malformed("lastUpdateTime"))?;

    Ok(ExecutionSummary {
        execution_id: summary.pipeline_execution_id().map(str::to_owned),
        status: ExecutionStatus::from(status.as_str()),
        start_time,
        last_update_time,
    })
}

fn to_chrono(t: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(t.secs(), t.subsec_nanos())
}
