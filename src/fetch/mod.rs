//! Paginated retrieval of execution history and pipeline names.

use tracing::{debug, info};

use crate::source::{ExecutionStatus, ExecutionSummary, FetchError, PipelineSource};

/// Limits applied while paging through a listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Stop after this many pages even if a continuation token remains.
    pub max_pages: Option<u32>,
}

impl FetchOptions {
    fn exhausted(&self, pages: u32) -> bool {
        self.max_pages.is_some_and(|max| pages >= max)
    }
}

/// Fetch every finished execution of `pipeline`, oldest first.
pub async fn fetch_executions<S: PipelineSource + ?Sized>(
    source: &S,
    pipeline: &str,
    opts: &FetchOptions,
) -> Result<Vec<ExecutionSummary>, FetchError> {
    let mut accumulated = Vec::new();
    let mut next_token: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let page = source
            .list_executions(pipeline, next_token.as_deref())
            .await?;
        pages += 1;
        debug!(%pipeline, page = pages, count = page.executions.len(), "fetched executions page");
        accumulated.extend(page.executions);

        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
        if opts.exhausted(pages) {
            info!(%pipeline, pages, "page limit reached, ignoring older executions");
            break;
        }
    }

    // The service lists newest first.
    let mut finished: Vec<ExecutionSummary> = accumulated
        .into_iter()
        .filter(|e| e.status != ExecutionStatus::InProgress)
        .collect();
    finished.reverse();

    Ok(chronological(finished))
}

/// List the name of every pipeline in the account, in listing order.
///
/// Always follows every continuation token; the page limit only bounds
/// execution history.
pub async fn list_pipeline_names<S: PipelineSource + ?Sized>(
    source: &S,
) -> Result<Vec<String>, FetchError> {
    let mut names = Vec::new();
    let mut next_token: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let page = source.list_pipelines(next_token.as_deref()).await?;
        pages += 1;
        names.extend(page.names);

        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }

    info!(count = names.len(), pages, "enumerated pipelines");
    Ok(names)
}

/// Order executions oldest first by start time.
///
/// The sort is stable, so runs sharing a start time keep their relative
/// order and applying this twice is the same as applying it once.
pub fn chronological(mut executions: Vec<ExecutionSummary>) -> Vec<ExecutionSummary> {
    executions.sort_by_key(|e| e.start_time);
    executions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ExecutionPage, PipelinePage};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Mutex;

    fn summary(minute: i64, status: ExecutionStatus) -> ExecutionSummary {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ExecutionSummary {
            execution_id: Some(format!("exec-{}", minute)),
            status,
            start_time: base + Duration::minutes(minute),
            last_update_time: base + Duration::minutes(minute + 5),
        }
    }

    /// Serves pre-built pages keyed by continuation token.
    struct PagedSource {
        pages: Vec<ExecutionPage>,
        tokens_seen: Mutex<Vec<Option<String>>>,
    }

    #[async_trait::async_trait]
    impl PipelineSource for PagedSource {
        async fn list_executions(
            &self,
            _pipeline: &str,
            next_token: Option<&str>,
        ) -> Result<ExecutionPage, FetchError> {
            self.tokens_seen
                .lock()
                .unwrap()
                .push(next_token.map(str::to_owned));
            let index = next_token.map(|t| t.parse::<usize>().unwrap()).unwrap_or(0);
            Ok(self.pages[index].clone())
        }

        async fn list_pipelines(&self, _next_token: Option<&str>) -> Result<PipelinePage, FetchError> {
            Ok(PipelinePage::default())
        }
    }

    fn three_page_source() -> PagedSource {
        PagedSource {
            pages: vec![
                ExecutionPage {
                    executions: vec![
                        summary(50, ExecutionStatus::InProgress),
                        summary(40, ExecutionStatus::Succeeded),
                    ],
                    next_token: Some("1".to_string()),
                },
                ExecutionPage {
                    executions: vec![summary(30, ExecutionStatus::Failed)],
                    next_token: Some("2".to_string()),
                },
                ExecutionPage {
                    executions: vec![
                        summary(20, ExecutionStatus::Other("Stopped".to_string())),
                        summary(10, ExecutionStatus::Succeeded),
                    ],
                    next_token: None,
                },
            ],
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    #[test]
    fn test_fetch_follows_tokens_and_orders_oldest_first() {
        let source = three_page_source();
        let executions =
            tokio_test::block_on(fetch_executions(&source, "web", &FetchOptions::default()))
                .unwrap();

        let starts: Vec<i64> = executions
            .iter()
            .map(|e| e.start_time.timestamp() / 60 % 60)
            .collect();
        assert_eq!(starts, vec![10, 20, 30, 40]);
        assert!(executions
            .iter()
            .all(|e| e.status != ExecutionStatus::InProgress));

        let tokens = source.tokens_seen.lock().unwrap().clone();
        assert_eq!(
            tokens,
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[test]
    fn test_fetch_respects_page_limit() {
        let source = three_page_source();
        let opts = FetchOptions { max_pages: Some(1) };
        let executions = tokio_test::block_on(fetch_executions(&source, "web", &opts)).unwrap();

        assert_eq!(executions.len(), 1);
        assert_eq!(executions[0].status, ExecutionStatus::Succeeded);
        assert_eq!(source.tokens_seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_fetch_reverses_runs_sharing_a_start_time() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let run = |id: &str, status, updated| ExecutionSummary {
            execution_id: Some(id.to_string()),
            status,
            start_time: base,
            last_update_time: base + Duration::minutes(updated),
        };
        let source = PagedSource {
            pages: vec![ExecutionPage {
                executions: vec![
                    run("newer", ExecutionStatus::Succeeded, 10),
                    run("older", ExecutionStatus::Failed, 5),
                ],
                next_token: None,
            }],
            tokens_seen: Mutex::new(Vec::new()),
        };

        let executions =
            tokio_test::block_on(fetch_executions(&source, "web", &FetchOptions::default()))
                .unwrap();

        let ids: Vec<&str> = executions
            .iter()
            .map(|e| e.execution_id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["older", "newer"]);
        assert_eq!(crate::metrics::mean_time_to_recover(&executions), Some(10.0));
        assert_eq!(crate::metrics::total_duration(&executions), Some(10));
    }

    #[test]
    fn test_chronological_is_idempotent() {
        let newest_first = vec![
            summary(30, ExecutionStatus::Succeeded),
            summary(20, ExecutionStatus::Failed),
            summary(10, ExecutionStatus::Succeeded),
        ];
        let once = chronological(newest_first);
        let twice = chronological(once.clone());
        assert_eq!(once, twice);
        assert!(once.windows(2).all(|w| w[0].start_time <= w[1].start_time));
    }
}
