use std::collections::BTreeMap;
use std::time::Duration;

use jobwatch_core::{JobId, JobSummary, LogEntry};
use jobwatch_logging::watch_debug;
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::map_reqwest_error;
use crate::{FailureKind, FetchError};

/// Query parameter carrying the comma-joined job ids of a batch request.
pub const JOB_IDS_PARAM: &str = "job_ids";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub jobs: Url,
    pub logs: Url,
    pub statuses: Url,
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Server queries the watch loop depends on.
#[async_trait::async_trait]
pub trait BatchFetcher: Send + Sync {
    async fn fetch_jobs(&self) -> Result<Vec<JobSummary>, FetchError>;

    async fn fetch_logs(
        &self,
        job_ids: &[JobId],
    ) -> Result<Vec<(JobId, Vec<LogEntry>)>, FetchError>;

    async fn fetch_statuses(&self, job_ids: &[JobId]) -> Result<Vec<(JobId, String)>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBatchFetcher {
    endpoints: Endpoints,
    client: reqwest::Client,
}

impl ReqwestBatchFetcher {
    pub fn new(endpoints: Endpoints, settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { endpoints, client })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Requests `endpoint?job_ids=a,b,c` once and calls `handler` for every
    /// entry of the returned id-to-payload map. Returns the number of entries.
    /// An empty id list sends nothing.
    pub async fn fetch_and_apply<T, F>(
        &self,
        endpoint: &Url,
        job_ids: &[JobId],
        mut handler: F,
    ) -> Result<usize, FetchError>
    where
        T: DeserializeOwned + Send,
        F: FnMut(JobId, T) + Send,
    {
        if job_ids.is_empty() {
            return Ok(0);
        }

        let joined = job_ids
            .iter()
            .map(JobId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let mut url = endpoint.clone();
        url.query_pairs_mut().append_pair(JOB_IDS_PARAM, &joined);

        let payloads: BTreeMap<JobId, T> = self.get_json(url).await?;
        let count = payloads.len();
        for (job_id, payload) in payloads {
            handler(job_id, payload);
        }
        watch_debug!("{} returned {} of {} jobs", endpoint.path(), count, job_ids.len());
        Ok(count)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl BatchFetcher for ReqwestBatchFetcher {
    async fn fetch_jobs(&self) -> Result<Vec<JobSummary>, FetchError> {
        self.get_json(self.endpoints.jobs.clone()).await
    }

    async fn fetch_logs(
        &self,
        job_ids: &[JobId],
    ) -> Result<Vec<(JobId, Vec<LogEntry>)>, FetchError> {
        let mut batch = Vec::with_capacity(job_ids.len());
        self.fetch_and_apply(&self.endpoints.logs, job_ids, |job_id, entries| {
            batch.push((job_id, entries));
        })
        .await?;
        Ok(batch)
    }

    async fn fetch_statuses(&self, job_ids: &[JobId]) -> Result<Vec<(JobId, String)>, FetchError> {
        let mut batch = Vec::with_capacity(job_ids.len());
        self.fetch_and_apply(&self.endpoints.statuses, job_ids, |job_id, status| {
            batch.push((job_id, status));
        })
        .await?;
        Ok(batch)
    }
}
