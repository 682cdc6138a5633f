//! HTTP client for the job manager REST API.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::JobManagerApi;
use crate::config::ClusterConfig;
use crate::error::{ApiError, ApiResult};
use crate::types::{JarRun, Job, SavepointStatus, TerminationMode, UploadedJar};

/// How often a rejected termination is retried before giving up.
const TERMINATE_RETRIES: u32 = 4;
/// Initial wait between termination attempts; doubles per attempt.
const TERMINATE_WAIT_MIN: Duration = Duration::from_secs(1);
/// Upper bound on the wait between termination attempts.
const TERMINATE_WAIT_MAX: Duration = Duration::from_secs(30);

/// Production client for the job manager REST API.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    basic_auth: Option<(String, String)>,
}

impl RestClient {
    /// Create a new client from configuration.
    pub fn new(config: &ClusterConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            basic_auth: config.basic_auth(),
        })
    }

    /// Create a new client for a base URL with default settings.
    pub fn with_url(url: impl Into<String>) -> ApiResult<Self> {
        Self::new(&ClusterConfig {
            base_url: url.into(),
            ..ClusterConfig::default()
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self.http.request(method, url);
        if let Some((user, password)) = &self.basic_auth {
            request = request.basic_auth(user, Some(password));
        }
        request
    }
}

/// Read the response body and require the expected status code.
async fn expect_status(response: Response, expected: StatusCode) -> ApiResult<String> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status != expected {
        return Err(ApiError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

/// Parse a response body, surfacing the raw body on failure.
fn parse_json<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|_| ApiError::InvalidResponse {
        body: body.to_owned(),
    })
}

/// Whether a termination attempt may be retried.
///
/// `None` means the request never produced a response (connect failure,
/// timeout). A status of 500 or above means the job may not be stoppable yet;
/// anything below is a caller error and is terminal.
fn termination_retryable(status: Option<StatusCode>) -> bool {
    match status {
        None => true,
        Some(status) => status.as_u16() >= 500,
    }
}

#[derive(Serialize)]
struct CreateSavepointRequest<'a> {
    #[serde(rename = "target-directory")]
    target_directory: &'a str,
    #[serde(rename = "cancel-job")]
    cancel_job: bool,
}

#[derive(Debug, Deserialize)]
struct SavepointTrigger {
    #[serde(rename = "request-id")]
    request_id: String,
}

#[derive(Deserialize)]
struct JobsOverview {
    jobs: Vec<Job>,
}

#[derive(Deserialize)]
struct SavepointStatusBody {
    status: SavepointStatusId,
}

#[derive(Deserialize)]
struct SavepointStatusId {
    id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunJarRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    entry_class: Option<&'a str>,
    program_args: String,
    parallelism: u32,
    allow_non_restored_state: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    savepoint_path: Option<&'a str>,
}

#[async_trait]
impl JobManagerApi for RestClient {
    async fn retrieve_jobs(&self) -> ApiResult<Vec<Job>> {
        let response = self
            .request(Method::GET, &self.url("jobs/overview"))
            .send()
            .await?;

        let body = expect_status(response, StatusCode::OK).await?;
        let overview: JobsOverview = parse_json(&body)?;
        Ok(overview.jobs)
    }

    async fn create_savepoint(&self, job_id: &str, target_directory: &str) -> ApiResult<String> {
        let request = CreateSavepointRequest {
            target_directory,
            cancel_job: false,
        };

        let response = self
            .request(Method::POST, &self.url(&format!("jobs/{job_id}/savepoints")))
            .json(&request)
            .send()
            .await?;

        let body = expect_status(response, StatusCode::ACCEPTED).await?;
        let trigger: SavepointTrigger = parse_json(&body)?;
        Ok(trigger.request_id)
    }

    async fn monitor_savepoint(
        &self,
        job_id: &str,
        request_id: &str,
    ) -> ApiResult<SavepointStatus> {
        let response = self
            .request(
                Method::GET,
                &self.url(&format!("jobs/{job_id}/savepoints/{request_id}")),
            )
            .send()
            .await?;

        let body = expect_status(response, StatusCode::OK).await?;
        let status: SavepointStatusBody = parse_json(&body)?;
        Ok(SavepointStatus::parse(&status.status.id))
    }

    async fn terminate(&self, job_id: &str, mode: Option<TerminationMode>) -> ApiResult<()> {
        let url = self.url(&format!("jobs/{job_id}"));

        let mut attempt = 0;
        let mut wait = TERMINATE_WAIT_MIN;
        loop {
            let mut request = self.request(Method::PATCH, &url);
            if let Some(mode) = mode {
                request = request.query(&[("mode", mode.as_str())]);
            }

            match request.send().await {
                Ok(response) if response.status() == StatusCode::ACCEPTED => return Ok(()),
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    if !termination_retryable(Some(status)) || attempt == TERMINATE_RETRIES {
                        return Err(ApiError::UnexpectedStatus {
                            status: status.as_u16(),
                            body,
                        });
                    }
                    debug!(%status, attempt, "termination not accepted, retrying");
                }
                Err(error) => {
                    if attempt == TERMINATE_RETRIES {
                        return Err(error.into());
                    }
                    debug!(error = %error, attempt, "termination request failed, retrying");
                }
            }

            attempt += 1;
            tokio::time::sleep(wait).await;
            wait = (wait * 2).min(TERMINATE_WAIT_MAX);
        }
    }

    async fn upload_jar(&self, path: &Path) -> ApiResult<UploadedJar> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ApiError::Artifact {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "job.jar".to_owned());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/x-java-archive")?;
        let form = Form::new().part("jarfile", part);

        let response = self
            .request(Method::POST, &self.url("jars/upload"))
            .multipart(form)
            .send()
            .await?;

        let body = expect_status(response, StatusCode::OK).await?;
        parse_json(&body)
    }

    async fn run_jar(&self, run: &JarRun) -> ApiResult<()> {
        let request = RunJarRequest {
            entry_class: run.entry_class.as_deref(),
            program_args: run.program_args.join(" "),
            parallelism: run.parallelism,
            allow_non_restored_state: run.allow_non_restored_state,
            savepoint_path: run.savepoint_path.as_deref(),
        };

        let response = self
            .request(Method::POST, &self.url(&format!("jars/{}/run", run.jar_id)))
            .json(&request)
            .send()
            .await?;

        expect_status(response, StatusCode::OK).await?;
        Ok(())
    }
}
