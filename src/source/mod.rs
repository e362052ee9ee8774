use std::time::Duration;

use thiserror::Error;

use crate::model::ExamRecord;

/// The dispatcher's explicit "no records" reply body.
const EMPTY_SENTINEL: &str = "false";

/// What one completed poll produced. An explicit empty reply is a normal
/// outcome, never an error: the view resets to its empty state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Empty,
    Records(Vec<ExamRecord>),
}

/// Identity and query for one poll: who is looking, and which dashboard
/// query the dispatcher should run for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollQuery {
    pub viewer_id: i64,
    pub request_code: u8,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {endpoint} failed: {source}")]
    RequestSend {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body: {source}")]
    BodyRead {
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("invalid response payload: {source}")]
    InvalidPayload {
        #[source]
        source: serde_json::Error,
    },
}

/// Request/response client for the backend dispatcher. Cheap to clone; the
/// underlying reqwest client is reference counted.
#[derive(Clone, Debug)]
pub struct ExamApi {
    client: reqwest::Client,
    endpoint: String,
}

impl ExamApi {
    pub fn new(
        endpoint: &str,
        timeout_seconds: usize,
        proxy: Option<&str>,
    ) -> Result<Self, SourceError> {
        let client = build_client(timeout_seconds, proxy)?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run the role-specific dashboard query for the viewer. The dispatcher
    /// answers with the literal `"false"` when no records exist, otherwise
    /// with a JSON array of flat record objects.
    pub async fn fetch(&self, query: &PollQuery) -> Result<FetchOutcome, SourceError> {
        let form = [
            ("userid", query.viewer_id.to_string()),
            ("request", query.request_code.to_string()),
        ];
        let body = self.post_form(&form).await?;
        if body.trim() == EMPTY_SENTINEL {
            return Ok(FetchOutcome::Empty);
        }
        let records: Vec<ExamRecord> =
            serde_json::from_str(&body).map_err(|e| SourceError::InvalidPayload { source: e })?;
        Ok(FetchOutcome::Records(records))
    }

    /// Fire a row action (delete) at the dispatcher. The textual
    /// `"true"`/`"false"` reply signals whether the removal happened and
    /// gates the caller's forced refresh.
    pub async fn submit_action(
        &self,
        exam_id: i64,
        student_id: i64,
        request_code: u8,
    ) -> Result<bool, SourceError> {
        let form = [
            ("examid", exam_id.to_string()),
            ("studentid", student_id.to_string()),
            ("request", request_code.to_string()),
        ];
        let body = self.post_form(&form).await?;
        Ok(body.trim() == "true")
    }

    async fn post_form(&self, form: &[(&str, String)]) -> Result<String, SourceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(form)
            .send()
            .await
            .map_err(|e| SourceError::RequestSend {
                endpoint: self.endpoint.clone(),
                source: e,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        response
            .text()
            .await
            .map_err(|e| SourceError::BodyRead { source: e })
    }
}

fn build_client(
    timeout_seconds: usize,
    proxy: Option<&str>,
) -> Result<reqwest::Client, SourceError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::CONTENT_TYPE,
        reqwest::header::HeaderValue::from_static("application/x-www-form-urlencoded"),
    );

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy_url = proxy.to_string();
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| SourceError::ProxySetup {
            proxy: proxy_url,
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| SourceError::ClientBuild { source: e })
}
