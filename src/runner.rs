use thiserror::Error;
use tokio::sync::mpsc;

use crate::paginator::DEFAULT_PAGE_LENGTH;
use crate::paginator::PAGE_LENGTH_ALL;
use crate::poller::{run_view, PollerOptions, ViewController, ViewEvent};
use crate::render::{TableView, ViewProfile, ViewRole};
use crate::source::{ExamApi, SourceError};

/// Poll interval the original dashboards shipped with.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

#[derive(Clone, Debug)]
pub struct Options {
    pub endpoint: String,
    pub viewer_id: i64,
    pub role: ViewRole,
    pub poll_interval_ms: u64,
    pub page_length: i64,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    pub search: Option<String>,
    pub no_color: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            viewer_id: 0,
            role: ViewRole::Student,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            page_length: DEFAULT_PAGE_LENGTH,
            timeout_seconds: 10,
            proxy: None,
            search: None,
            no_color: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no endpoint provided")]
    MissingEndpoint,

    #[error("invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("invalid viewer id {value}, expected a positive id")]
    InvalidViewerId { value: i64 },

    #[error("invalid page length {value}, expected a positive amount or -1 for all")]
    InvalidPageLength { value: i64 },

    #[error("invalid poll interval {value}ms, expected at least 50ms")]
    InvalidPollInterval { value: u64 },

    #[error("data source error: {source}")]
    Source {
        #[source]
        source: SourceError,
    },
}

/// Library-facing entry point: validated options plus the two run modes,
/// a single fetch-and-render pass and the live polling loop.
#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.endpoint.trim().is_empty() {
            return Err(RunnerError::MissingEndpoint);
        }
        if reqwest::Url::parse(&options.endpoint).is_err() {
            return Err(RunnerError::InvalidEndpoint {
                url: options.endpoint.clone(),
            });
        }
        if options.viewer_id <= 0 {
            return Err(RunnerError::InvalidViewerId {
                value: options.viewer_id,
            });
        }
        if options.page_length != PAGE_LENGTH_ALL && options.page_length <= 0 {
            return Err(RunnerError::InvalidPageLength {
                value: options.page_length,
            });
        }
        if options.poll_interval_ms < 50 {
            return Err(RunnerError::InvalidPollInterval {
                value: options.poll_interval_ms,
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    fn api(&self) -> Result<ExamApi, RunnerError> {
        ExamApi::new(
            &self.options.endpoint,
            self.options.timeout_seconds,
            self.options.proxy.as_deref(),
        )
        .map_err(|e| RunnerError::Source { source: e })
    }

    fn controller(&self) -> ViewController {
        let profile = ViewProfile::for_role(self.options.role);
        let controller = ViewController::new(profile, self.options.page_length);
        match self.options.search.as_deref() {
            Some(search) if !search.trim().is_empty() => controller.with_search(search),
            _ => controller,
        }
    }

    /// One forced pass through the whole pipeline: fetch, filter, paginate,
    /// render. Useful for scripting and for hosts without a timer.
    pub async fn fetch_once(&self) -> Result<TableView, RunnerError> {
        let api = self.api()?;
        let mut controller = self.controller();
        let query = controller.query(self.options.viewer_id);
        let outcome = api
            .fetch(&query)
            .await
            .map_err(|e| RunnerError::Source { source: e })?;
        let view = controller
            .apply_poll(1, outcome, true)
            .unwrap_or_else(|| TableView::empty(controller.profile()));
        Ok(view)
    }

    /// The live view: a 250 ms (configurable) polling loop with user events
    /// folded in. Runs until the hosting task cancels it.
    pub async fn run_live(
        &self,
        events: mpsc::Receiver<ViewEvent>,
        on_render: impl FnMut(TableView),
    ) -> Result<(), RunnerError> {
        let api = self.api()?;
        let mut controller = self.controller();
        let poller_options = PollerOptions {
            interval_ms: self.options.poll_interval_ms,
            query: controller.query(self.options.viewer_id),
        };
        run_view(api, &mut controller, poller_options, events, on_render).await;
        Ok(())
    }
}
