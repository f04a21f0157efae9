//! Where simulation results come from.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{RemoteError, RemoteResult};
use crate::request::ConfigureRequest;
use crate::response::SimulationResult;

/// Produces a [`SimulationResult`] for a validated request.
pub trait SimulationSource {
    fn fetch(&self, request: &ConfigureRequest) -> RemoteResult<SimulationResult>;

    /// Short human-readable origin for log lines.
    fn describe(&self) -> String;
}

impl<S: SimulationSource + ?Sized> SimulationSource for Arc<S> {
    fn fetch(&self, request: &ConfigureRequest) -> RemoteResult<SimulationResult> {
        (**self).fetch(request)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: SimulationSource + ?Sized> SimulationSource for Box<S> {
    fn fetch(&self, request: &ConfigureRequest) -> RemoteResult<SimulationResult> {
        (**self).fetch(request)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// JSON-over-HTTP simulation service.
#[derive(Debug, Clone)]
pub struct HttpSource {
    endpoint: String,
    timeout: Duration,
}

impl HttpSource {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SimulationSource for HttpSource {
    fn fetch(&self, request: &ConfigureRequest) -> RemoteResult<SimulationResult> {
        request.validate()?;
        debug!(endpoint = %self.endpoint, ?request, "posting simulation request");

        let response = ureq::post(&self.endpoint)
            .timeout(self.timeout)
            .set("Accept", "application/json")
            .send_json(request)
            .map_err(|e| match e {
                ureq::Error::Status(status, _) => RemoteError::Status { status },
                ureq::Error::Transport(t) => RemoteError::Transport {
                    message: t.to_string(),
                },
            })?;

        let body = response.into_string().map_err(|e| RemoteError::Transport {
            message: e.to_string(),
        })?;
        let result = SimulationResult::from_json(&body)?;
        info!(
            endpoint = %self.endpoint,
            states = result.states.len(),
            "simulation result received"
        );
        Ok(result)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Result read from a JSON document on disk, for offline play.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SimulationSource for FileSource {
    fn fetch(&self, request: &ConfigureRequest) -> RemoteResult<SimulationResult> {
        request.validate()?;
        let body = fs::read_to_string(&self.path)?;
        let result = SimulationResult::from_json(&body)?;
        info!(path = %self.path.display(), states = result.states.len(), "simulation result loaded");
        Ok(result)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
