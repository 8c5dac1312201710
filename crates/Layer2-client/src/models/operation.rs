//! Operations - long-running server-side jobs (refresh, train, predict)

use crate::context::ClientContext;
use crate::registry::{extension_point, FromParts};
use crate::resource::{fetch_resource, Resource, ResourceParts};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use unify_foundation::{Error, Result};

/// Default delay between polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// State of an operation as reported by `status.state`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    /// A state this client does not know about
    Unknown(String),
}

impl OperationState {
    pub fn parse(state: &str) -> Self {
        match state {
            "PENDING" => Self::Pending,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "CANCELED" => Self::Canceled,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Canceled => "CANCELED",
            Self::Unknown(state) => state,
        }
    }

    /// No further transitions happen from this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an operation-triggering call should behave
#[derive(Debug, Clone)]
pub struct OperationOptions {
    /// Return as soon as the operation is submitted
    pub asynchronous: bool,

    pub poll_interval: Duration,

    /// Give up waiting after this long (`None` waits forever)
    pub timeout: Option<Duration>,
}

impl Default for OperationOptions {
    fn default() -> Self {
        Self {
            asynchronous: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl OperationOptions {
    pub fn asynchronous() -> Self {
        Self {
            asynchronous: true,
            ..Default::default()
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Return `op` as is, or wait for it to finish
    pub async fn apply(&self, op: Arc<dyn OperationApi>) -> Result<Arc<dyn OperationApi>> {
        if self.asynchronous {
            return Ok(op);
        }

        let op = if op.state().is_terminal() {
            op
        } else {
            op.wait(self.poll_interval, self.timeout).await?
        };
        if !op.succeeded() {
            warn!(
                "Operation {} did not succeed: {} ({})",
                op.id(),
                op.state(),
                op.description().unwrap_or("no description")
            );
        }
        Ok(op)
    }
}

/// A server-side operation
#[async_trait]
pub trait OperationApi: Resource {
    fn id(&self) -> &str {
        self.parts()
            .str_field("id")
            .unwrap_or_else(|| self.resource_id())
    }

    fn operation_type(&self) -> Option<&str> {
        self.parts().str_field("type")
    }

    fn description(&self) -> Option<&str> {
        self.parts().str_field("description")
    }

    /// Raw `status` object (`state`, `startTime`, `endTime`, `message`)
    fn status(&self) -> Option<&Value> {
        self.parts().field("status")
    }

    fn state(&self) -> OperationState {
        self.status()
            .and_then(|status| status.get("state"))
            .and_then(Value::as_str)
            .map(OperationState::parse)
            .unwrap_or_else(|| OperationState::Unknown(String::new()))
    }

    fn succeeded(&self) -> bool {
        self.state() == OperationState::Succeeded
    }

    /// Fetch the current state of this operation
    async fn poll(&self) -> Result<Arc<dyn OperationApi>> {
        Operation::from_resource_id(self.context(), self.id()).await
    }

    /// Poll until the operation reaches a terminal state
    ///
    /// An operation that is already terminal comes back rebuilt from its
    /// current payload without a request.
    async fn wait(
        &self,
        poll_interval: Duration,
        timeout: Option<Duration>,
    ) -> Result<Arc<dyn OperationApi>> {
        let started = Instant::now();
        let mut latest: Option<Arc<dyn OperationApi>> = None;

        loop {
            let state = match &latest {
                Some(op) => op.state(),
                None => self.state(),
            };
            if state.is_terminal() {
                info!("Operation {} finished: {}", self.id(), state);
                return Ok(match latest {
                    Some(op) => op,
                    None => self
                        .context()
                        .construct::<Operation>(self.data().cloned(), self.api_path()),
                });
            }

            if let Some(timeout) = timeout {
                if started.elapsed() >= timeout {
                    return Err(Error::Timeout(format!(
                        "Operation {} still {} after {:?}",
                        self.id(),
                        state,
                        timeout
                    )));
                }
            }

            debug!("Operation {} is {}; polling again", self.id(), state);
            sleep(poll_interval).await;
            latest = Some(self.poll().await?);
        }
    }
}

/// Default operation wrapper
pub struct Operation {
    parts: ResourceParts,
}

impl Operation {
    /// Fetch an operation by id
    pub async fn from_resource_id(
        context: &ClientContext,
        resource_id: &str,
    ) -> Result<Arc<dyn OperationApi>> {
        let path = format!("operations/{}", resource_id);
        fetch_resource::<Operation>(context, &path).await
    }

    /// POST to an operation-triggering endpoint
    ///
    /// `204 No Content` means the server had nothing to do; that yields an
    /// already-succeeded operation.
    pub async fn trigger(context: &ClientContext, endpoint: &str) -> Result<Arc<dyn OperationApi>> {
        let request = context.request(Method::POST, endpoint)?;
        let response = context.send(request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            debug!("{} returned no content; nothing to do", endpoint);
            return Ok(context.construct::<Operation>(Some(no_op_json()), NO_OP_PATH));
        }
        let data: Value = response.json().await?;
        context.construct_from_json::<Operation>(data)
    }
}

const NO_OP_PATH: &str = "operations/-1";

/// Payload of an operation that was never submitted because there was nothing to do
fn no_op_json() -> Value {
    json!({
        "id": "-1",
        "type": "NOOP",
        "description": "No-op operation: nothing to do",
        "status": {
            "state": "SUCCEEDED",
            "startTime": "",
            "endTime": "",
            "message": ""
        },
        "relativeId": NO_OP_PATH
    })
}

impl FromParts for Operation {
    fn from_parts(parts: ResourceParts) -> Self {
        Self { parts }
    }
}

impl Resource for Operation {
    fn parts(&self) -> &ResourceParts {
        &self.parts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl OperationApi for Operation {}

extension_point!(Operation => OperationApi);

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id())
            .field("state", &self.state())
            .field("description", &self.description())
            .finish()
    }
}


impl std::fmt::Debug for dyn OperationApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OperationApi").field(self.parts()).finish()
    }
}
