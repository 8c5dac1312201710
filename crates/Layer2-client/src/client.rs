//! Top-level client
//!
//! The client owns the [`ClientContext`] and the two root collections, which
//! are built once through the class registry when the client is built.

use crate::context::ClientContext;
use crate::models::dataset::{DatasetCollection, DatasetCollectionApi};
use crate::models::operation::{Operation, OperationApi};
use crate::models::project::{ProjectCollection, ProjectCollectionApi};
use crate::registry::ClassMapping;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use unify_foundation::{
    normalize_base_path, Result, UnifyConfig, UsernamePasswordAuth, DEFAULT_BASE_PATH,
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PROTOCOL, DEFAULT_TIMEOUT_SECS,
};

/// Client for one Unify instance
pub struct Client {
    context: ClientContext,
    projects: Arc<dyn ProjectCollectionApi>,
    datasets: Arc<dyn DatasetCollectionApi>,
}

impl Client {
    /// Client for `http://localhost:9100/api/versioned/v1/`
    pub fn new(auth: UsernamePasswordAuth) -> Result<Self> {
        Self::builder(auth).build()
    }

    pub fn builder(auth: UsernamePasswordAuth) -> ClientBuilder {
        ClientBuilder::new(auth)
    }

    /// Client from a loaded configuration, credentials included
    pub fn from_config(config: &UnifyConfig) -> Result<Self> {
        ClientBuilder::from_config(config)?.build()
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// `protocol://host:port`
    pub fn origin(&self) -> &str {
        self.context.origin()
    }

    /// The project collection; the same instance on every call
    pub fn projects(&self) -> Arc<dyn ProjectCollectionApi> {
        Arc::clone(&self.projects)
    }

    /// The dataset collection; the same instance on every call
    pub fn datasets(&self) -> Arc<dyn DatasetCollectionApi> {
        Arc::clone(&self.datasets)
    }

    /// Fetch an operation by id
    pub async fn operation(&self, resource_id: &str) -> Result<Arc<dyn OperationApi>> {
        Operation::from_resource_id(&self.context, resource_id).await
    }

    // ========================================================================
    // Raw requests (endpoints relative to the base path)
    // ========================================================================

    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.context.get_json(endpoint).await
    }

    pub async fn post<B>(&self, endpoint: &str, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.context.post_json(endpoint, body).await
    }

    pub async fn put<B>(&self, endpoint: &str, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.context.put_json(endpoint, body).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        self.context.delete(endpoint).await
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("context", &self.context)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Connection settings and class mapping for a [`Client`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    auth: UsernamePasswordAuth,
    protocol: String,
    host: String,
    port: u16,
    base_path: String,
    timeout: Duration,
    class_mapping: ClassMapping,
}

impl ClientBuilder {
    pub fn new(auth: UsernamePasswordAuth) -> Self {
        Self {
            auth,
            protocol: DEFAULT_PROTOCOL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            class_mapping: ClassMapping::new(),
        }
    }

    /// Builder with every setting taken from `config`
    pub fn from_config(config: &UnifyConfig) -> Result<Self> {
        Ok(Self::new(config.credentials()?)
            .protocol(config.effective_protocol())
            .host(config.effective_host())
            .port(config.effective_port())
            .base_path(config.normalized_base_path())
            .timeout(config.effective_timeout()))
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Path prefix of every relative endpoint; slashes are added as needed
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Connect and per-read timeout, and the total deadline of every
    /// non-streaming request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replacement types for the built-in resource wrappers
    pub fn class_mapping(mut self, class_mapping: ClassMapping) -> Self {
        self.class_mapping = class_mapping;
        self
    }

    pub fn build(self) -> Result<Client> {
        let http = reqwest::Client::builder()
            .connect_timeout(self.timeout)
            .read_timeout(self.timeout)
            .build()?;
        let origin = format!("{}://{}:{}", self.protocol, self.host, self.port);
        let base_path = normalize_base_path(&self.base_path);

        let context = ClientContext::new(
            http,
            origin,
            &base_path,
            self.auth,
            self.class_mapping,
            self.timeout,
        )?;
        let projects = context.construct::<ProjectCollection>(None, "projects");
        let datasets = context.construct::<DatasetCollection>(None, "datasets");

        info!(
            "Unify client for {} ({} replaced type(s))",
            context.base_url(),
            context.class_mapping().len()
        );

        Ok(Client {
            context,
            projects,
            datasets,
        })
    }
}
