//! Client context - the handle every resource wrapper shares
//!
//! Holds the HTTP client, base URL, credentials and the class mapping. Cheap
//! to clone; nothing in it changes after the client is built.

use crate::registry::{ClassMapping, ExtensionPoint, ResolvedClass};
use crate::resource::ResourceParts;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use unify_foundation::{Error, Result, UsernamePasswordAuth};
use url::Url;

#[derive(Clone)]
pub struct ClientContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    http: reqwest::Client,
    origin: String,
    base_url: Url,
    auth: UsernamePasswordAuth,
    class_mapping: ClassMapping,
    request_timeout: Duration,
}

impl ClientContext {
    /// `origin` is `protocol://host:port`; `base_path` must start and end with `/`
    ///
    /// `request_timeout` bounds every request sent with [`send`](Self::send),
    /// body included. Streams opened with [`open_stream`](Self::open_stream)
    /// are bounded only by the HTTP client's connect and read timeouts.
    pub(crate) fn new(
        http: reqwest::Client,
        origin: impl Into<String>,
        base_path: &str,
        auth: UsernamePasswordAuth,
        class_mapping: ClassMapping,
        request_timeout: Duration,
    ) -> Result<Self> {
        let origin = origin.into();
        let base_url = Url::parse(&origin)?.join(base_path)?;

        Ok(Self {
            inner: Arc::new(ContextInner {
                http,
                origin,
                base_url,
                auth,
                class_mapping,
                request_timeout,
            }),
        })
    }

    pub fn origin(&self) -> &str {
        &self.inner.origin
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn auth(&self) -> &UsernamePasswordAuth {
        &self.inner.auth
    }

    pub fn class_mapping(&self) -> &ClassMapping {
        &self.inner.class_mapping
    }

    // ========================================================================
    // Class resolution
    // ========================================================================

    /// The type the library builds for `D`
    pub fn resolve<D: ExtensionPoint>(&self) -> ResolvedClass<D> {
        self.inner.class_mapping.resolve::<D>()
    }

    /// Build the resolved type for `D`
    pub fn construct<D: ExtensionPoint>(
        &self,
        data: Option<Value>,
        api_path: impl Into<String>,
    ) -> Arc<D::Target> {
        self.resolve::<D>()
            .construct(ResourceParts::new(self.clone(), data, api_path))
    }

    /// Build the resolved type for `D` from a payload carrying its `relativeId`
    pub fn construct_from_json<D: ExtensionPoint>(&self, data: Value) -> Result<Arc<D::Target>> {
        let parts = ResourceParts::from_json(self.clone(), data)?;
        Ok(self.resolve::<D>().construct(parts))
    }

    // ========================================================================
    // HTTP
    // ========================================================================

    /// Resolve an endpoint against the base URL
    ///
    /// Relative endpoints (`projects/1`) land under the base path; endpoints
    /// starting with `/` are relative to the origin.
    pub fn url_for(&self, endpoint: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(endpoint)?)
    }

    /// Authenticated request builder
    pub fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url_for(endpoint)?;
        debug!(%method, %url, "Unify request");
        Ok(self
            .inner
            .http
            .request(method, url)
            .header(AUTHORIZATION, self.inner.auth.header_value()))
    }

    /// Send and fail on a non-success status, within the request timeout
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.timeout(self.inner.request_timeout).send().await?;
        ensure_success(response).await
    }

    /// Like [`send`](Self::send), for responses read as a stream
    ///
    /// No total deadline applies; a long body keeps flowing as long as each
    /// read arrives within the client's read timeout.
    pub async fn open_stream(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        ensure_success(response).await
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let request = self.request(Method::GET, endpoint)?;
        self.send_json(request).await
    }

    pub async fn post_json<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, endpoint)?.json(body);
        self.send_json(request).await
    }

    pub async fn put_json<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, endpoint)?.json(body);
        self.send_json(request).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        let request = self.request(Method::DELETE, endpoint)?;
        self.send(request).await?;
        Ok(())
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("base_url", &self.inner.base_url.as_str())
            .field("auth", &self.inner.auth)
            .field("class_mapping", &self.inner.class_mapping)
            .field("request_timeout", &self.inner.request_timeout)
            .finish()
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(Error::from_status(status.as_u16(), body))
}
