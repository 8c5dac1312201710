//! Resource base - the parts every wrapper is built from
//!
//! A resource is `(client_context, optional_payload, api_path)`. Collections
//! usually carry no payload; items fetched from the server carry their JSON.

use crate::context::ClientContext;
use crate::registry::ExtensionPoint;
use futures::Stream;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use unify_foundation::{Error, Result};

/// Stream of resources built through the class registry
pub type ResourceStream<'a, T> = Pin<Box<dyn Stream<Item = Result<Arc<T>>> + Send + 'a>>;

/// Constructor arguments shared by every resource wrapper
#[derive(Clone)]
pub struct ResourceParts {
    context: ClientContext,
    data: Option<Value>,
    api_path: String,
}

impl ResourceParts {
    pub fn new(context: ClientContext, data: Option<Value>, api_path: impl Into<String>) -> Self {
        Self {
            context,
            data,
            api_path: api_path.into(),
        }
    }

    /// Parts for a payload whose `relativeId` is its path
    pub fn from_json(context: ClientContext, data: Value) -> Result<Self> {
        let api_path = data
            .get("relativeId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::missing_field("resource", "relativeId"))?
            .to_string();
        Ok(Self::new(context, Some(data), api_path))
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn api_path(&self) -> &str {
        &self.api_path
    }

    /// A string field of the payload
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.as_ref()?.get(key)?.as_str()
    }

    /// A field of the payload
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.as_ref()?.get(key)
    }

    /// Path of a sub-resource, e.g. `projects/1` + `unifiedDataset`
    pub fn sub_path(&self, suffix: &str) -> String {
        format!("{}/{}", self.api_path, suffix)
    }
}

impl fmt::Debug for ResourceParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceParts")
            .field("api_path", &self.api_path)
            .field("has_data", &self.data.is_some())
            .finish()
    }
}

/// Last `/`-separated segment
pub(crate) fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Common surface of every resource wrapper
///
/// Implementors only need [`parts`](Resource::parts) and
/// [`as_any`](Resource::as_any); everything else is derived from the parts.
pub trait Resource: Send + Sync + 'static {
    fn parts(&self) -> &ResourceParts;

    /// For downcasting to the concrete type that was built
    fn as_any(&self) -> &dyn Any;

    fn context(&self) -> &ClientContext {
        self.parts().context()
    }

    fn api_path(&self) -> &str {
        self.parts().api_path()
    }

    fn data(&self) -> Option<&Value> {
        self.parts().data()
    }

    /// `relativeId` of the payload, e.g. `datasets/1`
    fn relative_id(&self) -> Option<&str> {
        self.parts().str_field("relativeId")
    }

    /// Last segment of the relative id (or of the path when there is no payload)
    fn resource_id(&self) -> &str {
        last_segment(self.relative_id().unwrap_or_else(|| self.api_path()))
    }
}

// ============================================================================
// 공통 fetch 헬퍼
// ============================================================================

/// GET a single resource at `path` and build it as `D`, keeping `path` as its api path
pub(crate) async fn fetch_resource<D: ExtensionPoint>(
    context: &ClientContext,
    path: &str,
) -> Result<Arc<D::Target>> {
    let data: Value = context.get_json(path).await?;
    Ok(context.construct::<D>(Some(data), path))
}

/// GET a JSON array at `path` and build each element as `D`
pub(crate) fn stream_resources<'a, D: ExtensionPoint>(
    context: &'a ClientContext,
    path: &'a str,
    query: Vec<(String, String)>,
) -> ResourceStream<'a, D::Target> {
    Box::pin(async_stream::stream! {
        let request = match context.request(reqwest::Method::GET, path) {
            Ok(request) => request.query(&query),
            Err(e) => {
                yield Err(e);
                return;
            }
        };
        let items: Vec<Value> = match context.send_json(request).await {
            Ok(items) => items,
            Err(e) => {
                yield Err(e);
                return;
            }
        };

        let class = context.resolve::<D>();
        for item in items {
            match ResourceParts::from_json(context.clone(), item) {
                Ok(parts) => yield Ok(class.construct(parts)),
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
    })
}
