//! Dataset collections: `datasets` and a project's `inputDatasets`

use super::resource::{Dataset, DatasetApi};
use crate::registry::{extension_point, FromParts};
use crate::resource::{fetch_resource, stream_resources, Resource, ResourceParts, ResourceStream};
use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use unify_foundation::{Error, Result};

#[async_trait]
pub trait DatasetCollectionApi: Resource {
    /// Stream every dataset in the collection
    fn stream(&self) -> ResourceStream<'_, dyn DatasetApi> {
        stream_resources::<Dataset>(self.context(), self.api_path(), Vec::new())
    }

    async fn list(&self) -> Result<Vec<Arc<dyn DatasetApi>>> {
        self.stream().try_collect().await
    }

    /// Dataset by id, e.g. `"1"` for `datasets/1`
    async fn by_resource_id(&self, resource_id: &str) -> Result<Arc<dyn DatasetApi>> {
        let path = format!("datasets/{}", resource_id);
        fetch_resource::<Dataset>(self.context(), &path).await
    }

    /// Dataset by relative id, e.g. `datasets/1`
    async fn by_relative_id(&self, relative_id: &str) -> Result<Arc<dyn DatasetApi>> {
        fetch_resource::<Dataset>(self.context(), relative_id).await
    }

    /// First dataset whose name matches exactly
    async fn by_name(&self, name: &str) -> Result<Arc<dyn DatasetApi>> {
        let mut stream = self.stream();
        while let Some(dataset) = stream.try_next().await? {
            if dataset.name() == Some(name) {
                return Ok(dataset);
            }
        }
        Err(Error::NotFound(format!(
            "No dataset named '{}' in {}",
            name,
            self.api_path()
        )))
    }

    /// Create a dataset from a definition such as `{"name": "ds", "keyAttributeNames": ["id"]}`
    async fn create(&self, definition: &Value) -> Result<Arc<dyn DatasetApi>> {
        let data: Value = self.context().post_json(self.api_path(), definition).await?;
        self.context().construct_from_json::<Dataset>(data)
    }
}

/// Default dataset collection
pub struct DatasetCollection {
    parts: ResourceParts,
}

impl FromParts for DatasetCollection {
    fn from_parts(parts: ResourceParts) -> Self {
        Self { parts }
    }
}

impl Resource for DatasetCollection {
    fn parts(&self) -> &ResourceParts {
        &self.parts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DatasetCollectionApi for DatasetCollection {}

extension_point!(DatasetCollection => DatasetCollectionApi);
