//! Attributes of datasets and projects
//!
//! Attribute payloads carry no `relativeId`; an attribute's path is its
//! collection's path plus its name.

use crate::context::ClientContext;
use crate::registry::{extension_point, FromParts};
use crate::resource::{Resource, ResourceParts, ResourceStream};
use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use unify_foundation::{Error, Result};

/// A single attribute (column)
pub trait AttributeApi: Resource {
    fn name(&self) -> Option<&str> {
        self.parts().str_field("name")
    }

    fn description(&self) -> Option<&str> {
        self.parts().str_field("description")
    }

    /// Raw type descriptor, e.g. `{"baseType": "ARRAY", "innerType": {"baseType": "STRING"}}`
    fn attribute_type(&self) -> Option<&Value> {
        self.parts().field("type")
    }

    fn is_nullable(&self) -> Option<bool> {
        self.parts().field("isNullable").and_then(Value::as_bool)
    }
}

/// Default attribute wrapper
#[derive(Debug)]
pub struct Attribute {
    parts: ResourceParts,
}

impl FromParts for Attribute {
    fn from_parts(parts: ResourceParts) -> Self {
        Self { parts }
    }
}

impl Resource for Attribute {
    fn parts(&self) -> &ResourceParts {
        &self.parts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl AttributeApi for Attribute {}

extension_point!(Attribute => AttributeApi);

/// Build the attribute named `name` under `collection_path`
fn attribute_at(
    context: &ClientContext,
    collection_path: &str,
    name: &str,
    data: Value,
) -> Arc<dyn AttributeApi> {
    context.construct::<Attribute>(Some(data), format!("{}/{}", collection_path, name))
}

/// Attributes under `<resource>/attributes`
#[async_trait]
pub trait AttributeCollectionApi: Resource {
    fn stream(&self) -> ResourceStream<'_, dyn AttributeApi> {
        let context = self.context();
        let path = self.api_path();
        Box::pin(async_stream::stream! {
            let items: Vec<Value> = match context.get_json(path).await {
                Ok(items) => items,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            for item in items {
                match item.get("name").and_then(Value::as_str).map(str::to_string) {
                    Some(name) => yield Ok(attribute_at(context, path, &name, item)),
                    None => {
                        yield Err(Error::missing_field("attribute", "name"));
                        return;
                    }
                }
            }
        })
    }

    async fn list(&self) -> Result<Vec<Arc<dyn AttributeApi>>> {
        self.stream().try_collect().await
    }

    async fn by_name(&self, name: &str) -> Result<Arc<dyn AttributeApi>> {
        let path = format!("{}/{}", self.api_path(), name);
        let data: Value = self.context().get_json(&path).await?;
        Ok(attribute_at(self.context(), self.api_path(), name, data))
    }

    /// Create an attribute from a definition such as
    /// `{"name": "id", "type": {"baseType": "STRING"}, "isNullable": false}`
    async fn create(&self, definition: &Value) -> Result<Arc<dyn AttributeApi>> {
        let name = definition
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::InvalidInput("attribute definition needs a name".to_string())
            })?;
        let data: Value = self.context().post_json(self.api_path(), definition).await?;
        Ok(attribute_at(self.context(), self.api_path(), name, data))
    }
}

/// Default attribute collection
pub struct AttributeCollection {
    parts: ResourceParts,
}

impl FromParts for AttributeCollection {
    fn from_parts(parts: ResourceParts) -> Self {
        Self { parts }
    }
}

impl Resource for AttributeCollection {
    fn parts(&self) -> &ResourceParts {
        &self.parts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl AttributeCollectionApi for AttributeCollection {}

extension_point!(AttributeCollection => AttributeCollectionApi);


impl std::fmt::Debug for dyn AttributeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AttributeApi").field(self.parts()).finish()
    }
}
