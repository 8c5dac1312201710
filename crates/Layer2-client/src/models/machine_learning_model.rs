//! Machine-learning models attached to mastering and categorization projects

use crate::registry::{extension_point, FromParts};
use crate::resource::{Resource, ResourceParts};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use unify_foundation::Result;

use super::operation::{Operation, OperationApi, OperationOptions};

/// A project's machine-learning model, e.g. `projects/1/categorizations/model`
#[async_trait]
pub trait MachineLearningModelApi: Resource {
    /// Learn from verified labels (`<model>:refresh`)
    async fn train(&self, options: &OperationOptions) -> Result<Arc<dyn OperationApi>> {
        let endpoint = format!("{}:refresh", self.api_path());
        let op = Operation::trigger(self.context(), &endpoint).await?;
        options.apply(op).await
    }

    /// Produce predictions from the trained model
    ///
    /// Predictions live next to the model: `projects/1/categorizations/model`
    /// predicts through `projects/1/categorizations:refresh`.
    async fn predict(&self, options: &OperationOptions) -> Result<Arc<dyn OperationApi>> {
        let path = self.api_path();
        let endpoint = format!("{}:refresh", path.strip_suffix("/model").unwrap_or(path));
        let op = Operation::trigger(self.context(), &endpoint).await?;
        options.apply(op).await
    }
}

/// Default machine-learning model wrapper
pub struct MachineLearningModel {
    parts: ResourceParts,
}

impl FromParts for MachineLearningModel {
    fn from_parts(parts: ResourceParts) -> Self {
        Self { parts }
    }
}

impl Resource for MachineLearningModel {
    fn parts(&self) -> &ResourceParts {
        &self.parts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl MachineLearningModelApi for MachineLearningModel {}

extension_point!(MachineLearningModel => MachineLearningModelApi);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassMapping;
    use crate::testing::mock_context;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_train_and_predict_endpoints() {
        let server = MockServer::start();
        let train = server.mock(|when, then| {
            when.method(POST)
                .path("/api/versioned/v1/projects/1/categorizations/model:refresh");
            then.status(200).json_body(json!({
                "id": "11",
                "status": {"state": "PENDING"},
                "relativeId": "operations/11"
            }));
        });
        let predict = server.mock(|when, then| {
            when.method(POST)
                .path("/api/versioned/v1/projects/1/categorizations:refresh");
            then.status(200).json_body(json!({
                "id": "12",
                "status": {"state": "RUNNING"},
                "relativeId": "operations/12"
            }));
        });

        let context = mock_context(&server, ClassMapping::new());
        let model = context
            .construct::<MachineLearningModel>(None, "projects/1/categorizations/model");

        let options = OperationOptions::asynchronous();
        let op = model.train(&options).await.unwrap();
        assert_eq!(op.id(), "11");

        let op = model.predict(&options).await.unwrap();
        assert_eq!(op.id(), "12");

        train.assert();
        predict.assert();
    }
}
