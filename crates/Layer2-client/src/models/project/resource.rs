//! A single project

use super::categorization::{CategorizationProject, CategorizationProjectApi};
use super::mastering::{MasteringProject, MasteringProjectApi};
use crate::models::attribute::{AttributeCollection, AttributeCollectionApi};
use crate::models::dataset::{Dataset, DatasetApi, DatasetCollection, DatasetCollectionApi};
use crate::registry::{extension_point, FromParts};
use crate::resource::{fetch_resource, Resource, ResourceParts};
use async_trait::async_trait;
use reqwest::Method;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;
use unify_foundation::{Error, Result};

/// Project type of mastering projects
pub const MASTERING_TYPE: &str = "DEDUP";

/// Project type of categorization projects
pub const CATEGORIZATION_TYPE: &str = "CATEGORIZATION";

#[async_trait]
pub trait ProjectApi: Resource {
    fn name(&self) -> Option<&str> {
        self.parts().str_field("name")
    }

    fn external_id(&self) -> Option<&str> {
        self.parts().str_field("externalId")
    }

    fn description(&self) -> Option<&str> {
        self.parts().str_field("description")
    }

    /// `DEDUP`, `CATEGORIZATION`, `SCHEMA_MAPPING_RECOMMENDATIONS`, ...
    fn project_type(&self) -> Option<&str> {
        self.parts().str_field("type")
    }

    /// The dataset this project produces
    async fn unified_dataset(&self) -> Result<Arc<dyn DatasetApi>> {
        let path = self.parts().sub_path("unifiedDataset");
        fetch_resource::<Dataset>(self.context(), &path).await
    }

    fn input_datasets(&self) -> Arc<dyn DatasetCollectionApi> {
        self.context()
            .construct::<DatasetCollection>(None, self.parts().sub_path("inputDatasets"))
    }

    /// Attach an existing dataset as input to this project
    async fn add_input_dataset(&self, dataset: &dyn DatasetApi) -> Result<()> {
        let endpoint = self.parts().sub_path("inputDatasets");
        let request = self
            .context()
            .request(Method::POST, &endpoint)?
            .query(&[("id", dataset.resource_id())]);
        self.context().send(request).await?;
        debug!(
            "Added dataset {} to {}",
            dataset.resource_id(),
            self.api_path()
        );
        Ok(())
    }

    fn attributes(&self) -> Arc<dyn AttributeCollectionApi> {
        self.context()
            .construct::<AttributeCollection>(None, self.parts().sub_path("attributes"))
    }

    /// View this project as a mastering project
    fn as_mastering(&self) -> Result<Arc<dyn MasteringProjectApi>> {
        check_type(self.project_type(), MASTERING_TYPE)?;
        Ok(self
            .context()
            .construct::<MasteringProject>(self.data().cloned(), self.api_path()))
    }

    /// View this project as a categorization project
    fn as_categorization(&self) -> Result<Arc<dyn CategorizationProjectApi>> {
        check_type(self.project_type(), CATEGORIZATION_TYPE)?;
        Ok(self
            .context()
            .construct::<CategorizationProject>(self.data().cloned(), self.api_path()))
    }
}

fn check_type(actual: Option<&str>, expected: &str) -> Result<()> {
    match actual {
        Some(actual) if actual == expected => Ok(()),
        actual => Err(Error::unexpected_type(expected, actual.unwrap_or("unknown"))),
    }
}

/// Default project wrapper
pub struct Project {
    parts: ResourceParts,
}

impl FromParts for Project {
    fn from_parts(parts: ResourceParts) -> Self {
        Self { parts }
    }
}

impl Resource for Project {
    fn parts(&self) -> &ResourceParts {
        &self.parts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ProjectApi for Project {}

extension_point!(Project => ProjectApi);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassMapping;
    use crate::testing::{mock_context, test_context};
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    fn project_json(project_type: &str) -> Value {
        json!({
            "id": "unify://unified-data/v1/projects/1",
            "relativeId": "projects/1",
            "name": "Customers",
            "externalId": "cust-1",
            "description": "Mastering customers",
            "type": project_type,
            "unifiedDatasetName": "Customers_unified_dataset"
        })
    }

    #[test]
    fn test_fields_and_sub_resources() {
        let context = test_context(ClassMapping::new());
        let project = context.construct_from_json::<Project>(project_json("DEDUP")).unwrap();

        assert_eq!(project.name(), Some("Customers"));
        assert_eq!(project.external_id(), Some("cust-1"));
        assert_eq!(project.description(), Some("Mastering customers"));
        assert_eq!(project.project_type(), Some("DEDUP"));
        assert_eq!(project.input_datasets().api_path(), "projects/1/inputDatasets");
        assert_eq!(project.attributes().api_path(), "projects/1/attributes");
    }

    #[test]
    fn test_as_mastering_checks_type() {
        let context = test_context(ClassMapping::new());
        let mastering = context.construct_from_json::<Project>(project_json("DEDUP")).unwrap();
        let categorization = context
            .construct_from_json::<Project>(project_json("CATEGORIZATION"))
            .unwrap();

        let project = mastering.as_mastering().unwrap();
        assert!(project.as_any().is::<MasteringProject>());
        assert_eq!(project.name(), Some("Customers"));
        assert_eq!(project.api_path(), "projects/1");

        match mastering.as_categorization() {
            Err(Error::UnexpectedType { expected, actual }) => {
                assert_eq!(expected, "CATEGORIZATION");
                assert_eq!(actual, "DEDUP");
            }
            _ => panic!("expected UnexpectedType"),
        }

        assert!(categorization.as_categorization().is_ok());
        assert!(categorization.as_mastering().is_err());
    }

    #[tokio::test]
    async fn test_unified_dataset_keeps_alias_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/versioned/v1/projects/1/unifiedDataset");
            then.status(200).json_body(json!({
                "relativeId": "datasets/7",
                "name": "Customers_unified_dataset"
            }));
        });

        let context = mock_context(&server, ClassMapping::new());
        let project = context.construct_from_json::<Project>(project_json("DEDUP")).unwrap();
        let unified = project.unified_dataset().await.unwrap();

        mock.assert();
        assert_eq!(unified.api_path(), "projects/1/unifiedDataset");
        assert_eq!(unified.relative_id(), Some("datasets/7"));
        assert_eq!(unified.name(), Some("Customers_unified_dataset"));
    }

    #[tokio::test]
    async fn test_input_datasets_are_project_scoped() {
        let server = MockServer::start();
        let inputs = server.mock(|when, then| {
            when.method(GET).path("/api/versioned/v1/projects/1/inputDatasets");
            then.status(200).json_body(json!([
                {"relativeId": "datasets/3", "name": "crm.csv"},
                {"relativeId": "datasets/4", "name": "erp.csv"}
            ]));
        });
        let all_datasets = server.mock(|when, then| {
            when.method(GET).path("/api/versioned/v1/datasets");
            then.status(200).json_body(json!([]));
        });

        let context = mock_context(&server, ClassMapping::new());
        let project = context.construct_from_json::<Project>(project_json("DEDUP")).unwrap();
        let datasets = project.input_datasets().list().await.unwrap();

        inputs.assert();
        assert_eq!(all_datasets.calls(), 0);
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0].api_path(), "datasets/3");
        assert_eq!(datasets[1].name(), Some("erp.csv"));
    }

    #[tokio::test]
    async fn test_add_input_dataset() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/versioned/v1/projects/1/inputDatasets")
                .query_param("id", "3");
            then.status(204);
        });

        let context = mock_context(&server, ClassMapping::new());
        let project = context.construct_from_json::<Project>(project_json("DEDUP")).unwrap();
        let dataset = context.construct::<Dataset>(
            Some(json!({"relativeId": "datasets/3"})),
            "datasets/3",
        );

        project.add_input_dataset(dataset.as_ref()).await.unwrap();
        mock.assert();
    }
}

impl std::fmt::Debug for dyn ProjectApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ProjectApi").field(self.parts()).finish()
    }
}
