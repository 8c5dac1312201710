//! The `projects` collection

use super::resource::{Project, ProjectApi};
use crate::registry::{extension_point, FromParts};
use crate::resource::{fetch_resource, stream_resources, Resource, ResourceParts, ResourceStream};
use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;
use unify_foundation::{Error, Result};

#[async_trait]
pub trait ProjectCollectionApi: Resource {
    /// Stream every project
    fn stream(&self) -> ResourceStream<'_, dyn ProjectApi> {
        stream_resources::<Project>(self.context(), self.api_path(), Vec::new())
    }

    async fn list(&self) -> Result<Vec<Arc<dyn ProjectApi>>> {
        self.stream().try_collect().await
    }

    /// Project by id, e.g. `"1"` for `projects/1`
    async fn by_resource_id(&self, resource_id: &str) -> Result<Arc<dyn ProjectApi>> {
        let path = format!("projects/{}", resource_id);
        fetch_resource::<Project>(self.context(), &path).await
    }

    /// Project by relative id, e.g. `projects/1`
    async fn by_relative_id(&self, relative_id: &str) -> Result<Arc<dyn ProjectApi>> {
        fetch_resource::<Project>(self.context(), relative_id).await
    }

    /// The one project with this external id
    async fn by_external_id(&self, external_id: &str) -> Result<Arc<dyn ProjectApi>> {
        let query = vec![("filter".to_string(), format!("externalId=={}", external_id))];
        let mut matches: Vec<Arc<dyn ProjectApi>> =
            stream_resources::<Project>(self.context(), self.api_path(), query)
                .try_collect()
                .await?;
        debug!("{} project(s) with external id {}", matches.len(), external_id);

        match matches.len() {
            0 => Err(Error::NotFound(format!(
                "No project with external id '{}'",
                external_id
            ))),
            1 => Ok(matches.remove(0)),
            n => Err(Error::Ambiguous(format!(
                "{} projects with external id '{}'",
                n, external_id
            ))),
        }
    }

    /// Create a project from a definition such as
    /// `{"name": "p", "type": "DEDUP", "unifiedDatasetName": "p_unified"}`
    async fn create(&self, definition: &Value) -> Result<Arc<dyn ProjectApi>> {
        let data: Value = self.context().post_json(self.api_path(), definition).await?;
        self.context().construct_from_json::<Project>(data)
    }
}

/// Default project collection
pub struct ProjectCollection {
    parts: ResourceParts,
}

impl FromParts for ProjectCollection {
    fn from_parts(parts: ResourceParts) -> Self {
        Self { parts }
    }
}

impl Resource for ProjectCollection {
    fn parts(&self) -> &ResourceParts {
        &self.parts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ProjectCollectionApi for ProjectCollection {}

extension_point!(ProjectCollection => ProjectCollectionApi);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassMapping;
    use crate::testing::mock_context;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_builds_projects_from_relative_ids() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/versioned/v1/projects");
            then.status(200).json_body(json!([
                {"relativeId": "projects/1", "name": "Customers", "type": "DEDUP"},
                {"relativeId": "projects/2", "name": "Parts", "type": "CATEGORIZATION"}
            ]));
        });

        let context = mock_context(&server, ClassMapping::new());
        let projects = context.construct::<ProjectCollection>(None, "projects");
        let all = projects.list().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].api_path(), "projects/1");
        assert_eq!(all[1].name(), Some("Parts"));
        assert!(all[1].as_categorization().is_ok());
    }

    #[tokio::test]
    async fn test_by_resource_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/versioned/v1/projects/1");
            then.status(200)
                .json_body(json!({"relativeId": "projects/1", "name": "Customers"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/versioned/v1/projects/2");
            then.status(404).body("Project 2 not found");
        });

        let context = mock_context(&server, ClassMapping::new());
        let projects = context.construct::<ProjectCollection>(None, "projects");
        let project = projects.by_resource_id("1").await.unwrap();

        mock.assert();
        assert_eq!(project.resource_id(), "1");
        assert_eq!(project.name(), Some("Customers"));

        let missing = projects.by_resource_id("2").await.unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_by_relative_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/versioned/v1/projects/4");
            then.status(200).json_body(json!({
                "relativeId": "projects/4",
                "name": "Suppliers",
                "type": "CATEGORIZATION"
            }));
        });

        let context = mock_context(&server, ClassMapping::new());
        let projects = context.construct::<ProjectCollection>(None, "projects");
        let project = projects.by_relative_id("projects/4").await.unwrap();

        mock.assert();
        assert!(project.as_any().is::<Project>());
        assert_eq!(project.api_path(), "projects/4");
        assert_eq!(project.resource_id(), "4");
        assert!(project.as_categorization().is_ok());
    }

    #[tokio::test]
    async fn test_by_external_id() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/versioned/v1/projects")
                .query_param("filter", "externalId==cust-1");
            then.status(200)
                .json_body(json!([{"relativeId": "projects/1", "externalId": "cust-1"}]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/versioned/v1/projects")
                .query_param("filter", "externalId==none");
            then.status(200).json_body(json!([]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/versioned/v1/projects")
                .query_param("filter", "externalId==dup");
            then.status(200).json_body(json!([
                {"relativeId": "projects/1", "externalId": "dup"},
                {"relativeId": "projects/2", "externalId": "dup"}
            ]));
        });

        let context = mock_context(&server, ClassMapping::new());
        let projects = context.construct::<ProjectCollection>(None, "projects");

        let project = projects.by_external_id("cust-1").await.unwrap();
        assert_eq!(project.api_path(), "projects/1");

        assert!(projects.by_external_id("none").await.unwrap_err().is_not_found());
        assert!(matches!(
            projects.by_external_id("dup").await.unwrap_err(),
            Error::Ambiguous(_)
        ));
    }

    #[tokio::test]
    async fn test_create() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/versioned/v1/projects")
                .json_body(json!({"name": "New", "type": "DEDUP"}));
            then.status(201).json_body(json!({
                "relativeId": "projects/5",
                "name": "New",
                "type": "DEDUP"
            }));
        });

        let context = mock_context(&server, ClassMapping::new());
        let projects = context.construct::<ProjectCollection>(None, "projects");
        let project = projects
            .create(&json!({"name": "New", "type": "DEDUP"}))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(project.api_path(), "projects/5");
        assert!(project.as_mastering().is_ok());
    }
}
