//! Categorization projects

use super::resource::ProjectApi;
use crate::models::machine_learning_model::{MachineLearningModel, MachineLearningModelApi};
use crate::registry::{extension_point, FromParts};
use crate::resource::{Resource, ResourceParts};
use std::any::Any;
use std::sync::Arc;

pub trait CategorizationProjectApi: ProjectApi {
    /// Model that learns from verified labels and categorizes unlabeled records
    fn model(&self) -> Arc<dyn MachineLearningModelApi> {
        self.context().construct::<MachineLearningModel>(
            None,
            self.parts().sub_path("categorizations/model"),
        )
    }
}

pub struct CategorizationProject {
    parts: ResourceParts,
}

impl FromParts for CategorizationProject {
    fn from_parts(parts: ResourceParts) -> Self {
        Self { parts }
    }
}

impl Resource for CategorizationProject {
    fn parts(&self) -> &ResourceParts {
        &self.parts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ProjectApi for CategorizationProject {}

impl CategorizationProjectApi for CategorizationProject {}

extension_point!(CategorizationProject => CategorizationProjectApi);
