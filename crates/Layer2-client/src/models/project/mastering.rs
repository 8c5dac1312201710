//! Mastering projects
//!
//! The pair and cluster datasets hang off the project path and are built
//! without a payload; call `refresh` on them to regenerate their contents.

use super::resource::ProjectApi;
use crate::models::dataset::{Dataset, DatasetApi};
use crate::models::machine_learning_model::{MachineLearningModel, MachineLearningModelApi};
use crate::registry::{extension_point, FromParts};
use crate::resource::{Resource, ResourceParts};
use std::any::Any;
use std::sync::Arc;

pub trait MasteringProjectApi: ProjectApi {
    /// Record pairs generated by the binning model
    fn pairs(&self) -> Arc<dyn DatasetApi> {
        self.context()
            .construct::<Dataset>(None, self.parts().sub_path("recordPairs"))
    }

    /// Pair-matching model; predicting produces new unpublished clusters
    fn pair_matching_model(&self) -> Arc<dyn MachineLearningModelApi> {
        self.context().construct::<MachineLearningModel>(
            None,
            self.parts().sub_path("recordPairsWithPredictions/model"),
        )
    }

    /// Pairs whose labels would help the model learn fastest
    fn high_impact_pairs(&self) -> Arc<dyn DatasetApi> {
        self.context()
            .construct::<Dataset>(None, self.parts().sub_path("highImpactPairs"))
    }

    /// Unpublished record clusters
    fn record_clusters(&self) -> Arc<dyn DatasetApi> {
        self.context()
            .construct::<Dataset>(None, self.parts().sub_path("recordClusters"))
    }

    fn published_clusters(&self) -> Arc<dyn DatasetApi> {
        self.context()
            .construct::<Dataset>(None, self.parts().sub_path("publishedClusters"))
    }
}

/// Default mastering project wrapper
pub struct MasteringProject {
    parts: ResourceParts,
}

impl FromParts for MasteringProject {
    fn from_parts(parts: ResourceParts) -> Self {
        Self { parts }
    }
}

impl Resource for MasteringProject {
    fn parts(&self) -> &ResourceParts {
        &self.parts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ProjectApi for MasteringProject {}

impl MasteringProjectApi for MasteringProject {}

extension_point!(MasteringProject => MasteringProjectApi);
