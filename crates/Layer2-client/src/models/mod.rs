//! Resource wrappers
//!
//! Each replaceable wrapper comes as a pair: an `*Api` trait carrying the
//! behavior as provided methods, and a default struct registered as an
//! extension point. Replacements implement the same trait and override what
//! they need.

pub mod attribute;
pub mod dataset;
pub mod machine_learning_model;
pub mod operation;
pub mod project;

pub use attribute::{Attribute, AttributeApi, AttributeCollection, AttributeCollectionApi};
pub use dataset::{Dataset, DatasetApi, DatasetCollection, DatasetCollectionApi};
pub use machine_learning_model::{MachineLearningModel, MachineLearningModelApi};
pub use operation::{Operation, OperationApi, OperationOptions, OperationState};
pub use project::{
    CategorizationProject, CategorizationProjectApi, MasteringProject, MasteringProjectApi,
    Project, ProjectApi, ProjectCollection, ProjectCollectionApi,
};
