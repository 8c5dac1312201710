//! # unify-client
//!
//! Client for the Unify REST API.
//! Remote resources (projects, datasets, models, operations) are thin
//! wrappers around endpoint paths.
//!
//! ## Features
//! - Replaceable resource types: a [`ClassMapping`] given at construction
//!   decides which concrete type the library builds for each resource
//! - Streaming collections and NDJSON record streams
//! - Operation polling with optional timeout

pub mod client;
pub mod context;
pub mod models;
pub mod registry;
pub mod resource;

#[cfg(test)]
pub(crate) mod testing;

// Client
pub use client::{Client, ClientBuilder};
pub use context::ClientContext;

// Class registry
pub use registry::{ClassMapping, ExtensionPoint, FromParts, ResolvedClass, Substitute};
pub use resource::{Resource, ResourceParts, ResourceStream};

// Resources
pub use models::{
    Attribute, AttributeApi, AttributeCollection, AttributeCollectionApi, CategorizationProject,
    CategorizationProjectApi, Dataset, DatasetApi, DatasetCollection, DatasetCollectionApi,
    MachineLearningModel, MachineLearningModelApi, MasteringProject, MasteringProjectApi,
    Operation, OperationApi, OperationOptions, OperationState, Project, ProjectApi,
    ProjectCollection, ProjectCollectionApi,
};

// Foundation re-exports
pub use unify_foundation::{Error, Result, UnifyConfig, UsernamePasswordAuth};
