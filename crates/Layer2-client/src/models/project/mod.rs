//! Projects and their mastering / categorization views

mod categorization;
mod collection;
mod mastering;
mod resource;

pub use categorization::{CategorizationProject, CategorizationProjectApi};
pub use collection::{ProjectCollection, ProjectCollectionApi};
pub use mastering::{MasteringProject, MasteringProjectApi};
pub use resource::{Project, ProjectApi, CATEGORIZATION_TYPE, MASTERING_TYPE};
