//! Datasets

mod collection;
mod resource;

pub use collection::{DatasetCollection, DatasetCollectionApi};
pub use resource::{Dataset, DatasetApi, RecordStream};
