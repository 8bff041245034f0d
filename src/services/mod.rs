pub mod dataset_cache;

pub use dataset_cache::DatasetCache;
