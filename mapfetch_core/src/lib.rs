//! Data types shared by the map resource fetch pipeline: byte blobs, resource types, request
//! parameters, the configuration collaborator and pure URL helpers.

pub mod config;
pub mod types;
pub mod utils;

pub use config::Config;
pub use types::*;
