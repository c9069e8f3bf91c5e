pub mod get;
pub mod video;
