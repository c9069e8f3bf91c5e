mod blob;
mod request_parameters;
mod resource_type;

pub use blob::*;
pub use request_parameters::*;
pub use resource_type::*;
