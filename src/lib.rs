pub mod algebra;
pub mod config;
pub mod error;
pub mod math;
pub mod operations;
pub mod topology;

pub use config::SurfaceConfig;
pub use error::{Result, UnfoldError};
pub use topology::Surface;
