//! Shared types for fighter model tooling.
//!
//! Everything here is plain data: the row-storage matrix used by the binary
//! records and the table of model file extensions.

pub mod math;
pub mod model_format;

pub use math::Matrix4x4;
pub use model_format::{MODEL_FORMAT, ModelFormat};
