//! model-export library
//!
//! Converts fighter model folders (skeleton, mesh, material, model and
//! visibility records) to and from an editor scene description.

pub mod error;
pub mod images;
pub mod manifest;
pub mod material;
pub mod mesh;
pub mod model;
pub mod report;
pub mod scene;
pub mod shader_db;
pub mod skeleton;
pub mod transform;

// Re-export the records from model-common
pub use model_common::{MatlData, MeshData, MeshExData, ModlData, SkelData};

// Re-export error types
pub use error::{MaterialError, MeshError, SkeletonError};

// Re-export pipeline entry points
pub use model::{export_model, import_model, ExportOptions, ImportedModel, ModelFolder};
pub use report::{ConversionReport, EntityKind, ExportStatus};

// Re-export skeleton conversion types
pub use skeleton::{export_skeleton, import_skeleton, LinkMode};
