//! Mesh conversion between mesh records and editor meshes.

mod bounds;
mod export;
mod grouping;
mod import;
mod resample;
mod tangents;

pub use bounds::bounding_sphere;
pub use export::{export_mesh_object, export_meshes, ExportedMeshes};
pub use grouping::{group_by_true_name, pruned_name, true_name, SubIndexCounter};
pub use import::{import_mesh_object, MeshImportContext};
pub use resample::{per_corner_to_per_vertex, per_vertex_to_per_corner, uv_to_editor, uv_to_record};
pub use tangents::calculate_tangents;
