//! Material conversion between material records and shader graphs.

mod export;
mod import;
mod table;
mod template;

pub use export::{export_material, export_materials};
pub use import::{import_material, MaterialImportContext};
pub use table::{
    vector_layout, vector_layouts, VectorArity, VectorLayout, BLEND_ALPHA_TO_COVERAGE_SLOT,
    BLEND_DESTINATION_SLOT, BLEND_SOURCE_SLOT, RASTERIZER_CULL_SLOT, RASTERIZER_DEPTH_BIAS_SLOT,
    RASTERIZER_FILL_SLOT, SLOT_SCHEMA_VERSION,
};
pub use template::{ShaderTemplate, MASTER_SHADER_NAME};

pub const SHADER_LABEL_SLOT: &str = "Shader Label";
pub const MATERIAL_NAME_SLOT: &str = "Material Name";
pub const USE_CUSTOM_VECTOR_47_SLOT: &str = "use_custom_vector_47";

/// Vertex color sets the shader graph can consume.
pub const COLOR_SETS: [&str; 2] = ["colorSet1", "colorSet5"];
