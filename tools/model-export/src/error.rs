//! Error types for the converters.
//!
//! Skeleton errors are structural and abort a conversion. Mesh and material
//! errors fail a single entity; the pipeline records them in a
//! [`ConversionReport`](crate::report::ConversionReport) and moves on.

use model_common::formats::matl::ParseNameError;

#[derive(Debug, thiserror::Error)]
pub enum SkeletonError {
    #[error("bone {bone:?} references parent index {index}, but the skeleton has {count} bones")]
    ParentIndexOutOfRange {
        bone: String,
        index: usize,
        count: usize,
    },

    #[error("bone {bone:?} references missing parent {parent:?}")]
    MissingParent { bone: String, parent: String },

    #[error("bone hierarchy contains a cycle through {0:?}")]
    Cycle(String),

    #[error("duplicate bone name {0:?}")]
    DuplicateBone(String),

    #[error("no armature to export")]
    NoArmature,
}

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("mesh object {mesh:?} has no {attribute} data")]
    MissingAttribute {
        mesh: String,
        attribute: &'static str,
    },

    #[error("mesh object {mesh:?} has {count} vertex indices, which is not a multiple of 3")]
    NotTriangles { mesh: String, count: usize },

    #[error("mesh object {mesh:?} references vertex {index}, but has {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh object {mesh:?} attribute {attribute:?} has {found} values, expected {expected}")]
    AttributeLength {
        mesh: String,
        attribute: String,
        expected: usize,
        found: usize,
    },

    #[error("mesh object {0:?} has no material with a shader graph")]
    MissingMaterial(String),

    #[error("mesh object {mesh:?} uses material {label:?}, which failed to export")]
    MaterialNotExported { mesh: String, label: String },
}

#[derive(Debug, thiserror::Error)]
pub enum MaterialError {
    #[error("material {0:?} has no shader graph")]
    MissingShaderGraph(String),

    #[error("material label {0:?} has no entry in the material record")]
    MissingEntry(String),

    #[error("shader graph has no slot {0:?}")]
    SlotNotFound(String),

    #[error("slot {slot:?} does not hold a {expected} value")]
    SlotType {
        slot: String,
        expected: &'static str,
    },

    #[error("slot {slot:?}: {source}")]
    InvalidValue {
        slot: String,
        #[source]
        source: ParseNameError,
    },

    #[error("texture {texture:?} could not be loaded: {reason}")]
    Image { texture: String, reason: String },
}
