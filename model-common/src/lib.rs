//! Decoded record types for fighter model folders
//!
//! This crate provides the typed records shared between:
//! - `model-export` (conversion engine and CLI)
//! - tests that build model folders on disk
//!
//! # Modules
//!
//! - [`formats`] - Skeleton, mesh, material, model and visibility records plus the codec seam

pub mod formats;

// Re-export commonly used format items
pub use formats::{
    // Codec
    BitcodeCodec,
    CodecError,
    ModelRecord,
    RecordCodec,
    read_record,
    write_record,
    // Records
    AttributeData,
    BoneData,
    BoneInfluence,
    BoundingSphere,
    MatlData,
    MatlEntryData,
    MatlParam,
    MeshEntry,
    MeshData,
    MeshExData,
    MeshObjectData,
    MeshObjectGroupData,
    ModlData,
    ModlEntryData,
    ParamData,
    ParamId,
    ParamKind,
    SkelData,
    VectorData,
    VertexWeight,
};

pub use fighter_shared::{MODEL_FORMAT, Matrix4x4, ModelFormat};
