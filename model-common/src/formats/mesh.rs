//! Mesh record (.numshb)
//!
//! Per-vertex attribute buffers for every mesh object. Triangles only: the
//! index list has stride 3.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::ModelRecord;

/// Attribute buffer data with a fixed component count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum VectorData {
    Vector2(Vec<[f32; 2]>),
    Vector3(Vec<[f32; 3]>),
    Vector4(Vec<[f32; 4]>),
}

impl VectorData {
    pub fn len(&self) -> usize {
        match self {
            VectorData::Vector2(v) => v.len(),
            VectorData::Vector3(v) => v.len(),
            VectorData::Vector4(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn component_count(&self) -> usize {
        match self {
            VectorData::Vector2(_) => 2,
            VectorData::Vector3(_) => 3,
            VectorData::Vector4(_) => 4,
        }
    }

    /// First two components of every element.
    pub fn to_vec2(&self) -> Vec<[f32; 2]> {
        match self {
            VectorData::Vector2(v) => v.clone(),
            VectorData::Vector3(v) => v.iter().map(|p| [p[0], p[1]]).collect(),
            VectorData::Vector4(v) => v.iter().map(|p| [p[0], p[1]]).collect(),
        }
    }

    /// First three components, zero-filled.
    pub fn to_vec3(&self) -> Vec<[f32; 3]> {
        match self {
            VectorData::Vector2(v) => v.iter().map(|p| [p[0], p[1], 0.0]).collect(),
            VectorData::Vector3(v) => v.clone(),
            VectorData::Vector4(v) => v.iter().map(|p| [p[0], p[1], p[2]]).collect(),
        }
    }

    /// Four components. Missing z is 0, missing w is 1.
    pub fn to_vec4(&self) -> Vec<[f32; 4]> {
        match self {
            VectorData::Vector2(v) => v.iter().map(|p| [p[0], p[1], 0.0, 1.0]).collect(),
            VectorData::Vector3(v) => v.iter().map(|p| [p[0], p[1], p[2], 1.0]).collect(),
            VectorData::Vector4(v) => v.clone(),
        }
    }
}

/// A named attribute buffer (e.g., "Position0", "map1", "colorSet1").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct AttributeData {
    pub name: String,
    pub data: VectorData,
}

impl AttributeData {
    pub fn new(name: impl Into<String>, data: VectorData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct VertexWeight {
    pub vertex_index: u32,
    pub vertex_weight: f32,
}

/// Skin weights for one bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct BoneInfluence {
    pub bone_name: String,
    pub vertex_weights: Vec<VertexWeight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MeshObjectData {
    pub name: String,
    /// Disambiguates objects sharing `name`, counted in record order
    pub sub_index: u64,
    /// Rigid bind target; excludes `bone_influences`
    pub parent_bone_name: Option<String>,
    pub vertex_indices: Vec<u32>,
    pub positions: Vec<AttributeData>,
    pub normals: Vec<AttributeData>,
    pub tangents: Vec<AttributeData>,
    pub texture_coordinates: Vec<AttributeData>,
    pub color_sets: Vec<AttributeData>,
    pub bone_influences: Vec<BoneInfluence>,
}

impl MeshObjectData {
    pub fn new(name: impl Into<String>, sub_index: u64) -> Self {
        Self {
            name: name.into(),
            sub_index,
            ..Default::default()
        }
    }

    /// Vertex count taken from the first position buffer.
    pub fn vertex_count(&self) -> usize {
        self.positions.first().map_or(0, |a| a.data.len())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MeshData {
    pub objects: Vec<MeshObjectData>,
}

impl ModelRecord for MeshData {
    const MAGIC: [u8; 4] = *b"HSEM";
}
