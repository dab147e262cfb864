//! Editor scene description.
//!
//! A plain-data stand-in for the host editor's scene graph: one armature with
//! world-space bones, mesh objects authored per face corner, and materials
//! built around a shader parameter graph. The CLI stores scenes as JSON.

pub mod graph;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

pub use graph::{ColorSpace, SamplerNode, ShaderGraph, ShaderSlot, SlotValue, TextureNode};

/// Cosmetic bone grouping assigned from naming conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoneGroup {
    #[default]
    Default,
    Helper,
    Swing,
    System,
}

impl BoneGroup {
    const SYSTEM_NAMES: [&'static str; 3] = ["Trans", "Rot", "Throw"];
    const SYSTEM_SUFFIXES: [&'static str; 3] = ["_null", "_eff", "_offset"];

    /// Group for a bone name: `H_` helpers, `S_` swing bones (system when they
    /// carry `_null`), and the fixed system names and suffixes.
    pub fn classify(name: &str) -> Self {
        if name.starts_with("H_") {
            BoneGroup::Helper
        } else if name.starts_with("S_") {
            if name.contains("_null") {
                BoneGroup::System
            } else {
                BoneGroup::Swing
            }
        } else if Self::SYSTEM_NAMES.contains(&name)
            || Self::SYSTEM_SUFFIXES.iter().any(|s| name.contains(s))
        {
            BoneGroup::System
        } else {
            BoneGroup::Default
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorBone {
    pub name: String,
    pub parent: Option<String>,
    /// World-space bone matrix; the translation is the bone head
    pub matrix: Mat4,
    pub length: f32,
    pub deform: bool,
    #[serde(default)]
    pub group: BoneGroup,
}

impl EditorBone {
    pub fn head(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    /// Bone tail along the local Y axis.
    pub fn tail(&self) -> Vec3 {
        self.head() + self.matrix.y_axis.truncate().normalize_or_zero() * self.length
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorArmature {
    pub name: String,
    /// Insertion order; not necessarily parent before child
    pub bones: Vec<EditorBone>,
}

impl EditorArmature {
    pub fn bone(&self, name: &str) -> Option<&EditorBone> {
        self.bones.iter().find(|b| b.name == name)
    }
}

/// Per-corner UV coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvLayer {
    pub name: String,
    /// `f64` so the V flip round-trips record values exactly
    pub uvs: Vec<[f64; 2]>,
}

/// Per-corner RGBA colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorLayer {
    pub name: String,
    pub colors: Vec<[f32; 4]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupWeight {
    pub vertex: u32,
    pub weight: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexGroup {
    pub name: String,
    pub weights: Vec<GroupWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorMesh {
    pub name: String,
    /// Armature object this mesh is parented to
    pub parent: Option<String>,
    /// Rigid bind target bone
    #[serde(default)]
    pub parent_bone: Option<String>,
    pub world_matrix: Mat4,
    pub positions: Vec<Vec3>,
    /// Vertex index of each face corner, three corners per triangle
    pub corner_vertices: Vec<u32>,
    pub corner_normals: Vec<Vec3>,
    #[serde(default)]
    pub uv_layers: Vec<UvLayer>,
    #[serde(default)]
    pub color_layers: Vec<ColorLayer>,
    #[serde(default)]
    pub vertex_groups: Vec<VertexGroup>,
    pub material: Option<String>,
    /// Position in the mesh record this object was imported from
    #[serde(default)]
    pub source_order: Option<usize>,
}

impl EditorMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            parent_bone: None,
            world_matrix: Mat4::IDENTITY,
            positions: Vec::new(),
            corner_vertices: Vec::new(),
            corner_normals: Vec::new(),
            uv_layers: Vec::new(),
            color_layers: Vec::new(),
            vertex_groups: Vec::new(),
            material: None,
            source_order: None,
        }
    }

    /// World-space vertex positions.
    pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .iter()
            .map(|p| self.world_matrix.transform_point3(*p))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMethod {
    #[default]
    Clip,
    Blend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorMaterial {
    pub name: String,
    #[serde(default)]
    pub blend_method: BlendMethod,
    pub backface_culling: bool,
    pub graph: Option<ShaderGraph>,
}

/// Image resolved for a texture name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorImage {
    /// Texture name as referenced by materials
    pub name: String,
    /// Source file, `None` for placeholders
    pub source: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
}

impl EditorImage {
    pub fn is_placeholder(&self) -> bool {
        self.source.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorScene {
    pub armature: Option<EditorArmature>,
    #[serde(default)]
    pub meshes: Vec<EditorMesh>,
    #[serde(default)]
    pub materials: Vec<EditorMaterial>,
    #[serde(default)]
    pub images: Vec<EditorImage>,
}

impl EditorScene {
    pub fn material(&self, name: &str) -> Option<&EditorMaterial> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Mesh objects parented to the named armature object, in scene order.
    pub fn armature_children<'a>(
        &'a self,
        armature: &'a str,
    ) -> impl Iterator<Item = &'a EditorMesh> + 'a {
        self.meshes
            .iter()
            .filter(move |m| m.parent.as_deref() == Some(armature))
    }

    /// Object name not yet used by a mesh or material, using `.001` style suffixes.
    pub fn unique_name(&self, base: &str) -> String {
        let taken = |name: &str| {
            self.meshes.iter().any(|m| m.name == name)
                || self.materials.iter().any(|m| m.name == name)
        };
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{base}.{i:03}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("Failed to read scene: {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse scene: {:?}", path))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Failed to serialize scene")?;
        fs::write(path, text).with_context(|| format!("Failed to write scene: {:?}", path))
    }
}
