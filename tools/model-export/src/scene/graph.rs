//! Shader parameter graph.
//!
//! A material's graph is a list of named input slots. A slot name is
//! `"<ParamId> <SubField>"` (or just `"<ParamId>"`), and hidden slots carry no
//! meaning for the bound shader.

use model_common::formats::matl::{MagFilter, MaxAnisotropy, MinFilter, SamplerData, WrapMode};
use serde::{Deserialize, Serialize};

use crate::error::MaterialError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    #[default]
    Srgb,
    Linear,
}

/// Sampler node feeding a texture node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerNode {
    /// `SamplerN` label
    pub label: String,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub wrap_r: WrapMode,
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
    pub anisotropic_filtering: bool,
    /// Kept when filtering is off so the editor can toggle it back on
    pub max_anisotropy: MaxAnisotropy,
    pub border_color: [f32; 4],
    pub lod_bias: f32,
}

impl SamplerNode {
    pub fn from_data(label: impl Into<String>, data: &SamplerData) -> Self {
        Self {
            label: label.into(),
            wrap_s: data.wraps,
            wrap_t: data.wrapt,
            wrap_r: data.wrapr,
            min_filter: data.min_filter,
            mag_filter: data.mag_filter,
            anisotropic_filtering: data.max_anisotropy.is_some(),
            max_anisotropy: data.max_anisotropy.unwrap_or(MaxAnisotropy::One),
            border_color: data.border_color,
            lod_bias: data.lod_bias,
        }
    }

    pub fn to_data(&self) -> SamplerData {
        SamplerData {
            wraps: self.wrap_s,
            wrapt: self.wrap_t,
            wrapr: self.wrap_r,
            min_filter: self.min_filter,
            mag_filter: self.mag_filter,
            border_color: self.border_color,
            lod_bias: self.lod_bias,
            max_anisotropy: self.anisotropic_filtering.then_some(self.max_anisotropy),
        }
    }
}

/// Image texture node linked into a `TextureN RGB` slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureNode {
    /// Texture name, also the image key
    pub image: String,
    pub uv_map: String,
    #[serde(default)]
    pub color_space: ColorSpace,
    pub sampler: Option<SamplerNode>,
}

/// Value held by (or linked into) a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SlotValue {
    Empty,
    Text(String),
    Bool(bool),
    Float(f32),
    Color([f32; 4]),
    /// Color output of a texture node
    Texture(TextureNode),
    /// Alpha output of the named texture
    TextureAlpha(String),
    /// Vertex color layer output
    VertexColor(String),
}

impl SlotValue {
    pub fn kind(&self) -> &'static str {
        match self {
            SlotValue::Empty => "empty",
            SlotValue::Text(_) => "text",
            SlotValue::Bool(_) => "bool",
            SlotValue::Float(_) => "float",
            SlotValue::Color(_) => "color",
            SlotValue::Texture(_) => "texture",
            SlotValue::TextureAlpha(_) => "texture alpha",
            SlotValue::VertexColor(_) => "vertex color",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderSlot {
    pub name: String,
    pub hidden: bool,
    pub value: SlotValue,
}

impl ShaderSlot {
    pub fn new(name: impl Into<String>, value: SlotValue) -> Self {
        Self {
            name: name.into(),
            hidden: true,
            value,
        }
    }

    /// Leading token of the slot name (the parameter identity for parameter slots).
    pub fn param_name(&self) -> &str {
        self.name.split(' ').next().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShaderGraph {
    pub name: String,
    pub slots: Vec<ShaderSlot>,
}

impl ShaderGraph {
    pub fn slot(&self, name: &str) -> Option<&ShaderSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Slot that must exist.
    pub fn expect_slot(&self, name: &str) -> Result<&ShaderSlot, MaterialError> {
        self.slot(name)
            .ok_or_else(|| MaterialError::SlotNotFound(name.to_string()))
    }

    /// Visible slots in declaration order.
    pub fn visible_slots(&self) -> impl Iterator<Item = &ShaderSlot> {
        self.slots.iter().filter(|s| !s.hidden)
    }

    /// Show every slot whose leading token is `param_name`. Returns how many were shown.
    pub fn show_param(&mut self, param_name: &str) -> usize {
        let mut shown = 0;
        for slot in self.slots.iter_mut().filter(|s| s.param_name() == param_name) {
            slot.hidden = false;
            shown += 1;
        }
        shown
    }

    pub fn hide_all(&mut self) {
        for slot in &mut self.slots {
            slot.hidden = true;
        }
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut ShaderSlot, MaterialError> {
        self.slots
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| MaterialError::SlotNotFound(name.to_string()))
    }

    /// Replace a slot's value without changing its visibility.
    pub fn set(&mut self, name: &str, value: SlotValue) -> Result<(), MaterialError> {
        self.slot_mut(name)?.value = value;
        Ok(())
    }

    /// Set a slot's value and show it.
    pub fn show_and_set(&mut self, name: &str, value: SlotValue) -> Result<(), MaterialError> {
        let slot = self.slot_mut(name)?;
        slot.value = value;
        slot.hidden = false;
        Ok(())
    }

    pub fn text(&self, name: &str) -> Result<&str, MaterialError> {
        match &self.expect_slot(name)?.value {
            SlotValue::Text(s) => Ok(s),
            _ => Err(type_error(name, "text")),
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool, MaterialError> {
        match self.expect_slot(name)?.value {
            SlotValue::Bool(b) => Ok(b),
            _ => Err(type_error(name, "bool")),
        }
    }

    pub fn float(&self, name: &str) -> Result<f32, MaterialError> {
        match self.expect_slot(name)?.value {
            SlotValue::Float(f) => Ok(f),
            _ => Err(type_error(name, "float")),
        }
    }

    pub fn color(&self, name: &str) -> Result<[f32; 4], MaterialError> {
        match self.expect_slot(name)?.value {
            SlotValue::Color(c) => Ok(c),
            _ => Err(type_error(name, "color")),
        }
    }
}

fn type_error(slot: &str, expected: &'static str) -> MaterialError {
    MaterialError::SlotType {
        slot: slot.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> ShaderGraph {
        ShaderGraph {
            name: "SFX_PBS_0100000008008269_opaque".into(),
            slots: vec![
                ShaderSlot::new("CustomVector1", SlotValue::Color([0.0; 4])),
                ShaderSlot::new("CustomVector14 RGB (Rim Lighting Color)", SlotValue::Color([0.0; 4])),
                ShaderSlot::new("CustomVector14 Alpha (Rim Lighting Blend Factor)", SlotValue::Float(0.0)),
                ShaderSlot::new("CustomBoolean1", SlotValue::Bool(false)),
            ],
        }
    }

    #[test]
    fn test_show_param_matches_whole_token() {
        let mut graph = graph();
        assert_eq!(graph.show_param("CustomVector1"), 1);
        assert!(graph.slot("CustomVector14 RGB (Rim Lighting Color)").unwrap().hidden);
        assert_eq!(graph.show_param("CustomVector14"), 2);
        assert_eq!(graph.visible_slots().count(), 3);
    }

    #[test]
    fn test_typed_getters() {
        let mut graph = graph();
        graph.set("CustomBoolean1", SlotValue::Bool(true)).unwrap();
        assert!(graph.bool("CustomBoolean1").unwrap());
        assert!(matches!(
            graph.float("CustomBoolean1"),
            Err(MaterialError::SlotType { expected: "float", .. })
        ));
        assert!(matches!(
            graph.bool("CustomBoolean2"),
            Err(MaterialError::SlotNotFound(_))
        ));
    }

    #[test]
    fn test_sampler_node_anisotropy() {
        let mut data = SamplerData::default();
        let node = SamplerNode::from_data("Sampler0", &data);
        assert!(!node.anisotropic_filtering);
        assert_eq!(node.max_anisotropy, MaxAnisotropy::One);
        assert_eq!(node.to_data(), data);

        data.max_anisotropy = Some(MaxAnisotropy::Four);
        let node = SamplerNode::from_data("Sampler0", &data);
        assert!(node.anisotropic_filtering);
        assert_eq!(node.to_data(), data);
    }
}
