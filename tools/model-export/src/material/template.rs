//! Master shader template.
//!
//! Every imported material gets its own copy of the template graph, with all
//! slots hidden until a parameter enables them.

use model_common::{ParamId, ParamKind};

use super::table::{
    vector_layouts, VectorArity, BLEND_ALPHA_TO_COVERAGE_SLOT, BLEND_DESTINATION_SLOT,
    BLEND_SOURCE_SLOT, RASTERIZER_CULL_SLOT, RASTERIZER_DEPTH_BIAS_SLOT, RASTERIZER_FILL_SLOT,
};
use super::{COLOR_SETS, MATERIAL_NAME_SLOT, SHADER_LABEL_SLOT, USE_CUSTOM_VECTOR_47_SLOT};
use crate::scene::{ShaderGraph, ShaderSlot, SlotValue};

/// Name of the master template graph.
pub const MASTER_SHADER_NAME: &str = "Fighter Master Shader";

#[derive(Debug, Clone, PartialEq)]
pub struct ShaderTemplate {
    graph: ShaderGraph,
}

impl ShaderTemplate {
    /// Template with a slot for every parameter the converter understands.
    pub fn master() -> Self {
        let mut slots = vec![
            ShaderSlot::new(SHADER_LABEL_SLOT, SlotValue::Text(String::new())),
            ShaderSlot::new(MATERIAL_NAME_SLOT, SlotValue::Text(String::new())),
            ShaderSlot::new(BLEND_SOURCE_SLOT, SlotValue::Text("One".into())),
            ShaderSlot::new(BLEND_DESTINATION_SLOT, SlotValue::Text("Zero".into())),
            ShaderSlot::new(BLEND_ALPHA_TO_COVERAGE_SLOT, SlotValue::Bool(false)),
            ShaderSlot::new(RASTERIZER_FILL_SLOT, SlotValue::Text("Solid".into())),
            ShaderSlot::new(RASTERIZER_CULL_SLOT, SlotValue::Text("Back".into())),
            ShaderSlot::new(RASTERIZER_DEPTH_BIAS_SLOT, SlotValue::Float(0.0)),
        ];

        let params = |kind: ParamKind| (0..kind.count()).filter_map(move |i| ParamId::new(kind, i));

        for texture in params(ParamKind::Texture) {
            slots.push(ShaderSlot::new(format!("{texture} RGB"), SlotValue::Empty));
            slots.push(ShaderSlot::new(format!("{texture} Alpha"), SlotValue::Empty));
        }
        for boolean in params(ParamKind::CustomBoolean) {
            slots.push(ShaderSlot::new(boolean.to_string(), SlotValue::Bool(false)));
        }
        for float in params(ParamKind::CustomFloat) {
            slots.push(ShaderSlot::new(float.to_string(), SlotValue::Float(0.0)));
        }

        for layout in vector_layouts().values() {
            match layout.arity {
                VectorArity::Single => {
                    slots.push(ShaderSlot::new(layout.slots[0].clone(), SlotValue::Color([0.0; 4])));
                }
                VectorArity::ColorAlpha => {
                    slots.push(ShaderSlot::new(layout.slots[0].clone(), SlotValue::Color([0.0; 4])));
                    slots.push(ShaderSlot::new(layout.slots[1].clone(), SlotValue::Float(0.0)));
                }
                VectorArity::Components => {
                    slots.extend(
                        layout
                            .slots
                            .iter()
                            .map(|name| ShaderSlot::new(name.clone(), SlotValue::Float(0.0))),
                    );
                }
            }
        }

        for color_set in COLOR_SETS {
            slots.push(ShaderSlot::new(format!("{color_set} RGB"), SlotValue::Empty));
            slots.push(ShaderSlot::new(format!("{color_set} Alpha"), SlotValue::Empty));
        }
        slots.push(ShaderSlot::new(USE_CUSTOM_VECTOR_47_SLOT, SlotValue::Float(0.0)));

        Self {
            graph: ShaderGraph {
                name: MASTER_SHADER_NAME.to_string(),
                slots,
            },
        }
    }

    pub fn graph(&self) -> &ShaderGraph {
        &self.graph
    }

    /// Fresh graph for one material, named after its shader, all slots hidden.
    pub fn instantiate(&self, shader_label: &str) -> ShaderGraph {
        let mut graph = self.graph.clone();
        graph.name = shader_label.to_string();
        graph.hide_all();
        graph
    }
}

impl Default for ShaderTemplate {
    fn default() -> Self {
        Self::master()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn test_slot_names_are_unique() {
        let template = ShaderTemplate::master();
        let mut seen = HashSet::new();
        for slot in &template.graph().slots {
            assert!(seen.insert(slot.name.as_str()), "duplicate slot {}", slot.name);
        }
    }

    #[test]
    fn test_instances_are_independent() {
        let template = ShaderTemplate::master();
        let mut a = template.instantiate("SFX_PBS_0100000008008269_opaque");
        a.show_and_set("CustomFloat8", SlotValue::Float(0.5)).unwrap();

        let b = template.instantiate("SFX_PBS_0000000000000080_sort");
        assert_eq!(b.float("CustomFloat8").unwrap(), 0.0);
        assert_eq!(b.visible_slots().count(), 0);
        assert_eq!(b.name, "SFX_PBS_0000000000000080_sort");
        assert_eq!(template.graph().name, MASTER_SHADER_NAME);
    }

    #[test]
    fn test_layout_order() {
        let template = ShaderTemplate::master();
        let names: Vec<&str> = template.graph().slots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(&names[..3], [SHADER_LABEL_SLOT, MATERIAL_NAME_SLOT, BLEND_SOURCE_SLOT]);
        assert_eq!(names.last(), Some(&USE_CUSTOM_VECTOR_47_SLOT));
        assert!(names.contains(&"Texture19 Alpha"));
        assert!(names.contains(&"CustomVector60"));
        assert!(!names.contains(&"CustomVector61"));
    }
}
