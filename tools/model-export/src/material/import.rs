//! Material record entry -> editor material.

use model_common::{MatlEntryData, ParamData, ParamId, ParamKind};

use super::table::{
    vector_layout, VectorArity, BLEND_ALPHA_TO_COVERAGE_SLOT, BLEND_DESTINATION_SLOT,
    BLEND_SOURCE_SLOT, RASTERIZER_CULL_SLOT, RASTERIZER_DEPTH_BIAS_SLOT, RASTERIZER_FILL_SLOT,
};
use super::template::ShaderTemplate;
use super::{COLOR_SETS, MATERIAL_NAME_SLOT, SHADER_LABEL_SLOT, USE_CUSTOM_VECTOR_47_SLOT};
use crate::error::MaterialError;
use crate::images::ImageLibrary;
use crate::scene::{
    BlendMethod, ColorSpace, EditorMaterial, SamplerNode, ShaderGraph, SlotValue, TextureNode,
};
use crate::shader_db::ShaderAttributeLookup;

/// Shader label markers for alpha blended materials.
const ALPHA_BLEND_MARKERS: [&str; 3] = ["_far", "_sort", "_near"];

/// Textures sampled as non-color data.
const LINEAR_TEXTURES: [u32; 2] = [4, 6];

/// Collaborators shared by every material of one model.
pub struct MaterialImportContext<'a> {
    pub template: &'a ShaderTemplate,
    pub images: &'a ImageLibrary,
    pub shader_db: &'a dyn ShaderAttributeLookup,
}

fn uv_map(texture: ParamId) -> &'static str {
    match texture.index() {
        9 => "bake1",
        1 => "uvSet",
        _ => "map1",
    }
}

/// Set a slot if the graph has it. Parameters the template has no slot for are skipped.
fn show_and_set_if_present(
    graph: &mut ShaderGraph,
    name: &str,
    value: SlotValue,
) -> Result<(), MaterialError> {
    match graph.show_and_set(name, value) {
        Err(MaterialError::SlotNotFound(_)) => {
            tracing::debug!("Shader graph has no slot {:?}, skipping", name);
            Ok(())
        }
        result => result,
    }
}

fn set_vector(graph: &mut ShaderGraph, param: ParamId, [x, y, z, w]: [f32; 4]) -> Result<(), MaterialError> {
    let Some(layout) = vector_layout(param) else {
        tracing::debug!("No shader graph slots for {}, skipping", param);
        return Ok(());
    };

    match layout.arity {
        VectorArity::Single => {
            graph.show_and_set(&layout.slots[0], SlotValue::Color([x, y, z, w]))?;
        }
        VectorArity::ColorAlpha => {
            graph.show_and_set(&layout.slots[0], SlotValue::Color([x, y, z, 1.0]))?;
            graph.show_and_set(&layout.slots[1], SlotValue::Float(w))?;
        }
        VectorArity::Components => {
            for (slot, value) in layout.slots.iter().zip([x, y, z, w]) {
                graph.show_and_set(slot, SlotValue::Float(value))?;
            }
        }
    }

    if param.kind() == ParamKind::CustomVector && param.index() == 47 {
        graph.set(USE_CUSTOM_VECTOR_47_SLOT, SlotValue::Float(1.0))?;
    }
    Ok(())
}

fn set_texture(
    graph: &mut ShaderGraph,
    entry: &MatlEntryData,
    texture: ParamId,
    name: &str,
    images: &ImageLibrary,
) -> Result<(), MaterialError> {
    let sampler = texture.paired_sampler().and_then(|id| match entry.get(id) {
        Some(ParamData::Sampler(data)) => Some((id, data)),
        _ => None,
    });
    let Some((sampler_id, sampler)) = sampler else {
        tracing::warn!(
            "Material {:?} has no sampler for {}, skipping the texture",
            entry.material_label,
            texture
        );
        return Ok(());
    };

    let image = images.get(name).map_err(|reason| MaterialError::Image {
        texture: name.to_string(),
        reason,
    })?;

    let color_space = if LINEAR_TEXTURES.contains(&texture.index()) {
        ColorSpace::Linear
    } else {
        ColorSpace::Srgb
    };

    let node = TextureNode {
        image: image.name.clone(),
        uv_map: uv_map(texture).to_string(),
        color_space,
        sampler: Some(SamplerNode::from_data(sampler_id.to_string(), sampler)),
    };

    graph.show_param(&texture.to_string());
    graph.set(&format!("{texture} RGB"), SlotValue::Texture(node))?;
    graph.set(&format!("{texture} Alpha"), SlotValue::TextureAlpha(name.to_string()))?;
    Ok(())
}

/// Build an editor material named `name` from a material entry.
///
/// Unknown parameters are skipped. A texture without its sampler is skipped
/// with a warning; a texture whose image failed to load fails the material.
pub fn import_material(
    entry: &MatlEntryData,
    name: &str,
    context: &MaterialImportContext<'_>,
) -> Result<EditorMaterial, MaterialError> {
    let mut graph = context.template.instantiate(&entry.shader_label);
    graph.show_and_set(SHADER_LABEL_SLOT, SlotValue::Text(entry.shader_label.clone()))?;
    graph.show_and_set(MATERIAL_NAME_SLOT, SlotValue::Text(entry.material_label.clone()))?;

    for param in &entry.parameters {
        let id = param.param_id;
        match &param.data {
            ParamData::BlendState(data) => {
                graph.show_param(&id.to_string());
                show_and_set_if_present(&mut graph, BLEND_SOURCE_SLOT, SlotValue::Text(data.source_color.to_string()))?;
                show_and_set_if_present(
                    &mut graph,
                    BLEND_DESTINATION_SLOT,
                    SlotValue::Text(data.destination_color.to_string()),
                )?;
                show_and_set_if_present(
                    &mut graph,
                    BLEND_ALPHA_TO_COVERAGE_SLOT,
                    SlotValue::Bool(data.alpha_sample_to_coverage),
                )?;
            }
            ParamData::RasterizerState(data) => {
                graph.show_param(&id.to_string());
                show_and_set_if_present(&mut graph, RASTERIZER_FILL_SLOT, SlotValue::Text(data.fill_mode.to_string()))?;
                show_and_set_if_present(&mut graph, RASTERIZER_CULL_SLOT, SlotValue::Text(data.cull_mode.to_string()))?;
                show_and_set_if_present(&mut graph, RASTERIZER_DEPTH_BIAS_SLOT, SlotValue::Float(data.depth_bias))?;
            }
            ParamData::Boolean(value) => {
                show_and_set_if_present(&mut graph, &id.to_string(), SlotValue::Bool(*value))?;
            }
            ParamData::Float(value) => {
                show_and_set_if_present(&mut graph, &id.to_string(), SlotValue::Float(*value))?;
            }
            ParamData::Vector4(value) => set_vector(&mut graph, id, *value)?,
            ParamData::Texture(texture) => set_texture(&mut graph, entry, id, texture, context.images)?,
            // Samplers travel with their texture
            ParamData::Sampler(_) => {}
        }
    }

    let attributes = context.shader_db.vertex_attributes(&entry.shader_label);
    for color_set in COLOR_SETS {
        if attributes.iter().any(|a| a == color_set) {
            graph.show_param(color_set);
            graph.set(&format!("{color_set} RGB"), SlotValue::VertexColor(color_set.to_string()))?;
            graph.set(&format!("{color_set} Alpha"), SlotValue::VertexColor(color_set.to_string()))?;
        }
    }

    let blend_method = if ALPHA_BLEND_MARKERS.iter().any(|m| entry.shader_label.contains(m)) {
        BlendMethod::Blend
    } else {
        BlendMethod::Clip
    };

    Ok(EditorMaterial {
        name: name.to_string(),
        blend_method,
        backface_culling: true,
        graph: Some(graph),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ShaderSlot;
    use crate::shader_db::ShaderDatabase;
    use model_common::formats::matl::{BlendFactor, BlendStateData, SamplerData, WrapMode};
    use model_common::MatlParam;
    use std::path::Path;

    fn id(kind: ParamKind, index: u32) -> ParamId {
        ParamId::new(kind, index).unwrap()
    }

    fn import(entry: &MatlEntryData, db: &ShaderDatabase) -> Result<EditorMaterial, MaterialError> {
        let template = ShaderTemplate::master();
        let images = ImageLibrary::load(Path::new("/nonexistent"), entry.texture_names());
        let context = MaterialImportContext {
            template: &template,
            images: &images,
            shader_db: db,
        };
        import_material(entry, "mat", &context)
    }

    #[test]
    fn test_missing_slot_is_skipped() {
        let mut graph = ShaderGraph {
            name: "partial".into(),
            slots: vec![ShaderSlot::new("CustomFloat8", SlotValue::Float(0.0))],
        };
        graph.hide_all();
        let before = graph.clone();
        show_and_set_if_present(&mut graph, "CustomBoolean1", SlotValue::Bool(true)).unwrap();
        assert_eq!(graph, before);

        show_and_set_if_present(&mut graph, "CustomFloat8", SlotValue::Float(0.5)).unwrap();
        assert_eq!(graph.float("CustomFloat8").unwrap(), 0.5);
        assert!(!graph.slot("CustomFloat8").unwrap().hidden);
    }

    #[test]
    fn test_vector_distribution_by_arity() {
        let value = [0.25, 0.5, 0.75, 2.0];
        let mut entry = MatlEntryData::new("skin", "SFX_PBS_0100000008008269_opaque");
        for index in [1, 14, 0] {
            entry
                .parameters
                .push(MatlParam::new(id(ParamKind::CustomVector, index), ParamData::Vector4(value)));
        }
        let material = import(&entry, &ShaderDatabase::default()).unwrap();
        let graph = material.graph.unwrap();

        assert_eq!(graph.color("CustomVector1").unwrap(), value);

        assert_eq!(
            graph.color("CustomVector14 RGB (Rim Lighting Color)").unwrap(),
            [0.25, 0.5, 0.75, 1.0]
        );
        assert_eq!(graph.float("CustomVector14 Alpha (Rim Lighting Blend Factor)").unwrap(), 2.0);

        let components = [
            "CustomVector0 X (Min Texture Alpha)",
            "CustomVector0 Y (???)",
            "CustomVector0 Z (???)",
            "CustomVector0 W (???)",
        ];
        for (slot, expected) in components.iter().zip(value) {
            assert_eq!(graph.float(slot).unwrap(), expected);
            assert!(!graph.slot(slot).unwrap().hidden);
        }

        assert_eq!(graph.float(USE_CUSTOM_VECTOR_47_SLOT).unwrap(), 0.0);
    }

    #[test]
    fn test_custom_vector_47_flag() {
        let mut entry = MatlEntryData::new("skin", "SFX_PBS_0100000008008269_opaque");
        entry.parameters.push(MatlParam::new(
            id(ParamKind::CustomVector, 47),
            ParamData::Vector4([1.0, 0.0, 0.0, 0.5]),
        ));
        let graph = import(&entry, &ShaderDatabase::default()).unwrap().graph.unwrap();
        assert_eq!(graph.float(USE_CUSTOM_VECTOR_47_SLOT).unwrap(), 1.0);
        assert!(graph.slot(USE_CUSTOM_VECTOR_47_SLOT).unwrap().hidden);
    }

    #[test]
    fn test_labels_and_blend_state() {
        let mut entry = MatlEntryData::new("alp_hair", "SFX_PBS_0100000008008269_sort");
        entry.parameters.push(MatlParam::new(
            ParamId::BLEND_STATE0,
            ParamData::BlendState(BlendStateData {
                source_color: BlendFactor::SourceAlpha,
                destination_color: BlendFactor::OneMinusSourceAlpha,
                alpha_sample_to_coverage: true,
            }),
        ));
        let material = import(&entry, &ShaderDatabase::default()).unwrap();
        assert_eq!(material.blend_method, BlendMethod::Blend);
        assert!(material.backface_culling);

        let graph = material.graph.unwrap();
        assert_eq!(graph.name, "SFX_PBS_0100000008008269_sort");
        assert_eq!(graph.text(MATERIAL_NAME_SLOT).unwrap(), "alp_hair");
        assert_eq!(graph.text(BLEND_SOURCE_SLOT).unwrap(), "SourceAlpha");
        assert!(graph.bool(BLEND_ALPHA_TO_COVERAGE_SLOT).unwrap());
        let visible: Vec<_> = graph.visible_slots().map(|s| s.name.as_str()).collect();
        assert_eq!(
            visible,
            [
                SHADER_LABEL_SLOT,
                MATERIAL_NAME_SLOT,
                BLEND_SOURCE_SLOT,
                BLEND_DESTINATION_SLOT,
                BLEND_ALPHA_TO_COVERAGE_SLOT
            ]
        );
    }

    #[test]
    fn test_texture_with_sampler() {
        let sampler = SamplerData {
            wraps: WrapMode::ClampToEdge,
            ..Default::default()
        };
        let mut entry = MatlEntryData::new("skin", "SFX_PBS_0100000008008269_opaque");
        entry.parameters.push(MatlParam::new(
            id(ParamKind::Texture, 4),
            ParamData::Texture("alp_nor".into()),
        ));
        entry
            .parameters
            .push(MatlParam::new(id(ParamKind::Sampler, 4), ParamData::Sampler(sampler)));
        entry.parameters.push(MatlParam::new(
            id(ParamKind::Texture, 9),
            ParamData::Texture("alp_bake".into()),
        ));

        let graph = import(&entry, &ShaderDatabase::default()).unwrap().graph.unwrap();
        match &graph.expect_slot("Texture4 RGB").unwrap().value {
            SlotValue::Texture(node) => {
                assert_eq!(node.image, "alp_nor");
                assert_eq!(node.uv_map, "map1");
                assert_eq!(node.color_space, ColorSpace::Linear);
                let sampler_node = node.sampler.as_ref().unwrap();
                assert_eq!(sampler_node.label, "Sampler4");
                assert_eq!(sampler_node.wrap_s, WrapMode::ClampToEdge);
            }
            other => panic!("unexpected slot value {other:?}"),
        }
        assert_eq!(
            graph.expect_slot("Texture4 Alpha").unwrap().value,
            SlotValue::TextureAlpha("alp_nor".into())
        );

        // Texture9 has no sampler
        assert!(graph.slot("Texture9 RGB").unwrap().hidden);
    }

    #[test]
    fn test_broken_image_fails_material() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alp_col.png"), b"garbage").unwrap();

        let mut entry = MatlEntryData::new("skin", "SFX_PBS_0100000008008269_opaque");
        entry.parameters.push(MatlParam::new(
            id(ParamKind::Texture, 0),
            ParamData::Texture("alp_col".into()),
        ));
        entry.parameters.push(MatlParam::new(
            id(ParamKind::Sampler, 0),
            ParamData::Sampler(SamplerData::default()),
        ));

        let template = ShaderTemplate::master();
        let images = ImageLibrary::load(dir.path(), entry.texture_names());
        let db = ShaderDatabase::default();
        let context = MaterialImportContext {
            template: &template,
            images: &images,
            shader_db: &db,
        };
        assert!(matches!(
            import_material(&entry, "mat", &context),
            Err(MaterialError::Image { .. })
        ));
    }

    #[test]
    fn test_color_sets_from_shader_db() {
        let mut db = ShaderDatabase::default();
        db.insert("SFX_PBS_0100000008008269", vec!["colorSet5".into()]);
        let entry = MatlEntryData::new("skin", "SFX_PBS_0100000008008269_opaque");
        let graph = import(&entry, &db).unwrap().graph.unwrap();

        assert!(graph.slot("colorSet1 RGB").unwrap().hidden);
        assert_eq!(
            graph.expect_slot("colorSet5 Alpha").unwrap().value,
            SlotValue::VertexColor("colorSet5".into())
        );
        assert!(!graph.slot("colorSet5 RGB").unwrap().hidden);
    }
}
