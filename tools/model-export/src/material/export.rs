//! Editor material -> material record entry.

use std::str::FromStr;

use hashbrown::HashSet;
use model_common::formats::matl::{BlendFactor, BlendStateData, CullMode, FillMode, RasterizerStateData};
use model_common::{MatlData, MatlEntryData, MatlParam, ParamData, ParamId, ParamKind};

use super::table::{
    vector_layout, VectorArity, BLEND_ALPHA_TO_COVERAGE_SLOT, BLEND_DESTINATION_SLOT,
    BLEND_SOURCE_SLOT, RASTERIZER_CULL_SLOT, RASTERIZER_DEPTH_BIAS_SLOT, RASTERIZER_FILL_SLOT,
};
use super::{MATERIAL_NAME_SLOT, SHADER_LABEL_SLOT};
use crate::error::MaterialError;
use crate::report::{ConversionReport, EntityKind};
use crate::scene::{EditorMaterial, ShaderGraph, SlotValue};

fn parse_slot<T>(graph: &ShaderGraph, slot: &str) -> Result<T, MaterialError>
where
    T: FromStr<Err = model_common::formats::matl::ParseNameError>,
{
    graph
        .text(slot)?
        .parse()
        .map_err(|source| MaterialError::InvalidValue {
            slot: slot.to_string(),
            source,
        })
}

fn blend_state(graph: &ShaderGraph) -> Result<BlendStateData, MaterialError> {
    Ok(BlendStateData {
        source_color: parse_slot::<BlendFactor>(graph, BLEND_SOURCE_SLOT)?,
        destination_color: parse_slot::<BlendFactor>(graph, BLEND_DESTINATION_SLOT)?,
        alpha_sample_to_coverage: graph.bool(BLEND_ALPHA_TO_COVERAGE_SLOT)?,
    })
}

fn rasterizer_state(graph: &ShaderGraph) -> Result<RasterizerStateData, MaterialError> {
    Ok(RasterizerStateData {
        fill_mode: parse_slot::<FillMode>(graph, RASTERIZER_FILL_SLOT)?,
        cull_mode: parse_slot::<CullMode>(graph, RASTERIZER_CULL_SLOT)?,
        depth_bias: graph.float(RASTERIZER_DEPTH_BIAS_SLOT)?,
    })
}

/// Read a vector parameter back from its layout slots. `None` when it has no slots.
fn vector(graph: &ShaderGraph, param: ParamId) -> Result<Option<[f32; 4]>, MaterialError> {
    let Some(layout) = vector_layout(param) else {
        tracing::debug!("No shader graph slots for {}, skipping", param);
        return Ok(None);
    };

    let value = match layout.arity {
        VectorArity::Single => graph.color(&layout.slots[0])?,
        VectorArity::ColorAlpha => {
            let [x, y, z, _] = graph.color(&layout.slots[0])?;
            [x, y, z, graph.float(&layout.slots[1])?]
        }
        VectorArity::Components => {
            let mut value = [0.0; 4];
            for (component, slot) in value.iter_mut().zip(&layout.slots) {
                *component = graph.float(slot)?;
            }
            value
        }
    };
    Ok(Some(value))
}

/// Build a material entry from the visible slots of a material's shader graph.
///
/// Slots that are not parameter slots (labels, vertex colors, flags) are ignored.
pub fn export_material(material: &EditorMaterial) -> Result<MatlEntryData, MaterialError> {
    let graph = material
        .graph
        .as_ref()
        .ok_or_else(|| MaterialError::MissingShaderGraph(material.name.clone()))?;

    let mut entry = MatlEntryData::new(graph.text(MATERIAL_NAME_SLOT)?, graph.text(SHADER_LABEL_SLOT)?);
    let mut seen_vectors = HashSet::new();

    for slot in graph.visible_slots() {
        if slot.name == SHADER_LABEL_SLOT || slot.name == MATERIAL_NAME_SLOT {
            continue;
        }
        let Ok(id) = slot.param_name().parse::<ParamId>() else {
            continue;
        };

        let data = match id.kind() {
            ParamKind::BlendState if slot.name == BLEND_SOURCE_SLOT => {
                ParamData::BlendState(blend_state(graph)?)
            }
            ParamKind::RasterizerState if slot.name == RASTERIZER_FILL_SLOT => {
                ParamData::RasterizerState(rasterizer_state(graph)?)
            }
            ParamKind::Texture if slot.name == format!("{id} RGB") => {
                let SlotValue::Texture(node) = &slot.value else {
                    return Err(MaterialError::SlotType {
                        slot: slot.name.clone(),
                        expected: "texture",
                    });
                };
                let (Some(sampler), Some(sampler_id)) = (&node.sampler, id.paired_sampler()) else {
                    tracing::warn!(
                        "Material {:?}: {} has no sampler node, skipping the texture",
                        material.name,
                        id
                    );
                    continue;
                };
                entry
                    .parameters
                    .push(MatlParam::new(id, ParamData::Texture(node.image.clone())));
                entry
                    .parameters
                    .push(MatlParam::new(sampler_id, ParamData::Sampler(sampler.to_data())));
                continue;
            }
            ParamKind::CustomBoolean => match slot.value {
                SlotValue::Bool(value) => ParamData::Boolean(value),
                _ => {
                    return Err(MaterialError::SlotType {
                        slot: slot.name.clone(),
                        expected: "bool",
                    })
                }
            },
            ParamKind::CustomFloat => match slot.value {
                SlotValue::Float(value) => ParamData::Float(value),
                _ => {
                    return Err(MaterialError::SlotType {
                        slot: slot.name.clone(),
                        expected: "float",
                    })
                }
            },
            ParamKind::CustomVector if seen_vectors.insert(id) => match vector(graph, id)? {
                Some(value) => ParamData::Vector4(value),
                None => continue,
            },
            _ => continue,
        };
        entry.parameters.push(MatlParam::new(id, data));
    }

    Ok(entry)
}

/// Export every material, recording failures in `report`.
pub fn export_materials(materials: &[&EditorMaterial], report: &mut ConversionReport) -> MatlData {
    let mut matl = MatlData::default();
    for material in materials {
        match export_material(material) {
            Ok(entry) => {
                report.record_success();
                matl.entries.push(entry);
            }
            Err(e) => report.record_failure(EntityKind::Material, material.name.clone(), &e),
        }
    }
    tracing::info!("Exported {} material entries", matl.entries.len());
    matl
}
