//! Editor meshes -> mesh, model and visibility records.

use std::time::Instant;

use glam::Vec3;
use hashbrown::HashSet;
use model_common::{
    AttributeData, BitcodeCodec, BoneInfluence, MeshData, MeshEntry, MeshExData, MeshObjectData,
    MatlData, MeshObjectGroupData, ModlData, ModlEntryData, SkelData, VectorData, VertexWeight,
};

use super::bounds::bounding_sphere;
use super::grouping::{group_by_true_name, pruned_name, SubIndexCounter};
use super::resample::{per_corner_to_per_vertex, uv_to_record};
use super::tangents::calculate_tangents;
use crate::error::MeshError;
use crate::material::MATERIAL_NAME_SLOT;
use crate::report::{ConversionReport, EntityKind};
use crate::scene::{EditorMesh, EditorScene};

/// Records produced from one set of editor meshes.
#[derive(Debug, Clone)]
pub struct ExportedMeshes {
    pub mesh: MeshData,
    pub modl: ModlData,
    pub meshex: MeshExData,
}

/// A mesh that converted, waiting for its sub-index.
struct Converted<'a> {
    source: &'a EditorMesh,
    material_label: String,
    object: MeshObjectData,
}

/// Material label of the mesh's material, read from its shader graph.
///
/// The label must name an entry of `matl` so no model entry points at a
/// material that failed to export.
fn material_label(
    mesh: &EditorMesh,
    scene: &EditorScene,
    matl: &MatlData,
) -> Result<String, MeshError> {
    let missing = || MeshError::MissingMaterial(mesh.name.clone());
    let graph = mesh
        .material
        .as_deref()
        .and_then(|name| scene.material(name))
        .and_then(|material| material.graph.as_ref())
        .ok_or_else(missing)?;
    let label = graph.text(MATERIAL_NAME_SLOT).map_err(|_| missing())?;
    if matl.find(label).is_none() {
        return Err(MeshError::MaterialNotExported {
            mesh: mesh.name.clone(),
            label: label.to_string(),
        });
    }
    Ok(label.to_string())
}

fn validate(mesh: &EditorMesh) -> Result<(), MeshError> {
    let corner_count = mesh.corner_vertices.len();
    let vertex_count = mesh.positions.len();
    let length_error = |attribute: &str, found: usize| MeshError::AttributeLength {
        mesh: mesh.name.clone(),
        attribute: attribute.to_string(),
        expected: corner_count,
        found,
    };

    if corner_count % 3 != 0 {
        return Err(MeshError::NotTriangles {
            mesh: mesh.name.clone(),
            count: corner_count,
        });
    }

    let weighted = mesh.vertex_groups.iter().flat_map(|g| &g.weights).map(|w| &w.vertex);
    if let Some(&index) = mesh
        .corner_vertices
        .iter()
        .chain(weighted)
        .find(|&&v| v as usize >= vertex_count)
    {
        return Err(MeshError::IndexOutOfRange {
            mesh: mesh.name.clone(),
            index,
            vertex_count,
        });
    }

    if mesh.corner_normals.len() != corner_count {
        return Err(length_error("normals", mesh.corner_normals.len()));
    }
    for layer in &mesh.uv_layers {
        if layer.uvs.len() != corner_count {
            return Err(length_error(&layer.name, layer.uvs.len()));
        }
    }
    for layer in &mesh.color_layers {
        if layer.colors.len() != corner_count {
            return Err(length_error(&layer.name, layer.colors.len()));
        }
    }
    Ok(())
}

fn bone_influences(mesh: &EditorMesh, skel_bones: &HashSet<&str>) -> Vec<BoneInfluence> {
    if mesh.vertex_groups.iter().all(|g| g.weights.is_empty()) {
        tracing::info!("Mesh {:?} has no weights, not assigning bone influences", mesh.name);
        return Vec::new();
    }

    mesh.vertex_groups
        .iter()
        .filter(|g| !g.weights.is_empty())
        .filter(|g| {
            let known = skel_bones.contains(g.name.as_str());
            if !known {
                tracing::warn!(
                    "Mesh {:?} vertex group {:?} is not a skeleton bone, dropping its weights",
                    mesh.name,
                    g.name
                );
            }
            known
        })
        .map(|g| BoneInfluence {
            bone_name: g.name.clone(),
            vertex_weights: g
                .weights
                .iter()
                .map(|w| VertexWeight {
                    vertex_index: w.vertex,
                    vertex_weight: w.weight,
                })
                .collect(),
        })
        .collect()
}

/// Convert one editor mesh. Name and sub-index are filled in later.
pub fn export_mesh_object(
    mesh: &EditorMesh,
    skel: &SkelData,
) -> Result<MeshObjectData, MeshError> {
    validate(mesh)?;

    let corners = &mesh.corner_vertices;
    let vertex_count = mesh.positions.len();
    let mut object = MeshObjectData::new(pruned_name(&mesh.name), 0);
    object.vertex_indices = corners.clone();

    let positions: Vec<[f32; 3]> = mesh.positions.iter().map(|p| p.to_array()).collect();

    let normals = per_corner_to_per_vertex(&mesh.corner_normals, corners, vertex_count);
    let normals3: Vec<[f32; 3]> = normals.iter().map(|n| n.to_array()).collect();
    object.normals = vec![AttributeData::new(
        "Normal0",
        VectorData::Vector4(normals.iter().map(|n| n.extend(0.0).to_array()).collect()),
    )];

    for layer in &mesh.uv_layers {
        let uvs: Vec<[f32; 2]> = per_corner_to_per_vertex(&layer.uvs, corners, vertex_count)
            .into_iter()
            .map(uv_to_record)
            .collect();
        object
            .texture_coordinates
            .push(AttributeData::new(layer.name.clone(), VectorData::Vector2(uvs)));
    }

    for layer in &mesh.color_layers {
        let colors = per_corner_to_per_vertex(&layer.colors, corners, vertex_count);
        object
            .color_sets
            .push(AttributeData::new(layer.name.clone(), VectorData::Vector4(colors)));
    }

    if let Some(uv0) = object.texture_coordinates.first() {
        let tangents = calculate_tangents(&positions, &normals3, &uv0.data.to_vec2(), corners);
        object.tangents = vec![AttributeData::new("Tangent0", VectorData::Vector4(tangents))];
    }

    object.positions = vec![AttributeData::new("Position0", VectorData::Vector3(positions))];

    let skel_bones: HashSet<&str> = skel.bones.iter().map(|b| b.name.as_str()).collect();
    match mesh.parent_bone.as_deref() {
        Some(bone) if skel_bones.contains(bone) => {
            object.parent_bone_name = Some(bone.to_string());
        }
        parent_bone => {
            if let Some(bone) = parent_bone {
                tracing::warn!(
                    "Mesh {:?} parent bone {:?} is not in the skeleton, using vertex weights",
                    mesh.name,
                    bone
                );
            }
            object.bone_influences = bone_influences(mesh, &skel_bones);
        }
    }

    Ok(object)
}

fn world_points(meshes: &[&EditorMesh]) -> Vec<Vec3> {
    meshes.iter().flat_map(|m| m.world_positions()).collect()
}

/// Convert meshes into mesh, model and visibility records.
///
/// Meshes are ordered by their position in the source mesh record, then scene order,
/// and grouped by true name; objects are written group by group so visibility
/// entries line up with mesh objects. Empty meshes are skipped. A mesh that
/// fails is recorded in `report` and left out of all three records.
pub fn export_meshes(
    meshes: &[&EditorMesh],
    scene: &EditorScene,
    skel: &SkelData,
    matl: &MatlData,
    report: &mut ConversionReport,
) -> ExportedMeshes {
    let start = Instant::now();

    let mut ordered: Vec<&EditorMesh> = meshes
        .iter()
        .copied()
        .filter(|m| {
            let empty = m.positions.is_empty();
            if empty {
                tracing::info!("Skipping empty mesh {:?}", m.name);
            }
            !empty
        })
        .collect();
    ordered.sort_by_key(|m| m.source_order.unwrap_or(usize::MAX));

    let mut converted = Vec::with_capacity(ordered.len());
    for mesh in ordered {
        let result = material_label(mesh, scene, matl)
            .and_then(|label| Ok((label, export_mesh_object(mesh, skel)?)));
        match result {
            Ok((material_label, object)) => {
                report.record_success();
                converted.push(Converted {
                    source: mesh,
                    material_label,
                    object,
                });
            }
            Err(e) => report.record_failure(EntityKind::Mesh, mesh.name.clone(), &e),
        }
    }

    let groups = group_by_true_name(converted, |c| c.source.name.as_str());

    let all: Vec<&EditorMesh> = groups.values().flatten().map(|c| c.source).collect();
    let all_sphere = bounding_sphere(&world_points(&all));

    let mut mesh_data = MeshData::default();
    let mut modl = ModlData::default();
    let mut group_data = Vec::with_capacity(groups.len());
    let mut entries = Vec::new();
    let mut sub_indices = SubIndexCounter::default();

    for (group_index, (true_name, members)) in groups.into_iter().enumerate() {
        let sources: Vec<&EditorMesh> = members.iter().map(|c| c.source).collect();
        group_data.push(MeshObjectGroupData {
            bounding_sphere: bounding_sphere(&world_points(&sources)),
            mesh_object_full_name: pruned_name(&sources[0].name).to_string(),
            mesh_object_name: true_name.to_string(),
        });

        for Converted {
            material_label,
            mut object,
            ..
        } in members
        {
            object.sub_index = sub_indices.next(&object.name);
            modl.entries.push(ModlEntryData {
                mesh_object_name: object.name.clone(),
                mesh_object_sub_index: object.sub_index,
                material_label,
            });
            entries.push(MeshEntry::new(group_index as u32));
            mesh_data.objects.push(object);
        }
    }

    let mut meshex = MeshExData::new(all_sphere, group_data, entries);
    meshex.measure_file_length(&BitcodeCodec);

    tracing::info!(
        "Exported {} mesh objects in {} groups in {:.2?}",
        mesh_data.objects.len(),
        meshex.mesh_object_group_count,
        start.elapsed()
    );

    ExportedMeshes {
        mesh: mesh_data,
        modl,
        meshex,
    }
}
