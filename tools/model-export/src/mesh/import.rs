//! Mesh record object -> editor mesh.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};
use model_common::{MeshObjectData, SkelData};

use super::resample::{per_vertex_to_per_corner, uv_to_editor};
use crate::error::MeshError;
use crate::scene::{ColorLayer, EditorMesh, GroupWeight, UvLayer, VertexGroup};

/// Skeleton state shared by every mesh object of one model.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshImportContext<'a> {
    pub skel: Option<&'a SkelData>,
    /// World transforms in record convention, indexed like `skel.bones`
    pub bone_worlds: &'a [Mat4],
    /// Armature object meshes are parented to
    pub armature: Option<&'a str>,
}

/// Check index and attribute buffer shapes before touching any data.
fn validate(object: &MeshObjectData) -> Result<usize, MeshError> {
    let mesh = || object.name.clone();

    let positions = object.positions.first().ok_or_else(|| MeshError::MissingAttribute {
        mesh: mesh(),
        attribute: "position",
    })?;
    let vertex_count = positions.data.len();

    if object.vertex_indices.len() % 3 != 0 {
        return Err(MeshError::NotTriangles {
            mesh: mesh(),
            count: object.vertex_indices.len(),
        });
    }
    if let Some(&index) = object
        .vertex_indices
        .iter()
        .find(|&&i| i as usize >= vertex_count)
    {
        return Err(MeshError::IndexOutOfRange {
            mesh: mesh(),
            index,
            vertex_count,
        });
    }
    if object.normals.is_empty() {
        return Err(MeshError::MissingAttribute {
            mesh: mesh(),
            attribute: "normal",
        });
    }

    let buffers = object
        .normals
        .iter()
        .chain(&object.texture_coordinates)
        .chain(&object.color_sets);
    for attribute in buffers {
        if attribute.data.len() != vertex_count {
            return Err(MeshError::AttributeLength {
                mesh: mesh(),
                attribute: attribute.name.clone(),
                expected: vertex_count,
                found: attribute.data.len(),
            });
        }
    }

    Ok(vertex_count)
}

/// Set `weight` for `vertex`, replacing an earlier weight for the same vertex.
fn replace_weight(group: &mut VertexGroup, vertex: u32, weight: f32) {
    match group.weights.iter_mut().find(|w| w.vertex == vertex) {
        Some(existing) => existing.weight = weight,
        None => group.weights.push(GroupWeight { vertex, weight }),
    }
}

/// Build vertex groups and the bind placement for a skinned or rigid object.
fn bind(
    object: &MeshObjectData,
    vertex_count: usize,
    skel: &SkelData,
    bone_worlds: &[Mat4],
) -> Result<(Vec<VertexGroup>, Option<String>, Mat4), MeshError> {
    let mut groups: Vec<VertexGroup> = skel
        .bones
        .iter()
        .map(|b| VertexGroup {
            name: b.name.clone(),
            weights: Vec::new(),
        })
        .collect();

    let parent_bone = object.parent_bone_name.as_deref().and_then(|name| {
        let index = skel.index_of(name);
        if index.is_none() {
            tracing::warn!(
                "Mesh object {:?} parent bone {:?} is not in the skeleton",
                object.name,
                name
            );
        }
        index
    });

    let placement = match parent_bone {
        Some(bone) => {
            let mut used = vec![false; vertex_count];
            for &v in &object.vertex_indices {
                used[v as usize] = true;
            }
            groups[bone].weights = (0..vertex_count as u32)
                .filter(|&v| used[v as usize])
                .map(|vertex| GroupWeight { vertex, weight: 1.0 })
                .collect();
            bone_worlds.get(bone).copied().unwrap_or(Mat4::IDENTITY)
        }
        None => {
            for influence in &object.bone_influences {
                let Some(group) = groups.iter_mut().find(|g| g.name == influence.bone_name) else {
                    tracing::warn!(
                        "Mesh object {:?} has weights for bone {:?}, which is not in the skeleton",
                        object.name,
                        influence.bone_name
                    );
                    continue;
                };
                for w in &influence.vertex_weights {
                    if w.vertex_index as usize >= vertex_count {
                        return Err(MeshError::IndexOutOfRange {
                            mesh: object.name.clone(),
                            index: w.vertex_index,
                            vertex_count,
                        });
                    }
                    replace_weight(group, w.vertex_index, w.vertex_weight);
                }
            }
            Mat4::IDENTITY
        }
    };

    // Records are Y-up; stand the object up in the editor.
    let (scale, rotation, translation) = placement.to_scale_rotation_translation();
    let world = Mat4::from_rotation_x(FRAC_PI_2)
        * Mat4::from_scale_rotation_translation(scale, rotation, translation);

    let parent_bone = parent_bone.map(|i| skel.bones[i].name.clone());
    Ok((groups, parent_bone, world))
}

/// Convert one mesh object. `source_order` is its position in the mesh record.
pub fn import_mesh_object(
    object: &MeshObjectData,
    context: &MeshImportContext<'_>,
    material: Option<&str>,
    source_order: usize,
) -> Result<EditorMesh, MeshError> {
    let vertex_count = validate(object)?;
    let corners = &object.vertex_indices;

    let mut mesh = EditorMesh::new(object.name.clone());
    mesh.source_order = Some(source_order);
    mesh.material = material.map(str::to_string);
    mesh.parent = context.armature.map(str::to_string);

    mesh.positions = object.positions[0]
        .data
        .to_vec3()
        .into_iter()
        .map(Vec3::from)
        .collect();
    mesh.corner_vertices = corners.clone();

    let normals: Vec<Vec3> = object.normals[0].data.to_vec3().into_iter().map(Vec3::from).collect();
    mesh.corner_normals = per_vertex_to_per_corner(&normals, corners);

    mesh.uv_layers = object
        .texture_coordinates
        .iter()
        .map(|attribute| {
            let uvs: Vec<[f64; 2]> = attribute.data.to_vec2().into_iter().map(uv_to_editor).collect();
            UvLayer {
                name: attribute.name.clone(),
                uvs: per_vertex_to_per_corner(&uvs, corners),
            }
        })
        .collect();

    mesh.color_layers = object
        .color_sets
        .iter()
        .map(|attribute| ColorLayer {
            name: attribute.name.clone(),
            colors: per_vertex_to_per_corner(&attribute.data.to_vec4(), corners),
        })
        .collect();

    if let Some(skel) = context.skel {
        let (groups, parent_bone, world) = bind(object, vertex_count, skel, context.bone_worlds)?;
        mesh.vertex_groups = groups;
        mesh.parent_bone = parent_bone;
        mesh.world_matrix = world;
    }

    tracing::debug!(
        "Imported mesh object {:?}.{} ({} vertices, {} triangles)",
        object.name,
        object.sub_index,
        vertex_count,
        corners.len() / 3
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::mat4_to_record;
    use model_common::{AttributeData, BoneData, BoneInfluence, VectorData, VertexWeight};

    fn triangle() -> MeshObjectData {
        let mut object = MeshObjectData::new("BodyShape", 0);
        object.vertex_indices = vec![0, 1, 2];
        object.positions = vec![AttributeData::new(
            "Position0",
            VectorData::Vector3(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
        )];
        object.normals = vec![AttributeData::new(
            "Normal0",
            VectorData::Vector4(vec![[0.0, 0.0, 1.0, 0.0]; 3]),
        )];
        object.texture_coordinates = vec![AttributeData::new(
            "map1",
            VectorData::Vector2(vec![[0.0, 0.25], [1.0, 0.5], [0.5, 1.0]]),
        )];
        object
    }

    fn skel() -> SkelData {
        SkelData {
            bones: vec![
                BoneData {
                    name: "Trans".into(),
                    transform: Default::default(),
                    parent_index: None,
                },
                BoneData {
                    name: "Head".into(),
                    transform: mat4_to_record(Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0))),
                    parent_index: Some(0),
                },
            ],
        }
    }

    #[test]
    fn test_uvs_are_flipped_per_corner() {
        let mesh = import_mesh_object(&triangle(), &MeshImportContext::default(), None, 3).unwrap();
        assert_eq!(mesh.uv_layers[0].uvs, vec![[0.0, 0.75], [1.0, 0.5], [0.5, 0.0]]);
        assert_eq!(mesh.corner_normals, vec![Vec3::Z; 3]);
        assert_eq!(mesh.source_order, Some(3));
        assert_eq!(mesh.world_matrix, Mat4::IDENTITY);
        assert!(mesh.vertex_groups.is_empty());
    }

    #[test]
    fn test_influences_replace_weights() {
        let mut object = triangle();
        object.bone_influences = vec![
            BoneInfluence {
                bone_name: "Head".into(),
                vertex_weights: vec![
                    VertexWeight { vertex_index: 0, vertex_weight: 0.25 },
                    VertexWeight { vertex_index: 0, vertex_weight: 0.75 },
                ],
            },
            BoneInfluence {
                bone_name: "Missing".into(),
                vertex_weights: vec![VertexWeight { vertex_index: 1, vertex_weight: 1.0 }],
            },
        ];
        let skel = skel();
        let worlds = vec![Mat4::IDENTITY; 2];
        let context = MeshImportContext {
            skel: Some(&skel),
            bone_worlds: &worlds,
            armature: Some("model_import"),
        };
        let mesh = import_mesh_object(&object, &context, Some("skin"), 0).unwrap();

        let names: Vec<_> = mesh.vertex_groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Trans", "Head"]);
        assert_eq!(mesh.vertex_groups[1].weights, [GroupWeight { vertex: 0, weight: 0.75 }]);
        assert_eq!(mesh.parent.as_deref(), Some("model_import"));
        assert_eq!(mesh.material.as_deref(), Some("skin"));
        assert!(mesh.world_matrix.abs_diff_eq(Mat4::from_rotation_x(FRAC_PI_2), 1e-6));
    }

    #[test]
    fn test_rigid_bind_uses_bone_world() {
        let mut object = triangle();
        object.parent_bone_name = Some("Head".into());
        let skel = skel();
        let worlds = crate::skeleton::record_world_transforms(&skel).unwrap();
        let context = MeshImportContext {
            skel: Some(&skel),
            bone_worlds: &worlds,
            armature: None,
        };
        let mesh = import_mesh_object(&object, &context, None, 0).unwrap();

        assert_eq!(mesh.parent_bone.as_deref(), Some("Head"));
        assert_eq!(mesh.vertex_groups[1].weights.len(), 3);
        assert!(mesh.vertex_groups[1].weights.iter().all(|w| w.weight == 1.0));
        let expected =
            Mat4::from_rotation_x(FRAC_PI_2) * Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0));
        assert!(mesh.world_matrix.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_shape_errors() {
        let mut object = triangle();
        object.vertex_indices = vec![0, 1];
        assert!(matches!(
            import_mesh_object(&object, &MeshImportContext::default(), None, 0),
            Err(MeshError::NotTriangles { count: 2, .. })
        ));

        let mut object = triangle();
        object.vertex_indices = vec![0, 1, 9];
        assert!(matches!(
            import_mesh_object(&object, &MeshImportContext::default(), None, 0),
            Err(MeshError::IndexOutOfRange { index: 9, .. })
        ));

        let mut object = triangle();
        object.texture_coordinates[0].data = VectorData::Vector2(vec![[0.0; 2]]);
        assert!(matches!(
            import_mesh_object(&object, &MeshImportContext::default(), None, 0),
            Err(MeshError::AttributeLength { expected: 3, found: 1, .. })
        ));

        let mut object = triangle();
        object.positions.clear();
        assert!(matches!(
            import_mesh_object(&object, &MeshImportContext::default(), None, 0),
            Err(MeshError::MissingAttribute { attribute: "position", .. })
        ));
    }
}
