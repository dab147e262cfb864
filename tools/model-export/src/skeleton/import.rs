//! Skeleton record -> editor armature.

use glam::Mat4;
use model_common::SkelData;

use super::hierarchy::Hierarchy;
use super::lengths::bone_lengths;
use crate::error::SkeletonError;
use crate::scene::{BoneGroup, EditorArmature, EditorBone};
use crate::transform::{compose_world, record_to_mat4, reorient, reorient_root};

/// Hierarchy of a skeleton record, validated.
pub fn record_hierarchy(skel: &SkelData) -> Result<Hierarchy, SkeletonError> {
    let names: Vec<&str> = skel.bones.iter().map(|b| b.name.as_str()).collect();
    let parents = skel
        .bones
        .iter()
        .map(|b| b.parent_index.map(|i| i as usize))
        .collect();
    Hierarchy::from_parent_indices(&names, parents)
}

/// World transforms in record convention (no reorientation), indexed like `skel.bones`.
///
/// Used to place rigidly bound meshes.
pub fn record_world_transforms(skel: &SkelData) -> Result<Vec<Mat4>, SkeletonError> {
    let hierarchy = record_hierarchy(skel)?;
    let mut world = vec![Mat4::IDENTITY; skel.bones.len()];
    for &i in hierarchy.order() {
        let local = record_to_mat4(&skel.bones[i].transform);
        world[i] = match hierarchy.parent(i) {
            Some(p) => compose_world(world[p], local),
            None => local,
        };
    }
    Ok(world)
}

/// Build an editor armature from a skeleton record.
///
/// Bones keep record order. World matrices are computed in hierarchy order,
/// so records listing children before parents import correctly.
pub fn import_skeleton(skel: &SkelData, name: &str) -> Result<EditorArmature, SkeletonError> {
    let hierarchy = record_hierarchy(skel)?;

    let mut world = vec![Mat4::IDENTITY; skel.bones.len()];
    for &i in hierarchy.order() {
        let rows = &skel.bones[i].transform.rows;
        world[i] = match hierarchy.parent(i) {
            Some(p) => compose_world(world[p], reorient(rows, true)),
            None => reorient_root(rows, true),
        };
    }

    let names: Vec<&str> = skel.bones.iter().map(|b| b.name.as_str()).collect();
    let heads: Vec<_> = world.iter().map(|m| m.w_axis.truncate()).collect();
    let lengths = bone_lengths(&names, &hierarchy, &heads);

    let bones = skel
        .bones
        .iter()
        .enumerate()
        .map(|(i, bone)| EditorBone {
            name: bone.name.clone(),
            parent: hierarchy.parent(i).map(|p| skel.bones[p].name.clone()),
            matrix: world[i],
            length: lengths[i],
            deform: true,
            group: BoneGroup::classify(&bone.name),
        })
        .collect();

    tracing::debug!(
        "Imported {} bones ({} roots)",
        skel.bones.len(),
        hierarchy.roots().len()
    );

    Ok(EditorArmature {
        name: name.to_string(),
        bones,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{mat4_to_record, ROOT_BASIS};
    use glam::Vec3;
    use model_common::BoneData;

    fn bone(name: &str, transform: Mat4, parent_index: Option<u32>) -> BoneData {
        BoneData {
            name: name.into(),
            transform: mat4_to_record(transform),
            parent_index,
        }
    }

    #[test]
    fn test_child_listed_before_parent() {
        let hip_local = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let skel = SkelData {
            bones: vec![
                bone("Hip", hip_local, Some(1)),
                bone("Trans", Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)), None),
            ],
        };
        let armature = import_skeleton(&skel, "rig").unwrap();

        assert_eq!(armature.bones[0].name, "Hip");
        assert_eq!(armature.bones[0].parent.as_deref(), Some("Trans"));
        assert_eq!(armature.bones[1].matrix, ROOT_BASIS);

        let expected = ROOT_BASIS * reorient(&mat4_to_record(hip_local).rows, true);
        assert!(armature.bones[0].matrix.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_structural_errors_abort() {
        let skel = SkelData {
            bones: vec![bone("Hip", Mat4::IDENTITY, Some(7))],
        };
        assert!(matches!(
            import_skeleton(&skel, "rig"),
            Err(SkeletonError::ParentIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_groups_and_deform() {
        let skel = SkelData {
            bones: vec![
                bone("Trans", Mat4::IDENTITY, None),
                bone("S_Hair1", Mat4::IDENTITY, Some(0)),
            ],
        };
        let armature = import_skeleton(&skel, "rig").unwrap();
        assert_eq!(armature.bones[0].group, BoneGroup::System);
        assert_eq!(armature.bones[1].group, BoneGroup::Swing);
        assert!(armature.bones.iter().all(|b| b.deform));
    }

    #[test]
    fn test_record_world_transforms() {
        let skel = SkelData {
            bones: vec![
                bone("Hip", Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)), Some(1)),
                bone("Trans", Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)), None),
            ],
        };
        let world = record_world_transforms(&skel).unwrap();
        assert!(world[0].abs_diff_eq(Mat4::from_translation(Vec3::new(2.0, 1.0, 0.0)), 1e-6));
    }
}
