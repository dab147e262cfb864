//! Editor armature -> skeleton record.
//!
//! Without a reference skeleton, deforming bones are written in armature
//! order. With one, bones shared with the reference come first in reference
//! order so positional bone indices stay compatible, and the rest follow in
//! armature order.

use clap::ValueEnum;
use hashbrown::HashMap;
use model_common::{BoneData, SkelData};
use serde::{Deserialize, Serialize};

use super::hierarchy::Hierarchy;
use crate::error::SkeletonError;
use crate::scene::{EditorArmature, EditorBone};
use crate::transform::{mat4_to_record, unreorient};
use fighter_shared::Matrix4x4;

/// How a reference skeleton is used on export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LinkMode {
    /// Reference order, reference transforms for shared bones
    OrderAndValues,
    /// Reference order, transforms from the armature
    OrderOnly,
    /// Ignore the reference
    #[default]
    NoLink,
}

/// Parent-relative record transform for a bone from world matrices.
fn relative_transform(bone: &EditorBone, parent: Option<&EditorBone>) -> Matrix4x4 {
    match parent {
        Some(parent) => {
            let relative = parent.matrix.inverse() * bone.matrix;
            Matrix4x4::from_rows(unreorient(relative, true))
        }
        None => mat4_to_record(bone.matrix),
    }
}

/// Output bone order: indices into `armature.bones`.
fn output_order(
    armature: &EditorArmature,
    reference: Option<&SkelData>,
    mode: LinkMode,
) -> Vec<usize> {
    let deforming: Vec<usize> = (0..armature.bones.len())
        .filter(|&i| armature.bones[i].deform)
        .collect();

    let reference = match (reference, mode) {
        (Some(reference), LinkMode::OrderAndValues | LinkMode::OrderOnly) => reference,
        _ => return deforming,
    };

    let by_name: HashMap<&str, usize> = deforming
        .iter()
        .map(|&i| (armature.bones[i].name.as_str(), i))
        .collect();

    let mut placed = vec![false; armature.bones.len()];
    let mut order = Vec::with_capacity(deforming.len());
    for reference_bone in &reference.bones {
        if let Some(&i) = by_name.get(reference_bone.name.as_str()) {
            if !placed[i] {
                placed[i] = true;
                order.push(i);
            }
        }
    }
    order.extend(deforming.into_iter().filter(|&i| !placed[i]));
    order
}

/// Build a skeleton record from an editor armature.
///
/// Non-deforming bones are left out entirely. A bone whose parent is not part
/// of the output is a structural error.
pub fn export_skeleton(
    armature: &EditorArmature,
    reference: Option<&SkelData>,
    mode: LinkMode,
) -> Result<SkelData, SkeletonError> {
    // Reject cycles, duplicates and dangling parents before writing anything.
    let names: Vec<&str> = armature.bones.iter().map(|b| b.name.as_str()).collect();
    let parents: Vec<Option<&str>> = armature.bones.iter().map(|b| b.parent.as_deref()).collect();
    let hierarchy = Hierarchy::from_parent_names(&names, &parents)?;

    let order = output_order(armature, reference, mode);
    let output_index: HashMap<&str, u32> = order
        .iter()
        .enumerate()
        .map(|(out, &i)| (armature.bones[i].name.as_str(), out as u32))
        .collect();

    let reference_transforms: HashMap<&str, &Matrix4x4> = match (reference, mode) {
        (Some(reference), LinkMode::OrderAndValues) => reference
            .bones
            .iter()
            .map(|b| (b.name.as_str(), &b.transform))
            .collect(),
        _ => HashMap::new(),
    };

    let mut bones = Vec::with_capacity(order.len());
    for &i in &order {
        let bone = &armature.bones[i];
        let parent = hierarchy.parent(i).map(|p| &armature.bones[p]);

        let parent_index = match parent {
            Some(parent) => Some(*output_index.get(parent.name.as_str()).ok_or_else(|| {
                SkeletonError::MissingParent {
                    bone: bone.name.clone(),
                    parent: parent.name.clone(),
                }
            })?),
            None => None,
        };

        let transform = match reference_transforms.get(bone.name.as_str()) {
            Some(&&transform) => transform,
            None => relative_transform(bone, parent),
        };

        bones.push(BoneData {
            name: bone.name.clone(),
            transform,
            parent_index,
        });
    }

    let skipped = armature.bones.len() - bones.len();
    if skipped > 0 {
        tracing::info!("Skipped {} non-deforming bones", skipped);
    }
    tracing::info!("Exported skeleton: {} bones ({:?})", bones.len(), mode);

    Ok(SkelData { bones })
}
