//! Display lengths for imported bones.
//!
//! Lengths only change how bones are drawn; transforms never depend on them.

use glam::Vec3;
use hashbrown::HashMap;

use super::hierarchy::Hierarchy;

/// Length given to bones no rule applies to.
pub const DEFAULT_BONE_LENGTH: f32 = 1.0;

/// Limb bones measured to a named bone instead of a child.
const LIMB_TARGETS: [(&str, &str); 11] = [
    ("ArmL", "HandL"),
    ("ArmR", "HandR"),
    ("ShoulderL", "ArmL"),
    ("ShoulderR", "ArmR"),
    ("LegL", "KneeL"),
    ("LegR", "KneeR"),
    ("KneeL", "FootL"),
    ("KneeR", "FootR"),
    ("ClavicleC", "Neck"),
    ("FingerL10", "FingerL11"),
    ("FingerR10", "FingerR11"),
];

const FINGER_BASES: [&str; 6] = [
    "FingerL20",
    "FingerL30",
    "FingerL40",
    "FingerR20",
    "FingerR30",
    "FingerR40",
];

fn is_helper(name: &str) -> bool {
    name.starts_with("H_")
}

/// Named target for limb and finger base bones (`FingerL20` -> `FingerL21`).
fn limb_target(name: &str) -> Option<String> {
    if let Some((_, target)) = LIMB_TARGETS.iter().find(|(bone, _)| *bone == name) {
        return Some(target.to_string());
    }
    FINGER_BASES
        .contains(&name)
        .then(|| format!("{}1", &name[..name.len() - 1]))
}

/// Compute a length for every bone from its head position.
///
/// Rules, in traversal order so parents are final before children:
/// - helper bones keep the default
/// - leaves copy their parent's length
/// - a bone with exactly one non-helper child measures to that child unless
///   the heads coincide
/// - otherwise a `<name>_eff` child, then a named limb target, sets the length
pub fn bone_lengths(names: &[&str], hierarchy: &Hierarchy, heads: &[Vec3]) -> Vec<f32> {
    let index_of: HashMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();
    let mut lengths = vec![DEFAULT_BONE_LENGTH; names.len()];

    for &bone in hierarchy.order() {
        let name = names[bone];
        if is_helper(name) {
            continue;
        }

        let children = hierarchy.children(bone);
        if children.is_empty() {
            if let Some(parent) = hierarchy.parent(bone) {
                lengths[bone] = lengths[parent];
            }
            continue;
        }

        let distance_to = |other: usize| heads[bone].distance(heads[other]);

        let mut deforming = children.iter().copied().filter(|&c| !is_helper(names[c]));
        if let (Some(only), None) = (deforming.next(), deforming.next()) {
            if heads[bone] != heads[only] {
                lengths[bone] = distance_to(only);
            }
            continue;
        }

        let eff_name = format!("{name}_eff");
        if let Some(&eff) = children.iter().find(|&&c| names[c] == eff_name) {
            lengths[bone] = distance_to(eff);
        }

        if let Some(&target) = limb_target(name).and_then(|t| index_of.get(t.as_str())) {
            lengths[bone] = distance_to(target);
        }
    }

    lengths
}
