//! Skeleton record (.nusktb)
//!
//! Ordered bone list. The position of a bone in `bones` is its index for every
//! other record. Parents may appear after their children.

use bitcode::{Decode, Encode};
use fighter_shared::Matrix4x4;
use serde::{Deserialize, Serialize};

use super::ModelRecord;

/// One bone with a parent-relative transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct BoneData {
    pub name: String,
    /// Parent-relative transform in record layout (translation in `rows[3]`)
    pub transform: Matrix4x4,
    /// Index into [`SkelData::bones`], `None` for roots
    pub parent_index: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SkelData {
    pub bones: Vec<BoneData>,
}

impl SkelData {
    pub fn find(&self, name: &str) -> Option<&BoneData> {
        self.bones.iter().find(|b| b.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }
}

impl ModelRecord for SkelData {
    const MAGIC: [u8; 4] = *b"LEKS";
}
