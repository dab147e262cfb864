//! Visibility record (.numshexb)
//!
//! One bounding sphere for the whole model, one per mesh-object group and one
//! entry per mesh object. `file_length` is the encoded size of the record
//! itself, so it is filled in by [`MeshExData::measure_file_length`].

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::{ModelRecord, RecordCodec};

/// Upper bound on re-encoding passes before giving up on a fixed point.
const MAX_LENGTH_PASSES: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct BoundingSphere {
    pub center: [f32; 3],
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct AllData {
    pub bounding_sphere: BoundingSphere,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MeshObjectGroupData {
    pub bounding_sphere: BoundingSphere,
    /// First member's name with any `.NNN` suffix removed
    pub mesh_object_full_name: String,
    /// Group key ("true name")
    pub mesh_object_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MeshEntry {
    /// Index into [`MeshExData::mesh_object_groups`]
    pub mesh_object_index: u32,
    pub unk1: [f32; 3],
}

impl MeshEntry {
    pub fn new(mesh_object_index: u32) -> Self {
        Self {
            mesh_object_index,
            unk1: [0.0, 1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct EntryFlags {
    pub bytes: [u8; 2],
}

impl Default for EntryFlags {
    fn default() -> Self {
        Self { bytes: [3, 0] }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MeshExData {
    pub file_length: u64,
    pub entry_count: u32,
    pub mesh_object_group_count: u32,
    pub all_data: AllData,
    pub mesh_object_groups: Vec<MeshObjectGroupData>,
    pub entries: Vec<MeshEntry>,
    pub entry_flags: Vec<EntryFlags>,
}

impl MeshExData {
    /// Build a record with counts derived from the inputs and `file_length` unset.
    pub fn new(
        all_sphere: BoundingSphere,
        mesh_object_groups: Vec<MeshObjectGroupData>,
        entries: Vec<MeshEntry>,
    ) -> Self {
        let entry_flags = vec![EntryFlags::default(); entries.len()];
        Self {
            file_length: 0,
            entry_count: entries.len() as u32,
            mesh_object_group_count: mesh_object_groups.len() as u32,
            all_data: AllData {
                bounding_sphere: all_sphere,
                name: "All".to_string(),
            },
            mesh_object_groups,
            entries,
            entry_flags,
        }
    }

    /// Encode, store the encoded size and repeat until the size stops changing.
    ///
    /// Returns the final length.
    pub fn measure_file_length<C: RecordCodec>(&mut self, codec: &C) -> u64 {
        for _ in 0..MAX_LENGTH_PASSES {
            let length = codec.encode(self).len() as u64;
            if length == self.file_length {
                break;
            }
            self.file_length = length;
        }
        self.file_length
    }
}

impl ModelRecord for MeshExData {
    const MAGIC: [u8; 4] = *b"MSHX";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::BitcodeCodec;

    fn sample() -> MeshExData {
        let sphere = BoundingSphere {
            center: [0.0, 10.0, 0.0],
            radius: 12.5,
        };
        MeshExData::new(
            sphere,
            vec![MeshObjectGroupData {
                bounding_sphere: sphere,
                mesh_object_full_name: "BodyShape".into(),
                mesh_object_name: "Body".into(),
            }],
            vec![MeshEntry::new(0), MeshEntry::new(0)],
        )
    }

    #[test]
    fn test_counts_and_defaults() {
        let data = sample();
        assert_eq!(data.entry_count, 2);
        assert_eq!(data.mesh_object_group_count, 1);
        assert_eq!(data.all_data.name, "All");
        assert_eq!(data.entries[0].unk1, [0.0, 1.0, 0.0]);
        assert_eq!(data.entry_flags, vec![EntryFlags { bytes: [3, 0] }; 2]);
    }

    #[test]
    fn test_file_length_matches_encoded_size() {
        let mut data = sample();
        let length = data.measure_file_length(&BitcodeCodec);
        assert_eq!(length, BitcodeCodec.encode(&data).len() as u64);
        assert_eq!(data.file_length, length);
    }
}
