//! Model record (.numdlb)
//!
//! Binds each mesh object (name + sub-index) to a material label and names
//! the sibling files of the model folder.

use bitcode::{Decode, Encode};
use fighter_shared::MODEL_FORMAT;
use serde::{Deserialize, Serialize};

use super::ModelRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ModlEntryData {
    pub mesh_object_name: String,
    pub mesh_object_sub_index: u64,
    pub material_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ModlData {
    pub model_name: String,
    pub skeleton_file_name: String,
    pub material_file_names: Vec<String>,
    pub animation_file_name: Option<String>,
    pub mesh_file_name: String,
    pub entries: Vec<ModlEntryData>,
}

impl Default for ModlData {
    /// File names follow [`MODEL_FORMAT`]: `model.nusktb`, `model.numatb`, `model.numshb`.
    fn default() -> Self {
        Self {
            model_name: MODEL_FORMAT.stem.to_string(),
            skeleton_file_name: MODEL_FORMAT.file_name(MODEL_FORMAT.skeleton_ext),
            material_file_names: vec![MODEL_FORMAT.file_name(MODEL_FORMAT.material_ext)],
            animation_file_name: None,
            mesh_file_name: MODEL_FORMAT.file_name(MODEL_FORMAT.mesh_ext),
            entries: Vec::new(),
        }
    }
}

impl ModlData {
    /// Material label bound to a mesh object, if any.
    pub fn material_label(&self, mesh_object_name: &str, sub_index: u64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.mesh_object_name == mesh_object_name && e.mesh_object_sub_index == sub_index)
            .map(|e| e.material_label.as_str())
    }
}

impl ModelRecord for ModlData {
    const MAGIC: [u8; 4] = *b"LDOM";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_names() {
        let modl = ModlData::default();
        assert_eq!(modl.model_name, "model");
        assert_eq!(modl.skeleton_file_name, "model.nusktb");
        assert_eq!(modl.material_file_names, ["model.numatb"]);
        assert_eq!(modl.mesh_file_name, "model.numshb");
        assert!(modl.animation_file_name.is_none());
    }

    #[test]
    fn test_material_label_matches_sub_index() {
        let mut modl = ModlData::default();
        for (sub_index, label) in ["skin", "eye"].iter().enumerate() {
            modl.entries.push(ModlEntryData {
                mesh_object_name: "FaceN".into(),
                mesh_object_sub_index: sub_index as u64,
                material_label: label.to_string(),
            });
        }
        assert_eq!(modl.material_label("FaceN", 1), Some("eye"));
        assert_eq!(modl.material_label("FaceN", 2), None);
    }
}
