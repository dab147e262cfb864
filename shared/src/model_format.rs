//! Model file format table.
//!
//! This module defines the `ModelFormat` struct which serves as the single source of truth
//! for the file names and extensions of a model folder.
//!
//! # Example
//!
//! ```
//! use fighter_shared::MODEL_FORMAT;
//!
//! assert_eq!(MODEL_FORMAT.mesh_ext, "numshb");
//! assert_eq!(MODEL_FORMAT.file_name(MODEL_FORMAT.skeleton_ext), "model.nusktb");
//! ```

/// File naming for one model folder.
#[derive(Debug, Clone, Copy)]
pub struct ModelFormat {
    /// File stem shared by every exported record (e.g., "model")
    pub stem: &'static str,

    /// Mesh geometry extension
    pub mesh_ext: &'static str,

    /// Skeleton extension
    pub skeleton_ext: &'static str,

    /// Material parameter extension
    pub material_ext: &'static str,

    /// Model (object to material binding) extension
    pub model_ext: &'static str,

    /// Visibility metadata extension
    pub mesh_ex_ext: &'static str,

    /// Helper bone extension. Recognized during discovery, never converted.
    pub helper_ext: &'static str,
}

impl ModelFormat {
    /// Create a new model format table.
    pub const fn new(
        stem: &'static str,
        mesh_ext: &'static str,
        skeleton_ext: &'static str,
        material_ext: &'static str,
        model_ext: &'static str,
        mesh_ex_ext: &'static str,
        helper_ext: &'static str,
    ) -> Self {
        Self {
            stem,
            mesh_ext,
            skeleton_ext,
            material_ext,
            model_ext,
            mesh_ex_ext,
            helper_ext,
        }
    }

    /// `<stem>.<ext>`
    pub fn file_name(&self, ext: &str) -> String {
        format!("{}.{}", self.stem, ext)
    }

    /// Every extension the converter reads or writes.
    pub fn record_extensions(&self) -> [&'static str; 5] {
        [
            self.mesh_ext,
            self.skeleton_ext,
            self.material_ext,
            self.model_ext,
            self.mesh_ex_ext,
        ]
    }
}

/// Fighter model folder layout.
///
/// - Records: `.numshb`, `.nusktb`, `.numatb`, `.numdlb`, `.numshexb`
/// - Helper bones: `.nuhlpb`
pub const MODEL_FORMAT: ModelFormat = ModelFormat::new(
    "model", "numshb", "nusktb", "numatb", "numdlb", "numshexb", "nuhlpb",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_format_extensions() {
        assert_eq!(MODEL_FORMAT.mesh_ext, "numshb");
        assert_eq!(MODEL_FORMAT.skeleton_ext, "nusktb");
        assert_eq!(MODEL_FORMAT.material_ext, "numatb");
        assert_eq!(MODEL_FORMAT.model_ext, "numdlb");
        assert_eq!(MODEL_FORMAT.mesh_ex_ext, "numshexb");
        assert_eq!(MODEL_FORMAT.helper_ext, "nuhlpb");
    }

    #[test]
    fn test_file_name_uses_stem() {
        assert_eq!(MODEL_FORMAT.file_name("numatb"), "model.numatb");
    }

    #[test]
    fn test_record_extensions_exclude_helper() {
        assert!(!MODEL_FORMAT.record_extensions().contains(&"nuhlpb"));
    }
}
