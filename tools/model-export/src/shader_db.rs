//! Shader program vertex attribute lookup.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hashbrown::HashMap;
use serde::Deserialize;

/// Length of a shader program name without its render pass suffix,
/// e.g. `SFX_PBS_0100000008008269` out of `SFX_PBS_0100000008008269_opaque`.
pub const PROGRAM_NAME_LEN: usize = 24;

/// Which vertex attributes a shader consumes.
pub trait ShaderAttributeLookup {
    /// Attribute names for a shader label. Unknown shaders give an empty list.
    fn vertex_attributes(&self, shader_label: &str) -> Vec<String>;
}

/// Strip the render pass suffix from a shader label.
pub fn program_name(shader_label: &str) -> &str {
    match shader_label.char_indices().nth(PROGRAM_NAME_LEN) {
        Some((end, _)) => &shader_label[..end],
        None => shader_label,
    }
}

/// Attribute table loaded from JSON: `{ "programs": { "<name>": ["colorSet1", ...] } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShaderDatabase {
    #[serde(default)]
    programs: HashMap<String, Vec<String>>,
}

impl ShaderDatabase {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read shader database: {:?}", path))?;
        let db: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse shader database: {:?}", path))?;
        tracing::info!("Loaded {} shader programs from {:?}", db.programs.len(), path);
        Ok(db)
    }

    pub fn insert(&mut self, program: impl Into<String>, attributes: Vec<String>) {
        self.programs.insert(program.into(), attributes);
    }
}

impl ShaderAttributeLookup for ShaderDatabase {
    fn vertex_attributes(&self, shader_label: &str) -> Vec<String> {
        self.programs
            .get(program_name(shader_label))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name() {
        assert_eq!(
            program_name("SFX_PBS_0100000008008269_opaque"),
            "SFX_PBS_0100000008008269"
        );
        assert_eq!(program_name("SFX_PBS_01"), "SFX_PBS_01");
        let wide = "Ä".repeat(30);
        assert_eq!(program_name(&wide), "Ä".repeat(24));
    }

    #[test]
    fn test_load_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shaders.json");
        fs::write(
            &path,
            r#"{ "programs": { "SFX_PBS_0100000008008269": ["Position0", "colorSet1"] } }"#,
        )
        .unwrap();

        let db = ShaderDatabase::load(&path).unwrap();
        assert_eq!(
            db.vertex_attributes("SFX_PBS_0100000008008269_sort"),
            ["Position0", "colorSet1"]
        );
        assert!(db.vertex_attributes("SFX_PBS_0000000000000080_opaque").is_empty());
    }

    #[test]
    fn test_malformed_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shaders.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(ShaderDatabase::load(&path).is_err());
        assert!(ShaderDatabase::load(&dir.path().join("missing.json")).is_err());
    }
}
