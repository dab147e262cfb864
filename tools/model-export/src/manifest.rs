//! Conversion settings
//!
//! Parses model.toml. Every field is optional; CLI flags override it.
//!
//! ```toml
//! [import]
//! shader_db = "shaders.json"
//!
//! [export]
//! link = "order-and-values"
//! vanilla_skeleton = "vanilla/model.nusktb"
//!
//! [export.include]
//! visibility = false
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::skeleton::LinkMode;

/// Root manifest structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    /// JSON shader attribute database
    pub shader_db: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default)]
    pub link: LinkMode,
    pub vanilla_skeleton: Option<PathBuf>,
    #[serde(default)]
    pub include: IncludeFiles,
}

/// Record files written on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordFile {
    Mesh,
    Model,
    Skeleton,
    Material,
    Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncludeFiles {
    #[serde(default = "enabled")]
    pub mesh: bool,
    #[serde(default = "enabled")]
    pub model: bool,
    #[serde(default = "enabled")]
    pub skeleton: bool,
    #[serde(default = "enabled")]
    pub material: bool,
    #[serde(default = "enabled")]
    pub visibility: bool,
}

fn enabled() -> bool {
    true
}

impl Default for IncludeFiles {
    fn default() -> Self {
        Self {
            mesh: true,
            model: true,
            skeleton: true,
            material: true,
            visibility: true,
        }
    }
}

impl IncludeFiles {
    fn flag_mut(&mut self, file: RecordFile) -> &mut bool {
        match file {
            RecordFile::Mesh => &mut self.mesh,
            RecordFile::Model => &mut self.model,
            RecordFile::Skeleton => &mut self.skeleton,
            RecordFile::Material => &mut self.material,
            RecordFile::Visibility => &mut self.visibility,
        }
    }

    pub fn exclude(&mut self, file: RecordFile) {
        *self.flag_mut(file) = false;
    }

    pub fn includes(&self, file: RecordFile) -> bool {
        match file {
            RecordFile::Mesh => self.mesh,
            RecordFile::Model => self.model,
            RecordFile::Skeleton => self.skeleton,
            RecordFile::Material => self.material,
            RecordFile::Visibility => self.visibility,
        }
    }

    pub fn none(&self) -> bool {
        !(self.mesh || self.model || self.skeleton || self.material || self.visibility)
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    Ok(manifest)
}

/// Validate a manifest without converting anything
pub fn validate(manifest: &Manifest) -> Result<()> {
    if let Some(path) = &manifest.import.shader_db {
        if !path.exists() {
            anyhow::bail!("Shader database not found: {:?}", path);
        }
    }
    if let Some(path) = &manifest.export.vanilla_skeleton {
        if !path.exists() {
            anyhow::bail!("Vanilla skeleton not found: {:?}", path);
        }
    }
    if manifest.export.link != LinkMode::NoLink && manifest.export.vanilla_skeleton.is_none() {
        tracing::warn!(
            "Link mode {:?} has no vanilla_skeleton, bones will be written in armature order",
            manifest.export.link
        );
    }
    if manifest.export.include.none() {
        tracing::warn!("Every record file is excluded, export will write nothing");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_manifest_defaults() {
        let manifest: Manifest = toml::from_str("").unwrap();
        assert!(manifest.import.shader_db.is_none());
        assert_eq!(manifest.export.link, LinkMode::NoLink);
        assert_eq!(manifest.export.include, IncludeFiles::default());
    }

    #[test]
    fn test_full_manifest() {
        let manifest: Manifest = toml::from_str(
            r#"
            [import]
            shader_db = "shaders.json"

            [export]
            link = "order-only"
            vanilla_skeleton = "vanilla/model.nusktb"

            [export.include]
            visibility = false
            "#,
        )
        .unwrap();
        assert_eq!(manifest.import.shader_db, Some(PathBuf::from("shaders.json")));
        assert_eq!(manifest.export.link, LinkMode::OrderOnly);
        assert!(manifest.export.include.mesh);
        assert!(!manifest.export.include.includes(RecordFile::Visibility));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<Manifest>("[export]\nlnk = \"no-link\"").is_err());
        assert!(toml::from_str::<Manifest>("[export]\nlink = \"sometimes\"").is_err());
    }

    #[test]
    fn test_exclude() {
        let mut include = IncludeFiles::default();
        include.exclude(RecordFile::Material);
        assert!(!include.material);
        assert!(include.includes(RecordFile::Model));
        for file in [RecordFile::Mesh, RecordFile::Model, RecordFile::Skeleton, RecordFile::Visibility] {
            include.exclude(file);
        }
        assert!(include.none());
    }

    #[test]
    fn test_validate_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.toml");
        std::fs::write(&path, "[import]\nshader_db = \"/nonexistent/shaders.json\"\n").unwrap();
        let manifest = load_manifest(&path).unwrap();
        assert!(validate(&manifest).is_err());

        assert!(validate(&Manifest::default()).is_ok());
        assert!(load_manifest(&dir.path().join("missing.toml")).is_err());
    }
}
