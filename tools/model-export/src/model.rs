//! Whole-model conversion
//!
//! Ties the skeleton, mesh and material converters together for one model
//! folder. The skeleton is converted first since mesh weights and rigid binds
//! depend on it; materials are imported before meshes so mesh objects can be
//! assigned their editor material.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use fighter_shared::MODEL_FORMAT;
use hashbrown::HashMap;
use indexmap::IndexSet;
use model_common::{read_record, write_record, MatlData, MeshData, ModelRecord, ModlData, SkelData};

use crate::error::MaterialError;
use crate::images::ImageLibrary;
use crate::manifest::{IncludeFiles, RecordFile};
use crate::material::{export_materials, import_material, MaterialImportContext, ShaderTemplate};
use crate::mesh::{export_meshes, import_mesh_object, MeshImportContext};
use crate::report::{ConversionReport, EntityKind};
use crate::scene::{EditorMaterial, EditorMesh, EditorScene};
use crate::shader_db::ShaderAttributeLookup;
use crate::skeleton::{export_skeleton, import_skeleton, record_world_transforms, LinkMode};
use crate::SkeletonError;

/// Name given to the imported armature object.
pub const ARMATURE_NAME: &str = "model_import";

/// Record files found in a model folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFolder {
    pub dir: PathBuf,
    pub skeleton: Option<PathBuf>,
    pub mesh: Option<PathBuf>,
    pub material: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub mesh_ex: Option<PathBuf>,
    /// Recognized, never converted
    pub helper: Option<PathBuf>,
}

impl ModelFolder {
    /// Pick record files whose name contains the model stem, by extension.
    ///
    /// With several candidates for one extension the first by file name wins.
    pub fn discover(dir: &Path) -> Result<Self> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read model folder: {:?}", dir))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut folder = Self {
            dir: dir.to_path_buf(),
            ..Default::default()
        };
        for path in paths {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !file_name.contains(MODEL_FORMAT.stem) {
                continue;
            }
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_lowercase())
                .unwrap_or_default();

            let slot = match ext.as_str() {
                e if e == MODEL_FORMAT.skeleton_ext => &mut folder.skeleton,
                e if e == MODEL_FORMAT.mesh_ext => &mut folder.mesh,
                e if e == MODEL_FORMAT.material_ext => &mut folder.material,
                e if e == MODEL_FORMAT.model_ext => &mut folder.model,
                e if e == MODEL_FORMAT.mesh_ex_ext => &mut folder.mesh_ex,
                e if e == MODEL_FORMAT.helper_ext => &mut folder.helper,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(path);
            } else {
                tracing::debug!("Ignoring extra record file {:?}", path);
            }
        }
        Ok(folder)
    }
}

fn read_optional<R: ModelRecord>(path: Option<&Path>) -> Result<Option<R>> {
    path.map(|path| read_record(path).with_context(|| format!("Failed to read record: {:?}", path)))
        .transpose()
}

/// Scene built from a model folder plus what failed along the way.
#[derive(Debug)]
pub struct ImportedModel {
    pub scene: EditorScene,
    pub report: ConversionReport,
}

/// Import a model folder into a new scene.
///
/// Record I/O and skeleton errors abort. Materials and mesh objects that fail
/// are left out of the scene and listed in the report.
pub fn import_model(dir: &Path, shader_db: &dyn ShaderAttributeLookup) -> Result<ImportedModel> {
    let start = Instant::now();
    let folder = ModelFolder::discover(dir)?;
    if folder.helper.is_some() {
        tracing::info!("Helper bone records are not converted");
    }

    let skel: Option<SkelData> = read_optional(folder.skeleton.as_deref())?;
    let mesh: Option<MeshData> = read_optional(folder.mesh.as_deref())?;
    let matl: Option<MatlData> = read_optional(folder.material.as_deref())?;
    let modl: Option<ModlData> = read_optional(folder.model.as_deref())?;

    let mut scene = EditorScene::default();
    let mut report = ConversionReport::default();

    let mut bone_worlds = Vec::new();
    if let Some(skel) = &skel {
        scene.armature = Some(import_skeleton(skel, ARMATURE_NAME)?);
        bone_worlds = record_world_transforms(skel)?;
    } else {
        tracing::warn!("No skeleton in {:?}, meshes will not be skinned", dir);
    }

    let matl = matl.unwrap_or_default();
    let images = ImageLibrary::load(dir, matl.entries.iter().flat_map(|e| e.texture_names()));

    // Material labels in order of first use; without a model record, every entry
    let labels: IndexSet<&str> = match &modl {
        Some(modl) => modl.entries.iter().map(|e| e.material_label.as_str()).collect(),
        None => matl.entries.iter().map(|e| e.material_label.as_str()).collect(),
    };

    let template = ShaderTemplate::master();
    let context = MaterialImportContext {
        template: &template,
        images: &images,
        shader_db,
    };
    let mut material_names: HashMap<&str, String> = HashMap::new();
    for label in labels {
        let result = matl
            .find(label)
            .ok_or_else(|| MaterialError::MissingEntry(label.to_string()))
            .and_then(|entry| import_material(entry, &scene.unique_name(label), &context));
        match result {
            Ok(material) => {
                report.record_success();
                material_names.insert(label, material.name.clone());
                scene.materials.push(material);
            }
            Err(e) => report.record_failure(EntityKind::Material, label, &e),
        }
    }

    if let Some(mesh) = &mesh {
        let mesh_context = MeshImportContext {
            skel: skel.as_ref(),
            bone_worlds: &bone_worlds,
            armature: scene.armature.as_ref().map(|a| a.name.as_str()),
        };
        let mut imported = Vec::with_capacity(mesh.objects.len());
        for (index, object) in mesh.objects.iter().enumerate() {
            let material = modl
                .as_ref()
                .and_then(|modl| modl.material_label(&object.name, object.sub_index))
                .and_then(|label| material_names.get(label))
                .map(String::as_str);
            match import_mesh_object(object, &mesh_context, material, index) {
                Ok(mesh) => {
                    report.record_success();
                    imported.push(mesh);
                }
                Err(e) => report.record_failure(EntityKind::Mesh, object.name.clone(), &e),
            }
        }
        for mut mesh in imported {
            mesh.name = scene.unique_name(&mesh.name);
            scene.meshes.push(mesh);
        }
    }

    scene.images = images.into_images();

    tracing::info!(
        "Imported {} meshes and {} materials from {:?} in {:.2?}",
        scene.meshes.len(),
        scene.materials.len(),
        dir,
        start.elapsed()
    );
    Ok(ImportedModel { scene, report })
}

/// Export settings.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub link: LinkMode,
    /// Reference skeleton record for linked export
    pub vanilla_skeleton: Option<PathBuf>,
    pub include: IncludeFiles,
}

fn write_included<R: ModelRecord>(
    out_dir: &Path,
    include: &IncludeFiles,
    file: RecordFile,
    ext: &str,
    record: &R,
) -> Result<()> {
    if !include.includes(file) {
        tracing::debug!("Skipping {:?} record", file);
        return Ok(());
    }
    let path = out_dir.join(MODEL_FORMAT.file_name(ext));
    write_record(&path, record).with_context(|| format!("Failed to write record: {:?}", path))?;
    tracing::info!("Wrote {:?}", path);
    Ok(())
}

/// Export the scene's armature and its child meshes into `out_dir`.
///
/// Skeleton and I/O errors abort. Meshes and materials that fail are left out
/// of the records and listed in the returned report.
pub fn export_model(
    scene: &EditorScene,
    out_dir: &Path,
    options: &ExportOptions,
) -> Result<ConversionReport> {
    let start = Instant::now();
    let armature = scene.armature.as_ref().ok_or(SkeletonError::NoArmature)?;

    let vanilla: Option<SkelData> = read_optional(options.vanilla_skeleton.as_deref())?;
    if options.link != LinkMode::NoLink && vanilla.is_none() {
        tracing::warn!("Link mode {:?} without a vanilla skeleton, using armature order", options.link);
    }
    let skel = export_skeleton(armature, vanilla.as_ref(), options.link)?;

    let mut report = ConversionReport::default();
    let meshes: Vec<&EditorMesh> = scene.armature_children(&armature.name).collect();

    // Materials first: meshes whose material failed are dropped from the model
    let referenced: IndexSet<&str> = meshes.iter().filter_map(|m| m.material.as_deref()).collect();
    let materials: Vec<&EditorMaterial> = referenced
        .into_iter()
        .filter_map(|name| scene.material(name))
        .collect();
    let matl = export_materials(&materials, &mut report);
    let exported = export_meshes(&meshes, scene, &skel, &matl, &mut report);

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output folder: {:?}", out_dir))?;
    let include = &options.include;
    write_included(out_dir, include, RecordFile::Skeleton, MODEL_FORMAT.skeleton_ext, &skel)?;
    write_included(out_dir, include, RecordFile::Mesh, MODEL_FORMAT.mesh_ext, &exported.mesh)?;
    write_included(out_dir, include, RecordFile::Model, MODEL_FORMAT.model_ext, &exported.modl)?;
    write_included(out_dir, include, RecordFile::Material, MODEL_FORMAT.material_ext, &matl)?;
    write_included(
        out_dir,
        include,
        RecordFile::Visibility,
        MODEL_FORMAT.mesh_ex_ext,
        &exported.meshex,
    )?;

    tracing::info!("Exported model to {:?} in {:.2?}", out_dir, start.elapsed());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "model.nusktb",
            "model.numshb",
            "MODEL.NUMATB",
            "other.numdlb",
            "model.nuhlpb",
            "model.txt",
            "alp_col.png",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let folder = ModelFolder::discover(dir.path()).unwrap();
        assert_eq!(folder.skeleton, Some(dir.path().join("model.nusktb")));
        assert_eq!(folder.mesh, Some(dir.path().join("model.numshb")));
        // Stem match is case sensitive
        assert!(folder.material.is_none());
        assert!(folder.model.is_none());
        assert!(folder.helper.is_some());
        assert!(folder.mesh_ex.is_none());
    }

    #[test]
    fn test_discover_first_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("model_b.numshb"), b"").unwrap();
        fs::write(dir.path().join("model_a.numshb"), b"").unwrap();

        let folder = ModelFolder::discover(dir.path()).unwrap();
        assert_eq!(folder.mesh, Some(dir.path().join("model_a.numshb")));
    }

    #[test]
    fn test_discover_missing_folder() {
        assert!(ModelFolder::discover(Path::new("/nonexistent/model")).is_err());
    }

    #[test]
    fn test_export_requires_armature() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_model(&EditorScene::default(), dir.path(), &ExportOptions::default())
            .unwrap_err();
        assert!(err.downcast_ref::<SkeletonError>().is_some());
    }

    #[test]
    fn test_import_corrupt_record_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("model.nusktb"), b"garbage").unwrap();
        let db = crate::shader_db::ShaderDatabase::default();
        assert!(import_model(dir.path(), &db).is_err());
    }
}
