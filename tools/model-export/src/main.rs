//! model-export - fighter model interchange tool
//!
//! Converts model folders (.nusktb, .numshb, .numatb, .numdlb, .numshexb) to an
//! editor scene description and back.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use model_export::manifest::{self, Manifest, RecordFile};
use model_export::scene::EditorScene;
use model_export::shader_db::ShaderDatabase;
use model_export::{export_model, import_model, ExportOptions, LinkMode};

#[derive(Parser)]
#[command(name = "model-export")]
#[command(about = "Fighter model interchange tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a model folder into a scene file
    Import {
        /// Folder holding the model records
        folder: PathBuf,

        /// Output scene file
        #[arg(short, long, default_value = "scene.json")]
        output: PathBuf,

        /// Shader attribute database (overrides manifest)
        #[arg(long)]
        shader_db: Option<PathBuf>,

        /// Path to model.toml manifest
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Export a scene file into a model folder
    Export {
        /// Input scene file
        scene: PathBuf,

        /// Output folder
        #[arg(short, long)]
        output: PathBuf,

        /// Reference skeleton for linked export (overrides manifest)
        #[arg(long)]
        vanilla: Option<PathBuf>,

        /// How the reference skeleton is used (overrides manifest)
        #[arg(long, value_enum)]
        link: Option<LinkMode>,

        /// Record files to leave out
        #[arg(long, value_enum)]
        exclude: Vec<RecordFile>,

        /// Path to model.toml manifest
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Validate manifest without converting
    Check {
        /// Path to model.toml manifest
        #[arg(default_value = "model.toml")]
        manifest: PathBuf,
    },
}

fn load_optional_manifest(path: Option<&PathBuf>) -> Result<Manifest> {
    match path {
        Some(path) => manifest::load_manifest(path),
        None => Ok(Manifest::default()),
    }
}

fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            folder,
            output,
            shader_db,
            manifest,
        } => {
            let config = load_optional_manifest(manifest.as_ref())?;
            let db = match shader_db.or(config.import.shader_db) {
                Some(path) => ShaderDatabase::load(&path)?,
                None => ShaderDatabase::default(),
            };

            tracing::info!("Importing {:?} -> {:?}", folder, output);
            let imported = import_model(&folder, &db)?;
            imported.scene.save(&output)?;
            imported.report.log_summary();
            Ok(imported.report.status().exit_code())
        }

        Commands::Export {
            scene,
            output,
            vanilla,
            link,
            exclude,
            manifest,
        } => {
            let config = load_optional_manifest(manifest.as_ref())?;
            let mut options = ExportOptions {
                link: link.unwrap_or(config.export.link),
                vanilla_skeleton: vanilla.or(config.export.vanilla_skeleton),
                include: config.export.include,
            };
            for file in exclude {
                options.include.exclude(file);
            }

            tracing::info!("Exporting {:?} -> {:?}", scene, output);
            let scene = EditorScene::load(&scene)?;
            let report = export_model(&scene, &output, &options)?;
            report.log_summary();
            Ok(report.status().exit_code())
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
            Ok(ExitCode::SUCCESS)
        }
    }
}
