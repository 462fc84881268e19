use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
mod cook;
mod descriptor;
mod error;
mod flatten;
mod importer;
mod mesh_types;
mod metadata;
mod offsets;
mod packer;
mod ser;
mod unpack;

use cook::{CookConfig, cook_scene};
use importer::{ImportOptions, import_obj};
use metadata::{MetadataDocument, SceneManifest};
use packer::MeshPacker;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cook every mesh listed in a scene manifest into one data file plus metadata
    Cook {
        manifest: PathBuf,
        #[arg(long)]
        data_out: Option<PathBuf>,
        #[arg(long)]
        metadata_out: Option<PathBuf>,
        /// Reject polygon faces instead of triangulating them
        #[arg(long)]
        keep_polygons: bool,
    },
    /// Pack a single OBJ file
    PackObj {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        metadata_out: Option<PathBuf>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Extract one cooked mesh back into an OBJ file
    Unpack {
        data: PathBuf,
        metadata: PathBuf,
        mesh: String,
        output: PathBuf,
    },
}

fn pack_single_obj(
    input: PathBuf,
    output: PathBuf,
    metadata_out: Option<PathBuf>,
    name: Option<String>,
) -> error::Result<()> {
    let name = name.unwrap_or_else(|| {
        input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let scene = import_obj(&input, &ImportOptions::default()).map_err(|e| e.for_mesh(&name))?;

    let mut packer = MeshPacker::new(BufWriter::new(File::create(&output)?));
    let packed = packer.pack_mesh(&name, &scene);
    packer.finish()?;
    let descriptor = packed.map_err(|e| e.for_mesh(&name))?;

    let manifest = SceneManifest {
        meshes: Vec::new(),
        textures: serde_json::Value::Array(Vec::new()),
        materials: serde_json::Value::Array(Vec::new()),
        nodes: serde_json::Value::Array(Vec::new()),
    };
    let metadata_out = metadata_out.unwrap_or_else(|| output.with_extension("metadata"));
    manifest.into_metadata(vec![descriptor]).save(&metadata_out)?;
    Ok(())
}

fn unpack_mesh(data: PathBuf, metadata: PathBuf, mesh: String, output: PathBuf) -> error::Result<()> {
    let document = MetadataDocument::load(&metadata)?;
    let descriptor = document.find_mesh(&mesh)?;
    let bytes = fs::read(data)?;
    let unpacked = unpack::read_mesh(&bytes, descriptor)?;
    fs::write(output, unpack::mesh_to_obj_bytes(&unpacked, descriptor)?)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let start = Utc::now();
    match cli.command {
        Commands::Cook { manifest, data_out, metadata_out, keep_polygons } => {
            let mut config = CookConfig::from_manifest(&manifest);
            if let Some(path) = data_out {
                config.data_out = path;
            }
            if let Some(path) = metadata_out {
                config.metadata_out = path;
            }
            config.import.triangulate = !keep_polygons;
            let report = cook_scene(&config)?;
            info!("cooked {} meshes into {} bytes", report.meshes.len(), report.bytes_written);
        }
        Commands::PackObj { input, output, metadata_out, name } => {
            pack_single_obj(input, output, metadata_out, name)?;
        }
        Commands::Unpack { data, metadata, mesh, output } => {
            unpack_mesh(data, metadata, mesh, output)?;
        }
    }
    let elapsed = Utc::now().signed_duration_since(start);
    info!("done in {} ms", elapsed.num_milliseconds());
    Ok(())
}
