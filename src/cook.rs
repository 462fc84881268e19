use crate::error::Result;
use crate::importer::{ImportOptions, import_obj};
use crate::mesh_types::MeshDescriptor;
use crate::metadata::{SceneManifest, default_data_path, default_metadata_path, resolve_mesh_path};
use crate::packer::MeshPacker;
use log::{error, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CookConfig {
    pub manifest: PathBuf,
    pub data_out: PathBuf,
    pub metadata_out: PathBuf,
    pub import: ImportOptions,
}

impl CookConfig {
    pub fn from_manifest(manifest: &Path) -> Self {
        Self {
            manifest: manifest.to_path_buf(),
            data_out: default_data_path(manifest),
            metadata_out: default_metadata_path(manifest),
            import: ImportOptions::default(),
        }
    }
}

#[derive(Debug)]
pub struct CookReport {
    pub meshes: Vec<MeshDescriptor>,
    pub bytes_written: u64,
}

/// Packs every mesh of the manifest into one data file, then writes the
/// metadata document describing where each mesh landed.
pub fn cook_scene(config: &CookConfig) -> Result<CookReport> {
    info!("processing {}", config.manifest.display());
    let manifest = SceneManifest::load(&config.manifest)?;

    let sink = BufWriter::new(File::create(&config.data_out)?);
    let mut packer = MeshPacker::new(sink);

    let packed = pack_manifest_meshes(&mut packer, &manifest, config);
    // Flush on both paths so meshes packed before a failure stay on disk.
    let flushed = packer.flush();
    let meshes = packed?;
    flushed?;

    let bytes_written = packer.offset();
    let document = manifest.into_metadata(meshes);
    document.save(&config.metadata_out)?;
    info!(
        "wrote {} meshes ({} bytes) to {} and {}",
        document.meshes.len(),
        bytes_written,
        config.data_out.display(),
        config.metadata_out.display()
    );

    Ok(CookReport {
        meshes: document.meshes,
        bytes_written,
    })
}

fn pack_manifest_meshes(
    packer: &mut MeshPacker<BufWriter<File>>,
    manifest: &SceneManifest,
    config: &CookConfig,
) -> Result<Vec<MeshDescriptor>> {
    let mut meshes = Vec::with_capacity(manifest.meshes.len());
    for entry in &manifest.meshes {
        let path = resolve_mesh_path(&config.manifest, &entry.filename);
        info!("reading meshes from {}", path.display());

        let descriptor = import_obj(&path, &config.import)
            .and_then(|scene| packer.pack_mesh(&entry.name, &scene))
            .map_err(|e| {
                error!("mesh '{}' failed: {}", entry.name, e);
                e.for_mesh(&entry.name)
            })?;
        meshes.push(descriptor);
    }
    Ok(meshes)
}
