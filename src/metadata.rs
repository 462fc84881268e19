//! Scene manifest read by the cooker and the metadata document it writes.
//!
//! Textures, materials and nodes are not cooked here; they are carried from
//! the manifest into the metadata document untouched.

use crate::error::{CookError, Result};
use crate::mesh_types::MeshDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct MeshEntry {
    pub name: String,
    pub filename: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub meshes: Vec<MeshEntry>,
    #[serde(default = "empty_list")]
    pub textures: Value,
    #[serde(default = "empty_list")]
    pub materials: Value,
    #[serde(default = "empty_list")]
    pub nodes: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub meshes: Vec<MeshDescriptor>,
    pub textures: Value,
    pub materials: Value,
    pub nodes: Value,
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

impl SceneManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn into_metadata(self, meshes: Vec<MeshDescriptor>) -> MetadataDocument {
        MetadataDocument {
            meshes,
            textures: self.textures,
            materials: self.materials,
            nodes: self.nodes,
        }
    }
}

impl MetadataDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        std::io::Write::flush(&mut writer)?;
        Ok(())
    }

    pub fn find_mesh(&self, name: &str) -> Result<&MeshDescriptor> {
        self.meshes
            .iter()
            .find(|mesh| mesh.name == name)
            .ok_or_else(|| CookError::MeshNotFound(name.to_string()))
    }
}

/// `scene.json` -> `scene.data`
pub fn default_data_path(manifest: &Path) -> PathBuf {
    manifest.with_extension("data")
}

/// `scene.json` -> `scene.metadata`
pub fn default_metadata_path(manifest: &Path) -> PathBuf {
    manifest.with_extension("metadata")
}

/// Mesh filenames in a manifest are relative to the manifest itself.
pub fn resolve_mesh_path(manifest: &Path, filename: &Path) -> PathBuf {
    match manifest.parent() {
        Some(dir) if filename.is_relative() => dir.join(filename),
        _ => filename.to_path_buf(),
    }
}
