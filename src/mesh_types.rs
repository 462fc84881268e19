use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// First vertex stream: positions only, so depth-only passes can bind it alone.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PositionRecord {
    pub position: [f32; 3],
}

/// Second vertex stream, parallel to the position stream.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct AttributeRecord {
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
    pub tangent: [f32; 3],
    pub binormal: [f32; 3],
}

pub type IndexElement = u32;

pub const POSITION_RECORD_SIZE: usize = std::mem::size_of::<PositionRecord>();
pub const ATTRIBUTE_RECORD_SIZE: usize = std::mem::size_of::<AttributeRecord>();
pub const INDEX_ELEMENT_SIZE: usize = std::mem::size_of::<IndexElement>();

const _: () = assert!(POSITION_RECORD_SIZE == 12);
const _: () = assert!(ATTRIBUTE_RECORD_SIZE == 44);
const _: () = assert!(INDEX_ELEMENT_SIZE == 4);

/// Vertex component bits understood by the renderer's vertex layout table.
pub struct AttributeMask;

impl AttributeMask {
    pub const POSITION: u32 = 1 << 0;
    pub const NORMAL: u32 = 1 << 1;
    pub const TEXCOORD: u32 = 1 << 2;
    pub const TANGENT: u32 = 1 << 3;
    pub const BINORMAL: u32 = 1 << 4;

    // Always emitted, even when the importer synthesized some of the data.
    pub const FULL: u32 =
        Self::POSITION | Self::NORMAL | Self::TEXCOORD | Self::TANGENT | Self::BINORMAL;
}

#[derive(Debug, Clone, Default)]
pub struct ImportedSubMesh {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
    /// Vertex references in local index space. Arity is preserved as imported.
    pub faces: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportedScene {
    pub sub_meshes: Vec<ImportedSubMesh>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubMeshDescriptor {
    pub index_count: u32,
    /// In index elements from the start of the mesh's index region.
    pub index_offset: u32,
    /// In vertices from the start of the mesh's vertex regions.
    pub vertex_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshDescriptor {
    pub name: String,
    #[serde(rename = "offset")]
    pub file_offset: u64,
    #[serde(rename = "vertex_type")]
    pub attribute_mask: u32,
    #[serde(rename = "num_vertices")]
    pub vertex_count: u32,
    #[serde(rename = "num_indices")]
    pub index_count: u32,
    #[serde(rename = "ext_index")]
    pub uses_external_32bit_indices: bool,
    pub submeshes: Vec<SubMeshDescriptor>,
}
