use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CookError {
    #[error("face {face} of sub-mesh {sub_mesh} has {vertex_count} vertices, only triangles are supported")]
    MalformedFace {
        sub_mesh: usize,
        face: usize,
        vertex_count: usize,
    },

    #[error("attribute stream length mismatch: {positions} positions vs {attributes} attribute records")]
    AttributeCountMismatch { positions: usize, attributes: usize },

    #[error("an i/o error occurred: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse obj file: {0}")]
    ObjParse(#[from] tobj::LoadError),

    #[error("output stream failed earlier at offset {offset}, no further meshes can be packed")]
    SinkPoisoned { offset: u64 },

    #[error("failed to read or write json document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to find processable mesh data in obj file")]
    NoMeshData,

    #[error("{what} does not fit in 32 bits")]
    CountOverflow { what: &'static str },

    #[error("mesh region [{start}, {end}) lies outside the {len} byte data file")]
    RegionOutOfBounds { start: u64, end: u64, len: usize },

    #[error("no mesh named '{0}' in metadata document")]
    MeshNotFound(String),

    #[error("failed to cook mesh '{name}': {source}")]
    Mesh {
        name: String,
        #[source]
        source: Box<CookError>,
    },
}

impl CookError {
    pub fn for_mesh(self, name: &str) -> CookError {
        CookError::Mesh {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CookError>;
