use crate::error::{CookError, Result};
use crate::flatten::FlattenedMesh;
use crate::mesh_types::{AttributeMask, MeshDescriptor, SubMeshDescriptor};

pub fn build_mesh_descriptor(
    name: &str,
    file_offset: u64,
    mesh: &FlattenedMesh,
    submeshes: Vec<SubMeshDescriptor>,
) -> Result<MeshDescriptor> {
    if mesh.positions.len() != mesh.attributes.len() {
        return Err(CookError::AttributeCountMismatch {
            positions: mesh.positions.len(),
            attributes: mesh.attributes.len(),
        });
    }

    let vertex_count = u32::try_from(mesh.positions.len())
        .map_err(|_| CookError::CountOverflow { what: "mesh vertex count" })?;
    let index_count = u32::try_from(mesh.indices.len())
        .map_err(|_| CookError::CountOverflow { what: "mesh index count" })?;

    Ok(MeshDescriptor {
        name: name.to_string(),
        file_offset,
        attribute_mask: AttributeMask::FULL,
        vertex_count,
        index_count,
        uses_external_32bit_indices: true,
        submeshes,
    })
}
