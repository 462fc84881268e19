use crate::error::{CookError, Result};
use crate::flatten::SubMeshCounts;
use crate::mesh_types::SubMeshDescriptor;

/// Assigns each sub-mesh its index range and base vertex within the mesh's
/// combined buffers. Offsets restart at zero for every mesh.
pub fn compute_submesh_offsets(counts: &[SubMeshCounts]) -> Result<Vec<SubMeshDescriptor>> {
    let mut index_offset: u32 = 0;
    let mut vertex_offset: u32 = 0;
    let mut submeshes = Vec::with_capacity(counts.len());

    for count in counts {
        let index_count = count
            .face_count
            .checked_mul(3)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(CookError::CountOverflow { what: "sub-mesh index count" })?;
        let vertex_count = u32::try_from(count.vertex_count)
            .map_err(|_| CookError::CountOverflow { what: "sub-mesh vertex count" })?;

        submeshes.push(SubMeshDescriptor {
            index_count,
            index_offset,
            vertex_offset,
        });

        index_offset = index_offset
            .checked_add(index_count)
            .ok_or(CookError::CountOverflow { what: "mesh index count" })?;
        vertex_offset = vertex_offset
            .checked_add(vertex_count)
            .ok_or(CookError::CountOverflow { what: "mesh vertex count" })?;
    }

    Ok(submeshes)
}
