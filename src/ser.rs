use crate::error::Result;
use crate::mesh_types::*;
use std::io::Write;

/// Writes one mesh region: positions, then attribute records, then indices.
/// Records are emitted in native layout with no header or padding.
pub fn write_mesh_streams<W: Write>(
    writer: &mut W,
    positions: &[PositionRecord],
    attributes: &[AttributeRecord],
    indices: &[IndexElement],
) -> Result<u64> {
    writer.write_all(bytemuck::cast_slice(positions))?;
    writer.write_all(bytemuck::cast_slice(attributes))?;
    writer.write_all(bytemuck::cast_slice(indices))?;

    Ok(mesh_region_size(positions.len() as u64, indices.len() as u64))
}

pub fn mesh_region_size(vertex_count: u64, index_count: u64) -> u64 {
    vertex_count * (POSITION_RECORD_SIZE + ATTRIBUTE_RECORD_SIZE) as u64
        + index_count * INDEX_ELEMENT_SIZE as u64
}
