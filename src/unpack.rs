use crate::error::{CookError, Result};
use crate::mesh_types::{AttributeRecord, IndexElement, MeshDescriptor, PositionRecord};
use crate::ser::mesh_region_size;
use byteorder::{NativeEndian, ReadBytesExt};
use std::fmt::{self, Write as FmtWrite};
use std::io::Cursor;

#[derive(Debug, Clone, Default)]
pub struct UnpackedMesh {
    pub positions: Vec<PositionRecord>,
    pub attributes: Vec<AttributeRecord>,
    pub indices: Vec<IndexElement>,
}

/// Decodes one mesh region of a cooked data file using its descriptor.
pub fn read_mesh(data: &[u8], mesh: &MeshDescriptor) -> Result<UnpackedMesh> {
    let start = mesh.file_offset;
    let size = mesh_region_size(mesh.vertex_count as u64, mesh.index_count as u64);
    let end = match start.checked_add(size) {
        Some(end) if end <= data.len() as u64 => end,
        _ => {
            return Err(CookError::RegionOutOfBounds {
                start,
                end: start.saturating_add(size),
                len: data.len(),
            });
        }
    };

    let mut cursor = Cursor::new(&data[start as usize..end as usize]);
    let vertex_count = mesh.vertex_count as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        positions.push(PositionRecord {
            position: read_floats(&mut cursor)?,
        });
    }

    let mut attributes = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        attributes.push(AttributeRecord {
            normal: read_floats(&mut cursor)?,
            texcoord: read_floats(&mut cursor)?,
            tangent: read_floats(&mut cursor)?,
            binormal: read_floats(&mut cursor)?,
        });
    }

    let mut indices = Vec::with_capacity(mesh.index_count as usize);
    for _ in 0..mesh.index_count {
        indices.push(cursor.read_u32::<NativeEndian>()?);
    }

    Ok(UnpackedMesh {
        positions,
        attributes,
        indices,
    })
}

fn read_floats<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[f32; N]> {
    let mut values = [0.0f32; N];
    cursor.read_f32_into::<NativeEndian>(&mut values)?;
    Ok(values)
}

/// Rebuilds an OBJ with one group per sub-mesh, resolving each sub-mesh's
/// local indices through its base vertex.
pub fn mesh_to_obj_bytes(unpacked: &UnpackedMesh, mesh: &MeshDescriptor) -> Result<Vec<u8>> {
    let mut output = String::new();

    for record in &unpacked.positions {
        let p = record.position;
        fmt_ok(writeln!(&mut output, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2]))?;
    }

    for record in &unpacked.attributes {
        let t = record.texcoord;
        fmt_ok(writeln!(&mut output, "vt {:.6} {:.6}", t[0], t[1]))?;
    }

    for record in &unpacked.attributes {
        let n = record.normal;
        fmt_ok(writeln!(&mut output, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2]))?;
    }

    for (index, sub_mesh) in mesh.submeshes.iter().enumerate() {
        fmt_ok(writeln!(&mut output, "g {}_{}", mesh.name, index))?;

        let first = sub_mesh.index_offset as usize;
        let last = first + sub_mesh.index_count as usize;
        let range = unpacked
            .indices
            .get(first..last)
            .ok_or(CookError::RegionOutOfBounds {
                start: first as u64,
                end: last as u64,
                len: unpacked.indices.len(),
            })?;

        for face in range.chunks_exact(3) {
            // OBJ indices are 1-based and global.
            let [a, b, c] =
                [face[0], face[1], face[2]].map(|i| i as u64 + sub_mesh.vertex_offset as u64 + 1);
            fmt_ok(writeln!(
                &mut output,
                "f {}/{}/{} {}/{}/{} {}/{}/{}",
                a, a, a, b, b, b, c, c, c
            ))?;
        }
    }

    Ok(output.into_bytes())
}

fn fmt_ok(result: fmt::Result) -> Result<()> {
    result.map_err(|_| CookError::Io(std::io::Error::other("failed to format OBJ output")))
}
