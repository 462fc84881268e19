use crate::descriptor::build_mesh_descriptor;
use crate::error::{CookError, Result};
use crate::flatten::flatten_scene;
use crate::mesh_types::{ImportedScene, MeshDescriptor};
use crate::offsets::compute_submesh_offsets;
use crate::ser::write_mesh_streams;
use log::{debug, info};
use std::io::Write;

/// Packs meshes back-to-back into one shared sink, tracking the running
/// byte offset between calls.
pub struct MeshPacker<W: Write> {
    sink: W,
    offset: u64,
    // Set once the sink rejected a write; its contents no longer match `offset`.
    poisoned: bool,
}

impl<W: Write> MeshPacker<W> {
    pub fn new(sink: W) -> Self {
        Self::with_offset(sink, 0)
    }

    /// Resumes packing into a sink that already holds `offset` bytes.
    pub fn with_offset(sink: W, offset: u64) -> Self {
        Self {
            sink,
            offset,
            poisoned: false,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn pack_mesh(&mut self, name: &str, scene: &ImportedScene) -> Result<MeshDescriptor> {
        if self.poisoned {
            return Err(CookError::SinkPoisoned { offset: self.offset });
        }

        // Everything that can reject the input runs before the first write.
        let flattened = flatten_scene(scene)?;
        let submeshes = compute_submesh_offsets(&flattened.sub_mesh_counts)?;
        let descriptor = build_mesh_descriptor(name, self.offset, &flattened, submeshes)?;

        let written = write_mesh_streams(
            &mut self.sink,
            &flattened.positions,
            &flattened.attributes,
            &flattened.indices,
        )
        .inspect_err(|_| self.poisoned = true)?;

        for (index, sub_mesh) in descriptor.submeshes.iter().enumerate() {
            debug!(
                "'{}' submesh {}: {} indices at {}, base vertex {}",
                name, index, sub_mesh.index_count, sub_mesh.index_offset, sub_mesh.vertex_offset
            );
        }
        info!(
            "wrote '{}': {} bytes at offset {} ({} vertices, {} indices)",
            name, written, self.offset, descriptor.vertex_count, descriptor.index_count
        );

        self.offset += written;
        Ok(descriptor)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CookError;
    use crate::flatten::tests::{sub_mesh, triangle_fan};
    use crate::mesh_types::{
        ATTRIBUTE_RECORD_SIZE, INDEX_ELEMENT_SIZE, POSITION_RECORD_SIZE, SubMeshDescriptor,
    };
    use crate::ser::mesh_region_size;
    use crate::ser::tests::LimitedSink;

    fn single(vertex_count: usize, triangles: usize) -> ImportedScene {
        ImportedScene {
            sub_meshes: vec![sub_mesh(vertex_count, triangle_fan(vertex_count, triangles))],
        }
    }

    #[test]
    fn cube_packed_alone() {
        let mut packer = MeshPacker::new(Vec::new());
        let cube = packer.pack_mesh("cube", &single(24, 12)).unwrap();

        assert_eq!(cube.file_offset, 0);
        assert_eq!(cube.vertex_count, 24);
        assert_eq!(cube.index_count, 36);
        assert_eq!(
            cube.submeshes,
            vec![SubMeshDescriptor { index_count: 36, index_offset: 0, vertex_offset: 0 }]
        );

        let expected =
            24 * POSITION_RECORD_SIZE + 24 * ATTRIBUTE_RECORD_SIZE + 36 * INDEX_ELEMENT_SIZE;
        assert_eq!(packer.offset(), expected as u64);
        assert_eq!(packer.finish().unwrap().len(), expected);
    }

    #[test]
    fn second_mesh_follows_first() {
        let mut packer = MeshPacker::new(Vec::new());
        let a = packer.pack_mesh("a", &single(10, 5)).unwrap();
        let b = packer.pack_mesh("b", &single(6, 3)).unwrap();

        let a_size = 10 * POSITION_RECORD_SIZE + 10 * ATTRIBUTE_RECORD_SIZE + 15 * INDEX_ELEMENT_SIZE;
        assert_eq!(a.file_offset, 0);
        assert_eq!(b.file_offset, a_size as u64);
        assert_eq!(
            b.submeshes,
            vec![SubMeshDescriptor { index_count: 9, index_offset: 0, vertex_offset: 0 }]
        );

        let b_end = b.file_offset + mesh_region_size(6, 9);
        assert_eq!(packer.offset(), b_end);
        assert_eq!(packer.finish().unwrap().len() as u64, b_end);
    }

    #[test]
    fn counts_sum_over_sub_meshes() {
        let scene = ImportedScene {
            sub_meshes: vec![
                sub_mesh(5, triangle_fan(5, 3)),
                sub_mesh(3, triangle_fan(3, 1)),
                sub_mesh(7, triangle_fan(7, 5)),
            ],
        };
        let mut packer = MeshPacker::new(Vec::new());
        let mesh = packer.pack_mesh("multi", &scene).unwrap();

        let index_sum: u32 = mesh.submeshes.iter().map(|s| s.index_count).sum();
        assert_eq!(index_sum, mesh.index_count);
        assert_eq!(mesh.vertex_count, 15);
        assert_eq!(mesh.submeshes[2].vertex_offset, 8);
        assert_eq!(mesh.submeshes[2].index_offset, 12);
    }

    #[test]
    fn quad_writes_nothing_and_keeps_offset() {
        let mut packer = MeshPacker::new(Vec::new());
        packer.pack_mesh("first", &single(3, 1)).unwrap();
        let before = packer.offset();

        let quad = ImportedScene { sub_meshes: vec![sub_mesh(4, vec![vec![0, 1, 2, 3]])] };
        assert!(matches!(
            packer.pack_mesh("quad", &quad),
            Err(CookError::MalformedFace { vertex_count: 4, .. })
        ));

        assert_eq!(packer.offset(), before);
        assert_eq!(packer.finish().unwrap().len() as u64, before);
    }

    #[test]
    fn failed_write_refuses_further_meshes() {
        let sink = LimitedSink { written: Vec::new(), capacity: 200 };
        let mut packer = MeshPacker::new(sink);

        assert!(matches!(packer.pack_mesh("big", &single(8, 4)), Err(CookError::Io(_))));

        // The sink now holds a partial mesh, so no later offset can be trusted.
        packer.sink.capacity = 1 << 20;
        assert!(matches!(
            packer.pack_mesh("small", &single(3, 1)),
            Err(CookError::SinkPoisoned { .. })
        ));
        assert_eq!(packer.sink.written.len(), 200);
    }

    #[test]
    fn rejected_input_does_not_poison() {
        let mut packer = MeshPacker::new(Vec::new());
        let quad = ImportedScene { sub_meshes: vec![sub_mesh(4, vec![vec![0, 1, 2, 3]])] };
        assert!(packer.pack_mesh("quad", &quad).is_err());

        let tri = packer.pack_mesh("tri", &single(3, 1)).unwrap();
        assert_eq!(tri.file_offset, 0);
    }

    #[test]
    fn resumed_packer_offsets_from_existing_size() {
        let mut packer = MeshPacker::with_offset(Vec::new(), 512);
        let mesh = packer.pack_mesh("late", &single(3, 1)).unwrap();
        assert_eq!(mesh.file_offset, 512);
        assert_eq!(packer.offset(), 512 + mesh_region_size(3, 3));
    }
}
