use crate::error::{CookError, Result};
use crate::mesh_types::{AttributeRecord, ImportedScene, ImportedSubMesh, IndexElement, PositionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMeshCounts {
    pub vertex_count: usize,
    pub face_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FlattenedMesh {
    pub positions: Vec<PositionRecord>,
    pub attributes: Vec<AttributeRecord>,
    pub indices: Vec<IndexElement>,
    pub sub_mesh_counts: Vec<SubMeshCounts>,
}

/// Concatenates every sub-mesh's vertices into the two parallel streams and
/// every face into one index stream. Indices stay in each sub-mesh's local space.
pub fn flatten_scene(scene: &ImportedScene) -> Result<FlattenedMesh> {
    let vertex_total: usize = scene.sub_meshes.iter().map(|s| s.positions.len()).sum();
    let face_total: usize = scene.sub_meshes.iter().map(|s| s.faces.len()).sum();

    let mut flattened = FlattenedMesh {
        positions: Vec::with_capacity(vertex_total),
        attributes: Vec::with_capacity(vertex_total),
        indices: Vec::with_capacity(face_total * 3),
        sub_mesh_counts: Vec::with_capacity(scene.sub_meshes.len()),
    };

    for (sub_mesh_index, sub_mesh) in scene.sub_meshes.iter().enumerate() {
        check_vertex_arrays(sub_mesh)?;

        for vertex_index in 0..sub_mesh.positions.len() {
            flattened.positions.push(PositionRecord {
                position: sub_mesh.positions[vertex_index],
            });
            flattened.attributes.push(AttributeRecord {
                normal: sub_mesh.normals[vertex_index],
                texcoord: sub_mesh.texcoords[vertex_index],
                tangent: sub_mesh.tangents[vertex_index],
                binormal: sub_mesh.bitangents[vertex_index],
            });
        }

        for (face_index, face) in sub_mesh.faces.iter().enumerate() {
            if face.len() != 3 {
                return Err(CookError::MalformedFace {
                    sub_mesh: sub_mesh_index,
                    face: face_index,
                    vertex_count: face.len(),
                });
            }
            flattened.indices.extend_from_slice(face);
        }

        flattened.sub_mesh_counts.push(SubMeshCounts {
            vertex_count: sub_mesh.positions.len(),
            face_count: sub_mesh.faces.len(),
        });
    }

    Ok(flattened)
}

fn check_vertex_arrays(sub_mesh: &ImportedSubMesh) -> Result<()> {
    let positions = sub_mesh.positions.len();
    let shortest = [
        sub_mesh.normals.len(),
        sub_mesh.texcoords.len(),
        sub_mesh.tangents.len(),
        sub_mesh.bitangents.len(),
    ]
    .into_iter()
    .min()
    .unwrap_or(positions);

    if shortest < positions {
        return Err(CookError::AttributeCountMismatch {
            positions,
            attributes: shortest,
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a sub-mesh with `vertex_count` distinguishable vertices and the given faces.
    pub(crate) fn sub_mesh(vertex_count: usize, faces: Vec<Vec<u32>>) -> ImportedSubMesh {
        let v = |i: usize| i as f32;
        ImportedSubMesh {
            name: String::new(),
            positions: (0..vertex_count).map(|i| [v(i), v(i) + 0.5, -v(i)]).collect(),
            normals: (0..vertex_count).map(|_| [0.0, 1.0, 0.0]).collect(),
            texcoords: (0..vertex_count).map(|i| [v(i) / 10.0, 0.25]).collect(),
            tangents: (0..vertex_count).map(|_| [1.0, 0.0, 0.0]).collect(),
            bitangents: (0..vertex_count).map(|_| [0.0, 0.0, 1.0]).collect(),
            faces,
        }
    }

    pub(crate) fn triangle_fan(vertex_count: usize, triangles: usize) -> Vec<Vec<u32>> {
        (0..triangles)
            .map(|t| {
                let t = t as u32 % (vertex_count as u32 - 2);
                vec![0, t + 1, t + 2]
            })
            .collect()
    }

    #[test]
    fn flattens_sub_meshes_in_order() {
        let scene = ImportedScene {
            sub_meshes: vec![
                sub_mesh(3, vec![vec![0, 1, 2]]),
                sub_mesh(4, vec![vec![0, 1, 2], vec![0, 2, 3]]),
            ],
        };

        let flattened = flatten_scene(&scene).unwrap();

        assert_eq!(flattened.positions.len(), 7);
        assert_eq!(flattened.attributes.len(), 7);
        assert_eq!(flattened.positions[3].position, [0.0, 0.5, 0.0]);
        assert_eq!(flattened.indices, vec![0, 1, 2, 0, 1, 2, 0, 2, 3]);
        assert_eq!(
            flattened.sub_mesh_counts,
            vec![
                SubMeshCounts { vertex_count: 3, face_count: 1 },
                SubMeshCounts { vertex_count: 4, face_count: 2 },
            ]
        );
    }

    #[test]
    fn rejects_quad_faces() {
        let scene = ImportedScene {
            sub_meshes: vec![
                sub_mesh(3, vec![vec![0, 1, 2]]),
                sub_mesh(4, vec![vec![0, 1, 2], vec![0, 1, 2, 3]]),
            ],
        };

        match flatten_scene(&scene) {
            Err(CookError::MalformedFace { sub_mesh, face, vertex_count }) => {
                assert_eq!((sub_mesh, face, vertex_count), (1, 1, 4));
            }
            other => panic!("expected MalformedFace, got {:?}", other),
        }
    }

    #[test]
    fn rejects_short_attribute_arrays() {
        let mut broken = sub_mesh(3, vec![vec![0, 1, 2]]);
        broken.tangents.pop();
        let scene = ImportedScene { sub_meshes: vec![broken] };

        assert!(matches!(
            flatten_scene(&scene),
            Err(CookError::AttributeCountMismatch { positions: 3, attributes: 2 })
        ));
    }
}
