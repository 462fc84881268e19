use crate::error::{CookError, Result};
use crate::mesh_types::{ImportedScene, ImportedSubMesh};
use glam::{Vec2, Vec3};
use log::{debug, warn};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    /// Split polygons into triangles while loading. When off, polygon faces
    /// reach the packer untouched and are rejected there.
    pub triangulate: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { triangulate: true }
    }
}

pub fn import_obj(path: &Path, options: &ImportOptions) -> Result<ImportedScene> {
    let obj_data = fs::read(path)?;
    import_obj_buf(&obj_data, options)
}

/// Loads every OBJ object/group as one sub-mesh, in file order. Face corners
/// that repeat the same `v/vt/vn` index triple share one vertex, and missing
/// normals, texture coordinates and tangent frames are synthesized.
pub fn import_obj_buf(obj_data: &[u8], options: &ImportOptions) -> Result<ImportedScene> {
    let mut reader = obj_data;
    let (models, _) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: options.triangulate,
            single_index: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )?;

    if models.iter().all(|model| model.mesh.indices.is_empty()) {
        return Err(CookError::NoMeshData);
    }

    let sub_meshes: Vec<ImportedSubMesh> = models
        .into_iter()
        .filter(|model| !model.mesh.indices.is_empty())
        .map(sub_mesh_from_model)
        .collect();
    for sub_mesh in &sub_meshes {
        debug!(
            "sub-mesh '{}': {} vertices, {} faces",
            sub_mesh.name,
            sub_mesh.positions.len(),
            sub_mesh.faces.len()
        );
    }

    Ok(ImportedScene { sub_meshes })
}

fn sub_mesh_from_model(model: tobj::Model) -> ImportedSubMesh {
    let mesh = model.mesh;
    let vertex_count = mesh.positions.len() / 3;

    let positions: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let faces = split_faces(&mesh.indices, &mesh.face_arities);

    let normals = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect()
    } else {
        debug!("generating smooth normals for '{}'", model.name);
        generate_smooth_normals(&positions, &faces)
    };

    let texcoords = if mesh.texcoords.len() == vertex_count * 2 {
        mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect()
    } else {
        warn!(
            "'{}' has no texture coordinates, tangents will be arbitrary",
            model.name
        );
        vec![[0.0, 0.0]; vertex_count]
    };

    let (tangents, bitangents) = compute_tangent_frames(&positions, &normals, &texcoords, &faces);

    ImportedSubMesh {
        name: model.name,
        positions,
        normals,
        texcoords,
        tangents,
        bitangents,
        faces,
    }
}

fn split_faces(indices: &[u32], face_arities: &[u32]) -> Vec<Vec<u32>> {
    // tobj leaves the arity list empty when every face is a triangle.
    if face_arities.is_empty() {
        return indices.chunks(3).map(|face| face.to_vec()).collect();
    }

    let mut faces = Vec::with_capacity(face_arities.len());
    let mut start = 0;
    for &arity in face_arities {
        let end = (start + arity as usize).min(indices.len());
        faces.push(indices[start..end].to_vec());
        start = end;
    }
    faces
}

/// Fan-splits a face into triangles, skipping faces that reference
/// vertices outside the sub-mesh.
fn face_triangles(face: &[u32], vertex_count: usize) -> impl Iterator<Item = [usize; 3]> + '_ {
    let in_range = face.iter().all(|&i| (i as usize) < vertex_count);
    let triangle_count = if in_range { face.len().saturating_sub(2) } else { 0 };
    (0..triangle_count).map(move |k| [face[0] as usize, face[k + 1] as usize, face[k + 2] as usize])
}

fn generate_smooth_normals(positions: &[[f32; 3]], faces: &[Vec<u32>]) -> Vec<[f32; 3]> {
    let mut accumulated = vec![Vec3::ZERO; positions.len()];

    for face in faces {
        for [i0, i1, i2] in face_triangles(face, positions.len()) {
            let p0 = Vec3::from(positions[i0]);
            let p1 = Vec3::from(positions[i1]);
            let p2 = Vec3::from(positions[i2]);
            // Unnormalized cross product weights by triangle area.
            let n = (p1 - p0).cross(p2 - p0);
            accumulated[i0] += n;
            accumulated[i1] += n;
            accumulated[i2] += n;
        }
    }

    accumulated
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

fn compute_tangent_frames(
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    texcoords: &[[f32; 2]],
    faces: &[Vec<u32>],
) -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
    let vertex_count = positions.len();
    let mut tan_acc = vec![Vec3::ZERO; vertex_count];
    let mut bit_acc = vec![Vec3::ZERO; vertex_count];

    for face in faces {
        for [i0, i1, i2] in face_triangles(face, vertex_count) {
            let p0 = Vec3::from(positions[i0]);
            let e1 = Vec3::from(positions[i1]) - p0;
            let e2 = Vec3::from(positions[i2]) - p0;
            let uv0 = Vec2::from(texcoords[i0]);
            let d1 = Vec2::from(texcoords[i1]) - uv0;
            let d2 = Vec2::from(texcoords[i2]) - uv0;

            let det = d1.x * d2.y - d2.x * d1.y;
            if det.abs() < f32::EPSILON {
                continue;
            }
            let r = 1.0 / det;
            let sdir = (e1 * d2.y - e2 * d1.y) * r;
            let tdir = (e2 * d1.x - e1 * d2.x) * r;

            for i in [i0, i1, i2] {
                tan_acc[i] += sdir;
                bit_acc[i] += tdir;
            }
        }
    }

    let mut tangents: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    let mut bitangents: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    for i in 0..vertex_count {
        let n = Vec3::from(normals[i]).try_normalize().unwrap_or(Vec3::Y);
        let t = (tan_acc[i] - n * n.dot(tan_acc[i]))
            .try_normalize()
            .unwrap_or_else(|| n.any_orthonormal_vector());
        let handedness = if n.cross(t).dot(bit_acc[i]) < 0.0 { -1.0 } else { 1.0 };
        let b = n.cross(t) * handedness;

        tangents.push(t.to_array());
        bitangents.push(b.to_array());
    }

    (tangents, bitangents)
}
