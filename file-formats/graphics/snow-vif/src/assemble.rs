//! Folding chunks into a mesh

use glam::{Vec2, Vec3};

use crate::chunk::Chunk;
use crate::error::{Error, Result};
use crate::mesh::{SkinnedMesh, UvScale};
use crate::strip::StripTable;
use crate::weight::find_weight;

/// Build one mesh from the chunks of its stream.
///
/// Positions are scaled by 1/16 and normals by 1/127. Triangles are emitted
/// per chunk from its strip table; a vertex that already carries a different
/// UV is duplicated, together with its weight span, so that every vertex
/// index has a single UV.
pub fn assemble_mesh(chunks: &[Chunk], scale: UvScale) -> Result<SkinnedMesh> {
    let mut mesh = SkinnedMesh::default();

    for (index, chunk) in chunks.iter().enumerate() {
        let tag = chunk
            .strip_tag
            .ok_or_else(|| Error::unsupported(format!("chunk {index} has no strip GIF tag")))?;
        if !tag.is_triangle_strip() {
            return Err(Error::NotTriangleStrip { prim: tag.prim });
        }

        let base = mesh.positions.len();
        let vertex_count = chunk.vertex_count();
        append_vertices(&mut mesh, chunk);
        for weight in &chunk.weights {
            if weight.start < vertex_count {
                let end = weight.end.min(vertex_count);
                mesh.weights.push(weight.with_span(base + weight.start, base + end));
            }
        }

        let strip = StripTable::build(
            &tag,
            &chunk.strip_records,
            chunk.strip_remaps.as_deref(),
            vertex_count,
        );
        for slots in strip.triangles() {
            let mut corners = [(0usize, Vec2::ZERO); 3];
            for (corner, slot) in corners.iter_mut().zip(slots) {
                let raw = *chunk.uvs.get(slot).ok_or(Error::MissingUv { slot })?;
                let vertex = base + strip.vertex(slot).unwrap_or_default();
                if vertex >= base + vertex_count {
                    return Err(Error::VertexOutOfRange {
                        index: vertex,
                        count: base + vertex_count,
                    });
                }
                let uv = scale.apply(raw);
                *corner = (bind_uv(&mut mesh, vertex, uv), uv);
            }

            for (vertex, uv) in corners {
                mesh.uvs[vertex] = Some(uv);
            }
            mesh.triangles.push(corners.map(|(vertex, _)| vertex as u32));
        }
        log::trace!(
            "Chunk {index}: {vertex_count} vertices, {} strip slots",
            strip.len()
        );
    }

    log::debug!(
        "Assembled mesh: {} vertices, {} triangles, {} weight spans",
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.weights.len()
    );
    Ok(mesh)
}

fn append_vertices(mesh: &mut SkinnedMesh, chunk: &Chunk) {
    if chunk.normals.len() < chunk.vertices.len() {
        log::debug!(
            "Chunk has {} normals for {} vertices, padding with zero",
            chunk.normals.len(),
            chunk.vertices.len()
        );
    }
    for (i, [x, y, z]) in chunk.vertices.iter().enumerate() {
        mesh.positions
            .push(Vec3::new(f32::from(*x), f32::from(*y), f32::from(*z)) / 16.0);
        let normal = chunk.normals.get(i).map_or(Vec3::ZERO, |[x, y, z]| {
            Vec3::new(f32::from(*x), f32::from(*y), f32::from(*z)) / 127.0
        });
        mesh.normals.push(normal);
        mesh.uvs.push(None);
    }
}

/// Vertex to use for `uv`: `vertex` itself, or a fresh copy when it is
/// already bound to a different UV
fn bind_uv(mesh: &mut SkinnedMesh, vertex: usize, uv: Vec2) -> usize {
    match mesh.uvs[vertex] {
        Some(existing) if existing != uv => {}
        _ => return vertex,
    }

    let copy = mesh.positions.len();
    mesh.positions.push(mesh.positions[vertex]);
    mesh.normals.push(mesh.normals[vertex]);
    mesh.uvs.push(None);
    if let Some(weight) = find_weight(&mesh.weights, vertex).filter(|w| w.primary_weight() > 0) {
        let span = weight.with_span(copy, copy + 1);
        mesh.weights.push(span);
    }
    log::trace!("Duplicated vertex {vertex} as {copy} for a second UV");
    copy
}
