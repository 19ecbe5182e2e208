//! Decoded mesh types

use glam::{Vec2, Vec3};

use crate::weight::{VertexWeight, find_weight};

/// Texel scale applied to raw UVs.
///
/// Raw UVs are in 1/16 texel units; the scale converts texels to the
/// caller's texture coordinate space, usually `1 / width` and `1 / height`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UvScale {
    /// Horizontal scale
    pub u: f32,
    /// Vertical scale
    pub v: f32,
}

impl UvScale {
    /// Keep UVs in texels
    pub const TEXELS: Self = Self { u: 1.0, v: 1.0 };

    /// Normalise UVs against a texture of the given size
    pub fn from_texture_size(width: u32, height: u32) -> Self {
        Self {
            u: 1.0 / width.max(1) as f32,
            v: 1.0 / height.max(1) as f32,
        }
    }

    /// Scale one raw UV pair
    pub fn apply(&self, raw: [i16; 2]) -> Vec2 {
        Vec2::new(
            f32::from(raw[0]) * self.u / 16.0,
            f32::from(raw[1]) * self.v / 16.0,
        )
    }
}

impl Default for UvScale {
    fn default() -> Self {
        Self::TEXELS
    }
}

/// An indexed triangle mesh with optional skinning.
///
/// Every vertex has exactly one UV; vertices shared by triangles with
/// different UVs have been duplicated. `uvs[i]` is `None` only for vertices
/// no triangle references.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SkinnedMesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Vertex normals, not renormalised
    pub normals: Vec<Vec3>,
    /// Vertex texture coordinates
    pub uvs: Vec<Option<Vec2>>,
    /// Triangles as vertex index triples
    pub triangles: Vec<[u32; 3]>,
    /// Bone weight spans over vertex indices
    pub weights: Vec<VertexWeight>,
}

impl SkinnedMesh {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether any vertex is bound to a bone
    pub fn is_skinned(&self) -> bool {
        !self.weights.is_empty()
    }

    /// Weight span covering `vertex`
    pub fn weight_for(&self, vertex: usize) -> Option<&VertexWeight> {
        find_weight(&self.weights, vertex)
    }

    /// Axis aligned bounds of all positions
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}
