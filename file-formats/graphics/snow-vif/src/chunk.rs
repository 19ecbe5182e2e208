//! Per micro-program scratch data

use snow_data::GifTag;

use crate::weight::VertexWeight;

/// Strip slot record: three VU addresses with flag bits
pub type StripRecord = [u16; 3];

/// Everything uploaded before one `MSCAL`.
///
/// Chunks only live while a mesh is decoded; [`crate::assemble_mesh`] folds
/// them into a [`crate::SkinnedMesh`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    /// Micro-program started by the `MSCAL` that closed the chunk
    pub micro_program: Option<u16>,
    /// GIF tag describing the strip (first tag of a V4-32 unpack)
    pub strip_tag: Option<GifTag>,
    /// Second tag of a two-tag V4-32 unpack
    pub extra_tag: Option<GifTag>,
    /// Tags passed through `DIRECT`
    pub direct_tags: Vec<GifTag>,
    /// Raw positions, 1/16 units
    pub vertices: Vec<[i16; 3]>,
    /// Raw normals, 1/127 units
    pub normals: Vec<[i8; 3]>,
    /// Strip slot records
    pub strip_records: Vec<StripRecord>,
    /// Extra strip remaps, four shorts per entry, entry 0 holds the count
    pub strip_remaps: Option<Vec<u16>>,
    /// Raw UVs, one per strip slot, 1/16 texel units
    pub uvs: Vec<[i16; 2]>,
    /// Weight spans in chunk-local vertex indices
    pub weights: Vec<VertexWeight>,
}

impl Chunk {
    /// Create an empty chunk
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of uploaded vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}
