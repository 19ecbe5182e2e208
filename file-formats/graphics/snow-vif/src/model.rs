//! VIF file header and whole-file decoding

use snow_data::ByteRegion;

use crate::assemble::assemble_mesh;
use crate::error::{Error, Result};
use crate::mesh::{SkinnedMesh, UvScale};
use crate::reader::{StreamStop, read_chunks};

/// Offset of the mesh count byte
pub const MESH_COUNT_OFFSET: usize = 0x12;

/// Offset of the mesh offset table
pub const MESH_TABLE_OFFSET: usize = 0x28;

/// Mesh table of a VIF file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VifHeader {
    /// Number of meshes
    pub mesh_count: u8,
    /// Start offsets of every mesh followed by the end of the last one
    pub mesh_offsets: Vec<u32>,
}

impl VifHeader {
    /// Read and validate the mesh table
    pub fn parse(region: &ByteRegion<'_>) -> Result<Self> {
        let mesh_count = region.get_unsigned_byte(MESH_COUNT_OFFSET)?;
        let mesh_offsets = (0..=usize::from(mesh_count))
            .map(|i| region.get_le_uint(MESH_TABLE_OFFSET + i * 4))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for (i, pair) in mesh_offsets.windows(2).enumerate() {
            if pair[0] > pair[1] {
                return Err(Error::malformed_header(format!(
                    "mesh {i} ends at {:#x} before it starts at {:#x}",
                    pair[1], pair[0]
                )));
            }
        }
        if let Some(&end) = mesh_offsets.last() {
            if end as usize > region.len() {
                return Err(Error::malformed_header(format!(
                    "mesh data ends at {end:#x}, past the file end {:#x}",
                    region.len()
                )));
            }
        }

        Ok(Self {
            mesh_count,
            mesh_offsets,
        })
    }

    /// Byte range `[start, end)` of mesh `index`
    pub fn mesh_span(&self, index: usize) -> Option<(usize, usize)> {
        let start = *self.mesh_offsets.get(index)? as usize;
        let end = *self.mesh_offsets.get(index + 1)? as usize;
        Some((start, end))
    }
}

/// Outcome of decoding one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMesh {
    /// Position in the mesh table
    pub index: usize,
    /// Chunks recovered from the stream
    pub chunk_count: usize,
    /// How the command stream ended
    pub stop: StreamStop,
    /// The assembled mesh, or why assembly failed
    pub mesh: Result<SkinnedMesh>,
}

/// All meshes of a VIF file
#[derive(Debug, Clone, PartialEq)]
pub struct VifModel {
    header: VifHeader,
    meshes: Vec<DecodedMesh>,
}

impl VifModel {
    /// The mesh table
    pub fn header(&self) -> &VifHeader {
        &self.header
    }

    /// Every mesh in table order
    pub fn meshes(&self) -> &[DecodedMesh] {
        &self.meshes
    }

    /// Meshes that assembled successfully
    pub fn valid_meshes(&self) -> impl Iterator<Item = &SkinnedMesh> {
        self.meshes.iter().filter_map(|m| m.mesh.as_ref().ok())
    }
}

/// Decode the command stream in `stream` as mesh number `index`
pub fn decode_mesh(index: usize, stream: &ByteRegion<'_>, scale: UvScale) -> DecodedMesh {
    let chunks = read_chunks(stream);
    let mesh = assemble_mesh(&chunks.chunks, scale);
    if let Err(err) = &mesh {
        log::warn!("Mesh {index} skipped: {err}");
    }
    DecodedMesh {
        index,
        chunk_count: chunks.chunks.len(),
        stop: chunks.stop,
        mesh,
    }
}

/// Decode every mesh of the VIF file in `region`.
///
/// Only an unreadable mesh table fails the call. Each mesh carries its own
/// result, and a stream that stops early still yields the chunks read up to
/// that point.
pub fn decode_vif(region: &ByteRegion<'_>, scale: UvScale) -> Result<VifModel> {
    let header = VifHeader::parse(region)?;
    log::debug!("VIF with {} meshes", header.mesh_count);

    let mut meshes = Vec::with_capacity(usize::from(header.mesh_count));
    for index in 0..usize::from(header.mesh_count) {
        let Some((start, end)) = header.mesh_span(index) else {
            break;
        };
        let stream = region.sub_region(start, end - start)?;
        meshes.push(decode_mesh(index, &stream, scale));
    }

    Ok(VifModel { header, meshes })
}
