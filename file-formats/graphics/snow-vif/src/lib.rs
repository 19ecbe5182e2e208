#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod assemble;
pub mod chunk;
pub mod command;
pub mod error;
pub mod mesh;
pub mod model;
pub mod reader;
pub mod strip;
pub mod weight;

pub use assemble::assemble_mesh;
pub use chunk::Chunk;
pub use error::{Error, Result};
pub use mesh::{SkinnedMesh, UvScale};
pub use model::{DecodedMesh, VifHeader, VifModel, decode_mesh, decode_vif};
pub use reader::{ChunkStream, StreamStop, read_chunks};
pub use strip::StripTable;
pub use weight::{BoneInfluence, VertexWeight};
