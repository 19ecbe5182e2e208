//! Command stream interpretation
//!
//! [`read_chunks`] walks one mesh's command stream and splits it into
//! [`Chunk`]s at every `MSCAL`. Each opcode category has its own handler that
//! fills the chunk under construction; UV unpacks go to the chunk closed by
//! the preceding `MSCAL` because the VU pipeline delays them by one program.

use std::fmt;

use snow_data::{ByteRegion, GIF_TAG_SIZE, GifTag, SnowDataError};

use crate::chunk::Chunk;
use crate::command::{KNOWN_MICRO_PROGRAMS, Opcode, Unpack, UnpackShape, VIF_CODE_SIZE, VifCode};
use crate::error::Result;
use crate::weight::{BoneInfluence, FULL_WEIGHT, NO_BONE, VertexWeight};

/// Why a mesh stream stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStop {
    /// Every command up to the end of the stream was interpreted
    Completed,
    /// An unknown command or unpack shape ended the stream early
    Unsupported {
        /// Stream offset of the offending command
        offset: usize,
        /// What was not understood
        reason: String,
    },
    /// A command's payload ran past the end of the stream
    Truncated {
        /// Stream offset of the offending command
        offset: usize,
        /// The failed read
        error: SnowDataError,
    },
    /// More commands than the stream length allows were seen
    CommandLimit {
        /// Stream offset where decoding gave up
        offset: usize,
    },
}

impl fmt::Display for StreamStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("complete"),
            Self::Unsupported { offset, reason } => write!(f, "{reason} at {offset:#x}"),
            Self::Truncated { offset, error } => write!(f, "truncated at {offset:#x}: {error}"),
            Self::CommandLimit { offset } => write!(f, "command limit reached at {offset:#x}"),
        }
    }
}

/// Chunks recovered from one mesh stream
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkStream {
    /// Chunks closed by an `MSCAL`, in stream order
    pub chunks: Vec<Chunk>,
    /// How the stream ended
    pub stop: StreamStop,
}

impl ChunkStream {
    /// Whether the whole stream was interpreted
    pub fn is_complete(&self) -> bool {
        self.stop == StreamStop::Completed
    }
}

/// Interpret the command stream covering all of `stream`.
///
/// Problems inside the stream never fail the call: decoding stops and the
/// chunks closed so far are returned together with the reason.
pub fn read_chunks(stream: &ByteRegion<'_>) -> ChunkStream {
    let mut reader = ChunkReader::new(stream);
    let stop = reader.run();
    match &stop {
        StreamStop::Completed => {}
        StreamStop::Unsupported { offset, reason } => {
            log::warn!("VIF stream aborted at {offset:#x}: {reason}");
        }
        StreamStop::Truncated { offset, error } => {
            log::warn!("VIF stream truncated at {offset:#x}: {error}");
        }
        StreamStop::CommandLimit { offset } => {
            log::warn!("VIF stream exceeded its command budget at {offset:#x}");
        }
    }
    if reader.current != Chunk::default() {
        log::trace!("Discarding data uploaded after the last MSCAL");
    }
    log::debug!("Read {} chunks", reader.chunks.len());

    ChunkStream {
        chunks: reader.chunks,
        stop,
    }
}

/// Outcome of one command handler
enum Step {
    Continue,
    Abort(String),
}

struct ChunkReader<'r, 'a> {
    stream: &'r ByteRegion<'a>,
    offset: usize,
    current: Chunk,
    chunks: Vec<Chunk>,
}

impl<'r, 'a> ChunkReader<'r, 'a> {
    fn new(stream: &'r ByteRegion<'a>) -> Self {
        Self {
            stream,
            offset: 0,
            current: Chunk::new(),
            chunks: Vec::new(),
        }
    }

    fn run(&mut self) -> StreamStop {
        // Every command advances at least one word, so this bound is never
        // reached by a well formed stream.
        let budget = self.stream.len() / VIF_CODE_SIZE + 1;
        let mut commands = 0;

        while self.offset < self.stream.len() {
            if commands == budget {
                return StreamStop::CommandLimit {
                    offset: self.offset,
                };
            }
            commands += 1;

            let offset = self.offset;
            match self.step() {
                Ok(Step::Continue) => {}
                Ok(Step::Abort(reason)) => return StreamStop::Unsupported { offset, reason },
                Err(crate::Error::Data(error)) => return StreamStop::Truncated { offset, error },
                Err(other) => {
                    return StreamStop::Unsupported {
                        offset,
                        reason: other.to_string(),
                    };
                }
            }
        }
        StreamStop::Completed
    }

    fn step(&mut self) -> Result<Step> {
        let code = VifCode::read(self.stream, self.offset)?;
        let opcode = code.opcode();
        log::trace!("{:#06x}: {opcode:?} num={} imm={:#x}", self.offset, code.num, code.immediate);

        match opcode {
            Opcode::MsCal => self.micro_program(code.immediate),
            Opcode::Direct => self.direct(code.immediate)?,
            Opcode::Unpack(unpack) => return self.unpack(unpack, code.num),
            Opcode::Unknown(command) => {
                return Ok(Step::Abort(format!("unknown command {command:#04x}")));
            }
            _ => {}
        }
        if let Some(size) = opcode.fixed_size() {
            self.offset += size;
        }
        Ok(Step::Continue)
    }

    fn micro_program(&mut self, id: u16) {
        if !KNOWN_MICRO_PROGRAMS.contains(&id) {
            log::warn!("Micro-program {id} not recognised, treating it like the known ones");
        }
        self.current.micro_program = Some(id);
        let finished = std::mem::take(&mut self.current);
        self.chunks.push(finished);
    }

    fn direct(&mut self, count: u16) -> Result<()> {
        let base = self.offset + VIF_CODE_SIZE;
        for i in 0..usize::from(count) {
            let tag = GifTag::parse(self.stream, base + i * GIF_TAG_SIZE)?;
            self.current.direct_tags.push(tag);
        }
        self.offset = base + usize::from(count) * GIF_TAG_SIZE;
        Ok(())
    }

    fn unpack(&mut self, unpack: Unpack, num: u8) -> Result<Step> {
        let Some(shape) = unpack.shape() else {
            return Ok(Step::Abort(format!(
                "unpack vn={} vl={}",
                unpack.vn, unpack.vl
            )));
        };
        let num = usize::from(num);
        let start = self.offset + VIF_CODE_SIZE;

        self.offset = match shape {
            UnpackShape::V2_16 => self.uvs(start, num)?,
            UnpackShape::V3_16 => self.vertices(start, num, unpack.unsigned)?,
            UnpackShape::V3_8 => self.normals(start, num)?,
            UnpackShape::V4_32 => self.strip_tags(start, num)?,
            UnpackShape::V4_16 => self.strip_remaps(start, num, unpack.unsigned)?,
            UnpackShape::V4_8 => self.weights(start, num)?,
        };
        Ok(Step::Continue)
    }

    fn uvs(&mut self, start: usize, num: usize) -> Result<usize> {
        match self.chunks.last_mut() {
            Some(previous) => {
                for i in 0..num {
                    let at = start + i * 4;
                    previous
                        .uvs
                        .push([self.stream.get_le_short(at)?, self.stream.get_le_short(at + 2)?]);
                }
            }
            None => log::debug!("Dropping {num} UVs that precede the first MSCAL"),
        }
        Ok(start + num * 4)
    }

    fn vertices(&mut self, start: usize, num: usize, unsigned: bool) -> Result<usize> {
        for i in 0..num {
            let at = start + i * 6;
            if unsigned {
                self.current.strip_records.push([
                    self.stream.get_le_ushort(at)?,
                    self.stream.get_le_ushort(at + 2)?,
                    self.stream.get_le_ushort(at + 4)?,
                ]);
            } else {
                self.current.vertices.push([
                    self.stream.get_le_short(at)?,
                    self.stream.get_le_short(at + 2)?,
                    self.stream.get_le_short(at + 4)?,
                ]);
            }
        }
        Ok((start + num * 6 + 3) & !3)
    }

    fn normals(&mut self, start: usize, num: usize) -> Result<usize> {
        for i in 0..num {
            let at = start + i * 3;
            self.current.normals.push([
                self.stream.get_byte(at)?,
                self.stream.get_byte(at + 1)?,
                self.stream.get_byte(at + 2)?,
            ]);
        }
        Ok(start + ((num * 3 + 3) & !3))
    }

    fn strip_tags(&mut self, start: usize, num: usize) -> Result<usize> {
        if num == 1 || num == 2 {
            self.current.strip_tag = Some(GifTag::parse(self.stream, start)?);
        }
        if num == 2 {
            self.current.extra_tag = Some(GifTag::parse(self.stream, start + GIF_TAG_SIZE)?);
        }
        Ok(start + num * GIF_TAG_SIZE)
    }

    fn strip_remaps(&mut self, start: usize, num: usize, unsigned: bool) -> Result<usize> {
        if unsigned {
            let remaps = (0..num * 4)
                .map(|i| self.stream.get_le_ushort(start + i * 2))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            self.current.strip_remaps = Some(remaps);
        } else {
            log::debug!("Ignoring signed V4-16 unpack of {num} entries");
        }
        Ok(start + num * 8)
    }

    /// Weight records are four bytes: bone*4, weight, then either a second
    /// bone*4 and weight or 0xFF and a run length. A two bone record whose
    /// weights fall short of full continues into a second record holding
    /// bones three and four.
    fn weights(&mut self, start: usize, num: usize) -> Result<usize> {
        let mut at = start;
        let mut byte = || -> Result<u8> {
            let value = self.stream.get_unsigned_byte(at)?;
            at += 1;
            Ok(value)
        };

        let mut spans = Vec::new();
        let mut vertex = 0;
        let mut record = 0;
        while record < num {
            let first_vertex = vertex;
            let bone1 = byte()? / 4;
            let weight1 = byte()?;
            let mut influences = vec![BoneInfluence {
                bone: bone1,
                weight: weight1,
            }];

            let bone2 = byte()?;
            if bone2 == NO_BONE {
                vertex += usize::from(byte()?);
            } else {
                let weight2 = byte()?;
                influences.push(BoneInfluence {
                    bone: bone2 / 4,
                    weight: weight2,
                });
                vertex += 1;

                if u16::from(weight1) + u16::from(weight2) < FULL_WEIGHT {
                    record += 1;
                    let bone3 = byte()? / 4;
                    let weight3 = byte()?;
                    influences.push(BoneInfluence {
                        bone: bone3,
                        weight: weight3,
                    });
                    let bone4 = byte()?;
                    let weight4 = byte()?;
                    if bone4 != NO_BONE {
                        influences.push(BoneInfluence {
                            bone: bone4 / 4,
                            weight: weight4,
                        });
                    }
                }
            }
            spans.push(VertexWeight {
                start: first_vertex,
                end: vertex,
                influences,
            });
            record += 1;
        }

        self.current.weights.extend(spans);
        Ok(at)
    }
}
