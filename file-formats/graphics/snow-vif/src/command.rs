//! VIF command words
//!
//! Every command starts with a 32-bit word:
//!
//! | Bits  | Field | Meaning                                 |
//! |-------|-------|-----------------------------------------|
//! | 0-15  | IMM   | immediate operand                       |
//! | 16-23 | NUM   | item count for UNPACK                   |
//! | 24-30 | CMD   | command, bit 7 (interrupt) is ignored   |
//!
//! UNPACK commands have bits 5 and 6 of CMD set; the low bits select the
//! element shape (`vn` components of `vl` width) and whether a write mask is
//! applied. Their IMM carries the VU address, the unsigned flag and the
//! TOPS-relative flag.

use snow_data::ByteRegion;

use crate::error::Result;

/// Size of a command word
pub const VIF_CODE_SIZE: usize = 4;

/// Micro-program entry points the decoder recognises
pub const KNOWN_MICRO_PROGRAMS: [u16; 3] = [66, 68, 70];

/// One decoded command word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VifCode {
    /// CMD with the interrupt bit masked off
    pub command: u8,
    /// NUM field
    pub num: u8,
    /// IMM field
    pub immediate: u16,
}

impl VifCode {
    /// Read the command word at `offset`
    pub fn read(region: &ByteRegion<'_>, offset: usize) -> Result<Self> {
        Ok(Self {
            command: region.get_unsigned_byte(offset + 3)? & 0x7F,
            num: region.get_unsigned_byte(offset + 2)?,
            immediate: region.get_le_ushort(offset)?,
        })
    }

    /// Classify the command
    pub fn opcode(&self) -> Opcode {
        match self.command {
            0x00 => Opcode::Nop,
            0x01 => Opcode::StCycl,
            0x04 => Opcode::Itop,
            0x05 => Opcode::StMod,
            0x11 => Opcode::Flush,
            0x14 => Opcode::MsCal,
            0x20 => Opcode::StMask,
            0x50 => Opcode::Direct,
            cmd if cmd & 0x60 == 0x60 => Opcode::Unpack(Unpack::from_code(cmd, self.immediate)),
            cmd => Opcode::Unknown(cmd),
        }
    }
}

/// Command categories, grouped by what the decoder does with them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// NOP
    Nop,
    /// STCYCL, write cycle setup
    StCycl,
    /// ITOP, set the ITOP register
    Itop,
    /// STMOD, addition mode setup
    StMod,
    /// FLUSH, wait for the GIF
    Flush,
    /// MSCAL, run a micro-program
    MsCal,
    /// STMASK, followed by a 32-bit mask word
    StMask,
    /// DIRECT, IMM GIF tag quadwords passed straight to the GIF
    Direct,
    /// UNPACK into VU memory
    Unpack(Unpack),
    /// Anything else
    Unknown(u8),
}

impl Opcode {
    /// Bytes taken by commands that carry no payload the decoder reads
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Nop | Self::StCycl | Self::Itop | Self::StMod | Self::Flush | Self::MsCal => {
                Some(VIF_CODE_SIZE)
            }
            Self::StMask => Some(VIF_CODE_SIZE + 4),
            Self::Direct | Self::Unpack(_) | Self::Unknown(_) => None,
        }
    }
}

/// Fields of an UNPACK command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unpack {
    /// Components per element minus one
    pub vn: u8,
    /// Component width: 0 = 32 bit, 1 = 16 bit, 2 = 8 bit, 3 = 5:5:5:1
    pub vl: u8,
    /// Write mask applied
    pub masked: bool,
    /// Zero-extend rather than sign-extend
    pub unsigned: bool,
    /// Address is relative to TOPS
    pub tops_relative: bool,
    /// Destination VU address in quadwords
    pub address: u16,
}

impl Unpack {
    fn from_code(command: u8, immediate: u16) -> Self {
        Self {
            vn: (command >> 2) & 3,
            vl: command & 3,
            masked: command & 0x10 != 0,
            unsigned: immediate & 0x4000 != 0,
            tops_relative: immediate & 0x8000 != 0,
            address: immediate & 0x1FF,
        }
    }

    /// Payload shape, `None` for shapes the geometry files never use
    pub fn shape(&self) -> Option<UnpackShape> {
        match (self.vn, self.vl) {
            (1, 1) => Some(UnpackShape::V2_16),
            (2, 1) => Some(UnpackShape::V3_16),
            (2, 2) => Some(UnpackShape::V3_8),
            (3, 0) => Some(UnpackShape::V4_32),
            (3, 1) => Some(UnpackShape::V4_16),
            (3, 2) => Some(UnpackShape::V4_8),
            _ => None,
        }
    }
}

/// UNPACK element shapes and what they carry in geometry streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackShape {
    /// UV pairs for the previous chunk
    V2_16,
    /// Positions, or strip slot records when unsigned
    V3_16,
    /// Normals
    V3_8,
    /// One or two GIF tags
    V4_32,
    /// Extra strip remaps when unsigned
    V4_16,
    /// Bone weight records
    V4_8,
}
