//! GIF tag parsing
//!
//! A GIF tag is the 16-byte descriptor that precedes every block of data sent
//! to the PS2 graphics synthesizer. Textures carry them around their palette
//! and image transfers; geometry streams embed them to describe primitives.
//!
//! Layout of the first 64-bit word:
//!
//! | Bits  | Field | Meaning                              |
//! |-------|-------|--------------------------------------|
//! | 0-14  | NLOOP | loop count                           |
//! | 15    | EOP   | end of packet                        |
//! | 46    | PRE   | PRIM field enable                    |
//! | 47-57 | PRIM  | primitive setup                      |
//! | 58-59 | FLG   | data format                          |
//! | 60-63 | NREG  | registers per loop item              |
//!
//! The second 64-bit word holds up to sixteen 4-bit register descriptors.

use std::fmt;

use crate::error::Result;
use crate::region::ByteRegion;

/// Size of a GIF tag in bytes
pub const GIF_TAG_SIZE: usize = 0x10;

/// Primitive type value for a triangle strip (low three bits of PRIM)
pub const PRIM_TRIANGLE_STRIP: u16 = 4;

/// Data format selected by the FLG field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum GifFormat {
    /// Register/value pairs, one qword each
    Packed,
    /// Register values only, packed two per qword
    RegList,
    /// Raw image data for a host-to-local transfer
    Image,
    /// Reserved value, behaves like `Image` on hardware
    Disabled,
}

impl GifFormat {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Self::Packed,
            1 => Self::RegList,
            2 => Self::Image,
            _ => Self::Disabled,
        }
    }

    /// Raw two-bit FLG value
    pub fn bits(self) -> u8 {
        match self {
            Self::Packed => 0,
            Self::RegList => 1,
            Self::Image => 2,
            Self::Disabled => 3,
        }
    }
}

/// A decoded GIF tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GifTag {
    /// NLOOP: number of items following the tag
    pub loop_count: u16,
    /// EOP: last tag of the packet
    pub end_of_packet: bool,
    /// PRE: whether `prim` is written to the PRIM register
    pub prim_enabled: bool,
    /// PRIM: primitive flags, type in the low three bits
    pub prim: u16,
    /// FLG: data format of the following items
    pub format: GifFormat,
    /// NREG: registers per item as stored (0 means 16 on hardware)
    pub registers_per_item: u8,
    /// REGS: packed 4-bit register descriptors
    pub registers: u64,
}

impl GifTag {
    /// Parse the tag stored at `offset` in `region`
    pub fn parse(region: &ByteRegion<'_>, offset: usize) -> Result<Self> {
        let low = region.get_le_ulong(offset)?;
        let registers = region.get_le_ulong(offset + 8)?;
        Ok(Self::from_words(low, registers))
    }

    /// Decode a tag from its two 64-bit words
    pub fn from_words(low: u64, registers: u64) -> Self {
        Self {
            loop_count: (low & 0x7FFF) as u16,
            end_of_packet: (low >> 15) & 1 == 1,
            prim_enabled: (low >> 46) & 1 == 1,
            prim: ((low >> 47) & 0x7FF) as u16,
            format: GifFormat::from_bits((low >> 58) as u8),
            registers_per_item: ((low >> 60) & 0xF) as u8,
            registers,
        }
    }

    /// Encode the tag back into its two 64-bit words
    pub fn to_words(&self) -> (u64, u64) {
        let low = u64::from(self.loop_count & 0x7FFF)
            | (u64::from(self.end_of_packet) << 15)
            | (u64::from(self.prim_enabled) << 46)
            | (u64::from(self.prim & 0x7FF) << 47)
            | (u64::from(self.format.bits()) << 58)
            | (u64::from(self.registers_per_item & 0xF) << 60);
        (low, self.registers)
    }

    /// Primitive type (low three bits of PRIM)
    pub fn primitive_type(&self) -> u16 {
        self.prim & 0x7
    }

    /// Whether the primitive is a triangle strip
    pub fn is_triangle_strip(&self) -> bool {
        self.primitive_type() == PRIM_TRIANGLE_STRIP
    }

    /// Register descriptor `index` (0..16) from the REGS word
    pub fn register(&self, index: usize) -> Option<u8> {
        (index < 16).then(|| ((self.registers >> (index * 4)) & 0xF) as u8)
    }
}

impl fmt::Display for GifTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GIFTag nloop={} eop={} pre={} prim={:#x} flg={:?} nreg={} regs={:#018x}",
            self.loop_count,
            self.end_of_packet,
            self.prim_enabled,
            self.prim,
            self.format,
            self.registers_per_item,
            self.registers
        )
    }
}
