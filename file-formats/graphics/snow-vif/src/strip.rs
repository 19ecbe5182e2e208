//! Triangle strip reconstruction
//!
//! The micro-program builds each strip in VU memory: every slot record names
//! the address a new vertex is written to, optionally copies an earlier
//! slot's vertex to another address, and carries the ADC bit (0x8000) that
//! stops the GS from drawing the triangle closed by that slot. Addresses are
//! in quadwords, so dividing by the registers per vertex gives the strip
//! slot.

use snow_data::GifTag;

use crate::chunk::StripRecord;

/// Flag on a slot that suppresses the triangle ending there
pub const SKIP_FLAG: u16 = 0x8000;

const ADDRESS_MASK: u16 = 0x1FF;
const VERTEX_MASK: u16 = 0xFF;

/// Registers written per strip vertex (NREG, where 0 means 16)
pub fn registers_per_vertex(tag: &GifTag) -> usize {
    match tag.registers_per_item {
        0 => 16,
        n => usize::from(n),
    }
}

/// Vertex index and skip flag for every slot of one chunk's strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripTable {
    slots: Vec<u16>,
}

impl StripTable {
    /// Replay the slot records and remaps of a chunk.
    ///
    /// The strip length is the tag's loop count. Records start at index 2;
    /// record `k` writes vertex `k - 2`. Writes that land outside the strip
    /// are dropped.
    pub fn build(
        tag: &GifTag,
        records: &[StripRecord],
        remaps: Option<&[u16]>,
        vertex_count: usize,
    ) -> Self {
        let len = usize::from(tag.loop_count);
        let regs = registers_per_vertex(tag);
        let slot_of = |address: u16| usize::from(address & ADDRESS_MASK) / regs;
        let mut slots = vec![0u16; len];

        for (index, &[write, copy_from, copy_to]) in records.iter().enumerate().skip(2) {
            let vertex = index - 2;

            let (src, dest) = (slot_of(copy_from), slot_of(copy_to));
            if src < len && dest < len {
                slots[dest] = (slots[src] & ADDRESS_MASK) | (copy_to & SKIP_FLAG);
            }

            let slot = slot_of(write);
            if vertex < vertex_count && slot < len {
                slots[slot] = vertex as u16 | (write & SKIP_FLAG);
            }
        }

        if let Some(remaps) = remaps {
            let count = remaps.first().copied().map_or(0, usize::from);
            for entry in 1..=count {
                let base = entry * 4;
                for pair in [base, base + 2] {
                    let (Some(&from), Some(&to)) = (remaps.get(pair), remaps.get(pair + 1)) else {
                        log::debug!("Strip remap table ends before entry {entry}");
                        break;
                    };
                    let (src, dest) = (slot_of(from), slot_of(to));
                    if src < len && dest < len {
                        slots[dest] = (to & SKIP_FLAG) | (slots[src] & ADDRESS_MASK);
                    } else {
                        log::debug!("Strip remap {src} -> {dest} outside {len} slots");
                    }
                }
            }
        }

        Self { slots }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the strip has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Raw slot values
    pub fn slots(&self) -> &[u16] {
        &self.slots
    }

    /// Chunk-local vertex written to `slot`
    pub fn vertex(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).map(|s| usize::from(s & VERTEX_MASK))
    }

    /// Whether the triangle ending at `slot` is suppressed
    pub fn is_skipped(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|s| s & SKIP_FLAG != 0)
    }

    /// Slot triples of the triangles the strip draws
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (2..self.slots.len())
            .filter(|&i| !self.is_skipped(i))
            .map(|i| [i - 2, i - 1, i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip_tag(loop_count: u16, regs: u8) -> GifTag {
        GifTag::from_words(u64::from(loop_count) | (4 << 47) | (u64::from(regs) << 60), 0)
    }

    /// Records writing vertex k to slot k, with slot 3 flagged
    fn linear_records(slots: u16, regs: u16) -> Vec<StripRecord> {
        let mut records = vec![[0x1FF, 0x1FF, 0x1FF]; 2];
        for k in 0..slots {
            let flag = if k == 3 { SKIP_FLAG } else { 0 };
            records.push([(k * regs) | flag, 0x1FF, 0x1FF]);
        }
        records
    }

    #[test]
    fn test_skip_flag_suppresses_triangle() {
        let table = StripTable::build(&strip_tag(5, 3), &linear_records(5, 3), None, 5);
        assert_eq!(table.slots(), [0, 1, 2, 3 | SKIP_FLAG, 4]);
        assert_eq!(table.triangles().collect::<Vec<_>>(), [[0, 1, 2], [2, 3, 4]]);
    }

    #[test]
    fn test_two_slot_strip_draws_nothing() {
        let table = StripTable::build(&strip_tag(2, 3), &linear_records(2, 3), None, 2);
        assert_eq!(table.triangles().count(), 0);
    }

    #[test]
    fn test_copy_reuses_earlier_vertex() {
        let mut records = linear_records(3, 3);
        // fourth record copies slot 0 into slot 3, then writes nothing usable
        records.push([0x1FF, 0, 9 | SKIP_FLAG]);
        let table = StripTable::build(&strip_tag(4, 3), &records, None, 3);
        assert_eq!(table.vertex(3), Some(0));
        assert!(table.is_skipped(3));
    }

    #[test]
    fn test_remaps_apply_after_records() {
        let records = linear_records(4, 2);
        let remaps = [1, 0, 0, 0, 2, 0, 6, 0];
        let table = StripTable::build(&strip_tag(4, 2), &records, Some(&remaps), 4);
        assert_eq!(table.vertex(0), Some(3));
        assert!(!table.is_skipped(0));
    }

    #[test]
    fn test_nreg_zero_means_sixteen() {
        assert_eq!(registers_per_vertex(&strip_tag(4, 0)), 16);
        assert_eq!(registers_per_vertex(&strip_tag(4, 3)), 3);
    }
}
