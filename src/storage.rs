//! Gathers raw Pokemon records out of the party section and the PC box
//! storage, which is spread over vanilla and expansion sections.

use std::fmt;

use serde::Serialize;

use crate::{
    error::SaveError,
    fields::read_bytes,
    pokemon::{RecordLayout, PK3_SIZE_BOX, PK3_SIZE_PARTY},
    save::Block,
};

pub const PARTY_SECTION_ID: u16 = 1;
const PARTY_OFFSET: usize = 0x38;
pub const MAX_PARTY_SIZE: usize = 6;

pub const BOX_COUNT: usize = 25;
pub const SLOTS_PER_BOX: usize = 30;
pub const BOX_CAPACITY: usize = BOX_COUNT * SLOTS_PER_BOX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Region {
    Vanilla,
    Expansion,
}

/// A byte window in the payload of one section that holds boxed Pokemon.
#[derive(Clone, Copy, Debug)]
struct BoxWindow {
    region: Region,
    section_id: u16,
    start: usize,
    end: usize,
}

const fn vanilla(section_id: u16, start: usize, end: usize) -> BoxWindow {
    BoxWindow {
        region: Region::Vanilla,
        section_id,
        start,
        end,
    }
}

const fn expansion(section_id: u16, start: usize, end: usize) -> BoxWindow {
    BoxWindow {
        region: Region::Expansion,
        section_id,
        start,
        end,
    }
}

/// Box storage in box order. Boxes 1-19 live in the vanilla PC sections (the
/// first four bytes of section 5 are the current box index), boxes 20-22 in
/// the expansion region, boxes 23-24 in spare room of sections 2 and 3 and
/// box 25 in section 0.
const BOX_WINDOWS: [BoxWindow; 14] = [
    vanilla(5, 0x004, 0xff0),
    vanilla(6, 0x000, 0xff0),
    vanilla(7, 0x000, 0xff0),
    vanilla(8, 0x000, 0xff0),
    vanilla(9, 0x000, 0xff0),
    vanilla(10, 0x000, 0xff0),
    vanilla(11, 0x000, 0xff0),
    vanilla(12, 0x000, 0xff0),
    vanilla(13, 0x000, 0x1a8),
    expansion(30, 0xb0c, 0xff0),
    expansion(31, 0x000, 0xf80),
    vanilla(2, 0xf18, 0xff0),
    vanilla(3, 0x000, 0xcc0),
    vanilla(0, 0x0b0, 0x77c),
];

/// 1-based box number and slot of a boxed Pokemon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct BoxSlot {
    pub box_number: u8,
    pub slot: u8,
}

impl BoxSlot {
    /// Position of the record at `index` in the reconstructed box storage.
    pub fn from_index(index: usize) -> Self {
        BoxSlot {
            box_number: (index / SLOTS_PER_BOX + 1) as u8,
            slot: (index % SLOTS_PER_BOX + 1) as u8,
        }
    }

    /// Inverse of [`BoxSlot::from_index`]. `None` when the box or slot number
    /// is outside the PC.
    pub fn index(&self) -> Option<usize> {
        let box_index = usize::from(self.box_number).checked_sub(1)?;
        let slot_index = usize::from(self.slot).checked_sub(1)?;
        if box_index >= BOX_COUNT || slot_index >= SLOTS_PER_BOX {
            return None;
        }
        Some(box_index * SLOTS_PER_BOX + slot_index)
    }
}

impl fmt::Display for BoxSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "box {} slot {}", self.box_number, self.slot)
    }
}

/// Party records in slot order. The party is packed from the front, so the
/// first empty slot ends it.
pub fn party_records<'a>(active_block: &Block<'a>) -> Result<Vec<&'a [u8]>, SaveError> {
    let section = active_block.section(PARTY_SECTION_ID)?;
    let party_data = read_bytes(
        section.payload(),
        PARTY_OFFSET,
        MAX_PARTY_SIZE * PK3_SIZE_PARTY,
    )?;

    let records = party_data
        .chunks_exact(RecordLayout::Party.size())
        .take_while(|record| record[0] != 0)
        .collect::<Vec<_>>();
    log::debug!("Found {} Pokemon in the party", records.len());
    Ok(records)
}

/// Concatenate every box window into one contiguous buffer of
/// [`BOX_CAPACITY`] box records.
pub fn box_storage(active_block: &Block, expansion_block: &Block) -> Result<Vec<u8>, SaveError> {
    let mut box_data = Vec::with_capacity(BOX_CAPACITY * PK3_SIZE_BOX);
    for window in BOX_WINDOWS.iter() {
        let block = match window.region {
            Region::Vanilla => active_block,
            Region::Expansion => expansion_block,
        };
        let section = block.section(window.section_id)?;
        let bytes = read_bytes(section.payload(), window.start, window.end - window.start)?;
        log::trace!(
            "Section {} contributes {} bytes of box storage",
            window.section_id,
            bytes.len()
        );
        box_data.extend_from_slice(bytes);
    }

    debug_assert_eq!(box_data.len(), BOX_CAPACITY * PK3_SIZE_BOX);
    Ok(box_data)
}

/// Occupied box records with their positions. Empty slots may sit anywhere in
/// a box, so they are filtered out rather than ending the walk.
pub fn box_records(box_data: &[u8]) -> impl Iterator<Item = (BoxSlot, &[u8])> {
    box_data
        .chunks_exact(RecordLayout::Box.size())
        .take(BOX_CAPACITY)
        .enumerate()
        .filter(|(_, record)| record[0] != 0)
        .map(|(index, record)| (BoxSlot::from_index(index), record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_cover_every_box_slot() {
        let total: usize = BOX_WINDOWS.iter().map(|w| w.end - w.start).sum();
        assert_eq!(total, BOX_CAPACITY * PK3_SIZE_BOX);

        // Each group of windows holds whole records
        let vanilla_boxes: usize = BOX_WINDOWS[..9].iter().map(|w| w.end - w.start).sum();
        assert_eq!(vanilla_boxes, 19 * SLOTS_PER_BOX * PK3_SIZE_BOX);
        let expansion_boxes: usize = BOX_WINDOWS[9..11].iter().map(|w| w.end - w.start).sum();
        assert_eq!(expansion_boxes, 3 * SLOTS_PER_BOX * PK3_SIZE_BOX);
    }

    #[test]
    fn box_slot_numbering() {
        assert_eq!(
            BoxSlot::from_index(0),
            BoxSlot {
                box_number: 1,
                slot: 1
            }
        );
        assert_eq!(
            BoxSlot::from_index(749),
            BoxSlot {
                box_number: 25,
                slot: 30
            }
        );
        assert_eq!(BoxSlot::from_index(571).index(), Some(571));
        assert_eq!(BoxSlot::from_index(31).to_string(), "box 2 slot 2");
    }

    #[test]
    fn out_of_range_box_slots_have_no_index() {
        for (box_number, slot) in [(0, 1), (1, 0), (26, 1), (1, 31), (0, 0)] {
            assert_eq!(BoxSlot { box_number, slot }.index(), None, "{box_number}/{slot}");
        }
        assert_eq!(
            BoxSlot {
                box_number: 25,
                slot: 30
            }
            .index(),
            Some(BOX_CAPACITY - 1)
        );
    }

    #[test]
    fn empty_box_slots_are_filtered_anywhere() {
        let mut box_data = vec![0u8; 4 * PK3_SIZE_BOX];
        box_data[PK3_SIZE_BOX] = 1;
        box_data[3 * PK3_SIZE_BOX] = 2;
        // Non-zero bytes after an empty first byte do not make a record
        box_data[2 * PK3_SIZE_BOX + 5] = 9;

        let found = box_records(&box_data)
            .map(|(slot, record)| (slot.index(), record[0]))
            .collect::<Vec<_>>();
        assert_eq!(found, vec![(Some(1), 1), (Some(3), 2)]);
    }
}
