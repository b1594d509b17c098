use std::collections::HashMap;

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    error::SaveError,
    fields::{read_bytes, read_u16, read_u32},
    lookup::Lookup,
    pokemon::Pokemon,
    storage::{self, BoxSlot},
};

pub const GAME_SAVE_DATA_LENGTH: usize = 0x20000;
/// Real-time clock footer some emulators append to the save image.
pub const RTC_FOOTER_LENGTH: usize = 0x10;

pub const SECTION_SIZE: usize = 0x1000;
pub const SECTION_DATA_SIZE: usize = 0xff0;
const SECTION_ID_OFFSET: usize = 0x0ff4;
const SECTION_CHECKSUM_OFFSET: usize = 0x0ff6;
const SAVE_INDEX_OFFSET: usize = 0x0ffc;

pub const NUMBER_OF_SECTIONS: usize = 14;
const SAVE_BLOCK_SIZE: usize = NUMBER_OF_SECTIONS * SECTION_SIZE;
const SAVE_A_OFFSET: usize = 0x0000;
const SAVE_B_OFFSET: usize = SAVE_A_OFFSET + SAVE_BLOCK_SIZE;

/// The expansion region sits where sections 30 and 31 would be if the save
/// image were one long run of sections.
pub const EXPANSION_SECTION_IDS: [u16; 2] = [30, 31];
const EXPANSION_OFFSET: usize = EXPANSION_SECTION_IDS[0] as usize * SECTION_SIZE;

/// An erased block reports this save index.
const INVALID_SAVE_INDEX: u32 = 0xffff_ffff;

/// One 4 KiB slice of a save block: payload followed by a footer.
#[derive(Clone, Copy, Debug)]
pub struct Section<'a> {
    index: usize,
    section_id: u16,
    raw: &'a [u8],
}

impl<'a> Section<'a> {
    pub fn new(index: usize, raw: &'a [u8]) -> Result<Self, SaveError> {
        if raw.len() != SECTION_SIZE {
            log::error!(
                "Section {index} has {} bytes, expected {SECTION_SIZE}",
                raw.len()
            );
            return Err(SaveError::MalformedSection {
                index,
                len: raw.len(),
                expected: SECTION_SIZE,
            });
        }

        Ok(Section {
            index,
            section_id: read_u16(raw, SECTION_ID_OFFSET)?,
            raw,
        })
    }

    /// Physical position of the section within its block.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Logical id; taken from the footer unless the block assigned one.
    pub fn section_id(&self) -> u16 {
        self.section_id
    }

    pub fn payload(&self) -> &'a [u8] {
        &self.raw[..SECTION_DATA_SIZE]
    }

    /// Stored footer checksum. Never verified against the payload.
    pub fn checksum(&self) -> u16 {
        LittleEndian::read_u16(&self.raw[SECTION_CHECKSUM_OFFSET..])
    }

    pub fn save_index(&self) -> u32 {
        LittleEndian::read_u32(&self.raw[SAVE_INDEX_OFFSET..])
    }
}

/// A run of consecutive sections, looked up by logical id. The game rotates
/// sections on every save so physical order says nothing about the id.
#[derive(Clone, Debug)]
pub struct Block<'a> {
    sections: Vec<Section<'a>>,
    by_id: HashMap<u16, usize>,
}

impl<'a> Block<'a> {
    pub fn from_bytes(data: &'a [u8], section_count: usize) -> Result<Self, SaveError> {
        let sections = split_sections(data, section_count)?;
        Self::index_sections(sections)
    }

    /// Build a block whose section ids are fixed by position instead of being
    /// read from the footers.
    pub fn with_assigned_ids(data: &'a [u8], section_ids: &[u16]) -> Result<Self, SaveError> {
        let mut sections = split_sections(data, section_ids.len())?;
        for (section, section_id) in sections.iter_mut().zip(section_ids) {
            section.section_id = *section_id;
        }
        Self::index_sections(sections)
    }

    fn index_sections(sections: Vec<Section<'a>>) -> Result<Self, SaveError> {
        let mut by_id = HashMap::with_capacity(sections.len());
        for (position, section) in sections.iter().enumerate() {
            if by_id.insert(section.section_id, position).is_some() {
                log::error!("Duplicate section id {} in block", section.section_id);
                return Err(SaveError::DuplicateSectionId(section.section_id));
            }
        }

        Ok(Block { sections, by_id })
    }

    pub fn section(&self, section_id: u16) -> Result<&Section<'a>, SaveError> {
        self.by_id
            .get(&section_id)
            .map(|position| &self.sections[*position])
            .ok_or(SaveError::MissingSectionId(section_id))
    }

    /// Sections in physical order.
    pub fn sections(&self) -> &[Section<'a>] {
        &self.sections
    }

    /// Generation counter, read from the physically last section.
    pub fn save_index(&self) -> u32 {
        self.sections
            .last()
            .map(Section::save_index)
            .unwrap_or(INVALID_SAVE_INDEX)
    }
}

fn split_sections(data: &[u8], section_count: usize) -> Result<Vec<Section<'_>>, SaveError> {
    (0..section_count)
        .map(|index| {
            let start = index * SECTION_SIZE;
            let end = (start + SECTION_SIZE).min(data.len());
            Section::new(index, data.get(start..end).unwrap_or_default())
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveSlot {
    A,
    B,
}

/// Read-only view over a whole save image: both redundant game saves plus the
/// expansion region that holds the extra PC boxes.
pub struct SaveFile<'a> {
    active_slot: SaveSlot,
    active_block: Block<'a>,
    backup_block: Option<Block<'a>>,
    expansion_block: Block<'a>,
}

impl<'a> SaveFile<'a> {
    pub fn open(data: &'a [u8]) -> Result<Self, SaveError> {
        let trimmed = trim_save_data(data)?;

        let save_index_a = terminal_save_index(trimmed, SAVE_A_OFFSET)?;
        let save_index_b = terminal_save_index(trimmed, SAVE_B_OFFSET)?;
        log::debug!("Save Index A: {save_index_a}");
        log::debug!("Save Index B: {save_index_b}");
        let active_slot = determine_active_slot(save_index_a, save_index_b)?;
        log::debug!("Using save block {active_slot:?}");

        let (active_offset, backup_offset, backup_index) = match active_slot {
            SaveSlot::A => (SAVE_A_OFFSET, SAVE_B_OFFSET, save_index_b),
            SaveSlot::B => (SAVE_B_OFFSET, SAVE_A_OFFSET, save_index_a),
        };
        let active_block =
            Block::from_bytes(block_window(trimmed, active_offset)?, NUMBER_OF_SECTIONS)?;
        // An erased block carries no usable section ids, so it is left unindexed.
        // Nothing is decoded from the backup, so a damaged one is not fatal.
        let backup_block = if backup_index == INVALID_SAVE_INDEX {
            None
        } else {
            match Block::from_bytes(block_window(trimmed, backup_offset)?, NUMBER_OF_SECTIONS) {
                Ok(block) => Some(block),
                Err(err) => {
                    log::warn!("Ignoring unreadable backup save block: {err}");
                    None
                }
            }
        };

        let expansion_data = read_bytes(
            data,
            EXPANSION_OFFSET,
            EXPANSION_SECTION_IDS.len() * SECTION_SIZE,
        )?;
        let expansion_block = Block::with_assigned_ids(expansion_data, &EXPANSION_SECTION_IDS)?;

        Ok(SaveFile {
            active_slot,
            active_block,
            backup_block,
            expansion_block,
        })
    }

    pub fn active_slot(&self) -> SaveSlot {
        self.active_slot
    }

    /// The block stored in `slot`, if it holds a save.
    pub fn block(&self, slot: SaveSlot) -> Option<&Block<'a>> {
        if slot == self.active_slot {
            Some(&self.active_block)
        } else {
            self.backup_block.as_ref()
        }
    }

    pub fn active_block(&self) -> &Block<'a> {
        &self.active_block
    }

    pub fn expansion_block(&self) -> &Block<'a> {
        &self.expansion_block
    }

    pub fn get_party(&self) -> Result<Vec<Pokemon>, SaveError> {
        storage::party_records(&self.active_block)?
            .into_iter()
            .map(Pokemon::from_party_record)
            .collect()
    }

    /// Every occupied PC slot, in box order. Records that cannot be decoded
    /// are logged and skipped; they do not affect their neighbours.
    pub fn get_boxes(&self, lookup: &dyn Lookup) -> Result<Vec<(BoxSlot, Pokemon)>, SaveError> {
        let box_data = storage::box_storage(&self.active_block, &self.expansion_block)?;
        Ok(storage::box_records(&box_data)
            .filter_map(|(slot, record)| match Pokemon::from_box_record(record, lookup) {
                Ok(pkmn) => Some((slot, pkmn)),
                Err(err) => {
                    log::warn!("Skipping Pokemon in {slot}: {err}");
                    None
                }
            })
            .collect())
    }

    pub fn get_box(
        &self,
        box_number: u8,
        lookup: &dyn Lookup,
    ) -> Result<Vec<(u8, Pokemon)>, SaveError> {
        Ok(self
            .get_boxes(lookup)?
            .into_iter()
            .filter(|(slot, _)| slot.box_number == box_number)
            .map(|(slot, pkmn)| (slot.slot, pkmn))
            .collect())
    }
}

fn trim_save_data(data: &[u8]) -> Result<&[u8], SaveError> {
    match data.len() {
        GAME_SAVE_DATA_LENGTH => Ok(data),
        len if len == GAME_SAVE_DATA_LENGTH + RTC_FOOTER_LENGTH => {
            log::debug!("Trimming {RTC_FOOTER_LENGTH} byte clock footer");
            Ok(&data[..GAME_SAVE_DATA_LENGTH])
        }
        len => {
            log::error!(
                "Invalid file length for a game save. Found: {len}, Expected: {GAME_SAVE_DATA_LENGTH}"
            );
            Err(SaveError::InvalidFileSize(len))
        }
    }
}

fn block_window(data: &[u8], offset: usize) -> Result<&[u8], SaveError> {
    read_bytes(data, offset, SAVE_BLOCK_SIZE)
}

fn terminal_save_index(data: &[u8], block_offset: usize) -> Result<u32, SaveError> {
    let terminal_section = block_offset + (NUMBER_OF_SECTIONS - 1) * SECTION_SIZE;
    read_u32(data, terminal_section + SAVE_INDEX_OFFSET)
}

fn determine_active_slot(save_index_a: u32, save_index_b: u32) -> Result<SaveSlot, SaveError> {
    match (save_index_a, save_index_b) {
        (INVALID_SAVE_INDEX, INVALID_SAVE_INDEX) => {
            log::error!("Both save blocks are erased");
            Err(SaveError::NoValidBlock)
        }
        (INVALID_SAVE_INDEX, _) => Ok(SaveSlot::B),
        (_, INVALID_SAVE_INDEX) => Ok(SaveSlot::A),
        (a, b) if a >= b => Ok(SaveSlot::A),
        _ => Ok(SaveSlot::B),
    }
}
