use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::Serialize;

use super::decode_text;
use crate::{
    error::SaveError,
    fields::{read_bits, read_bytes, read_u16, read_u32, read_u8, read_uint_le},
    lookup::Lookup,
};

pub const PK3_SIZE_PARTY: usize = 100;
/// Boxed Pokemon use a compressed record without battle stats.
pub const PK3_SIZE_BOX: usize = 58;

const NICKNAME_OFFSET: usize = 0x08;
const NICKNAME_LENGTH: usize = 10;
const EGG_FLAG_BIT: u32 = 30;
const HIDDEN_ABILITY_FLAG_BIT: u32 = 31;
const IV_BITS: u32 = 5;
const PACKED_MOVE_BITS: u32 = 10;
const PACKED_MOVES_LENGTH: usize = 5;

/// EVs are stored HP, Atk, Def, Spe, SpA, SpD.
const EV_STORAGE_ORDER: [usize; 6] = [0, 1, 2, 4, 5, 3];

const PARTY_LEVEL_OFFSET: usize = 0x54;
const BOX_EXPERIENCE_OFFSET: usize = 0x20;

struct FieldOffsets {
    species: usize,
    held_item: usize,
    moves: usize,
    evs: usize,
    ivs: usize,
    /// Bit offset of each IV in HP, Atk, Def, SpA, SpD, Spe order.
    iv_shifts: [u32; 6],
}

const PARTY_OFFSETS: FieldOffsets = FieldOffsets {
    species: 0x20,
    held_item: 0x22,
    moves: 0x2c,
    evs: 0x38,
    ivs: 0x48,
    iv_shifts: [0, 5, 10, 20, 25, 15],
};

const BOX_OFFSETS: FieldOffsets = FieldOffsets {
    species: 0x1c,
    held_item: 0x1e,
    moves: 0x27,
    evs: 0x2c,
    ivs: 0x36,
    iv_shifts: [0, 5, 10, 15, 20, 25],
};

/// The two record formats: full party records and compressed box records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RecordLayout {
    Party,
    Box,
}

impl RecordLayout {
    pub const fn size(&self) -> usize {
        match self {
            RecordLayout::Party => PK3_SIZE_PARTY,
            RecordLayout::Box => PK3_SIZE_BOX,
        }
    }

    fn offsets(&self) -> &'static FieldOffsets {
        match self {
            RecordLayout::Party => &PARTY_OFFSETS,
            RecordLayout::Box => &BOX_OFFSETS,
        }
    }

    pub fn unpack_ivs(&self, ivs_egg_ability_blob: u32) -> StatBlock {
        let shifts = self.offsets().iv_shifts;
        let mut ivs = [0u8; 6];
        for (iv, shift) in ivs.iter_mut().zip(shifts) {
            *iv = read_bits(ivs_egg_ability_blob.into(), shift, IV_BITS) as u8;
        }
        StatBlock::from(ivs)
    }

    pub fn decode(&self, raw: &[u8], lookup: &dyn Lookup) -> Result<Pokemon, SaveError> {
        match self {
            RecordLayout::Party => Pokemon::from_party_record(raw),
            RecordLayout::Box => Pokemon::from_box_record(raw, lookup),
        }
    }
}

/// Four 10-bit move ids packed into a 40-bit little-endian value.
pub fn unpack_moves(packed: u64) -> [u16; 4] {
    let mut moves = [0u16; 4];
    for (idx, move_id) in moves.iter_mut().enumerate() {
        *move_id = read_bits(packed, PACKED_MOVE_BITS * idx as u32, PACKED_MOVE_BITS) as u16;
    }
    moves
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatBlock {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub special_attack: u8,
    pub special_defense: u8,
    pub speed: u8,
}

impl StatBlock {
    /// Stats paired with their short Showdown labels, in display order.
    pub fn labeled(&self) -> [(&'static str, u8); 6] {
        [
            ("HP", self.hp),
            ("Atk", self.attack),
            ("Def", self.defense),
            ("SpA", self.special_attack),
            ("SpD", self.special_defense),
            ("Spe", self.speed),
        ]
    }
}

impl From<[u8; 6]> for StatBlock {
    /// Values in HP, Atk, Def, SpA, SpD, Spe order.
    fn from(stats: [u8; 6]) -> Self {
        StatBlock {
            hp: stats[0],
            attack: stats[1],
            defense: stats[2],
            special_attack: stats[3],
            special_defense: stats[4],
            speed: stats[5],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AbilitySlot {
    Primary = 1,
    Secondary = 2,
}

impl AbilitySlot {
    pub fn from_personality(personality_value: u32) -> Self {
        if personality_value % 2 == 0 {
            AbilitySlot::Primary
        } else {
            AbilitySlot::Secondary
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromPrimitive, Serialize)]
pub enum Nature {
    #[default]
    Hardy = 0,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    pub fn from_personality(personality_value: u32) -> Self {
        Nature::from_u32(personality_value % 25).unwrap_or_default()
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One decoded Pokemon. Names are left as ids; resolve them through a
/// [`Lookup`].
#[derive(Clone, Debug, Serialize)]
pub struct Pokemon {
    pub layout: RecordLayout,
    pub personality_value: u32,
    pub species: u16,
    pub level: u8,
    /// Only boxed records carry experience; their level is derived from it.
    pub experience: Option<u32>,
    pub held_item: u16,
    pub nickname: String,
    pub evs: StatBlock,
    pub ivs: StatBlock,
    pub is_egg: bool,
    pub has_hidden_ability: bool,
    pub ability_slot: AbilitySlot,
    pub moves: [u16; 4],
    pub nature: Nature,
    #[serde(skip)]
    pub source_data: Vec<u8>,
}

impl Pokemon {
    pub fn from_party_record(raw: &[u8]) -> Result<Self, SaveError> {
        Self::decode(RecordLayout::Party, raw, |_| {
            Ok((read_u8(raw, PARTY_LEVEL_OFFSET)?, None))
        })
    }

    pub fn from_box_record(raw: &[u8], lookup: &dyn Lookup) -> Result<Self, SaveError> {
        Self::decode(RecordLayout::Box, raw, |species| {
            let experience = read_u32(raw, BOX_EXPERIENCE_OFFSET)?;
            let growth_rate = lookup.growth_rate(species)?;
            Ok((growth_rate.level_for_experience(experience), Some(experience)))
        })
    }

    fn decode(
        layout: RecordLayout,
        raw: &[u8],
        level_for_species: impl FnOnce(u16) -> Result<(u8, Option<u32>), SaveError>,
    ) -> Result<Self, SaveError> {
        if raw.len() != layout.size() {
            return Err(SaveError::InvalidRecordSize {
                layout,
                expected: layout.size(),
                actual: raw.len(),
            });
        }
        let offsets = layout.offsets();

        let personality_value = read_u32(raw, 0)?;
        let nickname = decode_text(read_bytes(raw, NICKNAME_OFFSET, NICKNAME_LENGTH)?);
        let species = read_u16(raw, offsets.species)?;
        let held_item = read_u16(raw, offsets.held_item)?;
        let (level, experience) = level_for_species(species)?;

        let stored_evs = read_bytes(raw, offsets.evs, 6)?;
        let evs = StatBlock::from(EV_STORAGE_ORDER.map(|idx| stored_evs[idx]));

        let ivs_egg_ability_blob = read_u32(raw, offsets.ivs)?;
        let ivs = layout.unpack_ivs(ivs_egg_ability_blob);
        let blob = u64::from(ivs_egg_ability_blob);
        let is_egg = read_bits(blob, EGG_FLAG_BIT, 1) != 0;
        let has_hidden_ability = read_bits(blob, HIDDEN_ABILITY_FLAG_BIT, 1) != 0;

        let moves = match layout {
            RecordLayout::Party => {
                let mut moves = [0u16; 4];
                for (idx, move_id) in moves.iter_mut().enumerate() {
                    *move_id = read_u16(raw, offsets.moves + 2 * idx)?;
                }
                moves
            }
            RecordLayout::Box => {
                unpack_moves(read_uint_le(raw, offsets.moves, PACKED_MOVES_LENGTH)?)
            }
        };

        let pkmn = Pokemon {
            layout,
            personality_value,
            species,
            level,
            experience,
            held_item,
            nickname,
            evs,
            ivs,
            is_egg,
            has_hidden_ability,
            ability_slot: AbilitySlot::from_personality(personality_value),
            moves,
            nature: Nature::from_personality(personality_value),
            source_data: raw.to_vec(),
        };
        log::trace!("Decoded {pkmn:?}");
        Ok(pkmn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{growth::GrowthRate, lookup::LookupTables};

    fn pack_ivs(layout: RecordLayout, ivs: [u8; 6]) -> u32 {
        layout
            .offsets()
            .iv_shifts
            .iter()
            .zip(ivs)
            .fold(0u32, |packed, (shift, iv)| packed | (u32::from(iv) << shift))
    }

    fn pack_moves(moves: [u16; 4]) -> [u8; 5] {
        let packed = moves
            .iter()
            .enumerate()
            .fold(0u64, |packed, (idx, id)| packed | (u64::from(*id) << (10 * idx)));
        let bytes = packed.to_le_bytes();
        [bytes[0], bytes[1], bytes[2], bytes[3], bytes[4]]
    }

    struct FixedGrowth(GrowthRate);

    impl Lookup for FixedGrowth {
        fn species_name(&self, species: u16) -> String {
            format!("#{species}")
        }
        fn move_name(&self, _move_id: u16) -> Option<String> {
            None
        }
        fn item_name(&self, _item: u16) -> String {
            String::from("None")
        }
        fn ability_name(&self, _slot: AbilitySlot, _species: &str, _hidden: bool) -> String {
            String::new()
        }
        fn growth_rate(&self, _species: u16) -> Result<GrowthRate, SaveError> {
            Ok(self.0)
        }
    }

    #[test]
    fn iv_layouts_round_trip() {
        for layout in [RecordLayout::Party, RecordLayout::Box] {
            let perfect = layout.unpack_ivs(pack_ivs(layout, [31; 6]));
            assert_eq!(perfect, StatBlock::from([31; 6]));

            let mixed = [1, 2, 3, 4, 5, 6];
            assert_eq!(layout.unpack_ivs(pack_ivs(layout, mixed)), StatBlock::from(mixed));
        }
    }

    #[test]
    fn iv_bit_orders_differ() {
        // Speed occupies bits 15..20 for party records, SpA for box records
        let word = 7 << 15;
        assert_eq!(RecordLayout::Party.unpack_ivs(word).speed, 7);
        assert_eq!(RecordLayout::Box.unpack_ivs(word).special_attack, 7);
        assert_eq!(RecordLayout::Box.unpack_ivs(word).speed, 0);
    }

    #[test]
    fn packed_moves_round_trip() {
        let moves = [1023, 0, 354, 85];
        let packed = pack_moves(moves);
        assert_eq!(unpack_moves(read_uint_le(&packed, 0, 5).unwrap()), moves);
    }

    #[test]
    fn decodes_party_record() {
        let mut raw = [0u8; PK3_SIZE_PARTY];
        raw[0..4].copy_from_slice(&28u32.to_le_bytes());
        raw[8..13].copy_from_slice(&[0xc3, 0xea, 0xed, 0xff, 0x00]);
        raw[0x20..0x22].copy_from_slice(&25u16.to_le_bytes());
        raw[0x22..0x24].copy_from_slice(&13u16.to_le_bytes());
        for (idx, move_id) in [85u16, 98, 0, 0].iter().enumerate() {
            raw[0x2c + 2 * idx..0x2e + 2 * idx].copy_from_slice(&move_id.to_le_bytes());
        }
        raw[0x38..0x3e].copy_from_slice(&[4, 8, 12, 252, 16, 20]);
        let blob = pack_ivs(RecordLayout::Party, [31, 30, 29, 28, 27, 26]) | (1 << 31);
        raw[0x48..0x4c].copy_from_slice(&blob.to_le_bytes());
        raw[0x54] = 42;

        let pkmn = Pokemon::from_party_record(&raw).unwrap();
        assert_eq!(pkmn.species, 25);
        assert_eq!(pkmn.held_item, 13);
        assert_eq!(pkmn.level, 42);
        assert_eq!(pkmn.experience, None);
        assert_eq!(pkmn.nickname, "Ivy");
        assert_eq!(pkmn.moves, [85, 98, 0, 0]);
        assert_eq!(pkmn.evs, StatBlock::from([4, 8, 12, 16, 20, 252]));
        assert_eq!(pkmn.ivs, StatBlock::from([31, 30, 29, 28, 27, 26]));
        assert!(!pkmn.is_egg);
        assert!(pkmn.has_hidden_ability);
        assert_eq!(pkmn.ability_slot, AbilitySlot::Primary);
        assert_eq!(pkmn.nature, Nature::Adamant);
        assert_eq!(pkmn.source_data, raw.to_vec());
    }

    #[test]
    fn decodes_box_record() {
        let mut raw = [0u8; PK3_SIZE_BOX];
        raw[0..4].copy_from_slice(&13u32.to_le_bytes());
        raw[8] = 0xff;
        raw[0x1c..0x1e].copy_from_slice(&150u16.to_le_bytes());
        raw[0x20..0x24].copy_from_slice(&125_000u32.to_le_bytes());
        raw[0x27..0x2c].copy_from_slice(&pack_moves([94, 105, 0, 0]));
        raw[0x2c..0x32].copy_from_slice(&[0, 0, 0, 252, 252, 4]);
        let blob = pack_ivs(RecordLayout::Box, [31, 0, 31, 31, 31, 31]) | (1 << 30);
        raw[0x36..0x3a].copy_from_slice(&blob.to_le_bytes());

        let pkmn = Pokemon::from_box_record(&raw, &FixedGrowth(GrowthRate::Medium)).unwrap();
        assert_eq!(pkmn.species, 150);
        assert_eq!(pkmn.held_item, 0);
        assert_eq!(pkmn.level, 50);
        assert_eq!(pkmn.experience, Some(125_000));
        assert_eq!(pkmn.nickname, "");
        assert_eq!(pkmn.moves, [94, 105, 0, 0]);
        assert_eq!(pkmn.evs, StatBlock::from([0, 0, 0, 252, 4, 252]));
        assert_eq!(pkmn.ivs.attack, 0);
        assert_eq!(pkmn.ivs.speed, 31);
        assert!(pkmn.is_egg);
        assert!(!pkmn.has_hidden_ability);
        assert_eq!(pkmn.ability_slot, AbilitySlot::Secondary);
        assert_eq!(pkmn.nature, Nature::Jolly);

        let slow = Pokemon::from_box_record(&raw, &FixedGrowth(GrowthRate::Slow)).unwrap();
        assert_eq!(slow.level, 46);
    }

    #[test]
    fn wrong_record_size_is_rejected() {
        let raw = [1u8; PK3_SIZE_BOX];
        assert_eq!(
            Pokemon::from_party_record(&raw).unwrap_err(),
            SaveError::InvalidRecordSize {
                layout: RecordLayout::Party,
                expected: PK3_SIZE_PARTY,
                actual: PK3_SIZE_BOX
            }
        );
        assert!(RecordLayout::Box
            .decode(&[1u8; PK3_SIZE_PARTY], &LookupTables::default())
            .is_err());
    }

    #[test]
    fn nature_follows_personality() {
        assert_eq!(Nature::from_personality(0), Nature::Hardy);
        assert_eq!(Nature::from_personality(24), Nature::Quirky);
        assert_eq!(Nature::from_personality(25 * 1000 + 10), Nature::Timid);
        assert_eq!(Nature::Timid.to_string(), "Timid");
    }
}
