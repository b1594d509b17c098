pub mod error;
pub mod fields;
pub mod growth;
pub mod lookup;
pub mod pokemon;
pub mod save;
pub mod storage;

pub use error::SaveError;
pub use growth::GrowthRate;
pub use lookup::{Lookup, LookupTables};
pub use pokemon::{AbilitySlot, Nature, Pokemon, RecordLayout, StatBlock};
pub use save::{Block, SaveFile, SaveSlot, Section};
pub use storage::BoxSlot;

const TEXT_TERMINATOR: u8 = 0xff;
const UNMAPPED_CHARACTER: &str = "?";

/// Decode game-encoded text, stopping at the first terminator byte.
pub fn decode_text(text_data: &[u8]) -> String {
    let mut out_text = String::new();
    for byte in text_data {
        if *byte == TEXT_TERMINATOR {
            break;
        }
        out_text.push_str(decode_character(*byte).unwrap_or(UNMAPPED_CHARACTER));
    }

    out_text
}

fn decode_character(byte: u8) -> Option<&'static str> {
    let decoded = match byte {
        0x00 | 0x0a | 0x18 | 0x1f => " ",
        0x01 => "À",
        0x02 => "Á",
        0x03 => "Â",
        0x04 => "Ç",
        0x05 => "È",
        0x06 => "É",
        0x07 => "Ê",
        0x08 => "Ë",
        0x09 => "Ì",
        0x0b => "Î",
        0x0c => "Ï",
        0x0d => "Ò",
        0x0e => "Ó",
        0x0f => "Ô",
        0x10 => "Œ",
        0x11 => "Ù",
        0x12 => "Ú",
        0x13 => "Û",
        0x14 => "Ñ",
        0x15 => "ß",
        0x16 => "à",
        0x17 => "á",
        0x19 => "ç",
        0x1a => "é",
        0x1b => "ê",
        0x1c => "ë",
        0x1d => "ì",
        0x1e => "í",
        0x20 => "ï",
        0x21 => "ò",
        0x22 => "ó",
        0x23 => "ô",
        0x24 => "œ",
        0x25 => "ù",
        0x26 => "ú",
        0x27 => "û",
        0x28 => "",
        0x29 => "ñ",
        0x2a => "ª",
        0x2b => "º",
        0x2c => "ᵉʳ",
        0x2d => "&",
        0x2e => "+",
        0x2f => "=",
        0x30 => ";",
        0x31 => "¿",
        0x32 => "¡",
        0x33 => "Pk",
        0x34 => "Mn",
        0x35 => "Po",
        0x36 => "ké",
        0x37 => "Í",
        0x38 => "%",
        0x39 => "(",
        0x3a => ")",
        0x3b => "▾",
        0x3c => "▸",
        0x3d => "▹",
        0x3e => "♀",
        0x3f => "♂",
        // Unused in the western character set; the game renders them blank
        0x40..=0x7f | 0x92 | 0x93 | 0x98 | 0x9a..=0x9f => " ",
        0x80 | 0xa1 => "0",
        0x81 | 0xa2 => "1",
        0x82 | 0xa3 => "2",
        0x83 | 0xa4 => "3",
        0x84 | 0xa5 => "4",
        0x85 | 0xa6 => "5",
        0x86 | 0xa7 => "6",
        0x87 | 0xa8 => "7",
        0x88 | 0xa9 => "8",
        0x89 | 0xaa => "9",
        0x8a | 0xab => "!",
        0x8b | 0xac => "?",
        0x8c | 0xad => ".",
        0x8d | 0xae => "-",
        0x8e => "·",
        0x8f => "…",
        0x90 | 0xb1 => "“",
        0x91 | 0xb2 => "”",
        0x94 | 0xb5 => "♂",
        0x95 | 0xb6 => "♀",
        0x96 | 0xb7 => "$",
        0x97 | 0xb8 => ",",
        0x99 => "÷",
        0xa0 => "ʳᵉ",
        0xaf => "･",
        0xb0 => "‥",
        0xb3 => "‘",
        0xb4 => "'",
        0xb9 => "×",
        0xba => "/",
        0xbb => "A",
        0xbc => "B",
        0xbd => "C",
        0xbe => "D",
        0xbf => "E",
        0xc0 => "F",
        0xc1 => "G",
        0xc2 => "H",
        0xc3 => "I",
        0xc4 => "J",
        0xc5 => "K",
        0xc6 => "L",
        0xc7 => "M",
        0xc8 => "N",
        0xc9 => "O",
        0xca => "P",
        0xcb => "Q",
        0xcc => "R",
        0xcd => "S",
        0xce => "T",
        0xcf => "U",
        0xd0 => "V",
        0xd1 => "W",
        0xd2 => "X",
        0xd3 => "Y",
        0xd4 => "Z",
        0xd5 => "a",
        0xd6 => "b",
        0xd7 => "c",
        0xd8 => "d",
        0xd9 => "e",
        0xda => "f",
        0xdb => "g",
        0xdc => "h",
        0xdd => "i",
        0xde => "j",
        0xdf => "k",
        0xe0 => "l",
        0xe1 => "m",
        0xe2 => "n",
        0xe3 => "o",
        0xe4 => "p",
        0xe5 => "q",
        0xe6 => "r",
        0xe7 => "s",
        0xe8 => "t",
        0xe9 => "u",
        0xea => "v",
        0xeb => "w",
        0xec => "x",
        0xed => "y",
        0xee => "z",
        0xef => "►",
        0xf0 => ":",
        0xf1 => "Ä",
        0xf2 => "Ö",
        0xf3 => "Ü",
        0xf4 => "ä",
        0xf5 => "ö",
        0xf6 => "ü",
        // Control codes (line breaks, placeholders)
        0xf7..=0xfe => " ",
        _ => return None,
    };
    Some(decoded)
}
