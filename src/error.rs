use thiserror::Error;

use crate::pokemon::RecordLayout;

/// Everything that can go wrong while decoding a save image.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("invalid save file size: {0} bytes")]
    InvalidFileSize(usize),

    #[error("section {index} is {len} bytes, expected {expected}")]
    MalformedSection {
        index: usize,
        len: usize,
        expected: usize,
    },

    #[error("section id {0} appears more than once in a block")]
    DuplicateSectionId(u16),

    #[error("section id {0} is not present in the block")]
    MissingSectionId(u16),

    #[error("neither save block holds a valid save index")]
    NoValidBlock,

    #[error("{layout:?} record is {actual} bytes, expected {expected}")]
    InvalidRecordSize {
        layout: RecordLayout,
        expected: usize,
        actual: usize,
    },

    #[error("read of {len} bytes at offset {start} is outside a {size} byte buffer")]
    OutOfRange { start: usize, len: usize, size: usize },

    #[error("unsupported growth rate: {0}")]
    UnsupportedGrowthCategory(String),
}
