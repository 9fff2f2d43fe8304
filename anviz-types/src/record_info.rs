//! Storage counters

use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Result, ensure_len};

/// Record and enrolment counters of the terminal
///
/// Each counter travels as a 3-byte group: one byte followed by a
/// big-endian `u16`. The two parts are summed into the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordInfo {
    pub users: u32,
    pub fingerprints: u32,
    pub passwords: u32,
    pub cards: u32,
    pub all_records: u32,
    pub new_records: u32,
}

impl RecordInfo {
    /// Encoded size
    pub const SIZE: usize = 18;

    /// Decode the counters block
    pub fn decode(payload: &[u8]) -> Result<Self> {
        ensure_len(payload, Self::SIZE)?;

        let count = |group: usize| counter(&payload[group * 3..group * 3 + 3]);

        Ok(Self {
            users: count(0),
            fingerprints: count(1),
            passwords: count(2),
            cards: count(3),
            all_records: count(4),
            new_records: count(5),
        })
    }
}

fn counter(group: &[u8]) -> u32 {
    u32::from(group[0]) + u32::from(BigEndian::read_u16(&group[1..3]))
}

impl fmt::Display for RecordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Records[users: {}, fingerprints: {}, passwords: {}, cards: {}, all: {}, new: {}]",
            self.users,
            self.fingerprints,
            self.passwords,
            self.cards,
            self.all_records,
            self.new_records
        )
    }
}
