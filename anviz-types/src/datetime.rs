//! Device clock encoding
//!
//! ```text
//! ┌──────────┬───────┬─────┬──────┬────────┬────────┐
//! │ year-2000│ month │ day │ hour │ minute │ second │
//! │  1 byte  │   1   │  1  │  1   │   1    │   1    │
//! └──────────┴───────┴─────┴──────┴────────┴────────┘
//! ```

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result, ensure_len};

/// Base year of the on-wire year byte
pub const YEAR_BASE: i32 = 2000;

/// Encoded size
pub const SIZE: usize = 6;

/// Decode a device timestamp
///
/// # Examples
///
/// ```
/// use anviz_types::datetime;
///
/// let dt = datetime::decode(&[24, 3, 15, 10, 30, 0]).unwrap();
/// assert_eq!(dt.to_string(), "2024-03-15 10:30:00");
/// ```
pub fn decode(payload: &[u8]) -> Result<NaiveDateTime> {
    ensure_len(payload, SIZE)?;

    let [year, month, day, hour, minute, second] = [
        payload[0], payload[1], payload[2], payload[3], payload[4], payload[5],
    ];

    NaiveDate::from_ymd_opt(YEAR_BASE + i32::from(year), month.into(), day.into())
        .and_then(|date| date.and_hms_opt(hour.into(), minute.into(), second.into()))
        .ok_or_else(|| Error::Parse(format!("Invalid device timestamp: {:?}", &payload[..SIZE])))
}

/// Encode a timestamp for the set-clock command
pub fn encode(dt: &NaiveDateTime) -> Result<[u8; SIZE]> {
    let year = u8::try_from(dt.year() - YEAR_BASE).map_err(|_| {
        Error::Validation(format!(
            "Year {} outside device range {}..={}",
            dt.year(),
            YEAR_BASE,
            YEAR_BASE + i32::from(u8::MAX)
        ))
    })?;

    // chrono guarantees these fit in a byte
    Ok([
        year,
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_decode() {
        let dt = decode(&[24, 3, 15, 10, 30, 0]).unwrap();
        assert_eq!(dt, datetime(2024, 3, 15, 10, 30, 0));
    }

    #[test]
    fn test_decode_year_base() {
        let dt = decode(&[0, 1, 1, 0, 0, 0]).unwrap();
        assert_eq!(dt, datetime(2000, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_decode_invalid_date() {
        assert!(matches!(decode(&[24, 13, 1, 0, 0, 0]), Err(Error::Parse(_))));
        assert!(matches!(decode(&[23, 2, 29, 0, 0, 0]), Err(Error::Parse(_))));
        assert!(matches!(decode(&[24, 1, 1, 24, 0, 0]), Err(Error::Parse(_))));
    }

    #[test]
    fn test_decode_short_payload() {
        assert!(matches!(
            decode(&[24, 3, 15]),
            Err(Error::InvalidLength { expected: 6, actual: 3 })
        ));
    }

    #[test]
    fn test_encode() {
        let bytes = encode(&datetime(2024, 3, 15, 10, 30, 0)).unwrap();
        assert_eq!(bytes, [24, 3, 15, 10, 30, 0]);
    }

    #[test]
    fn test_encode_out_of_range() {
        assert!(matches!(
            encode(&datetime(1999, 12, 31, 23, 59, 59)),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            encode(&datetime(2256, 1, 1, 0, 0, 0)),
            Err(Error::Validation(_))
        ));
        assert!(encode(&datetime(2255, 12, 31, 23, 59, 59)).is_ok());
    }

    #[test]
    fn test_decode_inverts_encode() {
        let dt = datetime(2031, 7, 4, 18, 5, 59);
        assert_eq!(decode(&encode(&dt).unwrap()).unwrap(), dt);
    }
}
