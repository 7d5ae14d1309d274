//! # Alpha-5 satellite number codec
//!
//! ## Overview
//!
//! Catalog numbers only get five columns in a TLE. Numbers up to 99999 are
//! stored as plain digits; beyond that, the Alpha-5 scheme replaces the leading
//! digit pair with a single letter, extending the range to 339999 (`Z9999`).
//! The letters I and O are skipped to avoid confusion with the digits 1 and 0.
//!
//! Encoding and decoding are exact inverses over `[0, 339999]`: a decoded field
//! whose leading letter is I or O is rejected rather than silently aliased onto
//! a neighboring range.

use crate::satrec_errors::SatrecError;

/// Largest catalog number representable in Alpha-5 ("Z9999").
pub const MAX_SATELLITE_NUMBER: u32 = 339_999;

/// Decode a 5-column catalog field into a satellite number.
///
/// Arguments
/// ---------
/// * `field`: exactly five catalog columns, either all digits or one leading
///   uppercase letter followed by four digits.
///
/// Return
/// ------
/// * the decoded satellite number in `[0, 339999]`.
pub fn decode(field: &str) -> Result<u32, SatrecError> {
    let invalid = || SatrecError::InvalidSatelliteNumber(field.to_string());
    if field.len() != 5 {
        return Err(invalid());
    }
    let mut chars = field.chars();
    let first = chars.next().ok_or_else(invalid)?;

    if !first.is_ascii_uppercase() {
        return field.parse::<u32>().map_err(|_| invalid());
    }

    if first == 'I' || first == 'O' {
        return Err(invalid());
    }
    let mut lead = first as u32 - 'A' as u32 + 10;
    if first > 'I' {
        lead -= 1;
    }
    if first > 'O' {
        lead -= 1;
    }

    let rest = chars.as_str();
    if rest.len() != 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let tail: u32 = rest.parse().map_err(|_| invalid())?;
    Ok(lead * 10_000 + tail)
}

/// Encode a satellite number into its 5-column catalog field.
///
/// Numbers below 100000 are zero-padded digits; larger ones get an Alpha-5
/// leading letter. Numbers above [`MAX_SATELLITE_NUMBER`] are rejected.
pub fn encode(satnum: u32) -> Result<String, SatrecError> {
    if satnum < 100_000 {
        return Ok(format!("{satnum:05}"));
    }
    if satnum > MAX_SATELLITE_NUMBER {
        return Err(SatrecError::InvalidSatelliteNumber(format!(
            "{satnum} exceeds 339999, whose Alpha-5 encoding is 'Z9999'"
        )));
    }
    let mut lead = satnum / 10_000 + 'A' as u32 - 10;
    if lead >= 'I' as u32 {
        lead += 1;
    }
    if lead >= 'O' as u32 {
        lead += 1;
    }
    let letter = char::from_u32(lead).ok_or_else(|| {
        SatrecError::InvalidSatelliteNumber(satnum.to_string())
    })?;
    Ok(format!("{letter}{:04}", satnum % 10_000))
}

#[cfg(test)]
mod alpha5_test {
    use super::*;

    #[test]
    fn test_decode_digits() {
        assert_eq!(decode("25544").unwrap(), 25544);
        assert_eq!(decode("00005").unwrap(), 5);
    }

    #[test]
    fn test_decode_letters() {
        assert_eq!(decode("A0001").unwrap(), 100001);
        assert_eq!(decode("H9999").unwrap(), 179999);
        // J follows H once I is skipped
        assert_eq!(decode("J0000").unwrap(), 180000);
        assert_eq!(decode("N9999").unwrap(), 229999);
        assert_eq!(decode("P0000").unwrap(), 230000);
        assert_eq!(decode("Z9999").unwrap(), 339999);
    }

    #[test]
    fn test_decode_rejects_i_and_o() {
        assert!(decode("I0000").is_err());
        assert!(decode("O1234").is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_width() {
        // a bare number that would fit is still not a catalog field
        assert!(decode("544").is_err());
        assert!(decode("5").is_err());
        assert!(decode("025544").is_err());
        assert!(decode("25544 ").is_err());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("").is_err());
        assert!(decode("A12B4").is_err());
        assert!(decode("a0001").is_err());
        assert!(decode("A123").is_err());
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(5).unwrap(), "00005");
        assert_eq!(encode(99999).unwrap(), "99999");
        assert_eq!(encode(100000).unwrap(), "A0000");
        assert_eq!(encode(339999).unwrap(), "Z9999");
        assert!(encode(340000).is_err());
    }

    #[test]
    fn test_round_trip_bijection() {
        for n in 0..=MAX_SATELLITE_NUMBER {
            let field = encode(n).unwrap();
            assert_eq!(decode(&field).unwrap(), n, "field {field}");
        }
    }

    #[test]
    fn test_encoded_letters_skip_i_and_o() {
        for n in (100_000..=MAX_SATELLITE_NUMBER).step_by(10_000) {
            let field = encode(n).unwrap();
            let first = field.chars().next().unwrap();
            assert!(first != 'I' && first != 'O', "field {field}");
        }
    }
}
