//! # Julian date helpers
//!
//! ## Overview
//!
//! Calendar conversions used when ingesting element sets and interpreting their
//! epochs. The propagator itself only ever sees **split Julian dates** (a whole
//! day ending in `.5` plus a day fraction in `[0, 1)`), which preserve far more
//! precision than a single f64 Julian date.
//!
//! The arithmetic follows Vallado's reference routines so that epochs derived
//! here agree bit for bit with the historical propagator implementations.

use crate::constants::MINUTES_PER_DAY;

/// Julian date of 1949 December 31 00:00 UT, the propagator's internal epoch
/// ("days from 0 Jan 1950").
pub const JD_1950: f64 = 2433281.5;

/// Find the Julian date of a calendar date and time (Vallado, alg 14).
///
/// Arguments
/// ---------
/// * `year`: 1900..2100
/// * `month`: 1..12
/// * `day`: day of month
/// * `hour`, `minute`, `second`: universal time of day
///
/// Return
/// ------
/// * the Julian date in days from 4713 BC.
pub fn julian_day(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> f64 {
    367.0 * year as f64
        - ((7 * (year + ((month as i32 + 9) / 12))) as f64 * 0.25).floor()
        + (275 * month / 9) as f64
        + day as f64
        + 1721013.5
        + ((second / 60.0 + minute as f64) / 60.0 + hour as f64) / 24.0
}

/// Convert a day of the year to month, day, hour, minute and second.
///
/// Leap years are determined by `year % 4` alone, which holds over the
/// 1900..2100 range the two-digit TLE epoch can express.
pub fn days2mdhms(year: i32, days: f64) -> (u32, u32, u32, u32, f64) {
    let lmonth: [u32; 12] = if year % 4 == 0 {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let day_of_year = days.floor() as u32;

    let mut month = 1usize;
    let mut accumulated = 0u32;
    while month < 12 && day_of_year > accumulated + lmonth[month - 1] {
        accumulated += lmonth[month - 1];
        month += 1;
    }
    let day = day_of_year - accumulated;

    let mut temp = (days - day_of_year as f64) * 24.0;
    let hour = temp.floor() as u32;
    temp = (temp - hour as f64) * 60.0;
    let minute = temp.floor() as u32;
    let second = (temp - minute as f64) * 60.0;

    (month as u32, day, hour, minute, second)
}

/// Find the calendar date and time of a Julian date (Vallado, alg 22).
///
/// Return
/// ------
/// * `(year, month, day, hour, minute, second)`
pub fn invjday(jd: f64) -> (i32, u32, u32, u32, u32, f64) {
    let temp = jd - 2415019.5;
    let tu = temp / 365.25;
    let mut year = 1900 + tu.floor() as i32;
    let mut leap_years = ((year - 1901) as f64 * 0.25).floor();

    // nudge by 8.64e-7 sec to get even outputs
    let mut days = temp - ((year - 1900) as f64 * 365.0 + leap_years) + 0.00000000001;

    if days < 1.0 {
        year -= 1;
        leap_years = ((year - 1901) as f64 * 0.25).floor();
        days = temp - ((year - 1900) as f64 * 365.0 + leap_years);
    }

    let (month, day, hour, minute, second) = days2mdhms(year, days);
    (year, month, day, hour, minute, second - 0.00000086400)
}

/// Split a TLE epoch (4-digit year + fractional day of year) into a split
/// Julian date.
///
/// The whole part lands on a `.5` day boundary; the fraction is rounded to the
/// 8 decimal digits a TLE can store, carrying into the whole day when rounding
/// reaches 1.0.
pub fn tle_epoch_to_split_jd(year: i32, epoch_days: f64) -> (f64, f64) {
    let days = epoch_days.floor();
    let mut fraction = round8(epoch_days - days);
    let mut whole = (year as f64) * 365.0 + ((year - 1) / 4) as f64 + days + 1721044.5;
    if fraction >= 1.0 {
        whole += 1.0;
        fraction -= 1.0;
    }
    (whole, fraction)
}

/// Round a day fraction to the 8 decimal digits a TLE stores.
pub(crate) fn round8(fraction: f64) -> f64 {
    (fraction * 1.0e8).round() / 1.0e8
}

/// Elapsed minutes between a split Julian date and a split epoch.
///
/// Differencing whole and fractional parts separately keeps sub-millisecond
/// precision over decades-long spans.
pub(crate) fn elapsed_minutes(jd: f64, fr: f64, epoch_jd: f64, epoch_fr: f64) -> f64 {
    (jd - epoch_jd) * MINUTES_PER_DAY + (fr - epoch_fr) * MINUTES_PER_DAY
}
