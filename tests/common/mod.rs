#![allow(dead_code)]

use satrec::{GravityModel, OperationMode, Satrec};

pub const ISS_LINE1: &str =
    "1 25544U 98067A   19343.69339541  .00001764  00000-0  40967-4 0  9000";
pub const ISS_LINE2: &str =
    "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

pub const VANGUARD_LINE1: &str =
    "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
pub const VANGUARD_LINE2: &str =
    "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";

/// A 12-hour-class deep-space orbit (period well past the 225-minute line).
pub const MOLNIYA_LINE1: &str =
    "1 04632U 70093B   04031.91070959 -.00000084  00000-0  10000-3 0  9955";
pub const MOLNIYA_LINE2: &str =
    "2 04632  11.4628 273.1101 1450506 207.6000 143.9350  1.20231981 44145";

pub fn iss() -> Satrec {
    Satrec::from_tle(
        ISS_LINE1,
        ISS_LINE2,
        GravityModel::Wgs72,
        OperationMode::Improved,
    )
    .unwrap()
}

pub fn vanguard() -> Satrec {
    Satrec::from_tle(
        VANGUARD_LINE1,
        VANGUARD_LINE2,
        GravityModel::Wgs72,
        OperationMode::Improved,
    )
    .unwrap()
}

pub fn molniya() -> Satrec {
    Satrec::from_tle(
        MOLNIYA_LINE1,
        MOLNIYA_LINE2,
        GravityModel::Wgs72,
        OperationMode::Improved,
    )
    .unwrap()
}

/// A synthetic geosynchronous record, close enough to one revolution per
/// sidereal day to land in the resonance band of the deep-space integrator.
pub fn geosync() -> Satrec {
    Satrec::from_elements(
        GravityModel::Wgs72,
        OperationMode::Improved,
        90001,
        25545.5,
        0.0,
        0.0,
        0.0,
        0.0002,
        1.0,
        0.05,
        2.0,
        0.004375,
        4.0,
    )
}

/// A record whose semi-major axis sits below the surface: decayed at epoch.
pub fn sub_orbital() -> Satrec {
    Satrec::from_elements(
        GravityModel::Wgs72,
        OperationMode::Improved,
        90002,
        25545.0,
        0.0,
        0.0,
        0.0,
        0.001,
        0.0,
        0.9,
        0.0,
        0.0871,
        0.0,
    )
}

/// A low orbit with an absurd negative drag term: its mean eccentricity
/// leaves `[0, 1)` within a day, producing error code 1.
pub fn runaway_drag() -> Satrec {
    Satrec::from_elements(
        GravityModel::Wgs72,
        OperationMode::Improved,
        90003,
        25545.0,
        -1.0e6,
        0.0,
        0.0,
        0.01,
        0.0,
        0.9,
        0.0,
        16.0 * std::f64::consts::TAU / 1440.0,
        0.0,
    )
}
