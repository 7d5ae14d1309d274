//! # Constants and type definitions for the propagator
//!
//! This module centralizes the **gravity models**, **conversion factors**, and **common
//! enumerations** used throughout the crate.
//!
//! ## Overview
//!
//! - The three standard gravity constant sets (WGS-72 old, WGS-72, WGS-84)
//! - Unit conversions (degrees ↔ radians, revolutions/day ↔ radians/minute)
//! - The AFSPC/improved operation mode switch
//! - The near-earth / deep-space method flag selected at initialization
//!
//! ## Units & Conventions
//!
//! Internally the propagator works in Earth radii and radians/minute; the public
//! position/velocity outputs are km and km/s. Epochs are split Julian dates
//! (whole day + day fraction).

/// 2π, useful for trigonometric normalization
pub const TWOPI: f64 = 2.0 * std::f64::consts::PI;

/// Degrees → radians
pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;

/// Number of minutes in a solar day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Revolutions/day → radians/minute divisor (1440 / 2π ≈ 229.1831180523293)
pub const XPDOTP: f64 = MINUTES_PER_DAY / TWOPI;

/// Orbital periods at or above this value (minutes) select the deep-space method
pub const DEEP_SPACE_PERIOD_MIN: f64 = 225.0;

/// A standard set of geopotential constants.
///
/// `mu` is in km³/s², `radius_earth_km` in km, `xke` in (Earth radii)^1.5/min,
/// the zonal harmonics are dimensionless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityConstants {
    /// Minutes in one time unit (1/xke)
    pub tumin: f64,
    /// Earth gravitational parameter (km³/s²)
    pub mu: f64,
    /// Earth equatorial radius (km)
    pub radius_earth_km: f64,
    /// Reciprocal of tumin
    pub xke: f64,
    /// Un-normalized second zonal harmonic
    pub j2: f64,
    /// Un-normalized third zonal harmonic
    pub j3: f64,
    /// Un-normalized fourth zonal harmonic
    pub j4: f64,
    /// j3 / j2
    pub j3oj2: f64,
}

/// WGS-72 constants with the historical low-precision xke
pub const WGS72OLD: GravityConstants = GravityConstants {
    tumin: 1.0 / 0.0743669161,
    mu: 398600.79964,
    radius_earth_km: 6378.135,
    xke: 0.0743669161,
    j2: 0.001082616,
    j3: -0.00000253881,
    j4: -0.00000165597,
    j3oj2: -0.00000253881 / 0.001082616,
};

/// Standard WGS-72 constants (the common choice for TLE data)
pub const WGS72: GravityConstants = GravityConstants {
    tumin: 13.446839696959309,
    mu: 398600.8,
    radius_earth_km: 6378.135,
    xke: 0.07436691613317342,
    j2: 0.001082616,
    j3: -0.00000253881,
    j4: -0.00000165597,
    j3oj2: -0.00000253881 / 0.001082616,
};

/// More recent WGS-84 constants
pub const WGS84: GravityConstants = GravityConstants {
    tumin: 13.446851082044981,
    mu: 398600.5,
    radius_earth_km: 6378.137,
    xke: 0.07436685316871385,
    j2: 0.00108262998905,
    j3: -0.00000253215306,
    j4: -0.00000161098761,
    j3oj2: -0.00000253215306 / 0.00108262998905,
};

/// Selector for one of the three standard gravity constant sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityModel {
    /// Legacy WGS-72 behavior (low-precision xke)
    Wgs72Old,
    /// Standard WGS-72 model
    #[default]
    Wgs72,
    /// WGS-84 model
    Wgs84,
}

impl GravityModel {
    /// Return the constant set selected by this model.
    pub fn constants(self) -> GravityConstants {
        match self {
            GravityModel::Wgs72Old => WGS72OLD,
            GravityModel::Wgs72 => WGS72,
            GravityModel::Wgs84 => WGS84,
        }
    }
}

/// Mode of operation: the historical AFSPC code path or the improved one.
///
/// The choice affects the sidereal-time formula used at initialization and a
/// pair of angle normalizations in the deep-space periodics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationMode {
    /// AFSPC-compatible mode ('a')
    Afspc,
    /// Improved mode ('i')
    #[default]
    Improved,
}

/// Propagation method selected at initialization from the orbital period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Near-earth orbits (period below 225 minutes)
    #[default]
    NearEarth,
    /// Deep-space orbits, with lunar/solar perturbations and resonance terms
    DeepSpace,
}

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_xpdotp() {
        assert_eq!(XPDOTP, 229.1831180523293);
    }

    #[test]
    fn test_wgs72_derived() {
        let g = GravityModel::Wgs72.constants();
        let xke =
            60.0 / (g.radius_earth_km * g.radius_earth_km * g.radius_earth_km / g.mu).sqrt();
        assert!((g.xke - xke).abs() < 1e-15);
        assert!((g.tumin * g.xke - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_wgs84_derived() {
        let g = GravityModel::Wgs84.constants();
        let xke =
            60.0 / (g.radius_earth_km * g.radius_earth_km * g.radius_earth_km / g.mu).sqrt();
        assert!((g.xke - xke).abs() < 1e-15);
        assert!((g.tumin * g.xke - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_default_model_is_wgs72() {
        assert_eq!(GravityModel::default(), GravityModel::Wgs72);
    }
}
