//! # The orbital element record
//!
//! ## Overview
//!
//! [`Satrec`] is the canonical element record of the crate: the parsed TLE
//! fields (or directly supplied elements), the split Julian epoch, and the
//! block of constants derived once at initialization. A record is built either
//! from two TLE lines ([`Satrec::from_tle`]) or from raw elements
//! ([`Satrec::from_elements`]), and can then be propagated to any time around
//! its epoch.
//!
//! Initialization and the single-record entry points are the only writers of
//! the record's `error_code`, `t` and mean state. The batch kernel in
//! [`crate::batch`] treats records as read-only, which is what makes the
//! parallel fan-out sound.
//!
//! ## Units & Conventions
//!
//! Angles are radians, mean motion is radians/minute, the drag term is the
//! usual B* in inverse Earth radii. Epochs are split Julian dates; derived
//! semi-major axes and altitudes are in Earth radii.

use nalgebra::Vector3;

use crate::alpha5;
use crate::batch::{fill_row, DecayedPolicy};
use crate::constants::{GravityConstants, GravityModel, Method, OperationMode};
use crate::propagation;
use crate::satrec_errors::SatrecError;
use crate::time::{elapsed_minutes, round8, JD_1950};
use crate::tle;

/// Singly averaged mean elements recovered during a propagation step.
///
/// Semi-major axis in Earth radii, angles in radians, mean motion in
/// radians/minute.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeanState {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub argument_of_perigee: f64,
    pub mean_anomaly: f64,
    pub mean_motion: f64,
}

/// Constants derived once by initialization and read-only afterwards.
///
/// Field names follow the Spacetrack report so the propagation code reads
/// against the reference.
#[derive(Debug, Clone)]
pub(crate) struct DerivedConstants {
    pub grav: GravityConstants,

    /// Un-kozaied mean motion, rad/min
    pub no_unkozai: f64,
    /// Semi-major axis, Earth radii
    pub a: f64,
    /// Apogee altitude, Earth radii above the surface
    pub alta: f64,
    /// Perigee altitude, Earth radii above the surface
    pub altp: f64,
    /// Greenwich sidereal time at epoch, rad
    pub gsto: f64,
    /// Simplified drag flag (low perigee or deep space)
    pub isimp: bool,

    // near earth
    pub con41: f64,
    pub cc1: f64,
    pub cc4: f64,
    pub cc5: f64,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub delmo: f64,
    pub eta: f64,
    pub argpdot: f64,
    pub omgcof: f64,
    pub sinmao: f64,
    pub t2cof: f64,
    pub t3cof: f64,
    pub t4cof: f64,
    pub t5cof: f64,
    pub x1mth2: f64,
    pub x7thm1: f64,
    pub mdot: f64,
    pub nodedot: f64,
    pub xlcof: f64,
    pub xmcof: f64,
    pub nodecf: f64,
    pub aycof: f64,

    // deep space
    /// Resonance flag: 0 none, 1 one-day, 2 half-day
    pub irez: u8,
    pub d2201: f64,
    pub d2211: f64,
    pub d3210: f64,
    pub d3222: f64,
    pub d4410: f64,
    pub d4422: f64,
    pub d5220: f64,
    pub d5232: f64,
    pub d5421: f64,
    pub d5433: f64,
    pub dedt: f64,
    pub del1: f64,
    pub del2: f64,
    pub del3: f64,
    pub didt: f64,
    pub dmdt: f64,
    pub dnodt: f64,
    pub domdt: f64,
    pub e3: f64,
    pub ee2: f64,
    pub peo: f64,
    pub pgho: f64,
    pub pho: f64,
    pub pinco: f64,
    pub plo: f64,
    pub se2: f64,
    pub se3: f64,
    pub sgh2: f64,
    pub sgh3: f64,
    pub sgh4: f64,
    pub sh2: f64,
    pub sh3: f64,
    pub si2: f64,
    pub si3: f64,
    pub sl2: f64,
    pub sl3: f64,
    pub sl4: f64,
    pub xfact: f64,
    pub xgh2: f64,
    pub xgh3: f64,
    pub xgh4: f64,
    pub xh2: f64,
    pub xh3: f64,
    pub xi2: f64,
    pub xi3: f64,
    pub xl2: f64,
    pub xl3: f64,
    pub xl4: f64,
    pub xlamo: f64,
    pub zmol: f64,
    pub zmos: f64,
}

impl DerivedConstants {
    pub(crate) fn zeroed(grav: GravityConstants) -> Self {
        DerivedConstants {
            grav,
            no_unkozai: 0.0,
            a: 0.0,
            alta: 0.0,
            altp: 0.0,
            gsto: 0.0,
            isimp: false,
            con41: 0.0,
            cc1: 0.0,
            cc4: 0.0,
            cc5: 0.0,
            d2: 0.0,
            d3: 0.0,
            d4: 0.0,
            delmo: 0.0,
            eta: 0.0,
            argpdot: 0.0,
            omgcof: 0.0,
            sinmao: 0.0,
            t2cof: 0.0,
            t3cof: 0.0,
            t4cof: 0.0,
            t5cof: 0.0,
            x1mth2: 0.0,
            x7thm1: 0.0,
            mdot: 0.0,
            nodedot: 0.0,
            xlcof: 0.0,
            xmcof: 0.0,
            nodecf: 0.0,
            aycof: 0.0,
            irez: 0,
            d2201: 0.0,
            d2211: 0.0,
            d3210: 0.0,
            d3222: 0.0,
            d4410: 0.0,
            d4422: 0.0,
            d5220: 0.0,
            d5232: 0.0,
            d5421: 0.0,
            d5433: 0.0,
            dedt: 0.0,
            del1: 0.0,
            del2: 0.0,
            del3: 0.0,
            didt: 0.0,
            dmdt: 0.0,
            dnodt: 0.0,
            domdt: 0.0,
            e3: 0.0,
            ee2: 0.0,
            peo: 0.0,
            pgho: 0.0,
            pho: 0.0,
            pinco: 0.0,
            plo: 0.0,
            se2: 0.0,
            se3: 0.0,
            sgh2: 0.0,
            sgh3: 0.0,
            sgh4: 0.0,
            sh2: 0.0,
            sh3: 0.0,
            si2: 0.0,
            si3: 0.0,
            sl2: 0.0,
            sl3: 0.0,
            sl4: 0.0,
            xfact: 0.0,
            xgh2: 0.0,
            xgh3: 0.0,
            xgh4: 0.0,
            xh2: 0.0,
            xh3: 0.0,
            xi2: 0.0,
            xi3: 0.0,
            xl2: 0.0,
            xl3: 0.0,
            xl4: 0.0,
            xlamo: 0.0,
            zmol: 0.0,
            zmos: 0.0,
        }
    }
}

/// One satellite's element record, initialized and ready to propagate.
#[derive(Debug, Clone)]
pub struct Satrec {
    /// Catalog number, decoded from Alpha-5 where needed
    pub satellite_number: u32,
    /// Security classification column ('U' for unclassified)
    pub classification: char,
    /// International designator, trimmed of trailing blanks
    pub international_designator: String,
    /// Epoch year from the TLE (4-digit); `None` for directly supplied elements
    pub epoch_year: Option<i32>,
    /// Fractional day of year from the TLE; `None` for directly supplied elements
    pub epoch_day_of_year: Option<f64>,
    /// Whole part of the epoch Julian date (ends in .5)
    pub epoch_jd: f64,
    /// Fractional day past `epoch_jd`, in `[0, 1)`
    pub epoch_fraction: f64,
    /// First derivative of mean motion / 2, rad/min²
    pub mean_motion_dot: f64,
    /// Second derivative of mean motion / 6, rad/min³
    pub mean_motion_ddot: f64,
    /// B* drag term, 1/Earth radii
    pub drag_term: f64,
    /// Ephemeris type column (normally 0)
    pub ephemeris_type: u8,
    /// Element set number
    pub element_set_number: u32,
    /// Revolution number at epoch
    pub revolution_number: i64,

    /// Inclination at epoch, rad
    pub inclination: f64,
    /// Right ascension of ascending node at epoch, rad
    pub raan: f64,
    /// Eccentricity at epoch
    pub eccentricity: f64,
    /// Argument of perigee at epoch, rad
    pub argument_of_perigee: f64,
    /// Mean anomaly at epoch, rad
    pub mean_anomaly: f64,
    /// Kozai mean motion at epoch, rad/min
    pub mean_motion: f64,

    pub gravity_model: GravityModel,
    pub operation_mode: OperationMode,
    /// Near-earth or deep-space, selected at initialization
    pub method: Method,

    /// Error code of the last single-record propagation (0 = ok)
    pub error_code: u8,
    /// Elapsed minutes of the last single-record propagation
    pub t: f64,
    /// Mean elements recovered by the last single-record propagation
    pub mean_state: MeanState,

    pub(crate) k: DerivedConstants,
}

impl Satrec {
    /// Import a satellite from two lines of TLE data.
    ///
    /// Arguments
    /// ---------
    /// * `line1`, `line2`: the two element lines (checksum column optional)
    /// * `gravity_model`: which standard constant set to use
    /// * `operation_mode`: AFSPC-compatible or improved mode
    ///
    /// Return
    /// ------
    /// * an initialized record, or a [`SatrecError`] describing the first
    ///   structural problem found.
    pub fn from_tle(
        line1: &str,
        line2: &str,
        gravity_model: GravityModel,
        operation_mode: OperationMode,
    ) -> Result<Satrec, SatrecError> {
        tle::ingest(line1, line2, gravity_model, operation_mode)
    }

    /// Initialize a record from raw orbital elements.
    ///
    /// Never fails: domain problems (hyperbolic elements, sub-orbital epochs,
    /// ...) surface through the record's `error_code`, exactly as they would
    /// from a propagation call.
    ///
    /// Arguments
    /// ---------
    /// * `epoch_days_1950`: epoch in days since 1950 January 0, 00:00 UT
    /// * `drag_term`: B*, 1/Earth radii
    /// * `mean_motion_dot`, `mean_motion_ddot`: ballistic coefficients,
    ///   rad/min² and rad/min³ (unused by the model itself, kept on record)
    /// * angles in radians, `mean_motion` in rad/min
    #[allow(clippy::too_many_arguments)]
    pub fn from_elements(
        gravity_model: GravityModel,
        operation_mode: OperationMode,
        satellite_number: u32,
        epoch_days_1950: f64,
        drag_term: f64,
        mean_motion_dot: f64,
        mean_motion_ddot: f64,
        eccentricity: f64,
        argument_of_perigee: f64,
        inclination: f64,
        mean_anomaly: f64,
        mean_motion: f64,
        raan: f64,
    ) -> Satrec {
        let whole = epoch_days_1950.floor();
        let mut fraction = epoch_days_1950 - whole;
        // a value with no digits past the 8 decimals a TLE stores is taken as
        // an exact decimal fraction
        if round8(epoch_days_1950) == epoch_days_1950 {
            fraction = round8(fraction);
        }

        let mut rec = Satrec {
            satellite_number,
            classification: 'U',
            international_designator: String::new(),
            epoch_year: None,
            epoch_day_of_year: None,
            epoch_jd: whole + JD_1950,
            epoch_fraction: fraction,
            mean_motion_dot,
            mean_motion_ddot,
            drag_term,
            ephemeris_type: 0,
            element_set_number: 0,
            revolution_number: 0,
            inclination,
            raan,
            eccentricity,
            argument_of_perigee,
            mean_anomaly,
            mean_motion,
            gravity_model,
            operation_mode,
            method: Method::NearEarth,
            error_code: 0,
            t: 0.0,
            mean_state: MeanState::default(),
            k: DerivedConstants::zeroed(gravity_model.constants()),
        };
        propagation::sgp4_init(&mut rec, epoch_days_1950);
        rec
    }

    /// Propagate to `minutes_since_epoch` and update the record's `error_code`,
    /// `t` and mean state.
    ///
    /// Return
    /// ------
    /// * `(error_code, position, velocity)` with position in km and velocity
    ///   in km/s (TEME frame). Both vectors are NaN for error codes 1-4; a
    ///   decayed satellite (code 6) still gets a valid state vector.
    pub fn propagate(&mut self, minutes_since_epoch: f64) -> (u8, Vector3<f64>, Vector3<f64>) {
        let outcome = propagation::sgp4(self, minutes_since_epoch);
        self.t = minutes_since_epoch;
        self.error_code = outcome.error;
        if let Some(mean) = outcome.mean {
            self.mean_state = mean;
        }
        (
            outcome.error,
            Vector3::from(outcome.position),
            Vector3::from(outcome.velocity),
        )
    }

    /// Propagate to the split Julian date `jd + fr`.
    ///
    /// The elapsed minutes are computed by differencing whole and fractional
    /// parts separately against the split epoch, which preserves precision.
    pub fn propagate_at(&mut self, jd: f64, fr: f64) -> (u8, Vector3<f64>, Vector3<f64>) {
        let tsince = elapsed_minutes(jd, fr, self.epoch_jd, self.epoch_fraction);
        self.propagate(tsince)
    }

    /// Propagate this record over arrays of epochs into caller-owned flat
    /// buffers: the one-record version of the batch kernel.
    ///
    /// Buffer shapes are checked before any write (`out_position` and
    /// `out_velocity` hold `jd.len() * 3` values, `out_error` holds
    /// `jd.len()`); on mismatch nothing is written. Unlike
    /// [`Satrec::propagate`], this does **not** mutate the record.
    pub fn propagate_into(
        &self,
        jd: &[f64],
        fr: &[f64],
        out_position: &mut [f64],
        out_velocity: &mut [f64],
        out_error: &mut [u8],
        decayed: DecayedPolicy,
    ) -> Result<(), SatrecError> {
        if fr.len() != jd.len() {
            return Err(SatrecError::ShapeMismatch {
                buffer: "fr",
                expected: jd.len(),
                got: fr.len(),
            });
        }
        if out_position.len() != jd.len() * 3 {
            return Err(SatrecError::ShapeMismatch {
                buffer: "out_position",
                expected: jd.len() * 3,
                got: out_position.len(),
            });
        }
        if out_velocity.len() != jd.len() * 3 {
            return Err(SatrecError::ShapeMismatch {
                buffer: "out_velocity",
                expected: jd.len() * 3,
                got: out_velocity.len(),
            });
        }
        if out_error.len() != jd.len() {
            return Err(SatrecError::ShapeMismatch {
                buffer: "out_error",
                expected: jd.len(),
                got: out_error.len(),
            });
        }
        fill_row(self, jd, fr, out_position, out_velocity, out_error, decayed);
        Ok(())
    }

    /// Semi-major axis at epoch, Earth radii.
    pub fn semi_major_axis(&self) -> f64 {
        self.k.a
    }

    /// Apogee altitude at epoch, Earth radii above the surface.
    pub fn apogee_altitude(&self) -> f64 {
        self.k.alta
    }

    /// Perigee altitude at epoch, Earth radii above the surface.
    pub fn perigee_altitude(&self) -> f64 {
        self.k.altp
    }

    /// Mean motion with the Kozai correction removed, rad/min.
    pub fn no_unkozai(&self) -> f64 {
        self.k.no_unkozai
    }

    /// Epoch in days since 1950 January 0, 00:00 UT.
    pub fn epoch_days_1950(&self) -> f64 {
        (self.epoch_jd - JD_1950) + self.epoch_fraction
    }

    /// The record's catalog number formatted as its 5-column Alpha-5 field.
    pub fn catalog_field(&self) -> Result<String, SatrecError> {
        alpha5::encode(self.satellite_number)
    }
}

#[cfg(test)]
mod satrec_test {
    use super::*;
    use crate::constants::TWOPI;

    fn leo_record() -> Satrec {
        Satrec::from_elements(
            GravityModel::Wgs72,
            OperationMode::Improved,
            25544,
            25545.69339541,
            4.0967e-5,
            0.0,
            0.0,
            0.0007417,
            17.6667_f64.to_radians(),
            51.6439_f64.to_radians(),
            85.6398_f64.to_radians(),
            15.50103472 * TWOPI / 1440.0,
            211.2001_f64.to_radians(),
        )
    }

    #[test]
    fn test_from_elements_epoch_split() {
        let rec = leo_record();
        assert_eq!(rec.epoch_jd, 2458826.5);
        assert_eq!(rec.epoch_fraction, 0.69339541);
        assert!((rec.epoch_days_1950() - 25545.69339541).abs() < 1e-9);
        assert!(rec.epoch_year.is_none());
        assert!(rec.epoch_day_of_year.is_none());
    }

    #[test]
    fn test_from_elements_initializes_cleanly() {
        let rec = leo_record();
        assert_eq!(rec.error_code, 0);
        assert_eq!(rec.method, Method::NearEarth);
        assert!(rec.semi_major_axis() > 1.0);
        assert!(rec.perigee_altitude() > 0.0);
        assert!(rec.apogee_altitude() >= rec.perigee_altitude());
        assert!(rec.no_unkozai() > 0.0);
    }

    #[test]
    fn test_double_init_is_deterministic() {
        let a = leo_record();
        let b = leo_record();
        assert_eq!(a.no_unkozai(), b.no_unkozai());
        assert_eq!(a.semi_major_axis(), b.semi_major_axis());
        assert_eq!(a.mean_state, b.mean_state);
        let (_, ra, va) = a.clone().propagate(360.0);
        let (_, rb, vb) = b.clone().propagate(360.0);
        assert_eq!(ra, rb);
        assert_eq!(va, vb);
    }

    #[test]
    fn test_propagation_near_epoch() {
        let mut rec = leo_record();
        let (error, position, velocity) = rec.propagate(0.0);
        assert_eq!(error, 0);
        let r = position.norm();
        let v = velocity.norm();
        assert!((6500.0..7100.0).contains(&r), "|r| = {r}");
        assert!((7.0..8.2).contains(&v), "|v| = {v}");
        assert_eq!(rec.t, 0.0);
        assert_eq!(rec.error_code, 0);
    }

    #[test]
    fn test_propagate_at_matches_minutes() {
        let mut a = leo_record();
        let mut b = leo_record();
        let (_, ra, va) = a.propagate_at(2458827.5, 0.25);
        let minutes = (2458827.5 - 2458826.5) * 1440.0 + (0.25 - 0.69339541) * 1440.0;
        let (_, rb, vb) = b.propagate(minutes);
        assert_eq!(ra, rb);
        assert_eq!(va, vb);
        assert_eq!(a.t, b.t);
    }

    #[test]
    fn test_sub_orbital_epoch_reports_decay() {
        // mean motion chosen so the semi-major axis sits below one Earth radius
        let rec = Satrec::from_elements(
            GravityModel::Wgs72,
            OperationMode::Improved,
            99999,
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
        );
        assert_eq!(rec.error_code, 6);
    }

    #[test]
    fn test_decayed_state_vector_stays_finite() {
        let mut rec = Satrec::from_elements(
            GravityModel::Wgs72,
            OperationMode::Improved,
            99999,
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
        );
        let (error, position, velocity) = rec.propagate(0.0);
        assert_eq!(error, 6);
        assert!(position.iter().all(|x| x.is_finite()));
        assert!(velocity.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_runaway_drag_reports_error_1() {
        // absurd negative drag pushes the mean eccentricity past 1 within a day
        let mut rec = Satrec::from_elements(
            GravityModel::Wgs72,
            OperationMode::Improved,
            99999,
            25545.0,
            -1.0e6,
            0.0,
            0.0,
            0.01,
            0.0,
            0.9,
            0.0,
            16.0 * TWOPI / 1440.0,
            0.0,
        );
        assert_eq!(rec.error_code, 0);
        let (error, position, velocity) = rec.propagate(1440.0);
        assert_eq!(error, 1);
        assert!(position.iter().all(|x| x.is_nan()));
        assert!(velocity.iter().all(|x| x.is_nan()));
        assert_eq!(rec.error_code, 1);
    }

    #[test]
    fn test_catalog_field_round_trip() {
        let rec = leo_record();
        assert_eq!(rec.catalog_field().unwrap(), "25544");
    }
}
