//! # satrec
//!
//! TLE ingestion and batch SGP4/SDP4 orbit propagation.
//!
//! ## Overview
//!
//! The crate turns two-line element sets into initialized orbital records
//! ([`Satrec`]) and propagates them, one at a time or as a collection swept in
//! parallel over arrays of epochs ([`SatrecArray`]). The propagation model is
//! the standard SGP4 analytical theory with its deep-space extension, selected
//! automatically for periods of 225 minutes and up.
//!
//! Domain failures during propagation are data, not errors: every sample
//! carries a small error code (0 ok, 1-4 the classic mean-element and
//! short-period failure modes, 6 decayed), and the state vector of a failed
//! sample is poisoned with NaN so it cannot be consumed by accident.
//!
//! ## Quick start
//!
//! ```no_run
//! use satrec::{GravityModel, OperationMode, Satrec};
//!
//! let line1 = "1 25544U 98067A   19343.69339541  .00001764  00000-0  40967-4 0  9000";
//! let line2 = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";
//!
//! let mut sat = Satrec::from_tle(line1, line2, GravityModel::Wgs72, OperationMode::Improved)?;
//! let (error, position, velocity) = sat.propagate_at(2458827.5, 0.25);
//! assert_eq!(error, 0);
//! println!("r = {position} km, v = {velocity} km/s");
//! # Ok::<(), satrec::SatrecError>(())
//! ```
//!
//! ## Units & Conventions
//!
//! Positions are km and velocities km/s in the TEME frame of the record's
//! epoch. Internally everything is radians, minutes and Earth radii; epochs
//! are split Julian dates (whole day ending in `.5`, plus a day fraction) to
//! keep sub-millisecond precision over decades.

pub mod alpha5;
pub mod batch;
pub mod constants;
pub mod propagation;
pub mod satrec;
pub mod satrec_errors;
pub mod time;
pub mod tle;

pub use batch::{DecayedPolicy, SatrecArray};
pub use constants::{GravityConstants, GravityModel, Method, OperationMode};
pub use propagation::gstime;
pub use satrec::{MeanState, Satrec};
pub use satrec_errors::SatrecError;
pub use time::{days2mdhms, invjday, julian_day};
pub use tle::{compute_checksum, export, fix_checksum, verify_checksum};
