//! # Batch propagation
//!
//! ## Overview
//!
//! Propagates a collection of element records over a shared set of epochs,
//! fanning the per-satellite rows out across a rayon thread pool. Records are
//! read-only during the sweep, so the kernel needs no locking and produces the
//! same numbers as the equivalent nest of single-record calls.
//!
//! Results land in caller-owned flat buffers laid out row-major as
//! `[satellite][time][component]`: for `I` records and `J` times the position
//! and velocity buffers hold `I * J * 3` values and the error buffer `I * J`.
//! Buffer shapes are checked before any write; a mismatch leaves every output
//! byte untouched.
//!
//! ## Units & Conventions
//!
//! Positions in km, velocities in km/s, both in the TEME frame. A sample whose
//! error code is 1 through 4 has all six of its components set to NaN, so a
//! consumer that never inspects the error buffer still cannot mistake a failed
//! sample for data. Code 6 (decayed) comes with a valid state vector; whether
//! it is poisoned as well is the caller's choice through [`DecayedPolicy`].

use rayon::prelude::*;

use crate::propagation;
use crate::satrec::Satrec;
use crate::satrec_errors::SatrecError;
use crate::time::elapsed_minutes;

/// What to do with the state vector of a sample whose satellite has decayed
/// (error code 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecayedPolicy {
    /// Keep the (valid) sub-orbital state vector alongside the error code.
    #[default]
    KeepSample,
    /// Overwrite the sample with NaN, like the hard error codes.
    PoisonSample,
}

/// Propagate one record over all epochs into its row of the output buffers.
pub(crate) fn fill_row(
    rec: &Satrec,
    jd: &[f64],
    fr: &[f64],
    pos_row: &mut [f64],
    vel_row: &mut [f64],
    err_row: &mut [u8],
    decayed: DecayedPolicy,
) {
    for (j, (&jd_j, &fr_j)) in jd.iter().zip(fr).enumerate() {
        let tsince = elapsed_minutes(jd_j, fr_j, rec.epoch_jd, rec.epoch_fraction);
        let outcome = propagation::sgp4(rec, tsince);
        let poison = outcome.error == 6 && decayed == DecayedPolicy::PoisonSample;
        for axis in 0..3 {
            if poison {
                pos_row[j * 3 + axis] = f64::NAN;
                vel_row[j * 3 + axis] = f64::NAN;
            } else {
                pos_row[j * 3 + axis] = outcome.position[axis];
                vel_row[j * 3 + axis] = outcome.velocity[axis];
            }
        }
        err_row[j] = outcome.error;
    }
}

/// An immutable collection of element records, ready for parallel sweeps.
#[derive(Debug, Clone)]
pub struct SatrecArray {
    records: Vec<Satrec>,
}

impl SatrecArray {
    /// Snapshot the given records. The array owns deep copies, so records can
    /// keep being used (and mutated by single-record propagation) elsewhere.
    pub fn new(records: &[Satrec]) -> SatrecArray {
        SatrecArray {
            records: records.to_vec(),
        }
    }

    /// Number of records in the collection.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The underlying records, in row order.
    pub fn records(&self) -> &[Satrec] {
        &self.records
    }

    /// Propagate every record to every epoch, in parallel, into caller-owned
    /// buffers.
    ///
    /// Arguments
    /// ---------
    /// * `jd`, `fr`: split Julian dates of the sample epochs, one pair per
    ///   column
    /// * `out_position`, `out_velocity`: `len * jd.len() * 3` values each,
    ///   row-major `[satellite][time][component]`
    /// * `out_error`: `len * jd.len()` error codes
    /// * `decayed`: what to write for decayed (code 6) samples
    ///
    /// Return
    /// ------
    /// * `Ok(())`, or a [`SatrecError::ShapeMismatch`] naming the first buffer
    ///   whose length is wrong; in that case nothing has been written.
    pub fn propagate_into(
        &self,
        jd: &[f64],
        fr: &[f64],
        out_position: &mut [f64],
        out_velocity: &mut [f64],
        out_error: &mut [u8],
        decayed: DecayedPolicy,
    ) -> Result<(), SatrecError> {
        let i = self.records.len();
        let j = jd.len();
        if fr.len() != j {
            return Err(SatrecError::ShapeMismatch {
                buffer: "fr",
                expected: j,
                got: fr.len(),
            });
        }
        if out_position.len() != i * j * 3 {
            return Err(SatrecError::ShapeMismatch {
                buffer: "out_position",
                expected: i * j * 3,
                got: out_position.len(),
            });
        }
        if out_velocity.len() != i * j * 3 {
            return Err(SatrecError::ShapeMismatch {
                buffer: "out_velocity",
                expected: i * j * 3,
                got: out_velocity.len(),
            });
        }
        if out_error.len() != i * j {
            return Err(SatrecError::ShapeMismatch {
                buffer: "out_error",
                expected: i * j,
                got: out_error.len(),
            });
        }
        // chunking by zero panics, and there is nothing to do anyway
        if i == 0 || j == 0 {
            return Ok(());
        }

        self.records
            .par_iter()
            .zip(out_position.par_chunks_exact_mut(j * 3))
            .zip(out_velocity.par_chunks_exact_mut(j * 3))
            .zip(out_error.par_chunks_exact_mut(j))
            .for_each(|(((rec, pos_row), vel_row), err_row)| {
                fill_row(rec, jd, fr, pos_row, vel_row, err_row, decayed);
            });
        Ok(())
    }

    /// Allocating convenience wrapper around [`SatrecArray::propagate_into`]
    /// with the default decayed-sample policy.
    ///
    /// Return
    /// ------
    /// * `(error, position, velocity)` buffers in the row-major layout
    ///   described on [`SatrecArray::propagate_into`].
    pub fn propagate(
        &self,
        jd: &[f64],
        fr: &[f64],
    ) -> Result<(Vec<u8>, Vec<f64>, Vec<f64>), SatrecError> {
        let i = self.records.len();
        let j = jd.len();
        let mut error = vec![0u8; i * j];
        let mut position = vec![f64::NAN; i * j * 3];
        let mut velocity = vec![f64::NAN; i * j * 3];
        self.propagate_into(
            jd,
            fr,
            &mut position,
            &mut velocity,
            &mut error,
            DecayedPolicy::default(),
        )?;
        Ok((error, position, velocity))
    }
}
