use thiserror::Error;

/// Official column template for line 1, with an N where each digit goes.
pub const LINE1_TEMPLATE: &str =
    "1 NNNNNC NNNNNAAA NNNNN.NNNNNNNN +.NNNNNNNN +NNNNN-N +NNNNN-N N NNNNN";

/// Official column template for line 2.
pub const LINE2_TEMPLATE: &str =
    "2 NNNNN NNN.NNNN NNN.NNNN NNNNNNN NNN.NNNN NNN.NNNN NN.NNNNNNNNNNNNNN";

/// Errors produced while ingesting element sets or driving the batch kernel.
///
/// Propagation domain failures (hyperbolic mean elements, negative semi-latus
/// rectum, decay, ...) are **not** represented here: they are reported as data,
/// through the per-sample error code of the propagation contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SatrecError {
    #[error(
        "TLE format error\n\n\
         The Two-Line Element (TLE) format was designed for punch cards, and so\n\
         is very strict about the position of every period, space, and digit.\n\
         Your line does not quite match.  Here is the official format for line {which}\n\
         with an N where each digit should go, followed by the line you provided:\n\n\
         {template}\n{line}",
        template = if *which == 1 { LINE1_TEMPLATE } else { LINE2_TEMPLATE }
    )]
    MalformedTle { which: u8, line: String },

    #[error("Object numbers in lines 1 and 2 do not match: {line1} != {line2}")]
    ObjectNumberMismatch { line1: u32, line2: u32 },

    #[error("Invalid satellite number: {0}")]
    InvalidSatelliteNumber(String),

    #[error("Output buffer `{buffer}` has the wrong shape: expected {expected} elements, got {got}")]
    ShapeMismatch {
        buffer: &'static str,
        expected: usize,
        got: usize,
    },
}
