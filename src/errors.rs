//! Conversion errors

use crate::float_types::Real;
use nalgebra::Vector3;
use std::fmt::Display;

/// All the ways a two-character axis token can fail to parse
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AxisTokenError {
    /// (Length) The token is not exactly two characters
    Length(String),
    /// (Letter) The first character is not one of x/y/z
    Letter(char),
    /// (Sign) The second character is not '+' or '-'
    Sign(char),
}

impl Display for AxisTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisTokenError::Length(token) => {
                write!(f, "(Length) axis token {:?} must be two characters, e.g. \"x+\"", token)
            },
            AxisTokenError::Letter(letter) => {
                write!(f, "(Letter) axis letter '{}' is not one of x/y/z", letter)
            },
            AxisTokenError::Sign(sign) => {
                write!(f, "(Sign) axis sign '{}' is not '+' or '-'", sign)
            },
        }
    }
}

/// All the possible ways a conversion call can be rejected
///
/// Configuration errors and precondition violations are raised before any
/// numeric loop runs; a failed call never produces a partial output. Numeric
/// degeneracies arising inside the per-pixel loops (pathological geometry)
/// are not masked and travel through the output as NaN/Inf instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// (SampleAxis) A sample-circle axis token failed to resolve
    SampleAxis { index: usize, source: AxisTokenError },
    /// (DetectorAxis) A detector-circle axis token failed to resolve
    DetectorAxis { index: usize, source: AxisTokenError },
    /// (DetectorDirection) A detector pixel-direction token failed to resolve
    DetectorDirection(#[source] AxisTokenError),
    /// (Wavelength) The wavelength is not a finite, strictly positive number
    Wavelength(Real),
    /// (BeamDirection) A direction vector has (near-)zero length
    BeamDirection(Vector3<Real>),
    /// (ReversedRoi) A region of interest with start > end
    ReversedRoi { start: usize, end: usize },
    /// (AngleShape) An angle slice whose length is not npoints * ncircles
    AngleShape {
        which: &'static str,
        len: usize,
        npoints: usize,
        ncircles: usize,
    },
    /// (DetectorNotInitialized) A pixel-detector conversion was requested
    /// before the matching detector geometry was configured
    DetectorNotInitialized(&'static str),
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::SampleAxis { index, source } => {
                write!(f, "(SampleAxis) sample circle {} has an invalid axis token: {}", index, source)
            },
            ConversionError::DetectorAxis { index, source } => {
                write!(f, "(DetectorAxis) detector circle {} has an invalid axis token: {}", index, source)
            },
            ConversionError::DetectorDirection(source) => {
                write!(f, "(DetectorDirection) detector direction token is invalid: {}", source)
            },
            ConversionError::Wavelength(wl) => {
                write!(f, "(Wavelength) wavelength {} must be finite and strictly positive", wl)
            },
            ConversionError::BeamDirection(v) => {
                write!(f, "(BeamDirection) direction ({}, {}, {}) has (near-)zero length", v.x, v.y, v.z)
            },
            ConversionError::ReversedRoi { start, end } => {
                write!(f, "(ReversedRoi) region of interest [{}, {}) has start > end", start, end)
            },
            ConversionError::AngleShape { which, len, npoints, ncircles } => {
                write!(
                    f,
                    "(AngleShape) {} angle slice has {} values, expected npoints * ncircles = {} * {}",
                    which, len, npoints, ncircles
                )
            },
            ConversionError::DetectorNotInitialized(kind) => {
                write!(f, "(DetectorNotInitialized) no {} detector geometry has been configured", kind)
            },
        }
    }
}
