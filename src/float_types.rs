//! Scalar type selection and numeric constants shared across the crate.

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

/// Tolerance below which a direction vector counts as zero-length.
///
/// Beam and center-channel directions are order-one vectors by convention,
/// so anything shorter than this is a degenerate input rather than a
/// legitimately tiny direction.
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-6;
/// Tolerance below which a direction vector counts as zero-length.
///
/// Beam and center-channel directions are order-one vectors by convention,
/// so anything shorter than this is a degenerate input rather than a
/// legitimately tiny direction.
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-12;

// Pi
/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

// Frac Pi 2
/// π/2
#[cfg(feature = "f32")]
pub const FRAC_PI_2: Real = core::f32::consts::FRAC_PI_2;
/// π/2
#[cfg(feature = "f64")]
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

// Tau
/// The full circle constant (τ), the scale factor between wavelength and
/// wavenumber: `k = τ/λ`.
#[cfg(feature = "f32")]
pub const TAU: Real = core::f32::consts::TAU;
/// The full circle constant (τ), the scale factor between wavelength and
/// wavenumber: `k = τ/λ`.
#[cfg(feature = "f64")]
pub const TAU: Real = core::f64::consts::TAU;
