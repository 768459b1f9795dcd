//! Angular to reciprocal-space conversion for arbitrary diffractometer geometries.
//!
//! Converts goniometer and detector angle readings from an x-ray diffraction
//! experiment into momentum-transfer vectors on the `2π/λ` scale. The
//! geometry is fully configurable: any number of sample-side and
//! detector-side rotation circles, each about one of the six signed
//! principal axes, with point, linear (1-D) or area (2-D) detectors mounted
//! along principal axes. Goniometer positions are independent of each
//! other, so conversions parallelize over positions without any ordering
//! or synchronization concerns.
//!
//! The low-level entry points live in [`conversion`] and consume radians;
//! [`QConversion`] wraps them with a reusable geometry description, degree
//! input and detector rebinning.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for multithreading

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod axis;
pub mod detector;
pub mod conversion;
pub mod qconversion;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use axis::SignedAxis;
pub use detector::{AreaDetector, LinearDetector};
pub use errors::{AxisTokenError, ConversionError};
pub use qconversion::{QConversion, WAVELENGTH_CU_KA1};
