//! Angular to momentum-transfer conversion
//!
//! Three entry points sharing one skeleton: [`point`] for a point detector,
//! [`linear`] for a 1-D strip detector and [`area`] for a 2-D pixel
//! detector. For every goniometer position the sample-circle rotations are
//! composed in circle order and inverted (mapping lab directions into the
//! frame of the unrotated sample), the detector-circle rotations are
//! composed without inversion, and the scattered-beam direction is projected
//! into reciprocal space with the `2π/λ` wavenumber scale.
//!
//! Conventions shared by all entry points:
//! - angles are in **radians**, laid out as flat row-major `npoints x
//!   ncircles` slices, one row per goniometer position;
//! - axis sequences list the outermost circle first, so the first circle's
//!   rotation acts last on a vector;
//! - the output holds one `Vector3` per position (point case) or per
//!   position and pixel (linear/area), position slowest-varying;
//! - the wavelength shares its length unit with the detector distances, and
//!   the emitted momentum transfer carries the matching inverse unit.
//!
//! Positions are fully independent; with the `parallel` feature they are
//! fanned out across the rayon pool and the numeric result is identical for
//! any thread count.

use crate::axis::{self, SignedAxis};
use crate::errors::ConversionError;
use crate::float_types::{EPSILON, Real, TAU};
use nalgebra::{Rotation3, Vector3};
use std::ops::Range;

pub mod serial;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(not(feature = "parallel"))]
use serial::for_each_position;

#[cfg(feature = "parallel")]
use parallel::for_each_position;

pub(crate) fn resolve_sample(tokens: &[&str]) -> Result<Vec<SignedAxis>, ConversionError> {
    axis::resolve(tokens).map_err(|(index, source)| ConversionError::SampleAxis { index, source })
}

pub(crate) fn resolve_detector(tokens: &[&str]) -> Result<Vec<SignedAxis>, ConversionError> {
    axis::resolve(tokens).map_err(|(index, source)| ConversionError::DetectorAxis { index, source })
}

fn check_wavelength(wavelength: Real) -> Result<(), ConversionError> {
    if !wavelength.is_finite() || wavelength <= 0.0 {
        return Err(ConversionError::Wavelength(wavelength));
    }
    Ok(())
}

pub(crate) fn check_direction(v: &Vector3<Real>) -> Result<(), ConversionError> {
    let len = v.norm();
    if len.is_nan() || len < EPSILON {
        return Err(ConversionError::BeamDirection(*v));
    }
    Ok(())
}

fn check_roi(roi: &Range<usize>) -> Result<(), ConversionError> {
    if roi.start > roi.end {
        return Err(ConversionError::ReversedRoi {
            start: roi.start,
            end: roi.end,
        });
    }
    Ok(())
}

fn check_angles(
    which: &'static str,
    angles: &[Real],
    npoints: usize,
    ncircles: usize,
) -> Result<(), ConversionError> {
    if angles.len() != npoints * ncircles {
        return Err(ConversionError::AngleShape {
            which,
            len: angles.len(),
            npoints,
            ncircles,
        });
    }
    Ok(())
}

/// Composes the circle rotations for one goniometer position, first circle
/// outermost. An empty circle list composes to the identity.
fn rotation_product(axes: &[SignedAxis], angles: &[Real]) -> Rotation3<Real> {
    let mut product = Rotation3::identity();
    for (axis, angle) in axes.iter().zip(angles) {
        product *= axis.rotation(*angle);
    }
    product
}

/// Momentum-transfer conversion for a point detector sitting on the primary
/// beam at zero detector angles.
///
/// `beam_direction` is a direction only; it is normalized and rescaled to
/// length `2π/λ` internally. For each position `i` the result is
/// `q_i = (Ms_i * Md_i) * r_i` with `Ms` the inverted sample rotation and
/// `Md` the detector rotation.
///
/// Returns one `Vector3` per goniometer position, or the first
/// configuration error / precondition violation encountered. A failed call
/// produces no output at all.
pub fn point(
    sample_angles: &[Real],
    detector_angles: &[Real],
    npoints: usize,
    sample_axes: &[&str],
    detector_axes: &[&str],
    beam_direction: Vector3<Real>,
    wavelength: Real,
) -> Result<Vec<Vector3<Real>>, ConversionError> {
    let sample = resolve_sample(sample_axes)?;
    let detector = resolve_detector(detector_axes)?;
    check_wavelength(wavelength)?;
    check_direction(&beam_direction)?;
    check_angles("sample", sample_angles, npoints, sample.len())?;
    check_angles("detector", detector_angles, npoints, detector.len())?;

    let r_i = beam_direction.normalize() * (TAU / wavelength);
    let ns = sample.len();
    let nd = detector.len();

    let mut out = vec![Vector3::zeros(); npoints];
    for_each_position(&mut out, 1, |i, chunk| {
        let ms = rotation_product(&sample, &sample_angles[i * ns..(i + 1) * ns]).inverse();
        let md = rotation_product(&detector, &detector_angles[i * nd..(i + 1) * nd]);
        chunk[0] = (ms * md) * r_i;
    });
    Ok(out)
}

/// Momentum-transfer conversion for a linear detector.
///
/// `center_position` points from the center of rotation to the detector
/// channel `center_channel` at zero detector angles; it must be parallel to
/// the primary beam and may carry the detector distance as its length.
/// `pixel_width` (same unit) and the `direction` token give the per-channel
/// step. Channel `j` of position `i` lands at output index
/// `i * (roi.end - roi.start) + (j - roi.start)`.
///
/// An empty region of interest yields an empty output, not an error.
#[allow(clippy::too_many_arguments)]
pub fn linear(
    sample_angles: &[Real],
    detector_angles: &[Real],
    npoints: usize,
    sample_axes: &[&str],
    detector_axes: &[&str],
    center_position: Vector3<Real>,
    direction: &str,
    center_channel: Real,
    pixel_width: Real,
    roi: Range<usize>,
    wavelength: Real,
) -> Result<Vec<Vector3<Real>>, ConversionError> {
    let sample = resolve_sample(sample_axes)?;
    let detector = resolve_detector(detector_axes)?;
    let dir = SignedAxis::from_token(direction).map_err(ConversionError::DetectorDirection)?;
    check_wavelength(wavelength)?;
    check_direction(&center_position)?;
    check_roi(&roi)?;
    check_angles("sample", sample_angles, npoints, sample.len())?;
    check_angles("detector", detector_angles, npoints, detector.len())?;

    let k = TAU / wavelength;
    let r_i = center_position.normalize();
    let rpixel = dir.step(pixel_width);
    let rcchp = rpixel * center_channel;
    let ns = sample.len();
    let nd = detector.len();
    let j0 = roi.start;
    let nch = roi.end - roi.start;

    let mut out = vec![Vector3::zeros(); npoints * nch];
    for_each_position(&mut out, nch, |i, chunk| {
        let ms = rotation_product(&sample, &sample_angles[i * ns..(i + 1) * ns]).inverse();
        let md = rotation_product(&detector, &detector_angles[i * nd..(i + 1) * nd]);
        for (offset, q) in chunk.iter_mut().enumerate() {
            let j = (j0 + offset) as Real;
            let rd = (rpixel * j - rcchp + center_position).normalize();
            *q = ms * ((md * rd - r_i) * k);
        }
    });
    Ok(out)
}

/// Momentum-transfer conversion for an area detector.
///
/// The pixel grid spans two signed principal axes; `center_position` points
/// from the center of rotation to the pixel `(center_channel1,
/// center_channel2)` at zero detector angles. Pixel `(j1, j2)` of position
/// `i` lands at output index `i*n1*n2 + (j2 - roi2.start)*n1 +
/// (j1 - roi1.start)` with `n1`/`n2` the region-of-interest widths, so the
/// first pixel coordinate varies fastest.
#[allow(clippy::too_many_arguments)]
pub fn area(
    sample_angles: &[Real],
    detector_angles: &[Real],
    npoints: usize,
    sample_axes: &[&str],
    detector_axes: &[&str],
    center_position: Vector3<Real>,
    direction1: &str,
    direction2: &str,
    center_channel1: Real,
    center_channel2: Real,
    pixel_width1: Real,
    pixel_width2: Real,
    roi1: Range<usize>,
    roi2: Range<usize>,
    wavelength: Real,
) -> Result<Vec<Vector3<Real>>, ConversionError> {
    let sample = resolve_sample(sample_axes)?;
    let detector = resolve_detector(detector_axes)?;
    let dir1 = SignedAxis::from_token(direction1).map_err(ConversionError::DetectorDirection)?;
    let dir2 = SignedAxis::from_token(direction2).map_err(ConversionError::DetectorDirection)?;
    check_wavelength(wavelength)?;
    check_direction(&center_position)?;
    check_roi(&roi1)?;
    check_roi(&roi2)?;
    check_angles("sample", sample_angles, npoints, sample.len())?;
    check_angles("detector", detector_angles, npoints, detector.len())?;

    let k = TAU / wavelength;
    let r_i = center_position.normalize();
    let rpixel1 = dir1.step(pixel_width1);
    let rpixel2 = dir2.step(pixel_width2);
    let rcchp = rpixel1 * center_channel1 + rpixel2 * center_channel2;
    let ns = sample.len();
    let nd = detector.len();
    let rows = (roi1.end - roi1.start) * (roi2.end - roi2.start);

    let mut out = vec![Vector3::zeros(); npoints * rows];
    for_each_position(&mut out, rows, |i, chunk| {
        let ms = rotation_product(&sample, &sample_angles[i * ns..(i + 1) * ns]).inverse();
        let md = rotation_product(&detector, &detector_angles[i * nd..(i + 1) * nd]);
        let mut idx = 0;
        for j2 in roi2.clone() {
            // the j2-dependent part of the pixel position is fixed across
            // the inner loop
            let base = rpixel2 * (j2 as Real) - rcchp + center_position;
            for j1 in roi1.clone() {
                let rd = (rpixel1 * (j1 as Real) + base).normalize();
                chunk[idx] = ms * ((md * rd - r_i) * k);
                idx += 1;
            }
        }
    });
    Ok(out)
}
