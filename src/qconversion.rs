//! Goniometer description configured once and reused
//!
//! [`QConversion`] bundles what stays fixed across a measurement: the
//! ordered sample and detector circle axes (outermost first), the primary
//! beam direction, the wavelength and, for pixel detectors, the mounted
//! geometry. Conversions then take one angle column per circle, in
//! **degrees** as instruments report them, and feed the radian-based engine
//! in [`conversion`](crate::conversion).

use crate::axis::SignedAxis;
use crate::conversion;
use crate::detector::{AreaDetector, LinearDetector};
use crate::errors::ConversionError;
use crate::float_types::Real;
use nalgebra::Vector3;
use std::fmt::Display;

/// Cu Kα1 wavelength in angstroem, the default for [`QConversion`].
pub const WAVELENGTH_CU_KA1: Real = 1.5406;

/// A configured angular-to-reciprocal-space converter.
///
/// ```
/// use qconv::QConversion;
/// use nalgebra::Vector3;
///
/// // three sample circles and one detector circle of a four-circle
/// // diffractometer, beam along +y
/// let qc = QConversion::new(&["x+", "y+", "z-"], &["x+"], Vector3::y()).unwrap();
/// let (omega, chi, phi) = (15.0, 0.0, 30.0);
/// let q = qc.point(&[&[omega], &[chi], &[phi]], &[&[2.0 * omega]]).unwrap();
/// assert_eq!(q.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QConversion {
    sample_axes: Vec<SignedAxis>,
    detector_axes: Vec<SignedAxis>,
    beam_direction: Vector3<Real>,
    wavelength: Real,
    sample_offsets: Vec<Real>,
    detector_offsets: Vec<Real>,
    linear: Option<LinearDetector>,
    area: Option<AreaDetector>,
}

impl QConversion {
    /// A converter for the given circle axes and primary beam direction.
    ///
    /// Both token sequences are resolved atomically here, so an invalid
    /// axis fails construction rather than the first conversion. The
    /// wavelength defaults to [`WAVELENGTH_CU_KA1`].
    pub fn new(
        sample_axes: &[&str],
        detector_axes: &[&str],
        beam_direction: Vector3<Real>,
    ) -> Result<Self, ConversionError> {
        let sample_axes = conversion::resolve_sample(sample_axes)?;
        let detector_axes = conversion::resolve_detector(detector_axes)?;
        conversion::check_direction(&beam_direction)?;
        let sample_offsets = vec![0.0; sample_axes.len()];
        let detector_offsets = vec![0.0; detector_axes.len()];
        Ok(QConversion {
            sample_axes,
            detector_axes,
            beam_direction,
            wavelength: WAVELENGTH_CU_KA1,
            sample_offsets,
            detector_offsets,
            linear: None,
            area: None,
        })
    }

    /// Replaces the wavelength (same length unit as detector distances).
    /// Validity is checked by the engine on every conversion.
    pub fn with_wavelength(mut self, wavelength: Real) -> Self {
        self.wavelength = wavelength;
        self
    }

    /// Mounts a linear detector for [`Self::linear`] conversions.
    pub fn with_linear_detector(mut self, detector: LinearDetector) -> Self {
        self.linear = Some(detector);
        self
    }

    /// Mounts an area detector for [`Self::area`] conversions.
    pub fn with_area_detector(mut self, detector: AreaDetector) -> Self {
        self.area = Some(detector);
        self
    }

    /// Per-circle misalignment corrections in degrees, one per sample and
    /// detector circle; the converted angle is the given one minus its
    /// offset.
    pub fn with_angle_offsets(
        mut self,
        sample: &[Real],
        detector: &[Real],
    ) -> Result<Self, ConversionError> {
        if sample.len() != self.sample_axes.len() {
            return Err(ConversionError::AngleShape {
                which: "sample offset",
                len: sample.len(),
                npoints: 1,
                ncircles: self.sample_axes.len(),
            });
        }
        if detector.len() != self.detector_axes.len() {
            return Err(ConversionError::AngleShape {
                which: "detector offset",
                len: detector.len(),
                npoints: 1,
                ncircles: self.detector_axes.len(),
            });
        }
        self.sample_offsets = sample.to_vec();
        self.detector_offsets = detector.to_vec();
        Ok(self)
    }

    /// The resolved sample circle axes, outermost first.
    pub fn sample_axes(&self) -> &[SignedAxis] {
        &self.sample_axes
    }

    /// The resolved detector circle axes, outermost first.
    pub fn detector_axes(&self) -> &[SignedAxis] {
        &self.detector_axes
    }

    /// The primary beam direction as configured.
    pub fn beam_direction(&self) -> Vector3<Real> {
        self.beam_direction
    }

    /// The wavelength used for the `2π/λ` scale.
    pub fn wavelength(&self) -> Real {
        self.wavelength
    }

    /// The mounted linear detector, if any.
    pub fn linear_detector(&self) -> Option<&LinearDetector> {
        self.linear.as_ref()
    }

    /// The mounted area detector, if any.
    pub fn area_detector(&self) -> Option<&AreaDetector> {
        self.area.as_ref()
    }

    /// Point-detector conversion.
    ///
    /// `sample` and `detector` carry one angle column per circle, outermost
    /// first, in degrees; all columns must share one length, the number of
    /// goniometer positions. Returns one momentum-transfer vector per
    /// position.
    pub fn point(
        &self,
        sample: &[&[Real]],
        detector: &[&[Real]],
    ) -> Result<Vec<Vector3<Real>>, ConversionError> {
        let npoints = npoints(sample, detector);
        let sample_angles = flatten_columns(
            "sample",
            sample,
            &self.sample_offsets,
            self.sample_axes.len(),
            npoints,
        )?;
        let detector_angles = flatten_columns(
            "detector",
            detector,
            &self.detector_offsets,
            self.detector_axes.len(),
            npoints,
        )?;
        conversion::point(
            &sample_angles,
            &detector_angles,
            npoints,
            &self.sample_tokens(),
            &self.detector_tokens(),
            self.beam_direction,
            self.wavelength,
        )
    }

    /// Linear-detector conversion over the mounted detector's region of
    /// interest, rebinning folded in. Output rows per position equal the
    /// rebinned region width; the channel index varies fastest.
    pub fn linear(
        &self,
        sample: &[&[Real]],
        detector: &[&[Real]],
    ) -> Result<Vec<Vector3<Real>>, ConversionError> {
        let det = self
            .linear
            .as_ref()
            .ok_or(ConversionError::DetectorNotInitialized("linear"))?
            .rebinned();
        let npoints = npoints(sample, detector);
        let sample_angles = flatten_columns(
            "sample",
            sample,
            &self.sample_offsets,
            self.sample_axes.len(),
            npoints,
        )?;
        let detector_angles = flatten_columns(
            "detector",
            detector,
            &self.detector_offsets,
            self.detector_axes.len(),
            npoints,
        )?;
        conversion::linear(
            &sample_angles,
            &detector_angles,
            npoints,
            &self.sample_tokens(),
            &self.detector_tokens(),
            self.beam_direction.normalize() * det.distance,
            det.direction.token(),
            det.center_channel,
            det.pixel_width,
            det.roi.clone(),
            self.wavelength,
        )
    }

    /// Area-detector conversion over the mounted detector's region of
    /// interest, rebinning folded in per direction. The first pixel
    /// coordinate varies fastest in the output.
    pub fn area(
        &self,
        sample: &[&[Real]],
        detector: &[&[Real]],
    ) -> Result<Vec<Vector3<Real>>, ConversionError> {
        let det = self
            .area
            .as_ref()
            .ok_or(ConversionError::DetectorNotInitialized("area"))?
            .rebinned();
        let npoints = npoints(sample, detector);
        let sample_angles = flatten_columns(
            "sample",
            sample,
            &self.sample_offsets,
            self.sample_axes.len(),
            npoints,
        )?;
        let detector_angles = flatten_columns(
            "detector",
            detector,
            &self.detector_offsets,
            self.detector_axes.len(),
            npoints,
        )?;
        conversion::area(
            &sample_angles,
            &detector_angles,
            npoints,
            &self.sample_tokens(),
            &self.detector_tokens(),
            self.beam_direction.normalize() * det.distance,
            det.direction1.token(),
            det.direction2.token(),
            det.center1,
            det.center2,
            det.pixel_width1,
            det.pixel_width2,
            det.roi1.clone(),
            det.roi2.clone(),
            self.wavelength,
        )
    }

    fn sample_tokens(&self) -> Vec<&'static str> {
        self.sample_axes.iter().map(|axis| axis.token()).collect()
    }

    fn detector_tokens(&self) -> Vec<&'static str> {
        self.detector_axes.iter().map(|axis| axis.token()).collect()
    }
}

impl Display for QConversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "QConversion geometry")?;
        writeln!(f, "---------------------------")?;
        write!(f, "sample geometry({}): ", self.sample_axes.len())?;
        for axis in &self.sample_axes {
            write!(f, "{}", axis.token())?;
        }
        writeln!(f)?;
        write!(f, "detector geometry({}): ", self.detector_axes.len())?;
        for axis in &self.detector_axes {
            write!(f, "{}", axis.token())?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "primary beam direction: ({:5.2} {:5.2} {:5.2})",
            self.beam_direction.x, self.beam_direction.y, self.beam_direction.z
        )?;
        writeln!(f, "wavelength: {}", self.wavelength)?;
        if let Some(det) = &self.linear {
            writeln!(f)?;
            writeln!(f, "linear detector initialized:")?;
            write!(f, "{}", det)?;
        }
        if let Some(det) = &self.area {
            writeln!(f)?;
            writeln!(f, "area detector initialized:")?;
            write!(f, "{}", det)?;
        }
        Ok(())
    }
}

/// The number of goniometer positions is set by the first angle column;
/// mismatched columns are caught during flattening.
fn npoints(sample: &[&[Real]], detector: &[&[Real]]) -> usize {
    sample
        .first()
        .or_else(|| detector.first())
        .map_or(0, |column| column.len())
}

/// Interleaves per-circle angle columns into the engine's row-major layout,
/// subtracting the per-circle offsets and converting degrees to radians.
fn flatten_columns(
    which: &'static str,
    columns: &[&[Real]],
    offsets: &[Real],
    ncircles: usize,
    npoints: usize,
) -> Result<Vec<Real>, ConversionError> {
    if columns.len() != ncircles || columns.iter().any(|column| column.len() != npoints) {
        let total = columns.iter().map(|column| column.len()).sum();
        return Err(ConversionError::AngleShape {
            which,
            len: total,
            npoints,
            ncircles,
        });
    }
    let mut flat = Vec::with_capacity(npoints * ncircles);
    for i in 0..npoints {
        for (column, offset) in columns.iter().zip(offsets) {
            flat.push((column[i] - offset).to_radians());
        }
    }
    Ok(flat)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::float_types::{FRAC_PI_2, TAU};

    #[test]
    fn degrees_in_radians_down() {
        let qc = QConversion::new(&["x+"], &["z+"], Vector3::y())
            .unwrap()
            .with_wavelength(TAU);
        let wrapped = qc.point(&[&[90.0]], &[&[30.0]]).unwrap();
        let direct = conversion::point(
            &[FRAC_PI_2],
            &[(30.0 as Real).to_radians()],
            1,
            &["x+"],
            &["z+"],
            Vector3::y(),
            TAU,
        )
        .unwrap();
        approx::assert_relative_eq!(wrapped[0], direct[0], epsilon = 1e-12);
    }

    #[test]
    fn columns_interleave_outermost_first() {
        let qc = QConversion::new(&["z+", "x+"], &["z+"], Vector3::y())
            .unwrap()
            .with_wavelength(TAU);
        // three positions, two sample circles
        let outer = [10.0, 20.0, 30.0];
        let inner = [1.0, 2.0, 3.0];
        let det = [5.0, 6.0, 7.0];
        let wrapped = qc.point(&[&outer, &inner], &[&det]).unwrap();

        let mut sample_flat = Vec::new();
        for i in 0..3 {
            sample_flat.push((outer[i] as Real).to_radians());
            sample_flat.push((inner[i] as Real).to_radians());
        }
        let detector_flat: Vec<Real> = det.iter().map(|d| d.to_radians()).collect();
        let direct = conversion::point(
            &sample_flat,
            &detector_flat,
            3,
            &["z+", "x+"],
            &["z+"],
            Vector3::y(),
            TAU,
        )
        .unwrap();
        assert_eq!(wrapped, direct);
    }

    #[test]
    fn offsets_subtract_before_conversion() {
        let qc = QConversion::new(&["x+"], &["z+"], Vector3::y())
            .unwrap()
            .with_wavelength(TAU);
        let corrected = qc
            .clone()
            .with_angle_offsets(&[10.0], &[-5.0])
            .unwrap()
            .point(&[&[100.0]], &[&[25.0]])
            .unwrap();
        let plain = qc.point(&[&[90.0]], &[&[30.0]]).unwrap();
        approx::assert_relative_eq!(corrected[0], plain[0], epsilon = 1e-12);
    }

    #[test]
    fn offset_lengths_must_match_circles() {
        let qc = QConversion::new(&["x+", "y+"], &["z+"], Vector3::y()).unwrap();
        let err = qc.with_angle_offsets(&[1.0], &[0.0]).unwrap_err();
        assert_eq!(
            err,
            ConversionError::AngleShape {
                which: "sample offset",
                len: 1,
                npoints: 1,
                ncircles: 2,
            }
        );
    }

    #[test]
    fn pixel_conversions_need_a_mounted_detector() {
        let qc = QConversion::new(&["x+"], &["z+"], Vector3::y()).unwrap();
        assert_eq!(
            qc.linear(&[&[0.0]], &[&[0.0]]).unwrap_err(),
            ConversionError::DetectorNotInitialized("linear")
        );
        assert_eq!(
            qc.area(&[&[0.0]], &[&[0.0]]).unwrap_err(),
            ConversionError::DetectorNotInitialized("area")
        );
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let qc = QConversion::new(&["x+", "y+"], &["z+"], Vector3::y()).unwrap();
        let err = qc
            .point(&[&[1.0, 2.0][..], &[1.0][..]], &[&[0.0, 0.0][..]])
            .unwrap_err();
        assert_eq!(
            err,
            ConversionError::AngleShape {
                which: "sample",
                len: 3,
                npoints: 2,
                ncircles: 2,
            }
        );
    }

    #[test]
    fn wrapper_matches_engine_for_mounted_linear_detector() {
        let detector = LinearDetector::new("x+", 512.0, 1024, 1.5, 0.075)
            .unwrap()
            .with_roi(500..525);
        let qc = QConversion::new(&["x+"], &["z-"], Vector3::y())
            .unwrap()
            .with_linear_detector(detector);
        let wrapped = qc.linear(&[&[12.0]], &[&[24.0]]).unwrap();
        let direct = conversion::linear(
            &[(12.0 as Real).to_radians()],
            &[(24.0 as Real).to_radians()],
            1,
            &["x+"],
            &["z-"],
            Vector3::new(0.0, 1.5, 0.0),
            "x+",
            512.0,
            0.075,
            500..525,
            WAVELENGTH_CU_KA1,
        )
        .unwrap();
        assert_eq!(wrapped, direct);
    }

    #[test]
    fn geometry_summary_lists_axes_and_detectors() {
        let qc = QConversion::new(&["x+", "z-"], &["x+"], Vector3::y())
            .unwrap()
            .with_linear_detector(
                LinearDetector::from_channels_per_degree("z+", 511.5, 1024, 320.0).unwrap(),
            );
        let summary = qc.to_string();
        assert!(summary.contains("sample geometry(2): x+z-"));
        assert!(summary.contains("detector geometry(1): x+"));
        assert!(summary.contains("linear detector initialized:"));
        assert!(summary.contains("linear detector mount direction: z+"));
    }
}
