//! Pixel-detector geometry
//!
//! Configuration for the 1-D (linear) and 2-D (area) detectors handled by
//! [`QConversion`](crate::qconversion::QConversion). The center channel of a
//! detector must point along the primary beam when all detector angles are
//! zero; every other channel is anchored to it by an integer number of pixel
//! steps along the mount direction(s).

use crate::axis::SignedAxis;
use crate::errors::ConversionError;
use crate::float_types::Real;
use std::fmt::Display;
use std::ops::Range;

/// Half the arc, in degrees, that one channel subtends in the
/// channels-per-degree calibration.
const HALF_CHANNEL_ARC_DEG: Real = 0.5;

fn pitch_from_chpdeg(distance: Real, chpdeg: Real) -> Real {
    2.0 * distance * HALF_CHANNEL_ARC_DEG.to_radians().tan() / chpdeg.abs()
}

fn chpdeg_from_pitch(distance: Real, pitch: Real) -> Real {
    2.0 * distance * HALF_CHANNEL_ARC_DEG.to_radians().tan() / pitch
}

fn rebin_roi(roi: &Range<usize>, n: usize) -> Range<usize> {
    roi.start.div_ceil(n)..roi.end.div_ceil(n)
}

/// A 1-D strip detector mounted along one signed principal axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearDetector {
    /// Mount direction of the channel row
    pub direction: SignedAxis,
    /// Channel lying on the primary beam at zero detector angles
    pub center_channel: Real,
    /// Total number of channels
    pub channels: usize,
    /// Distance of the center channel from the center of rotation
    pub distance: Real,
    /// Width of one channel, in the same unit as `distance`
    pub pixel_width: Real,
    /// Channel range converted to momentum transfer
    pub roi: Range<usize>,
    /// Number of adjacent channels averaged into one before conversion
    pub rebin: usize,
}

impl LinearDetector {
    /// A linear detector with an explicit distance and pixel width.
    ///
    /// The region of interest defaults to all channels, rebinning to 1.
    pub fn new(
        direction: &str,
        center_channel: Real,
        channels: usize,
        distance: Real,
        pixel_width: Real,
    ) -> Result<Self, ConversionError> {
        let direction =
            SignedAxis::from_token(direction).map_err(ConversionError::DetectorDirection)?;
        Ok(LinearDetector {
            direction,
            center_channel,
            channels,
            distance,
            pixel_width,
            roi: 0..channels,
            rebin: 1,
        })
    }

    /// A linear detector calibrated by channels per degree, at unit
    /// detector distance. Only the magnitude of `chpdeg` matters; the sign
    /// of the channel axis comes from `direction`. `chpdeg` must be
    /// non-zero.
    pub fn from_channels_per_degree(
        direction: &str,
        center_channel: Real,
        channels: usize,
        chpdeg: Real,
    ) -> Result<Self, ConversionError> {
        let distance = 1.0;
        Self::new(
            direction,
            center_channel,
            channels,
            distance,
            pitch_from_chpdeg(distance, chpdeg),
        )
    }

    /// Restricts conversion to the given channel range.
    pub fn with_roi(mut self, roi: Range<usize>) -> Self {
        self.roi = roi;
        self
    }

    /// Averages `rebin` adjacent channels into one. A factor of 0 is
    /// treated as 1.
    pub fn with_rebin(mut self, rebin: usize) -> Self {
        self.rebin = rebin;
        self
    }

    /// The geometry actually converted once `rebin` channels are averaged
    /// together: center channel and region of interest shrink, the pixel
    /// width grows, the angular span stays fixed.
    pub fn rebinned(&self) -> LinearDetector {
        let n = self.rebin.max(1);
        let scale = n as Real;
        LinearDetector {
            direction: self.direction,
            center_channel: self.center_channel / scale,
            channels: self.channels.div_ceil(n),
            distance: self.distance,
            pixel_width: self.pixel_width * scale,
            roi: rebin_roi(&self.roi, n),
            rebin: 1,
        }
    }
}

impl Display for LinearDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "linear detector mount direction: {}", self.direction.token())?;
        writeln!(
            f,
            "number of channels/center channel: {}/{}",
            self.channels, self.center_channel
        )?;
        writeln!(
            f,
            "distance to center of rotation/pixel width: {}/{}",
            self.distance, self.pixel_width
        )?;
        writeln!(
            f,
            "corresponds to channels per degree: {:.2}",
            chpdeg_from_pitch(self.distance, self.pixel_width)
        )
    }
}

/// A 2-D pixel detector mounted along two signed principal axes.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaDetector {
    /// Mount direction of the first (fastest-varying) pixel coordinate
    pub direction1: SignedAxis,
    /// Mount direction of the second pixel coordinate
    pub direction2: SignedAxis,
    /// Center pixel coordinate along direction 1
    pub center1: Real,
    /// Center pixel coordinate along direction 2
    pub center2: Real,
    /// Number of pixels along direction 1
    pub channels1: usize,
    /// Number of pixels along direction 2
    pub channels2: usize,
    /// Distance of the center pixel from the center of rotation
    pub distance: Real,
    /// Pixel width along direction 1, in the same unit as `distance`
    pub pixel_width1: Real,
    /// Pixel width along direction 2, in the same unit as `distance`
    pub pixel_width2: Real,
    /// Pixel range converted along direction 1
    pub roi1: Range<usize>,
    /// Pixel range converted along direction 2
    pub roi2: Range<usize>,
    /// Rebin factor along direction 1
    pub rebin1: usize,
    /// Rebin factor along direction 2
    pub rebin2: usize,
}

impl AreaDetector {
    /// An area detector with an explicit distance and pixel widths.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        direction1: &str,
        direction2: &str,
        center1: Real,
        center2: Real,
        channels1: usize,
        channels2: usize,
        distance: Real,
        pixel_width1: Real,
        pixel_width2: Real,
    ) -> Result<Self, ConversionError> {
        let direction1 =
            SignedAxis::from_token(direction1).map_err(ConversionError::DetectorDirection)?;
        let direction2 =
            SignedAxis::from_token(direction2).map_err(ConversionError::DetectorDirection)?;
        Ok(AreaDetector {
            direction1,
            direction2,
            center1,
            center2,
            channels1,
            channels2,
            distance,
            pixel_width1,
            pixel_width2,
            roi1: 0..channels1,
            roi2: 0..channels2,
            rebin1: 1,
            rebin2: 1,
        })
    }

    /// An area detector calibrated by channels per degree along each
    /// direction, at unit detector distance. Both calibrations must be
    /// non-zero.
    #[allow(clippy::too_many_arguments)]
    pub fn from_channels_per_degree(
        direction1: &str,
        direction2: &str,
        center1: Real,
        center2: Real,
        channels1: usize,
        channels2: usize,
        chpdeg1: Real,
        chpdeg2: Real,
    ) -> Result<Self, ConversionError> {
        let distance = 1.0;
        Self::new(
            direction1,
            direction2,
            center1,
            center2,
            channels1,
            channels2,
            distance,
            pitch_from_chpdeg(distance, chpdeg1),
            pitch_from_chpdeg(distance, chpdeg2),
        )
    }

    /// Restricts conversion to the given pixel ranges.
    pub fn with_roi(mut self, roi1: Range<usize>, roi2: Range<usize>) -> Self {
        self.roi1 = roi1;
        self.roi2 = roi2;
        self
    }

    /// Averages `rebin1` x `rebin2` pixel blocks into one. Factors of 0
    /// are treated as 1.
    pub fn with_rebin(mut self, rebin1: usize, rebin2: usize) -> Self {
        self.rebin1 = rebin1;
        self.rebin2 = rebin2;
        self
    }

    /// The geometry actually converted after rebinning, per direction.
    pub fn rebinned(&self) -> AreaDetector {
        let n1 = self.rebin1.max(1);
        let n2 = self.rebin2.max(1);
        let scale1 = n1 as Real;
        let scale2 = n2 as Real;
        AreaDetector {
            direction1: self.direction1,
            direction2: self.direction2,
            center1: self.center1 / scale1,
            center2: self.center2 / scale2,
            channels1: self.channels1.div_ceil(n1),
            channels2: self.channels2.div_ceil(n2),
            distance: self.distance,
            pixel_width1: self.pixel_width1 * scale1,
            pixel_width2: self.pixel_width2 * scale2,
            roi1: rebin_roi(&self.roi1, n1),
            roi2: rebin_roi(&self.roi2, n2),
            rebin1: 1,
            rebin2: 1,
        }
    }
}

impl Display for AreaDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "area detector mount directions: {}/{}",
            self.direction1.token(),
            self.direction2.token()
        )?;
        writeln!(
            f,
            "number of channels/center channels: ({},{}) / ({},{})",
            self.channels1, self.channels2, self.center1, self.center2
        )?;
        writeln!(
            f,
            "distance to center of rotation/pixel width: {}/ ({},{})",
            self.distance, self.pixel_width1, self.pixel_width2
        )?;
        writeln!(
            f,
            "corresponds to channels per degree: ({:.2},{:.2})",
            chpdeg_from_pitch(self.distance, self.pixel_width1),
            chpdeg_from_pitch(self.distance, self.pixel_width2)
        )
    }
}
