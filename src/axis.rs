//! Signed principal rotation axes
//!
//! Every goniometer circle, sample side or detector side, rotates about one
//! of the six signed lab axes. A circle is bound to its axis by a
//! two-character token such as `"x+"` or `"z-"`: a letter in x/y/z
//! (case-insensitive) followed by a strict '+' or '-'. Unrecognized tokens
//! are a configuration error, never a silently defaulted axis.

use crate::errors::AxisTokenError;
use crate::float_types::Real;
use nalgebra::{Rotation3, Vector3};
use std::str::FromStr;

/// One of the six signed principal axes a circle can rotate about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedAxis {
    /// Right-handed rotation about +x
    Xp,
    /// Right-handed rotation about -x
    Xm,
    /// Right-handed rotation about +y
    Yp,
    /// Right-handed rotation about -y
    Ym,
    /// Right-handed rotation about +z
    Zp,
    /// Right-handed rotation about -z
    Zm,
}

impl SignedAxis {
    /// Parses a two-character axis token.
    ///
    /// The letter is checked before the sign, so `"w*"` reports the bad
    /// letter rather than the bad sign.
    pub fn from_token(token: &str) -> Result<Self, AxisTokenError> {
        let mut chars = token.chars();
        let (letter, sign) = match (chars.next(), chars.next(), chars.next()) {
            (Some(letter), Some(sign), None) => (letter, sign),
            _ => return Err(AxisTokenError::Length(token.to_string())),
        };
        match (letter.to_ascii_lowercase(), sign) {
            ('x', '+') => Ok(SignedAxis::Xp),
            ('x', '-') => Ok(SignedAxis::Xm),
            ('y', '+') => Ok(SignedAxis::Yp),
            ('y', '-') => Ok(SignedAxis::Ym),
            ('z', '+') => Ok(SignedAxis::Zp),
            ('z', '-') => Ok(SignedAxis::Zm),
            ('x' | 'y' | 'z', bad_sign) => Err(AxisTokenError::Sign(bad_sign)),
            (bad_letter, _) => Err(AxisTokenError::Letter(bad_letter)),
        }
    }

    /// The canonical token for this axis.
    pub const fn token(self) -> &'static str {
        match self {
            SignedAxis::Xp => "x+",
            SignedAxis::Xm => "x-",
            SignedAxis::Yp => "y+",
            SignedAxis::Ym => "y-",
            SignedAxis::Zp => "z+",
            SignedAxis::Zm => "z-",
        }
    }

    /// The unit vector along this signed axis.
    pub fn unit(self) -> Vector3<Real> {
        match self {
            SignedAxis::Xp => Vector3::x(),
            SignedAxis::Xm => -Vector3::x(),
            SignedAxis::Yp => Vector3::y(),
            SignedAxis::Ym => -Vector3::y(),
            SignedAxis::Zp => Vector3::z(),
            SignedAxis::Zm => -Vector3::z(),
        }
    }

    /// The displacement per pixel increment along this axis for a detector
    /// row mounted on it: all-zero except `pitch` (signed) in the component
    /// matching the letter.
    pub fn step(self, pitch: Real) -> Vector3<Real> {
        self.unit() * pitch
    }

    /// The right-handed rotation by `angle` radians about this axis.
    ///
    /// Minus variants rotate about the corresponding positive axis by the
    /// negated angle, which is the same rotation as a right-handed turn
    /// about the negative axis.
    pub fn rotation(self, angle: Real) -> Rotation3<Real> {
        match self {
            SignedAxis::Xp => Rotation3::from_axis_angle(&Vector3::x_axis(), angle),
            SignedAxis::Xm => Rotation3::from_axis_angle(&Vector3::x_axis(), -angle),
            SignedAxis::Yp => Rotation3::from_axis_angle(&Vector3::y_axis(), angle),
            SignedAxis::Ym => Rotation3::from_axis_angle(&Vector3::y_axis(), -angle),
            SignedAxis::Zp => Rotation3::from_axis_angle(&Vector3::z_axis(), angle),
            SignedAxis::Zm => Rotation3::from_axis_angle(&Vector3::z_axis(), -angle),
        }
    }
}

impl FromStr for SignedAxis {
    type Err = AxisTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignedAxis::from_token(s)
    }
}

/// Resolves an ordered sequence of axis tokens atomically.
///
/// Either every token parses and the full binding sequence comes back, or
/// the position and cause of the first failure do; a partially resolved
/// sequence never escapes.
pub fn resolve(tokens: &[&str]) -> Result<Vec<SignedAxis>, (usize, AxisTokenError)> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| SignedAxis::from_token(token).map_err(|source| (index, source)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::float_types::FRAC_PI_2;

    const ALL: [SignedAxis; 6] = [
        SignedAxis::Xp,
        SignedAxis::Xm,
        SignedAxis::Yp,
        SignedAxis::Ym,
        SignedAxis::Zp,
        SignedAxis::Zm,
    ];

    #[test]
    fn token_round_trip() {
        for axis in ALL {
            assert_eq!(axis.token().parse(), Ok(axis));
        }
        assert_eq!(SignedAxis::from_token("X+"), Ok(SignedAxis::Xp));
        assert_eq!(SignedAxis::from_token("Z-"), Ok(SignedAxis::Zm));
    }

    #[test]
    fn malformed_tokens() {
        assert_eq!(SignedAxis::from_token("w+"), Err(AxisTokenError::Letter('w')));
        assert_eq!(SignedAxis::from_token("x*"), Err(AxisTokenError::Sign('*')));
        // letter wins when both characters are bad
        assert_eq!(SignedAxis::from_token("w*"), Err(AxisTokenError::Letter('w')));
        assert_eq!(
            SignedAxis::from_token("x"),
            Err(AxisTokenError::Length("x".to_string()))
        );
        assert_eq!(
            SignedAxis::from_token("xy+"),
            Err(AxisTokenError::Length("xy+".to_string()))
        );
    }

    #[test]
    fn zero_angle_is_identity() {
        for axis in ALL {
            approx::assert_relative_eq!(
                axis.rotation(0.0),
                Rotation3::identity(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn opposite_angles_cancel() {
        for axis in ALL {
            let angle = 0.7391;
            approx::assert_relative_eq!(
                axis.rotation(angle) * axis.rotation(-angle),
                Rotation3::identity(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn opposite_signs_are_inverses() {
        let pairs = [
            (SignedAxis::Xp, SignedAxis::Xm),
            (SignedAxis::Yp, SignedAxis::Ym),
            (SignedAxis::Zp, SignedAxis::Zm),
        ];
        for (plus, minus) in pairs {
            let angle = 1.1;
            approx::assert_relative_eq!(
                plus.rotation(angle) * minus.rotation(angle),
                Rotation3::identity(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn quarter_turn_about_z() {
        let q = SignedAxis::Zp.rotation(FRAC_PI_2) * Vector3::x();
        approx::assert_relative_eq!(q, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn pixel_step_places_signed_pitch() {
        assert_eq!(SignedAxis::Xp.step(0.5), Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(SignedAxis::Zm.step(0.5), Vector3::new(0.0, 0.0, -0.5));
    }

    #[test]
    fn sequence_resolution_is_atomic() {
        let resolved = resolve(&["x+", "z-", "y+"]).unwrap();
        assert_eq!(resolved, vec![SignedAxis::Xp, SignedAxis::Zm, SignedAxis::Yp]);

        let failure = resolve(&["x+", "w-", "y+"]).unwrap_err();
        assert_eq!(failure, (1, AxisTokenError::Letter('w')));
    }
}
