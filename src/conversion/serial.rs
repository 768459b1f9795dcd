//! Serial driver over goniometer positions.

use crate::float_types::Real;
use nalgebra::Vector3;

/// Runs `body` once per goniometer position, handing each position its own
/// disjoint chunk of `rows` output slots.
pub fn for_each_position<F>(out: &mut [Vector3<Real>], rows: usize, body: F)
where
    F: Fn(usize, &mut [Vector3<Real>]) + Send + Sync,
{
    if rows == 0 {
        return;
    }
    for (position, chunk) in out.chunks_mut(rows).enumerate() {
        body(position, chunk);
    }
}
