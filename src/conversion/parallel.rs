//! Rayon driver over goniometer positions.

use crate::float_types::Real;
use nalgebra::Vector3;
use rayon::prelude::*;

/// Runs `body` once per goniometer position, handing each position its own
/// disjoint chunk of `rows` output slots. Positions are fanned out across
/// the rayon pool; every chunk is written by exactly one task, so the
/// result is identical for any thread count.
pub fn for_each_position<F>(out: &mut [Vector3<Real>], rows: usize, body: F)
where
    F: Fn(usize, &mut [Vector3<Real>]) + Send + Sync,
{
    if rows == 0 {
        return;
    }
    out.par_chunks_mut(rows)
        .enumerate()
        .for_each(|(position, chunk)| body(position, chunk));
}
