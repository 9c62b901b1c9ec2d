//! Deterministic per-region row sampling.

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seed used when the caller does not pick one. Fixed so demos and tests are reproducible.
pub const DEFAULT_SEED: u64 = 42;

/// Picks `sample_size` row positions out of `height` uniformly without replacement,
/// returned in ascending order.
///
/// Returns `None` when the frame is not larger than the sample, meaning every row is kept.
pub(crate) fn sample_positions(height: usize, sample_size: usize, seed: u64) -> Option<Vec<usize>> {
    if height <= sample_size {
        return None;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions = rand::seq::index::sample(&mut rng, height, sample_size).into_vec();
    positions.sort_unstable();
    Some(positions)
}

/// Reduces `df` to at most `sample_size` rows, keeping the original row order.
pub(crate) fn sample_frame(df: DataFrame, sample_size: usize, seed: u64) -> PolarsResult<DataFrame> {
    let Some(positions) = sample_positions(df.height(), sample_size, seed) else {
        return Ok(df);
    };
    let indices: Vec<IdxSize> = positions.into_iter().map(|p| p as IdxSize).collect();
    let indices = IdxCa::from_vec("sample".into(), indices);
    df.take(&indices)
}
