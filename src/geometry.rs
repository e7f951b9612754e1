//! Random problem instances.
//!
//! Points live on a 1000 x 1000 canvas and keep a margin of [`POINT_SIZE`]
//! from every border so they remain fully visible when drawn. Coordinates are
//! rounded to whole units; coincident points are possible and kept.

use crate::models::Point;
use rand::Rng;
use tracing::instrument;

pub const MAX_X: f64 = 1000.0;
pub const MAX_Y: f64 = 1000.0;
pub const POINT_SIZE: f64 = 5.0;

/// Draws `n` points uniformly inside the visible area.
#[instrument(level = "debug", skip(rng))]
pub fn random_points<R: Rng>(rng: &mut R, n: usize) -> Vec<Point> {
    (0..n)
        .map(|_| {
            Point::new(
                rng.random_range(POINT_SIZE..=MAX_X - POINT_SIZE).round(),
                rng.random_range(POINT_SIZE..=MAX_Y - POINT_SIZE).round(),
            )
        })
        .collect()
}
