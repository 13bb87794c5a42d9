// #![deny(warnings)]
#![deny(clippy::cast_lossless)]
#![doc(test(no_crate_inject))]
//! Incremental planar Delaunay triangulation.
//!
//! Points are inserted one at a time into a bounding quadrilateral using the
//! Bowyer–Watson algorithm. See [`Triangulation`](algorithms::Triangulation).
//!
//! ```rust
//! # use rdelaunay::algorithms::Triangulation;
//! # use rdelaunay::data::Point;
//! let mut net = Triangulation::with_extent(300.0).unwrap();
//! net.insert(Point::new([0.0, 0.0])).unwrap();
//! net.insert(Point::new([100.0, 0.0])).unwrap();
//! net.insert(Point::new([0.0, 100.0])).unwrap();
//! assert_eq!(net.export_indices().len(), 3);
//! ```
use num_traits::Float;
use std::cmp::Ordering;
use std::fmt::Debug;

pub mod algorithms;
pub mod data;
mod orientation;

pub use orientation::Orientation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  /// Three points are colinear (zero signed area).
  #[error("Degenerate triangle: the points are colinear")]
  Degenerate,
  /// The point does not lie strictly inside the sentinel quadrilateral.
  #[error("Point lies outside of the sentinel bounds")]
  OutOfBounds,
  #[error("Duplicate point: coincides with vertex {existing}")]
  DuplicatePoint { existing: usize },
  #[error("Coordinates must be finite")]
  NonFinite,
  #[error("No circumcircle contains the point")]
  EmptyCavity,
  /// The sentinel quadrilateral is empty, not convex or not finite.
  #[error("Invalid sentinel bounds")]
  InvalidBounds,
  /// A new vertex id would not fit in the `u32` export format.
  #[error("Too many points: vertex ids must fit in u32")]
  TooManyPoints,
  #[error("Delaunay violation: vertex {point} lies inside the circumcircle of {triangle:?}")]
  DelaunayViolation { triangle: [usize; 3], point: usize },
}

/// Floating point coordinate type.
///
/// Orientation and incircle tests are evaluated exactly with the adaptive
/// predicates from `geometry_predicates`. Both `f32` and `f64` convert to
/// `f64` without loss, so the predicates never round.
pub trait PointScalar: Float + Debug + Send + Sync + 'static {
  fn to_exact(self) -> f64;
  fn cmp_slope(p: &[Self; 2], q: &[Self; 2], r: &[Self; 2]) -> Ordering;
  /// `Greater` if `d` lies inside the circle through `a`, `b` and `c` when
  /// those are in counter-clockwise order. The sign flips for clockwise input.
  fn cmp_circle(a: &[Self; 2], b: &[Self; 2], c: &[Self; 2], d: &[Self; 2]) -> Ordering;
}

macro_rules! floating_precision {
  ( $( $ty:ty ),* ) => {
    $(
      impl PointScalar for $ty {
      fn to_exact(self) -> f64 {
        f64::from(self)
      }

      // This function uses the arbitrary precision machinery of `geometry_predicates` to
      // quickly compute the orientation of three 2D points.
      fn cmp_slope(p: &[Self; 2], q: &[Self; 2], r: &[Self; 2]) -> Ordering {
        let orient = geometry_predicates::predicates::orient2d(
          [f64::from(p[0]), f64::from(p[1])],
          [f64::from(q[0]), f64::from(q[1])],
          [f64::from(r[0]), f64::from(r[1])],
        );
        sign(orient)
      }

      fn cmp_circle(a: &[Self; 2], b: &[Self; 2], c: &[Self; 2], d: &[Self; 2]) -> Ordering {
        let det = geometry_predicates::predicates::incircle(
          [f64::from(a[0]), f64::from(a[1])],
          [f64::from(b[0]), f64::from(b[1])],
          [f64::from(c[0]), f64::from(c[1])],
          [f64::from(d[0]), f64::from(d[1])],
        );
        sign(det)
      }
    })*
  };
}

floating_precision!(f32, f64);

fn sign(value: f64) -> Ordering {
  if value > 0.0 {
    Ordering::Greater
  } else if value < 0.0 {
    Ordering::Less
  } else {
    Ordering::Equal
  }
}

#[cfg(test)]
pub mod testing;
