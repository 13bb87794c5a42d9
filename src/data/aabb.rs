use rand::distributions::uniform::SampleUniform;
use rand::Rng;

use super::{Circle, Point};
use crate::{Error, PointScalar};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<T> {
  pub min: Point<T>,
  pub max: Point<T>,
}

impl<T: PointScalar> Aabb<T> {
  pub fn new(min: Point<T>, max: Point<T>) -> Aabb<T> {
    Aabb { min, max }
  }

  /// Square of side `2 * half` centered on the origin.
  pub fn with_extent(half: T) -> Aabb<T> {
    Aabb::new(Point::new([-half, -half]), Point::new([half, half]))
  }

  /// Smallest box containing every point. `None` for an empty iterator.
  pub fn from_points<'a, I>(points: I) -> Option<Aabb<T>>
  where
    I: IntoIterator<Item = &'a Point<T>>,
    T: 'a,
  {
    let mut iter = points.into_iter();
    let first = *iter.next()?;
    Some(iter.fold(Aabb::new(first, first), |bbox, pt| {
      Aabb::new(
        Point::new([bbox.min[0].min(pt[0]), bbox.min[1].min(pt[1])]),
        Point::new([bbox.max[0].max(pt[0]), bbox.max[1].max(pt[1])]),
      )
    }))
  }

  pub fn width(&self) -> T {
    self.max[0] - self.min[0]
  }

  pub fn height(&self) -> T {
    self.max[1] - self.min[1]
  }

  pub fn center(&self) -> Point<T> {
    let half = half::<T>();
    Point::new([
      half * (self.min[0] + self.max[0]),
      half * (self.min[1] + self.max[1]),
    ])
  }

  pub fn circumcircle(&self) -> Circle<T> {
    let half = half::<T>();
    let rx = half * self.width();
    let ry = half * self.height();
    Circle::new(self.center(), (rx * rx + ry * ry).sqrt())
  }

  /// Grow every side by `margin`.
  #[must_use]
  pub fn padded(&self, margin: T) -> Aabb<T> {
    Aabb::new(
      Point::new([self.min[0] - margin, self.min[1] - margin]),
      Point::new([self.max[0] + margin, self.max[1] + margin]),
    )
  }

  /// Scale around the center.
  #[must_use]
  pub fn scaled(&self, factor: T) -> Aabb<T> {
    let c = self.center();
    let hw = half::<T>() * self.width() * factor;
    let hh = half::<T>() * self.height() * factor;
    Aabb::new(
      Point::new([c[0] - hw, c[1] - hh]),
      Point::new([c[0] + hw, c[1] + hh]),
    )
  }

  /// Boundary inclusive.
  pub fn contains(&self, pt: &Point<T>) -> bool {
    self.min[0] <= pt[0] && pt[0] <= self.max[0] && self.min[1] <= pt[1] && pt[1] <= self.max[1]
  }

  pub fn strictly_contains(&self, pt: &Point<T>) -> bool {
    self.min[0] < pt[0] && pt[0] < self.max[0] && self.min[1] < pt[1] && pt[1] < self.max[1]
  }

  /// Corners in counter-clockwise order, starting at `min`.
  pub fn corners(&self) -> [Point<T>; 4] {
    [
      self.min,
      Point::new([self.max[0], self.min[1]]),
      self.max,
      Point::new([self.min[0], self.max[1]]),
    ]
  }

  pub fn validate(&self) -> Result<(), Error> {
    if !self.min.is_finite() || !self.max.is_finite() {
      return Err(Error::NonFinite);
    }
    if self.width() <= T::zero() || self.height() <= T::zero() {
      return Err(Error::InvalidBounds);
    }
    Ok(())
  }

  /// Uniformly sample a point in `[min, max)`.
  pub fn sample<R>(&self, rng: &mut R) -> Point<T>
  where
    R: Rng + ?Sized,
    T: SampleUniform,
  {
    Point::new([
      rng.gen_range(self.min[0]..self.max[0]),
      rng.gen_range(self.min[1]..self.max[1]),
    ])
  }
}

fn half<T: PointScalar>() -> T {
  T::one() / (T::one() + T::one())
}
