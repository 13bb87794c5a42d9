use super::{Aabb, Point};
use crate::PointScalar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle<T> {
  pub center: Point<T>,
  pub radius: T,
}

impl<T: PointScalar> Circle<T> {
  pub fn new(center: Point<T>, radius: T) -> Circle<T> {
    Circle { center, radius }
  }

  pub fn bounding_box(&self) -> Aabb<T> {
    let [x, y] = self.center.array;
    Aabb::new(
      Point::new([x - self.radius, y - self.radius]),
      Point::new([x + self.radius, y + self.radius]),
    )
  }

  // Inclusive. Rounds, unlike `TriangleView::point_in_circumcircle`.
  pub fn contains(&self, pt: &Point<T>) -> bool {
    self.center.squared_euclidean_distance(pt) <= self.radius * self.radius
  }
}
