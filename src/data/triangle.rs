use super::{Aabb, Circle, Point};
use crate::{Error, Orientation, PointScalar};
use claims::debug_assert_ok;
use std::cmp::Ordering;

pub struct Triangle<T>([Point<T>; 3]);

impl<T: PointScalar> Triangle<T> {
  pub fn new(pts: [Point<T>; 3]) -> Triangle<T> {
    let triangle = Triangle(pts);
    debug_assert_ok!(triangle.validate());
    triangle
  }

  pub fn validate(&self) -> Result<(), Error> {
    self.view().validate()
  }

  pub fn view(&'_ self) -> TriangleView<'_, T> {
    TriangleView([&self.0[0], &self.0[1], &self.0[2]])
  }
}

/// Borrowed triangle. Vertices may be given in either orientation.
#[derive(Debug, Clone, Copy)]
pub struct TriangleView<'a, T>([&'a Point<T>; 3]);

impl<'a, T: PointScalar> TriangleView<'a, T> {
  // O(1)
  pub fn new(pts: [&'a Point<T>; 3]) -> TriangleView<'a, T> {
    let triangle = TriangleView(pts);
    debug_assert_ok!(triangle.validate());
    triangle
  }

  pub fn new_unchecked(pts: [&'a Point<T>; 3]) -> TriangleView<'a, T> {
    TriangleView(pts)
  }

  pub fn vertices(&self) -> [&'a Point<T>; 3] {
    self.0
  }

  // O(1)
  pub fn validate(&self) -> Result<(), Error> {
    let [a, b, c] = self.0;
    if !a.is_finite() || !b.is_finite() || !c.is_finite() {
      return Err(Error::NonFinite);
    }
    if self.orientation().is_colinear() {
      return Err(Error::Degenerate);
    }
    Ok(())
  }

  pub fn orientation(&self) -> Orientation {
    let [a, b, c] = self.0;
    Orientation::new(a, b, c)
  }

  /// Twice the signed area. Positive for counter-clockwise vertices.
  pub fn signed_area_2x(&self) -> T {
    let [e1, e2] = self.edge_vectors();
    e1[0] * e2[1] - e1[1] * e2[0]
  }

  pub fn signed_area(&self) -> T {
    self.signed_area_2x() / (T::one() + T::one())
  }

  fn edge_vectors(&self) -> [[T; 2]; 2] {
    let [a, b, c] = self.0;
    [[b[0] - a[0], b[1] - a[1]], [c[0] - a[0], c[1] - a[1]]]
  }

  /// Circle through all three vertices.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Degenerate`] for colinear vertices and for triangles
  /// so thin that the center cannot be represented.
  pub fn circumcircle(&self) -> Result<Circle<T>, Error> {
    self.validate()?;
    let a = self.0[0];
    let [e1, e2] = self.edge_vectors();
    let d = (T::one() + T::one()) * (e1[0] * e2[1] - e1[1] * e2[0]);
    if d == T::zero() {
      return Err(Error::Degenerate);
    }
    let inv_d = T::one() / d;
    let sqnorm_e1 = e1[0] * e1[0] + e1[1] * e1[1];
    let sqnorm_e2 = e2[0] * e2[0] + e2[1] * e2[1];
    let cx = inv_d * (e2[1] * sqnorm_e1 - e1[1] * sqnorm_e2);
    let cy = inv_d * (e1[0] * sqnorm_e2 - e2[0] * sqnorm_e1);
    let circle = Circle::new(
      Point::new([cx + a[0], cy + a[1]]),
      (cx * cx + cy * cy).sqrt(),
    );
    if !circle.center.is_finite() || !circle.radius.is_finite() {
      return Err(Error::Degenerate);
    }
    Ok(circle)
  }

  /// Barycentric containment test, boundary inclusive.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Degenerate`] for colinear vertices.
  pub fn point_in_triangle(&self, pt: &Point<T>) -> Result<bool, Error> {
    self.validate()?;
    let a = self.0[0];
    let [e1, e2] = self.edge_vectors();
    let d = e1[0] * e2[1] - e1[1] * e2[0];
    if d == T::zero() {
      return Err(Error::Degenerate);
    }
    let inv_d = T::one() / d;
    let tx = pt[0] - a[0];
    let ty = pt[1] - a[1];
    let u = inv_d * (e2[1] * tx - e2[0] * ty);
    let v = inv_d * (e1[0] * ty - e1[1] * tx);
    Ok(u >= T::zero() && v >= T::zero() && u + v <= T::one())
  }

  /// True iff `pt` lies strictly inside the circumcircle.
  ///
  /// Evaluated as `sign(orientation) * sign(incircle) > 0` without
  /// constructing the circle, so the answer does not depend on the vertex
  /// order. Cocircular points are not inside. A degenerate triangle has no
  /// circumcircle and contains nothing.
  pub fn point_in_circumcircle(&self, pt: &Point<T>) -> bool {
    let [a, b, c] = self.0;
    let orient = T::cmp_slope(a, b, c);
    let det = T::cmp_circle(a, b, c, pt);
    matches!(
      (orient, det),
      (Ordering::Greater, Ordering::Greater) | (Ordering::Less, Ordering::Less)
    )
  }

  pub fn bounding_box(&self) -> Aabb<T> {
    let [a, b, c] = self.0;
    Aabb::new(
      Point::new([a[0].min(b[0]).min(c[0]), a[1].min(b[1]).min(c[1])]),
      Point::new([a[0].max(b[0]).max(c[0]), a[1].max(b[1]).max(c[1])]),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::*;
  use claims::{assert_err_eq, assert_ok, assert_ok_eq};

  use proptest::prelude::*;
  use test_strategy::proptest;

  fn pts(arr: [[f64; 2]; 3]) -> [Point<f64>; 3] {
    [Point::new(arr[0]), Point::new(arr[1]), Point::new(arr[2])]
  }

  // Rounding in the explicit formulas blows up for slivers.
  fn is_fat(view: &TriangleView<'_, f64>) -> bool {
    let bbox = view.bounding_box();
    let diag = bbox.width().powi(2) + bbox.height().powi(2);
    view.validate().is_ok() && view.signed_area().abs() > 1e-3 * diag
  }

  #[test]
  fn circumcircle_right_triangle() {
    let [a, b, c] = pts([[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]]);
    let circle = TriangleView::new([&a, &b, &c]).circumcircle().unwrap();
    assert_eq!(circle.center, Point::new([2.0, 1.5]));
    assert_eq!(circle.radius, 2.5);
  }

  #[test]
  fn circumcircle_orientation_independent() {
    let [a, b, c] = pts([[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]]);
    let ccw = TriangleView::new([&a, &b, &c]).circumcircle().unwrap();
    let cw = TriangleView::new([&a, &c, &b]).circumcircle().unwrap();
    assert_eq!(ccw, cw);
  }

  #[test]
  fn colinear_is_degenerate() {
    let [a, b, c] = pts([[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
    let view = TriangleView::new_unchecked([&a, &b, &c]);
    assert_err_eq!(view.validate(), Error::Degenerate);
    assert_err_eq!(view.circumcircle(), Error::Degenerate);
    assert_err_eq!(view.point_in_triangle(&Point::new([1.0, 0.0])), Error::Degenerate);
    assert!(!view.point_in_circumcircle(&Point::new([1.0, 1.0])));
  }

  #[test]
  fn repeated_vertex_is_degenerate() {
    let [a, b, _] = pts([[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    let view = TriangleView::new_unchecked([&a, &b, &a]);
    assert_err_eq!(view.circumcircle(), Error::Degenerate);
  }

  #[test]
  fn point_in_triangle_inclusive() {
    let [a, b, c] = pts([[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]]);
    let view = TriangleView::new([&a, &b, &c]);
    assert_ok_eq!(view.point_in_triangle(&Point::new([1.0, 1.0])), true);
    assert_ok_eq!(view.point_in_triangle(&Point::new([2.0, 2.0])), true);
    assert_ok_eq!(view.point_in_triangle(&Point::new([0.0, 0.0])), true);
    assert_ok_eq!(view.point_in_triangle(&Point::new([3.0, 3.0])), false);
    assert_ok_eq!(view.point_in_triangle(&Point::new([-0.1, 1.0])), false);
  }

  #[test]
  fn point_in_circumcircle_strict() {
    let [a, b, c] = pts([[-1.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    let ccw = TriangleView::new([&a, &b, &c]);
    let cw = TriangleView::new([&b, &a, &c]);
    for view in [ccw, cw].iter() {
      assert!(view.point_in_circumcircle(&Point::new([0.0, 0.0])));
      assert!(view.point_in_circumcircle(&Point::new([0.5, -0.5])));
      // Cocircular.
      assert!(!view.point_in_circumcircle(&Point::new([0.0, -1.0])));
      assert!(!view.point_in_circumcircle(&a));
      assert!(!view.point_in_circumcircle(&Point::new([0.0, -1.1])));
    }
  }

  #[test]
  fn signed_area() {
    let [a, b, c] = pts([[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]]);
    assert_eq!(TriangleView::new([&a, &b, &c]).signed_area(), 6.0);
    assert_eq!(TriangleView::new([&a, &c, &b]).signed_area(), -6.0);
  }

  #[test]
  fn bounding_box() {
    let [a, b, c] = pts([[1.0, -1.0], [4.0, 2.0], [-2.0, 3.0]]);
    let bbox = TriangleView::new([&a, &b, &c]).bounding_box();
    assert_eq!(bbox.min, Point::new([-2.0, -1.0]));
    assert_eq!(bbox.max, Point::new([4.0, 3.0]));
  }

  #[test]
  fn owned_triangle() {
    let tri = Triangle::new(pts([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]));
    assert_ok!(tri.validate());
    assert!(tri.view().orientation().is_ccw());
  }

  // The explicit circle and the determinant test agree away from the
  // boundary of the circle.
  #[proptest]
  fn circumcircle_agrees_with_incircle(
    #[strategy(any_point())] a: Point<f64>,
    #[strategy(any_point())] b: Point<f64>,
    #[strategy(any_point())] c: Point<f64>,
    #[strategy(any_point())] d: Point<f64>,
  ) {
    let view = TriangleView::new_unchecked([&a, &b, &c]);
    prop_assume!(is_fat(&view));
    let circle = view.circumcircle();
    prop_assume!(circle.is_ok());
    let circle = circle.unwrap();
    let dist = circle.center.squared_euclidean_distance(&d).sqrt();
    prop_assume!((dist - circle.radius).abs() > 1e-6 * circle.radius.max(1.0));
    prop_assert_eq!(view.point_in_circumcircle(&d), dist < circle.radius);
  }

  #[proptest]
  fn vertices_are_inside_their_triangle(
    #[strategy(any_point())] a: Point<f64>,
    #[strategy(any_point())] b: Point<f64>,
    #[strategy(any_point())] c: Point<f64>,
  ) {
    let view = TriangleView::new_unchecked([&a, &b, &c]);
    prop_assume!(is_fat(&view));
    let center = Point::new([(a[0] + b[0] + c[0]) / 3.0, (a[1] + b[1] + c[1]) / 3.0]);
    prop_assert_eq!(view.point_in_triangle(&center), Ok(true));
  }
}
