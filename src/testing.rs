// Strategies and reference computations shared by the unit tests.
use crate::algorithms::Triangulation;
use crate::data::Point;
use crate::PointScalar;

use core::ops::Range;
use proptest::collection::vec;
use proptest::prelude::*;

pub fn any_point() -> impl Strategy<Value = Point<f64>> {
  point_in(1000.0)
}

/// Points in the open square `(-extent, extent)²`.
pub fn point_in(extent: f64) -> impl Strategy<Value = Point<f64>> {
  (-extent..extent, -extent..extent)
    .prop_filter("strictly inside", move |(x, y)| x.abs() < extent && y.abs() < extent)
    .prop_map(|(x, y)| Point::new([x, y]))
}

pub fn point_cloud(extent: f64, size: Range<usize>) -> impl Strategy<Value = Vec<Point<f64>>> {
  vec(point_in(extent), size)
}

// Integer coordinates produce plenty of colinear and cocircular subsets as
// well as duplicates.
pub fn grid_cloud(extent: i32, size: Range<usize>) -> impl Strategy<Value = Vec<Point<f64>>> {
  vec(
    (-extent..=extent, -extent..=extent)
      .prop_map(|(x, y)| Point::new([f64::from(x), f64::from(y)])),
    size,
  )
}

/// Area of the convex hull (Andrew's monotone chain).
pub fn convex_hull_area<T: PointScalar>(points: &[Point<T>]) -> f64 {
  let mut pts: Vec<[f64; 2]> = points.iter().map(Point::to_exact).collect();
  pts.sort_by(|a, b| a.partial_cmp(b).unwrap());
  pts.dedup();
  if pts.len() < 3 {
    return 0.0;
  }
  let turns_left = |o: &[f64; 2], a: &[f64; 2], b: &[f64; 2]| {
    geometry_predicates::predicates::orient2d(*o, *a, *b) > 0.0
  };
  let mut hull: Vec<[f64; 2]> = Vec::with_capacity(2 * pts.len());
  for pass in 0..2 {
    let start = hull.len();
    let iter: Box<dyn Iterator<Item = &[f64; 2]>> = if pass == 0 {
      Box::new(pts.iter())
    } else {
      Box::new(pts.iter().rev())
    };
    for pt in iter {
      while hull.len() >= start + 2 && !turns_left(&hull[hull.len() - 2], &hull[hull.len() - 1], pt)
      {
        hull.pop();
      }
      hull.push(*pt);
    }
    hull.pop();
  }
  let mut area2x = 0.0;
  for i in 0..hull.len() {
    let [ax, ay] = hull[i];
    let [bx, by] = hull[(i + 1) % hull.len()];
    area2x += ax * by - bx * ay;
  }
  area2x / 2.0
}

/// Summed area of the triangles that do not touch a sentinel.
pub fn surviving_area<T: PointScalar>(net: &Triangulation<T>) -> f64 {
  net
    .triangles()
    .map(|tri| net.view(tri).signed_area().to_exact().abs())
    .sum()
}

/// Insert every point, skipping duplicates.
pub fn build(extent: f64, points: &[Point<f64>]) -> Triangulation<f64> {
  let mut net = Triangulation::with_extent(extent).unwrap();
  for pt in points {
    match net.insert(*pt) {
      Ok(_) | Err(crate::Error::DuplicatePoint { .. }) => {}
      Err(err) => panic!("unexpected insertion failure for {:?}: {}", pt, err),
    }
  }
  net
}
