//! Incremental Delaunay triangulation with the Bowyer–Watson algorithm.
//!
//! The triangulation starts out as a bounding quadrilateral made of four
//! sentinel vertices and two triangles. Every insertion:
//!
//! 1. finds the triangles whose circumcircle strictly contains the new point,
//! 2. counts how often each of their edges occurs (edges seen once form the
//!    boundary of the cavity, edges seen twice are interior to it),
//! 3. removes those triangles and connects the new point to every boundary
//!    edge.
//!
//! The point-in-circumcircle test is exact, so the result is a Delaunay
//! triangulation for any input that lies strictly inside the sentinel
//! quadrilateral. Cocircular points are not considered to be in conflict.
//!
//! The sentinels are ordinary vertices at a finite distance. A triangle with
//! user vertices only is dropped whenever a sentinel falls inside its
//! circumcircle, so the triangles returned by
//! [`Triangulation::export_indices`] cover the convex hull of the user points
//! only when the sentinel quadrilateral is large compared to the points.
//! Near-flat triangles along the hull have huge circumcircles and are the
//! first to go.
//!
//! Vertex ids are exported as `u32`; an insertion that would need a larger
//! id fails with [`Error::TooManyPoints`].
//!
//! Insertion is O(T) in the current number of triangles: there is no point
//! location structure.
//!
//! References:
//!
//! - Bowyer, A. "Computing Dirichlet tessellations." *The Computer Journal* 24.2 (1981).
//! - Watson, D.F. "Computing the n-dimensional Delaunay tessellation with application to
//!   Voronoi polytopes." *The Computer Journal* 24.2 (1981).
use ordered_float::OrderedFloat;
use std::collections::{HashMap, HashSet};

use crate::data::{Aabb, Point, TriangleView};
use crate::{Error, Orientation, PointScalar};

/// Number of sentinel vertices. Vertex ids below this bound are the corners
/// of the bounding quadrilateral.
pub const SENTINELS: usize = 4;

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct VertIdx(pub usize);
impl std::fmt::Debug for VertIdx {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(fmt, "v{}", self.0)
  }
}

impl VertIdx {
  pub fn is_super(&self) -> bool {
    self.0 < SENTINELS
  }
}

/// Undirected edge. The smaller id is stored first.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Debug)]
pub struct IndexEdge {
  pub min: VertIdx,
  pub max: VertIdx,
}

impl IndexEdge {
  pub fn new(a: VertIdx, b: VertIdx) -> IndexEdge {
    IndexEdge {
      min: std::cmp::min(a, b),
      max: std::cmp::max(a, b),
    }
  }
}

/// Triangle as a sorted triple of vertex ids. Two keys over the same vertices
/// compare equal regardless of the order they were given in.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct TriKey([VertIdx; 3]);

impl TriKey {
  pub fn new(a: VertIdx, b: VertIdx, c: VertIdx) -> TriKey {
    let mut vertices = [a, b, c];
    vertices.sort_unstable();
    debug_assert!(
      vertices[0] != vertices[1] && vertices[1] != vertices[2],
      "repeated vertex: {:?}",
      vertices
    );
    TriKey(vertices)
  }

  pub fn vertices(&self) -> [VertIdx; 3] {
    self.0
  }

  pub fn edges(&self) -> [IndexEdge; 3] {
    let [a, b, c] = self.0;
    [
      IndexEdge::new(a, b),
      IndexEdge::new(b, c),
      IndexEdge::new(a, c),
    ]
  }

  /// Returns true if the triangle touches a sentinel vertex.
  pub fn is_super(&self) -> bool {
    self.0[0].is_super()
  }

  pub fn contains(&self, v: VertIdx) -> bool {
    self.0.contains(&v)
  }
}

impl std::fmt::Debug for TriKey {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    let [a, b, c] = self.0;
    write!(fmt, "Tri({}, {}, {})", a.0, b.0, c.0)
  }
}

type CoordKey = [OrderedFloat<f64>; 2];

// Exported ids are u32.
fn check_capacity(next_id: usize) -> Result<(), Error> {
  u32::try_from(next_id)
    .map(|_| ())
    .map_err(|_| Error::TooManyPoints)
}

fn coord_key<T: PointScalar>(pt: &Point<T>) -> CoordKey {
  let [x, y] = pt.to_exact();
  [OrderedFloat(x), OrderedFloat(y)]
}

/// Incremental Delaunay triangulation of a set of planar points.
///
/// Points must lie strictly inside the sentinel quadrilateral chosen at
/// construction. Vertex ids are stable: the `n`-th accepted point gets id
/// `SENTINELS + n` and keeps it forever.
///
/// Insertions that fail leave the triangulation untouched.
///
/// # Examples
///
/// ```rust
/// # use rdelaunay::algorithms::Triangulation;
/// # use rdelaunay::data::Point;
/// let mut net = Triangulation::with_extent(300.0)?;
/// net.insert(Point::new([0.0, 0.0]))?;
/// assert_eq!(net.point_count(), 1);
/// assert_eq!(net.triangle_count(), 0);
/// assert_eq!(net.all_triangles().count(), 4);
/// # Ok::<(), rdelaunay::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Triangulation<T> {
  vertices: Vec<Point<T>>,
  triangles: HashSet<TriKey>,
  lookup: HashMap<CoordKey, VertIdx>,
  winding: Orientation,
}

impl<T: PointScalar> Triangulation<T> {
  /// Use the corners of `bounds` as sentinels.
  pub fn new(bounds: Aabb<T>) -> Result<Self, Error> {
    bounds.validate()?;
    Self::from_quad(bounds.corners())
  }

  /// Sentinel square `[-half, half]²`.
  pub fn with_extent(half: T) -> Result<Self, Error> {
    Self::new(Aabb::with_extent(half))
  }

  /// Use four explicit corners as sentinels. The corners must form a
  /// strictly convex quadrilateral, in either orientation. Their order is
  /// kept: corner `i` is vertex `i`.
  pub fn from_quad(corners: [Point<T>; 4]) -> Result<Self, Error> {
    if !corners.iter().all(Point::is_finite) {
      return Err(Error::NonFinite);
    }
    let winding = corners[0].orientation(&corners[1], &corners[2]);
    let convex = (0..SENTINELS).all(|i| {
      let turn = corners[i].orientation(
        &corners[(i + 1) % SENTINELS],
        &corners[(i + 2) % SENTINELS],
      );
      turn == winding && !turn.is_colinear()
    });
    if !convex {
      return Err(Error::InvalidBounds);
    }

    let mut net = Triangulation {
      vertices: corners.to_vec(),
      triangles: HashSet::new(),
      lookup: HashMap::new(),
      winding,
    };
    for (i, corner) in corners.iter().enumerate() {
      net.lookup.insert(coord_key(corner), VertIdx(i));
    }
    net.seed_triangles();
    Ok(net)
  }

  // Split the quad along whichever diagonal is Delaunay.
  fn seed_triangles(&mut self) {
    let [v0, v1, v2, v3] = [VertIdx(0), VertIdx(1), VertIdx(2), VertIdx(3)];
    let first = TriKey::new(v0, v1, v2);
    self.triangles.clear();
    if self.view(&first).point_in_circumcircle(self.vert(v3)) {
      self.triangles.insert(TriKey::new(v0, v1, v3));
      self.triangles.insert(TriKey::new(v1, v2, v3));
    } else {
      self.triangles.insert(first);
      self.triangles.insert(TriKey::new(v2, v3, v0));
    }
  }

  /// Drop every user point. The sentinels are kept.
  pub fn clear(&mut self) {
    self.vertices.truncate(SENTINELS);
    self.lookup.retain(|_, idx| idx.is_super());
    self.seed_triangles();
  }

  pub fn vert(&self, idx: VertIdx) -> &Point<T> {
    &self.vertices[idx.0]
  }

  /// All vertices, sentinels first.
  pub fn vertices(&self) -> &[Point<T>] {
    &self.vertices
  }

  pub fn sentinels(&self) -> &[Point<T>] {
    &self.vertices[..SENTINELS]
  }

  /// Inserted points, in insertion order.
  pub fn points(&self) -> &[Point<T>] {
    &self.vertices[SENTINELS..]
  }

  pub fn point_count(&self) -> usize {
    self.vertices.len() - SENTINELS
  }

  /// Number of triangles that do not touch a sentinel.
  pub fn triangle_count(&self) -> usize {
    self.triangles().count()
  }

  /// Triangles that do not touch a sentinel. Unordered.
  pub fn triangles(&self) -> impl Iterator<Item = &TriKey> + '_ {
    self.triangles.iter().filter(|tri| !tri.is_super())
  }

  /// Every triangle of the working set, sentinel ones included. Unordered.
  pub fn all_triangles(&self) -> impl Iterator<Item = &TriKey> + '_ {
    self.triangles.iter()
  }

  pub fn contains_triangle(&self, tri: &TriKey) -> bool {
    self.triangles.contains(tri)
  }

  pub fn view(&self, tri: &TriKey) -> TriangleView<'_, T> {
    let [a, b, c] = tri.0;
    TriangleView::new_unchecked([self.vert(a), self.vert(b), self.vert(c)])
  }

  /// True if `pt` lies strictly inside the sentinel quadrilateral.
  pub fn in_domain(&self, pt: &Point<T>) -> bool {
    (0..SENTINELS).all(|i| {
      self.vertices[i].orientation(&self.vertices[(i + 1) % SENTINELS], pt) == self.winding
    })
  }

  /// Add a new point to the triangulation and return its vertex id.
  ///
  /// # Errors
  ///
  /// - [`Error::NonFinite`] if a coordinate is NaN or infinite.
  /// - [`Error::OutOfBounds`] if the point is not strictly inside the
  ///   sentinel quadrilateral.
  /// - [`Error::DuplicatePoint`] if the point is already a vertex.
  /// - [`Error::TooManyPoints`] if the new vertex id does not fit in `u32`.
  /// - [`Error::Degenerate`] if the cavity cannot be re-triangulated without
  ///   creating a colinear triangle.
  ///
  /// The triangulation is unchanged when an error is returned.
  pub fn insert(&mut self, pt: Point<T>) -> Result<VertIdx, Error> {
    self.try_insert(pt).map_err(|err| {
      tracing::warn!(x = ?pt[0], y = ?pt[1], %err, "rejected point");
      err
    })
  }

  pub fn insert_xy(&mut self, x: T, y: T) -> Result<VertIdx, Error> {
    self.insert(Point::new([x, y]))
  }

  /// Insert points in order. Stops at the first failure; points inserted
  /// before it stay in the triangulation.
  pub fn insert_all<I>(&mut self, points: I) -> Result<(), Error>
  where
    I: IntoIterator<Item = Point<T>>,
  {
    for pt in points {
      self.insert(pt)?;
    }
    Ok(())
  }

  fn try_insert(&mut self, pt: Point<T>) -> Result<VertIdx, Error> {
    if !pt.is_finite() {
      return Err(Error::NonFinite);
    }
    if !self.in_domain(&pt) {
      return Err(Error::OutOfBounds);
    }
    check_capacity(self.vertices.len())?;
    if let Some(existing) = self.lookup.get(&coord_key(&pt)) {
      return Err(Error::DuplicatePoint {
        existing: existing.0,
      });
    }

    let mut doomed = Vec::new();
    let mut edge_count: HashMap<IndexEdge, usize> = HashMap::new();
    for tri in self.triangles.iter() {
      if self.view(tri).point_in_circumcircle(&pt) {
        for edge in tri.edges().iter() {
          *edge_count.entry(*edge).or_insert(0) += 1;
        }
        doomed.push(*tri);
      }
    }
    tracing::trace!(doomed = ?doomed, "cavity");
    if doomed.is_empty() {
      return Err(Error::EmptyCavity);
    }

    let boundary: Vec<IndexEdge> = edge_count
      .into_iter()
      .filter(|&(_, count)| count == 1)
      .map(|(edge, _)| edge)
      .collect();
    for edge in boundary.iter() {
      if self
        .vert(edge.min)
        .orientation(self.vert(edge.max), &pt)
        .is_colinear()
      {
        tracing::debug!(?edge, "cavity edge is colinear with the new point");
        return Err(Error::Degenerate);
      }
    }

    let idx = VertIdx(self.vertices.len());
    self.vertices.push(pt);
    self.lookup.insert(coord_key(&pt), idx);
    for tri in doomed.iter() {
      self.triangles.remove(tri);
    }
    for edge in boundary.iter() {
      self.triangles.insert(TriKey::new(edge.min, edge.max, idx));
    }
    tracing::debug!(
      vertex = idx.0,
      removed = doomed.len(),
      added = boundary.len(),
      "inserted point"
    );

    self.check_invariant("post-insert");
    Ok(idx)
  }

  /// Locate a triangle of the working set that contains `pt` (boundary
  /// inclusive). Sentinel triangles are candidates too; check
  /// [`TriKey::is_super`] to tell them apart.
  pub fn find_triangle(&self, pt: &Point<T>) -> Option<TriKey> {
    self
      .triangles
      .iter()
      .find(|tri| matches!(self.view(tri).point_in_triangle(pt), Ok(true)))
      .copied()
  }

  // Vertex ids of a triangle in counter-clockwise order.
  fn ccw_vertices(&self, tri: &TriKey) -> [VertIdx; 3] {
    let [a, b, c] = tri.0;
    if self.view(tri).orientation().is_cw() {
      [a, c, b]
    } else {
      [a, b, c]
    }
  }

  /// Flat list of vertex index triples for every triangle that does not
  /// touch a sentinel. Index 0 is the first inserted point. Every triple is
  /// counter-clockwise; the order of the triples is unspecified.
  pub fn export_indices(&self) -> Vec<u32> {
    let mut out = Vec::with_capacity(3 * self.triangles.len());
    for tri in self.triangles() {
      out.extend(
        self
          .ccw_vertices(tri)
          .iter()
          // Ids fit in u32, see `check_capacity`.
          .map(|v| (v.0 - SENTINELS) as u32),
      );
    }
    out
  }

  /// Like [`export_indices`](Self::export_indices) but keeps the sentinel
  /// triangles and does not shift the ids: index `i` is `vertices()[i]`.
  pub fn export_all_indices(&self) -> Vec<u32> {
    let mut out = Vec::with_capacity(3 * self.triangles.len());
    for tri in self.triangles.iter() {
      out.extend(self.ccw_vertices(tri).iter().map(|v| v.0 as u32));
    }
    out
  }

  /// Check the Delaunay property against every vertex. O(T·V).
  pub fn validate(&self) -> Result<(), Error> {
    for tri in self.triangles.iter() {
      let view = self.view(tri);
      view.validate()?;
      for (i, pt) in self.vertices.iter().enumerate() {
        if view.point_in_circumcircle(pt) {
          return Err(Error::DelaunayViolation {
            triangle: tri.0.map(|v| v.0),
            point: i,
          });
        }
      }
    }
    Ok(())
  }

  // A triangulation of a convex quadrilateral with n interior vertices
  // always has 2n + 2 triangles.
  #[cfg(not(debug_assertions))]
  fn check_invariant(&self, _msg: &str) {}

  #[cfg(debug_assertions)]
  fn check_invariant(&self, msg: &str) {
    let expected = 2 + 2 * self.point_count();
    if self.triangles.len() != expected {
      panic!(
        "invariant violated: {}: {} triangles, expected {}",
        msg,
        self.triangles.len(),
        expected
      );
    }
    for tri in self.triangles.iter() {
      if self.view(tri).orientation().is_colinear() {
        panic!("invariant violated: {}: {:?} is degenerate", msg, tri);
      }
    }
  }
}

/// Triangulate `points`, using the first four as the bounding quadrilateral.
///
/// Returns index triples into `points`. Triangles touching the four corners
/// are included, so the result tiles the whole quadrilateral.
///
/// ```rust
/// # use rdelaunay::algorithms::triangulate;
/// # use rdelaunay::data::Point;
/// let points = [
///   Point::new([0.0, 0.0]),
///   Point::new([1.0, 0.0]),
///   Point::new([1.0, 1.0]),
///   Point::new([0.0, 1.0]),
///   Point::new([0.5, 0.5]),
/// ];
/// let elements = triangulate(&points)?;
/// assert_eq!(elements.len(), 4 * 3);
/// # Ok::<(), rdelaunay::Error>(())
/// ```
pub fn triangulate<T: PointScalar>(points: &[Point<T>]) -> Result<Vec<u32>, Error> {
  if points.len() < SENTINELS {
    return Err(Error::InvalidBounds);
  }
  let mut net = Triangulation::from_quad([points[0], points[1], points[2], points[3]])?;
  net.insert_all(points[SENTINELS..].iter().copied())?;
  Ok(net.export_all_indices())
}
