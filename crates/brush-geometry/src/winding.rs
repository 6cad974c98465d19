//! Windings: convex polygons that get clipped down to brush faces.

use nalgebra::{Point3, Vector3};

use crate::plane::tangent_basis;
use crate::{Classification, Plane, PlaneSide};

/// A convex polygon in 3D space, defined by an ordered list of points.
///
/// Points are kept counter-clockwise when viewed from the side their
/// [`normal`](Self::normal) points to. A winding seeded from a brush plane
/// faces away from that plane's normal, i.e. out of the solid.
///
/// A winding can be empty, meaning it was clipped away entirely.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Winding {
    points: Vec<Point3<f32>>,
}

impl Winding {
    /// Creates a winding from a list of points.
    ///
    /// # Panics (debug builds only)
    /// Panics if a non-empty list has fewer than 3 points.
    pub fn new(points: Vec<Point3<f32>>) -> Self {
        debug_assert!(
            points.is_empty() || points.len() >= 3,
            "Winding must be empty or have at least 3 points"
        );
        Self { points }
    }

    /// Creates a quad lying on `plane`, centered at `normal * dist`, with
    /// half extent `extent` along both tangent directions.
    ///
    /// With a large enough extent the quad covers every face the plane can
    /// produce, so clipping it against the other sides of a brush yields
    /// that face exactly. A degenerate plane yields an empty winding.
    pub fn from_plane(plane: &Plane, extent: f32) -> Self {
        if plane.is_degenerate() {
            return Self::default();
        }

        let normal = plane.normal();
        let (up, right) = tangent_basis(&normal);
        let origin = Point3::from(normal * plane.dist());
        let up = up * extent;
        let right = right * extent;

        Self {
            points: vec![
                origin - right + up,
                origin + right + up,
                origin + right - up,
                origin - right - up,
            ],
        }
    }

    /// Returns the points of the winding.
    #[inline]
    pub fn points(&self) -> &[Point3<f32>] {
        &self.points
    }

    /// Consumes the winding, returning its points.
    #[inline]
    pub fn into_points(self) -> Vec<Point3<f32>> {
        self.points
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the winding was clipped away.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Computes the (unnormalized) normal from the first three points.
    ///
    /// Returns zero for windings with fewer than three points.
    pub fn normal(&self) -> Vector3<f32> {
        match self.points.as_slice() {
            [a, b, c, ..] => (b - a).cross(&(c - a)),
            _ => Vector3::zeros(),
        }
    }

    /// Computes the centroid (average of the points).
    ///
    /// Returns `None` for an empty winding.
    pub fn centroid(&self) -> Option<Point3<f32>> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Vector3<f32> = self.points.iter().map(|p| p.coords).sum();
        Some(Point3::from(sum / self.points.len() as f32))
    }

    /// Classifies this winding relative to a plane.
    pub fn classify(&self, plane: &Plane, epsilon: f32) -> Classification {
        let mut front = 0;
        let mut back = 0;

        for point in &self.points {
            match plane.classify_point(*point, epsilon) {
                PlaneSide::Front => front += 1,
                PlaneSide::Back => back += 1,
                PlaneSide::OnPlane => {}
            }
        }

        match (front, back) {
            (0, 0) => Classification::Coplanar,
            (0, _) => Classification::Back,
            (_, 0) => Classification::Front,
            _ => Classification::Spanning,
        }
    }

    /// Clips the winding in place, keeping the part in front of `plane`.
    ///
    /// Returns how the winding related to the plane before clipping:
    /// - `Coplanar`: unchanged, every point is on the plane
    /// - `Front`: unchanged, nothing is behind the plane
    /// - `Back`: the winding is now empty
    /// - `Spanning`: the part behind the plane was cut off
    ///
    /// Clipping an empty winding leaves it empty.
    pub fn clip(&mut self, plane: &Plane, epsilon: f32) -> Classification {
        if self.points.is_empty() {
            return Classification::Back;
        }

        let classification = self.classify(plane, epsilon);
        match classification {
            Classification::Coplanar | Classification::Front => {}
            Classification::Back => self.points.clear(),
            Classification::Spanning => self.points = split_points(&self.points, plane, epsilon),
        }
        classification
    }
}

/// Keeps the front part of a spanning winding.
///
/// Walks the edges in order, keeping front and on-plane points and inserting
/// an intersection point wherever an edge goes from front to back or back
/// to front.
fn split_points(points: &[Point3<f32>], plane: &Plane, epsilon: f32) -> Vec<Point3<f32>> {
    let n = points.len();
    let mut kept = Vec::with_capacity(n + 2);

    let normal = plane.normal();
    let dist = plane.dist();
    let dists: Vec<f32> = points.iter().map(|p| plane.signed_distance(*p)).collect();
    let sides: Vec<PlaneSide> = points
        .iter()
        .map(|p| plane.classify_point(*p, epsilon))
        .collect();

    for i in 0..n {
        let current = points[i];
        let current_side = sides[i];
        let next_idx = (i + 1) % n;
        let next_side = sides[next_idx];

        match current_side {
            PlaneSide::OnPlane => {
                kept.push(current);
                continue;
            }
            PlaneSide::Front => kept.push(current),
            PlaneSide::Back => {}
        }

        if next_side == PlaneSide::OnPlane || next_side == current_side {
            continue;
        }

        let next = points[next_idx];
        let t = dists[i] / (dists[i] - dists[next_idx]);
        let mut mid = Point3::origin();
        for axis in 0..3 {
            // Snap axial planes exactly to avoid round-off.
            mid[axis] = if normal[axis] == 1.0 {
                dist
            } else if normal[axis] == -1.0 {
                -dist
            } else {
                current[axis] + t * (next[axis] - current[axis])
            };
        }
        kept.push(mid);
    }

    kept
}
