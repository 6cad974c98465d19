//! Brush planes: three authored points plus the derived normal and distance.

use std::str::FromStr;

use log::warn;
use nalgebra::{Point3, Vector3};

use crate::{Error, Result};

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// Classification of a winding relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No vertex is behind the plane
    Front,
    /// No vertex is in front of the plane
    Back,
    /// All vertices are on the plane (coplanar)
    Coplanar,
    /// Vertices are on both sides (spans the plane)
    Spanning,
}

/// A plane in 3D space, authored as three points and represented as
/// `normal · point = dist`.
///
/// The normal follows the right-hand rule: `(b - a) × (c - a)`. Brush
/// solids keep the region in *front* of every plane, so the normals of a
/// brush point into the solid.
///
/// Collinear points do not panic: they produce a zero normal and the plane
/// reports [`is_degenerate`](Self::is_degenerate).
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    points: [Point3<f32>; 3],
    normal: Vector3<f32>,
    dist: f32,
}

impl Plane {
    /// Creates a plane from three points.
    pub fn from_three_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let ab = b - a;
        let ac = c - a;
        let cross = ab.cross(&ac);
        let len = cross.norm();

        let (normal, dist) = if len > f32::EPSILON {
            let normal = cross / len;
            (normal, normal.dot(&a.coords))
        } else {
            (Vector3::zeros(), 0.0)
        };

        Self {
            points: [a, b, c],
            normal,
            dist,
        }
    }

    /// Creates a plane through `point` facing `normal`.
    ///
    /// The three defining points are synthesized so that round-tripping
    /// through [`points`](Self::points) gives back the same plane.
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        let len = normal.norm();
        if len <= f32::EPSILON {
            return Self::from_three_points(point, point, point);
        }

        let normal = normal / len;
        let (up, right) = tangent_basis(&normal);

        Self {
            points: [point, point + right, point + up],
            normal,
            dist: normal.dot(&point.coords),
        }
    }

    /// Parses `"(x y z) (x y z) (x y z)"`, falling back to a degenerate
    /// plane at the origin when the input is malformed.
    ///
    /// The fallback is logged; the side using it is later excluded from
    /// face generation.
    pub fn parse_lenient(input: &str) -> Self {
        input.parse().unwrap_or_else(|err| {
            warn!("{err}; using a degenerate plane");
            let origin = Point3::origin();
            Self::from_three_points(origin, origin, origin)
        })
    }

    /// Returns the three points the plane was authored from.
    #[inline]
    pub fn points(&self) -> &[Point3<f32>; 3] {
        &self.points
    }

    /// Returns the unit normal vector, or zero for a degenerate plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn dist(&self) -> f32 {
        self.dist
    }

    /// Returns `true` if the authored points were collinear.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vector3::zeros()
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.dist
    }

    /// Classifies which side of the plane a point lies on.
    pub fn classify_point(&self, point: Point3<f32>, epsilon: f32) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Returns `true` if `other` faces the same way and sits at nearly the
    /// same distance, i.e. both would generate the same face.
    pub fn is_near_duplicate(&self, other: &Plane, min_dot: f32, max_distance: f32) -> bool {
        self.normal.dot(&other.normal) > min_dot && (self.dist - other.dist).abs() < max_distance
    }
}

impl FromStr for Plane {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let malformed = || Error::MalformedPlane {
            input: input.to_owned(),
        };

        let mut rest = input.trim();
        let mut points = [Point3::origin(); 3];
        for point in &mut points {
            let (body, tail) = rest
                .strip_prefix('(')
                .and_then(|inner| inner.split_once(')'))
                .ok_or_else(malformed)?;
            let [x, y, z] = parse_floats(body).ok_or_else(malformed)?;
            *point = Point3::new(x, y, z);
            rest = tail.trim_start();
        }

        if !rest.is_empty() {
            return Err(malformed());
        }

        let [a, b, c] = points;
        Ok(Self::from_three_points(a, b, c))
    }
}

/// Parses exactly `N` whitespace separated floats.
pub(crate) fn parse_floats<const N: usize>(input: &str) -> Option<[f32; N]> {
    let mut values = [0.0; N];
    let mut parts = input.split_whitespace();
    for value in &mut values {
        *value = parts.next()?.parse().ok()?;
    }
    parts.next().is_none().then_some(values)
}

/// Returns an orthonormal `(up, right)` pair spanning the plane with the
/// given unit normal, with `right × up = normal`.
///
/// `up` starts from world Z, or world X when Z is the dominant normal axis,
/// so the basis is stable for axial planes.
pub(crate) fn tangent_basis(normal: &Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let abs = normal.abs();
    let reference = if abs.z > abs.x && abs.z > abs.y {
        Vector3::x()
    } else {
        Vector3::z()
    };

    let up = (reference - normal * reference.dot(normal)).normalize();
    let right = up.cross(normal);
    (up, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn three_points_follow_right_hand_rule() {
        let plane = Plane::from_three_points(
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(0.0, 1.0, 2.0),
        );

        assert_eq!(plane.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(plane.dist(), 2.0);
        assert!(!plane.is_degenerate());
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let plane = Plane::from_three_points(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        );

        assert!(plane.is_degenerate());
        assert_eq!(plane.dist(), 0.0);
    }

    #[test]
    fn point_and_normal_round_trips_through_points() {
        let normal = Vector3::new(1.0, 2.0, -0.5).normalize();
        let plane = Plane::from_point_and_normal(Point3::new(3.0, -1.0, 4.0), normal);
        let [a, b, c] = *plane.points();
        let rebuilt = Plane::from_three_points(a, b, c);

        assert_relative_eq!(rebuilt.normal(), plane.normal(), epsilon = 1e-5);
        assert_relative_eq!(rebuilt.dist(), plane.dist(), epsilon = 1e-4);
    }

    #[test]
    fn tangent_basis_is_orthonormal() {
        for normal in [
            Vector3::x(),
            -Vector3::y(),
            Vector3::z(),
            Vector3::new(1.0, 1.0, 1.0).normalize(),
        ] {
            let (up, right) = tangent_basis(&normal);
            assert_relative_eq!(up.norm(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(right.norm(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(up.dot(&normal), 0.0, epsilon = 1e-6);
            assert_relative_eq!(right.cross(&up), normal, epsilon = 1e-6);
        }
    }

    #[test]
    fn classify_uses_epsilon() {
        let plane = Plane::from_point_and_normal(Point3::origin(), Vector3::z());

        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, 0.5), 0.01), PlaneSide::Front);
        assert_eq!(plane.classify_point(Point3::new(0.0, 0.0, -0.5), 0.01), PlaneSide::Back);
        assert_eq!(plane.classify_point(Point3::new(9.0, 9.0, 0.005), 0.01), PlaneSide::OnPlane);
    }

    #[test]
    fn parses_map_plane_string() {
        let plane: Plane = "(0 0 64) (64 0 64) (0 64 64)".parse().unwrap();

        assert_eq!(plane.points()[1], Point3::new(64.0, 0.0, 64.0));
        assert_eq!(plane.normal(), Vector3::z());
        assert_eq!(plane.dist(), 64.0);
    }

    #[test]
    fn rejects_malformed_plane_string() {
        let inputs = [
            "",
            "(0 0 0) (1 0 0)",
            "(0 0 0) (1 0 0) (0 1 x)",
            "(0 0 0) (1 0 0) (0 1 0) junk",
        ];
        for input in inputs {
            assert_eq!(
                input.parse::<Plane>(),
                Err(Error::MalformedPlane {
                    input: input.to_owned()
                })
            );
        }
    }

    #[test]
    fn lenient_parse_falls_back_to_degenerate() {
        let plane = Plane::parse_lenient("(0 0 0) oops");

        assert!(plane.is_degenerate());
        assert_eq!(plane.points(), &[Point3::origin(); 3]);
    }

    #[test]
    fn near_duplicates() {
        let a = Plane::from_point_and_normal(Point3::new(0.0, 0.0, 1.0), Vector3::z());
        let b = Plane::from_point_and_normal(Point3::new(5.0, 5.0, 1.05), Vector3::z());
        let c = Plane::from_point_and_normal(Point3::new(0.0, 0.0, 1.0), -Vector3::z());

        assert!(a.is_near_duplicate(&b, 0.999, 0.1));
        assert!(!a.is_near_duplicate(&c, 0.999, 0.1));
    }
}
