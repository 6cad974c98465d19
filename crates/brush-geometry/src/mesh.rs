//! Renderable face geometry handed to the render collaborator.

use nalgebra::{Point2, Point3, Vector3};

use crate::{ReconstructionSettings, Side, SideId, SolidId, Winding};

/// Triangulated geometry of one brush face.
///
/// `positions` and `uvs` are parallel arrays; `indices` is a triangle list
/// into them. Every vertex shares the flat face `normal`.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMesh {
    pub solid_id: SolidId,
    pub side_id: SideId,
    pub material: String,
    pub positions: Vec<Point3<f32>>,
    pub normal: Vector3<f32>,
    pub uvs: Vec<Point2<f32>>,
    pub indices: Vec<u32>,
}

impl FaceMesh {
    /// Builds the face mesh for `side` from its clipped winding.
    ///
    /// UVs are projected from map-space positions; positions are then
    /// remapped into the configured axis convention. A mirroring
    /// convention reverses the vertex order so the fan stays
    /// counter-clockwise around the outward normal.
    ///
    /// Returns `None` for windings with fewer than three points.
    pub fn from_winding(
        solid_id: SolidId,
        side: &Side,
        winding: Winding,
        texture_size: (f32, f32),
        settings: &ReconstructionSettings,
    ) -> Option<Self> {
        if winding.len() < 3 {
            return None;
        }

        let (width, height) = texture_size;
        let shift = settings.apply_uv_shift;
        let convention = settings.axis_convention;

        let mut uvs: Vec<Point2<f32>> = winding
            .points()
            .iter()
            .map(|p| {
                Point2::new(
                    side.u_axis.project(*p, width, shift),
                    side.v_axis.project(*p, height, shift),
                )
            })
            .collect();
        let mut positions: Vec<Point3<f32>> = winding
            .into_points()
            .into_iter()
            .map(|p| convention.remap(p))
            .collect();

        if convention.mirrors() {
            positions.reverse();
            uvs.reverse();
        }

        let normal = (positions[1] - positions[0])
            .cross(&(positions[2] - positions[0]))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        Some(Self {
            solid_id,
            side_id: side.id,
            material: side.material.clone(),
            indices: fan_indices(positions.len()),
            positions,
            normal,
            uvs,
        })
    }

    /// Number of triangles in the index list.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Boundary edges in winding order, for wireframe drawing.
    pub fn edges(&self) -> impl Iterator<Item = (Point3<f32>, Point3<f32>)> + '_ {
        let n = self.positions.len();
        (0..n).map(move |i| (self.positions[i], self.positions[(i + 1) % n]))
    }
}

/// Fan triangulation: vertex 0 connects to all edges. Valid for convex polygons.
fn fan_indices(vertex_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(vertex_count.saturating_sub(2) * 3);
    for j in 1..vertex_count.saturating_sub(1) {
        indices.extend_from_slice(&[0, j as u32, (j + 1) as u32]);
    }
    indices
}

/// All faces reconstructed for one solid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolidMesh {
    pub solid_id: SolidId,
    pub faces: Vec<FaceMesh>,
}

impl SolidMesh {
    /// Returns `true` if the solid produced no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Looks up the face generated by a side.
    pub fn face(&self, side_id: SideId) -> Option<&FaceMesh> {
        self.faces.iter().find(|face| face.side_id == side_id)
    }

    pub fn vertex_count(&self) -> usize {
        self.faces.iter().map(|face| face.positions.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(FaceMesh::triangle_count).sum()
    }

    /// Axis-aligned bounds `(min, max)` of every face vertex.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut points = self.faces.iter().flat_map(|face| face.positions.iter());
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.inf(p), max.sup(p))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AxisConvention, Plane};
    use approx::assert_relative_eq;

    fn floor_side() -> Side {
        // Floor at z = 0 of a solid above it; the face looks down.
        Side::new(3, Plane::from_point_and_normal(Point3::origin(), Vector3::z()), "dev/floor")
    }

    fn floor_winding() -> Winding {
        Winding::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 64.0, 0.0),
            Point3::new(128.0, 64.0, 0.0),
            Point3::new(128.0, 0.0, 0.0),
        ])
    }

    fn floor_face(settings: &ReconstructionSettings) -> FaceMesh {
        FaceMesh::from_winding(1, &floor_side(), floor_winding(), (128.0, 128.0), settings).unwrap()
    }

    #[test]
    fn fan_has_n_minus_two_triangles() {
        assert_eq!(fan_indices(3), vec![0, 1, 2]);
        assert_eq!(fan_indices(5), vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
        assert!(fan_indices(2).is_empty());
    }

    #[test]
    fn builds_flat_normal_and_uvs() {
        let settings = ReconstructionSettings::default();
        let face =
            FaceMesh::from_winding(9, &floor_side(), floor_winding(), (128.0, 128.0), &settings)
                .unwrap();

        assert_eq!(face.solid_id, 9);
        assert_eq!(face.side_id, 3);
        assert_eq!(face.material, "dev/floor");
        assert_eq!(face.triangle_count(), 2);
        assert_relative_eq!(face.normal, -Vector3::z());
        // Default floor axes: u = x / 0.25, v = -y / 0.25.
        assert_relative_eq!(face.uvs[2], Point2::new(4.0, -2.0));
    }

    #[test]
    fn too_small_winding_is_not_a_face() {
        let settings = ReconstructionSettings::default();
        let face =
            FaceMesh::from_winding(1, &floor_side(), Winding::default(), (128.0, 128.0), &settings);
        assert!(face.is_none());
    }

    #[test]
    fn yup_keeps_normal_outward() {
        let settings = ReconstructionSettings {
            axis_convention: AxisConvention::YUp,
            ..Default::default()
        };
        let face = floor_face(&settings);

        // Map-space down (-Z) is Y-up-space down (-Y).
        assert_relative_eq!(face.normal, -Vector3::y());
        // UVs still follow their vertices.
        let corner = face
            .positions
            .iter()
            .position(|p| *p == Point3::new(128.0, 0.0, 64.0))
            .unwrap();
        assert_relative_eq!(face.uvs[corner], Point2::new(4.0, -2.0));
    }

    #[test]
    fn edges_close_the_loop() {
        let settings = ReconstructionSettings::default();
        let face = floor_face(&settings);
        let edges: Vec<_> = face.edges().collect();

        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (Point3::new(128.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn bounds_cover_all_faces() {
        let settings = ReconstructionSettings::default();
        let face = floor_face(&settings);
        let mesh = SolidMesh {
            solid_id: 1,
            faces: vec![face],
        };

        assert_eq!(mesh.bounds(), Some((Point3::origin(), Point3::new(128.0, 64.0, 0.0))));
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.face(3).is_some());
        assert!(SolidMesh::default().bounds().is_none());
    }
}
