//! Brush solids and their sides.

use nalgebra::{Point2, Point3, Vector3, Vector4};

use crate::{Plane, UvTransform};

pub type SolidId = u32;
pub type SideId = u32;

/// Texture scale applied by the editor's default alignment.
pub const DEFAULT_TEXTURE_SCALE: f32 = 0.25;

/// Lightmap texels per world unit assigned to new sides.
pub const DEFAULT_LIGHTMAP_SCALE: f32 = 16.0;

/// One bounding plane of a solid, with its surface description.
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub id: SideId,
    pub plane: Plane,
    pub material: String,
    pub u_axis: UvTransform,
    pub v_axis: UvTransform,
    /// Texture rotation in degrees, already baked into the axes.
    pub rotation: f32,
    pub lightmap_scale: f32,
    pub smoothing_groups: bool,
}

impl Side {
    /// Creates a side with world-aligned texture axes.
    pub fn new(id: SideId, plane: Plane, material: impl Into<String>) -> Self {
        let (u_axis, v_axis) = paraxial_axes(&plane.normal());
        Self {
            id,
            plane,
            material: material.into(),
            u_axis,
            v_axis,
            rotation: 0.0,
            lightmap_scale: DEFAULT_LIGHTMAP_SCALE,
            smoothing_groups: false,
        }
    }

    /// Replaces both texture axes.
    pub fn with_axes(mut self, u_axis: UvTransform, v_axis: UvTransform) -> Self {
        self.u_axis = u_axis;
        self.v_axis = v_axis;
        self
    }
}

/// Editor-only state attached to a solid.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorInfo {
    pub color: [u8; 3],
    pub visgroup_shown: bool,
    pub visgroup_auto_shown: bool,
    pub logical_pos: Point2<f32>,
}

impl EditorInfo {
    /// A solid is drawn only when neither visgroup state hides it.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visgroup_shown && self.visgroup_auto_shown
    }
}

impl Default for EditorInfo {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            visgroup_shown: true,
            visgroup_auto_shown: true,
            logical_pos: Point2::origin(),
        }
    }
}

/// A convex brush: the intersection of the front half-spaces of its sides.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub id: SolidId,
    pub sides: Vec<Side>,
    pub editor: EditorInfo,
}

impl Solid {
    pub fn new(id: SolidId, sides: Vec<Side>) -> Self {
        Self {
            id,
            sides,
            editor: EditorInfo::default(),
        }
    }

    /// Creates an axis-aligned block spanning `min..max`, every side using
    /// `material`. Side ids are `1..=6`.
    pub fn cuboid(id: SolidId, min: Point3<f32>, max: Point3<f32>, material: &str) -> Self {
        let faces = [
            (max, -Vector3::z()),
            (min, Vector3::z()),
            (min, Vector3::x()),
            (max, -Vector3::x()),
            (max, -Vector3::y()),
            (min, Vector3::y()),
        ];

        let sides = faces
            .into_iter()
            .zip(1..)
            .map(|((point, normal), side_id)| {
                Side::new(side_id, Plane::from_point_and_normal(point, normal), material)
            })
            .collect();

        Self::new(id, sides)
    }

    /// Returns the distinct materials used by the sides, in side order.
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for side in &self.sides {
            if !names.contains(&side.material.as_str()) {
                names.push(&side.material);
            }
        }
        names
    }

    /// Returns `true` if any side uses `material` (compared after
    /// [`normalize_material_name`](crate::normalize_material_name)).
    pub fn uses_material(&self, material: &str) -> bool {
        let wanted = crate::normalize_material_name(material);
        self.sides
            .iter()
            .any(|side| crate::normalize_material_name(&side.material) == wanted)
    }
}

/// World-aligned texture axes for a plane normal: project along the
/// dominant axis, with V pointing down the wall for vertical faces.
pub fn paraxial_axes(normal: &Vector3<f32>) -> (UvTransform, UvTransform) {
    let abs = normal.abs();
    let (u, v) = if abs.z >= abs.x && abs.z >= abs.y {
        (Vector4::new(1.0, 0.0, 0.0, 0.0), Vector4::new(0.0, -1.0, 0.0, 0.0))
    } else if abs.x >= abs.y {
        (Vector4::new(0.0, 1.0, 0.0, 0.0), Vector4::new(0.0, 0.0, -1.0, 0.0))
    } else {
        (Vector4::new(1.0, 0.0, 0.0, 0.0), Vector4::new(0.0, 0.0, -1.0, 0.0))
    };

    (
        UvTransform::new(u, DEFAULT_TEXTURE_SCALE),
        UvTransform::new(v, DEFAULT_TEXTURE_SCALE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_normals_point_inward() {
        let min = Point3::new(-1.0, -2.0, -3.0);
        let max = Point3::new(1.0, 2.0, 3.0);
        let solid = Solid::cuboid(7, min, max, "dev/dev_measuregeneric01");
        let center = Point3::origin();

        assert_eq!(solid.id, 7);
        assert_eq!(solid.sides.len(), 6);
        for side in &solid.sides {
            assert!(!side.plane.is_degenerate());
            assert!(side.plane.signed_distance(center) > 0.0);
        }
        let ids: Vec<SideId> = solid.sides.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn material_names_are_distinct_in_order() {
        let max = Point3::new(1.0, 1.0, 1.0);
        let mut solid = Solid::cuboid(1, Point3::origin(), max, "tools/toolsnodraw");
        solid.sides[2].material = "brick/brickwall001a".into();
        solid.sides[4].material = "brick/brickwall001a".into();

        assert_eq!(solid.material_names(), vec!["tools/toolsnodraw", "brick/brickwall001a"]);
        assert!(solid.uses_material("Materials/BRICK/brickwall001a.vmt"));
        assert!(!solid.uses_material("concrete/concretefloor001a"));
    }

    #[test]
    fn paraxial_picks_dominant_axis() {
        let (u, v) = paraxial_axes(&Vector3::new(0.1, 0.2, -0.9));
        assert_eq!(u.direction(), Vector3::x());
        assert_eq!(v.direction(), -Vector3::y());

        let (u, v) = paraxial_axes(&Vector3::new(-0.8, 0.2, 0.1));
        assert_eq!(u.direction(), Vector3::y());
        assert_eq!(v.direction(), -Vector3::z());

        let (u, _) = paraxial_axes(&Vector3::new(0.1, 0.9, 0.1));
        assert_eq!(u.direction(), Vector3::x());
        assert_eq!(u.scale, DEFAULT_TEXTURE_SCALE);
    }

    #[test]
    fn default_editor_info_is_visible() {
        let mut info = EditorInfo::default();
        assert!(info.is_visible());
        info.visgroup_auto_shown = false;
        assert!(!info.is_visible());
    }
}
