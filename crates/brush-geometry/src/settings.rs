//! Tunable constants for face reconstruction.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Points within this distance of a clipping plane count as on it.
pub const CLIP_EPSILON: f32 = 0.01;

/// Half extent of the seed winding: `sqrt(3) * 2 * 16384`, the longest
/// diagonal a map can possibly have.
pub const MAX_EXTENT: f32 = 56755.84;

/// Two sides are duplicates when their normals' dot product exceeds this...
pub const DUPLICATE_NORMAL_DOT: f32 = 0.999;

/// ...and their distances differ by less than this.
pub const DUPLICATE_DISTANCE: f32 = 0.1;

/// Texture size assumed for materials that have not finished loading.
pub const FALLBACK_MATERIAL_SIZE: (u32, u32) = (128, 128);

/// Coordinate convention of the emitted mesh positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisConvention {
    /// Map space as authored: Z points up.
    #[default]
    ZUp,
    /// Y points up; Y and Z are swapped.
    YUp,
}

impl AxisConvention {
    /// Maps a point from map space into this convention.
    #[inline]
    pub fn remap(self, point: Point3<f32>) -> Point3<f32> {
        match self {
            AxisConvention::ZUp => point,
            AxisConvention::YUp => Point3::new(point.x, point.z, point.y),
        }
    }

    /// Returns `true` if [`remap`](Self::remap) is a reflection, which
    /// flips the handedness of every winding.
    #[inline]
    pub fn mirrors(self) -> bool {
        matches!(self, AxisConvention::YUp)
    }
}

/// Settings consumed by [`reconstruct_solid`](crate::reconstruct_solid)
/// and the [`World`](crate::World).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```ignore
/// let settings: ReconstructionSettings =
///     serde_json::from_str(r#"{ "axis_convention": "YUp" }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionSettings {
    pub clip_epsilon: f32,
    pub max_extent: f32,
    pub duplicate_normal_dot: f32,
    pub duplicate_distance: f32,
    pub fallback_material_size: (u32, u32),
    pub axis_convention: AxisConvention,
    /// Adds the fourth UV axis component (texture shift, in texels).
    pub apply_uv_shift: bool,
}

impl Default for ReconstructionSettings {
    fn default() -> Self {
        Self {
            clip_epsilon: CLIP_EPSILON,
            max_extent: MAX_EXTENT,
            duplicate_normal_dot: DUPLICATE_NORMAL_DOT,
            duplicate_distance: DUPLICATE_DISTANCE,
            fallback_material_size: FALLBACK_MATERIAL_SIZE,
            axis_convention: AxisConvention::default(),
            apply_uv_shift: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: ReconstructionSettings =
            serde_json::from_str(r#"{ "axis_convention": "YUp", "clip_epsilon": 0.5 }"#).unwrap();

        assert_eq!(settings.axis_convention, AxisConvention::YUp);
        assert_eq!(settings.clip_epsilon, 0.5);
        assert_eq!(settings.max_extent, MAX_EXTENT);
        assert_eq!(settings.fallback_material_size, (128, 128));
        assert!(!settings.apply_uv_shift);
    }

    #[test]
    fn yup_swaps_and_mirrors() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(AxisConvention::ZUp.remap(p), p);
        assert_eq!(AxisConvention::YUp.remap(p), Point3::new(1.0, 3.0, 2.0));
        assert!(AxisConvention::YUp.mirrors());
        assert!(!AxisConvention::ZUp.mirrors());
    }
}
