//! Brush-to-polygon reconstruction for level editing.
//!
//! A [`Solid`] is stored as the planes that bound it. [`reconstruct_solid`]
//! turns those planes into renderable [`FaceMesh`]es by clipping a huge
//! seed [`Winding`] on each plane against all the others, then projecting
//! texture coordinates with each side's [`UvTransform`]s.
//!
//! [`World`] keeps a set of solids and rebuilds only the ones that were
//! edited, or whose materials finished loading, since the last frame.

mod error;
mod material;
mod mesh;
mod plane;
mod reconstruct;
mod settings;
mod solid;
mod uv;
mod winding;
mod world;

pub use error::{Error, Result};
pub use material::{
    normalize_material_name, MaterialEvent, MaterialInfo, MaterialLookup, NoMaterials,
};
pub use mesh::{FaceMesh, SolidMesh};
pub use plane::{Classification, Plane, PlaneSide};
pub use reconstruct::{reconstruct_solid, solid_windings, usable_sides, MIN_BOUNDING_SIDES};
pub use settings::{
    AxisConvention, ReconstructionSettings, CLIP_EPSILON, DUPLICATE_DISTANCE, DUPLICATE_NORMAL_DOT,
    FALLBACK_MATERIAL_SIZE, MAX_EXTENT,
};
pub use solid::{
    paraxial_axes, EditorInfo, Side, SideId, Solid, SolidId, DEFAULT_LIGHTMAP_SCALE,
    DEFAULT_TEXTURE_SCALE,
};
pub use uv::UvTransform;
pub use winding::Winding;
pub use world::{SolidState, World};
