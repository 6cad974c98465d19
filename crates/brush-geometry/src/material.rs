//! The material collaborator: texture sizes for UV scaling and the
//! notifications sent when a material finishes loading.

use std::collections::HashMap;

/// What the material system currently knows about a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialInfo {
    pub width: u32,
    pub height: u32,
    /// `false` while the texture is still loading; the size is then
    /// meaningless and a fallback is used.
    pub ready: bool,
}

impl MaterialInfo {
    /// A loaded material of the given size.
    pub fn loaded(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ready: true,
        }
    }

    /// Placeholder for a material that is not available yet.
    pub fn pending() -> Self {
        Self {
            width: 0,
            height: 0,
            ready: false,
        }
    }

    /// Returns the texture size to project UVs with, or `fallback` if
    /// the material is not usable yet.
    pub fn size_or(&self, fallback: (u32, u32)) -> (f32, f32) {
        let (width, height) = if self.ready && self.width > 0 && self.height > 0 {
            (self.width, self.height)
        } else {
            fallback
        };
        (width as f32, height as f32)
    }
}

/// Read-only lookup of material sizes, consulted during reconstruction.
///
/// Implementations must not block; an unknown or still-loading material
/// resolves to [`MaterialInfo::pending`].
pub trait MaterialLookup {
    fn resolve(&self, name: &str) -> MaterialInfo;
}

/// Lookup that knows no materials; every face uses the fallback size.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMaterials;

impl MaterialLookup for NoMaterials {
    fn resolve(&self, _name: &str) -> MaterialInfo {
        MaterialInfo::pending()
    }
}

/// Keys are expected to be normalized with [`normalize_material_name`].
impl MaterialLookup for HashMap<String, MaterialInfo> {
    fn resolve(&self, name: &str) -> MaterialInfo {
        self.get(&normalize_material_name(name))
            .copied()
            .unwrap_or_else(MaterialInfo::pending)
    }
}

impl<T: MaterialLookup + ?Sized> MaterialLookup for &T {
    fn resolve(&self, name: &str) -> MaterialInfo {
        (**self).resolve(name)
    }
}

/// Notification from the material system about an asynchronous load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialEvent {
    Loaded(String),
    Failed { name: String, reason: String },
}

impl MaterialEvent {
    /// The material this event is about.
    pub fn name(&self) -> &str {
        match self {
            MaterialEvent::Loaded(name) | MaterialEvent::Failed { name, .. } => name,
        }
    }
}

/// Canonical form of a material name: lowercase, forward slashes, no
/// `materials/` prefix and no `.vmt` extension.
pub fn normalize_material_name(name: &str) -> String {
    let name = name.trim().replace('\\', "/").to_lowercase();
    let name = name.strip_prefix("materials/").unwrap_or(&name);
    let name = name.strip_suffix(".vmt").unwrap_or(name);
    name.to_owned()
}
