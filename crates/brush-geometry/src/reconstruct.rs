//! Turns a solid's bounding planes into its polygon faces.
//!
//! For every usable side, a huge quad is seeded on the side's plane and
//! clipped against every other usable side. Whatever survives is that
//! side's face; a side whose quad is clipped away entirely is redundant.

use log::{debug, trace};

use crate::{
    FaceMesh, MaterialLookup, ReconstructionSettings, Side, Solid, SolidMesh, Winding,
};

/// Fewest planes that can bound a finite volume.
pub const MIN_BOUNDING_SIDES: usize = 4;

/// Decides which sides take part in reconstruction.
///
/// A side is unusable if its plane is degenerate, or if it nearly
/// duplicates an earlier side (the earlier one wins).
pub fn usable_sides(sides: &[Side], settings: &ReconstructionSettings) -> Vec<bool> {
    let mut usable = vec![true; sides.len()];

    for (i, side) in sides.iter().enumerate() {
        if side.plane.is_degenerate() {
            debug!("side `{}` has a degenerate plane, skipping", side.id);
            usable[i] = false;
            continue;
        }

        let duplicate = sides[..i].iter().find(|earlier| {
            !earlier.plane.is_degenerate()
                && earlier.plane.is_near_duplicate(
                    &side.plane,
                    settings.duplicate_normal_dot,
                    settings.duplicate_distance,
                )
        });

        if let Some(earlier) = duplicate {
            debug!("side `{}` duplicates side `{}`, skipping", side.id, earlier.id);
            usable[i] = false;
        }
    }

    usable
}

/// Clips the seed winding of `sides[index]` against every other usable side.
///
/// The result is empty when the side does not touch the solid's surface.
fn face_winding(
    sides: &[Side],
    usable: &[bool],
    index: usize,
    settings: &ReconstructionSettings,
) -> Winding {
    let mut winding = Winding::from_plane(&sides[index].plane, settings.max_extent);

    for (j, other) in sides.iter().enumerate() {
        if j == index || !usable[j] {
            continue;
        }
        winding.clip(&other.plane, settings.clip_epsilon);
        if winding.is_empty() {
            break;
        }
    }

    winding
}

/// Computes the face polygon of every side that contributes to the solid,
/// paired with the index of that side.
pub fn solid_windings(solid: &Solid, settings: &ReconstructionSettings) -> Vec<(usize, Winding)> {
    let usable = usable_sides(&solid.sides, settings);

    let usable_count = usable.iter().filter(|&&u| u).count();
    if usable_count < MIN_BOUNDING_SIDES {
        debug!(
            "solid `{}` has {} usable sides, need at least {}",
            solid.id, usable_count, MIN_BOUNDING_SIDES
        );
        return Vec::new();
    }

    (0..solid.sides.len())
        .filter(|&i| usable[i])
        .filter_map(|i| {
            let winding = face_winding(&solid.sides, &usable, i, settings);
            if winding.is_empty() {
                trace!("side `{}` of solid `{}` is clipped away", solid.sides[i].id, solid.id);
                None
            } else {
                Some((i, winding))
            }
        })
        .collect()
}

/// Reconstructs the renderable faces of a solid.
///
/// Texture sizes come from `materials`; materials that are not ready use
/// [`ReconstructionSettings::fallback_material_size`]. The result depends
/// only on the inputs, so rebuilding an unchanged solid reproduces it.
pub fn reconstruct_solid<M: MaterialLookup + ?Sized>(
    solid: &Solid,
    materials: &M,
    settings: &ReconstructionSettings,
) -> SolidMesh {
    let faces = solid_windings(solid, settings)
        .into_iter()
        .filter_map(|(i, winding)| {
            let side = &solid.sides[i];
            let texture_size = materials
                .resolve(&side.material)
                .size_or(settings.fallback_material_size);
            FaceMesh::from_winding(solid.id, side, winding, texture_size, settings)
        })
        .collect();

    SolidMesh {
        solid_id: solid.id,
        faces,
    }
}
