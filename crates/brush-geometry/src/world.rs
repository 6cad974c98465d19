//! The set of solids being edited and their cached face meshes.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, warn};

use crate::{
    reconstruct_solid, Error, MaterialEvent, MaterialLookup, ReconstructionSettings, Result,
    Solid, SolidId, SolidMesh,
};

/// Rebuild state of one solid.
///
/// `Clean -> Dirty` on any edit or relevant material notification,
/// `Dirty -> Rebuilding -> Clean` during [`World::rebuild_if_dirty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidState {
    Clean,
    Dirty,
    Rebuilding,
}

#[derive(Debug)]
struct SolidEntry {
    solid: Solid,
    state: SolidState,
    mesh: SolidMesh,
}

impl SolidEntry {
    fn new(solid: Solid) -> Self {
        let mesh = SolidMesh {
            solid_id: solid.id,
            faces: Vec::new(),
        };
        Self {
            solid,
            state: SolidState::Dirty,
            mesh,
        }
    }

    fn rebuild<M: MaterialLookup + ?Sized>(
        &mut self,
        materials: &M,
        settings: &ReconstructionSettings,
    ) {
        self.state = SolidState::Rebuilding;
        self.mesh = reconstruct_solid(&self.solid, materials, settings);
        self.state = SolidState::Clean;
    }
}

/// Owns the solids of a level and keeps their face meshes up to date.
///
/// Meshes are rebuilt lazily: edits only mark a solid dirty, and
/// [`rebuild_if_dirty`](Self::rebuild_if_dirty), typically called once per
/// frame before drawing, reconstructs every dirty solid.
///
/// # Material notifications
///
/// The material system reports finished loads through the sender returned
/// by [`material_events`](Self::material_events). Events are queued until
/// [`pump_material_events`](Self::pump_material_events) marks the solids
/// using that material dirty, so their UVs get recomputed with the real
/// texture size.
#[derive(Debug)]
pub struct World {
    solids: BTreeMap<SolidId, SolidEntry>,
    settings: ReconstructionSettings,
    events_tx: Sender<MaterialEvent>,
    events_rx: Receiver<MaterialEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(ReconstructionSettings::default())
    }
}

impl World {
    /// Creates an empty world.
    pub fn new(settings: ReconstructionSettings) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            solids: BTreeMap::new(),
            settings,
            events_tx,
            events_rx,
        }
    }

    /// Creates a world holding `solids`, all dirty.
    ///
    /// Fails if two solids share an id.
    pub fn with_solids(
        solids: impl IntoIterator<Item = Solid>,
        settings: ReconstructionSettings,
    ) -> Result<Self> {
        let mut world = Self::new(settings);
        for solid in solids {
            world.insert_solid(solid)?;
        }
        Ok(world)
    }

    #[inline]
    pub fn settings(&self) -> &ReconstructionSettings {
        &self.settings
    }

    /// Replaces the settings and marks every solid dirty.
    pub fn set_settings(&mut self, settings: ReconstructionSettings) {
        self.settings = settings;
        self.mark_all_dirty();
    }

    /// Adds a solid. It starts dirty.
    pub fn insert_solid(&mut self, solid: Solid) -> Result<()> {
        let id = solid.id;
        if self.solids.contains_key(&id) {
            return Err(Error::DuplicateSolid(id));
        }
        self.solids.insert(id, SolidEntry::new(solid));
        Ok(())
    }

    /// Removes a solid and its mesh.
    pub fn remove_solid(&mut self, id: SolidId) -> Result<Solid> {
        self.solids
            .remove(&id)
            .map(|entry| entry.solid)
            .ok_or(Error::UnknownSolid(id))
    }

    pub fn solid(&self, id: SolidId) -> Option<&Solid> {
        self.solids.get(&id).map(|entry| &entry.solid)
    }

    /// Iterates over all solids in id order.
    pub fn solids(&self) -> impl Iterator<Item = &Solid> {
        self.solids.values().map(|entry| &entry.solid)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    /// Edits a solid in place and marks it dirty.
    ///
    /// The solid's id is restored after the edit; move a solid to a new id
    /// with [`remove_solid`](Self::remove_solid) and
    /// [`insert_solid`](Self::insert_solid).
    pub fn edit_solid<R>(&mut self, id: SolidId, edit: impl FnOnce(&mut Solid) -> R) -> Result<R> {
        let entry = self.solids.get_mut(&id).ok_or(Error::UnknownSolid(id))?;
        let result = edit(&mut entry.solid);
        entry.solid.id = id;
        entry.state = SolidState::Dirty;
        Ok(result)
    }

    /// Marks a solid as needing a rebuild.
    pub fn mark_dirty(&mut self, id: SolidId) -> Result<()> {
        let entry = self.solids.get_mut(&id).ok_or(Error::UnknownSolid(id))?;
        entry.state = SolidState::Dirty;
        Ok(())
    }

    pub fn mark_all_dirty(&mut self) {
        for entry in self.solids.values_mut() {
            entry.state = SolidState::Dirty;
        }
    }

    pub fn state(&self, id: SolidId) -> Option<SolidState> {
        self.solids.get(&id).map(|entry| entry.state)
    }

    /// Returns `true` if any solid needs a rebuild.
    pub fn is_dirty(&self) -> bool {
        self.solids
            .values()
            .any(|entry| entry.state == SolidState::Dirty)
    }

    /// Returns the last mesh built for a solid.
    ///
    /// The mesh is stale while the solid is dirty.
    pub fn mesh(&self, id: SolidId) -> Option<&SolidMesh> {
        self.solids.get(&id).map(|entry| &entry.mesh)
    }

    /// Iterates over the last built meshes in solid id order.
    pub fn meshes(&self) -> impl Iterator<Item = &SolidMesh> {
        self.solids.values().map(|entry| &entry.mesh)
    }

    /// Returns a sender the material system uses to report finished loads.
    pub fn material_events(&self) -> Sender<MaterialEvent> {
        self.events_tx.clone()
    }

    /// Drains queued material notifications, marking every solid that uses
    /// a newly loaded material dirty.
    ///
    /// Failed loads are logged; their faces keep the fallback size.
    /// Returns the number of solids that became dirty.
    pub fn pump_material_events(&mut self) -> usize {
        let mut invalidated = 0;

        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                MaterialEvent::Loaded(name) => {
                    for entry in self.solids.values_mut() {
                        if entry.state != SolidState::Dirty && entry.solid.uses_material(&name) {
                            entry.state = SolidState::Dirty;
                            invalidated += 1;
                        }
                    }
                    debug!("material `{name}` loaded");
                }
                MaterialEvent::Failed { name, reason } => {
                    warn!("material `{name}` failed to load: {reason}");
                }
            }
        }

        invalidated
    }

    /// Rebuilds the mesh of every dirty solid.
    ///
    /// Returns the number of solids rebuilt; zero means every mesh was
    /// already current.
    #[cfg(not(feature = "parallel"))]
    pub fn rebuild_if_dirty<M: MaterialLookup + ?Sized>(&mut self, materials: &M) -> usize {
        let settings = &self.settings;
        let mut rebuilt = 0;
        for entry in self.solids.values_mut() {
            if entry.state == SolidState::Dirty {
                entry.rebuild(materials, settings);
                rebuilt += 1;
            }
        }

        if rebuilt > 0 {
            debug!("rebuilt {rebuilt} solids");
        }
        rebuilt
    }

    /// Rebuilds the mesh of every dirty solid on the rayon thread pool.
    ///
    /// Returns the number of solids rebuilt; zero means every mesh was
    /// already current.
    #[cfg(feature = "parallel")]
    pub fn rebuild_if_dirty<M: MaterialLookup + Sync + ?Sized>(&mut self, materials: &M) -> usize {
        use rayon::prelude::*;

        let settings = &self.settings;
        let mut dirty: Vec<&mut SolidEntry> = self
            .solids
            .values_mut()
            .filter(|entry| entry.state == SolidState::Dirty)
            .collect();

        dirty
            .par_iter_mut()
            .for_each(|entry| entry.rebuild(materials, settings));

        let rebuilt = dirty.len();
        if rebuilt > 0 {
            debug!("rebuilt {rebuilt} solids");
        }
        rebuilt
    }
}
