//! Slot table of live actors with generation-tagged handles.
//!
//! * A handle packs a 16-bit *salt* (generation) and a 16-bit slot index.
//! * Every slot remembers the salt it was last allocated with; resolving
//!   a handle whose salt differs yields `None`, so a handle kept across a
//!   death sweep can never alias the actor that reused its slot.
//! * Freed slots are reused first-fit, the salt counter is global.

use std::fmt;

use super::Actor;

/// Largest salt ever issued.  `0xFFFF` is reserved for the sentinel.
pub const MAX_ACTOR_SALT: u16 = 0xFFFE;

/// Number of addressable slots (indices `0 ..= 0xFFFE`).
pub const MAX_ACTOR_SLOTS: usize = 0xFFFF;

/// Generation-tagged reference to a registry slot.  May go stale.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorHandle(u32);

impl ActorHandle {
    /// "No actor".  Never returned by [`ActorRegistry::allocate`].
    pub const INVALID: ActorHandle = ActorHandle(0xFFFF_FFFF);

    #[inline]
    pub const fn new(salt: u16, index: u16) -> Self {
        Self(((salt as u32) << 16) | index as u32)
    }

    #[inline]
    pub const fn salt(self) -> u16 {
        (self.0 >> 16) as u16
    }

    #[inline]
    pub const fn index(self) -> usize {
        (self.0 & 0xFFFF) as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }

    #[inline]
    pub const fn to_bits(self) -> u32 {
        self.0
    }
}

impl Default for ActorHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "ActorHandle({}#{})", self.index(), self.salt())
        } else {
            f.write_str("ActorHandle(INVALID)")
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Every addressable slot is occupied.
    #[error("actor registry full ({0} slots)")]
    Full(usize),
    /// The handle no longer names a live slot.
    #[error("stale actor handle {0:?}")]
    Stale(ActorHandle),
}

#[derive(Debug)]
struct Slot {
    salt: u16,
    actor: Option<Actor>,
}

#[derive(Debug)]
pub struct ActorRegistry {
    slots: Vec<Slot>,
    next_salt: u16,
    limit: usize,
    live: usize,
}

impl Default for ActorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::with_limit(MAX_ACTOR_SLOTS)
    }

    /// Registry that refuses to grow past `limit` slots (capped at
    /// [`MAX_ACTOR_SLOTS`]).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            next_salt: 0,
            limit: limit.min(MAX_ACTOR_SLOTS),
            live: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Allocate / resolve / free
    // ---------------------------------------------------------------------

    /// Store `actor` in the first free slot (or a new one) and return its
    /// fresh handle.
    pub fn allocate(&mut self, actor: Actor) -> Result<ActorHandle, RegistryError> {
        let index = match self.slots.iter().position(|s| s.actor.is_none()) {
            Some(i) => i,
            None if self.slots.len() < self.limit => {
                self.slots.push(Slot {
                    salt: 0,
                    actor: None,
                });
                self.slots.len() - 1
            }
            None => {
                log::warn!("actor registry full, dropping spawn of {}", actor.def.name);
                return Err(RegistryError::Full(self.limit));
            }
        };

        let salt = self.next_salt;
        self.next_salt = if salt >= MAX_ACTOR_SALT { 0 } else { salt + 1 };

        log::debug!("allocate {} in slot {index} (salt {salt})", actor.def.name);
        let slot = &mut self.slots[index];
        slot.salt = salt;
        slot.actor = Some(actor);
        self.live += 1;

        Ok(ActorHandle::new(salt, index as u16))
    }

    /// `None` for the sentinel, an empty slot or a generation mismatch.
    pub fn resolve(&self, handle: ActorHandle) -> Option<&Actor> {
        if !handle.is_valid() {
            return None;
        }
        let slot = self.slots.get(handle.index())?;
        if slot.salt != handle.salt() {
            return None;
        }
        slot.actor.as_ref()
    }

    pub fn resolve_mut(&mut self, handle: ActorHandle) -> Option<&mut Actor> {
        if !handle.is_valid() {
            return None;
        }
        let slot = self.slots.get_mut(handle.index())?;
        if slot.salt != handle.salt() {
            return None;
        }
        slot.actor.as_mut()
    }

    #[inline]
    pub fn contains(&self, handle: ActorHandle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Empty the slot `handle` refers to.  Stale handles are ignored.
    pub fn free(&mut self, handle: ActorHandle) -> Option<Actor> {
        if !self.contains(handle) {
            log::warn!("free of stale {handle:?} ignored");
            return None;
        }
        let actor = self.slots[handle.index()].actor.take();
        self.live -= 1;
        actor
    }

    /// Free every actor flagged dead; returns how many were removed.
    pub fn sweep_dead(&mut self) -> usize {
        let mut freed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.actor.as_ref().is_some_and(|a| a.body.is_dead()) {
                if let Some(actor) = slot.actor.take() {
                    log::debug!("swept {} from slot {index}", actor.def.name);
                }
                freed += 1;
            }
        }
        self.live -= freed;
        freed
    }

    // ---------------------------------------------------------------------
    // Iteration helpers
    // ---------------------------------------------------------------------

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots ever created (occupied or not).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Current handle of the actor in slot `index`, if any.
    pub fn handle_at(&self, index: usize) -> Option<ActorHandle> {
        let slot = self.slots.get(index)?;
        slot.actor.as_ref()?;
        Some(ActorHandle::new(slot.salt, index as u16))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorHandle, &Actor)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.actor
                .as_ref()
                .map(|a| (ActorHandle::new(slot.salt, i as u16), a))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ActorHandle, &mut Actor)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let salt = slot.salt;
            slot.actor
                .as_mut()
                .map(|a| (ActorHandle::new(salt, i as u16), a))
        })
    }

    /// Disjoint mutable borrows of two occupied slots.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut Actor, &mut Actor)> {
        if a == b || a.max(b) >= self.slots.len() {
            return None;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let (head, tail) = self.slots.split_at_mut(hi);
        let lo_actor = head[lo].actor.as_mut()?;
        let hi_actor = tail[0].actor.as_mut()?;
        if a < b {
            Some((lo_actor, hi_actor))
        } else {
            Some((hi_actor, lo_actor))
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
