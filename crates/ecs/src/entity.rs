use serde::{Deserialize, Serialize};
use std::fmt;

use crate::EcsError;

/// Opaque identifier of one logical game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues and recycles entity ids.
///
/// Backed by a dense allocated/free flag per index. The lowest free index is
/// always reused before the table grows.
#[derive(Debug, Clone, Default)]
pub struct EntityAllocator {
    allocated: Vec<bool>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the lowest free id and mark it allocated, growing the table by one if none is free.
    pub fn create_entity(&mut self) -> EntityId {
        let index = match self.allocated.iter().position(|allocated| !allocated) {
            Some(free) => {
                self.allocated[free] = true;
                free
            }
            None => {
                self.allocated.push(true);
                self.allocated.len() - 1
            }
        };
        let id = EntityId(index as u32);
        tracing::debug!(entity = %id, "entity created");
        id
    }

    /// Mark `id` free. Components owned by the entity are left in place.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<(), EcsError> {
        let capacity = self.allocated.len();
        let slot = self
            .allocated
            .get_mut(id.index())
            .ok_or(EcsError::EntityOutOfRange {
                entity: id,
                capacity,
            })?;
        *slot = false;
        tracing::debug!(entity = %id, "entity destroyed");
        Ok(())
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.allocated.get(id.index()).copied().unwrap_or(false)
    }

    pub fn alive_count(&self) -> usize {
        self.allocated.iter().filter(|allocated| **allocated).count()
    }

    /// Size of the id table, allocated or not.
    pub fn capacity(&self) -> usize {
        self.allocated.len()
    }

    /// Allocated ids in ascending order.
    pub fn alive(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.allocated
            .iter()
            .enumerate()
            .filter(|(_, allocated)| **allocated)
            .map(|(index, _)| EntityId(index as u32))
    }
}
