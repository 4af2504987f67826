use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::{EcsError, EntityId};

/// A plain data record owned by one entity.
pub trait Component: 'static {
    /// Short kind name used in diagnostics.
    const KIND: &'static str;

    fn entity_id(&self) -> EntityId;
}

/// Dense, insertion-ordered storage for one component kind.
///
/// Lookups are linear scans on the entity id. Removal swaps with the last
/// element, so iteration order is only stable until the first removal.
#[derive(Debug, Clone)]
pub struct ComponentVec<T> {
    components: Vec<T>,
}

impl<T> Default for ComponentVec<T> {
    fn default() -> Self {
        Self {
            components: Vec::new(),
        }
    }
}

impl<T: Component> ComponentVec<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component. Duplicate entity ids are not rejected.
    pub fn insert(&mut self, component: T) {
        self.components.push(component);
    }

    pub fn find(&self, entity: EntityId) -> Option<&T> {
        self.components.iter().find(|c| c.entity_id() == entity)
    }

    pub fn find_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.components.iter_mut().find(|c| c.entity_id() == entity)
    }

    /// Like [`Self::find`] but a missing component is an error naming the entity.
    pub fn require(&self, entity: EntityId) -> Result<&T, EcsError> {
        self.find(entity).ok_or(EcsError::MissingComponent {
            entity,
            kind: T::KIND,
        })
    }

    pub fn require_mut(&mut self, entity: EntityId) -> Result<&mut T, EcsError> {
        self.find_mut(entity).ok_or(EcsError::MissingComponent {
            entity,
            kind: T::KIND,
        })
    }

    /// Swap-remove every component owned by `entity`. Returns how many were removed.
    pub fn remove(&mut self, entity: EntityId) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.components.len() {
            if self.components[i].entity_id() == entity {
                self.components.swap_remove(i);
                removed += 1;
            } else {
                i += 1;
            }
        }
        removed
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.components.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.components.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<'a, T: Component> IntoIterator for &'a ComponentVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Component> IntoIterator for &'a mut ComponentVec<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Type-erased view of a `ComponentVec<T>` held by the registry.
trait ErasedStorage {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn kind(&self) -> &'static str;
    fn remove_entity(&mut self, entity: EntityId) -> usize;
}

impl<T: Component> ErasedStorage for ComponentVec<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn remove_entity(&mut self, entity: EntityId) -> usize {
        self.remove(entity)
    }
}

/// One dense storage per registered component kind, keyed by type.
#[derive(Default)]
pub struct ComponentRegistry {
    storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the storage for `T`. Registering a kind twice is an error.
    pub fn register<T: Component>(&mut self) -> Result<(), EcsError> {
        let type_id = TypeId::of::<T>();
        if self.storages.contains_key(&type_id) {
            return Err(EcsError::AlreadyRegistered(T::KIND));
        }
        self.storages
            .insert(type_id, Box::new(ComponentVec::<T>::new()));
        tracing::debug!(kind = T::KIND, "component kind registered");
        Ok(())
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.storages.contains_key(&TypeId::of::<T>())
    }

    pub fn get<T: Component>(&self) -> Result<&ComponentVec<T>, EcsError> {
        self.storages
            .get(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any().downcast_ref::<ComponentVec<T>>())
            .ok_or(EcsError::NotRegistered(T::KIND))
    }

    pub fn get_mut<T: Component>(&mut self) -> Result<&mut ComponentVec<T>, EcsError> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut::<ComponentVec<T>>())
            .ok_or(EcsError::NotRegistered(T::KIND))
    }

    /// Borrow two different component kinds mutably at the same time.
    pub fn get_pair_mut<A: Component, B: Component>(
        &mut self,
    ) -> Result<(&mut ComponentVec<A>, &mut ComponentVec<B>), EcsError> {
        let (a_id, b_id) = (TypeId::of::<A>(), TypeId::of::<B>());
        if a_id == b_id {
            return Err(EcsError::AliasedStorage(A::KIND));
        }

        let mut first = None;
        let mut second = None;
        for (type_id, storage) in self.storages.iter_mut() {
            if *type_id == a_id {
                first = storage.as_any_mut().downcast_mut::<ComponentVec<A>>();
            } else if *type_id == b_id {
                second = storage.as_any_mut().downcast_mut::<ComponentVec<B>>();
            }
        }

        match (first, second) {
            (Some(a), Some(b)) => Ok((a, b)),
            (None, _) => Err(EcsError::NotRegistered(A::KIND)),
            (_, None) => Err(EcsError::NotRegistered(B::KIND)),
        }
    }

    /// Remove every component owned by `entity` across all registered kinds.
    pub fn remove_entity(&mut self, entity: EntityId) -> usize {
        let mut removed = 0;
        for storage in self.storages.values_mut() {
            let count = storage.remove_entity(entity);
            if count > 0 {
                tracing::debug!(entity = %entity, kind = storage.kind(), count, "components removed");
            }
            removed += count;
        }
        removed
    }

    /// Number of registered kinds.
    pub fn kind_count(&self) -> usize {
        self.storages.len()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&'static str> = self.storages.values().map(|s| s.kind()).collect();
        kinds.sort_unstable();
        f.debug_struct("ComponentRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        entity_id: EntityId,
        value: i32,
    }

    impl Component for Tag {
        const KIND: &'static str = "Tag";
        fn entity_id(&self) -> EntityId {
            self.entity_id
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Marker {
        entity_id: EntityId,
    }

    impl Component for Marker {
        const KIND: &'static str = "Marker";
        fn entity_id(&self) -> EntityId {
            self.entity_id
        }
    }

    fn tag(entity: u32, value: i32) -> Tag {
        Tag {
            entity_id: EntityId(entity),
            value,
        }
    }

    #[test]
    fn insert_then_find() {
        let mut storage = ComponentVec::new();
        storage.insert(tag(3, 30));
        assert_eq!(storage.find(EntityId(3)), Some(&tag(3, 30)));
        assert!(storage.find(EntityId(4)).is_none());
    }

    #[test]
    fn find_mut_edits_in_place() {
        let mut storage = ComponentVec::new();
        storage.insert(tag(1, 10));
        storage.find_mut(EntityId(1)).unwrap().value = 11;
        assert_eq!(storage.find(EntityId(1)).unwrap().value, 11);
    }

    #[test]
    fn require_reports_missing_entity() {
        let storage: ComponentVec<Tag> = ComponentVec::new();
        let err = storage.require(EntityId(9)).unwrap_err();
        assert!(matches!(
            err,
            EcsError::MissingComponent {
                entity: EntityId(9),
                kind: "Tag"
            }
        ));
    }

    #[test]
    fn remove_swaps_with_last() {
        let mut storage = ComponentVec::new();
        storage.insert(tag(0, 0));
        storage.insert(tag(1, 1));
        storage.insert(tag(2, 2));
        assert_eq!(storage.remove(EntityId(0)), 1);
        let order: Vec<u32> = storage.iter().map(|c| c.entity_id.0).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn remove_drops_every_duplicate() {
        let mut storage = ComponentVec::new();
        storage.insert(tag(5, 1));
        storage.insert(tag(5, 2));
        storage.insert(tag(6, 3));
        storage.insert(tag(5, 4));
        assert_eq!(storage.remove(EntityId(5)), 3);
        assert_eq!(storage.len(), 1);
        assert!(storage.find(EntityId(5)).is_none());
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut storage = ComponentVec::new();
        storage.insert(tag(1, 1));
        assert_eq!(storage.remove(EntityId(2)), 0);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn register_twice_fails() {
        let mut registry = ComponentRegistry::new();
        registry.register::<Tag>().unwrap();
        assert!(matches!(
            registry.register::<Tag>(),
            Err(EcsError::AlreadyRegistered("Tag"))
        ));
    }

    #[test]
    fn get_unregistered_fails() {
        let mut registry = ComponentRegistry::new();
        assert!(matches!(
            registry.get::<Tag>(),
            Err(EcsError::NotRegistered("Tag"))
        ));
        assert!(registry.get_mut::<Tag>().is_err());
    }

    #[test]
    fn pair_borrow_of_distinct_kinds() {
        let mut registry = ComponentRegistry::new();
        registry.register::<Tag>().unwrap();
        registry.register::<Marker>().unwrap();
        let (tags, markers) = registry.get_pair_mut::<Tag, Marker>().unwrap();
        tags.insert(tag(0, 1));
        markers.insert(Marker {
            entity_id: EntityId(0),
        });
        assert_eq!(registry.get::<Tag>().unwrap().len(), 1);
        assert_eq!(registry.get::<Marker>().unwrap().len(), 1);
    }

    #[test]
    fn pair_borrow_of_same_kind_fails() {
        let mut registry = ComponentRegistry::new();
        registry.register::<Tag>().unwrap();
        assert!(matches!(
            registry.get_pair_mut::<Tag, Tag>(),
            Err(EcsError::AliasedStorage("Tag"))
        ));
    }

    #[test]
    fn pair_borrow_names_missing_kind() {
        let mut registry = ComponentRegistry::new();
        registry.register::<Tag>().unwrap();
        assert!(matches!(
            registry.get_pair_mut::<Tag, Marker>(),
            Err(EcsError::NotRegistered("Marker"))
        ));
    }

    #[test]
    fn remove_entity_spans_all_kinds() {
        let mut registry = ComponentRegistry::new();
        registry.register::<Tag>().unwrap();
        registry.register::<Marker>().unwrap();
        registry.get_mut::<Tag>().unwrap().insert(tag(2, 0));
        registry.get_mut::<Tag>().unwrap().insert(tag(3, 0));
        registry.get_mut::<Marker>().unwrap().insert(Marker {
            entity_id: EntityId(2),
        });
        assert_eq!(registry.remove_entity(EntityId(2)), 2);
        assert_eq!(registry.get::<Tag>().unwrap().len(), 1);
        assert!(registry.get::<Marker>().unwrap().is_empty());
    }
}
