use notdoom_ecs::{
    Component, ComponentRegistry, ComponentVec, EntityAllocator, EntityId, MeshComponent,
    PhysicsComponent, RenderComponent, TransformComponent,
};

use crate::KernelError;

/// Entities, their components and the id of the player entity.
///
/// The player is the camera: its transform is the viewpoint and its physics
/// component receives movement input.
#[derive(Debug)]
pub struct World {
    entities: EntityAllocator,
    components: ComponentRegistry,
    player: EntityId,
    tick: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Empty world with no component kinds registered. The player id is allocated first.
    pub fn new() -> Self {
        let mut entities = EntityAllocator::new();
        let player = entities.create_entity();
        Self {
            entities,
            components: ComponentRegistry::new(),
            player,
            tick: 0,
        }
    }

    /// World with the transform, physics, mesh and render kinds registered.
    pub fn with_builtin_components() -> Result<Self, KernelError> {
        let mut world = Self::new();
        world.components.register::<TransformComponent>()?;
        world.components.register::<PhysicsComponent>()?;
        world.components.register::<MeshComponent>()?;
        world.components.register::<RenderComponent>()?;
        Ok(world)
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Number of frames the world has been stepped through.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub fn entities(&self) -> &EntityAllocator {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    pub fn spawn(&mut self) -> EntityId {
        self.entities.create_entity()
    }

    /// Free `id` and drop its components of every registered kind.
    ///
    /// Returns how many components were removed.
    pub fn despawn(&mut self, id: EntityId) -> Result<usize, KernelError> {
        self.entities.destroy_entity(id)?;
        let removed = self.components.remove_entity(id);
        tracing::debug!(entity = %id, removed, "entity despawned");
        Ok(removed)
    }

    pub fn insert<T: Component>(&mut self, component: T) -> Result<(), KernelError> {
        self.components.get_mut::<T>()?.insert(component);
        Ok(())
    }

    pub fn get<T: Component>(&self) -> Result<&ComponentVec<T>, KernelError> {
        Ok(self.components.get::<T>()?)
    }

    pub fn get_mut<T: Component>(&mut self) -> Result<&mut ComponentVec<T>, KernelError> {
        Ok(self.components.get_mut::<T>()?)
    }

    /// The player's transform; a world without one is malformed.
    pub fn player_transform(&self) -> Result<&TransformComponent, KernelError> {
        Ok(self.get::<TransformComponent>()?.require(self.player)?)
    }

    pub fn player_transform_mut(&mut self) -> Result<&mut TransformComponent, KernelError> {
        let player = self.player;
        Ok(self.get_mut::<TransformComponent>()?.require_mut(player)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notdoom_math::Vector3f;

    #[test]
    fn player_is_first_entity() {
        let world = World::new();
        assert_eq!(world.player(), EntityId(0));
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.tick(), 0);
    }

    #[test]
    fn builtin_kinds_registered() {
        let world = World::with_builtin_components().unwrap();
        assert_eq!(world.components().kind_count(), 4);
        assert!(world.get::<RenderComponent>().unwrap().is_empty());
    }

    #[test]
    fn despawn_cascades_to_components() {
        let mut world = World::with_builtin_components().unwrap();
        let id = world.spawn();
        world
            .insert(TransformComponent::at(id, Vector3f::zero()))
            .unwrap();
        world.insert(MeshComponent::new(id, "cube")).unwrap();
        world.insert(PhysicsComponent::new(id)).unwrap();

        assert_eq!(world.despawn(id).unwrap(), 3);
        assert!(!world.entities().is_alive(id));
        assert!(world.get::<MeshComponent>().unwrap().find(id).is_none());
        assert!(world.get::<TransformComponent>().unwrap().is_empty());
    }

    #[test]
    fn despawned_id_is_reused() {
        let mut world = World::new();
        let a = world.spawn();
        world.spawn();
        world.despawn(a).unwrap();
        assert_eq!(world.spawn(), a);
    }

    #[test]
    fn despawn_unknown_id_fails() {
        let mut world = World::new();
        assert!(world.despawn(EntityId(42)).is_err());
    }

    #[test]
    fn missing_player_transform_is_reported() {
        let world = World::with_builtin_components().unwrap();
        let err = world.player_transform().unwrap_err();
        assert!(err.to_string().contains("#0"));
    }

    #[test]
    fn insert_requires_registration() {
        let mut world = World::new();
        let player = world.player();
        assert!(world.insert(PhysicsComponent::new(player)).is_err());
    }
}
