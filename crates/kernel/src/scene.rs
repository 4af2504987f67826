//! Demo worlds.
//!
//! Both scenes place the player (camera) looking down -Z with a physics body and no gravity.

use notdoom_assets::{ResourceManager, TextureLoader};
use notdoom_ecs::{
    MeshComponent, PhysicsComponent, RenderComponent, RenderableKind, TransformComponent,
};
use notdoom_math::{Quaternionf, Transformf, Vector3f};

use crate::{KernelError, World};

/// Side length of the demo sprite quads, in world units.
pub const SPRITE_SIZE: f32 = 128.0;

/// Camera-space depth of the sprite wall.
pub const SPRITE_DEPTH: f32 = -400.0;

const SPRITE_TILES: [(&str, f32, f32); 5] = [
    ("brick", -114.0, 114.0),
    ("brick1", 114.0, 114.0),
    ("brick2", -114.0, -114.0),
    ("wood", 114.0, -114.0),
    ("aqpanl03", 0.0, 0.0),
];

fn world_with_player(position: Vector3f) -> Result<World, KernelError> {
    let mut world = World::with_builtin_components()?;
    let player = world.player();
    world.insert(TransformComponent::at(player, position))?;
    world.insert(PhysicsComponent::new(player))?;
    Ok(world)
}

/// Player at (0, 0, 5) facing a small origin cube, two cubes above and two pyramids below.
pub fn mesh_scene() -> Result<World, KernelError> {
    let mut world = world_with_player(Vector3f::new(0.0, 0.0, 5.0))?;
    let placements = [
        ("cube", Vector3f::zero(), 0.2),
        ("cube", Vector3f::new(2.0, 2.0, 0.0), 1.0),
        ("cube", Vector3f::new(-2.0, 2.0, 0.0), 1.0),
        ("pyramid", Vector3f::new(-1.0, -1.0, 0.0), 1.0),
        ("pyramid", Vector3f::new(1.0, -1.0, 0.0), 1.0),
    ];
    for (mesh, position, scale) in placements {
        let id = world.spawn();
        let transform = Transformf::new(position, Quaternionf::identity(), Vector3f::one() * scale);
        world.insert(TransformComponent::new(id, transform))?;
        world.insert(MeshComponent::new(id, mesh))?;
    }
    tracing::info!(entities = world.entity_count(), "mesh scene built");
    Ok(world)
}

/// Five textured quads in a 2x2 grid plus one in the middle, 400 units in front of the player.
///
/// Textures are loaded through `resources`, so a missing texture fails the scene.
pub fn sprite_scene<L: TextureLoader>(
    resources: &mut ResourceManager<L>,
) -> Result<World, KernelError> {
    let mut world = world_with_player(Vector3f::zero())?;
    for (texture, x, y) in SPRITE_TILES {
        let texture = resources.get_texture(texture)?;
        let id = world.spawn();
        world.insert(TransformComponent::at(id, Vector3f::new(x, y, SPRITE_DEPTH)))?;
        world.insert(RenderComponent {
            entity_id: id,
            kind: RenderableKind::Quad,
            texture,
            width: SPRITE_SIZE,
            height: SPRITE_SIZE,
        })?;
    }
    tracing::info!(
        entities = world.entity_count(),
        textures = resources.cached(),
        "sprite scene built"
    );
    Ok(world)
}

/// Names of the textures the sprite scene loads.
pub fn sprite_textures() -> impl Iterator<Item = &'static str> {
    SPRITE_TILES.iter().map(|(name, _, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notdoom_assets::PathTextureLoader;

    #[test]
    fn mesh_scene_layout() {
        let world = mesh_scene().unwrap();
        assert_eq!(world.entity_count(), 6);
        assert_eq!(
            world.player_transform().unwrap().position,
            Vector3f::new(0.0, 0.0, 5.0)
        );
        let meshes = world.get::<MeshComponent>().unwrap();
        let cubes = meshes.iter().filter(|m| m.mesh_name == "cube").count();
        assert_eq!((cubes, meshes.len()), (3, 5));

        let transforms = world.get::<TransformComponent>().unwrap();
        let origin = meshes.iter().next().unwrap().entity_id;
        assert_eq!(transforms.find(origin).unwrap().scale, Vector3f::one() * 0.2);
        let player_body = world
            .get::<PhysicsComponent>()
            .unwrap()
            .find(world.player())
            .copied()
            .unwrap();
        assert!(!player_body.is_affected_by_gravity);
    }

    #[test]
    fn sprite_scene_loads_each_texture_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("patches")).unwrap();
        for name in sprite_textures() {
            std::fs::write(dir.path().join("patches").join(format!("{name}.png")), b"png").unwrap();
        }
        let mut resources = ResourceManager::new(dir.path(), PathTextureLoader::new());
        let world = sprite_scene(&mut resources).unwrap();

        assert_eq!(world.entity_count(), 6);
        assert_eq!(resources.cached(), 5);
        let renders = world.get::<RenderComponent>().unwrap();
        assert!(renders.iter().all(|r| r.width == SPRITE_SIZE && r.kind == RenderableKind::Quad));
        let transforms = world.get::<TransformComponent>().unwrap();
        assert!(
            renders
                .iter()
                .all(|r| transforms.find(r.entity_id).unwrap().position.z == SPRITE_DEPTH)
        );
    }

    #[test]
    fn sprite_scene_fails_without_textures() {
        let dir = tempfile::tempdir().unwrap();
        let mut resources = ResourceManager::new(dir.path(), PathTextureLoader::new());
        let err = sprite_scene(&mut resources).unwrap_err();
        assert!(matches!(err, KernelError::Asset(_)));
        assert!(err.to_string().contains("brick.png"));
    }
}
