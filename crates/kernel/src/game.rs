use notdoom_input::{Action, Controls, EventSource, InputEvent, InputState, MouseLook};
use notdoom_math::Quaternionf;

use crate::config::EngineConfig;
use crate::physics::{PhysicsParams, physics_system};
use crate::{Clock, FrameContext, KernelError, Schedule, World};

/// The frame loop: time, input, then every system, until asked to exit.
///
/// A fresh game has the physics system scheduled; renderers are added by the host.
pub struct Game<C> {
    world: World,
    schedule: Schedule,
    input: InputState,
    controls: Controls,
    mouse: MouseLook,
    clock: C,
    config: EngineConfig,
    exiting: bool,
}

impl<C: Clock> Game<C> {
    pub fn new(world: World, config: EngineConfig, clock: C) -> Self {
        let mut schedule = Schedule::new();
        schedule.add_system("physics", physics_system(PhysicsParams::from(&config.physics)));
        Self {
            world,
            schedule,
            input: InputState::new(),
            controls: config.input.controls.clone(),
            mouse: MouseLook::new(config.input.mouse_full_rotation),
            clock,
            config,
            exiting: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn mouse(&self) -> &MouseLook {
        &self.mouse
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    /// Apply one raw event to input state, the camera and the exit flag.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<(), KernelError> {
        match event {
            InputEvent::WindowClose => {
                tracing::info!("window closed");
                self.exiting = true;
            }
            InputEvent::MouseMotion { xrel, yrel } => {
                let rotation = self.mouse.apply_motion(xrel, yrel);
                self.world.player_transform_mut()?.rotation = rotation;
            }
            InputEvent::Key { key, pressed } => {
                let state = self.input.update_key_state(key, pressed);
                match self.controls.action_for(key, state) {
                    Some(Action::Exit) => {
                        tracing::info!(%key, "exit requested");
                        self.exiting = true;
                    }
                    Some(Action::ResetCamera) => {
                        self.mouse.reset();
                        self.world.player_transform_mut()?.rotation = Quaternionf::identity();
                        tracing::debug!("camera reset");
                    }
                    None => {}
                }
            }
        }
        Ok(())
    }

    /// Measure `dt`, drain pending events, then run every system once.
    pub fn run_frame<E: EventSource + ?Sized>(&mut self, events: &mut E) -> Result<(), KernelError> {
        let delta_time = self.clock.delta_seconds();
        while let Some(event) = events.poll_event() {
            self.handle_event(event)?;
        }
        let movement = self.input.player_movement_vector(&self.controls);
        let ctx = FrameContext::new(self.world.tick(), delta_time, movement);
        self.schedule.run(&mut self.world, &ctx)?;
        self.world.advance_tick();
        Ok(())
    }

    /// Run frames until exit is requested or `max_frames` have run. Returns the frame count.
    pub fn run<E: EventSource + ?Sized>(
        &mut self,
        events: &mut E,
        max_frames: Option<u64>,
    ) -> Result<u64, KernelError> {
        let _span = tracing::info_span!("game", systems = self.schedule.len()).entered();
        let mut frames = 0;
        while !self.exiting && max_frames.is_none_or(|max| frames < max) {
            self.run_frame(events)?;
            frames += 1;
        }
        tracing::info!(frames, tick = self.world.tick(), "game loop finished");
        Ok(frames)
    }
}

impl<C> std::fmt::Debug for Game<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("tick", &self.world.tick())
            .field("schedule", &self.schedule)
            .field("exiting", &self.exiting)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedClock;
    use notdoom_ecs::{PhysicsComponent, TransformComponent};
    use notdoom_input::{EventQueue, Key};
    use notdoom_math::Vector3f;

    fn game(speed: f32, dt: f32) -> Game<FixedClock> {
        let mut world = World::with_builtin_components().unwrap();
        let player = world.player();
        world
            .insert(TransformComponent::at(player, Vector3f::zero()))
            .unwrap();
        world.insert(PhysicsComponent::new(player)).unwrap();
        let mut config = EngineConfig::default();
        config.physics.movement_speed = speed;
        Game::new(world, config, FixedClock::new(dt))
    }

    #[test]
    fn holding_forward_walks_along_negative_z() {
        let mut game = game(1.0, 0.5);
        let mut events = EventQueue::new();
        events.press(Key::W);
        game.run(&mut events, Some(2)).unwrap();
        let position = game.world().player_transform().unwrap().position;
        assert_eq!(position, Vector3f::new(0.0, 0.0, -0.5));
        assert_eq!(game.world().tick(), 2);
    }

    #[test]
    fn escape_stops_the_loop() {
        let mut game = game(1.0, 0.1);
        let mut events = EventQueue::new();
        events.press(Key::Escape);
        assert_eq!(game.run(&mut events, None).unwrap(), 1);
        assert!(game.is_exiting());
    }

    #[test]
    fn window_close_stops_the_loop() {
        let mut game = game(1.0, 0.1);
        let mut events = EventQueue::new();
        events.push(InputEvent::WindowClose);
        assert_eq!(game.run(&mut events, Some(10)).unwrap(), 1);
    }

    #[test]
    fn mouse_motion_rotates_player_and_reset_restores() {
        let mut game = game(1.0, 0.1);
        let mut events = EventQueue::new();
        events.push(InputEvent::MouseMotion {
            xrel: 100.0,
            yrel: 0.0,
        });
        game.run_frame(&mut events).unwrap();
        assert_ne!(
            game.world().player_transform().unwrap().rotation,
            Quaternionf::identity()
        );

        events.press(Key::R);
        game.run_frame(&mut events).unwrap();
        assert_eq!(
            game.world().player_transform().unwrap().rotation,
            Quaternionf::identity()
        );
        assert_eq!(game.mouse().yaw, 0.0);
    }

    #[test]
    fn released_key_stops_movement() {
        let mut game = game(1.0, 1.0);
        let mut events = EventQueue::new();
        events.press(Key::D);
        game.run_frame(&mut events).unwrap();
        events.release(Key::D);
        game.run_frame(&mut events).unwrap();
        assert_eq!(game.world().player_transform().unwrap().position.x, 1.0);
    }

    #[test]
    fn fresh_game_schedules_physics() {
        let game = game(1.0, 0.1);
        assert!(format!("{game:?}").contains("physics"));
    }
}
