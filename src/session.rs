//! Session flows: start, restart and return to the home screen.
//!
//! A session outlives its worlds. It keeps the configuration, the level
//! layout, the random generator and (between worlds) the collaborator sinks,
//! so a restart rebuilds the level against the same clock and sinks without
//! any task from the old world surviving.

use crate::config::GameConfig;
use crate::level::{Level, LevelLayout};
use crate::world::{Services, World};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub struct Session {
    config: GameConfig,
    layout: LevelLayout,
    rng: StdRng,
    world: Option<World>,
    idle: Option<Services>,
    worlds_built: u32,
}

impl Session {
    /// A session on the home screen. No world exists until [`Session::start`].
    pub fn new(config: GameConfig, layout: LevelLayout, services: Services, rng: StdRng) -> Self {
        Session {
            config,
            layout,
            rng,
            world: None,
            idle: Some(services),
            worlds_built: 0,
        }
    }

    /// Builds a fresh level and starts it. A running world is torn down
    /// first, so calling this twice behaves like [`Session::restart`].
    pub fn start(&mut self) -> &mut World {
        let services = self.take_services();
        let level = Level::build(&self.layout, &self.config, &mut self.rng);
        // Each world gets its own generator, derived from the session's
        let rng = StdRng::seed_from_u64(self.rng.next_u64());
        let mut world = World::new(self.config.clone(), level, services, rng);
        world.start();
        self.worlds_built += 1;
        log::info!("Session started world #{}", self.worlds_built);
        self.world.insert(world)
    }

    /// Cancels every task of the current world and starts a new one.
    pub fn restart(&mut self) -> &mut World {
        log::info!("Restarting");
        self.start()
    }

    /// Cancels everything and drops the world; the sinks are kept for the
    /// next start.
    pub fn go_home(&mut self) {
        if let Some(world) = self.world.take() {
            log::info!("Returning home");
            self.idle = Some(world.into_services());
        }
    }

    /// Advances the running world, if any.
    pub fn update(&mut self) -> usize {
        self.world.as_mut().map_or(0, World::update)
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn is_running(&self) -> bool {
        self.world.is_some()
    }

    pub fn worlds_built(&self) -> u32 {
        self.worlds_built
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn take_services(&mut self) -> Services {
        if let Some(world) = self.world.take() {
            return world.into_services();
        }
        self.idle.take().unwrap_or_else(|| {
            log::warn!("Session had no services; falling back to detached ones");
            Services::detached()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::scheduler::Task;
    use crate::sinks::{AudioEvent, AudioLog, Cue, SignalLog};
    use std::time::Duration;

    fn session() -> (Session, ManualClock, AudioLog) {
        let clock = ManualClock::new();
        let audio = AudioLog::new();
        let services = Services::new(
            Box::new(clock.clone()),
            Box::new(audio.clone()),
            Box::new(SignalLog::new()),
        );
        let session = Session::new(
            GameConfig::default(),
            LevelLayout::level_one(),
            services,
            StdRng::seed_from_u64(21),
        );
        (session, clock, audio)
    }

    #[test]
    fn test_home_has_no_world() {
        let (mut session, _, _) = session();
        assert!(!session.is_running());
        assert_eq!(session.update(), 0);
    }

    #[test]
    fn test_start_runs_the_level() {
        let (mut session, clock, audio) = session();
        session.start();
        clock.advance(Duration::from_millis(500));
        assert!(session.update() > 0);
        assert!(audio.events().contains(&AudioEvent::Loop(Cue::MainMusic)));
    }

    #[test]
    fn test_restart_leaves_one_set_of_tasks() {
        let (mut session, clock, _) = session();
        let first = session.start().pending_tasks();
        clock.advance(Duration::from_millis(700));
        session.update();

        let world = session.restart();
        assert_eq!(world.count_tasks(|t| *t == Task::WorldLogic), 1);
        assert_eq!(world.count_tasks(|t| *t == Task::PlayerMovement), 1);
        assert_eq!(world.pending_tasks(), first);
        assert_eq!(session.worlds_built(), 2);
    }

    #[test]
    fn test_restart_keeps_clock_monotonic() {
        let (mut session, clock, _) = session();
        session.start();
        clock.advance(Duration::from_secs(3));
        session.update();
        session.restart();

        // The new world's first ticks are relative to the current time, not zero
        clock.advance(Duration::from_millis(10));
        assert_eq!(session.update(), 0);
    }

    #[test]
    fn test_go_home_stops_music_and_drops_world() {
        let (mut session, _, audio) = session();
        session.start();
        session.go_home();

        assert!(!session.is_running());
        assert!(audio.events().contains(&AudioEvent::Stop(Cue::MainMusic)));

        // Sinks survive for the next start
        session.start();
        let loops = audio
            .events()
            .iter()
            .filter(|event| **event == AudioEvent::Loop(Cue::MainMusic))
            .count();
        assert_eq!(loops, 2);
    }
}
