use crate::animation::{AnimationController, Sequence, SequenceStep};
use crate::collision::Collidable;
use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, EntityKind};
use crate::movable::Movable;
use crate::scheduler::{Task, TaskId, TaskQueue};
use crate::sinks::Cue;
use crate::sprite::Frames;
use crate::tick::TickContext;
use std::time::Duration;

pub const IMAGES_ROTATION: Frames = &[
    "img/6_salsa_bottle/bottle_rotation/1_bottle_rotation.png",
    "img/6_salsa_bottle/bottle_rotation/2_bottle_rotation.png",
    "img/6_salsa_bottle/bottle_rotation/3_bottle_rotation.png",
    "img/6_salsa_bottle/bottle_rotation/4_bottle_rotation.png",
];

pub const IMAGES_SPLASH: Frames = &[
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/1_bottle_splash.png",
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/2_bottle_splash.png",
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/3_bottle_splash.png",
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/4_bottle_splash.png",
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/5_bottle_splash.png",
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/6_bottle_splash.png",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileState {
    Flying,
    Splashing,
    Disposed,
}

/// Where a splash happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    /// Landed; snaps to the ground line
    Ground,
    /// Hit an enemy or the boss; splashes where it is
    InPlace,
}

/// Called once when the splash has finished.
pub type SplashCallback = Box<dyn FnOnce()>;

/// A thrown bottle.
///
/// Flies on the shared gravity tick with a constant rightward drift and
/// splashes exactly once, on landing or on impact.
pub struct Projectile {
    pub body: Movable,
    animation: AnimationController<ProjectileState>,
    splash: Option<Sequence>,
    on_splash: Option<SplashCallback>,
    gravity_task: Option<TaskId>,
    drift_task: Option<TaskId>,
    spin_task: Option<TaskId>,
    splash_task: Option<TaskId>,
}

impl Projectile {
    pub fn launch(id: EntityId, (x, y): (f32, f32), config: &GameConfig) -> Self {
        let entity = Entity::new(
            id,
            EntityKind::Projectile,
            (x, y),
            (config.projectile.width, config.projectile.height),
            &[IMAGES_ROTATION, IMAGES_SPLASH],
        );
        let mut body = Movable::new(entity, config.projectile.drift);
        body.velocity_y = config.projectile.launch_velocity;
        Projectile {
            body,
            animation: AnimationController::new(ProjectileState::Flying),
            splash: None,
            on_splash: None,
            gravity_task: None,
            drift_task: None,
            spin_task: None,
            splash_task: None,
        }
    }

    /// Starts the gravity, drift and spin tasks.
    pub fn spawn(&mut self, tasks: &mut TaskQueue, config: &GameConfig) {
        let id = self.id();
        let projectile = &config.projectile;
        self.gravity_task = Some(tasks.every(config.physics.tick_period(), Task::Gravity(id)));
        self.drift_task = Some(tasks.every(
            Duration::from_millis(projectile.drift_interval_ms),
            Task::ProjectileDrift(id),
        ));
        self.spin_task = Some(tasks.every(
            Duration::from_millis(projectile.spin_interval_ms),
            Task::ProjectileSpin(id),
        ));
    }

    pub fn set_on_splash(&mut self, callback: SplashCallback) {
        self.on_splash = Some(callback);
    }

    pub fn id(&self) -> EntityId {
        self.body.entity.id
    }

    pub fn state(&self) -> ProjectileState {
        self.animation.current_state()
    }

    pub fn is_in_flight(&self) -> bool {
        self.state() == ProjectileState::Flying
    }

    pub fn is_disposed(&self) -> bool {
        self.state() == ProjectileState::Disposed
    }

    pub fn on_physics_tick(&mut self, ctx: &TickContext) {
        self.body.apply_gravity(&ctx.config.physics);
    }

    pub fn on_drift(&mut self) {
        self.body.move_right();
    }

    pub fn on_spin(&mut self, ctx: &mut TickContext) {
        let ground = ctx.config.projectile.ground_y;
        if self.body.entity.y < ground {
            let frame = self.animation.next_frame(IMAGES_ROTATION, self.body.entity.cache());
            self.body.entity.show_frame(frame);
            ctx.play(Cue::Throw);
        }
        if self.body.entity.y >= ground {
            self.splash(ctx, Impact::Ground);
        }
    }

    /// Starts the splash. Returns false if the bottle already splashed.
    pub fn splash(&mut self, ctx: &mut TickContext, impact: Impact) -> bool {
        if self.splash.is_some() {
            return false;
        }
        self.animation.set_state(ProjectileState::Splashing);
        ctx.tasks.cancel_opt(&mut self.gravity_task);
        ctx.tasks.cancel_opt(&mut self.drift_task);
        ctx.tasks.cancel_opt(&mut self.spin_task);
        if impact == Impact::Ground {
            self.body.entity.y = ctx.config.projectile.ground_y;
        }
        ctx.play(Cue::Splash);

        self.splash = Some(Sequence::new(IMAGES_SPLASH));
        let period = Duration::from_millis(ctx.config.projectile.splash_frame_ms);
        self.splash_task = Some(ctx.tasks.every(period, Task::ProjectileSplashFrame(self.id())));
        true
    }

    pub fn on_splash_frame(&mut self, ctx: &mut TickContext) {
        let Some(sequence) = self.splash.as_mut() else {
            return;
        };
        match sequence.step() {
            SequenceStep::Frame(key) => self.body.entity.show(key),
            SequenceStep::Finished => self.dispose(ctx),
        }
    }

    fn dispose(&mut self, ctx: &mut TickContext) {
        ctx.tasks.cancel_opt(&mut self.splash_task);
        if self.animation.set_state(ProjectileState::Disposed) {
            let parked = ctx.config.projectile.disposed_position;
            self.body.entity.x = parked;
            self.body.entity.y = parked;
            if let Some(callback) = self.on_splash.take() {
                callback();
            }
        }
    }

    /// Cancels every task this projectile still owns.
    pub fn cancel_tasks(&mut self, tasks: &mut TaskQueue) {
        tasks.cancel_opt(&mut self.gravity_task);
        tasks.cancel_opt(&mut self.drift_task);
        tasks.cancel_opt(&mut self.spin_task);
        tasks.cancel_opt(&mut self.splash_task);
    }
}

impl Collidable for Projectile {
    fn entity(&self) -> &Entity {
        &self.body.entity
    }
}
