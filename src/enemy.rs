use crate::animation::AnimationController;
use crate::collision::Collidable;
use crate::config::{GameConfig, RoamerConfig, period_from_hz};
use crate::entity::{Entity, EntityId, EntityKind};
use crate::movable::Movable;
use crate::scheduler::{Task, TaskId, TaskQueue};
use crate::sinks::Cue;
use crate::sprite::Frames;
use crate::tick::TickContext;
use rand::Rng;
use std::time::Duration;

pub const NORMAL_WALKING: Frames = &[
    "img/3_enemies_chicken/chicken_normal/1_walk/1_w.png",
    "img/3_enemies_chicken/chicken_normal/1_walk/2_w.png",
    "img/3_enemies_chicken/chicken_normal/1_walk/3_w.png",
];
pub const NORMAL_DEAD: Frames = &["img/3_enemies_chicken/chicken_normal/2_dead/dead.png"];

pub const SMALL_WALKING: Frames = &[
    "img/3_enemies_chicken/chicken_small/1_walk/1_w.png",
    "img/3_enemies_chicken/chicken_small/1_walk/2_w.png",
    "img/3_enemies_chicken/chicken_small/1_walk/3_w.png",
];
pub const SMALL_DEAD: Frames = &["img/3_enemies_chicken/chicken_small/2_dead/dead.png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyVariant {
    Normal,
    Small,
}

impl EnemyVariant {
    fn kind(self) -> EntityKind {
        match self {
            EnemyVariant::Normal => EntityKind::NormalEnemy,
            EnemyVariant::Small => EntityKind::SmallEnemy,
        }
    }

    fn walking(self) -> Frames {
        match self {
            EnemyVariant::Normal => NORMAL_WALKING,
            EnemyVariant::Small => SMALL_WALKING,
        }
    }

    fn dead(self) -> Frames {
        match self {
            EnemyVariant::Normal => NORMAL_DEAD,
            EnemyVariant::Small => SMALL_DEAD,
        }
    }

    fn roamer(self, config: &GameConfig) -> &RoamerConfig {
        match self {
            EnemyVariant::Normal => &config.enemies.normal,
            EnemyVariant::Small => &config.enemies.small,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    /// Spawned, polling for the game to start
    Waiting,
    Walking,
    Dead,
}

/// A roaming chicken. Walks left at a fixed random speed until killed.
pub struct Enemy {
    pub body: Movable,
    variant: EnemyVariant,
    animation: AnimationController<EnemyState>,
    await_task: Option<TaskId>,
    walk_task: Option<TaskId>,
    animation_task: Option<TaskId>,
    collect_task: Option<TaskId>,
}

impl Enemy {
    /// Spawn x and speed are drawn once and kept for the enemy's lifetime.
    pub fn new(id: EntityId, variant: EnemyVariant, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let roamer = variant.roamer(config);
        let x = rng.gen_range(config.enemies.spawn_x_min..config.enemies.spawn_x_max);
        let speed = rng.gen_range(roamer.speed_min..roamer.speed_max);
        Self::at(id, variant, config, x, speed)
    }

    pub fn at(id: EntityId, variant: EnemyVariant, config: &GameConfig, x: f32, speed: f32) -> Self {
        let roamer = variant.roamer(config);
        let entity = Entity::new(
            id,
            variant.kind(),
            (x, roamer.y),
            (roamer.width, roamer.height),
            &[variant.walking(), variant.dead()],
        );
        Enemy {
            body: Movable::new(entity, speed),
            variant,
            animation: AnimationController::new(EnemyState::Waiting),
            await_task: None,
            walk_task: None,
            animation_task: None,
            collect_task: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.body.entity.id
    }

    pub fn variant(&self) -> EnemyVariant {
        self.variant
    }

    pub fn state(&self) -> EnemyState {
        self.animation.current_state()
    }

    pub fn is_dead(&self) -> bool {
        self.state() == EnemyState::Dead
    }

    pub fn is_collected(&self) -> bool {
        self.body.collected
    }

    /// Starts polling for the game to begin.
    pub fn spawn(&mut self, tasks: &mut TaskQueue, config: &GameConfig) {
        let poll = Duration::from_millis(config.enemies.start_poll_ms);
        self.await_task = Some(tasks.every(poll, Task::EnemyAwaitStart(self.id())));
    }

    pub fn on_await_start(&mut self, ctx: &mut TickContext, game_started: bool) {
        if !game_started {
            return;
        }
        ctx.tasks.cancel_opt(&mut self.await_task);
        if self.is_dead() {
            return;
        }
        self.animation.set_state(EnemyState::Walking);
        let movement = period_from_hz(ctx.config.enemies.movement_hz);
        let frames = Duration::from_millis(ctx.config.enemies.walk_frame_ms);
        self.walk_task = Some(ctx.tasks.every(movement, Task::EnemyWalk(self.id())));
        self.animation_task = Some(ctx.tasks.every(frames, Task::EnemyAnimation(self.id())));
    }

    pub fn on_walk(&mut self, ctx: &mut TickContext) {
        if self.is_dead() {
            ctx.tasks.cancel_opt(&mut self.walk_task);
            return;
        }
        self.body.move_left();
    }

    pub fn on_animation(&mut self, ctx: &mut TickContext) {
        if self.is_dead() {
            ctx.tasks.cancel_opt(&mut self.animation_task);
            return;
        }
        let frame = self.animation.next_frame(self.variant.walking(), self.body.entity.cache());
        self.body.entity.show_frame(frame);
    }

    /// Kills the enemy. Returns false if it was already dead.
    ///
    /// Movement and animation stop on their next tick; the enemy is marked
    /// collected after a short delay so the dead sprite stays visible.
    pub fn die(&mut self, ctx: &mut TickContext) -> bool {
        if self.is_dead() {
            return false;
        }
        self.animation.set_state(EnemyState::Dead);
        self.body.entity.show(self.variant.dead()[0]);
        ctx.play(Cue::Squeeze);
        let delay = Duration::from_millis(ctx.config.enemies.collect_delay_ms);
        self.collect_task = Some(ctx.tasks.after(delay, Task::EnemyCollect(self.id())));
        log::debug!("{:?} enemy {:?} died", self.variant, self.id());
        true
    }

    pub fn on_collect(&mut self, ctx: &mut TickContext) {
        self.collect_task = None;
        self.body.collected = true;
        self.cancel_tasks(ctx.tasks);
    }

    /// Cancels every task this enemy still owns.
    pub fn cancel_tasks(&mut self, tasks: &mut TaskQueue) {
        tasks.cancel_opt(&mut self.await_task);
        tasks.cancel_opt(&mut self.walk_task);
        tasks.cancel_opt(&mut self.animation_task);
        tasks.cancel_opt(&mut self.collect_task);
    }
}

impl Collidable for Enemy {
    fn entity(&self) -> &Entity {
        &self.body.entity
    }
}
