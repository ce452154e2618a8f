use crate::animation::{AnimationController, Sequence, SequenceStep};
use crate::collision::Collidable;
use crate::config::{GameConfig, period_from_hz};
use crate::entity::{Entity, EntityId, EntityKind};
use crate::movable::Movable;
use crate::scheduler::{Task, TaskId, TaskQueue};
use crate::sinks::{Cue, InputState};
use crate::sprite::Frames;
use crate::tick::TickContext;
use std::time::Duration;

pub const IMAGES_IDLE: Frames = &[
    "img/2_character_pepe/1_idle/idle/I-1.png",
    "img/2_character_pepe/1_idle/idle/I-2.png",
    "img/2_character_pepe/1_idle/idle/I-3.png",
    "img/2_character_pepe/1_idle/idle/I-4.png",
    "img/2_character_pepe/1_idle/idle/I-5.png",
    "img/2_character_pepe/1_idle/idle/I-6.png",
    "img/2_character_pepe/1_idle/idle/I-7.png",
    "img/2_character_pepe/1_idle/idle/I-8.png",
    "img/2_character_pepe/1_idle/idle/I-9.png",
    "img/2_character_pepe/1_idle/idle/I-10.png",
];

pub const IMAGES_LONG_IDLE: Frames = &[
    "img/2_character_pepe/1_idle/long_idle/I-11.png",
    "img/2_character_pepe/1_idle/long_idle/I-12.png",
    "img/2_character_pepe/1_idle/long_idle/I-13.png",
    "img/2_character_pepe/1_idle/long_idle/I-14.png",
    "img/2_character_pepe/1_idle/long_idle/I-15.png",
    "img/2_character_pepe/1_idle/long_idle/I-16.png",
    "img/2_character_pepe/1_idle/long_idle/I-17.png",
    "img/2_character_pepe/1_idle/long_idle/I-18.png",
    "img/2_character_pepe/1_idle/long_idle/I-19.png",
    "img/2_character_pepe/1_idle/long_idle/I-20.png",
];

pub const IMAGES_WALKING: Frames = &[
    "img/2_character_pepe/2_walk/W-21.png",
    "img/2_character_pepe/2_walk/W-22.png",
    "img/2_character_pepe/2_walk/W-23.png",
    "img/2_character_pepe/2_walk/W-24.png",
    "img/2_character_pepe/2_walk/W-25.png",
    "img/2_character_pepe/2_walk/W-26.png",
];

pub const IMAGES_JUMPING: Frames = &[
    "img/2_character_pepe/3_jump/J-31.png",
    "img/2_character_pepe/3_jump/J-32.png",
    "img/2_character_pepe/3_jump/J-33.png",
    "img/2_character_pepe/3_jump/J-34.png",
    "img/2_character_pepe/3_jump/J-35.png",
    "img/2_character_pepe/3_jump/J-36.png",
    "img/2_character_pepe/3_jump/J-37.png",
    "img/2_character_pepe/3_jump/J-38.png",
    "img/2_character_pepe/3_jump/J-39.png",
];

pub const IMAGES_HURT: Frames = &[
    "img/2_character_pepe/4_hurt/H-41.png",
    "img/2_character_pepe/4_hurt/H-42.png",
    "img/2_character_pepe/4_hurt/H-43.png",
];

pub const IMAGES_DEAD: Frames = &[
    "img/2_character_pepe/5_dead/D-51.png",
    "img/2_character_pepe/5_dead/D-52.png",
    "img/2_character_pepe/5_dead/D-53.png",
    "img/2_character_pepe/5_dead/D-54.png",
    "img/2_character_pepe/5_dead/D-55.png",
    "img/2_character_pepe/5_dead/D-56.png",
    "img/2_character_pepe/5_dead/D-57.png",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    LongIdle,
    Walking,
    Jumping,
    Hurt,
    Dead,
}

pub struct Player {
    pub body: Movable,
    animation: AnimationController<PlayerState>,
    last_action: Duration,
    /// Sampled at the start of every physics tick
    was_falling: bool,
    death: Option<Sequence>,
    death_task: Option<TaskId>,
}

impl Player {
    pub fn new(id: EntityId, config: &GameConfig, now: Duration) -> Self {
        let entity = Entity::new(
            id,
            EntityKind::Player,
            (config.player.start_x, config.physics.ground_y),
            (config.player.width, config.player.height),
            &[
                IMAGES_IDLE,
                IMAGES_LONG_IDLE,
                IMAGES_WALKING,
                IMAGES_JUMPING,
                IMAGES_HURT,
                IMAGES_DEAD,
            ],
        );
        Player {
            body: Movable::new(entity, config.player.speed),
            animation: AnimationController::new(PlayerState::Idle),
            last_action: now,
            was_falling: false,
            death: None,
            death_task: None,
        }
    }

    /// Starts the physics, movement and animation tasks.
    pub fn spawn(&self, tasks: &mut TaskQueue, config: &GameConfig) {
        tasks.every(config.physics.tick_period(), Task::Gravity(self.id()));
        tasks.every(period_from_hz(config.player.movement_hz), Task::PlayerMovement);
        tasks.every(
            Duration::from_millis(config.player.animation_interval_ms),
            Task::PlayerAnimation,
        );
    }

    pub fn id(&self) -> EntityId {
        self.body.entity.id
    }

    pub fn x(&self) -> f32 {
        self.body.entity.x
    }

    pub fn state(&self) -> PlayerState {
        self.animation.current_state()
    }

    pub fn is_dead(&self) -> bool {
        self.body.is_dead()
    }

    pub fn facing_left(&self) -> bool {
        self.body.entity.mirrored
    }

    pub fn death_started(&self) -> bool {
        self.death.is_some()
    }

    pub fn on_physics_tick(&mut self, ctx: &TickContext) {
        self.was_falling = self.body.velocity_y < 0.0;
        self.body.apply_gravity(&ctx.config.physics);
    }

    /// Horizontal movement and jumping. Returns the new camera offset.
    pub fn on_movement_tick(&mut self, ctx: &mut TickContext, input: &InputState) -> f32 {
        if !self.is_dead() {
            self.handle_right(ctx, input);
            self.handle_left(ctx, input);
            self.handle_jump(ctx, input);
        }
        -self.x() + ctx.config.player.camera_lead
    }

    fn handle_right(&mut self, ctx: &mut TickContext, input: &InputState) {
        if input.right && self.x() < ctx.config.world.level_end_x {
            self.body.move_right();
            self.body.entity.mirrored = false;
            self.walked(ctx);
        }
    }

    fn handle_left(&mut self, ctx: &mut TickContext, input: &InputState) {
        if input.left && self.x() > ctx.config.player.left_limit {
            self.body.move_left();
            self.body.entity.mirrored = true;
            self.walked(ctx);
        }
    }

    fn walked(&mut self, ctx: &mut TickContext) {
        self.last_action = ctx.now;
        if !self.body.is_above_ground(&ctx.config.physics) {
            ctx.play(Cue::Walking);
        }
    }

    fn handle_jump(&mut self, ctx: &mut TickContext, input: &InputState) {
        if input.jump && !self.body.is_above_ground(&ctx.config.physics) {
            self.body.jump(ctx.config.physics.jump_velocity);
            self.last_action = ctx.now;
            ctx.play(Cue::Jump);
        }
    }

    /// Priority: Dead > Hurt > Jumping > Walking > LongIdle > Idle.
    fn next_state(&self, ctx: &TickContext, input: &InputState) -> PlayerState {
        let config = ctx.config;
        let idle_for = ctx.now.saturating_sub(self.last_action);
        if self.is_dead() {
            PlayerState::Dead
        } else if self.body.is_hurt(ctx.now, config.physics.hurt_window()) {
            PlayerState::Hurt
        } else if self.body.is_above_ground(&config.physics) {
            PlayerState::Jumping
        } else if input.left || input.right {
            PlayerState::Walking
        } else if idle_for >= Duration::from_secs(config.player.long_idle_secs) {
            PlayerState::LongIdle
        } else {
            PlayerState::Idle
        }
    }

    pub fn on_animation_tick(&mut self, ctx: &mut TickContext, input: &InputState) {
        let state = self.next_state(ctx, input);
        let entered = self.animation.set_state(state);
        let frames = match state {
            PlayerState::Dead => {
                if entered {
                    ctx.stop(Cue::BossMusic);
                    ctx.play(Cue::Lose);
                }
                // The death sequence owns the sprite once it has started
                if self.death.is_some() {
                    return;
                }
                IMAGES_DEAD
            }
            PlayerState::Hurt => {
                ctx.play(Cue::Hurt);
                IMAGES_HURT
            }
            PlayerState::Jumping => IMAGES_JUMPING,
            PlayerState::Walking => IMAGES_WALKING,
            PlayerState::LongIdle => {
                ctx.play(Cue::Snore);
                IMAGES_LONG_IDLE
            }
            PlayerState::Idle => IMAGES_IDLE,
        };
        let frame = self.animation.next_frame(frames, self.body.entity.cache());
        self.body.entity.show_frame(frame);
    }

    /// Stomp test against an enemy's drawn box.
    ///
    /// Needs horizontal overlap, the player's feet at or above the bottom of
    /// the enemy, and the player falling now or on the previous physics tick.
    pub fn is_above(&self, enemy: &Entity) -> bool {
        let me = &self.body.entity;
        let horizontal_overlap = me.x + me.width() > enemy.x && me.x < enemy.x + enemy.width();
        let above = me.y + me.height() <= enemy.y + enemy.height();
        let falling = self.body.velocity_y > 0.0 || self.was_falling;
        horizontal_overlap && above && falling
    }

    /// Upward kick after a stomp kill.
    pub fn bounce(&mut self, velocity: f32) {
        self.body.velocity_y = velocity;
    }

    /// Starts the one-shot death sequence. Returns false if it already ran.
    pub fn play_death_animation(&mut self, ctx: &mut TickContext) -> bool {
        if self.death.is_some() {
            return false;
        }
        log::info!("Player died at x = {:.1}", self.x());
        self.death = Some(Sequence::new(IMAGES_DEAD));
        let period = Duration::from_millis(ctx.config.player.death_frame_ms);
        self.death_task = Some(ctx.tasks.every(period, Task::PlayerDeathFrame));
        true
    }

    /// Shows the next death frame; after the last one, queues game over.
    pub fn on_death_frame(&mut self, ctx: &mut TickContext) {
        let Some(sequence) = self.death.as_mut() else {
            return;
        };
        match sequence.step() {
            SequenceStep::Frame(key) => self.body.entity.show(key),
            SequenceStep::Finished => {
                if self.death_task.is_some() {
                    ctx.tasks.cancel_opt(&mut self.death_task);
                    let delay = Duration::from_millis(ctx.config.player.game_over_delay_ms);
                    ctx.tasks.after(delay, Task::GameOver);
                }
            }
        }
    }
}

impl Collidable for Player {
    fn entity(&self) -> &Entity {
        &self.body.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Energy;
    use crate::entity::EntityIds;
    use crate::tick::Harness;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn make_player(harness: &Harness) -> Player {
        let mut ids = EntityIds::new();
        Player::new(ids.next(), &harness.config, Duration::ZERO)
    }

    fn enemy_at(x: f32, y: f32) -> Entity {
        let mut ids = EntityIds::new();
        Entity::new(ids.next(), EntityKind::NormalEnemy, (x, y), (70.0, 70.0), &[])
    }

    const RIGHT: InputState = InputState {
        left: false,
        right: true,
        jump: false,
        up: false,
    };

    #[test]
    fn test_spawn_registers_three_tasks() {
        let mut harness = Harness::new();
        let player = make_player(&harness);
        player.spawn(&mut harness.tasks, &harness.config);
        assert_eq!(harness.tasks.len(), 3);
    }

    #[test]
    fn test_walk_right_moves_and_updates_camera() {
        let mut harness = Harness::new();
        let mut player = make_player(&harness);
        let camera = player.on_movement_tick(&mut harness.ctx(ms(16)), &RIGHT);

        assert_eq!(player.x(), 123.0);
        assert_eq!(camera, -23.0);
        assert!(!player.facing_left());
        assert_eq!(harness.audio.plays(Cue::Walking), 1);
    }

    #[test]
    fn test_left_limit_blocks_movement() {
        let mut harness = Harness::new();
        let mut player = make_player(&harness);
        player.body.entity.x = -510.0;
        let input = InputState { left: true, ..InputState::default() };
        player.on_movement_tick(&mut harness.ctx(ms(16)), &input);
        assert_eq!(player.x(), -510.0);
    }

    #[test]
    fn test_right_stops_at_level_end() {
        let mut harness = Harness::new();
        let mut player = make_player(&harness);
        player.body.entity.x = 2250.0;
        player.on_movement_tick(&mut harness.ctx(ms(16)), &RIGHT);
        assert_eq!(player.x(), 2250.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut harness = Harness::new();
        let mut player = make_player(&harness);
        let input = InputState { jump: true, ..InputState::default() };

        player.on_movement_tick(&mut harness.ctx(ms(16)), &input);
        assert_eq!(player.body.velocity_y, 25.0);

        player.on_physics_tick(&harness.ctx(ms(40)));
        player.body.velocity_y = 5.0;
        player.on_movement_tick(&mut harness.ctx(ms(50)), &input);
        assert_eq!(player.body.velocity_y, 5.0);
        assert_eq!(harness.audio.plays(Cue::Jump), 1);
    }

    #[test]
    fn test_dead_player_ignores_input() {
        let mut harness = Harness::new();
        let mut player = make_player(&harness);
        player.body = player.body.clone().with_energy(Energy::EMPTY);
        player.on_movement_tick(&mut harness.ctx(ms(16)), &RIGHT);
        assert_eq!(player.x(), 120.0);
    }

    #[test]
    fn test_animation_priority() {
        let mut harness = Harness::new();
        let mut player = make_player(&harness);

        player.on_animation_tick(&mut harness.ctx(ms(100)), &InputState::default());
        assert_eq!(player.state(), PlayerState::Idle);

        player.on_animation_tick(&mut harness.ctx(ms(200)), &RIGHT);
        assert_eq!(player.state(), PlayerState::Walking);

        player.body.entity.y = 100.0;
        player.on_animation_tick(&mut harness.ctx(ms(300)), &RIGHT);
        assert_eq!(player.state(), PlayerState::Jumping);

        player.body.hit(ms(350), 5);
        player.on_animation_tick(&mut harness.ctx(ms(400)), &RIGHT);
        assert_eq!(player.state(), PlayerState::Hurt);
        assert_eq!(harness.audio.plays(Cue::Hurt), 1);
    }

    #[test]
    fn test_long_idle_after_ten_seconds() {
        let mut harness = Harness::new();
        let mut player = make_player(&harness);

        player.on_animation_tick(&mut harness.ctx(ms(9_900)), &InputState::default());
        assert_eq!(player.state(), PlayerState::Idle);
        player.on_animation_tick(&mut harness.ctx(ms(10_000)), &InputState::default());
        assert_eq!(player.state(), PlayerState::LongIdle);
        assert_eq!(harness.audio.plays(Cue::Snore), 1);
        assert!(IMAGES_LONG_IDLE.contains(&player.body.entity.sprite().unwrap()));
    }

    #[test]
    fn test_is_above_requires_falling() {
        let harness = Harness::new();
        let mut player = make_player(&harness);
        // Feet at 380, enemy spans 360..430
        player.body.entity.y = 80.0;
        let enemy = enemy_at(150.0, 360.0);

        player.body.velocity_y = 2.0;
        assert!(player.is_above(&enemy));

        player.body.velocity_y = 0.0;
        assert!(!player.is_above(&enemy));
    }

    #[test]
    fn test_is_above_uses_was_falling() {
        let mut harness = Harness::new();
        let mut player = make_player(&harness);
        player.body.entity.y = 80.0;
        player.body.velocity_y = -5.0;
        player.on_physics_tick(&harness.ctx(ms(40)));
        // Velocity reset, as on a bounce
        player.body.entity.y = 80.0;
        player.body.velocity_y = 0.0;

        assert!(player.is_above(&enemy_at(150.0, 360.0)));
    }

    #[test]
    fn test_is_above_false_without_overlap_or_when_below() {
        let harness = Harness::new();
        let mut player = make_player(&harness);
        player.body.velocity_y = 3.0;
        player.body.entity.y = 80.0;
        assert!(!player.is_above(&enemy_at(400.0, 360.0)));

        // Feet at 432.5, below the enemy's bottom edge (430)
        player.body.entity.y = 132.5;
        assert!(!player.is_above(&enemy_at(150.0, 360.0)));
    }

    #[test]
    fn test_death_sequence_runs_once_then_game_over() {
        let mut harness = Harness::new();
        let mut player = make_player(&harness);

        assert!(player.play_death_animation(&mut harness.ctx(ms(0))));
        assert!(!player.play_death_animation(&mut harness.ctx(ms(10))));
        assert_eq!(harness.tasks.count(|t| *t == Task::PlayerDeathFrame), 1);

        let mut shown = Vec::new();
        while let Some((task, at)) = harness.next_due(ms(2_000)) {
            match task {
                Task::PlayerDeathFrame => {
                    player.on_death_frame(&mut harness.ctx(at));
                    shown.push(player.body.entity.sprite().unwrap());
                }
                Task::GameOver => {
                    // 7 frames at 100ms, finish at 800ms, game over 500ms later
                    assert_eq!(at, ms(1_300));
                    break;
                }
                other => panic!("unexpected task {:?}", other),
            }
        }
        assert_eq!(&shown[..7], IMAGES_DEAD);
        assert!(harness.tasks.is_empty());
    }
}
