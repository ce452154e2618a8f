//! The end boss
//!
//! The boss idles in its alert cycle until the player crosses the activation
//! line, then walks left with its own music. Projectile hits cost it energy
//! and interrupt it with a hurt animation; at zero energy it plays its death
//! sequence, which ends the session with a victory.
//!
//! # State machine
//!
//! ```text
//!            activate()                 hit              1s
//!   Alert ---------------> Walking -----------> Hurt ---------> Walking
//!     ^                      |                   |
//!     +---- player dead -----+                   |
//!                                energy 0        v
//!                    (any) -------------------> Dead
//! ```
//!
//! The walk task checks every tick whether it should stop
//! ([`Boss::walk_exit`]) and cancels itself, instead of being cancelled from
//! outside.

use crate::animation::{AnimationController, Sequence, SequenceStep};
use crate::collision::Collidable;
use crate::combat::HitOutcome;
use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, EntityKind};
use crate::movable::Movable;
use crate::scheduler::{Task, TaskId, TaskQueue};
use crate::sinks::{Cue, StatusBar, UiSignal};
use crate::sprite::Frames;
use crate::tick::TickContext;
use std::time::Duration;

pub const IMAGES_WALK: Frames = &[
    "img/4_enemie_boss_chicken/1_walk/G1.png",
    "img/4_enemie_boss_chicken/1_walk/G2.png",
    "img/4_enemie_boss_chicken/1_walk/G3.png",
    "img/4_enemie_boss_chicken/1_walk/G4.png",
];

pub const IMAGES_ALERT: Frames = &[
    "img/4_enemie_boss_chicken/2_alert/G5.png",
    "img/4_enemie_boss_chicken/2_alert/G6.png",
    "img/4_enemie_boss_chicken/2_alert/G7.png",
    "img/4_enemie_boss_chicken/2_alert/G8.png",
    "img/4_enemie_boss_chicken/2_alert/G9.png",
    "img/4_enemie_boss_chicken/2_alert/G10.png",
    "img/4_enemie_boss_chicken/2_alert/G11.png",
    "img/4_enemie_boss_chicken/2_alert/G12.png",
];

pub const IMAGES_HURT: Frames = &[
    "img/4_enemie_boss_chicken/4_hurt/G21.png",
    "img/4_enemie_boss_chicken/4_hurt/G22.png",
    "img/4_enemie_boss_chicken/4_hurt/G23.png",
];

pub const IMAGES_DEAD: Frames = &[
    "img/4_enemie_boss_chicken/5_dead/G24.png",
    "img/4_enemie_boss_chicken/5_dead/G25.png",
    "img/4_enemie_boss_chicken/5_dead/G26.png",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossState {
    Alert,
    Walking,
    Hurt,
    Dead,
}

/// Why a walking boss stops walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkExit {
    PlayerDead,
    Hurt,
    Defeated,
}

pub struct Boss {
    pub body: Movable,
    animation: AnimationController<BossState>,
    activated: bool,
    defeated: bool,
    hurt: bool,
    walking: bool,
    walk_ticks: u64,
    hurt_step: usize,
    death: Option<Sequence>,
    alert_task: Option<TaskId>,
    walk_task: Option<TaskId>,
    hurt_frame_task: Option<TaskId>,
    hurt_end_task: Option<TaskId>,
    death_task: Option<TaskId>,
}

impl Boss {
    pub fn new(id: EntityId, config: &GameConfig) -> Self {
        let boss = &config.boss;
        let entity = Entity::new(
            id,
            EntityKind::Boss,
            (boss.x, boss.y),
            (boss.width, boss.height),
            &[IMAGES_ALERT, IMAGES_WALK, IMAGES_HURT, IMAGES_DEAD],
        );
        Boss {
            body: Movable::new(entity, boss.speed),
            animation: AnimationController::new(BossState::Alert),
            activated: false,
            defeated: false,
            hurt: false,
            walking: false,
            walk_ticks: 0,
            hurt_step: 0,
            death: None,
            alert_task: None,
            walk_task: None,
            hurt_frame_task: None,
            hurt_end_task: None,
            death_task: None,
        }
    }

    /// Starts the alert cycle.
    pub fn spawn(&mut self, tasks: &mut TaskQueue, config: &GameConfig) {
        let period = Duration::from_millis(config.boss.alert_frame_ms);
        self.alert_task = Some(tasks.every(period, Task::BossAlert));
    }

    pub fn id(&self) -> EntityId {
        self.body.entity.id
    }

    pub fn state(&self) -> BossState {
        self.animation.current_state()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn is_walking(&self) -> bool {
        self.walking
    }

    pub fn is_hurt(&self) -> bool {
        self.hurt
    }

    pub fn on_alert(&mut self, _ctx: &mut TickContext) {
        if self.defeated || self.hurt || self.walking {
            return;
        }
        self.animation.set_state(BossState::Alert);
        let frame = self.animation.next_frame(IMAGES_ALERT, self.body.entity.cache());
        self.body.entity.show_frame(frame);
    }

    /// One-time switch into aggressive mode. Returns false after the first call.
    pub fn activate(&mut self, ctx: &mut TickContext) -> bool {
        if self.activated {
            return false;
        }
        self.activated = true;
        log::info!("Boss activated at x = {:.1}", self.body.entity.x);
        self.start_walking(ctx);
        true
    }

    /// Starts walking toward the player. No-op while walking or once defeated.
    pub fn start_walking(&mut self, ctx: &mut TickContext) -> bool {
        if self.defeated || self.walking {
            return false;
        }
        ctx.play_looped(Cue::BossMusic);
        ctx.stop(Cue::MainMusic);
        self.walking = true;
        self.walk_ticks = 0;
        self.animation.set_state(BossState::Walking);
        let period = Duration::from_millis(ctx.config.boss.walk_tick_ms);
        self.walk_task = Some(ctx.tasks.every(period, Task::BossWalk));
        true
    }

    /// The transition a walking boss takes this tick, if any.
    pub fn walk_exit(&self, player_dead: bool) -> Option<WalkExit> {
        if self.defeated {
            Some(WalkExit::Defeated)
        } else if self.hurt {
            Some(WalkExit::Hurt)
        } else if player_dead {
            Some(WalkExit::PlayerDead)
        } else {
            None
        }
    }

    pub fn on_walk(&mut self, ctx: &mut TickContext, player_dead: bool) {
        if let Some(exit) = self.walk_exit(player_dead) {
            log::debug!("Boss stops walking: {:?}", exit);
            ctx.tasks.cancel_opt(&mut self.walk_task);
            self.walking = false;
            if exit == WalkExit::PlayerDead {
                self.animation.set_state(BossState::Alert);
            }
            return;
        }

        self.body.move_left();
        let boss = &ctx.config.boss;
        let ticks_per_frame = (boss.walk_frame_ms / boss.walk_tick_ms.max(1)).max(1);
        if self.walk_ticks % ticks_per_frame == 0 {
            let frame = self.animation.next_frame(IMAGES_WALK, self.body.entity.cache());
            self.body.entity.show_frame(frame);
        }
        self.walk_ticks += 1;
    }

    /// Applies one projectile hit and reports the new energy.
    pub fn receive_projectile(&mut self, ctx: &mut TickContext) -> HitOutcome {
        let outcome = self.body.damage(ctx.config.boss.projectile_damage);
        let percentage = self.body.energy().percentage();
        ctx.signal(UiSignal::Status(StatusBar::BossHealth, percentage));
        log::debug!("Boss hit, energy {}", self.body.energy());

        if self.body.is_dead() && !self.defeated {
            self.play_death_animation(ctx);
        } else {
            self.show_hurt_animation(ctx);
        }
        outcome
    }

    /// Interrupts alert and walking with the hurt cycle for a fixed time.
    pub fn show_hurt_animation(&mut self, ctx: &mut TickContext) -> bool {
        if self.defeated || self.hurt {
            return false;
        }
        self.hurt = true;
        self.hurt_step = 0;
        self.animation.set_state(BossState::Hurt);
        ctx.tasks.cancel_opt(&mut self.alert_task);
        ctx.tasks.cancel_opt(&mut self.walk_task);
        self.walking = false;

        let boss = &ctx.config.boss;
        let frame_period = Duration::from_millis(boss.hurt_frame_ms);
        let duration = Duration::from_millis(boss.hurt_duration_ms);
        self.hurt_frame_task = Some(ctx.tasks.every(frame_period, Task::BossHurtFrame));
        self.hurt_end_task = Some(ctx.tasks.after(duration, Task::BossHurtEnd));
        true
    }

    pub fn on_hurt_frame(&mut self, ctx: &mut TickContext) {
        // Cycles the frames with one blank step between rounds
        match IMAGES_HURT.get(self.hurt_step) {
            Some(&key) => {
                ctx.play(Cue::BossHurt);
                self.body.entity.show(key);
                self.hurt_step += 1;
            }
            None => self.hurt_step = 0,
        }
    }

    pub fn on_hurt_end(&mut self, ctx: &mut TickContext) {
        self.hurt_end_task = None;
        ctx.tasks.cancel_opt(&mut self.hurt_frame_task);
        self.hurt = false;
        if !self.defeated {
            self.animation.set_state(BossState::Alert);
            self.start_walking(ctx);
        }
    }

    /// Starts the one-shot death sequence. Returns false if already defeated.
    pub fn play_death_animation(&mut self, ctx: &mut TickContext) -> bool {
        if self.defeated {
            return false;
        }
        log::info!("Boss defeated");
        ctx.stop(Cue::BossMusic);
        self.defeated = true;
        self.animation.set_state(BossState::Dead);
        ctx.tasks.cancel_opt(&mut self.alert_task);
        ctx.tasks.cancel_opt(&mut self.hurt_frame_task);
        self.death = Some(Sequence::new(IMAGES_DEAD));
        let period = Duration::from_millis(ctx.config.boss.death_frame_ms);
        self.death_task = Some(ctx.tasks.every(period, Task::BossDeathFrame));
        true
    }

    /// Shows the next death frame; after the last one, signals victory and
    /// queues the final teardown.
    pub fn on_death_frame(&mut self, ctx: &mut TickContext) {
        let Some(sequence) = self.death.as_mut() else {
            return;
        };
        match sequence.step() {
            SequenceStep::Frame(key) => self.body.entity.show(key),
            SequenceStep::Finished => {
                if self.death_task.is_some() {
                    ctx.tasks.cancel_opt(&mut self.death_task);
                    ctx.play(Cue::Win);
                    ctx.signal(UiSignal::Victory);
                    let delay = Duration::from_millis(ctx.config.boss.finalize_delay_ms);
                    ctx.tasks.after(delay, Task::BossFinalize);
                }
            }
        }
    }
}

impl Collidable for Boss {
    fn entity(&self) -> &Entity {
        &self.body.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityIds;
    use crate::sinks::AudioEvent;
    use crate::tick::Harness;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn make_boss(harness: &mut Harness) -> Boss {
        let mut ids = EntityIds::new();
        let mut boss = Boss::new(ids.next(), &harness.config);
        boss.spawn(&mut harness.tasks, &harness.config);
        boss
    }

    fn run(harness: &mut Harness, boss: &mut Boss, until: Duration, player_dead: bool) -> Vec<Task> {
        let mut fired = Vec::new();
        while let Some((task, at)) = harness.next_due(until) {
            let mut ctx = harness.ctx(at);
            match task {
                Task::BossAlert => boss.on_alert(&mut ctx),
                Task::BossWalk => boss.on_walk(&mut ctx, player_dead),
                Task::BossHurtFrame => boss.on_hurt_frame(&mut ctx),
                Task::BossHurtEnd => boss.on_hurt_end(&mut ctx),
                Task::BossDeathFrame => boss.on_death_frame(&mut ctx),
                Task::BossFinalize => {}
                other => panic!("unexpected task {:?}", other),
            }
            fired.push(task);
        }
        harness.tasks.settle(until);
        fired
    }

    #[test]
    fn test_alert_cycle_before_activation() {
        let mut harness = Harness::new();
        let mut boss = make_boss(&mut harness);
        run(&mut harness, &mut boss, ms(1000), false);

        assert_eq!(boss.state(), BossState::Alert);
        assert_eq!(boss.body.entity.x, 2250.0);
        assert!(IMAGES_ALERT.contains(&boss.body.entity.sprite().unwrap()));
    }

    #[test]
    fn test_activation_happens_once() {
        let mut harness = Harness::new();
        let mut boss = make_boss(&mut harness);
        assert!(boss.activate(&mut harness.ctx(ms(0))));
        assert!(!boss.activate(&mut harness.ctx(ms(10))));
        assert!(boss.is_walking());
        assert!(harness.audio.events().contains(&AudioEvent::Loop(Cue::BossMusic)));
    }

    #[test]
    fn test_start_walking_is_idempotent() {
        let mut harness = Harness::new();
        let mut boss = make_boss(&mut harness);
        assert!(boss.start_walking(&mut harness.ctx(ms(0))));
        assert!(!boss.start_walking(&mut harness.ctx(ms(1))));
        assert_eq!(harness.tasks.count(|t| *t == Task::BossWalk), 1);
    }

    #[test]
    fn test_walks_left_until_player_dies() {
        let mut harness = Harness::new();
        let mut boss = make_boss(&mut harness);
        boss.start_walking(&mut harness.ctx(ms(0)));

        run(&mut harness, &mut boss, ms(40), false);
        // Ten walk ticks of 0.8
        assert!((boss.body.entity.x - 2242.0).abs() < 1e-3);

        run(&mut harness, &mut boss, ms(44), true);
        assert!(!boss.is_walking());
        assert_eq!(harness.tasks.count(|t| *t == Task::BossWalk), 0);
        assert_eq!(boss.walk_exit(true), Some(WalkExit::PlayerDead));
    }

    #[test]
    fn test_hurt_interrupts_walk_then_resumes() {
        let mut harness = Harness::new();
        let mut boss = make_boss(&mut harness);
        boss.start_walking(&mut harness.ctx(ms(0)));

        assert!(boss.show_hurt_animation(&mut harness.ctx(ms(0))));
        assert!(!boss.show_hurt_animation(&mut harness.ctx(ms(0))));
        assert_eq!(boss.state(), BossState::Hurt);
        assert_eq!(harness.tasks.count(|t| *t == Task::BossWalk), 0);
        assert_eq!(harness.tasks.count(|t| *t == Task::BossAlert), 0);

        run(&mut harness, &mut boss, ms(999), false);
        assert!(boss.is_hurt());
        assert!(harness.audio.plays(Cue::BossHurt) >= 3);

        run(&mut harness, &mut boss, ms(1000), false);
        assert!(!boss.is_hurt());
        assert!(boss.is_walking());
        assert_eq!(harness.tasks.count(|t| *t == Task::BossHurtFrame), 0);
    }

    #[test]
    fn test_five_hits_defeat_boss_once() {
        let mut harness = Harness::new();
        let mut boss = make_boss(&mut harness);

        let mut outcomes = Vec::new();
        for i in 0..5 {
            let now = ms(i * 200);
            run(&mut harness, &mut boss, now, false);
            outcomes.push(boss.receive_projectile(&mut harness.ctx(now)));
        }

        assert_eq!(harness.ui.status_history(StatusBar::BossHealth), vec![80, 60, 40, 20, 0]);
        assert_eq!(outcomes.last(), Some(&HitOutcome::Killed));
        assert!(boss.is_defeated());
        assert_eq!(boss.state(), BossState::Dead);
        assert_eq!(harness.tasks.count(|t| *t == Task::BossDeathFrame), 1);
        assert!(!boss.play_death_animation(&mut harness.ctx(ms(900))));
    }

    #[test]
    fn test_death_sequence_signals_victory_then_finalize() {
        let mut harness = Harness::new();
        let mut boss = make_boss(&mut harness);
        boss.play_death_animation(&mut harness.ctx(ms(0)));

        let fired = run(&mut harness, &mut boss, ms(5000), false);
        assert_eq!(fired.iter().filter(|t| **t == Task::BossDeathFrame).count(), 4);
        assert_eq!(fired.last(), Some(&Task::BossFinalize));
        assert_eq!(harness.ui.count(UiSignal::Victory), 1);
        assert_eq!(harness.audio.plays(Cue::Win), 1);
        assert_eq!(boss.body.entity.sprite(), Some(IMAGES_DEAD[2]));
        assert!(harness.audio.events().contains(&AudioEvent::Stop(Cue::BossMusic)));
    }
}
