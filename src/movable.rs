//! Movable entities: gravity, energy and hurt timing
//!
//! `Movable` wraps an [`Entity`] with the state every moving thing shares.
//! Vertical velocity is positive while rising: a physics tick subtracts it
//! from `y` and then subtracts gravity from it.

use crate::collision::Collidable;
use crate::combat::{Energy, HitOutcome};
use crate::config::PhysicsConfig;
use crate::entity::{Entity, EntityKind};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Movable {
    pub entity: Entity,
    pub velocity_y: f32,
    /// Horizontal distance per movement tick
    pub speed: f32,
    energy: Energy,
    last_hit: Option<Duration>,
    /// Removed from play, waiting for the world sweep
    pub collected: bool,
}

impl Movable {
    pub fn new(entity: Entity, speed: f32) -> Self {
        Movable {
            entity,
            velocity_y: 0.0,
            speed,
            energy: Energy::FULL,
            last_hit: None,
            collected: false,
        }
    }

    pub fn with_energy(mut self, energy: Energy) -> Self {
        self.energy = energy;
        self
    }

    pub fn energy(&self) -> Energy {
        self.energy
    }

    fn is_projectile(&self) -> bool {
        self.entity.kind == EntityKind::Projectile
    }

    /// One physics tick.
    ///
    /// Projectiles are never clamped; their own state machine decides when
    /// they have landed.
    pub fn apply_gravity(&mut self, physics: &PhysicsConfig) {
        if self.is_above_ground(physics) || self.velocity_y > 0.0 {
            self.entity.y -= self.velocity_y;
            self.velocity_y -= physics.gravity;
        }
        if !self.is_projectile() && self.entity.y >= physics.ground_y {
            self.entity.y = physics.ground_y;
            self.velocity_y = 0.0;
        }
    }

    pub fn is_above_ground(&self, physics: &PhysicsConfig) -> bool {
        self.is_projectile() || self.entity.y < physics.ground_y
    }

    /// Takes `damage` and starts the hurt window if still alive.
    ///
    /// A lethal hit does not refresh the hurt window.
    pub fn hit(&mut self, now: Duration, damage: u8) -> HitOutcome {
        let outcome = self.damage(damage);
        if outcome == HitOutcome::Hurt {
            self.last_hit = Some(now);
        }
        outcome
    }

    /// Takes `amount` damage without touching the hurt window.
    pub fn damage(&mut self, amount: u8) -> HitOutcome {
        if self.energy.is_depleted() {
            return HitOutcome::AlreadyDead;
        }
        self.energy = self.energy.after_damage(amount);
        if self.energy.is_depleted() {
            HitOutcome::Killed
        } else {
            HitOutcome::Hurt
        }
    }

    /// True within `window` of the last non-lethal hit.
    pub fn is_hurt(&self, now: Duration, window: Duration) -> bool {
        match self.last_hit {
            Some(at) => now.saturating_sub(at) < window,
            None => false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.energy.is_depleted()
    }

    /// Callers only jump when grounded.
    pub fn jump(&mut self, velocity: f32) {
        self.velocity_y = velocity;
    }

    pub fn move_left(&mut self) {
        self.entity.x -= self.speed;
    }

    pub fn move_right(&mut self) {
        self.entity.x += self.speed;
    }
}

impl Collidable for Movable {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}
