//! Collectible items lying on the ground: salsa bottles (throwable ammo) and
//! coins.

use crate::animation::AnimationController;
use crate::collision::Collidable;
use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, EntityKind};
use crate::scheduler::{Task, TaskId, TaskQueue};
use crate::sprite::Frames;
use rand::Rng;
use std::time::Duration;

pub const IMAGES_GROUND_BOTTLE: Frames = &[
    "img/6_salsa_bottle/1_salsa_bottle_on_ground.png",
    "img/6_salsa_bottle/2_salsa_bottle_on_ground.png",
];

pub const IMAGES_COIN: Frames = &["img/8_coin/coin_2.png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Bottle,
    Coin,
}

pub struct Pickup {
    pub entity: Entity,
    kind: PickupKind,
    pub collected: bool,
    animation: AnimationController<PickupKind>,
    animation_task: Option<TaskId>,
}

impl Pickup {
    /// Places a pickup at a random x within the configured spawn range.
    pub fn new(id: EntityId, kind: PickupKind, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let x = rng.gen_range(config.pickups.spawn_x_min..config.pickups.spawn_x_max);
        Self::at(id, kind, config, x)
    }

    pub fn at(id: EntityId, kind: PickupKind, config: &GameConfig, x: f32) -> Self {
        let pickups = &config.pickups;
        let (entity_kind, y, frames) = match kind {
            PickupKind::Bottle => (EntityKind::Bottle, pickups.bottle_y, IMAGES_GROUND_BOTTLE),
            PickupKind::Coin => (EntityKind::Coin, pickups.coin_y, IMAGES_COIN),
        };
        Pickup {
            entity: Entity::new(id, entity_kind, (x, y), (pickups.width, pickups.height), &[frames]),
            kind,
            collected: false,
            animation: AnimationController::new(kind),
            animation_task: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    pub fn kind(&self) -> PickupKind {
        self.kind
    }

    /// Ground bottles wobble between two frames; coins are static.
    pub fn spawn(&mut self, tasks: &mut TaskQueue, config: &GameConfig) {
        if self.kind == PickupKind::Bottle {
            let period = Duration::from_millis(config.pickups.bottle_frame_ms);
            self.animation_task = Some(tasks.every(period, Task::PickupAnimation(self.id())));
        }
    }

    pub fn on_animation(&mut self) {
        let frame = self.animation.next_frame(IMAGES_GROUND_BOTTLE, self.entity.cache());
        self.entity.show_frame(frame);
    }

    /// Marks the item as picked up and stops its animation.
    pub fn collect(&mut self, tasks: &mut TaskQueue) {
        self.collected = true;
        tasks.cancel_opt(&mut self.animation_task);
    }
}

impl Collidable for Pickup {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}
