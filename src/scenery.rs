//! Background layers and drifting clouds. Purely visual; nothing here
//! collides.

use crate::config::{GameConfig, period_from_hz};
use crate::entity::{Entity, EntityId, EntityKind};
use crate::scheduler::{Task, TaskQueue};
use crate::sprite::{Frames, SpriteKey};
use rand::Rng;

pub const IMAGES_CLOUDS: Frames = &[
    "img/5_background/layers/4_clouds/1.png",
    "img/5_background/layers/4_clouds/2.png",
];

/// Parallax layers back to front, in their two alternating variants.
pub const LAYER_SETS: [[SpriteKey; 4]; 2] = [
    [
        "img/5_background/layers/air.png",
        "img/5_background/layers/3_third_layer/1.png",
        "img/5_background/layers/2_second_layer/1.png",
        "img/5_background/layers/1_first_layer/1.png",
    ],
    [
        "img/5_background/layers/air.png",
        "img/5_background/layers/3_third_layer/2.png",
        "img/5_background/layers/2_second_layer/2.png",
        "img/5_background/layers/1_first_layer/2.png",
    ],
];

/// One full-screen background image at a fixed x.
pub struct BackgroundLayer {
    pub entity: Entity,
}

impl BackgroundLayer {
    pub fn new(id: EntityId, image: SpriteKey, x: f32, config: &GameConfig) -> Self {
        let scenery = &config.scenery;
        let y = scenery.screen_height - scenery.layer_height;
        BackgroundLayer {
            entity: Entity::fixed(
                id,
                EntityKind::Background,
                (x, y),
                (scenery.layer_width, scenery.layer_height),
                image,
            ),
        }
    }
}

pub struct Cloud {
    pub entity: Entity,
    speed: f32,
}

impl Cloud {
    pub fn new(id: EntityId, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let scenery = &config.scenery;
        let x = rng.gen_range(0.0..scenery.cloud_spawn_x_max);
        let speed = rng.gen_range(scenery.cloud_speed_min..scenery.cloud_speed_max);
        Cloud {
            entity: Entity::new(
                id,
                EntityKind::Cloud,
                (x, scenery.cloud_y),
                (scenery.cloud_width, scenery.cloud_height),
                &[IMAGES_CLOUDS],
            ),
            speed,
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn spawn(&self, tasks: &mut TaskQueue, config: &GameConfig) {
        let period = period_from_hz(config.scenery.cloud_hz);
        tasks.every(period, Task::CloudDrift(self.id()));
    }

    /// Drifts left; once fully off the left edge, reappears far to the right.
    pub fn on_drift(&mut self, config: &GameConfig, rng: &mut impl Rng) {
        self.entity.x -= self.speed;
        if self.entity.x + self.entity.width() < 0.0 {
            let scenery = &config.scenery;
            self.entity.x = rng.gen_range(scenery.cloud_respawn_x_min..scenery.cloud_respawn_x_max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityIds;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_background_sits_on_screen_bottom() {
        let config = GameConfig::default();
        let mut ids = EntityIds::new();
        let layer = BackgroundLayer::new(ids.next(), LAYER_SETS[0][1], 719.0, &config);
        assert_eq!(layer.entity.y, 0.0);
        assert_eq!(layer.entity.x, 719.0);
        assert_eq!(layer.entity.sprite(), Some(LAYER_SETS[0][1]));
    }

    #[test]
    fn test_cloud_wraps_to_the_right() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut ids = EntityIds::new();
        let mut cloud = Cloud::new(ids.next(), &config, &mut rng);
        assert!((0.15..0.4).contains(&cloud.speed()));

        cloud.entity.x = -400.0;
        cloud.on_drift(&config, &mut rng);
        assert!((700.0..2400.0).contains(&cloud.entity.x));
    }

    #[test]
    fn test_cloud_drifts_left() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut ids = EntityIds::new();
        let mut cloud = Cloud::new(ids.next(), &config, &mut rng);
        cloud.entity.x = 100.0;
        cloud.on_drift(&config, &mut rng);
        assert!(cloud.entity.x < 100.0);
    }
}
