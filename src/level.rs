//! Level layout and construction
//!
//! A [`LevelLayout`] is plain data: how many of each thing to place and how
//! far the background reaches. [`Level::build`] turns it into live entities,
//! drawing spawn positions and speeds from the injected random generator so a
//! seeded generator always produces the same level.

use crate::boss::Boss;
use crate::config::{ConfigError, GameConfig};
use crate::enemy::{Enemy, EnemyVariant};
use crate::entity::EntityIds;
use crate::pickup::{Pickup, PickupKind};
use crate::scenery::{BackgroundLayer, Cloud, LAYER_SETS};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub normal_enemies: usize,
    pub small_enemies: usize,
    pub bottles: usize,
    pub coins: usize,
    pub clouds: usize,
    /// Background segments span `first_segment..=last_segment`, one screen
    /// width each
    pub first_segment: i32,
    pub last_segment: i32,
    pub boss: bool,
}

impl Default for LevelLayout {
    fn default() -> Self {
        LevelLayout::level_one()
    }
}

impl LevelLayout {
    pub fn level_one() -> Self {
        LevelLayout {
            normal_enemies: 5,
            small_enemies: 4,
            bottles: 11,
            coins: 10,
            clouds: 3,
            first_segment: -1,
            last_segment: 3,
            boss: true,
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let layout: LevelLayout = serde_json::from_str(&content)?;
        if layout.first_segment > layout.last_segment {
            return Err(ConfigError::InvalidValue(
                "first_segment must not exceed last_segment".to_string(),
            ));
        }
        Ok(layout)
    }
}

/// Every entity of one level, before the world starts their tasks.
///
/// `ids` keeps handing out ids after the build so entities spawned later
/// (the player, thrown bottles) never clash with level entities.
pub struct Level {
    pub ids: EntityIds,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub bottles: Vec<Pickup>,
    pub coins: Vec<Pickup>,
    pub backgrounds: Vec<BackgroundLayer>,
    pub clouds: Vec<Cloud>,
}

impl Level {
    pub fn build(
        layout: &LevelLayout,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Level {
        let mut ids = EntityIds::new();
        // Neighbouring segments overlap by one pixel so no seam shows
        let step = config.scenery.layer_width - 1.0;
        let mut backgrounds = Vec::new();
        for segment in layout.first_segment..=layout.last_segment {
            let images = &LAYER_SETS[segment.rem_euclid(2) as usize];
            let x = segment as f32 * step;
            for &image in images {
                backgrounds.push(BackgroundLayer::new(ids.next(), image, x, config));
            }
        }

        let mut enemies = Vec::with_capacity(layout.normal_enemies + layout.small_enemies);
        for _ in 0..layout.normal_enemies {
            enemies.push(Enemy::new(ids.next(), EnemyVariant::Normal, config, rng));
        }
        for _ in 0..layout.small_enemies {
            enemies.push(Enemy::new(ids.next(), EnemyVariant::Small, config, rng));
        }

        let boss = layout.boss.then(|| Boss::new(ids.next(), config));
        let clouds = (0..layout.clouds).map(|_| Cloud::new(ids.next(), config, rng)).collect();
        let bottles = (0..layout.bottles)
            .map(|_| Pickup::new(ids.next(), PickupKind::Bottle, config, rng))
            .collect();
        let coins = (0..layout.coins)
            .map(|_| Pickup::new(ids.next(), PickupKind::Coin, config, rng))
            .collect();

        log::debug!(
            "Built level: {} enemies, boss: {}, {} bottles, {} coins",
            enemies.len(),
            layout.boss,
            layout.bottles,
            layout.coins
        );

        Level {
            ids,
            enemies,
            boss,
            bottles,
            coins,
            backgrounds,
            clouds,
        }
    }

    /// A level with nothing in it; tests add exactly the entities they need.
    pub fn empty() -> Level {
        Level {
            ids: EntityIds::new(),
            enemies: Vec::new(),
            boss: None,
            bottles: Vec::new(),
            coins: Vec::new(),
            backgrounds: Vec::new(),
            clouds: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build(seed: u64) -> Level {
        let mut rng = StdRng::seed_from_u64(seed);
        Level::build(&LevelLayout::level_one(), &GameConfig::default(), &mut rng)
    }

    #[test]
    fn test_level_one_counts() {
        let level = build(1);
        assert_eq!(level.enemies.len(), 9);
        assert!(level.boss.is_some());
        assert_eq!(level.bottles.len(), 11);
        assert_eq!(level.coins.len(), 10);
        assert_eq!(level.clouds.len(), 3);
        // Five segments of four layers
        assert_eq!(level.backgrounds.len(), 20);
    }

    #[test]
    fn test_background_segments_alternate() {
        let level = build(1);
        assert_eq!(level.backgrounds[0].entity.x, -719.0);
        assert_eq!(level.backgrounds[4].entity.x, 0.0);
        assert_eq!(level.backgrounds[0].entity.sprite(), Some(LAYER_SETS[1][0]));
        assert_eq!(level.backgrounds[5].entity.sprite(), Some(LAYER_SETS[0][1]));
    }

    #[test]
    fn test_same_seed_same_level() {
        let a = build(42);
        let b = build(42);
        let xs = |level: &Level| level.enemies.iter().map(|e| e.body.entity.x).collect::<Vec<_>>();
        assert_eq!(xs(&a), xs(&b));
    }

    #[test]
    fn test_partial_layout_json() {
        let layout: LevelLayout = serde_json::from_str(r#"{ "bottles": 2, "boss": false }"#).unwrap();
        assert_eq!(layout.bottles, 2);
        assert!(!layout.boss);
        assert_eq!(layout.coins, 10);
    }

    #[test]
    fn test_ids_unique_across_level() {
        let mut level = build(9);
        let later = level.ids.next();
        let mut ids: Vec<_> = level.enemies.iter().map(|e| e.id()).collect();
        ids.extend(level.bottles.iter().map(|b| b.id()));
        ids.extend(level.coins.iter().map(|c| c.id()));
        ids.push(later);
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }
}
