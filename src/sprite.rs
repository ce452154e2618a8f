//! Sprite keys and per-entity image caches
//!
//! A sprite is identified by its asset path. Each entity preloads every frame
//! it can ever show into its own [`SpriteCache`] at construction; the
//! animation code only ever selects keys that are already cached, so the
//! front-end can resolve a key to a texture without a lookup failing mid-game.

use std::collections::HashSet;

/// Asset path of one image, e.g. `"img/3_enemies_chicken/chicken_normal/2_dead/dead.png"`.
pub type SpriteKey = &'static str;

/// An ordered list of animation frames.
pub type Frames = &'static [SpriteKey];

#[derive(Debug, Clone, Default)]
pub struct SpriteCache {
    keys: HashSet<SpriteKey>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cache holding every frame of every set.
    pub fn preload(sets: &[Frames]) -> Self {
        let mut cache = SpriteCache::new();
        for frames in sets {
            cache.load(frames);
        }
        cache
    }

    pub fn load(&mut self, frames: Frames) {
        self.keys.extend(frames.iter().copied());
    }

    pub fn insert(&mut self, key: SpriteKey) {
        self.keys.insert(key);
    }

    pub fn contains(&self, key: SpriteKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns `key` when it was preloaded.
    pub fn get(&self, key: SpriteKey) -> Option<SpriteKey> {
        self.keys.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SpriteKey> + '_ {
        self.keys.iter().copied()
    }
}
