//! The base of every world object: position, size, current sprite and a
//! rendering delegate.
//!
//! Size is fixed at construction. Position is public; state machines move
//! their entity by writing `x`/`y` directly, the way the rest of the kernel
//! treats plain data.

use crate::sinks::{DrawCall, RenderSink};
use crate::sprite::{Frames, SpriteCache, SpriteKey};

/// Stable identifier of one entity inside a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Hands out unique ids for one world.
#[derive(Debug, Default)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> EntityId {
        self.next += 1;
        EntityId(self.next)
    }
}

/// Kind tag used for hitbox lookup and render layering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    NormalEnemy,
    SmallEnemy,
    Boss,
    Projectile,
    Bottle,
    Coin,
    Cloud,
    Background,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    width: f32,
    height: f32,
    /// Draw flipped about the entity's own width
    pub mirrored: bool,
    sprite: Option<SpriteKey>,
    cache: SpriteCache,
}

impl Entity {
    /// Creates an entity and preloads every frame it will ever show.
    ///
    /// The first frame of the first set becomes the initial sprite.
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        (x, y): (f32, f32),
        (width, height): (f32, f32),
        frame_sets: &[Frames],
    ) -> Self {
        let cache = SpriteCache::preload(frame_sets);
        let sprite = frame_sets.first().and_then(|frames| frames.first().copied());
        Entity {
            id,
            kind,
            x,
            y,
            width,
            height,
            mirrored: false,
            sprite,
            cache,
        }
    }

    /// Creates an entity that always shows the same image.
    pub fn fixed(
        id: EntityId,
        kind: EntityKind,
        position: (f32, f32),
        size: (f32, f32),
        sprite: SpriteKey,
    ) -> Self {
        let mut entity = Entity::new(id, kind, position, size, &[]);
        entity.cache.insert(sprite);
        entity.sprite = Some(sprite);
        entity
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn sprite(&self) -> Option<SpriteKey> {
        self.sprite
    }

    pub fn cache(&self) -> &SpriteCache {
        &self.cache
    }

    /// Switches to a preloaded sprite. Unknown keys leave the sprite as is.
    pub fn show(&mut self, key: SpriteKey) {
        if let Some(key) = self.cache.get(key) {
            self.sprite = Some(key);
        }
    }

    /// Switches to a sprite chosen by an animation step, if any.
    pub fn show_frame(&mut self, key: Option<SpriteKey>) {
        if let Some(key) = key {
            self.show(key);
        }
    }

    pub fn draw_call(&self) -> Option<DrawCall> {
        self.sprite.map(|sprite| DrawCall {
            sprite,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            mirrored: self.mirrored,
        })
    }

    /// Hands this entity to the render sink. An entity without a sprite
    /// draws nothing.
    pub fn draw(&self, sink: &mut dyn RenderSink) {
        if let Some(call) = self.draw_call() {
            sink.draw(&call);
        }
    }
}
