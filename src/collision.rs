/// Collision detection for Pollo Loco
///
/// Every entity collides through an inset rectangle: its drawn box shrunk by a
/// fixed amount on each side, so that the transparent padding around a sprite
/// never counts as a hit. The insets depend only on the entity's kind and live
/// in one lookup table ([`EntityKind::hitbox_insets`]).
///
/// # Architecture
///
/// - `Insets`: per-kind top/right/bottom/left shrink amounts
/// - `HitRect`: the resulting rectangle in world coordinates
/// - `rects_overlap`: pure strict AABB test
/// - `Collidable` trait: anything that owns an [`Entity`] can be tested against
///   anything else that does
///
/// # Rust Learning Notes
///
/// This module demonstrates:
/// - **Lookup tables over type checks**: a `match` on a `Copy` enum replaces a
///   chain of "is this a player? is this a chicken?" tests
/// - **Default trait methods**: implementors only say where their entity is,
///   the collision test itself is written once
use crate::entity::{Entity, EntityKind};

/// How far each edge of a hit rectangle is pulled in from the drawn box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const NONE: Insets = Insets::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Insets {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl EntityKind {
    /// Hitbox insets for this kind of entity.
    ///
    /// Ground items carry a right inset larger than their width; their hit
    /// rectangle is inverted horizontally and only a narrow band of player
    /// positions overlaps it. Pickups rely on that band.
    pub const fn hitbox_insets(self) -> Insets {
        match self {
            EntityKind::Player => Insets::new(0.0, 50.0, 0.0, 30.0),
            EntityKind::Boss => Insets::new(0.0, 40.0, 0.0, 30.0),
            EntityKind::Bottle | EntityKind::Coin => Insets::new(0.0, 100.0, 10.0, 25.0),
            EntityKind::NormalEnemy
            | EntityKind::SmallEnemy
            | EntityKind::Projectile
            | EntityKind::Cloud
            | EntityKind::Background => Insets::NONE,
        }
    }
}

/// An inset rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl HitRect {
    /// The left/top edges move in by the left/top inset; the right/bottom
    /// edges are measured from the shifted left/top edge.
    pub fn from_entity(entity: &Entity) -> Self {
        let insets = entity.kind.hitbox_insets();
        let left = entity.x + insets.left;
        let top = entity.y + insets.top;
        HitRect {
            left,
            top,
            right: left + entity.width() - insets.right,
            bottom: top + entity.height() - insets.bottom,
        }
    }
}

/// Strict overlap on both axes. Rectangles that only touch do not overlap.
pub fn rects_overlap(a: &HitRect, b: &HitRect) -> bool {
    a.right > b.left && a.bottom > b.top && a.left < b.right && a.top < b.bottom
}

/// Trait for entities that take part in collision tests.
///
/// # Example
///
/// ```ignore
/// impl Collidable for Enemy {
///     fn entity(&self) -> &Entity {
///         &self.body.entity
///     }
/// }
///
/// if player.is_colliding(&enemy) { /* ... */ }
/// ```
pub trait Collidable {
    fn entity(&self) -> &Entity;

    fn hit_rect(&self) -> HitRect {
        HitRect::from_entity(self.entity())
    }

    fn is_colliding(&self, other: &dyn Collidable) -> bool {
        rects_overlap(&self.hit_rect(), &other.hit_rect())
    }
}

impl Collidable for Entity {
    fn entity(&self) -> &Entity {
        self
    }
}

/// Indices of every entry in `entities` that collides with `entity`.
pub fn colliding_indices<T: Collidable>(entity: &dyn Collidable, entities: &[T]) -> Vec<usize> {
    let bounds = entity.hit_rect();
    entities
        .iter()
        .enumerate()
        .filter(|(_, other)| rects_overlap(&bounds, &other.hit_rect()))
        .map(|(index, _)| index)
        .collect()
}
