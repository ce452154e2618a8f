/// Layered render pass for the side-scrolling world
///
/// This module provides a wrapper enum over everything that can be drawn and a
/// single function that draws a frame in a fixed back-to-front order.
///
/// # Architecture
///
/// - `DrawLayer` enum: the fixed depth order, back to front
/// - `Renderable` enum: wraps different entity types for unified rendering
/// - `render_in_layer_order()`: main rendering function
///
/// # Usage Example
///
/// ```ignore
/// let mut renderables = Vec::new();
/// renderables.extend(backgrounds.iter().map(Renderable::Background));
/// renderables.push(Renderable::Player(&player));
/// render_in_layer_order(&mut sink, camera_x, renderables, &hud);
/// ```
use crate::boss::Boss;
use crate::enemy::Enemy;
use crate::entity::Entity;
use crate::pickup::{Pickup, PickupKind};
use crate::player::Player;
use crate::projectile::Projectile;
use crate::scenery::{BackgroundLayer, Cloud};
use crate::sinks::{Hud, RenderSink};

/// Depth order of a side view: scenery at the back, the player in front of
/// everything it can touch.
///
/// # Rust Learning: Derived Ord
///
/// Deriving `Ord` on a fieldless enum orders variants by declaration order,
/// so sorting by `DrawLayer` sorts back to front with no lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DrawLayer {
    Background,
    Clouds,
    Bottles,
    Coins,
    Enemies,
    Boss,
    Projectiles,
    Player,
}

/// Wrapper enum for different renderable entity types.
///
/// This enum allows us to treat different entity types uniformly during rendering
/// while maintaining type safety and avoiding dynamic dispatch overhead.
pub enum Renderable<'a> {
    Background(&'a BackgroundLayer),
    Cloud(&'a Cloud),
    Pickup(&'a Pickup),
    Enemy(&'a Enemy),
    Boss(&'a Boss),
    Projectile(&'a Projectile),
    Player(&'a Player),
}

impl<'a> Renderable<'a> {
    pub fn layer(&self) -> DrawLayer {
        match self {
            Renderable::Background(_) => DrawLayer::Background,
            Renderable::Cloud(_) => DrawLayer::Clouds,
            Renderable::Pickup(item) => match item.kind() {
                PickupKind::Bottle => DrawLayer::Bottles,
                PickupKind::Coin => DrawLayer::Coins,
            },
            Renderable::Enemy(_) => DrawLayer::Enemies,
            Renderable::Boss(_) => DrawLayer::Boss,
            Renderable::Projectile(_) => DrawLayer::Projectiles,
            Renderable::Player(_) => DrawLayer::Player,
        }
    }

    fn entity(&self) -> &'a Entity {
        match self {
            Renderable::Background(layer) => &layer.entity,
            Renderable::Cloud(cloud) => &cloud.entity,
            Renderable::Pickup(item) => &item.entity,
            Renderable::Enemy(enemy) => &enemy.body.entity,
            Renderable::Boss(boss) => &boss.body.entity,
            Renderable::Projectile(bottle) => &bottle.body.entity,
            Renderable::Player(player) => &player.body.entity,
        }
    }

    /// Collected entities and spent bottles are not drawn.
    fn is_visible(&self) -> bool {
        match self {
            Renderable::Pickup(item) => !item.collected,
            Renderable::Enemy(enemy) => !enemy.is_collected(),
            Renderable::Boss(boss) => !boss.body.collected,
            Renderable::Projectile(bottle) => !bottle.is_disposed(),
            _ => true,
        }
    }
}

/// Draws one frame: every visible entity back to front, then the HUD.
///
/// # Algorithm
///
/// 1. Drop entities that are collected or disposed
/// 2. Sort by `DrawLayer` (stable, so entities within a layer keep the order
///    of their collection)
/// 3. Draw in sorted order, then the status overlays
pub fn render_in_layer_order(
    sink: &mut dyn RenderSink,
    camera_x: f32,
    renderables: Vec<Renderable<'_>>,
    hud: &Hud,
) {
    let mut visible: Vec<Renderable> = renderables.into_iter().filter(Renderable::is_visible).collect();
    // Rust Learning: sort_by_key() is a stable sort (maintains order of equal elements)
    visible.sort_by_key(Renderable::layer);

    sink.begin_frame(camera_x);
    for renderable in &visible {
        renderable.entity().draw(sink);
    }
    sink.draw_hud(hud);
    sink.end_frame();
}
