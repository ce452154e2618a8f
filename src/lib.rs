//! pollo_loco: the simulation kernel of a 2D side-scroller.
//!
//! Everything that moves, collides, animates or keeps time lives here and
//! runs headless. Drawing, sound and keyboard input are collaborators behind
//! the traits in [`sinks`]; the SDL2 front-end in [`frontend`] (feature `sdl`)
//! is one implementation of them.

pub mod animation;
pub mod boss;
pub mod clock;
pub mod collision;
pub mod combat;
pub mod config;
pub mod enemy;
pub mod entity;
pub mod level;
pub mod movable;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod render;
pub mod scenery;
pub mod scheduler;
pub mod session;
pub mod sinks;
pub mod sprite;
pub mod tick;
pub mod world;

#[cfg(feature = "sdl")]
pub mod frontend;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GameConfig};
pub use level::{Level, LevelLayout};
pub use session::Session;
pub use world::{Outcome, Services, World};
