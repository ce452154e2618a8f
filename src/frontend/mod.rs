// SDL2 front-end
//
// This module contains:
// - canvas.rs: render sink that draws sprites through a texture cache
// - status_bar.rs: HUD bars for health, coins, bottles and boss health
// - input.rs: keyboard events and held keys to actions and InputState

pub mod canvas;
pub mod input;
pub mod status_bar;

pub use canvas::{CanvasSink, SCREEN_HEIGHT, SCREEN_WIDTH, TextureCache};
pub use input::{FrontAction, InputSystem};
pub use status_bar::{StatusBarStyle, StatusBars};
