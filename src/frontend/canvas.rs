//! SDL2 render sink
//!
//! Draw calls arrive in world coordinates; the sink shifts them by the
//! camera offset and copies the sprite's texture. Textures are loaded on
//! first use and cached, including failures: a missing image is reported
//! once and then drawn as nothing.

use super::status_bar::StatusBars;
use crate::sinks::{DrawCall, Hud, RenderSink};
use crate::sprite::SpriteKey;
use sdl2::image::LoadTexture;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use std::collections::HashMap;
use std::path::PathBuf;

pub const SCREEN_WIDTH: u32 = 720;
pub const SCREEN_HEIGHT: u32 = 480;

/// Lazily loaded textures keyed by sprite path.
pub struct TextureCache<'a> {
    creator: &'a TextureCreator<WindowContext>,
    root: PathBuf,
    textures: HashMap<SpriteKey, Option<Texture<'a>>>,
}

impl<'a> TextureCache<'a> {
    pub fn new(creator: &'a TextureCreator<WindowContext>, root: impl Into<PathBuf>) -> Self {
        TextureCache {
            creator,
            root: root.into(),
            textures: HashMap::new(),
        }
    }

    /// The texture for `key`, loading it on first request.
    pub fn get(&mut self, key: SpriteKey) -> Option<&Texture<'a>> {
        let creator = self.creator;
        let root = &self.root;
        self.textures
            .entry(key)
            .or_insert_with(|| match creator.load_texture(root.join(key)) {
                Ok(texture) => Some(texture),
                Err(e) => {
                    log::warn!("Missing texture {}: {}", key, e);
                    None
                }
            })
            .as_ref()
    }

    /// Loads every key up front so the first frames do not stall.
    pub fn preload(&mut self, keys: impl IntoIterator<Item = SpriteKey>) -> usize {
        keys.into_iter().filter(|key| self.get(*key).is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

pub struct CanvasSink<'a> {
    canvas: Canvas<Window>,
    textures: TextureCache<'a>,
    status_bars: StatusBars,
    camera_x: f32,
}

impl<'a> CanvasSink<'a> {
    pub fn new(canvas: Canvas<Window>, textures: TextureCache<'a>) -> Self {
        CanvasSink {
            canvas,
            textures,
            status_bars: StatusBars::new(),
            camera_x: 0.0,
        }
    }

    /// Clears the screen to a flat colour. Used for screens without a world.
    pub fn clear(&mut self, color: Color) {
        self.canvas.set_draw_color(color);
        self.canvas.clear();
    }

    /// Draws a full-screen image, or a translucent tint when it is missing.
    pub fn draw_overlay(&mut self, image: SpriteKey, tint: Color) -> Result<(), String> {
        let screen = Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);
        match self.textures.get(image) {
            Some(texture) => self.canvas.copy(texture, None, screen),
            None => {
                self.canvas.set_blend_mode(BlendMode::Blend);
                self.canvas.set_draw_color(tint);
                self.canvas.fill_rect(screen)
            }
        }
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }
}

impl RenderSink for CanvasSink<'_> {
    fn begin_frame(&mut self, camera_x: f32) {
        self.camera_x = camera_x;
        self.clear(Color::RGB(0, 0, 0));
    }

    fn draw(&mut self, call: &DrawCall) {
        let Some(texture) = self.textures.get(call.sprite) else {
            return;
        };
        let dst = Rect::new(
            (call.x + self.camera_x).round() as i32,
            call.y.round() as i32,
            call.width.max(1.0) as u32,
            call.height.max(1.0) as u32,
        );
        if let Err(e) = self.canvas.copy_ex(texture, None, dst, 0.0, None, call.mirrored, false) {
            log::warn!("Failed to draw {}: {}", call.sprite, e);
        }
    }

    fn draw_hud(&mut self, hud: &Hud) {
        if let Err(e) = self.status_bars.render(&mut self.canvas, &mut self.textures, hud) {
            log::warn!("Failed to draw status bars: {}", e);
        }
    }

    fn end_frame(&mut self) {
        // Overlays may still be drawn; `present()` is called by the loop
    }
}
