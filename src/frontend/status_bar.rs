//! HUD status bars
//!
//! Four screen-space bars: health, coins, bottles and the boss's health.
//! Each bar shows one of six images (0, 20, ..., 100 percent) picked with
//! [`status_step`]. When an image is missing the bar falls back to procedural
//! graphics (SDL2 rectangles), snapped to the same six steps.
//!
//! # Example
//!
//! ```ignore
//! let bars = StatusBars::new();
//! bars.render(&mut canvas, &mut textures, &hud)?;
//! ```

use super::canvas::TextureCache;
use crate::sinks::{Hud, StatusBar, status_step};
use crate::sprite::SpriteKey;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

const HEALTH_IMAGES: [SpriteKey; 6] = [
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/0.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/20.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/40.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/60.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/80.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/100.png",
];

const COIN_IMAGES: [SpriteKey; 6] = [
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/0.png",
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/20.png",
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/40.png",
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/60.png",
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/80.png",
    "img/7_statusbars/1_statusbar/1_statusbar_coin/green/100.png",
];

const BOTTLE_IMAGES: [SpriteKey; 6] = [
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/0.png",
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/20.png",
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/40.png",
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/60.png",
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/80.png",
    "img/7_statusbars/1_statusbar/3_statusbar_bottle/green/100.png",
];

const BOSS_IMAGES: [SpriteKey; 6] = [
    "img/7_statusbars/2_statusbar_endboss/green/green0.png",
    "img/7_statusbars/2_statusbar_endboss/green/green20.png",
    "img/7_statusbars/2_statusbar_endboss/green/green40.png",
    "img/7_statusbars/2_statusbar_endboss/green/green60.png",
    "img/7_statusbars/2_statusbar_endboss/green/green80.png",
    "img/7_statusbars/2_statusbar_endboss/green/green100.png",
];

/// Configuration for one bar's placement and fallback colours.
#[derive(Debug, Clone)]
pub struct StatusBarStyle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,

    /// Background colour (shown where the bar is depleted)
    pub background_color: Color,

    /// Fill colour above 30%
    pub fill_color: Color,

    /// Fill colour at or below 30%
    pub low_color: Color,

    pub border_color: Color,
}

impl StatusBarStyle {
    fn at(x: i32, y: i32, fill_color: Color) -> Self {
        StatusBarStyle {
            x,
            y,
            width: 200,
            height: 50,
            background_color: Color::RGB(50, 50, 50),
            fill_color,
            low_color: Color::RGB(200, 0, 0),
            border_color: Color::RGB(0, 0, 0),
        }
    }
}

/// The four HUD bars: three stacked on the left, the boss bar on the right.
pub struct StatusBars {
    bars: Vec<(StatusBar, StatusBarStyle)>,
}

impl StatusBars {
    pub fn new() -> Self {
        StatusBars {
            bars: vec![
                (StatusBar::Health, StatusBarStyle::at(30, 10, Color::RGB(0, 200, 0))),
                (StatusBar::Coins, StatusBarStyle::at(30, 50, Color::RGB(230, 190, 0))),
                (StatusBar::Bottles, StatusBarStyle::at(30, 90, Color::RGB(0, 150, 200))),
                (StatusBar::BossHealth, StatusBarStyle::at(400, 10, Color::RGB(255, 140, 0))),
            ],
        }
    }

    pub fn style(&self, bar: StatusBar) -> Option<&StatusBarStyle> {
        self.bars.iter().find(|(b, _)| *b == bar).map(|(_, style)| style)
    }

    /// Every image any bar can show, for preloading.
    pub fn images() -> impl Iterator<Item = SpriteKey> {
        HEALTH_IMAGES
            .into_iter()
            .chain(COIN_IMAGES)
            .chain(BOTTLE_IMAGES)
            .chain(BOSS_IMAGES)
    }

    pub fn render(
        &self,
        canvas: &mut Canvas<Window>,
        textures: &mut TextureCache<'_>,
        hud: &Hud,
    ) -> Result<(), String> {
        for (bar, style) in &self.bars {
            let percentage = hud_value(hud, *bar);
            let step = status_step(percentage);
            let dst = Rect::new(style.x, style.y, style.width, style.height);
            match textures.get(image_for(*bar, step)) {
                Some(texture) => canvas.copy(texture, None, dst)?,
                None => render_fallback(canvas, style, step)?,
            }
        }
        Ok(())
    }
}

impl Default for StatusBars {
    fn default() -> Self {
        Self::new()
    }
}

fn hud_value(hud: &Hud, bar: StatusBar) -> u8 {
    match bar {
        StatusBar::Health => hud.health,
        StatusBar::Coins => hud.coins,
        StatusBar::Bottles => hud.bottles,
        StatusBar::BossHealth => hud.boss_health,
    }
}

fn image_for(bar: StatusBar, step: usize) -> SpriteKey {
    let images = match bar {
        StatusBar::Health => &HEALTH_IMAGES,
        StatusBar::Coins => &COIN_IMAGES,
        StatusBar::Bottles => &BOTTLE_IMAGES,
        StatusBar::BossHealth => &BOSS_IMAGES,
    };
    images[step.min(images.len() - 1)]
}

/// Procedural bar: background, fill for the step, border on top.
fn render_fallback(canvas: &mut Canvas<Window>, style: &StatusBarStyle, step: usize) -> Result<(), String> {
    let background = Rect::new(style.x, style.y, style.width, style.height);
    canvas.set_draw_color(style.background_color);
    canvas.fill_rect(background)?;

    let fraction = step as f32 / 5.0;
    let fill_width = (style.width as f32 * fraction) as u32;
    if fill_width > 0 {
        let fill = Rect::new(style.x, style.y, fill_width, style.height);
        let color = if fraction <= 0.3 {
            style.low_color
        } else {
            style.fill_color
        };
        canvas.set_draw_color(color);
        canvas.fill_rect(fill)?;
    }

    canvas.set_draw_color(style.border_color);
    canvas.draw_rect(background)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_matches_step() {
        assert_eq!(image_for(StatusBar::Health, status_step(95)), HEALTH_IMAGES[4]);
        assert_eq!(image_for(StatusBar::BossHealth, status_step(0)), BOSS_IMAGES[0]);
        assert_eq!(image_for(StatusBar::Coins, status_step(100)), COIN_IMAGES[5]);
    }

    #[test]
    fn test_layout_matches_overlay() {
        let bars = StatusBars::new();
        let boss = bars.style(StatusBar::BossHealth).map(|s| (s.x, s.y));
        assert_eq!(boss, Some((400, 10)));
        assert_eq!(StatusBars::images().count(), 24);
    }
}
