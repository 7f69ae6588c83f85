//! Rendering
//!
//! `Canvas` is the drawing surface contract; `scene::Renderer` turns a
//! [`FrameView`] into canvas calls. The WebGPU pipeline is one canvas
//! backend, the terminal (see `platform::terminal`) is another.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Renderer, Sprite};

use glam::Vec2;

use crate::session::Notice;
use crate::settings::Settings;
use crate::sim::{GameState, ScreenRect};

/// 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear RGBA for an sRGB render target
    pub fn to_linear_rgba(self) -> [f32; 4] {
        fn channel(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [channel(self.0), channel(self.1), channel(self.2), 1.0]
    }
}

/// Colors for game elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub border: Rgb,
    pub apple: Rgb,
    pub snake: Rgb,
    pub status_bar: Rgb,
    pub text: Rgb,
    pub notice: Rgb,
}

impl Palette {
    pub const STANDARD: Palette = Palette {
        background: Rgb(51, 51, 51),
        border: Rgb(204, 204, 204),
        apple: Rgb(220, 20, 60),
        snake: Rgb(34, 139, 34),
        status_bar: Rgb(30, 30, 30),
        text: Rgb(255, 255, 255),
        notice: Rgb(255, 215, 0),
    };

    pub const HIGH_CONTRAST: Palette = Palette {
        background: Rgb(0, 0, 0),
        border: Rgb(255, 255, 255),
        apple: Rgb(255, 0, 0),
        snake: Rgb(0, 255, 0),
        status_bar: Rgb(0, 0, 0),
        text: Rgb(255, 255, 255),
        notice: Rgb(255, 255, 0),
    };

    pub fn for_settings(settings: &Settings) -> Self {
        if settings.high_contrast {
            Self::HIGH_CONTRAST
        } else {
            Self::STANDARD
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub state: &'a GameState,
    pub best: u32,
    pub notice: Option<Notice>,
    pub won: bool,
}

/// Drawing surface
///
/// Rects and text positions are in screen pixels of the logical
/// `SCREEN_WIDTH x (SCREEN_HEIGHT + STATUS_BAR_HEIGHT)` view.
pub trait Canvas {
    type Error;

    /// True when the previous frame is still on screen as the next one starts,
    /// so a frame may repaint only what changed.
    fn retains_frame(&self) -> bool {
        false
    }

    fn clear(&mut self, color: Rgb) -> Result<(), Self::Error>;

    fn draw_rect(&mut self, rect: ScreenRect, color: Rgb) -> Result<(), Self::Error>;

    fn draw_text(&mut self, message: &str, color: Rgb, center: Vec2) -> Result<(), Self::Error>;

    fn present_frame(&mut self) -> Result<(), Self::Error>;
}
