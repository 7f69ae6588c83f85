//! Scene drawing
//!
//! Full frames clear the board and paint every sprite. On canvases that keep
//! the previous frame, an ordinary tick only erases the cell the tail just
//! left and paints the new head and the apple.

use glam::Vec2;

use super::{Canvas, FrameView, Palette, Rgb};
use crate::consts::*;
use crate::sim::{Cell, ScreenRect};

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Apple,
    SnakeSegment,
}

impl Sprite {
    pub fn fill(self, palette: &Palette) -> Rgb {
        match self {
            Sprite::Apple => palette.apple,
            Sprite::SnakeSegment => palette.snake,
        }
    }
}

/// Identity of the last presented frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameKey {
    tick: u64,
    resets: u32,
    banner: bool,
}

pub struct Renderer {
    palette: Palette,
    cell_borders: bool,
    last: Option<FrameKey>,
}

impl Renderer {
    pub fn new(palette: Palette, cell_borders: bool) -> Self {
        Self {
            palette,
            cell_borders,
            last: None,
        }
    }

    /// Force the next frame to be drawn in full
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn render<C: Canvas>(&mut self, view: &FrameView<'_>, canvas: &mut C) -> Result<(), C::Error> {
        let state = view.state;
        let key = FrameKey {
            tick: state.time_ticks,
            resets: state.resets,
            banner: view.notice.is_some() || view.won,
        };

        let incremental = canvas.retains_frame()
            && self.last.is_some_and(|last| {
                last.resets == key.resets
                    && last.tick + 1 == key.tick
                    && !last.banner
                    && !key.banner
            });

        if incremental {
            if let Some(cell) = state.snake.last_vacated() {
                canvas.draw_rect(cell.screen_rect(), self.palette.background)?;
            }
            self.draw_sprite(canvas, state.snake.head(), Sprite::SnakeSegment)?;
            self.draw_sprite(canvas, state.apple.position, Sprite::Apple)?;
        } else {
            canvas.clear(self.palette.background)?;
            self.draw_sprite(canvas, state.apple.position, Sprite::Apple)?;
            for cell in state.snake.body() {
                self.draw_sprite(canvas, cell, Sprite::SnakeSegment)?;
            }
        }

        self.draw_status(view, canvas)?;

        let board_center = Vec2::new(SCREEN_WIDTH as f32 / 2.0, SCREEN_HEIGHT as f32 / 2.0);
        if view.won {
            let message = format!("You won! Length {}", state.snake.length());
            canvas.draw_text(&message, self.palette.notice, board_center)?;
        } else if let Some(notice) = view.notice {
            let message = format!("New record: {}!", notice.length);
            canvas.draw_text(&message, self.palette.notice, board_center)?;
        }

        canvas.present_frame()?;
        self.last = Some(key);
        Ok(())
    }

    fn draw_sprite<C: Canvas>(&self, canvas: &mut C, cell: Cell, sprite: Sprite) -> Result<(), C::Error> {
        let rect = cell.screen_rect();
        if self.cell_borders {
            canvas.draw_rect(rect, self.palette.border)?;
            canvas.draw_rect(rect.inset(1), sprite.fill(&self.palette))
        } else {
            canvas.draw_rect(rect, sprite.fill(&self.palette))
        }
    }

    fn draw_status<C: Canvas>(&self, view: &FrameView<'_>, canvas: &mut C) -> Result<(), C::Error> {
        let bar = ScreenRect {
            x: 0,
            y: SCREEN_HEIGHT,
            w: SCREEN_WIDTH,
            h: STATUS_BAR_HEIGHT,
        };
        canvas.draw_rect(bar, self.palette.status_bar)?;

        let text = format!("Length: {}   Best: {}", view.state.snake.length(), view.best);
        let center = Vec2::new(
            SCREEN_WIDTH as f32 / 2.0,
            SCREEN_HEIGHT as f32 + STATUS_BAR_HEIGHT as f32 / 2.0,
        );
        canvas.draw_text(&text, self.palette.text, center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Notice;
    use crate::sim::{Direction, GameState, Snake, TickInput, tick};
    use std::convert::Infallible;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear(Rgb),
        Rect(ScreenRect, Rgb),
        Text(String),
        Present,
    }

    #[derive(Default)]
    struct Recorder {
        retained: bool,
        ops: Vec<Op>,
    }

    impl Recorder {
        fn take(&mut self) -> Vec<Op> {
            std::mem::take(&mut self.ops)
        }
    }

    impl Canvas for Recorder {
        type Error = Infallible;

        fn retains_frame(&self) -> bool {
            self.retained
        }

        fn clear(&mut self, color: Rgb) -> Result<(), Infallible> {
            self.ops.push(Op::Clear(color));
            Ok(())
        }

        fn draw_rect(&mut self, rect: ScreenRect, color: Rgb) -> Result<(), Infallible> {
            self.ops.push(Op::Rect(rect, color));
            Ok(())
        }

        fn draw_text(&mut self, message: &str, _color: Rgb, _center: Vec2) -> Result<(), Infallible> {
            self.ops.push(Op::Text(message.to_string()));
            Ok(())
        }

        fn present_frame(&mut self) -> Result<(), Infallible> {
            self.ops.push(Op::Present);
            Ok(())
        }
    }

    fn view(state: &GameState) -> FrameView<'_> {
        FrameView {
            state,
            best: 9,
            notice: None,
            won: false,
        }
    }

    fn moving_state() -> GameState {
        let mut state = GameState::new(11);
        state.snake = Snake::from_body(
            [Cell::new(10, 3), Cell::new(9, 3), Cell::new(8, 3)],
            Direction::Right,
        )
        .expect("valid body");
        state.apple.position = Cell::new(0, 20);
        state
    }

    #[test]
    fn test_full_frame_draws_everything() {
        let state = moving_state();
        let mut renderer = Renderer::new(Palette::STANDARD, false);
        let mut canvas = Recorder::default();
        renderer.render(&view(&state), &mut canvas).unwrap();

        let ops = canvas.take();
        assert_eq!(ops[0], Op::Clear(Palette::STANDARD.background));
        let snake_rects = ops
            .iter()
            .filter(|op| matches!(op, Op::Rect(_, c) if *c == Palette::STANDARD.snake))
            .count();
        assert_eq!(snake_rects, 3);
        assert!(ops.contains(&Op::Text("Length: 3   Best: 9".into())));
        assert_eq!(ops.last(), Some(&Op::Present));
    }

    #[test]
    fn test_retained_canvas_erases_vacated_tail() {
        let mut state = moving_state();
        let mut renderer = Renderer::new(Palette::STANDARD, false);
        let mut canvas = Recorder {
            retained: true,
            ..Default::default()
        };
        renderer.render(&view(&state), &mut canvas).unwrap();
        canvas.take();

        tick(&mut state, &TickInput::default());
        renderer.render(&view(&state), &mut canvas).unwrap();
        let ops = canvas.take();

        assert!(!ops.iter().any(|op| matches!(op, Op::Clear(_))));
        assert_eq!(
            ops[0],
            Op::Rect(Cell::new(8, 3).screen_rect(), Palette::STANDARD.background)
        );
        assert_eq!(
            ops[1],
            Op::Rect(Cell::new(11, 3).screen_rect(), Palette::STANDARD.snake)
        );
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut state = moving_state();
        let mut renderer = Renderer::new(Palette::STANDARD, false);
        let mut canvas = Recorder {
            retained: true,
            ..Default::default()
        };
        renderer.render(&view(&state), &mut canvas).unwrap();
        canvas.take();

        tick(&mut state, &TickInput::default());
        renderer.invalidate();
        renderer.render(&view(&state), &mut canvas).unwrap();
        let ops = canvas.take();
        assert_eq!(ops[0], Op::Clear(Palette::STANDARD.background));
        let snake_rects = ops
            .iter()
            .filter(|op| matches!(op, Op::Rect(_, c) if *c == Palette::STANDARD.snake))
            .count();
        assert_eq!(snake_rects, 3);
    }

    #[test]
    fn test_immediate_canvas_always_clears() {
        let mut state = moving_state();
        let mut renderer = Renderer::new(Palette::STANDARD, true);
        let mut canvas = Recorder::default();
        renderer.render(&view(&state), &mut canvas).unwrap();
        tick(&mut state, &TickInput::default());
        canvas.take();

        renderer.render(&view(&state), &mut canvas).unwrap();
        assert!(matches!(canvas.take()[0], Op::Clear(_)));
    }

    #[test]
    fn test_banner_forces_full_redraw_and_text() {
        let mut state = moving_state();
        let mut renderer = Renderer::new(Palette::STANDARD, false);
        let mut canvas = Recorder {
            retained: true,
            ..Default::default()
        };
        renderer.render(&view(&state), &mut canvas).unwrap();
        canvas.take();

        tick(&mut state, &TickInput::default());
        let frame = FrameView {
            notice: Some(Notice {
                length: 12,
                ticks_left: 5,
            }),
            ..view(&state)
        };
        renderer.render(&frame, &mut canvas).unwrap();
        let ops = canvas.take();
        assert!(matches!(ops[0], Op::Clear(_)));
        assert!(ops.contains(&Op::Text("New record: 12!".into())));
    }

    #[test]
    fn test_borders_inset_fill() {
        let state = moving_state();
        let mut renderer = Renderer::new(Palette::STANDARD, true);
        let mut canvas = Recorder::default();
        renderer.render(&view(&state), &mut canvas).unwrap();

        let apple = Cell::new(0, 20).screen_rect();
        let ops = canvas.take();
        assert_eq!(ops[1], Op::Rect(apple, Palette::STANDARD.border));
        assert_eq!(ops[2], Op::Rect(apple.inset(1), Palette::STANDARD.apple));
    }
}
