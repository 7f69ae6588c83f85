//! Terminal backend (native only)
//!
//! Every board cell is two terminal columns wide; one extra row below the
//! board holds the status line. The terminal keeps what was printed, so the
//! renderer may repaint only changed cells.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use glam::Vec2;

use super::input::{InputEvent, InputSource, Key, tick_input};
use super::time::Ticker;
use crate::consts::*;
use crate::highscores::ScoreLog;
use crate::renderer::{Canvas, Renderer, Rgb};
use crate::session::{ExitReason, Flow, Session};
use crate::sim::ScreenRect;

const COLS: i32 = GRID_WIDTH;
const ROWS: i32 = (SCREEN_HEIGHT + STATUS_BAR_HEIGHT) / CELL_SIZE;

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Raw-mode alternate screen; restored on drop
pub struct Terminal {
    out: Stdout,
    /// Fill color of each board cell, so text can sit on the right background
    backgrounds: Vec<Rgb>,
}

impl Terminal {
    pub fn enter() -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        if (cols as i32) < COLS * 2 || (rows as i32) < ROWS {
            log::warn!(
                "Terminal is {cols}x{rows}, the board needs {}x{}",
                COLS * 2,
                ROWS
            );
        }

        enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

        Ok(Self {
            out,
            backgrounds: vec![Rgb(0, 0, 0); (COLS * ROWS) as usize],
        })
    }

    /// Board cells covered by a pixel rect, clipped to the screen
    fn covered(rect: ScreenRect) -> impl Iterator<Item = (i32, i32)> {
        let (c0, r0) = (rect.x / CELL_SIZE, rect.y / CELL_SIZE);
        let (c1, r1) = if rect.w > 0 && rect.h > 0 {
            ((rect.x + rect.w - 1) / CELL_SIZE, (rect.y + rect.h - 1) / CELL_SIZE)
        } else {
            (c0 - 1, r0 - 1)
        };
        (r0.max(0)..=r1.min(ROWS - 1))
            .flat_map(move |row| (c0.max(0)..=c1.min(COLS - 1)).map(move |col| (col, row)))
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

impl Canvas for Terminal {
    type Error = io::Error;

    fn retains_frame(&self) -> bool {
        true
    }

    fn clear(&mut self, rgb: Rgb) -> io::Result<()> {
        self.backgrounds.fill(rgb);
        queue!(self.out, SetBackgroundColor(color(rgb)), Clear(ClearType::All))
    }

    fn draw_rect(&mut self, rect: ScreenRect, rgb: Rgb) -> io::Result<()> {
        queue!(self.out, SetBackgroundColor(color(rgb)))?;
        for (col, row) in Self::covered(rect) {
            self.backgrounds[(row * COLS + col) as usize] = rgb;
            queue!(self.out, MoveTo((col * 2) as u16, row as u16), Print("  "))?;
        }
        Ok(())
    }

    fn draw_text(&mut self, message: &str, rgb: Rgb, center: Vec2) -> io::Result<()> {
        let row = (center.y / CELL_SIZE as f32) as i32;
        if !(0..ROWS).contains(&row) {
            return Ok(());
        }
        let mid = (center.x / CELL_SIZE as f32 * 2.0) as i32;
        let start = mid - message.chars().count() as i32 / 2;

        queue!(self.out, SetForegroundColor(color(rgb)))?;
        for (i, ch) in message.chars().enumerate() {
            let x = start + i as i32;
            if !(0..COLS * 2).contains(&x) {
                continue;
            }
            let bg = self.backgrounds[(row * COLS + x / 2) as usize];
            queue!(
                self.out,
                MoveTo(x as u16, row as u16),
                SetBackgroundColor(color(bg)),
                Print(ch)
            )?;
        }
        Ok(())
    }

    fn present_frame(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

impl InputSource for Terminal {
    type Error = io::Error;

    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                let event = match code {
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        InputEvent::Quit
                    }
                    KeyCode::Up => InputEvent::KeyDown(Key::Up),
                    KeyCode::Down => InputEvent::KeyDown(Key::Down),
                    KeyCode::Left => InputEvent::KeyDown(Key::Left),
                    KeyCode::Right => InputEvent::KeyDown(Key::Right),
                    KeyCode::Esc => InputEvent::KeyDown(Key::Escape),
                    KeyCode::Char(c) => InputEvent::KeyDown(Key::Char(c)),
                    _ => InputEvent::KeyDown(Key::Other),
                };
                events.push(event);
            }
        }
        Ok(events)
    }
}

/// Run the session in the terminal until it exits; the terminal is restored
/// before returning
pub fn play<L: ScoreLog>(session: &mut Session<L>, renderer: &mut Renderer) -> crate::Result<ExitReason> {
    let mut terminal = Terminal::enter()?;
    let mut ticker = Ticker::new(crate::tick_duration());
    renderer.render(&session.view(), &mut terminal)?;

    loop {
        let events = terminal.poll_events()?;
        let flow = session.step(&tick_input(&events))?;
        renderer.render(&session.view(), &mut terminal)?;
        if let Flow::Exit(reason) = flow {
            if reason == ExitReason::Won {
                // Leave the winning board up for a moment
                std::thread::sleep(Duration::from_secs(2));
            }
            return Ok(reason);
        }
        ticker.wait();
    }
}
