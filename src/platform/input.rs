//! Keyboard input
//!
//! Backends translate their native events into [`InputEvent`]s; once per tick
//! the loop drains them and folds the batch into a [`TickInput`].

use std::convert::Infallible;

use crate::sim::{Direction, TickInput};

/// Keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Char(char),
    Other,
}

impl Key {
    /// Arrow keys and WASD steer
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up | Key::Char('w' | 'W') => Some(Direction::Up),
            Key::Down | Key::Char('s' | 'S') => Some(Direction::Down),
            Key::Left | Key::Char('a' | 'A') => Some(Direction::Left),
            Key::Right | Key::Char('d' | 'D') => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn is_quit(self) -> bool {
        matches!(self, Key::Escape | Key::Char('q' | 'Q'))
    }

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_web(key: &str) -> Self {
        match key {
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "Escape" => Key::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed / interrupt
    Quit,
    KeyDown(Key),
}

/// Something that can be drained for input once per tick. Never blocks;
/// an empty batch is normal.
pub trait InputSource {
    type Error;

    fn poll_events(&mut self) -> Result<Vec<InputEvent>, Self::Error>;
}

/// Fold a batch of events into the input for one tick
pub fn tick_input(events: &[InputEvent]) -> TickInput {
    let mut input = TickInput::default();
    for event in events {
        match *event {
            InputEvent::Quit => input.quit = true,
            InputEvent::KeyDown(key) if key.is_quit() => input.quit = true,
            InputEvent::KeyDown(key) => {
                if let Some(dir) = key.direction() {
                    input.directions.push(dir);
                }
            }
        }
    }
    input
}

/// Events pushed from callbacks, drained by the tick loop (used on the web)
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<InputEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }
}

impl InputSource for EventQueue {
    type Error = Infallible;

    fn poll_events(&mut self) -> Result<Vec<InputEvent>, Infallible> {
        Ok(std::mem::take(&mut self.events))
    }
}
