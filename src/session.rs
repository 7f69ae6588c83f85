//! Game orchestration
//!
//! Wraps the pure simulation with everything that touches the outside world:
//! writing results to the score log, the "new record" banner, and deciding
//! when the loop should stop.

use crate::consts::NEW_RECORD_NOTICE_TICKS;
use crate::highscores::{ScoreLog, ScoreLogError, ScoreRecord};
use crate::renderer::FrameView;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// What the driving loop should do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(ExitReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Player quit; the current length was saved
    Quit,
    /// Snake filled the board
    Won,
}

/// Transient banner shown after beating the previous best
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub length: u32,
    pub ticks_left: u32,
}

/// One player's run: owns the state and the score log
pub struct Session<L: ScoreLog> {
    state: GameState,
    log: L,
    nickname: String,
    best: u32,
    notice: Option<Notice>,
    exit: Option<ExitReason>,
}

impl<L: ScoreLog> Session<L> {
    /// Start a session. Reads the high score once; a malformed log fails here.
    pub fn new(state: GameState, log: L, nickname: impl Into<String>) -> Result<Self, ScoreLogError> {
        let best = log.read_high_score()?;
        log::info!("Session started, best length so far: {best}");
        Ok(Self {
            state,
            log,
            nickname: nickname.into(),
            best,
            notice: None,
            exit: None,
        })
    }

    /// Run one tick and act on its events
    pub fn step(&mut self, input: &TickInput) -> Result<Flow, ScoreLogError> {
        if let Some(reason) = self.exit {
            return Ok(Flow::Exit(reason));
        }

        if input.quit {
            return self.quit();
        }

        if let Some(notice) = self.notice.as_mut() {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
            if notice.ticks_left == 0 {
                self.notice = None;
            }
        }

        for event in tick(&mut self.state, input) {
            match event {
                GameEvent::AppleEaten { .. } => {}
                GameEvent::Collided { length } => {
                    let length = length as u32;
                    if self.record(length)? {
                        self.notice = Some(Notice {
                            length,
                            ticks_left: NEW_RECORD_NOTICE_TICKS,
                        });
                    }
                    log::info!("Collided at length {length}, starting over");
                    self.state.reset();
                }
                GameEvent::Won { length } => {
                    self.record(length as u32)?;
                    log::info!("Board filled at length {length}");
                    return Ok(self.finish(ExitReason::Won));
                }
            }
        }

        Ok(Flow::Continue)
    }

    /// Save the current length and stop. Also used when the host is shutting
    /// down between ticks.
    pub fn quit(&mut self) -> Result<Flow, ScoreLogError> {
        if let Some(reason) = self.exit {
            return Ok(Flow::Exit(reason));
        }
        let length = self.length();
        self.record(length)?;
        log::info!("Quit with length {length}");
        Ok(self.finish(ExitReason::Quit))
    }

    /// Read the previous best, append the result, report whether it's a new record
    fn record(&mut self, length: u32) -> Result<bool, ScoreLogError> {
        let previous = self.log.read_high_score()?;
        self.log
            .append_result(&ScoreRecord::now(&self.nickname, length))?;
        self.best = previous.max(length);
        Ok(length > previous)
    }

    fn finish(&mut self, reason: ExitReason) -> Flow {
        self.exit = Some(reason);
        Flow::Exit(reason)
    }

    /// Current target length of the snake
    pub fn length(&self) -> u32 {
        self.state.snake.length() as u32
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Best length known from the log (refreshed on every write)
    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            state: &self.state,
            best: self.best,
            notice: self.notice,
            won: self.state.phase == GamePhase::Won,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryScoreLog;
    use crate::sim::{Cell, Direction, Grid, Snake};

    fn colliding_state(seed: u64, tail_len: usize) -> GameState {
        // Head at (5,5) heading up; turning right runs into the body
        let mut cells = vec![
            Cell::new(5, 5),
            Cell::new(5, 6),
            Cell::new(6, 6),
            Cell::new(6, 5),
            Cell::new(6, 4),
        ];
        cells.extend((0..tail_len as i32).map(|i| Cell::new(7 + i, 4)));
        let mut state = GameState::new(seed);
        state.snake = Snake::from_body(cells, Direction::Up).expect("valid body");
        state.apple.position = Cell::new(20, 20);
        state
    }

    fn turn_right() -> TickInput {
        TickInput {
            directions: vec![Direction::Right],
            quit: false,
        }
    }

    #[test]
    fn test_malformed_log_fails_at_start() {
        let log = MemoryScoreLog::from_text("garbage line");
        assert!(Session::new(GameState::new(1), log, "USER").is_err());
    }

    #[test]
    fn test_collision_persists_and_resets() {
        let log = MemoryScoreLog::from_text("01.01.2024 (10:00:00)\tUSER\t3");
        let mut session = Session::new(colliding_state(4, 0), log, "viper").unwrap();
        assert_eq!(session.best(), 3);

        assert_eq!(session.step(&turn_right()).unwrap(), Flow::Continue);
        assert_eq!(session.log().lines().len(), 2);
        assert!(session.log().lines()[1].ends_with("\tviper\t5"));
        assert_eq!(session.best(), 5);
        assert_eq!(
            session.notice(),
            Some(Notice {
                length: 5,
                ticks_left: NEW_RECORD_NOTICE_TICKS
            })
        );
        assert_eq!(session.length(), 1);
        assert_eq!(session.state().phase, GamePhase::Running);
    }

    #[test]
    fn test_no_notice_below_record() {
        let log = MemoryScoreLog::from_text("01.01.2024 (10:00:00)\tUSER\t50");
        let mut session = Session::new(colliding_state(4, 2), log, "USER").unwrap();
        session.step(&turn_right()).unwrap();
        assert_eq!(session.notice(), None);
        assert_eq!(session.best(), 50);
        assert!(session.log().lines()[1].ends_with("\t7"));
    }

    #[test]
    fn test_notice_expires() {
        let mut session = Session::new(colliding_state(4, 0), MemoryScoreLog::new(), "USER").unwrap();
        session.step(&turn_right()).unwrap();
        assert!(session.notice().is_some());

        // A short snake heading straight can't run into itself
        for _ in 0..NEW_RECORD_NOTICE_TICKS {
            session.step(&TickInput::default()).unwrap();
        }
        assert_eq!(session.notice(), None);
    }

    #[test]
    fn test_quit_persists_current_length() {
        let mut session = Session::new(GameState::new(8), MemoryScoreLog::new(), "USER").unwrap();
        let input = TickInput {
            directions: vec![],
            quit: true,
        };
        assert_eq!(session.step(&input).unwrap(), Flow::Exit(ExitReason::Quit));
        assert_eq!(session.log().lines().len(), 1);
        assert!(session.log().lines()[0].ends_with("\tUSER\t1"));

        // Stays exited without writing again
        assert_eq!(session.step(&input).unwrap(), Flow::Exit(ExitReason::Quit));
        assert_eq!(session.log().lines().len(), 1);
    }

    #[test]
    fn test_quit_between_ticks_saves_grown_length() {
        let mut state = GameState::new(8);
        let head = state.snake.head();
        state.apple.position = state.grid.step(head, Direction::Right);
        let mut session = Session::new(state, MemoryScoreLog::new(), "viper").unwrap();

        assert_eq!(session.step(&TickInput::default()).unwrap(), Flow::Continue);
        assert_eq!(session.length(), 2);

        assert_eq!(session.quit().unwrap(), Flow::Exit(ExitReason::Quit));
        assert_eq!(session.exit_reason(), Some(ExitReason::Quit));
        assert_eq!(session.log().lines().len(), 1);
        assert!(session.log().lines()[0].ends_with("\tviper\t2"));

        // A second shutdown signal doesn't write again
        assert_eq!(session.quit().unwrap(), Flow::Exit(ExitReason::Quit));
        assert_eq!(session.log().lines().len(), 1);
    }

    #[test]
    fn test_win_writes_one_record_and_exits() {
        let grid = Grid::new(3, 1);
        let mut state = GameState::with_grid(grid, 2);
        state.snake =
            Snake::from_body([Cell::new(1, 0), Cell::new(0, 0)], Direction::Right).expect("valid body");
        state.apple.position = Cell::new(2, 0);

        let mut session = Session::new(state, MemoryScoreLog::new(), "USER").unwrap();
        let flow = session.step(&TickInput::default()).unwrap();
        assert_eq!(flow, Flow::Exit(ExitReason::Won));
        assert_eq!(session.log().lines().len(), 1);
        assert!(session.log().lines()[0].ends_with("\t3"));
        assert!(session.view().won);
    }
}
