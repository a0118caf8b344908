use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ADVANCE_SECS;
use crate::game::{resolution_score, Direction, PanelSource, Pos, ReachedEdge, Stack};
use crate::Config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Running,
    Paused,
    GameOver,
}

/// Everything the loop can be told: key presses already mapped to intents,
/// plus clock ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Move(Direction),
    ToggleSelect,
    TogglePause,
    Tick,
    Restart,
    Decline,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Read-only view handed to the renderer after every event.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub stack: &'a Stack,
    pub cursor: Pos,
    pub select: bool,
    pub paused: bool,
    pub game_over: bool,
    pub score: u64,
    pub rate: f64,
    pub cleared: u64,
    pub chain: usize,
}

pub struct Game {
    pub stack: Stack,
    pub cursor: Pos,
    pub select: bool,
    pub mode: Mode,
    pub score: u64,
    pub rate: f64,
    pub cleared: u64,
    pub last_chain: usize,
    config: Config,
    source: Box<dyn PanelSource>,
}

impl Game {
    pub fn new(config: Config, mut source: Box<dyn PanelSource>) -> Self {
        let stack = Stack::generate(config.width, config.length, &config.symbols, source.as_mut());
        info!(
            width = config.width,
            length = config.length,
            rate = config.rate,
            symbols = ?config.symbols,
            "new game"
        );
        Self::with_stack(config, stack, source)
    }

    fn with_stack(config: Config, stack: Stack, source: Box<dyn PanelSource>) -> Self {
        Self {
            cursor: start_cursor(&stack),
            stack,
            select: false,
            mode: Mode::Running,
            score: 0,
            rate: config.rate,
            cleared: 0,
            last_chain: 0,
            config,
            source,
        }
    }

    pub fn handle(&mut self, event: GameEvent) -> Flow {
        match (self.mode, event) {
            (_, GameEvent::Quit) => return Flow::Quit,
            (Mode::GameOver, GameEvent::Decline) => return Flow::Quit,
            (Mode::GameOver, GameEvent::Restart) => self.restart(),
            (Mode::GameOver, _) => {}
            (Mode::Running, GameEvent::TogglePause) => self.mode = Mode::Paused,
            (Mode::Paused, GameEvent::TogglePause) => self.mode = Mode::Running,
            (Mode::Paused, _) => {}
            (Mode::Running, GameEvent::Tick) => self.tick(),
            (Mode::Running, GameEvent::Move(dir)) => self.move_cursor(dir),
            (Mode::Running, GameEvent::ToggleSelect) => self.select = !self.select,
            (Mode::Running, GameEvent::Restart | GameEvent::Decline) => {}
        }
        Flow::Continue
    }

    /// Time between stack advances, or `None` while the stack is held.
    pub fn advance_interval(&self) -> Option<Duration> {
        (self.mode == Mode::Running).then(|| Duration::from_secs_f64(ADVANCE_SECS / self.rate))
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            stack: &self.stack,
            cursor: self.cursor,
            select: self.select,
            paused: self.mode == Mode::Paused,
            game_over: self.mode == Mode::GameOver,
            score: self.score,
            rate: self.rate,
            cleared: self.cleared,
            chain: self.last_chain,
        }
    }

    fn tick(&mut self) {
        match self.stack.advance(self.source.as_mut()) {
            Ok(()) => {
                // The cursor rides along with the panel under it.
                self.cursor.col = (self.cursor.col + 1).min(self.stack.length - 1);
                self.clear_matches();
            }
            Err(ReachedEdge) => {
                self.mode = Mode::GameOver;
                info!(score = self.score, cleared = self.cleared, "stack reached the edge");
            }
        }
    }

    fn move_cursor(&mut self, dir: Direction) {
        let Some(next) = self.cursor.step(dir, self.stack.width, self.stack.length) else {
            return;
        };
        let prev = self.cursor;
        self.cursor = next;
        if !self.select {
            return;
        }
        if let Err(err) = self.stack.swap(prev, next) {
            warn!(%err, "swap rejected");
            return;
        }
        self.clear_matches();
    }

    fn clear_matches(&mut self) {
        let resolution = self.stack.resolve_matches();
        if resolution.is_empty() {
            return;
        }
        let gained = resolution_score(&resolution);
        let removed = resolution.removed();
        self.score += gained;
        self.cleared += removed as u64;
        self.rate += self.config.rate_step * removed as f64;
        self.last_chain = resolution.passes.len();
        debug!(gained, removed, chain = self.last_chain, rate = self.rate, "scored");
    }

    fn restart(&mut self) {
        info!(final_score = self.score, "restarting");
        self.stack = Stack::generate(
            self.config.width,
            self.config.length,
            &self.config.symbols,
            self.source.as_mut(),
        );
        self.cursor = start_cursor(&self.stack);
        self.select = false;
        self.mode = Mode::Running;
        self.score = 0;
        self.rate = self.config.rate;
        self.cleared = 0;
        self.last_chain = 0;
    }
}

fn start_cursor(stack: &Stack) -> Pos {
    Pos::new(stack.width / 2, 0)
}
