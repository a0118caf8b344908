use std::io::{stdout, Stdout};

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use crate::game::{Flow, RandomSource};
use crate::io::{EventSource, Next, TerminalEvents};
use crate::ui::RenderSink;
use crate::{Config, Game};

type Term = Terminal<CrosstermBackend<Stdout>>;

pub fn run(mut config: Config) -> Result<()> {
    let (cols, rows) = terminal::size().context("cannot read terminal size")?;
    if config.fit_to(cols, rows) {
        warn!(
            cols,
            rows,
            length = config.length,
            width = config.width,
            "stack shrunk to fit the terminal"
        );
    }

    let mut tui = TuiGuard::new()?;
    let source = RandomSource::seeded(config.seed);
    let mut game = Game::new(config, Box::new(source));
    let mut events = TerminalEvents::new();
    run_loop(&mut game, &mut events, tui.terminal_mut())?;
    info!(score = game.score, "quit");
    Ok(())
}

/// Pulls events one at a time and hands each to the game, presenting a
/// fresh snapshot after every one. Returns on quit or once `events` closes.
pub fn run_loop(
    game: &mut Game,
    events: &mut impl EventSource,
    sink: &mut impl RenderSink,
) -> Result<()> {
    sink.present(&game.snapshot())?;
    loop {
        match events.next_event(game.advance_interval())? {
            Next::Event(event) => {
                if game.handle(event) == Flow::Quit {
                    break;
                }
                sink.present(&game.snapshot())?;
            }
            Next::Idle => {}
            #[cfg(test)]
            Next::Closed => break,
        }
    }
    Ok(())
}

struct TuiGuard {
    terminal: Term,
}

impl TuiGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Term {
        &mut self.terminal
    }
}

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::game::source::ScriptedSource;
    use crate::game::state::Mode;
    use crate::game::{Direction, Snapshot};
    use crate::io::ScriptedEvents;
    use crate::GameEvent;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(u64, bool, bool, bool)>,
    }

    impl RenderSink for Recorder {
        fn present(&mut self, snap: &Snapshot) -> Result<()> {
            self.frames
                .push((snap.score, snap.select, snap.paused, snap.game_over));
            Ok(())
        }
    }

    fn small_game() -> Game {
        let config = Config {
            width: 3,
            length: 8,
            symbols: vec!['A', 'B', 'C'],
            ..Config::default()
        };
        Game::new(config, Box::new(ScriptedSource::new(&[0, 1, 2, 1])))
    }

    #[test]
    fn test_presents_after_every_event() {
        let mut game = small_game();
        let mut events = ScriptedEvents::new(&[
            GameEvent::ToggleSelect,
            GameEvent::TogglePause,
            GameEvent::TogglePause,
        ]);
        let mut sink = Recorder::default();

        run_loop(&mut game, &mut events, &mut sink).unwrap();

        assert_eq!(
            sink.frames,
            vec![
                (0, false, false, false),
                (0, true, false, false),
                (0, true, true, false),
                (0, true, false, false),
            ]
        );
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let mut game = small_game();
        let mut events = ScriptedEvents::new(&[
            GameEvent::Move(Direction::Right),
            GameEvent::Quit,
            GameEvent::ToggleSelect,
        ]);
        let mut sink = Recorder::default();

        run_loop(&mut game, &mut events, &mut sink).unwrap();

        // Initial frame plus the move; nothing after quit.
        assert_eq!(sink.frames.len(), 2);
        assert!(!game.select);
    }

    #[test]
    fn test_pacing_follows_mode() {
        let mut game = small_game();
        let mut events = ScriptedEvents::new(&[GameEvent::TogglePause, GameEvent::TogglePause]);
        let mut sink = Recorder::default();

        run_loop(&mut game, &mut events, &mut sink).unwrap();

        let running = Some(Duration::from_secs(2));
        assert_eq!(events.intervals, vec![running, None, running]);
        assert_eq!(game.mode, Mode::Running);
    }

    #[test]
    fn test_ticks_until_game_over() {
        let mut game = small_game();
        let ticks = vec![GameEvent::Tick; 20];
        let mut events = ScriptedEvents::new(&ticks);
        let mut sink = Recorder::default();

        run_loop(&mut game, &mut events, &mut sink).unwrap();

        assert_eq!(game.mode, Mode::GameOver);
        assert!(sink.frames.last().is_some_and(|frame| frame.3));
        // The last interval requested was for a finished game.
        assert_eq!(events.intervals.last(), Some(&None));
    }
}
