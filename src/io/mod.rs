use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use crate::GameEvent;

pub mod clock;
pub mod keys;

pub use clock::AdvanceClock;
pub use keys::map_key;

// Longest wait for a key before the loop gets control back.
const POLL: Duration = Duration::from_millis(50);

pub enum Next {
    Event(GameEvent),
    Idle,
    #[cfg(test)]
    Closed,
}

/// Feeds the game loop one event at a time.
pub trait EventSource {
    /// `interval` is the current time between stack advances, or `None`
    /// when the stack should not advance at all.
    fn next_event(&mut self, interval: Option<Duration>) -> Result<Next>;
}

/// Key presses from the terminal interleaved with advance ticks.
pub struct TerminalEvents {
    clock: AdvanceClock,
}

impl TerminalEvents {
    pub fn new() -> Self {
        Self {
            clock: AdvanceClock::new(),
        }
    }
}

impl EventSource for TerminalEvents {
    fn next_event(&mut self, interval: Option<Duration>) -> Result<Next> {
        let timeout = match interval {
            Some(interval) => {
                self.clock.resume();
                let wait = self.clock.remaining(interval);
                if wait.is_zero() {
                    self.clock.mark();
                    return Ok(Next::Event(GameEvent::Tick));
                }
                wait.min(POLL)
            }
            None => {
                self.clock.hold();
                POLL
            }
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(ev) = map_key(key) {
                        return Ok(Next::Event(ev));
                    }
                }
            }
        }
        Ok(Next::Idle)
    }
}

/// Replays a fixed list of events, then reports the source closed.
#[cfg(test)]
pub(crate) struct ScriptedEvents {
    events: std::collections::VecDeque<GameEvent>,
    pub(crate) intervals: Vec<Option<Duration>>,
}

#[cfg(test)]
impl ScriptedEvents {
    pub(crate) fn new(events: &[GameEvent]) -> Self {
        Self {
            events: events.iter().copied().collect(),
            intervals: Vec::new(),
        }
    }
}

#[cfg(test)]
impl EventSource for ScriptedEvents {
    fn next_event(&mut self, interval: Option<Duration>) -> Result<Next> {
        self.intervals.push(interval);
        Ok(match self.events.pop_front() {
            Some(ev) => Next::Event(ev),
            None => Next::Closed,
        })
    }
}
