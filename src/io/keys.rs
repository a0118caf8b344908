//! Key mapping from terminal events to game events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;
use crate::GameEvent;

pub fn map_key(key: KeyEvent) -> Option<GameEvent> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(GameEvent::Quit);
    }
    match key.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => {
            Some(GameEvent::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => {
            Some(GameEvent::Move(Direction::Right))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => {
            Some(GameEvent::Move(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => {
            Some(GameEvent::Move(Direction::Down))
        }

        KeyCode::Char(' ') | KeyCode::Enter => Some(GameEvent::ToggleSelect),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(GameEvent::TogglePause),

        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('r') | KeyCode::Char('R') => {
            Some(GameEvent::Restart)
        }
        KeyCode::Char('n') | KeyCode::Char('N') => Some(GameEvent::Decline),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(GameEvent::Quit),

        _ => None,
    }
}
