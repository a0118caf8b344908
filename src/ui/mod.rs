use std::io::Stdout;

use anyhow::Result;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::game::Snapshot;

pub mod render;

pub use render::draw_game;

/// Anything that can show a game snapshot.
pub trait RenderSink {
    fn present(&mut self, snap: &Snapshot) -> Result<()>;
}

impl RenderSink for Terminal<CrosstermBackend<Stdout>> {
    fn present(&mut self, snap: &Snapshot) -> Result<()> {
        self.draw(|frame| draw_game(frame, snap))?;
        Ok(())
    }
}
