pub mod matching;
pub mod scoring;
pub mod source;
pub mod stack;
pub mod state;

pub use matching::{Resolution, MIN_RUN};
pub use scoring::resolution_score;
pub use source::{PanelSource, RandomSource};
pub use stack::{Cell, Direction, Pos, ReachedEdge, Stack};
pub use state::{Flow, Game, GameEvent, Snapshot};
