//! Match detection, gravity and cascade resolution for the [`Stack`].
//!
//! Runs are found along both axes: across columns within a row and across
//! rows within a column. Gravity works inside each column, pulling panels
//! toward the bottom row (`width - 1`).

use tracing::debug;

use crate::game::{Cell, Pos, Stack};

/// Shortest run that clears.
pub const MIN_RUN: usize = 3;

/// One resolve pass: the length of every qualifying run and the number of
/// distinct panels removed. A panel on two crossing runs is counted in both
/// `runs` entries but removed once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pass {
    pub runs: Vec<usize>,
    pub removed: usize,
}

/// Every pass of one resolution episode, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub passes: Vec<Pass>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn removed(&self) -> usize {
        self.passes.iter().map(|pass| pass.removed).sum()
    }
}

impl Stack {
    /// Settles the grid, then clears matches pass by pass until none remain.
    pub fn resolve_matches(&mut self) -> Resolution {
        let mut resolution = Resolution::default();
        self.settle();

        loop {
            let (runs, marked) = self.scan_runs();
            if runs.is_empty() {
                break;
            }
            let mut removed = 0;
            for (cell, hit) in self.cells.iter_mut().zip(&marked) {
                if *hit {
                    *cell = Cell::Empty;
                    removed += 1;
                }
            }
            self.settle();
            debug!(pass = resolution.passes.len() + 1, removed, ?runs, "cleared matches");
            resolution.passes.push(Pass { runs, removed });
        }
        resolution
    }

    /// Drops every panel to the bottom of its column. Returns whether anything moved.
    pub fn settle(&mut self) -> bool {
        let mut moved = false;
        for col in 0..self.length {
            let start = col * self.width;
            let column = &mut self.cells[start..start + self.width];
            let panels: Vec<Cell> = column.iter().copied().filter(|c| c.is_filled()).collect();
            let gap = column.len() - panels.len();
            let settled = std::iter::repeat(Cell::Empty).take(gap).chain(panels);
            for (slot, cell) in column.iter_mut().zip(settled) {
                if *slot != cell {
                    *slot = cell;
                    moved = true;
                }
            }
        }
        moved
    }

    // Lengths of all runs >= MIN_RUN and a removal mask over `cells`.
    fn scan_runs(&self) -> (Vec<usize>, Vec<bool>) {
        let mut runs = Vec::new();
        let mut marked = vec![false; self.cells.len()];

        for row in 0..self.width {
            let line: Vec<Pos> = (0..self.length).map(|col| Pos::new(row, col)).collect();
            self.mark_line(&line, &mut runs, &mut marked);
        }
        for col in 0..self.length {
            let line: Vec<Pos> = (0..self.width).map(|row| Pos::new(row, col)).collect();
            self.mark_line(&line, &mut runs, &mut marked);
        }
        (runs, marked)
    }

    fn mark_line(&self, line: &[Pos], runs: &mut Vec<usize>, marked: &mut [bool]) {
        let mut start = 0;
        while start < line.len() {
            let Some(panel) = self.get(line[start]).panel() else {
                start += 1;
                continue;
            };
            let mut end = start + 1;
            while end < line.len() && self.get(line[end]).panel() == Some(panel) {
                end += 1;
            }
            if end - start >= MIN_RUN {
                runs.push(end - start);
                for &pos in &line[start..end] {
                    marked[self.idx(pos)] = true;
                }
            }
            start = end;
        }
    }
}
