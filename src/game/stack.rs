use std::fmt;

use thiserror::Error;

use crate::game::PanelSource;

/// A single symbol-bearing tile. Panels have no identity beyond their symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Panel(char);

impl Panel {
    pub fn new(symbol: char) -> Self {
        Self(symbol)
    }

    pub fn symbol(self) -> char {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Filled(Panel),
}

impl Cell {
    pub fn panel(self) -> Option<Panel> {
        match self {
            Cell::Empty => None,
            Cell::Filled(panel) => Some(panel),
        }
    }

    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A grid position: `row` in `[0, width)`, `col` in `[0, length)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring position in `dir`, or `None` when it would leave a
    /// `width` x `length` grid.
    pub fn step(self, dir: Direction, width: usize, length: usize) -> Option<Pos> {
        let (row, col) = match dir {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row + 1, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col + 1),
        };
        (row < width && col < length).then_some(Pos { row, col })
    }

    fn is_adjacent(self, other: Pos) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("{pos} is outside the {width}x{length} stack")]
    OutOfBounds {
        pos: Pos,
        width: usize,
        length: usize,
    },
    #[error("{a} and {b} are not adjacent")]
    NotAdjacent { a: Pos, b: Pos },
}

/// Returned by [`Stack::advance`] once a panel lands in the boundary column.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("stack reached the edge")]
pub struct ReachedEdge;

// Redraws allowed per slot while building the opening stack before the slot
// is left empty.
const MAX_DRAWS: usize = 16;

/// The panel grid: `length` columns of `width` rows each. Column 0 is the
/// newest (left) column, column `length - 1` is the boundary.
#[derive(Clone, Debug)]
pub struct Stack {
    pub width: usize,
    pub length: usize,
    symbols: Vec<Panel>,
    pub(super) cells: Vec<Cell>,
}

impl Stack {
    pub fn new(width: usize, length: usize, symbols: &[char]) -> Self {
        Self {
            width,
            length,
            symbols: symbols.iter().copied().map(Panel::new).collect(),
            cells: vec![Cell::Empty; width * length],
        }
    }

    /// Builds an opening stack. The first three quarters of the columns (never
    /// the boundary column) are filled bottom-up, each slot drawing a symbol or a gap; a gap leaves
    /// the rest of its column empty. Draws that would line up three equal
    /// panels are rejected.
    pub fn generate(
        width: usize,
        length: usize,
        symbols: &[char],
        source: &mut dyn PanelSource,
    ) -> Self {
        let mut stack = Self::new(width, length, symbols);
        let nsym = stack.symbols.len();

        for col in (0..length).take_while(|&col| 4 * col < 3 * length && col + 1 < length) {
            for row in (0..width).rev() {
                let below = Pos::new(row + 1, col);
                if row + 1 < width && !stack.get(below).is_filled() {
                    continue;
                }
                let pos = Pos::new(row, col);
                for _ in 0..MAX_DRAWS {
                    let pick = source.pick(nsym + 1);
                    if pick == nsym {
                        break;
                    }
                    let panel = stack.symbols[pick];
                    if !stack.would_line_up(pos, panel) {
                        stack.set(pos, Cell::Filled(panel));
                        break;
                    }
                }
            }
        }
        stack
    }

    pub(super) fn idx(&self, pos: Pos) -> usize {
        pos.col * self.width + pos.row
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.width && pos.col < self.length
    }

    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[self.idx(pos)]
    }

    pub fn set(&mut self, pos: Pos, value: Cell) {
        let idx = self.idx(pos);
        self.cells[idx] = value;
    }

    pub fn column(&self, col: usize) -> &[Cell] {
        let start = col * self.width;
        &self.cells[start..start + self.width]
    }

    /// Index of the rightmost column holding a panel.
    pub fn leading_edge(&self) -> Option<usize> {
        (0..self.length)
            .rev()
            .find(|&col| self.column(col).iter().any(|cell| cell.is_filled()))
    }

    /// Exchanges the cells at two orthogonally adjacent positions.
    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<(), GridError> {
        for pos in [a, b] {
            if !self.contains(pos) {
                return Err(GridError::OutOfBounds {
                    pos,
                    width: self.width,
                    length: self.length,
                });
            }
        }
        if !a.is_adjacent(b) {
            return Err(GridError::NotAdjacent { a, b });
        }
        let (ia, ib) = (self.idx(a), self.idx(b));
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Pushes a freshly drawn column in at the left and drops the boundary
    /// column. Fails once the shift leaves a panel in the boundary column.
    /// A panel already sitting in the boundary column (carried there in
    /// select mode) fails the advance before anything moves.
    pub fn advance(&mut self, source: &mut dyn PanelSource) -> Result<(), ReachedEdge> {
        if self.column(self.length - 1).iter().any(|cell| cell.is_filled()) {
            return Err(ReachedEdge);
        }
        let fresh: Vec<Cell> = (0..self.width)
            .map(|_| Cell::Filled(self.symbols[source.pick(self.symbols.len())]))
            .collect();
        self.cells.truncate(self.cells.len() - self.width);
        self.cells.splice(0..0, fresh);

        if self.column(self.length - 1).iter().any(|cell| cell.is_filled()) {
            Err(ReachedEdge)
        } else {
            Ok(())
        }
    }

    // True when placing `panel` at `pos` would complete a run of three.
    fn would_line_up(&self, pos: Pos, panel: Panel) -> bool {
        let same = |dir: Direction| {
            let mut count = 0;
            let mut at = pos;
            while let Some(next) = at.step(dir, self.width, self.length) {
                if self.get(next).panel() != Some(panel) {
                    break;
                }
                count += 1;
                at = next;
            }
            count
        };
        same(Direction::Left) + same(Direction::Right) + 1 >= 3
            || same(Direction::Up) + same(Direction::Down) + 1 >= 3
    }
}

#[cfg(test)]
impl Stack {
    pub(crate) fn symbols(&self) -> &[Panel] {
        &self.symbols
    }

    pub(crate) fn panel_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_filled()).count()
    }

    /// Parses one string per row; `.` is an empty cell.
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let width = rows.len();
        let length = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut symbols: Vec<char> = Vec::new();
        for ch in rows.iter().flat_map(|r| r.chars()) {
            if ch != '.' && !symbols.contains(&ch) {
                symbols.push(ch);
            }
        }
        let mut stack = Self::new(width, length, &symbols);
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch != '.' {
                    stack.set(Pos::new(row, col), Cell::Filled(Panel::new(ch)));
                }
            }
        }
        stack
    }

    pub(crate) fn to_rows(&self) -> Vec<String> {
        (0..self.width)
            .map(|row| {
                (0..self.length)
                    .map(|col| match self.get(Pos::new(row, col)) {
                        Cell::Empty => '.',
                        Cell::Filled(panel) => panel.symbol(),
                    })
                    .collect()
            })
            .collect()
    }
}
