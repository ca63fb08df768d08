//! Read-only copy of a session for renderers.
//!
//! The snapshot holds plain values only (tile values, positions, flags), so a
//! front-end can draw a frame without borrowing the session. `fill_from`
//! reuses the existing allocations between frames.

use arrayvec::ArrayVec;

use crate::session::{LockEvent, Session};
use crate::types::{Position, Shape};

/// A tile of a falling or preview piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceTile {
    pub pos: Position,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major tile values, row 0 at the floor, 0 = empty.
    pub cells: Vec<u32>,
    pub active_shape: Option<Shape>,
    /// Active piece tiles in board coordinates (may lie above the board).
    pub active: ArrayVec<PieceTile, 4>,
    /// Where the active piece would land.
    pub ghost: ArrayVec<Position, 4>,
    pub next_shape: Option<Shape>,
    /// Preview tiles relative to the preview's bottom-left corner.
    pub next: ArrayVec<PieceTile, 4>,
    pub score: u32,
    pub win_threshold: u32,
    pub max_value: u32,
    pub last_lock: Option<LockEvent>,
    pub episode_id: u32,
    pub piece_id: u32,
    pub started: bool,
    pub paused: bool,
    pub game_over: bool,
    pub win: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.cells.clear();
        self.active_shape = None;
        self.active.clear();
        self.ghost.clear();
        self.next_shape = None;
        self.next.clear();
        self.score = 0;
        self.win_threshold = 0;
        self.max_value = 0;
        self.last_lock = None;
        self.episode_id = 0;
        self.piece_id = 0;
        self.started = false;
        self.paused = false;
        self.game_over = false;
        self.win = false;
    }

    pub(crate) fn fill_from(&mut self, session: &Session) {
        self.clear();
        let grid = session.grid();
        self.width = grid.width();
        self.height = grid.height();
        self.cells
            .extend(grid.cells().iter().map(|c| c.map_or(0, |t| t.value())));

        if let Some(piece) = session.current() {
            self.active_shape = Some(piece.shape());
            self.active.extend(piece.cells().map(|(pos, tile)| PieceTile {
                pos,
                value: tile.value(),
            }));
            let ghost = piece.ghost_anchor(grid);
            let (dcol, drow) = (ghost.col - piece.anchor().col, ghost.row - piece.anchor().row);
            self.ghost
                .extend(piece.cells().map(|(pos, _)| pos.offset(dcol, drow)));
        }

        if let Some(piece) = session.next() {
            self.next_shape = Some(piece.shape());
            let bounded = piece.get_min_bounded_frame();
            let origin = bounded.origin;
            self.next.extend(bounded.cells().map(|(pos, tile)| PieceTile {
                pos: pos.offset(-origin.col, -origin.row),
                value: tile.value(),
            }));
        }

        self.score = grid.score();
        self.win_threshold = grid.win_threshold();
        self.max_value = grid.max_value();
        self.last_lock = session.last_lock();
        self.episode_id = session.episode_id();
        self.piece_id = session.piece_id();
        self.started = session.started();
        self.paused = session.paused();
        self.game_over = grid.game_over();
        self.win = grid.win();
    }

    /// Tile value at (col, row), 0 if empty or outside the board.
    pub fn value_at(&self, col: usize, row: usize) -> u32 {
        if col >= self.width || row >= self.height {
            return 0;
        }
        self.cells[row * self.width + col]
    }

    pub fn playable(&self) -> bool {
        self.started && !self.game_over && !self.paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            active_shape: None,
            active: ArrayVec::new(),
            ghost: ArrayVec::new(),
            next_shape: None,
            next: ArrayVec::new(),
            score: 0,
            win_threshold: 0,
            max_value: 0,
            last_lock: None,
            episode_id: 0,
            piece_id: 0,
            started: false,
            paused: false,
            game_over: false,
            win: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::session::Session;

    #[test]
    fn test_snapshot_of_started_session() {
        let mut session = Session::new(GameConfig::default(), 42).unwrap();
        session.start();
        let snap = session.snapshot();

        assert_eq!(snap.width, 12);
        assert_eq!(snap.height, 20);
        assert_eq!(snap.cells.len(), 240);
        assert!(snap.cells.iter().all(|&v| v == 0));
        assert_eq!(snap.active.len(), 4);
        assert_eq!(snap.ghost.len(), 4);
        assert_eq!(snap.next.len(), 4);
        assert!(snap.playable());
    }

    #[test]
    fn test_ghost_rests_on_floor_of_empty_board() {
        let mut session = Session::new(GameConfig::default(), 7).unwrap();
        session.start();
        let snap = session.snapshot();
        assert_eq!(snap.ghost.iter().map(|p| p.row).min(), Some(0));
    }

    #[test]
    fn test_next_preview_is_normalised() {
        let mut session = Session::new(GameConfig::default(), 3).unwrap();
        session.start();
        let snap = session.snapshot();
        assert_eq!(snap.next.iter().map(|t| t.pos.col).min(), Some(0));
        assert_eq!(snap.next.iter().map(|t| t.pos.row).min(), Some(0));
    }

    #[test]
    fn test_snapshot_into_reuses_buffer() {
        let mut session = Session::new(GameConfig::default(), 9).unwrap();
        session.start();
        let mut snap = session.snapshot();
        session.hard_drop();
        session.snapshot_into(&mut snap);
        assert_eq!(snap.cells.len(), 240);
        assert!(snap.cells.iter().any(|&v| v != 0));
        assert!(snap.last_lock.is_some());
    }
}
