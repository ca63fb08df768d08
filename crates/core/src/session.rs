//! Session module - one game from spawn to game over
//!
//! The session ties the grid to the piece in flight. It holds the current and
//! next tetromino, turns player actions and gravity ticks into tetromino
//! transforms, and hands a landed piece to [`Grid`] for locking. Shapes and tile
//! values come from the sources the session was built with, so tests can script
//! every spawn.
//!
//! Every lock leaves a [`LockEvent`] behind for observers; [`Session::take_last_event`]
//! consumes it.

use crate::config::GameConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::rng::{ShapeSource, SimpleRng, UniformShapes, ValueSource};
use crate::snapshot::GameSnapshot;
use crate::tetromino::Tetromino;
use crate::types::{Direction, GameAction, Shape};

/// Summary of one lock (consumed by observers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockEvent {
    /// Id of the piece that locked.
    pub piece_id: u32,
    pub merges: u32,
    pub lines_cleared: u32,
    /// Score gained by this lock.
    pub points: u32,
    pub topped_out: bool,
    pub game_over: bool,
    pub win: bool,
}

/// Complete game session
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    grid: Grid,
    current: Option<Tetromino>,
    next: Option<Tetromino>,
    shapes: Box<dyn ShapeSource>,
    values: Box<dyn ValueSource>,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Monotonic id for spawned pieces.
    piece_id: u32,
    gravity_timer_ms: u32,
    /// Last lock, kept for display until the next one.
    last_lock: Option<LockEvent>,
    /// Last lock, not yet taken by an observer.
    pending_event: Option<LockEvent>,
    paused: bool,
    started: bool,
}

impl Session {
    /// Create a session with seeded uniform shapes and 2/4 tile values.
    pub fn new(config: GameConfig, seed: u32) -> Result<Self> {
        let values_seed = seed.rotate_left(16) ^ 0x5bd1_e995;
        Self::with_sources(
            config,
            Box::new(UniformShapes::new(seed)),
            Box::new(SimpleRng::new(values_seed)),
        )
    }

    /// Create a session drawing shapes and tile values from the given sources.
    pub fn with_sources(
        config: GameConfig,
        shapes: Box<dyn ShapeSource>,
        values: Box<dyn ValueSource>,
    ) -> Result<Self> {
        let grid = Grid::from_config(&config)?;
        Ok(Self {
            config,
            grid,
            current: None,
            next: None,
            shapes,
            values,
            episode_id: 0,
            piece_id: 0,
            gravity_timer_ms: 0,
            last_lock: None,
            pending_event: None,
            paused: false,
            started: false,
        })
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_piece();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current(&self) -> Option<&Tetromino> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Tetromino> {
        self.next.as_ref()
    }

    /// Shape of the preview piece.
    pub fn next_shape(&self) -> Option<Shape> {
        self.next.as_ref().map(Tetromino::shape)
    }

    pub fn score(&self) -> u32 {
        self.grid.score()
    }

    pub fn game_over(&self) -> bool {
        self.grid.game_over()
    }

    pub fn win(&self) -> bool {
        self.grid.win()
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn last_lock(&self) -> Option<LockEvent> {
        self.last_lock
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.pending_event.take()
    }

    fn playable(&self) -> bool {
        self.started && !self.paused && !self.grid.game_over()
    }

    /// Promote the preview piece to current and draw a new preview.
    fn spawn_piece(&mut self) {
        let current = match self.next.take() {
            Some(piece) => piece,
            None => self.fresh_piece(),
        };
        self.current = Some(current);
        self.next = Some(self.fresh_piece());
        self.piece_id = self.piece_id.wrapping_add(1);
        self.gravity_timer_ms = 0;
    }

    fn fresh_piece(&mut self) -> Tetromino {
        let shape = self.shapes.next_shape();
        Tetromino::spawn(shape, self.values.as_mut(), &self.grid)
    }

    /// Try to move the active piece one cell.
    ///
    /// A failed [`Direction::Down`] means the piece has landed: it is locked and
    /// the next piece spawns. The return value only reports whether the piece
    /// moved.
    pub fn try_move(&mut self, direction: Direction) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        if piece.try_move(direction, &self.grid) {
            return true;
        }
        if direction == Direction::Down {
            self.lock_current();
        }
        false
    }

    /// Rotate the active piece clockwise if the rotated placement is free.
    pub fn try_rotate(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        match self.current.as_mut() {
            Some(piece) => piece.rotate_clockwise(&self.grid),
            None => false,
        }
    }

    /// Hard drop the active piece and lock it. Returns the rows fallen.
    pub fn hard_drop(&mut self) -> u32 {
        if !self.playable() {
            return 0;
        }
        let Some(piece) = self.current.as_mut() else {
            return 0;
        };
        let distance = piece.hard_drop(&self.grid);
        self.lock_current();
        distance
    }

    /// Hand the active piece to the grid and spawn the next one.
    fn lock_current(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };
        let outcome = self.grid.commit(&piece.get_min_bounded_frame());

        let event = LockEvent {
            piece_id: self.piece_id,
            merges: outcome.merges,
            lines_cleared: outcome.rows_cleared.len() as u32,
            points: outcome.points,
            topped_out: outcome.topped_out,
            game_over: outcome.game_over,
            win: outcome.win,
        };
        self.last_lock = Some(event);
        self.pending_event = Some(event);

        if !outcome.game_over {
            self.spawn_piece();
        }
    }

    /// Advance the gravity clock.
    ///
    /// Every whole `gravity_ms` accumulated moves the active piece down one
    /// row, so a tick longer than the interval applies several steps. A lock
    /// spawns the next piece and restarts the clock, dropping the remainder.
    /// Returns true if at least one gravity step happened.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.playable() || self.current.is_none() {
            return false;
        }
        self.gravity_timer_ms = self.gravity_timer_ms.saturating_add(elapsed_ms);
        let mut stepped = false;
        while self.playable()
            && self.current.is_some()
            && self.gravity_timer_ms >= self.config.gravity_ms
        {
            self.gravity_timer_ms -= self.config.gravity_ms;
            self.try_move(Direction::Down);
            stepped = true;
        }
        stepped
    }

    /// Apply a player action. Returns whether it had an effect.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.try_move(Direction::Left),
            GameAction::MoveRight => self.try_move(Direction::Right),
            GameAction::SoftDrop => self.try_move(Direction::Down),
            GameAction::HardDrop => {
                if !self.playable() {
                    return false;
                }
                self.hard_drop();
                true
            }
            GameAction::RotateCw => self.try_rotate(),
            GameAction::Pause => {
                if !self.started || self.grid.game_over() {
                    return false;
                }
                self.paused = !self.paused;
                true
            }
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Reset the board and start a new episode.
    ///
    /// The shape and value sources keep their position, so a restarted game
    /// continues the same random streams rather than replaying them.
    pub fn restart(&mut self) {
        self.grid.reset();
        self.current = None;
        self.next = None;
        self.last_lock = None;
        self.pending_event = None;
        self.paused = false;
        self.started = false;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.start();
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.fill_from(self);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
