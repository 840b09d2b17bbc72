use serde::{Deserialize, Serialize};
use std::fmt;

/// Board edge length in cells.
pub const BOARD_SIZE: usize = 20;
/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;
/// Number of consecutive marks required to win.
pub const WIN_LENGTH: usize = 5;

/// A player's symbol. `X` always opens a fresh game.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// The playing field: `CELL_COUNT` cells in row-major order
/// (`index = row * BOARD_SIZE + col`). Invariant: the cell vector
/// always has exactly `CELL_COUNT` entries.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Option<Mark>>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: vec![None; CELL_COUNT],
        }
    }

    /// Mark at `index`, or `None` when the cell is empty or out of range.
    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    /// True when `index` is in range and the cell holds no mark.
    pub fn is_vacant(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    /// Places `mark` at `index`. Out-of-range indices are ignored;
    /// callers are expected to bounds-check first.
    pub fn place(&mut self, index: usize, mark: Mark) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Some(mark);
        }
    }

    pub fn cells(&self) -> &[Option<Mark>] {
        &self.cells
    }

    pub fn index_of(row: usize, col: usize) -> usize {
        row * BOARD_SIZE + col
    }

    pub fn row_col(index: usize) -> (usize, usize) {
        (index / BOARD_SIZE, index % BOARD_SIZE)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire protocol between client and server. Every datagram carries exactly
/// one bincode-encoded packet.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    // Client -> server
    Connect {
        client_version: u32,
    },
    MakeMove {
        index: u32,
        player: Mark,
    },
    RestartGame,
    Heartbeat {
        timestamp: u64,
    },
    Disconnect,

    // Server -> client
    Connected {
        client_id: u32,
    },
    /// Full snapshot, sent to a newly connected client only.
    GameState {
        board: Board,
        current_player: Mark,
        game_active: bool,
    },
    /// Broadcast after every accepted move.
    MoveMade {
        index: u32,
        player: Mark,
        current_player: Mark,
        game_active: bool,
    },
    /// Broadcast after a move that completes a winning run.
    GameOver {
        winner: Mark,
        winning_cells: Vec<u32>,
    },
    /// Broadcast after a restart.
    GameReset {
        board: Board,
        current_player: Mark,
        game_active: bool,
    },
    Disconnected {
        reason: String,
    },
}
