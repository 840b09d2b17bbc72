//! Client input handling: board geometry and mouse/key mapping

use macroquad::prelude::*;
use shared::{Board, BOARD_SIZE};

/// Actions a player can take, produced from raw input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Propose a mark at the given linear cell index.
    PlaceMark(usize),
    /// Ask the server to restart the game.
    Restart,
}

/// Pixel-space geometry of the on-screen board.
///
/// Pure arithmetic, independent of the rendering backend, so the
/// pixel-to-cell mapping is unit-testable.
#[derive(Debug, Clone, Copy)]
pub struct BoardLayout {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_px: f32,
}

impl BoardLayout {
    pub fn new(origin_x: f32, origin_y: f32, cell_px: f32) -> Self {
        Self {
            origin_x,
            origin_y,
            cell_px,
        }
    }

    pub fn board_px(&self) -> f32 {
        self.cell_px * BOARD_SIZE as f32
    }

    /// Top-left pixel corner of a cell.
    pub fn cell_origin(&self, index: usize) -> (f32, f32) {
        let (row, col) = Board::row_col(index);
        (
            self.origin_x + col as f32 * self.cell_px,
            self.origin_y + row as f32 * self.cell_px,
        )
    }

    /// Pixel center of a cell.
    pub fn cell_center(&self, index: usize) -> (f32, f32) {
        let (x, y) = self.cell_origin(index);
        (x + self.cell_px / 2.0, y + self.cell_px / 2.0)
    }

    /// Maps a pixel position to the cell under it, or `None` when the
    /// position lies outside the board.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<usize> {
        let rel_x = x - self.origin_x;
        let rel_y = y - self.origin_y;

        if rel_x < 0.0 || rel_y < 0.0 {
            return None;
        }

        let col = (rel_x / self.cell_px) as usize;
        let row = (rel_y / self.cell_px) as usize;

        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }

        Some(Board::index_of(row, col))
    }
}

/// Turns this frame's raw input into at most one player action.
pub struct InputManager {
    layout: BoardLayout,
}

impl InputManager {
    pub fn new(layout: BoardLayout) -> Self {
        Self { layout }
    }

    pub fn poll(&self) -> Option<PlayerAction> {
        if is_key_pressed(KeyCode::R) {
            return Some(PlayerAction::Restart);
        }

        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            return self.layout.cell_at(x, y).map(PlayerAction::PlaceMark);
        }

        None
    }
}
