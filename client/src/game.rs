//! Client-side mirror of the authoritative game state.
//!
//! Applies server broadcasts verbatim; never speculates. If the client
//! joins mid-game the snapshot brings it fully up to date, and every
//! subsequent `MoveMade` keeps it there.

use log::debug;
use shared::{Board, Mark, CELL_COUNT};

#[derive(Debug, Clone)]
pub struct ClientGameState {
    pub board: Board,
    pub current_player: Mark,
    pub game_active: bool,
    pub winner: Option<Mark>,
    pub winning_cells: Vec<usize>,
}

impl ClientGameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Mark::X,
            game_active: true,
            winner: None,
            winning_cells: Vec::new(),
        }
    }

    /// Replaces the local state with a server snapshot (`GameState` on
    /// join, `GameReset` after a restart). Clears any recorded win.
    pub fn apply_snapshot(&mut self, board: Board, current_player: Mark, game_active: bool) {
        self.board = board;
        self.current_player = current_player;
        self.game_active = game_active;
        self.winner = None;
        self.winning_cells.clear();
        debug!(
            "Applied snapshot: {} to move, active: {}",
            current_player, game_active
        );
    }

    /// Applies a broadcast move. The server has already validated it, so
    /// the only check left is that the index fits the board.
    pub fn apply_move(&mut self, index: usize, player: Mark, current_player: Mark, game_active: bool) {
        if index >= CELL_COUNT {
            debug!("Ignoring move broadcast with out-of-range index {}", index);
            return;
        }

        self.board.place(index, player);
        self.current_player = current_player;
        self.game_active = game_active;
    }

    pub fn apply_game_over(&mut self, winner: Mark, winning_cells: Vec<usize>) {
        self.game_active = false;
        self.winner = Some(winner);
        self.winning_cells = winning_cells;
    }

    pub fn is_winning_cell(&self, index: usize) -> bool {
        self.winning_cells.contains(&index)
    }
}

impl Default for ClientGameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_fresh_game() {
        let state = ClientGameState::new();

        assert!(state.board.cells().iter().all(Option::is_none));
        assert_eq!(state.current_player, Mark::X);
        assert!(state.game_active);
        assert!(state.winner.is_none());
    }

    #[test]
    fn test_apply_move_sequence() {
        let mut state = ClientGameState::new();

        state.apply_move(0, Mark::X, Mark::O, true);
        state.apply_move(25, Mark::O, Mark::X, true);

        assert_eq!(state.board.cell(0), Some(Mark::X));
        assert_eq!(state.board.cell(25), Some(Mark::O));
        assert_eq!(state.current_player, Mark::X);
        assert!(state.game_active);
    }

    #[test]
    fn test_apply_game_over_records_win() {
        let mut state = ClientGameState::new();
        state.apply_move(4, Mark::X, Mark::X, false);
        state.apply_game_over(Mark::X, vec![0, 1, 2, 3, 4]);

        assert!(!state.game_active);
        assert_eq!(state.winner, Some(Mark::X));
        assert!(state.is_winning_cell(4));
        assert!(!state.is_winning_cell(5));
    }

    #[test]
    fn test_snapshot_clears_previous_win() {
        let mut state = ClientGameState::new();
        state.apply_game_over(Mark::O, vec![10, 11, 12, 13, 14]);

        state.apply_snapshot(Board::new(), Mark::X, true);

        assert!(state.game_active);
        assert!(state.winner.is_none());
        assert!(state.winning_cells.is_empty());
        assert!(state.board.cells().iter().all(Option::is_none));
    }

    #[test]
    fn test_out_of_range_move_ignored() {
        let mut state = ClientGameState::new();
        state.apply_move(CELL_COUNT + 5, Mark::X, Mark::O, true);

        assert!(state.board.cells().iter().all(Option::is_none));
        // Turn metadata is not applied either; the broadcast was bogus.
        assert_eq!(state.current_player, Mark::X);
    }

    #[test]
    fn test_mid_game_snapshot() {
        let mut state = ClientGameState::new();

        let mut board = Board::new();
        board.place(0, Mark::X);
        board.place(40, Mark::O);
        board.place(1, Mark::X);

        state.apply_snapshot(board, Mark::O, true);

        assert_eq!(state.board.cell(0), Some(Mark::X));
        assert_eq!(state.board.cell(40), Some(Mark::O));
        assert_eq!(state.current_player, Mark::O);
    }
}
