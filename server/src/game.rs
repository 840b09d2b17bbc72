use crate::rules;
use log::info;
use shared::{Board, Mark, CELL_COUNT};

/// Result of a move attempt. Rejections are silent towards other clients:
/// the caller decides whether to surface them, and the default transport
/// layer does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Move applied, game continues, turn has passed to the other player.
    Accepted,
    /// Move applied and completed a winning run; the session is no longer
    /// active until reset.
    Won {
        winner: Mark,
        winning_cells: Vec<usize>,
    },
    /// Move refused: inactive game, out-of-range index, occupied cell, or
    /// out-of-turn player. No state changed.
    Rejected,
}

/// Read-only view of the session, used to synchronize a joining client.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub board: Board,
    pub current_player: Mark,
    pub game_active: bool,
}

/// The authoritative game state: board, turn, and the active flag.
///
/// The session knows nothing about connections. It is owned by whoever
/// drives it (the network server in production, tests directly) and is
/// only ever mutated through `attempt_move` and `reset`.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    current_player: Mark,
    active: bool,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Mark::X,
            active: true,
        }
    }

    /// Validates and applies a move for `player` at the linear cell `index`.
    ///
    /// Preconditions are checked in order: the game must be active, the
    /// index in range, the cell vacant, and `player` must hold the turn.
    /// Any failure rejects the move with no state change.
    pub fn attempt_move(&mut self, index: usize, player: Mark) -> MoveOutcome {
        if !self.active
            || index >= CELL_COUNT
            || !self.board.is_vacant(index)
            || player != self.current_player
        {
            return MoveOutcome::Rejected;
        }

        self.board.place(index, player);

        if let Some(winning_cells) = rules::winning_run(&self.board, index, player) {
            self.active = false;
            info!(
                "Player {} wins with a run of {} cells",
                player,
                winning_cells.len()
            );
            return MoveOutcome::Won {
                winner: player,
                winning_cells,
            };
        }

        self.current_player = self.current_player.opponent();
        MoveOutcome::Accepted
    }

    /// Unconditionally reinitializes the session: empty board, `X` to move,
    /// game active. Never fails. Returns the fresh snapshot.
    pub fn reset(&mut self) -> Snapshot {
        *self = GameSession::new();
        info!("Game session reset");
        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            current_player: self.current_player,
            game_active: self.active,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Board, BOARD_SIZE};

    #[test]
    fn test_fresh_session() {
        let session = GameSession::new();

        assert!(session.board().cells().iter().all(Option::is_none));
        assert_eq!(session.current_player(), Mark::X);
        assert!(session.is_active());
    }

    #[test]
    fn test_accepted_move_toggles_turn() {
        let mut session = GameSession::new();

        assert_eq!(session.attempt_move(0, Mark::X), MoveOutcome::Accepted);
        assert_eq!(session.current_player(), Mark::O);
        assert_eq!(session.board().cell(0), Some(Mark::X));

        assert_eq!(session.attempt_move(1, Mark::O), MoveOutcome::Accepted);
        assert_eq!(session.current_player(), Mark::X);
    }

    #[test]
    fn test_out_of_turn_move_rejected() {
        let mut session = GameSession::new();

        assert_eq!(session.attempt_move(0, Mark::O), MoveOutcome::Rejected);
        assert_eq!(session.current_player(), Mark::X);
        assert!(session.board().is_vacant(0));
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let mut session = GameSession::new();

        assert_eq!(session.attempt_move(5, Mark::X), MoveOutcome::Accepted);
        assert_eq!(session.attempt_move(5, Mark::O), MoveOutcome::Rejected);

        assert_eq!(session.board().cell(5), Some(Mark::X));
        assert_eq!(session.current_player(), Mark::O);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut session = GameSession::new();

        assert_eq!(
            session.attempt_move(CELL_COUNT, Mark::X),
            MoveOutcome::Rejected
        );
        assert_eq!(
            session.attempt_move(CELL_COUNT + 100, Mark::X),
            MoveOutcome::Rejected
        );
        assert_eq!(session.current_player(), Mark::X);
    }

    /// Plays X across row 0 with O answering on row 10, until X completes
    /// five in a row.
    fn play_to_horizontal_win(session: &mut GameSession) -> MoveOutcome {
        for col in 0..4 {
            assert_eq!(session.attempt_move(col, Mark::X), MoveOutcome::Accepted);
            assert_eq!(
                session.attempt_move(Board::index_of(10, col), Mark::O),
                MoveOutcome::Accepted
            );
        }
        session.attempt_move(4, Mark::X)
    }

    #[test]
    fn test_horizontal_win_ends_game() {
        let mut session = GameSession::new();

        match play_to_horizontal_win(&mut session) {
            MoveOutcome::Won {
                winner,
                winning_cells,
            } => {
                assert_eq!(winner, Mark::X);
                assert!(winning_cells.len() >= 5);
                for index in [0, 1, 2, 3, 4] {
                    assert!(winning_cells.contains(&index));
                }
            }
            other => panic!("Expected a win, got {:?}", other),
        }

        assert!(!session.is_active());
        // The turn does not pass on a winning move.
        assert_eq!(session.current_player(), Mark::X);
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut session = GameSession::new();
        play_to_horizontal_win(&mut session);

        // Even the correct alternating player at a vacant cell is refused.
        assert_eq!(
            session.attempt_move(Board::index_of(15, 15), Mark::O),
            MoveOutcome::Rejected
        );
        assert!(session.board().is_vacant(Board::index_of(15, 15)));
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut session = GameSession::new();
        play_to_horizontal_win(&mut session);
        assert!(!session.is_active());

        let snapshot = session.reset();

        assert!(snapshot.game_active);
        assert_eq!(snapshot.current_player, Mark::X);
        assert!(snapshot.board.cells().iter().all(Option::is_none));
        assert_eq!(session.attempt_move(0, Mark::X), MoveOutcome::Accepted);
    }

    #[test]
    fn test_diagonal_win() {
        let mut session = GameSession::new();

        // X down the main diagonal, O answering on the bottom row.
        for step in 0..4 {
            assert_eq!(
                session.attempt_move(Board::index_of(step, step), Mark::X),
                MoveOutcome::Accepted
            );
            assert_eq!(
                session.attempt_move(Board::index_of(BOARD_SIZE - 1, step), Mark::O),
                MoveOutcome::Accepted
            );
        }

        match session.attempt_move(Board::index_of(4, 4), Mark::X) {
            MoveOutcome::Won { winning_cells, .. } => {
                for (row, col) in [(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)] {
                    assert!(winning_cells.contains(&Board::index_of(row, col)));
                }
            }
            other => panic!("Expected a win, got {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_is_pure() {
        let mut session = GameSession::new();
        session.attempt_move(7, Mark::X);

        let before = session.snapshot();
        let after = session.snapshot();

        assert_eq!(before.board, after.board);
        assert_eq!(before.current_player, after.current_player);
        assert_eq!(before.game_active, after.game_active);
        assert_eq!(session.board().cell(7), Some(Mark::X));
    }
}
