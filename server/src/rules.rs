//! Win detection for five-in-a-row.
//!
//! Only lines through the last-placed cell can change the result, so the
//! check walks outward from that cell instead of scanning the board. Cost
//! is bounded by 4 orientations x 2 directions x the run length, independent
//! of board size.

use shared::{Board, Mark, BOARD_SIZE, WIN_LENGTH};

/// The four line orientations as (row, col) deltas: horizontal, vertical,
/// and the two diagonals.
const ORIENTATIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Returns the cells of a completed run through `index`, or `None` when the
/// move at `index` did not produce one.
///
/// For each orientation the run starts at the seed cell and is extended in
/// both directions while the next cell is in bounds and holds `player`'s
/// mark. The first orientation reaching `WIN_LENGTH` wins; later ones are
/// not evaluated. The returned set always contains the seed index.
pub fn winning_run(board: &Board, index: usize, player: Mark) -> Option<Vec<usize>> {
    let (row, col) = Board::row_col(index);
    let row = row as isize;
    let col = col as isize;
    let size = BOARD_SIZE as isize;

    for (d_row, d_col) in ORIENTATIONS {
        let mut run = vec![index];

        for direction in [-1isize, 1] {
            let mut step = 1isize;
            loop {
                let r = row + direction * step * d_row;
                let c = col + direction * step * d_col;

                if r < 0 || r >= size || c < 0 || c >= size {
                    break;
                }

                let cell = (r * size + c) as usize;
                if board.cell(cell) != Some(player) {
                    break;
                }

                run.push(cell);
                step += 1;
            }
        }

        if run.len() >= WIN_LENGTH {
            return Some(run);
        }
    }

    None
}
