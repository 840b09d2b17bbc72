//! Board and status rendering with macroquad.

use crate::game::ClientGameState;
use crate::input::BoardLayout;
use macroquad::prelude::*;
use shared::{Board, Mark, BOARD_SIZE};

const BACKGROUND: Color = Color::new(0.10, 0.10, 0.10, 1.0);
const GRID_LINE: Color = Color::new(0.27, 0.27, 0.27, 1.0);
const BOARD_FILL: Color = Color::new(0.16, 0.16, 0.16, 1.0);
const X_COLOR: Color = Color::new(0.30, 0.75, 1.00, 1.0);
const O_COLOR: Color = Color::new(1.00, 0.45, 0.35, 1.0);
const WIN_HIGHLIGHT: Color = Color::new(0.25, 0.85, 0.40, 0.35);

pub struct Renderer {
    layout: BoardLayout,
}

impl Renderer {
    pub fn new(layout: BoardLayout) -> Self {
        Self { layout }
    }

    pub fn render(&self, state: &ClientGameState, connected: bool) {
        clear_background(BACKGROUND);

        self.draw_board_background();
        self.draw_winning_highlight(state);
        self.draw_grid();
        self.draw_marks(&state.board);
        self.draw_status(state, connected);
    }

    fn draw_board_background(&self) {
        let size = self.layout.board_px();
        draw_rectangle(
            self.layout.origin_x,
            self.layout.origin_y,
            size,
            size,
            BOARD_FILL,
        );
    }

    fn draw_grid(&self) {
        let size = self.layout.board_px();

        for line in 0..=BOARD_SIZE {
            let offset = line as f32 * self.layout.cell_px;

            draw_line(
                self.layout.origin_x + offset,
                self.layout.origin_y,
                self.layout.origin_x + offset,
                self.layout.origin_y + size,
                1.0,
                GRID_LINE,
            );
            draw_line(
                self.layout.origin_x,
                self.layout.origin_y + offset,
                self.layout.origin_x + size,
                self.layout.origin_y + offset,
                1.0,
                GRID_LINE,
            );
        }
    }

    fn draw_marks(&self, board: &Board) {
        for (index, cell) in board.cells().iter().enumerate() {
            match cell {
                Some(Mark::X) => self.draw_x(index),
                Some(Mark::O) => self.draw_o(index),
                None => {}
            }
        }
    }

    fn draw_x(&self, index: usize) {
        let (x, y) = self.layout.cell_origin(index);
        let pad = self.layout.cell_px * 0.25;
        let far = self.layout.cell_px - pad;

        draw_line(x + pad, y + pad, x + far, y + far, 2.0, X_COLOR);
        draw_line(x + far, y + pad, x + pad, y + far, 2.0, X_COLOR);
    }

    fn draw_o(&self, index: usize) {
        let (cx, cy) = self.layout.cell_center(index);
        let radius = self.layout.cell_px * 0.3;

        draw_circle_lines(cx, cy, radius, 2.0, O_COLOR);
    }

    fn draw_winning_highlight(&self, state: &ClientGameState) {
        for &index in &state.winning_cells {
            let (x, y) = self.layout.cell_origin(index);
            draw_rectangle(x, y, self.layout.cell_px, self.layout.cell_px, WIN_HIGHLIGHT);
        }
    }

    fn draw_status(&self, state: &ClientGameState, connected: bool) {
        let status = if !connected {
            "Connecting...".to_string()
        } else if let Some(winner) = state.winner {
            format!("{} wins! Press R to restart", winner)
        } else if state.game_active {
            format!("{} to move (click a cell)", state.current_player)
        } else {
            "Game over. Press R to restart".to_string()
        };

        draw_text(&status, self.layout.origin_x, 30.0, 24.0, WHITE);

        let connection_color = if connected { GREEN } else { RED };
        draw_circle(
            self.layout.origin_x + self.layout.board_px() - 8.0,
            24.0,
            6.0,
            connection_color,
        );
    }
}
