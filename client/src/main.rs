use clap::Parser;
use client::game::ClientGameState;
use client::input::{BoardLayout, InputManager, PlayerAction};
use client::network::Connection;
use client::rendering::Renderer;
use log::{error, info, warn};
use macroquad::prelude::*;
use shared::{Mark, Packet, BOARD_SIZE};

const CELL_PX: f32 = 32.0;
const BOARD_MARGIN: f32 = 20.0;
const STATUS_BAR_PX: f32 = 30.0;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:3000")]
    server: String,

    /// Only propose moves for this symbol (X or O). By default the client
    /// plays whichever side holds the turn.
    #[arg(long)]
    symbol: Option<String>,
}

fn window_conf() -> Conf {
    let board_px = CELL_PX * BOARD_SIZE as f32;
    Conf {
        window_title: "Caro".to_owned(),
        window_width: (board_px + 2.0 * BOARD_MARGIN) as i32,
        window_height: (board_px + 2.0 * BOARD_MARGIN + STATUS_BAR_PX) as i32,
        ..Default::default()
    }
}

fn parse_symbol(arg: Option<&str>) -> Result<Option<Mark>, String> {
    match arg {
        None => Ok(None),
        Some("X") | Some("x") => Ok(Some(Mark::X)),
        Some("O") | Some("o") => Ok(Some(Mark::O)),
        Some(other) => Err(format!("invalid symbol '{}', expected X or O", other)),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let symbol = match parse_symbol(args.symbol.as_deref()) {
        Ok(symbol) => symbol,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    let mut connection = match Connection::connect(&args.server) {
        Ok(connection) => connection,
        Err(e) => {
            error!("Failed to connect to {}: {}", args.server, e);
            return;
        }
    };

    info!("Controls: click a cell to move, R to restart");

    let layout = BoardLayout::new(BOARD_MARGIN, BOARD_MARGIN + STATUS_BAR_PX, CELL_PX);
    let input_manager = InputManager::new(layout);
    let renderer = Renderer::new(layout);
    let mut state = ClientGameState::new();

    prevent_quit();

    loop {
        for packet in connection.poll() {
            match packet {
                Packet::GameState {
                    board,
                    current_player,
                    game_active,
                }
                | Packet::GameReset {
                    board,
                    current_player,
                    game_active,
                } => {
                    state.apply_snapshot(board, current_player, game_active);
                }

                Packet::MoveMade {
                    index,
                    player,
                    current_player,
                    game_active,
                } => {
                    state.apply_move(index as usize, player, current_player, game_active);
                }

                Packet::GameOver {
                    winner,
                    winning_cells,
                } => {
                    info!("Game over: {} wins", winner);
                    state.apply_game_over(
                        winner,
                        winning_cells.iter().map(|&cell| cell as usize).collect(),
                    );
                }

                // Connection bookkeeping is handled inside Connection.
                Packet::Connected { .. } | Packet::Disconnected { .. } => {}

                other => warn!("Unexpected packet from server: {:?}", other),
            }
        }

        match input_manager.poll() {
            Some(PlayerAction::PlaceMark(index)) => {
                let player = state.current_player;
                let my_turn = symbol.map_or(true, |mark| mark == player);

                if connection.is_connected() && state.game_active && my_turn {
                    connection.send(&Packet::MakeMove {
                        index: index as u32,
                        player,
                    });
                }
            }
            Some(PlayerAction::Restart) => {
                if connection.is_connected() {
                    connection.send(&Packet::RestartGame);
                }
            }
            None => {}
        }

        renderer.render(&state, connection.is_connected());

        if is_quit_requested() {
            connection.disconnect();
            break;
        }

        next_frame().await;
    }
}
