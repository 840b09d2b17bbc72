//! Headless scripted client for exercising a running server.
//!
//! Connects, then plays a fixed sequence of moves for both symbols so a
//! single invocation drives the game to a horizontal win for X. Every
//! packet the server sends back is printed. Useful for smoke-testing a
//! server without the graphical client.

use bincode::{deserialize, serialize};
use shared::{Board, Mark, Packet};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::net::UdpSocket;
use tokio::time::{sleep, timeout};

// Get current timestamp in milliseconds
fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}

async fn send(socket: &UdpSocket, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
    let data = serialize(packet)?;
    socket.send(&data).await?;
    Ok(())
}

async fn drain(socket: &UdpSocket, wait: Duration) {
    let mut buffer = [0u8; 4096];
    loop {
        match timeout(wait, socket.recv(&mut buffer)).await {
            Ok(Ok(len)) => match deserialize::<Packet>(&buffer[0..len]) {
                Ok(Packet::Connected { client_id }) => {
                    println!("<- Connected as client {}", client_id);
                }
                Ok(Packet::GameState {
                    current_player,
                    game_active,
                    ..
                }) => {
                    println!(
                        "<- GameState: {} to move, active: {}",
                        current_player, game_active
                    );
                }
                Ok(Packet::MoveMade {
                    index,
                    player,
                    current_player,
                    game_active,
                }) => {
                    let (row, col) = Board::row_col(index as usize);
                    println!(
                        "<- MoveMade: {} at ({}, {}), next: {}, active: {}",
                        player, row, col, current_player, game_active
                    );
                }
                Ok(Packet::GameOver {
                    winner,
                    winning_cells,
                }) => {
                    println!("<- GameOver: {} wins via {:?}", winner, winning_cells);
                }
                Ok(Packet::GameReset { .. }) => {
                    println!("<- GameReset");
                }
                Ok(Packet::Disconnected { reason }) => {
                    println!("<- Disconnected: {}", reason);
                }
                Ok(other) => println!("<- {:?}", other),
                Err(e) => println!("<- undecodable packet: {}", e),
            },
            _ => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let server_addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:3000".to_string());

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(&server_addr).await?;
    println!("-> Connect to {}", server_addr);

    send(&socket, &Packet::Connect { client_version: 1 }).await?;
    drain(&socket, Duration::from_millis(500)).await;

    // X marches across row 0 while O answers on row 10; the fifth X move
    // completes the run.
    let script = [
        (Board::index_of(0, 0), Mark::X),
        (Board::index_of(10, 0), Mark::O),
        (Board::index_of(0, 1), Mark::X),
        (Board::index_of(10, 1), Mark::O),
        (Board::index_of(0, 2), Mark::X),
        (Board::index_of(10, 2), Mark::O),
        (Board::index_of(0, 3), Mark::X),
        (Board::index_of(10, 3), Mark::O),
        (Board::index_of(0, 4), Mark::X),
    ];

    for (index, player) in script {
        let (row, col) = Board::row_col(index);
        println!("-> MakeMove: {} at ({}, {})", player, row, col);
        send(
            &socket,
            &Packet::MakeMove {
                index: index as u32,
                player,
            },
        )
        .await?;
        drain(&socket, Duration::from_millis(200)).await;
        sleep(Duration::from_millis(50)).await;
    }

    send(
        &socket,
        &Packet::Heartbeat {
            timestamp: get_timestamp(),
        },
    )
    .await?;

    println!("-> RestartGame");
    send(&socket, &Packet::RestartGame).await?;
    drain(&socket, Duration::from_millis(500)).await;

    println!("-> Disconnect");
    send(&socket, &Packet::Disconnect).await?;

    Ok(())
}
