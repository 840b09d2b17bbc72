//! # Caro Game Server Library
//!
//! This library provides the authoritative server for a networked
//! five-in-a-row (Caro) game. It owns the single shared game session,
//! validates and applies moves from connected clients, and broadcasts the
//! resulting state so every client sees the same game.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Session
//! The server holds the one true board. Clients only ever propose moves;
//! the engine decides. Illegal proposals (wrong turn, occupied cell,
//! out-of-range index, finished game) are rejected silently: no state
//! change, no broadcast, no error event back to the sender.
//!
//! ### Client Management
//! Handles the complete lifecycle of client connections:
//! - Registration and client id assignment
//! - Heartbeat-based liveness and timeout cleanup
//! - Capacity enforcement ("Server full")
//!
//! Connection bookkeeping is deliberately separate from the rules: the
//! registry never influences move validation, and a disconnect never
//! touches the board.
//!
//! ### State Broadcasting
//! Every accepted move is broadcast to all registered clients in the order
//! the engine accepted it. A completed run additionally produces a
//! game-over broadcast with the winning cells; a restart produces a fresh
//! snapshot broadcast.
//!
//! ## Architecture Design
//!
//! ### Single Event Loop
//! All packets funnel through one `tokio::select!` loop that fully
//! processes each event before dequeuing the next. Session mutations are
//! therefore atomic without a lock on the session itself; only the client
//! registry, shared with the sender and timeout tasks, sits behind a
//! `RwLock`.
//!
//! ### UDP-Based Communication
//! Uses UDP datagrams carrying one bincode-encoded packet each. A
//! "connection" is a registered source address kept alive by client
//! heartbeats and swept by the timeout checker.
//!
//! ## Module Organization
//!
//! - `game`: the engine holding board state, the turn machine, and move
//!   outcomes
//! - `rules`: win detection seeded at the last-placed cell
//! - `client_manager`: connection registry, capacity, timeouts
//! - `network`: socket handling, packet dispatch, broadcast fan-out
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new("127.0.0.1:3000", 32).await?;
//!
//!     // Runs the event loop: registers clients, validates and applies
//!     // moves, and broadcasts authoritative state until shutdown.
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod game;
pub mod network;
pub mod rules;
