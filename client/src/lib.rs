//! # Caro Game Client Library
//!
//! This library provides the graphical client for the networked
//! five-in-a-row game: input capture, network communication, a local
//! mirror of the authoritative game state, and rendering.
//!
//! ## Architecture Overview
//!
//! The game is turn-based and fully server-authoritative, so the client
//! is deliberately thin. It never applies a move locally before the
//! server confirms it: a click becomes a move proposal on the wire, and
//! the board only changes when the resulting broadcast comes back. With
//! one move every few seconds the round-trip is imperceptible, and the
//! client can never drift out of sync.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The local mirror of the server's session: board contents, whose turn
//! it is, whether the game is live, and the winning run once one exists.
//! Updated exclusively from server broadcasts.
//!
//! ### Input Module (`input`)
//! Maps the pixel-space mouse position onto board cells and turns clicks
//! and key presses into player actions.
//!
//! ### Network Module (`network`)
//! A non-blocking UDP connection to the server: connect handshake,
//! packet send/receive, and periodic heartbeats. Polled once per frame
//! from the render loop, since macroquad owns the main loop.
//!
//! ### Rendering Module (`rendering`)
//! Draws the grid, the placed marks, the winning-run highlight, and the
//! status line.

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
