//! Performance benchmarks for critical game systems

use bincode::serialize;
use server::game::{GameSession, MoveOutcome};
use server::rules;
use shared::{Board, Mark, Packet, CELL_COUNT};
use std::time::Instant;

/// Benchmarks win detection on a crowded board
#[test]
fn benchmark_win_detection() {
    // Striping by (2*row + col) % 5 keeps every run shorter than five in
    // all four orientations, so each walk runs to its natural end without
    // the short-circuit ever firing.
    let stripe = |row: usize, col: usize| {
        if (2 * row + col) % 5 == 0 {
            Mark::X
        } else {
            Mark::O
        }
    };

    let mut board = Board::new();
    for index in 0..CELL_COUNT {
        let (row, col) = Board::row_col(index);
        board.place(index, stripe(row, col));
    }

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let seed = (i * 7) % CELL_COUNT;
        let (row, col) = Board::row_col(seed);
        let _ = rules::winning_run(&board, seed, stripe(row, col));
    }

    let duration = start.elapsed();
    println!(
        "Win detection: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 1 second for 100k iterations
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks full move validation and application throughput
#[test]
fn benchmark_move_processing() {
    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let mut session = GameSession::new();
        let mut player = Mark::X;

        // A short scattered game with no winner.
        for &index in &[0usize, 210, 3, 213, 6, 216, 9, 219] {
            assert_eq!(session.attempt_move(index, player), MoveOutcome::Accepted);
            player = player.opponent();
        }
    }

    let duration = start.elapsed();
    println!(
        "Move processing: {} games in {:?} ({:.2} μs/game)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks snapshot packet serialization
#[test]
fn benchmark_snapshot_serialization() {
    let mut board = Board::new();
    for index in 0..CELL_COUNT {
        board.place(index, if index % 3 == 0 { Mark::X } else { Mark::O });
    }

    let packet = Packet::GameState {
        board,
        current_player: Mark::X,
        game_active: true,
    };

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = serialize(&packet).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Snapshot serialization: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks the move broadcast packet, which is sent most often
#[test]
fn benchmark_move_packet_serialization() {
    let packet = Packet::MoveMade {
        index: 210,
        player: Mark::X,
        current_player: Mark::O,
        game_active: true,
    };

    let iterations = 100_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = serialize(&packet).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Move packet serialization: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 1 second
    assert!(duration.as_millis() < 1000);
}
