//! Performance Test (perft)
//!
//! Tests to ensure move generation passes Perft test by checking against pre-determined results.
//! [Perft Results](https://www.chessprogramming.org/Perft_Results)

use std::thread::available_parallelism;

use negamove_engine::fen::Fen;
use negamove_engine::perft::*;
use negamove_engine::*;

const ONE_THREAD: usize = 1;

fn cpu_threads() -> usize {
    available_parallelism()
        .map(|inner| inner.get())
        .unwrap_or(1)
}

/// Run single and multithreaded perft `expected_nodes.len()` times.
/// The index of each expected_node value is its ply.
fn perft_tester(position: Position, expected_nodes: Vec<u64>) {
    for (ply, expected_node) in expected_nodes.into_iter().enumerate() {
        let single_thread_result = perft(position.clone(), ply as u8, ONE_THREAD);
        let multi_thread_result = perft(position.clone(), ply as u8, cpu_threads());

        println!("perft({ply}): {single_thread_result:?}");
        assert_eq!(single_thread_result.nodes, expected_node);
        assert_eq!(single_thread_result, multi_thread_result);
    }
}

/// Every legal move, and every legal reply to it, is undone back to the original position.
fn round_trip_tester(mut position: Position) {
    let original = position.clone();
    for legal_move in position.legal_moves() {
        position.do_move(legal_move);
        let after_move = position.clone();
        for reply in position.legal_moves() {
            position.do_move(reply);
            position.legal_moves();
            position.take_back().unwrap();
            assert_eq!(position, after_move, "undo of {reply} after {legal_move}");
        }
        position.take_back().unwrap();
        assert_eq!(position, original, "undo of {legal_move}");
    }
}

#[test]
fn perft_starting_position() {
    perft_tester(Position::start_position(), vec![1, 20, 400, 8_902]);
}

#[test]
#[ignore]
fn perft_starting_position_expensive() {
    let ply4 = perft(Position::start_position(), 4, cpu_threads());
    println!("perft(4): {ply4:?}");
    assert_eq!(ply4.nodes, 197_281);
}

fn kiwipete_position() -> Position {
    // https://www.chessprogramming.org/Perft_Results#Position_2
    Position::parse_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
        .unwrap()
}

#[test]
fn perft_kiwipete_position() {
    perft_tester(kiwipete_position(), vec![1, 48, 2_039]);
}

#[test]
#[ignore]
fn perft_kiwipete_position_expensive() {
    let ply3 = perft(kiwipete_position(), 3, cpu_threads());
    println!("perft(3): {ply3:?}");
    assert_eq!(ply3.nodes, 97_862);
}

fn position_3() -> Position {
    // https://www.chessprogramming.org/Perft_Results#Position_3
    Position::parse_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap()
}

#[test]
fn perft_test_position_3() {
    perft_tester(position_3(), vec![1, 14, 191, 2_812]);
}

fn position_4() -> Position {
    // https://www.chessprogramming.org/Perft_Results#Position_4
    Position::parse_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1").unwrap()
}

#[test]
fn perft_test_position_4() {
    perft_tester(position_4(), vec![1, 6, 264, 9_467]);
}

fn position_5() -> Position {
    // https://www.chessprogramming.org/Perft_Results#Position_5
    Position::parse_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8").unwrap()
}

#[test]
fn perft_test_position_5() {
    perft_tester(position_5(), vec![1, 44, 1_486]);
}

#[test]
fn make_undo_round_trips() {
    round_trip_tester(Position::start_position());
    round_trip_tester(kiwipete_position());
    round_trip_tester(position_4());
    round_trip_tester(position_5());
}
