//! Performance Test
//!
//! [Perft](https://www.chessprogramming.org/Perft)
//!
//! A simple debugging and testing function used to count
//! the number of nodes at a specific depth.
//! Every counted path is made and unmade, so perft exercises move generation
//! and the exact inverse of `do_move` together.

use std::ops::{Add, AddAssign};
use std::panic;
use std::sync::Mutex;
use std::thread;

use crate::coretypes::PlyKind;
use crate::movelist::MoveList;
use crate::position::Position;

/// Debugging information about results of perft test.
/// nodes: Number of nodes at lowest depth of perft.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PerftInfo {
    pub nodes: u64,
}

impl PerftInfo {
    fn new(nodes: u64) -> Self {
        PerftInfo { nodes }
    }
}

impl Add for PerftInfo {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        PerftInfo {
            nodes: self.nodes + rhs.nodes,
        }
    }
}

impl AddAssign for PerftInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
    }
}

/// Count the number of nodes at a certain depth.
/// This ignores higher terminal nodes.
/// In other words, it counts the number of paths to the given depth.
pub fn perft(mut position: Position, ply: PlyKind, threads: usize) -> PerftInfo {
    // Guard easy to calculate inputs.
    if ply == 0 {
        return PerftInfo::new(1);
    } else if ply <= 2 || threads <= 1 {
        return perft_recurse(&mut position, ply);
    }

    let moves = Mutex::new(position.legal_moves());
    let position = &position;
    let moves = &moves;

    thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| scope.spawn(move || perft_executor(position.clone(), ply, moves)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|err| panic::resume_unwind(err)))
            .fold(PerftInfo::default(), Add::add)
    })
}

/// Steals one root move at a time from `moves` and counts the nodes below it,
/// until no moves are left.
/// `ply` is the ply of `position` and must be greater than 1.
fn perft_executor(mut position: Position, ply: PlyKind, moves: &Mutex<MoveList>) -> PerftInfo {
    debug_assert!(ply > 1);
    let steal = || moves.lock().ok().and_then(|mut moves| moves.pop());
    let mut perft_info = PerftInfo::default();

    while let Some(move_) = steal() {
        position.do_move(move_);
        perft_info += perft_recurse(&mut position, ply - 1);
        position.undo_unchecked();
    }
    perft_info
}

/// Ply must be non-zero.
fn perft_recurse(position: &mut Position, ply: PlyKind) -> PerftInfo {
    debug_assert_ne!(ply, 0);
    let legal_moves = position.legal_moves();
    if ply == 1 {
        PerftInfo::new(legal_moves.len() as u64)
    } else {
        let mut perft_info = PerftInfo::default();
        for legal_move in legal_moves {
            position.do_move(legal_move);
            perft_info += perft_recurse(position, ply - 1);
            position.undo_unchecked();
        }
        perft_info
    }
}
