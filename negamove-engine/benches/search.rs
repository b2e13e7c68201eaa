use criterion::{black_box, criterion_group, criterion_main, Criterion};

use negamove_engine::coretypes::{Color::*, Move, Square::*};
use negamove_engine::fen::Fen;
use negamove_engine::search;
use negamove_engine::*;

pub fn criterion_start_position(c: &mut Criterion) {
    // Setup
    let mut position = Position::start_position();
    let legal_moves = position.legal_moves();

    // Benchmarks

    for depth in 1..=3 {
        let pruned = SearchConfig::new(depth).unwrap().seed(0);
        let full = pruned.cutoffs(false);

        c.bench_function(&format!("start_position: depth {depth} alpha-beta"), |b| {
            b.iter(|| search::search(&mut position, black_box(&legal_moves), black_box(&pruned)))
        });
        c.bench_function(&format!("start_position: depth {depth} no cutoffs"), |b| {
            b.iter(|| search::search(&mut position, black_box(&legal_moves), black_box(&full)))
        });
    }
}

pub fn criterion_mate_in_1(c: &mut Criterion) {
    // Setup
    let mut position =
        Position::parse_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4")
            .unwrap();
    let legal_moves = position.legal_moves();
    let config = SearchConfig::new(2).unwrap();
    let bm = Some(Move::new(H5, F7, None));

    // Benchmarks

    c.bench_function("scholars_mate: depth 2", |b| {
        b.iter(|| {
            let result = search::search(&mut position, black_box(&legal_moves), black_box(&config));

            assert_eq!(result.leading(), Some(White));
            assert_eq!(result.best_move, bm);
        })
    });
}

criterion_group! {
    name = search_benches;
    config = Criterion::default().without_plots().sample_size(20);
    targets = criterion_start_position, criterion_mate_in_1
}
criterion_main!(search_benches);
