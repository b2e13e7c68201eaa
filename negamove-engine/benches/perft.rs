use std::thread::available_parallelism;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use negamove_engine::fen::Fen;
use negamove_engine::perft::*;
use negamove_engine::*;

pub fn criterion_perft_small_benchmark(c: &mut Criterion) {
    // Setup
    let starting_position = Position::start_position();
    let kiwipete =
        Position::parse_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let num_threads = available_parallelism()
        .map(|inner| inner.get())
        .unwrap_or(1);

    // Benchmarks

    for (ply, expected) in [(2, 400), (3, 8_902)] {
        c.bench_function(&format!("start_position: perft({ply}) threads: 1"), |b| {
            b.iter(|| {
                let info = perft(black_box(starting_position.clone()), black_box(ply), 1);
                assert_eq!(info.nodes, expected);
            })
        });
        c.bench_function(
            &format!("start_position: perft({ply}) threads: {num_threads}"),
            |b| {
                b.iter(|| {
                    let info = perft(
                        black_box(starting_position.clone()),
                        black_box(ply),
                        black_box(num_threads),
                    );
                    assert_eq!(info.nodes, expected);
                })
            },
        );
    }

    c.bench_function(&format!("kiwipete: perft(3) threads: {num_threads}"), |b| {
        b.iter(|| {
            let info = perft(black_box(kiwipete.clone()), black_box(3), black_box(num_threads));
            assert_eq!(info.nodes, 97_862);
        })
    });
}

criterion_group! {
    name = small_benches;
    config = Criterion::default().without_plots().sample_size(20);
    targets = criterion_perft_small_benchmark
}
criterion_main!(small_benches);
