use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use memoranet::board::{Position, START_FEN};
use memoranet::chess_openings::{default_opening_book, OpeningBook};
use memoranet::search::oneply;
use memoranet::selector::{MemoryBackedSelector, SelectorConfig};

const MIDDLEGAME: &str = "r1bq1rk1/pp2bppp/2n1pn2/2pp4/3P4/2PBPN2/PP1N1PPP/R1BQ1RK1 w - - 0 9";

fn bench_oneply(c: &mut Criterion) {
    let pos = Position::from_fen(MIDDLEGAME).unwrap();
    c.bench_function("oneply_best_move", |b| b.iter(|| black_box(oneply::best_move(black_box(&pos)))));
}

fn bench_get_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_move");
    group.bench_function("book_startpos", |b| {
        let mut s = MemoryBackedSelector::new("bench", SelectorConfig::default(), Arc::new(default_opening_book()));
        // the start position resets repetition counts on every query
        b.iter(|| black_box(s.get_move(black_box(START_FEN)).unwrap()))
    });
    group.bench_function("search_middlegame", |b| {
        b.iter(|| {
            // fresh selector so the position is never served from memory or counted as a repeat
            let mut s = MemoryBackedSelector::new("bench", SelectorConfig::default(), Arc::new(OpeningBook::empty()));
            black_box(s.get_move(black_box(MIDDLEGAME)).unwrap())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_oneply, bench_get_move);
criterion_main!(benches);
