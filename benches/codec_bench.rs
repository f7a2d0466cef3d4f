use criterion::{black_box, criterion_group, criterion_main, Criterion};
use memoranet::board::START_FEN;
use memoranet::tokenizer::{decode_evaluation, decode_move, encode_evaluation, encode_move, encode_position};

const MIDDLEGAME: &str = "r1bq1rk1/pp2bppp/2n1pn2/2pp4/3P4/2PBPN2/PP1N1PPP/R1BQ1RK1 w - - 0 9";

fn bench_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_position");
    for (name, fen) in [("startpos", START_FEN), ("middlegame", MIDDLEGAME)] {
        group.bench_function(name, |b| b.iter(|| black_box(encode_position(black_box(fen)))));
    }
    group.finish();
}

fn bench_moves(c: &mut Criterion) {
    let token = encode_move("e7e8q").unwrap();
    c.bench_function("encode_move", |b| b.iter(|| black_box(encode_move(black_box("g1f3")))));
    c.bench_function("decode_move", |b| b.iter(|| black_box(decode_move(black_box(&token)))));
}

fn bench_evaluation(c: &mut Criterion) {
    let token = encode_evaluation(1.75).unwrap();
    c.bench_function("encode_evaluation", |b| b.iter(|| black_box(encode_evaluation(black_box(-3.5)))));
    c.bench_function("decode_evaluation", |b| b.iter(|| black_box(decode_evaluation(black_box(&token)))));
}

criterion_group!(benches, bench_position, bench_moves, bench_evaluation);
criterion_main!(benches);
