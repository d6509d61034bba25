use std::sync::atomic::AtomicBool;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};

use raptor::board::fen::from_fen;
use raptor::engine::transposition::TranspositionTable;
use raptor::search::game_time::Clock;
use raptor::search::{negamax, thread::Pv, SearchThread, INFINITE};

fn bench_search(c: &mut Criterion) {
    let startpos = from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    let kiwipete =
        from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();

    c.bench_function("search_depth_4_startpos", |b| {
        b.iter(|| {
            let stop = AtomicBool::new(false);
            let mut th = SearchThread::new(&stop, Clock::fixed(Duration::from_secs(30)), false, Vec::new());
            let mut tt = TranspositionTable::new(16);
            let mut pv = Pv::default();
            negamax::<true>(&mut th, &mut tt, &startpos, -INFINITE, INFINITE, 4, &mut pv)
        })
    });

    c.bench_function("search_depth_4_kiwipete", |b| {
        b.iter(|| {
            let stop = AtomicBool::new(false);
            let mut th = SearchThread::new(&stop, Clock::fixed(Duration::from_secs(30)), false, Vec::new());
            let mut tt = TranspositionTable::new(16);
            let mut pv = Pv::default();
            negamax::<true>(&mut th, &mut tt, &kiwipete, -INFINITE, INFINITE, 4, &mut pv)
        })
    });
}

fn bench_movegen(c: &mut Criterion) {
    let startpos = from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    let kiwipete =
        from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();

    c.bench_function("movegen_startpos", |b| b.iter(|| startpos.pseudo_legal_moves().len()));
    c.bench_function("movegen_kiwipete", |b| b.iter(|| kiwipete.pseudo_legal_moves().len()));
}

criterion_group!(benches, bench_search, bench_movegen);
criterion_main!(benches);
