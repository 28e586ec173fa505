mod common;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use wavealign::{Aligner, Mode, Scheduler, ScoringContext, Strategy, WavefrontAligner};

fn bench_group(c: &mut Criterion) {
    let scoring = ScoringContext::constants(5, -3, -4);
    let mut group = c.benchmark_group("parallel");
    for file in &["short.txt", "medium.txt"] {
        let (seq_1, seq_2) = common::read_sequences(file);
        for workers in [1, 2, 4, 8] {
            let scheduler = Scheduler::new(workers, Strategy::Static).unwrap();
            group.bench_with_input(
                format!("{file}/{workers}"),
                &(seq_1.clone(), seq_2.clone()),
                |b, (seq_1, seq_2)| {
                    b.iter(|| {
                        WavefrontAligner::with(black_box(seq_1), black_box(seq_2), &scoring)
                            .with_mode(Mode::Global)
                            .align_on(&scheduler)
                            .unwrap()
                    })
                },
            );
        }
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = bench_group
}

criterion_main!(benches);
