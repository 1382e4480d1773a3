//! Benchmarks the full right-maximal-string enumeration + MAW detection
//! pass over random DNA texts of growing size, the core hot loop this crate
//! exists for.

use criterion::{criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion, PlotConfiguration};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use maw_index::alphabet::DnaCode;
use maw_index::detector::{Mode, WordDetector};
use maw_index::enumerator::{enumerate_sequential, EnumParams, TraversalMaximality, TraversalOrder};
use maw_index::BwtIndex;

fn random_text(len: usize) -> Vec<DnaCode> {
    let mut rng: StdRng = SeedableRng::from_seed([11; 32]);
    let bases = DnaCode::BASES;
    (0..len).map(|_| bases[rng.gen_range(0..4)]).collect()
}

fn bench_enumeration(c: &mut Criterion) {
    let plot_config = PlotConfiguration::default().summary_scale(AxisScale::Logarithmic);
    let mut group = c.benchmark_group("maw_enumeration");
    group.plot_config(plot_config);
    for &n in &[10_000usize, 100_000] {
        let text = random_text(n);
        let index = BwtIndex::build(&text).unwrap();
        let params = EnumParams {
            min_length: 0,
            max_length: u64::MAX,
            min_frequency: 0,
            max_frequency: u64::MAX,
            traversal_order: TraversalOrder::StackTrick,
            traversal_maximality: TraversalMaximality::Policy0,
        };
        group.bench_with_input(BenchmarkId::new("maw", n), &n, |b, _| {
            b.iter(|| {
                let mut detector = WordDetector::new(index.text_length(), 2, Mode::Maw);
                enumerate_sequential(&index, &params, &mut detector);
                detector.finalize();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_enumeration);
criterion_main!(benches);
