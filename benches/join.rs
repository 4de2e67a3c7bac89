use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use repeats_rs::{join_into, Offset};

const S_LEN: usize = 1 << 12;
const BALANCED_B_LEN: usize = S_LEN * 4; // below the gallop threshold
const SKEWED_B_LEN: usize = S_LEN * 64; // well above it

struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// Sorted unique offsets from accumulated random gaps.
fn make_offsets(count: usize, max_gap: u64, seed: u64) -> Vec<Offset> {
    let mut rng = XorShift64::new(seed);
    let mut out = Vec::with_capacity(count);
    let mut cur = 0u64;
    for _ in 0..count {
        cur += 1 + rng.next_u64() % max_gap;
        out.push(cur as Offset);
    }
    out
}

fn bench_balanced(c: &mut Criterion) {
    let s = make_offsets(S_LEN, 16, 0x1234_5678_9abc_def0);
    let b = make_offsets(BALANCED_B_LEN, 4, 0x0f0e_0d0c_0b0a_0908);
    let mut out = Vec::new();

    let mut group = c.benchmark_group("join_balanced");
    group.throughput(Throughput::Elements((S_LEN + BALANCED_B_LEN) as u64));
    group.bench_function("linear_branch", |bench| {
        bench.iter(|| {
            join_into(black_box(&s), black_box(3), black_box(&b), &mut out);
            black_box(out.len());
        })
    });
    group.finish();
}

fn bench_skewed(c: &mut Criterion) {
    let s = make_offsets(S_LEN, 256, 0xfeed_face_cafe_beef);
    let b = make_offsets(SKEWED_B_LEN, 4, 0xdead_beef_0bad_f00d);
    let mut out = Vec::new();

    let mut group = c.benchmark_group("join_skewed");
    group.throughput(Throughput::Elements(S_LEN as u64));
    group.bench_function("gallop_branch", |bench| {
        bench.iter(|| {
            join_into(black_box(&s), black_box(3), black_box(&b), &mut out);
            black_box(out.len());
        })
    });
    group.finish();
}

fn bench_dense_match(c: &mut Criterion) {
    // Every s offset matches: worst case for output volume.
    let s: Vec<Offset> = (0..S_LEN as Offset).map(|i| i * 2).collect();
    let b: Vec<Offset> = (0..S_LEN as Offset).map(|i| i * 2 + 1).collect();
    let mut out = Vec::new();

    let mut group = c.benchmark_group("join_dense");
    group.throughput(Throughput::Elements(S_LEN as u64));
    group.bench_function("all_match", |bench| {
        bench.iter(|| {
            join_into(black_box(&s), black_box(1), black_box(&b), &mut out);
            black_box(out.len());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_balanced, bench_skewed, bench_dense_match);
criterion_main!(benches);
