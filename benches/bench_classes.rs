use criterion::{
  BenchmarkId,
  Criterion,
  criterion_group,
  criterion_main,
};
use segalloc_heap::{
  classes::bin_for,
  config::{
    DWORD,
    MIN_BLOCK,
  },
};
use std::hint::black_box;

fn bench_bin_for_direct(c: &mut Criterion) {
  let mut group = c.benchmark_group("bin_for_direct");
  group.sample_size(50);

  for size in [MIN_BLOCK, 128, 512] {
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &s| {
      b.iter(|| bin_for(black_box(s)));
    });
  }

  group.finish();
}

fn bench_bin_for_ladder(c: &mut Criterion) {
  let mut group = c.benchmark_group("bin_for_ladder");
  group.sample_size(50);

  for size in [2048, 32768, 2097152] {
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &s| {
      b.iter(|| bin_for(black_box(s)));
    });
  }

  group.finish();
}

fn bench_bin_for_sweep(c: &mut Criterion) {
  let mut group = c.benchmark_group("bin_for_sweep");
  group.sample_size(50);

  group.bench_function("sweep", |b| {
    b.iter(|| {
      let mut size = MIN_BLOCK;
      while size <= 4096 {
        black_box(bin_for(black_box(size)));
        size += DWORD;
      }
    });
  });

  group.finish();
}

criterion_group!(
  benches,
  bench_bin_for_direct,
  bench_bin_for_ladder,
  bench_bin_for_sweep
);
criterion_main!(benches);
