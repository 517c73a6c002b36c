use core::hint::black_box;

use criterion::{
  Criterion,
  criterion_group,
  criterion_main,
};
use rand::{
  Rng,
  SeedableRng,
  rngs::StdRng,
};
use segalloc_heap::Heap;

fn bench_alloc_free(c: &mut Criterion) {
  c.bench_function("alloc_free_fixed", |b| {
    let mut heap = Heap::new(64 << 20).expect("heap init failed");
    b.iter(|| {
      let bp = heap.allocate(black_box(128)).expect("allocate failed");
      heap.free(Some(bp));
    });
  });

  c.bench_function("alloc_free_batch", |b| {
    let mut heap = Heap::new(64 << 20).expect("heap init failed");
    b.iter(|| {
      let blocks: Vec<usize> = (0..128)
        .map(|i| heap.allocate(16 + i * 8).expect("allocate failed"))
        .collect();
      for bp in blocks {
        heap.free(Some(bp));
      }
    });
  });
}

fn bench_churn(c: &mut Criterion) {
  c.bench_function("mixed_churn", |b| {
    let mut heap = Heap::new(64 << 20).expect("heap init failed");
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut live: Vec<usize> = Vec::with_capacity(256);

    b.iter(|| {
      if live.len() < 256 && rng.random_range(0..3) > 0 {
        let size = rng.random_range(1..4096);
        if let Some(bp) = heap.allocate(size) {
          live.push(bp);
        }
      } else if !live.is_empty() {
        let idx = rng.random_range(0..live.len());
        heap.free(Some(live.swap_remove(idx)));
      }
      black_box(live.len());
    });
  });
}

fn bench_resize(c: &mut Criterion) {
  c.bench_function("resize_grow_shrink", |b| {
    let mut heap = Heap::new(64 << 20).expect("heap init failed");
    let mut bp = heap.allocate(64).expect("allocate failed");
    b.iter(|| {
      bp = heap.resize(Some(bp), black_box(1024)).expect("resize failed");
      bp = heap.resize(Some(bp), black_box(64)).expect("resize failed");
    });
  });
}

criterion_group!(heap_benches, bench_alloc_free, bench_churn, bench_resize);
criterion_main!(heap_benches);
