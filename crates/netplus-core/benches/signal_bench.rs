//! Criterion benchmarks for signal buffers and the pass loop.
//!
//! - **Ring** - put/get throughput per sample kind at varying capacities
//! - **Persist** - throughput with saving enabled (wrap-triggered appends)
//! - **System** - pass loop overhead for a trivial two-block chain
//!
//! Run with: `cargo bench -p netplus-core`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use netplus_core::{
    Block, Complex64, Continuity, Result, SampleBuffer, SignalBank, SignalId, SignalType, System,
};

const CAPACITIES: &[usize] = &[64, 512, 4096];
const STREAM_LEN: usize = 16_384;

fn bench_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ring");

    for &capacity in CAPACITIES {
        group.bench_with_input(BenchmarkId::new("real", capacity), &capacity, |b, &cap| {
            let mut buf =
                SampleBuffer::new(SignalType::time_discrete_real(Continuity::Continuous), cap);
            b.iter(|| {
                for i in 0..cap {
                    buf.put(black_box(i as f64)).unwrap();
                }
                for _ in 0..cap {
                    black_box(buf.get::<f64>().unwrap());
                }
            });
        });

        group.bench_with_input(
            BenchmarkId::new("complex", capacity),
            &capacity,
            |b, &cap| {
                let mut buf = SampleBuffer::new(
                    SignalType::time_discrete_complex(Continuity::Continuous),
                    cap,
                );
                b.iter(|| {
                    for i in 0..cap {
                        buf.put(black_box(Complex64::new(i as f64, 0.5))).unwrap();
                    }
                    for _ in 0..cap {
                        black_box(buf.get::<Complex64>().unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_persist(c: &mut Criterion) {
    let mut group = c.benchmark_group("Persist");
    let dir = tempfile::tempdir().unwrap();

    for &capacity in CAPACITIES {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &cap| {
            let path = dir.path().join(format!("bench_{cap}.sgn"));
            let mut buf =
                SampleBuffer::new(SignalType::time_discrete_real(Continuity::Continuous), cap)
                    .with_file_name("bench.sgn");
            buf.open_file(&path).unwrap();
            b.iter(|| {
                for i in 0..STREAM_LEN {
                    buf.put(black_box(i as f64)).unwrap();
                    black_box(buf.get::<f64>().unwrap());
                }
            });
            buf.close().unwrap();
        });
    }

    group.finish();
}

/// Emits `total` zeros as fast as the output allows.
struct Zeros {
    out: [SignalId; 1],
    left: usize,
}

impl Block for Zeros {
    fn name(&self) -> &str {
        "zeros"
    }
    fn inputs(&self) -> &[SignalId] {
        &[]
    }
    fn outputs(&self) -> &[SignalId] {
        &self.out
    }
    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let out = &mut signals[self.out[0]];
        let n = out.available_to_write().min(self.left);
        for _ in 0..n {
            out.put(0.0f64)?;
        }
        self.left -= n;
        Ok(n > 0)
    }
}

/// Discards everything.
struct Drain {
    input: [SignalId; 1],
}

impl Block for Drain {
    fn name(&self) -> &str {
        "drain"
    }
    fn inputs(&self) -> &[SignalId] {
        &self.input
    }
    fn outputs(&self) -> &[SignalId] {
        &[]
    }
    fn run(&mut self, signals: &mut SignalBank) -> Result<bool> {
        let input = &mut signals[self.input[0]];
        let n = input.available_to_read();
        for _ in 0..n {
            black_box(input.get::<f64>()?);
        }
        Ok(n > 0)
    }
}

fn bench_system(c: &mut Criterion) {
    let mut group = c.benchmark_group("System");

    for &capacity in CAPACITIES {
        group.bench_with_input(BenchmarkId::new("run", capacity), &capacity, |b, &cap| {
            b.iter(|| {
                let mut system = System::new();
                let s = system.add_signal(SampleBuffer::new(
                    SignalType::time_discrete_real(Continuity::Continuous),
                    cap,
                ));
                system.add_block(Zeros {
                    out: [s],
                    left: STREAM_LEN,
                });
                system.add_block(Drain { input: [s] });
                black_box(system.run().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ring, bench_persist, bench_system);
criterion_main!(benches);
