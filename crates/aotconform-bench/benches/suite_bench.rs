//! Harness throughput: single bridge calls and whole-registry runs.

use aotconform_abi::{Arg, NativeBridge, ReferenceBridge};
use aotconform_core::Scalar;
use aotconform_harness::{Registry, TestRunner};
use aotconform_runtime::RuntimeConfig;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_invoke(c: &mut Criterion) {
    let bridge = ReferenceBridge::new(RuntimeConfig::default());
    let args: [Arg; 2] = [Scalar::Int(70000).into(), Scalar::Int(-3).into()];
    c.bench_function("invoke_int_oper", |b| {
        b.iter(|| black_box(bridge.invoke("IntMath.intOper", black_box(&args))));
    });
}

fn bench_handle_loop(c: &mut Criterion) {
    let bridge = ReferenceBridge::new(RuntimeConfig::default());
    let args: [Arg; 1] = [Scalar::Int(1024).into()];
    c.bench_function("invoke_handle_loop_1024", |b| {
        b.iter(|| black_box(bridge.invoke("LocalRef.loop", &args)));
    });
}

fn bench_standard_registry(c: &mut Criterion) {
    let config = RuntimeConfig::default();
    let registry = match Registry::standard(&config) {
        Ok(registry) => registry,
        Err(err) => panic!("standard registry is invalid: {err}"),
    };
    let mut group = c.benchmark_group("registry");
    group.sample_size(10);
    group.bench_function("standard_run", |b| {
        // A fresh runtime per run keeps heap growth out of the measurement.
        b.iter(|| {
            let bridge = ReferenceBridge::new(config);
            black_box(TestRunner::new(&bridge).run(&registry).summary())
        });
    });
    group.bench_function("fingerprint", |b| {
        b.iter(|| black_box(registry.fingerprint()));
    });
    group.finish();
}

criterion_group!(benches, bench_invoke, bench_handle_loop, bench_standard_registry);
criterion_main!(benches);
