//! Oracle benchmarks.
//!
//! The oracle runs once per case, so its cost bounds how fast a registry can
//! be recomputed.

use aotconform_core::compare::{NanOrder, compare_ordered_f64};
use aotconform_core::objects::{TypeDesc, is_instance_of};
use aotconform_core::{float_math, int_math};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_int_oper(c: &mut Criterion) {
    c.bench_function("int_oper", |b| {
        b.iter(|| black_box(int_math::int_oper(black_box(70000), black_box(-3))));
    });
}

fn bench_double_oper(c: &mut Criterion) {
    c.bench_function("double_oper", |b| {
        b.iter(|| black_box(float_math::double_oper(black_box(2.5), black_box(-0.1))));
    });
}

fn bench_compare_ordered(c: &mut Criterion) {
    let pairs = [(f64::NAN, 1.0), (1.0, f64::NAN), (-0.0, 0.0), (2.0, 3.0)];
    c.bench_function("compare_ordered_f64", |b| {
        b.iter(|| {
            for (x, y) in pairs {
                black_box(compare_ordered_f64(x, y, NanOrder::Greatest));
                black_box(compare_ordered_f64(x, y, NanOrder::Least));
            }
        });
    });
}

fn bench_instance_of(c: &mut Criterion) {
    let subject = TypeDesc::class("EvenMoreClasses").array_of();
    let target = TypeDesc::class("Classes").array_of();
    c.bench_function("is_instance_of_array", |b| {
        b.iter(|| black_box(is_instance_of(Some(black_box(&subject)), black_box(&target))));
    });
}

criterion_group!(
    benches,
    bench_int_oper,
    bench_double_oper,
    bench_compare_ordered,
    bench_instance_of
);
criterion_main!(benches);
