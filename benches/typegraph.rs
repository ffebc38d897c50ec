//! Benchmarks for building and walking the type graph.
//!
//! The input is a synthetic assembly of generic and plain classes, each with a handful of fields
//! and methods, referencing a missing core library:
//! - Loading and finalizing a context
//! - Enumerating every type with its members
//! - Resolving types by name
//! - Comparing closed generic instantiations

extern crate cilgraph;

#[path = "../tests/common/builder.rs"]
mod builder;

use builder::{element, field_attr, method_attr, type_attr, ImageBuilder, Sig};
use cilgraph::LoadContext;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const TYPE_COUNT: usize = 200;

/// `TYPE_COUNT` classes `Bench.TypeN`; every tenth one is generic and its neighbours hold
/// fields instantiating it.
fn synthetic_image() -> Vec<u8> {
    let mut b = ImageBuilder::new("Bench");
    let mscorlib = b.assembly_ref("mscorlib");
    let object = b.type_ref(mscorlib, "System", "Object");

    let mut generic = None;
    let mut owners = Vec::new();
    for index in 0..TYPE_COUNT {
        let name = if index % 10 == 0 {
            format!("Type{index}`1")
        } else {
            format!("Type{index}")
        };
        let row = b.type_def(type_attr::PUBLIC, "Bench", &name, Some(object));
        if index % 10 == 0 {
            generic = Some(row);
            owners.push(row);
        }

        b.field(field_attr::PUBLIC, "Count", &Sig::field().prim(element::I4).build());
        b.field(field_attr::PRIVATE, "name", &Sig::field().prim(element::STRING).build());
        if let Some(generic) = generic.filter(|_| index % 10 != 0) {
            b.field(
                field_attr::PUBLIC,
                "Items",
                &Sig::field()
                    .generic_inst(false, generic, 1)
                    .class(object)
                    .build(),
            );
        }

        b.method(
            method_attr::PUBLIC,
            "Run",
            &Sig::method(true, 0, 2)
                .prim(element::VOID)
                .prim(element::I4)
                .prim(element::STRING)
                .build(),
        );
        b.param(1, "count");
        b.param(2, "label");
        b.method(
            method_attr::PRIVATE | method_attr::STATIC,
            "Helper",
            &Sig::method(false, 0, 0).prim(element::R8).build(),
        );
    }

    for owner in owners {
        b.generic_param(0, 0, owner, "T");
    }

    b.build()
}

fn bench_load(c: &mut Criterion) {
    let image = synthetic_image();

    c.bench_function("load_and_finalize", |b| {
        b.iter(|| {
            let context = LoadContext::new();
            let module = context.request_load_bytes(black_box(image.clone())).unwrap();
            context.finalize().unwrap();
            black_box(module.all_types().len())
        });
    });
}

fn bench_enumerate(c: &mut Criterion) {
    let image = synthetic_image();

    c.bench_function("enumerate_members", |b| {
        b.iter(|| {
            let context = LoadContext::new();
            let module = context.request_load_bytes(image.clone()).unwrap();
            context.finalize().unwrap();

            let mut count = 0;
            for ty in module.all_types() {
                count += ty.base_type().iter().count();
                for field in ty.fields(false) {
                    count += field.field_type().iter().count();
                }
                for method in ty.methods(false) {
                    count += method.parameters().len();
                }
            }
            black_box(count)
        });
    });
}

fn bench_resolve(c: &mut Criterion) {
    let context = LoadContext::new();
    context.request_load_bytes(synthetic_image()).unwrap();
    context.finalize().unwrap();

    let names: Vec<String> = (0..TYPE_COUNT)
        .filter(|index| index % 10 != 0)
        .map(|index| format!("Bench.Type{index}"))
        .collect();

    c.bench_function("resolve_type", |b| {
        b.iter(|| {
            for name in &names {
                black_box(context.resolve_type(black_box(name)).unwrap());
            }
        });
    });

    c.bench_function("resolve_type_array", |b| {
        b.iter(|| black_box(context.resolve_type(black_box("Bench.Type199[]")).unwrap()));
    });
}

fn bench_equality(c: &mut Criterion) {
    let context = LoadContext::new();
    context.request_load_bytes(synthetic_image()).unwrap();
    context.finalize().unwrap();

    let first = context.resolve_type("Bench.Type11").unwrap().fields(true)[1]
        .field_type()
        .unwrap();
    let second = context.resolve_type("Bench.Type12").unwrap().fields(true)[1]
        .field_type()
        .unwrap();

    c.bench_function("closed_generic_equality", |b| {
        b.iter(|| black_box(black_box(&first) == black_box(&second)));
    });
}

criterion_group!(
    benches,
    bench_load,
    bench_enumerate,
    bench_resolve,
    bench_equality
);
criterion_main!(benches);
