//! Resolution benchmarks.
//!
//! Measures cold resolution (fresh nodes every iteration) against warm
//! lookups served from the per-node caches.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;
use tyres_solver::{BindingMap, ClassId, ClassRegistry, TypeDescriptor, TypeInfo, TypeResolver};

struct Model {
    resolver: TypeResolver,
    order: ClassId,
    chain_leaf: ClassId,
    list: ClassId,
    box_class: ClassId,
}

/// `Order -> Customer -> Address`, a `Box<T>` with a `List<T>` field and a
/// 32-deep `Level{n} extends Level{n-1}` chain.
fn build_model() -> Model {
    let registry = Arc::new(ClassRegistry::new());
    let wk = *registry.well_known();
    let r = &registry;

    let string = r.declare_class("String");
    let address = r.declare_class("Address");
    r.add_field(address, "city", TypeDescriptor::class(string));
    let customer = r.declare_class("Customer");
    r.add_field(customer, "address", TypeDescriptor::class(address));
    r.add_field(customer, "referrer", TypeDescriptor::class(customer));
    let order = r.declare_class("Order");
    r.add_field(order, "customer", TypeDescriptor::class(customer));

    let box_class = r.declare_class("Box");
    let t = r.add_type_param(box_class, "T", vec![]);
    r.add_field(box_class, "value", TypeDescriptor::variable(t));
    r.add_field(
        box_class,
        "items",
        TypeDescriptor::parametrized(wk.list, [TypeDescriptor::variable(t)]),
    );

    let mut parent = r.declare_class("Level0");
    r.add_field(parent, "root", TypeDescriptor::class(order));
    for n in 1..32 {
        let level = r.declare_class(&format!("Level{n}"));
        r.set_superclass(level, TypeDescriptor::class(parent));
        parent = level;
    }

    Model {
        resolver: TypeResolver::for_registry(registry.clone()),
        order,
        chain_leaf: parent,
        list: wk.list,
        box_class,
    }
}

fn root(model: &Model, descriptor: &TypeDescriptor) -> TypeInfo {
    model
        .resolver
        .resolve(descriptor, &BindingMap::new())
        .expect("bench descriptor resolves")
}

fn bench_property_paths(c: &mut Criterion) {
    let model = build_model();
    let mut group = c.benchmark_group("property_path");
    let order = TypeDescriptor::class(model.order);

    for path in ["customer", "customer.address.city", "customer.referrer.referrer.referrer.address"] {
        group.bench_with_input(BenchmarkId::new("cold", path), path, |b, path| {
            b.iter(|| {
                let info = root(&model, &order);
                black_box(info.property(path).expect("path resolves"))
            })
        });

        let warm = root(&model, &order);
        group.bench_with_input(BenchmarkId::new("warm", path), path, |b, path| {
            b.iter(|| black_box(warm.property(path).expect("path resolves")))
        });
    }

    group.finish();
}

fn bench_generic_components(c: &mut Criterion) {
    let model = build_model();
    let mut group = c.benchmark_group("component_type");
    let boxed = TypeDescriptor::parametrized(
        model.box_class,
        [TypeDescriptor::parametrized(model.list, [TypeDescriptor::class(model.order)])],
    );

    group.bench_function("cold_box_items", |b| {
        b.iter(|| {
            let info = root(&model, &boxed);
            let items = info.property("items").expect("items resolves");
            black_box(items.map(|items| items.component_type()))
        })
    });

    group.bench_function("cold_box_value_component", |b| {
        b.iter(|| {
            let info = root(&model, &boxed);
            let value = info.property("value").expect("value resolves");
            black_box(value.map(|value| value.component_type()))
        })
    });

    group.finish();
}

fn bench_inheritance_depth(c: &mut Criterion) {
    let model = build_model();
    let mut group = c.benchmark_group("inheritance");
    let leaf = TypeDescriptor::class(model.chain_leaf);

    group.bench_function("inherited_field_32_deep", |b| {
        b.iter(|| {
            let info = root(&model, &leaf);
            black_box(info.property("root.customer").expect("path resolves"))
        })
    });

    group.finish();
}

criterion_group!(
    resolve_benches,
    bench_property_paths,
    bench_generic_components,
    bench_inheritance_depth
);
criterion_main!(resolve_benches);
