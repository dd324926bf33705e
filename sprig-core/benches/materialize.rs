//! Benchmark for materialization and full re-render cost.
//!
//! Run with: cargo bench --package sprig-core --bench materialize

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sprig_core::dom::{DomEvent, MemoryHost};
use sprig_core::{
    children, create_element, materialize, on, props, Component, Host, Node, Props, Root, Scope,
    Style,
};

fn row(i: usize) -> Node<MemoryHost> {
    create_element(
        "li",
        Some(props! {
            "className" => if i % 2 == 0 { "row even" } else { "row odd" },
            "style" => Style::new().set("paddingLeft", format!("{}px", i % 8)),
            "data-index" => i,
            "onClick" => on(|_: &DomEvent| {}),
        }),
        children![create_element("span", None, children!["Item ", i])],
    )
}

fn list(rows: usize) -> Node<MemoryHost> {
    let items: Vec<_> = (0..rows).map(row).collect();
    create_element("ul", None, children![items])
}

fn benchmark_materialize_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize_list");
    for rows in [10, 100, 1000] {
        let host = MemoryHost::new();
        let tree = list(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &tree, |b, tree| {
            b.iter(|| black_box(materialize(&host, tree).unwrap()));
        });
    }
    group.finish();
}

fn benchmark_rerender(c: &mut Criterion) {
    let rows = 500;
    let app = Component::new("List", move |cx: &mut Scope<MemoryHost>, _: &Props<MemoryHost>| {
        let (tick, _) = cx.use_state(0_u64);
        create_element("main", None, children![tick, list(rows)])
    });

    let host = MemoryHost::new();
    let container = host.create_element("div");
    let root = Root::new(host);
    root.mount(create_element(app, None, children![]), container).unwrap();

    c.bench_function("rerender_500_rows", |b| {
        b.iter(|| root.render().unwrap());
    });
}

criterion_group!(benches, benchmark_materialize_list, benchmark_rerender);
criterion_main!(benches);
