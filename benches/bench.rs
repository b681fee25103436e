use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use growing_tree::{Tree, TreeView, TreeViewState};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;

/// All permutations of `0..size` as leaves.
fn permutations(size: u8) -> impl FnMut(&Vec<u8>) -> Vec<Vec<u8>> {
    move |list: &Vec<u8>| {
        (0..size)
            .filter(|element| !list.contains(element))
            .map(|element| {
                let mut child = list.clone();
                child.push(element);
                child
            })
            .collect()
    }
}

/// Like [`permutations`] but with displayable data for the view.
fn digit_permutations(size: u8) -> impl FnMut(&String) -> Vec<String> {
    move |digits: &String| {
        (0..size)
            .map(|digit| char::from(b'0' + digit))
            .filter(|digit| !digits.contains(*digit))
            .map(|digit| format!("{digits}{digit}"))
            .collect()
    }
}

fn grow(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("grow");

    for size in [4, 6, 8] {
        let nodes = Tree::grown(Vec::new(), permutations(size)).len();
        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_function(format!("permutations-{size}"), |bencher| {
            bencher.iter(|| black_box(Tree::grown(Vec::new(), permutations(black_box(size)))));
        });
    }

    group.finish();
}

fn traverse(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("traverse");

    let tree = Tree::grown(Vec::new(), permutations(8));
    group.throughput(Throughput::Elements(tree.len() as u64));

    group.bench_function("pre-order-action", |bencher| {
        bencher.iter(|| {
            let mut leaves = 0_usize;
            tree.pre_order(|node| leaves += usize::from(node.is_leaf()));
            black_box(leaves)
        });
    });

    group.bench_function("pre-order-iter", |bencher| {
        bencher.iter(|| black_box(tree.iter().filter(|node| node.is_leaf()).count()));
    });

    group.bench_function("post-order-iter", |bencher| {
        bencher.iter(|| black_box(tree.root().iter_post_order().count()));
    });

    group.bench_function("remove-first-child", |bencher| {
        bencher.iter_batched(
            || tree.clone(),
            |mut tree| {
                let root = tree.root_id();
                black_box(tree.remove(root, 0))
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn renders(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("render");
    group.throughput(Throughput::Elements(1)); // Frames per second

    let buffer_size = Rect::new(0, 0, 100, 100);

    let tree = Tree::grown(String::new(), digit_permutations(6));
    group.bench_function("permutations-6", |bencher| {
        bencher.iter_batched(
            || {
                let mut state = TreeViewState::default();
                state.open(vec![0]);
                state.open(vec![0, 0]);
                state.open(vec![0, 0, 0]);
                state.open(vec![0, 5]);
                state
            },
            |mut state| {
                let mut buffer = Buffer::empty(buffer_size);
                let view = TreeView::new(black_box(tree.root()));
                view.render(buffer_size, black_box(&mut buffer), &mut state);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Create flamegraphs with `cargo bench --bench bench -- --profile-time=5`
#[cfg(unix)]
fn profiled() -> Criterion {
    use pprof::criterion::{Output, PProfProfiler};
    Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}
#[cfg(not(unix))]
fn profiled() -> Criterion {
    Criterion::default()
}

criterion_group! {
    name = benches;
    config = profiled();
    targets = grow, traverse, renders
}
criterion_main!(benches);
