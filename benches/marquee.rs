use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gallery_core::models::{Point, Rect};
use gallery_core::ui::{GridLayout, SelectionEngine};
use std::hint::black_box;

fn populated_engine(count: usize) -> SelectionEngine<usize> {
    let grid = GridLayout::new(180.0, 10.0, 20.0);
    let mut engine = SelectionEngine::new();
    for (index, rect) in grid.layout(0..count, 1920.0) {
        engine.register(index, rect);
    }
    engine
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("marquee_hit_test");
    for count in [100usize, 1_000, 10_000] {
        let engine = populated_engine(count);
        let marquee = Rect::from_points(Point::new(5.0, 5.0), Point::new(900.0, 1200.0));

        group.bench_with_input(BenchmarkId::from_parameter(count), &engine, |b, engine| {
            b.iter(|| engine.hit_test(black_box(&marquee)))
        });
    }
    group.finish();
}

fn bench_drag_gesture(c: &mut Criterion) {
    let mut engine = populated_engine(1_000);

    c.bench_function("marquee_drag_50_moves", |b| {
        b.iter(|| {
            engine.pointer_down(Point::new(5.0, 5.0));
            for step in 1..=50 {
                let offset = step as f32 * 20.0;
                black_box(engine.pointer_move(Point::new(offset, offset), false));
            }
            engine.pointer_up();
        })
    });
}

criterion_group!(benches, bench_hit_test, bench_drag_gesture);
criterion_main!(benches);
