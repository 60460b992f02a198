//! Hot-path benchmarks for the task substrate: arena churn and child-task
//! spawn/step cycles, the two per-tick costs of the control loop.

use criterion::{Criterion, criterion_group, criterion_main};
use pallet_tasks::{StackArena, Task, yield_once};
use std::hint::black_box;

fn bench_arena_churn(c: &mut Criterion) {
    let arena = StackArena::new("bench", 4096);
    c.bench_function("arena_alloc_free_nested", |b| {
        b.iter(|| {
            let outer = arena.alloc(black_box([0u64; 8]));
            let inner = arena.alloc(black_box([0u8; 64]));
            drop(inner);
            drop(outer);
        })
    });
}

fn bench_task_cycle(c: &mut Criterion) {
    async fn two_step() {
        yield_once().await;
    }

    let arena = StackArena::new("bench", 4096);
    c.bench_function("task_spawn_step_finish", |b| {
        b.iter(|| {
            let mut task = Task::spawn_in(&arena, two_step());
            while task.step().is_pending() {}
        })
    });
}

criterion_group!(benches, bench_arena_churn, bench_task_cycle);
criterion_main!(benches);
