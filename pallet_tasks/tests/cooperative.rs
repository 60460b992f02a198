//! End-to-end checks of the task substrate: nested arena-backed children,
//! abandonment through several nesting levels, and stack-order reclamation.

use std::cell::Cell;
use std::rc::Rc;

use pallet_tasks::{StackArena, Task, drive, drive_while, wait_while, yield_once};

struct DropCounter<'a>(&'a Cell<u32>);

impl Drop for DropCounter<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

async fn leaf(ticks: u32) {
    for _ in 0..ticks {
        yield_once().await;
    }
}

async fn middle(arena: &Rc<StackArena>, drops: &Cell<u32>) {
    let _guard = DropCounter(drops);
    loop {
        drive(Task::spawn_in(arena, leaf(3))).await;
    }
}

#[test]
fn nested_children_reclaim_in_stack_order() {
    let arena = StackArena::new("nested", 2048);
    let mut parent = Task::new({
        let arena = Rc::clone(&arena);
        async move {
            drive(Task::spawn_in(&arena, leaf(2))).await;
            drive(Task::spawn_in(&arena, leaf(1))).await;
        }
    });

    let mut steps = 0;
    while parent.step().is_pending() {
        steps += 1;
        assert!(steps < 32, "parent did not finish");
    }
    assert!(arena.is_empty());
}

#[test]
fn abandonment_unwinds_nested_arena_state() {
    let drops = Cell::new(0);
    let keep_going = Cell::new(true);
    let arena = StackArena::new("abandon", 2048);

    let mut parent = Task::new({
        let arena = Rc::clone(&arena);
        let drops = &drops;
        let keep_going = &keep_going;
        async move {
            let child = Task::spawn_in(&arena, middle(&arena, drops));
            drive_while(|| keep_going.get(), child).await;
        }
    });

    // Let the middle task spawn its own leaf before interrupting.
    for _ in 0..4 {
        assert!(parent.step().is_pending());
    }
    let used_mid_flight = arena.used();
    assert!(used_mid_flight > 0);

    keep_going.set(false);
    assert!(parent.step().is_ready());
    // Both nesting levels were torn down, innermost first.
    assert_eq!(drops.get(), 1);
    assert!(arena.is_empty());
}

#[test]
fn wait_while_composes_with_arena_children() {
    let gate = Cell::new(true);
    let arena = StackArena::new("gate", 1024);

    let mut parent = Task::new({
        let arena = Rc::clone(&arena);
        let gate = &gate;
        async move {
            wait_while(|| gate.get()).await;
            drive(Task::spawn_in(&arena, leaf(1))).await;
        }
    });

    for _ in 0..3 {
        assert!(parent.step().is_pending()); // parked on the gate
    }
    assert!(arena.is_empty(), "no child may exist while gated");

    gate.set(false);
    while !parent.is_finished() {
        let _ = parent.step();
    }
    assert!(arena.is_empty());
}
