//! The resumable task: a future stepped once per tick.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::arena::{ArenaBox, StackArena};

/// Where a task's suspended state lives.
///
/// Top-level procedures never nest, so plain boxed storage is fine for them;
/// child tasks draw from their family's arena so that per-suspension state
/// costs no allocator round-trip in the control loop.
enum Store<F> {
    Heap(Pin<Box<F>>),
    Arena(ArenaBox<F>),
}

/// A single suspendable procedure instance.
///
/// Construction performs no side effect: the body starts suspended before
/// its first statement and only runs when [`step`](Task::step) is called.
/// Dropping an unfinished task abandons it — destructors of everything it
/// holds (including nested child tasks) run immediately and its arena
/// region is reclaimed.
pub struct Task<F: Future> {
    store: Store<F>,
    finished: bool,
}

impl<F: Future> Task<F> {
    /// Create a task in unmanaged (heap) storage.
    pub fn new(body: F) -> Self {
        Self {
            store: Store::Heap(Box::pin(body)),
            finished: false,
        }
    }

    /// Create a task whose suspended state lives in `arena`.
    ///
    /// Panics if the arena lacks capacity (a sizing bug, not an operational
    /// condition).
    pub fn spawn_in(arena: &Rc<StackArena>, body: F) -> Self {
        Self {
            store: Store::Arena(arena.alloc(body)),
            finished: false,
        }
    }

    /// Resume from the last suspension point until the next one, or until
    /// the body runs to its end.
    ///
    /// Side effects performed between suspension points are committed when
    /// this returns. `Poll::Ready` hands out the body's output exactly once
    /// and marks the task finished.
    ///
    /// # Panics
    ///
    /// Panics if the task is already finished.
    pub fn step(&mut self) -> Poll<F::Output> {
        assert!(!self.finished, "step on a finished task");
        let mut cx = Context::from_waker(Waker::noop());
        let body = match &mut self.store {
            Store::Heap(body) => body.as_mut(),
            // SAFETY: the arena box is private to this task, the future is
            // never moved out of it, and drop runs in place.
            Store::Arena(body) => unsafe { Pin::new_unchecked(&mut **body) },
        };
        let poll = body.poll(&mut cx);
        if poll.is_ready() {
            self.finished = true;
        }
        poll
    }

    /// True once the body has run to its end.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::step::yield_once;

    #[test]
    fn construction_has_no_side_effect() {
        let ran = Cell::new(false);
        let mut task = Task::new(async {
            ran.set(true);
        });
        assert!(!ran.get());
        assert!(!task.is_finished());
        assert!(task.step().is_ready());
        assert!(ran.get());
        assert!(task.is_finished());
    }

    #[test]
    fn output_is_handed_out_on_the_finishing_step() {
        let mut task = Task::new(async {
            yield_once().await;
            7u32
        });
        assert_eq!(task.step(), Poll::Pending);
        assert_eq!(task.step(), Poll::Ready(7));
    }

    #[test]
    #[should_panic(expected = "finished task")]
    fn stepping_a_finished_task_is_a_fault() {
        let mut task = Task::new(async {});
        assert!(task.step().is_ready());
        let _ = task.step();
    }

    async fn forever() {
        loop {
            yield_once().await;
        }
    }

    #[test]
    fn abandoned_task_releases_its_arena_region() {
        let arena = StackArena::new("test", 512);
        let mut task = Task::spawn_in(&arena, forever());
        assert!(!arena.is_empty());
        assert_eq!(task.step(), Poll::Pending);
        drop(task); // unfinished
        assert!(arena.is_empty());
    }
}
