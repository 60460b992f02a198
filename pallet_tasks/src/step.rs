//! Composition primitives for task bodies.
//!
//! These are the only places a task suspends. A body built from them
//! suspends at most once per step, so each step is a short, bounded unit of
//! work and never blocks.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::task::Task;

/// Suspend unconditionally for exactly one step.
pub fn yield_once() -> YieldOnce {
    YieldOnce { yielded: false }
}

/// Future returned by [`yield_once`].
pub struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            Poll::Pending
        }
    }
}

/// Suspend while `cond` holds, re-checking at each resumption.
///
/// Falls through without suspending when `cond` is false on entry; a
/// condition that is true for exactly `k` checks costs exactly `k`
/// suspensions.
pub async fn wait_while(mut cond: impl FnMut() -> bool) {
    while cond() {
        yield_once().await;
    }
}

/// Drive a child task to completion, one child step per parent step.
///
/// The parent is suspended after every child step, including the finishing
/// one, so the child's last side effects are visible to the rest of the
/// system for a full tick before the parent continues.
pub async fn drive<F: Future>(mut child: Task<F>) -> F::Output {
    loop {
        match child.step() {
            Poll::Ready(out) => {
                yield_once().await;
                return out;
            }
            Poll::Pending => yield_once().await,
        }
    }
}

/// Drive a child task while `cond` holds, abandoning it the moment the
/// condition turns false.
///
/// `cond` is re-checked before every child step; once it is false the
/// unfinished child is dropped — its cleanup runs exactly once, right here —
/// and `None` is returned. Completing normally yields `Some(output)`.
/// Abandonment only ever happens between child steps, never inside one.
pub async fn drive_while<F, C>(mut cond: C, mut child: Task<F>) -> Option<F::Output>
where
    F: Future,
    C: FnMut() -> bool,
{
    loop {
        if !cond() {
            return None;
        }
        match child.step() {
            Poll::Ready(out) => {
                yield_once().await;
                return Some(out);
            }
            Poll::Pending => yield_once().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Step a top-level task until it finishes, counting the steps.
    fn steps_to_finish<F: Future>(task: &mut Task<F>) -> usize {
        let mut steps = 0;
        loop {
            steps += 1;
            if task.step().is_ready() {
                return steps;
            }
        }
    }

    #[test]
    fn wait_while_false_condition_never_suspends() {
        let mut task = Task::new(wait_while(|| false));
        assert_eq!(steps_to_finish(&mut task), 1);
    }

    #[test]
    fn wait_while_suspends_once_per_true_check() {
        for k in 1..5u32 {
            let remaining = Cell::new(k);
            let mut task = Task::new(wait_while(|| {
                if remaining.get() == 0 {
                    false
                } else {
                    remaining.set(remaining.get() - 1);
                    true
                }
            }));
            // k suspensions, then the falling-through step.
            assert_eq!(steps_to_finish(&mut task), k as usize + 1);
        }
    }

    #[test]
    fn yield_once_suspends_exactly_once() {
        let mut task = Task::new(async {
            yield_once().await;
        });
        assert_eq!(steps_to_finish(&mut task), 2);
    }

    #[test]
    fn drive_steps_child_once_per_parent_step() {
        let child_steps = Cell::new(0u32);
        let mut task = Task::new(async {
            let child = Task::new(async {
                child_steps.set(child_steps.get() + 1);
                yield_once().await;
                child_steps.set(child_steps.get() + 1);
            });
            drive(child).await
        });

        assert!(task.step().is_pending());
        assert_eq!(child_steps.get(), 1);
        assert!(task.step().is_pending());
        assert_eq!(child_steps.get(), 2); // child finished this step
        assert!(task.step().is_ready());
        assert_eq!(child_steps.get(), 2); // never stepped again
    }

    #[test]
    fn drive_while_abandons_the_child_exactly_once() {
        struct DropCounter<'a>(&'a Cell<u32>);
        impl Drop for DropCounter<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        async fn endless_child(guard: DropCounter<'_>, steps: &Cell<u32>) {
            let _guard = guard;
            loop {
                steps.set(steps.get() + 1);
                yield_once().await;
            }
        }

        let drops = Cell::new(0);
        let child_steps = Cell::new(0u32);
        let keep_going = Cell::new(true);

        let guard = DropCounter(&drops);
        let mut task = Task::new(async {
            let child = Task::new(endless_child(guard, &child_steps));
            drive_while(|| keep_going.get(), child).await
        });

        assert!(task.step().is_pending());
        assert!(task.step().is_pending());
        assert_eq!(child_steps.get(), 2);
        assert_eq!(drops.get(), 0);

        keep_going.set(false);
        assert!(task.step().is_ready());
        assert_eq!(child_steps.get(), 2); // never called again after the flip
        assert_eq!(drops.get(), 1); // cleanup ran exactly once
    }

    #[test]
    fn drive_while_passes_through_a_completed_child() {
        let mut task = Task::new(async {
            let child = Task::new(async {
                yield_once().await;
                21u32
            });
            drive_while(|| true, child).await
        });
        let mut last = Poll::Pending;
        for _ in 0..16 {
            last = task.step();
            if last.is_ready() {
                break;
            }
        }
        assert_eq!(last, Poll::Ready(Some(21)));
    }
}
