//! Cooperative resumable tasks for a single-threaded, tick-driven control
//! loop.
//!
//! A task is a future that is never handed to a reactor: the driver (or a
//! parent task) polls it exactly once per tick with a no-op waker. Every
//! `.await` in a task body is therefore a visible suspension point, and the
//! relative order of side effects across all tasks in one tick is fully
//! determined by the fixed top-level stepping order.
//!
//! Three pieces:
//!
//! - [`arena`] — per-task-family stack-discipline allocator backing the
//!   suspended state of nested child tasks. The only module with `unsafe`
//!   (besides the pinning line in [`task`]).
//! - [`task`] — [`Task`](task::Task): step-once / is-finished wrapper around
//!   a future, in boxed or arena storage.
//! - [`step`] — the composition primitives: [`yield_once`](step::yield_once),
//!   [`wait_while`](step::wait_while), [`drive`](step::drive) and
//!   [`drive_while`](step::drive_while).

pub mod arena;
pub mod step;
pub mod task;

pub use arena::{ArenaBox, StackArena};
pub use step::{drive, drive_while, wait_while, yield_once};
pub use task::Task;
