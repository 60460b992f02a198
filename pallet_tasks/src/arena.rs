//! Per-task-family stack-discipline arena.
//!
//! Child-task state nests exactly like procedure calls, so a bump cursor
//! with last-allocated-first-freed reclamation serves it with zero
//! fragmentation and no general-purpose allocator in the control loop.
//! Violating the stack order is a logic bug and panics; it is never a
//! recoverable condition.

use std::alloc::{self, Layout};
use std::cell::Cell;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::rc::Rc;

/// The arena aligns its buffer (and caps per-allocation alignment) at this.
const MAX_ALIGN: usize = 16;

/// Fixed-capacity byte region with a single high-water cursor.
///
/// One arena per task family (e.g. "arm"). Allocation bumps the cursor;
/// freeing the most recent live region rewinds it. The region is allocated
/// once at construction and never resized.
pub struct StackArena {
    name: &'static str,
    buf: NonNull<u8>,
    capacity: usize,
    cursor: Cell<usize>,
}

impl StackArena {
    /// Create an arena with the given diagnostic name and capacity in bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(name: &'static str, capacity: usize) -> Rc<Self> {
        assert!(capacity > 0, "arena `{name}` needs a non-zero capacity");
        let layout = Layout::from_size_align(capacity, MAX_ALIGN)
            .unwrap_or_else(|_| panic!("arena `{name}`: invalid capacity {capacity}"));
        // SAFETY: layout has non-zero size, checked above.
        let raw = unsafe { alloc::alloc(layout) };
        let buf = match NonNull::new(raw) {
            Some(p) => p,
            None => alloc::handle_alloc_error(layout),
        };
        Rc::new(Self {
            name,
            buf,
            capacity,
            cursor: Cell::new(0),
        })
    }

    /// Place `value` at the current cursor (aligned up) and advance past it.
    ///
    /// # Panics
    ///
    /// Panics if the request would exceed the arena's capacity, or if `T`
    /// needs more than 16-byte alignment.
    pub fn alloc<T>(self: &Rc<Self>, value: T) -> ArenaBox<T> {
        let size = size_of::<T>();
        let align = align_of::<T>();
        assert!(
            align <= MAX_ALIGN,
            "arena `{}`: alignment {align} exceeds the supported maximum",
            self.name
        );
        let start = self.cursor.get();
        let offset = (start + align - 1) & !(align - 1);
        let end = offset + size;
        assert!(
            end <= self.capacity,
            "arena `{}` overflow: {size} bytes requested at offset {offset}, capacity {}",
            self.name,
            self.capacity
        );
        // SAFETY: offset + size fits in the buffer and is aligned for T;
        // the cursor guarantees the region holds no live value.
        let ptr = unsafe {
            let ptr = self.buf.as_ptr().add(offset).cast::<T>();
            ptr.write(value);
            NonNull::new_unchecked(ptr)
        };
        self.cursor.set(end);
        ArenaBox {
            ptr,
            start,
            end,
            arena: Rc::clone(self),
            _owns: PhantomData,
        }
    }

    /// Diagnostic name of the task family this arena backs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bytes currently allocated (the cursor position).
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Fixed capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when no live allocation remains.
    pub fn is_empty(&self) -> bool {
        self.cursor.get() == 0
    }
}

impl Drop for StackArena {
    fn drop(&mut self) {
        // Every ArenaBox holds an Rc to its arena, so by the time this runs
        // no allocation is live.
        let layout = Layout::from_size_align(self.capacity, MAX_ALIGN)
            .expect("layout was validated at construction");
        // SAFETY: buf was allocated with exactly this layout.
        unsafe { alloc::dealloc(self.buf.as_ptr(), layout) };
    }
}

/// An owned value placed in a [`StackArena`].
///
/// Dropping it frees the region. The freed region must be the most recently
/// allocated live one; the drop first runs the value's own destructor (which
/// releases any regions allocated *after* this one, in nesting order), then
/// verifies the cursor sits exactly at this region's end and rewinds it to
/// the pre-allocation offset, reclaiming alignment padding as well.
pub struct ArenaBox<T> {
    ptr: NonNull<T>,
    /// Cursor before this allocation (pre-padding).
    start: usize,
    /// Cursor after this allocation.
    end: usize,
    arena: Rc<StackArena>,
    _owns: PhantomData<T>,
}

impl<T> ArenaBox<T> {
    /// The arena this value lives in.
    pub fn arena(&self) -> &StackArena {
        &self.arena
    }
}

impl<T> Deref for ArenaBox<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: ptr points at a live, initialized T for self's lifetime.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> DerefMut for ArenaBox<T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: as above; &mut self gives exclusive access.
        unsafe { self.ptr.as_mut() }
    }
}

impl<T> Drop for ArenaBox<T> {
    fn drop(&mut self) {
        // SAFETY: the value is live and dropped exactly once, in place.
        unsafe { self.ptr.as_ptr().drop_in_place() };
        let cursor = self.arena.cursor.get();
        assert_eq!(
            cursor, self.end,
            "arena `{}`: out-of-order free (region ends at {}, cursor at {cursor})",
            self.arena.name, self.end
        );
        self.arena.cursor.set(self.start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo_sequence_restores_cursor() {
        let arena = StackArena::new("test", 256);
        assert!(arena.is_empty());
        {
            let a = arena.alloc(1u64);
            let used_after_a = arena.used();
            {
                let b = arena.alloc([0u8; 24]);
                assert!(arena.used() > used_after_a);
                drop(b);
            }
            assert_eq!(arena.used(), used_after_a);
            assert_eq!(*a, 1);
        }
        assert!(arena.is_empty());
    }

    #[test]
    fn padding_is_reclaimed_with_the_region() {
        let arena = StackArena::new("test", 256);
        let a = arena.alloc(1u8);
        let before_b = arena.used();
        let b = arena.alloc(2u64); // forces 7 bytes of padding
        assert!(arena.used() >= before_b + 7 + 8);
        drop(b);
        assert_eq!(arena.used(), before_b);
        drop(a);
        assert!(arena.is_empty());
    }

    #[test]
    #[should_panic(expected = "out-of-order free")]
    fn out_of_order_free_is_a_fault() {
        let arena = StackArena::new("test", 256);
        let a = arena.alloc(1u32);
        let _b = arena.alloc(2u32);
        drop(a);
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn overflow_is_a_fault() {
        let arena = StackArena::new("tiny", 16);
        let _a = arena.alloc([0u8; 32]);
    }

    #[test]
    fn value_destructor_runs_once() {
        use std::cell::Cell;

        struct Guard<'a>(&'a Cell<u32>);
        impl Drop for Guard<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Cell::new(0);
        let arena = StackArena::new("test", 64);
        let g = arena.alloc(Guard(&drops));
        drop(g);
        assert_eq!(drops.get(), 1);
        assert!(arena.is_empty());
    }

    #[test]
    fn deref_mut_reaches_the_placed_value() {
        let arena = StackArena::new("test", 64);
        let mut v = arena.alloc(40u32);
        *v += 2;
        assert_eq!(*v, 42);
    }
}
