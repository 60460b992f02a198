//! Control procedures and tick driver for the palletizer cell.
//!
//! Three independently-progressing procedures — arm, magazine, inlet — run
//! as resumable tasks on one thread, stepped once per tick each, in that
//! fixed order. They coordinate only through the shared [`plant::Plant`]
//! context: the process activation/fault state, the published phase cells
//! and the box counter.

pub mod arm;
pub mod driver;
pub mod inlet;
pub mod magazine;
pub mod plant;
