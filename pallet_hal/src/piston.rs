//! Debounced piston simulator (the gripper).

use std::cell::Cell;

use tracing::trace;

use crate::Actuator;

/// Ticks a commanded transition takes to complete.
const TRANSITION_TICKS: u8 = 3;

/// A two-position piston with a fixed multi-tick transition delay.
///
/// Extended means the gripper is open; retracted means it is closed around
/// a box. The piston starts extended. Commanding the side it is already on
/// is a no-op; re-commanding an in-flight transition restarts the delay.
#[derive(Debug)]
pub struct SimPiston {
    name: &'static str,
    extended: Cell<bool>,
    ticks_until_change: Cell<u8>,
}

impl SimPiston {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            extended: Cell::new(true),
            ticks_until_change: Cell::new(0),
        }
    }

    /// True while a transition is pending.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.ticks_until_change.get() != 0
    }

    /// True when settled on the extended side.
    #[inline]
    pub fn is_extended(&self) -> bool {
        !self.is_moving() && self.extended.get()
    }

    /// True when settled on the retracted side.
    #[inline]
    pub fn is_retracted(&self) -> bool {
        !self.is_moving() && !self.extended.get()
    }

    /// Command a transition to the extended side.
    pub fn extend(&self) {
        if !self.extended.get() {
            self.ticks_until_change.set(TRANSITION_TICKS);
        }
    }

    /// Command a transition to the retracted side.
    pub fn retract(&self) {
        if self.extended.get() {
            self.ticks_until_change.set(TRANSITION_TICKS);
        }
    }
}

impl Actuator for SimPiston {
    fn advance(&self) {
        let remaining = self.ticks_until_change.get();
        if remaining > 0 {
            self.ticks_until_change.set(remaining - 1);
            if remaining == 1 {
                self.extended.set(!self.extended.get());
                trace!(
                    piston = self.name,
                    extended = self.extended.get(),
                    "transition complete"
                );
            }
        }
    }
}
