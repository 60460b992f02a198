//! Linear motor simulator.

use std::cell::Cell;

use tracing::trace;

use crate::Actuator;

/// A linear axis that approaches its commanded target at a fixed maximum
/// speed per tick.
///
/// `stop()` freezes the axis where it is by re-targeting the current
/// position; there is no deceleration model.
#[derive(Debug)]
pub struct SimMotor {
    name: &'static str,
    target: Cell<i64>,
    position: Cell<i64>,
    /// Position units per tick.
    speed: i64,
}

impl SimMotor {
    pub fn new(name: &'static str, speed: i64) -> Self {
        assert!(speed > 0, "motor `{name}` needs a positive speed");
        Self {
            name,
            target: Cell::new(0),
            position: Cell::new(0),
            speed,
        }
    }

    /// True while the axis has not yet reached its target.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.position.get() != self.target.get()
    }

    /// Current position in position units.
    #[inline]
    pub fn position(&self) -> i64 {
        self.position.get()
    }

    /// Command a new target position.
    pub fn go_to(&self, target: i64) {
        self.target.set(target);
    }

    /// Halt at the current position.
    pub fn stop(&self) {
        self.target.set(self.position.get());
    }
}

impl Actuator for SimMotor {
    fn advance(&self) {
        let diff = self.target.get() - self.position.get();
        if diff == 0 {
            return;
        }
        let step = diff.abs().min(self.speed);
        self.position.set(self.position.get() + diff.signum() * step);
        if !self.is_moving() {
            trace!(axis = self.name, position = self.position.get(), "in position");
        }
    }
}
