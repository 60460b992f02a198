//! Process-wide activation and fault state.
//!
//! One `ProcessState` instance is shared by every control procedure and the
//! driver. Execution is single-threaded and cooperative, so plain `Cell`s
//! are enough: a value is never observed mid-update by a peer because no
//! suspension point lies between a write and the end of the current step.

use std::cell::Cell;

use tracing::warn;

use crate::fault::Fault;

/// Shared activation flag plus the latched fault set.
#[derive(Debug, Default)]
pub struct ProcessState {
    active: Cell<bool>,
    faults: Cell<Fault>,
}

impl ProcessState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the cell is commanded to run and no fault is latched.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Request activation. Ignored while any fault is latched.
    pub fn set_active(&self) {
        if !self.has_fault() {
            self.active.set(true);
        }
    }

    /// Withdraw the activation request.
    pub fn reset_active(&self) {
        self.active.set(false);
    }

    /// True while at least one fault is latched.
    #[inline]
    pub fn has_fault(&self) -> bool {
        !self.faults.get().is_empty()
    }

    /// Number of distinct latched faults.
    #[inline]
    pub fn fault_count(&self) -> u32 {
        self.faults.get().count()
    }

    /// True if the given fault kind is currently latched.
    pub fn is_fault_set(&self, fault: Fault) -> bool {
        self.faults.get().contains(fault)
    }

    /// Latch a fault and deactivate the cell.
    ///
    /// Latching an already-set fault changes nothing; the set is
    /// deduplicated by construction.
    pub fn set_fault(&self, fault: Fault) {
        self.active.set(false);
        let before = self.faults.get();
        if !before.contains(fault) {
            warn!(?fault, "fault latched, cell deactivated");
        }
        self.faults.set(before | fault);
    }

    /// Clear a latched fault. Reactivation is a separate, explicit request.
    pub fn clear_fault(&self, fault: Fault) {
        self.faults.set(self.faults.get() - fault);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_forces_inactive_and_blocks_activation() {
        let state = ProcessState::new();
        state.set_active();
        assert!(state.is_active());

        state.set_fault(Fault::EMERGENCY_STOP);
        assert!(!state.is_active());
        assert!(state.has_fault());

        state.set_active(); // must be ignored while faulted
        assert!(!state.is_active());

        state.clear_fault(Fault::EMERGENCY_STOP);
        assert!(!state.has_fault());
        assert!(!state.is_active()); // clearing does not reactivate

        state.set_active();
        assert!(state.is_active());
    }

    #[test]
    fn fault_count_is_deduplicated() {
        let state = ProcessState::new();
        state.set_fault(Fault::EMERGENCY_STOP);
        state.set_fault(Fault::EMERGENCY_STOP);
        assert_eq!(state.fault_count(), 1);
        state.set_fault(Fault::BOX_JAMMED_ON_CONVEYOR);
        assert_eq!(state.fault_count(), 2);
        assert!(state.is_fault_set(Fault::EMERGENCY_STOP));
        assert!(!state.is_fault_set(Fault::INVALID_GRIPPER_POS));
        state.clear_fault(Fault::EMERGENCY_STOP);
        assert_eq!(state.fault_count(), 1);
    }
}
