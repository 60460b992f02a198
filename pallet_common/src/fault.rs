//! Operational fault kinds, tracked as a deduplicated bitflag set.

use bitflags::bitflags;

bitflags! {
    /// Latched operational faults.
    ///
    /// Setting any flag deactivates the cell; the arm unwinds to a stopped
    /// state and waits until the whole set is clear again. Latching an
    /// already-set flag is a no-op, so the live count never double-counts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Fault: u8 {
        /// Gripper commanded outside its reachable envelope.
        const INVALID_GRIPPER_POS     = 0x01;
        /// Operator emergency stop.
        const EMERGENCY_STOP          = 0x02;
        /// Box jammed on the inlet conveyor.
        const BOX_JAMMED_ON_CONVEYOR  = 0x04;
    }
}

impl Fault {
    /// Number of distinct faults in the set.
    #[inline]
    pub const fn count(&self) -> u32 {
        self.bits().count_ones()
    }
}

impl Default for Fault {
    fn default() -> Self {
        Self::empty()
    }
}
