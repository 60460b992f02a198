//! Published phase enums for the three control procedures.
//!
//! All enums use `#[repr(u8)]` for compact layout. `Undefined` is both the
//! required pre-start value and the value a procedure resets to after an
//! error, so every enum carries it as its `Default`.
//!
//! Exactly one phase cell per procedure is visible to its peers; the arm
//! reads the inlet and magazine phases to decide when to pick a box, and it
//! writes the inlet phase back to `NoBox` after taking one.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

/// Inlet conveyor phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum InletPhase {
    /// Pre-start / post-reset sentinel.
    #[default]
    Undefined = 0,
    /// No box at the pickup point (set by the arm after taking one).
    NoBox = 1,
    /// Conveyor transporting the next box to the pickup point.
    MoveBox = 2,
    /// Box waiting at the pickup point.
    BoxReady = 3,
}

impl InletPhase {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Undefined),
            1 => Some(Self::NoBox),
            2 => Some(Self::MoveBox),
            3 => Some(Self::BoxReady),
            _ => None,
        }
    }
}

/// Box magazine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum MagazinePhase {
    /// Pre-start / post-reset sentinel.
    #[default]
    Undefined = 0,
    /// Pallet has room, arm may keep stacking.
    Ready = 1,
    /// Full pallet being swapped for an empty one.
    Reloading = 2,
    /// No empty pallet available.
    Empty = 3,
}

impl MagazinePhase {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Undefined),
            1 => Some(Self::Ready),
            2 => Some(Self::Reloading),
            3 => Some(Self::Empty),
            _ => None,
        }
    }
}

/// Gripper arm phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ArmPhase {
    /// Pre-start / post-error sentinel.
    #[default]
    Undefined = 0,
    /// Driving all axes to the origin.
    Homing = 1,
    /// Homed, axes at origin.
    InHomePos = 2,
    /// Moving to the wait position above the pickup point.
    ToWaitPos = 3,
    /// Holding at the wait position until inlet and magazine are ready.
    Waiting = 4,
    /// Descending to the pickup point and closing the gripper.
    TakeBox = 5,
    /// Carrying a box to its stacking slot.
    TransportBox = 6,
    /// Opening the gripper over the stacking slot.
    ReleaseBox = 7,
}

impl ArmPhase {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Undefined),
            1 => Some(Self::Homing),
            2 => Some(Self::InHomePos),
            3 => Some(Self::ToWaitPos),
            4 => Some(Self::Waiting),
            5 => Some(Self::TakeBox),
            6 => Some(Self::TransportBox),
            7 => Some(Self::ReleaseBox),
            _ => None,
        }
    }
}

const_assert_eq!(size_of::<InletPhase>(), 1);
const_assert_eq!(size_of::<MagazinePhase>(), 1);
const_assert_eq!(size_of::<ArmPhase>(), 1);
