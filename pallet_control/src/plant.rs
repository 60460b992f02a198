//! The shared plant context.

use std::cell::Cell;
use std::rc::Rc;

use pallet_common::{ArmPhase, Config, InletPhase, LayoutConfig, MagazinePhase, ProcessState};
use pallet_hal::{Actuator, ActuatorSet, SimMotor, SimPiston};

/// Everything the control procedures share: process state, published
/// phases, the box counter, the pallet layout and the actuator handles.
///
/// One instance per cell, behind a single `Rc`. Execution is cooperative
/// and single-threaded, so `Cell`s carry the mutable pieces; no write is
/// ever observed half-done because no suspension point sits between a
/// write and the end of the writing task's step.
pub struct Plant {
    pub process: ProcessState,
    pub layout: LayoutConfig,
    /// Published arm phase, readable by peers and the status reporter.
    pub arm_phase: Cell<ArmPhase>,
    /// Published magazine phase; the arm requires `Ready` before stacking.
    pub magazine_phase: Cell<MagazinePhase>,
    /// Published inlet phase; the arm requires `BoxReady` and writes back
    /// `NoBox` after a pickup.
    pub inlet_phase: Cell<InletPhase>,
    /// Boxes stacked on the current pallet. The arm increments it, the
    /// magazine resets it on reload.
    pub boxes_stacked: Cell<i64>,
    pub x_axis: Rc<SimMotor>,
    pub y_axis: Rc<SimMotor>,
    pub z_axis: Rc<SimMotor>,
    pub gripper: Rc<SimPiston>,
}

impl Plant {
    pub fn new(config: &Config) -> Self {
        Self {
            process: ProcessState::new(),
            layout: config.layout.clone(),
            arm_phase: Cell::new(ArmPhase::Undefined),
            magazine_phase: Cell::new(MagazinePhase::Undefined),
            inlet_phase: Cell::new(InletPhase::Undefined),
            boxes_stacked: Cell::new(0),
            x_axis: Rc::new(SimMotor::new("x", config.motor_speed)),
            y_axis: Rc::new(SimMotor::new("y", config.motor_speed)),
            z_axis: Rc::new(SimMotor::new("z", config.motor_speed)),
            gripper: Rc::new(SimPiston::new("gripper")),
        }
    }

    /// The actuator handles, as the driver's owned collection.
    pub fn actuators(&self) -> ActuatorSet {
        ActuatorSet::from_slice(&[
            self.x_axis.clone() as Rc<dyn Actuator>,
            self.y_axis.clone(),
            self.z_axis.clone(),
            self.gripper.clone(),
        ])
        .expect("MAX_ACTUATORS covers the cell's four actuators")
    }
}
