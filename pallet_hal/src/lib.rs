//! Simulated actuators for the palletizer cell.
//!
//! Discrete-time integrator models only: a linear motor that approaches its
//! target at a clamped speed per tick, and a piston-style gripper with a
//! debounced extend/retract transition. Control procedures command them
//! through shared handles; the tick driver advances them all once per tick
//! through an explicit, owned collection — there is no hidden registry.
//!
//! All state sits behind `Cell`s so that a handle can be shared freely
//! within the single control thread.

use std::rc::Rc;

pub mod motor;
pub mod piston;

pub use motor::SimMotor;
pub use piston::SimPiston;

/// Anything the tick driver advances by one simulated tick.
pub trait Actuator {
    /// Advance the simulation by one tick.
    fn advance(&self);
}

/// Upper bound on actuators one driver instance owns.
pub const MAX_ACTUATORS: usize = 8;

/// The driver's owned collection of actuator handles.
pub type ActuatorSet = heapless::Vec<Rc<dyn Actuator>, MAX_ACTUATORS>;
