//! Fixed-period tick driver: pacing, overrun accounting and the per-tick
//! status report.

use std::future::Future;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use pallet_hal::{ActuatorSet, SimMotor};
use pallet_tasks::{StackArena, Task};

use crate::plant::Plant;
use crate::{arm, inlet, magazine};

/// Absolute-deadline pacing for the tick loop.
///
/// Sleeping against an absolute deadline keeps the period drift-free; an
/// overrun re-bases the deadline to now so one long tick does not trigger
/// a burst of catch-up ticks. The returned slack is a diagnostic signal
/// only and never alters control behavior.
pub struct TickTimer {
    period: Duration,
    deadline: Instant,
}

impl TickTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: Instant::now() + period,
        }
    }

    /// Sleep out the remainder of the current tick.
    ///
    /// Returns the slack in nanoseconds; negative means the tick overran
    /// its period by that much.
    pub fn wait(&mut self) -> i64 {
        let now = Instant::now();
        if now < self.deadline {
            let slack = self.deadline - now;
            thread::sleep(slack);
            self.deadline += self.period;
            slack.as_nanos() as i64
        } else {
            let overrun = now - self.deadline;
            self.deadline = now + self.period;
            -(overrun.as_nanos() as i64)
        }
    }
}

/// O(1) per-tick timing statistics. Updated every tick, no allocation.
#[derive(Debug, Clone)]
pub struct TickStats {
    /// Total ticks executed.
    pub ticks: u64,
    /// Ticks that exceeded the period.
    pub overruns: u64,
    /// Slack of the last tick [ns] (negative on overrun).
    pub last_slack_ns: i64,
    /// Smallest slack seen [ns].
    pub min_slack_ns: i64,
    /// Worst overrun seen [ns].
    pub max_overrun_ns: i64,
}

impl TickStats {
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            overruns: 0,
            last_slack_ns: 0,
            min_slack_ns: i64::MAX,
            max_overrun_ns: 0,
        }
    }

    /// Record one tick's slack. O(1).
    #[inline]
    pub fn record(&mut self, slack_ns: i64) {
        self.ticks += 1;
        self.last_slack_ns = slack_ns;
        if slack_ns < self.min_slack_ns {
            self.min_slack_ns = slack_ns;
        }
        if slack_ns < 0 {
            self.overruns += 1;
            if -slack_ns > self.max_overrun_ns {
                self.max_overrun_ns = -slack_ns;
            }
        }
    }
}

impl Default for TickStats {
    fn default() -> Self {
        Self::new()
    }
}

/// The cell's three top-level tasks.
///
/// The stepping order is part of the design: it decides which procedure
/// observes a peer's same-tick updates, and it must stay Arm, Magazine,
/// Inlet.
pub struct PalletCell<A, M, I>
where
    A: Future<Output = ()>,
    M: Future<Output = ()>,
    I: Future<Output = ()>,
{
    arm: Task<A>,
    magazine: Task<M>,
    inlet: Task<I>,
}

/// Create the three top-level tasks in unmanaged storage. Nothing runs
/// until the first [`PalletCell::step_once`].
pub fn spawn_cell(
    plant: &Rc<Plant>,
    arm_arena: &Rc<StackArena>,
) -> PalletCell<impl Future<Output = ()>, impl Future<Output = ()>, impl Future<Output = ()>> {
    PalletCell {
        arm: Task::new(arm::run(Rc::clone(plant), Rc::clone(arm_arena))),
        magazine: Task::new(magazine::run(Rc::clone(plant))),
        inlet: Task::new(inlet::run(Rc::clone(plant))),
    }
}

impl<A, M, I> PalletCell<A, M, I>
where
    A: Future<Output = ()>,
    M: Future<Output = ()>,
    I: Future<Output = ()>,
{
    /// One tick: advance the physical simulation, then step every
    /// top-level task exactly once, in the fixed order.
    pub fn step_once(&mut self, actuators: &ActuatorSet) {
        for actuator in actuators.iter() {
            actuator.advance();
        }
        let _ = self.arm.step();
        let _ = self.magazine.step();
        let _ = self.inlet.step();
    }
}

/// One-line cell status, in the shape the operators are used to.
pub fn status_line(plant: &Plant) -> String {
    let gripper = if plant.gripper.is_moving() {
        "move"
    } else if plant.gripper.is_extended() {
        "open"
    } else {
        "clse"
    };
    let motion = |axis: &SimMotor| if axis.is_moving() { "move" } else { "still" };
    format!(
        "[gripper: {gripper}, x: {}, y: {}, z: {}] box nr: {}",
        motion(&plant.x_axis),
        motion(&plant.y_axis),
        motion(&plant.z_axis),
        plant.boxes_stacked.get()
    )
}
