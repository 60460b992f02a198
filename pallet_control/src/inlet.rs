//! Inlet conveyor control procedure.

use std::rc::Rc;

use pallet_common::InletPhase;
use pallet_tasks::{wait_while, yield_once};

use crate::plant::Plant;

/// Ticks the conveyor needs to bring the next box to the pickup point.
pub const MOVE_BOX_TICKS: u32 = 10;

/// Run the conveyor: whenever the cell is active, transport a box to the
/// pickup point and hold it there until the arm takes it.
///
/// The consumer signals the pickup by flipping the published phase from
/// `BoxReady` to `NoBox`; the conveyor itself never leaves `BoxReady` on
/// its own.
///
/// # Panics
///
/// Panics if the published phase is not `Undefined` on entry.
pub async fn run(plant: Rc<Plant>) {
    assert_eq!(
        plant.inlet_phase.get(),
        InletPhase::Undefined,
        "inlet procedure must start from Undefined"
    );
    loop {
        wait_while(|| !plant.process.is_active()).await;
        plant.inlet_phase.set(InletPhase::MoveBox);
        for _ in 0..MOVE_BOX_TICKS {
            yield_once().await;
        }
        plant.inlet_phase.set(InletPhase::BoxReady);
        wait_while(|| plant.inlet_phase.get() == InletPhase::BoxReady).await;
    }
}
