//! Box magazine control procedure.

use std::rc::Rc;

use pallet_common::MagazinePhase;
use pallet_tasks::{wait_while, yield_once};
use tracing::debug;

use crate::plant::Plant;

/// Ticks a pallet swap takes.
pub const RELOAD_TICKS: u32 = 5;

/// Run the magazine: report `Ready` until the pallet fills up, then swap
/// it for an empty one and reset the box counter.
///
/// # Panics
///
/// Panics if the published phase is not `Undefined` on entry.
pub async fn run(plant: Rc<Plant>) {
    assert_eq!(
        plant.magazine_phase.get(),
        MagazinePhase::Undefined,
        "magazine procedure must start from Undefined"
    );
    loop {
        plant.magazine_phase.set(MagazinePhase::Ready);
        wait_while(|| plant.boxes_stacked.get() < plant.layout.boxes_per_pallet).await;
        plant.magazine_phase.set(MagazinePhase::Reloading);
        debug!(boxes = plant.boxes_stacked.get(), "pallet full, reloading");
        plant.boxes_stacked.set(0);
        for _ in 0..RELOAD_TICKS {
            yield_once().await;
        }
    }
}
