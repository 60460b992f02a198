//! Gripper arm control procedure.
//!
//! The arm is the only procedure with nested sub-procedures; their
//! suspended state lives in the arm task family's arena. Every
//! sub-procedure is driven through `drive_while(no fault, ...)`, so a
//! latched fault preempts it at its next suspension point — never inside a
//! step — after which the arm freezes its axes and resets to `Undefined`.

use std::rc::Rc;

use pallet_common::{ArmPhase, InletPhase, MagazinePhase, Position};
use pallet_tasks::{StackArena, Task, drive, drive_while, wait_while, yield_once};
use tracing::debug;

use crate::plant::Plant;

const HOME: Position = Position { x: 0, y: 0, z: 0 };

fn set_phase(plant: &Plant, phase: ArmPhase) {
    plant.arm_phase.set(phase);
    debug!(?phase, "arm phase");
}

/// Top-level arm procedure: home, then stack boxes while the cell is
/// active, unwinding to a stopped `Undefined` state whenever a fault is
/// latched and starting over once it clears.
pub async fn run(plant: Rc<Plant>, arena: Rc<StackArena>) {
    loop {
        assert_eq!(
            plant.arm_phase.get(),
            ArmPhase::Undefined,
            "arm procedure must start a pass from Undefined"
        );

        wait_while(|| plant.process.has_fault()).await;
        set_phase(&plant, ArmPhase::Homing);
        drive_while(
            || !plant.process.has_fault(),
            Task::spawn_in(&arena, home(&plant, &arena)),
        )
        .await;

        while !plant.process.has_fault() {
            while !plant.process.is_active() {
                // Manual arm operation could be allowed here.
                yield_once().await;
            }
            while plant.process.is_active() {
                drive_while(
                    || !plant.process.has_fault(),
                    Task::spawn_in(&arena, stacking_cycle(&plant, &arena)),
                )
                .await;
            }
        }

        // Fault: freeze the axes where they are, not at their targets, and
        // require a fresh homing pass.
        plant.x_axis.stop();
        plant.y_axis.stop();
        plant.z_axis.stop();
        set_phase(&plant, ArmPhase::Undefined);
    }
}

/// Drive all axes to the origin.
///
/// No reference switches in the simulation; homing is a plain move.
async fn home(plant: &Plant, arena: &Rc<StackArena>) {
    assert_eq!(
        plant.arm_phase.get(),
        ArmPhase::Homing,
        "homing requires the Homing phase"
    );
    drive(Task::spawn_in(arena, go_to(plant, 0, HOME))).await;
    set_phase(plant, ArmPhase::InHomePos);
}

/// One box: wait position, handshake, pickup, transport to the next slot,
/// release, back to the wait position.
///
/// Deactivation during the handshake wait exits the whole cycle. A fault
/// can abandon the cycle at any suspension point (the caller's
/// `drive_while` takes care of that).
async fn stacking_cycle(plant: &Plant, arena: &Rc<StackArena>) {
    let entry = plant.arm_phase.get();
    assert!(
        entry != ArmPhase::Undefined && entry != ArmPhase::Homing,
        "stacking cycle entered from {entry:?}"
    );
    assert!(
        plant.gripper.is_extended(),
        "gripper must be open between cycles"
    );

    set_phase(plant, ArmPhase::ToWaitPos);
    let travel_z = plant.layout.travel_z;
    drive(Task::spawn_in(arena, go_to(plant, travel_z, plant.layout.wait_pos))).await;

    set_phase(plant, ArmPhase::Waiting);
    loop {
        if !plant.process.is_active() {
            return; // leave the whole cycle, not just the wait
        }
        yield_once().await;
        if plant.inlet_phase.get() == InletPhase::BoxReady
            && plant.magazine_phase.get() == MagazinePhase::Ready
        {
            break;
        }
    }

    set_phase(plant, ArmPhase::TakeBox);
    assert!(plant.gripper.is_extended(), "gripper must be open for pickup");
    drive(Task::spawn_in(arena, go_to(plant, travel_z, plant.layout.pickup_pos))).await;
    plant.gripper.retract();
    wait_while(|| !plant.gripper.is_retracted()).await;
    plant.inlet_phase.set(InletPhase::NoBox);

    set_phase(plant, ArmPhase::TransportBox);
    let slot = plant.layout.stack_slot(plant.boxes_stacked.get());
    drive(Task::spawn_in(arena, go_to(plant, travel_z, slot))).await;

    set_phase(plant, ArmPhase::ReleaseBox);
    plant.gripper.extend();
    wait_while(|| !plant.gripper.is_extended()).await;
    plant.boxes_stacked.set(plant.boxes_stacked.get() + 1);

    set_phase(plant, ArmPhase::ToWaitPos);
    drive(Task::spawn_in(arena, go_to(plant, travel_z, plant.layout.wait_pos))).await;

    set_phase(plant, ArmPhase::Waiting);
}

/// Move to `target`: raise to the travel height first, then both
/// horizontal axes together, then the vertical axis to the target height.
/// Always in that order, so the arm never translates at box height.
async fn go_to(plant: &Plant, travel_z: i64, target: Position) {
    plant.z_axis.go_to(travel_z);
    wait_while(|| plant.z_axis.is_moving()).await;

    plant.x_axis.go_to(target.x);
    plant.y_axis.go_to(target.y);
    wait_while(|| plant.x_axis.is_moving() || plant.y_axis.is_moving()).await;

    plant.z_axis.go_to(target.z);
    wait_while(|| plant.z_axis.is_moving()).await;
}
