use anyhow::{Context, Result};
use log::{debug, info};

use wallrunner::engine::game_loop::{GameLoop, FIXED_TIMESTEP, FIXED_TIMESTEP_DURATION};
use wallrunner::engine::input::{InputScript, Intent, IntentEvent};
use wallrunner::engine::physics::{body::presets, DebugGeometry, PhysicsWorld};
use wallrunner::game::characters::{Character, LocomotionConfig, LocomotionSnapshot};

/// Length of the scripted run
const DEMO_STEPS: u64 = 480;

/// The demo pauses mid-air after this step for `PAUSE_FRAMES` frames
const PAUSE_AT_STEP: u64 = 56;
const PAUSE_FRAMES: u32 = 30;

/// Floor plus a wall on each side
fn build_level(physics: &mut PhysicsWorld) {
    let floor = physics.add_rigid_body(presets::fixed_body(0.0, 0.0));
    physics.add_collider(presets::ground_collider(30.0, 1.0), floor);

    for x in [-8.0, 8.0] {
        let wall = physics.add_rigid_body(presets::fixed_body(x, 4.5));
        physics.add_collider(presets::wall_collider(1.0, 8.0), wall);
    }
}

/// Walk right, jump into the wall, kick off it, then roll, dash and attack
fn demo_script() -> InputScript {
    InputScript::new()
        .at(20, IntentEvent::move_axis(1.0))
        .at(50, IntentEvent::pressed(Intent::Jump))
        .at(62, IntentEvent::released(Intent::Jump))
        .at(110, IntentEvent::pressed(Intent::WallJump))
        .at(112, IntentEvent::move_axis(-1.0))
        .at(200, IntentEvent::move_axis(0.0))
        .at(230, IntentEvent::pressed(Intent::Roll))
        .at(290, IntentEvent::pressed(Intent::Dash))
        .at(300, IntentEvent::pressed(Intent::Dash))
        .at(340, IntentEvent::pressed(Intent::Attack))
        .at(400, IntentEvent::pressed(Intent::Dash))
}

/// Snapshot comparison that ignores vertical speed
fn flags_changed(previous: &LocomotionSnapshot, current: &LocomotionSnapshot) -> bool {
    LocomotionSnapshot {
        vertical_speed: 0.0,
        ..*previous
    } != LocomotionSnapshot {
        vertical_speed: 0.0,
        ..*current
    }
}

fn main() -> Result<()> {
    // Initialize logger; RUST_LOG takes precedence over the default level
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting wallrunner demo...");

    let config = LocomotionConfig::standard();
    let mut physics = PhysicsWorld::new();
    physics.set_timestep(FIXED_TIMESTEP);
    build_level(&mut physics);
    info!("Physics timestep {:.4}s", physics.timestep());

    let mut character = Character::new("runner", config, &mut physics, 0.0, 2.0)
        .context("Invalid locomotion config")?;
    let mut script = demo_script();

    let mut game_loop = GameLoop::new();
    let mut step: u64 = 0;
    let mut last = character.snapshot(&physics);
    let mut paused_frames: u32 = 0;

    while step < DEMO_STEPS {
        // Frames still arrive while paused, but no step runs and no timer moves
        if step == PAUSE_AT_STEP && paused_frames == 0 {
            game_loop.pause();
        }
        if game_loop.is_paused() {
            paused_frames += 1;
            if paused_frames >= PAUSE_FRAMES {
                game_loop.resume();
            }
        }

        let updates = game_loop.advance(FIXED_TIMESTEP_DURATION);

        for _ in 0..updates {
            for event in script.drain_due(step) {
                debug!("Step {}: {:?}", step, event);
                character.handle_intent(event, &mut physics);
            }

            character.fixed_update(&mut physics, FIXED_TIMESTEP);
            physics.step();
            character.update_animation(&physics, FIXED_TIMESTEP);

            let snapshot = character.snapshot(&physics);
            if flags_changed(&last, &snapshot) {
                let position = character.position(&physics).unwrap_or_default();
                info!(
                    "Step {:>3} at ({:6.2}, {:5.2}) clip={:<10} {:?}",
                    step,
                    position.x,
                    position.y,
                    character.animation.current_animation(),
                    snapshot
                );
            }
            last = snapshot;
            step += 1;
        }
    }

    let mut geometry = DebugGeometry::new();
    geometry.draw_colliders(&physics);
    character.draw_debug(&physics, &mut geometry);
    info!(
        "Finished after {} frames, {:.2}s simulated; debug overlay has {} lines ({} vertex bytes)",
        game_loop.frame_count(),
        game_loop.simulated_secs(),
        geometry.line_count(),
        geometry.vertex_bytes().len()
    );

    Ok(())
}
