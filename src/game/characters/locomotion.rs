// Locomotion state machine
//
// Edge intents (jump, wall-jump, roll, dash, attack) are resolved the moment
// they arrive. Everything else happens in `fixed_update`, once per step, in
// this order: timers, sensors, wall state, then walk/flip if nothing with
// higher priority owns horizontal velocity.

use glam::Vec2;
use log::{debug, trace};

use crate::core::math::clamp_axis;
use crate::engine::input::{InputPhase, Intent, IntentEvent};
use crate::engine::physics::{Body, EnvironmentQuery};

use super::state::{
    DashPhase, Facing, LocomotionSnapshot, LocomotionState, MotionOwner, WallState,
};
use super::stats::{LocomotionConfig, ProbeConfig};
use super::timer::{Countdown, ScheduledAction, TimerToken};

/// Fraction of upward speed kept when the jump button is released early
pub const JUMP_CUT_FACTOR: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    Ground,
    Wall,
}

/// A sensor box in world space, for debug overlays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRegion {
    pub kind: ProbeKind,
    pub center: Vec2,
    pub size: Vec2,
}

/// Converts intents and probe results into body velocity for one character
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    state: LocomotionState,
    /// Returns the wall state to Idle once a wall-jump has run its course
    wall_jump_expiry: ScheduledAction<WallState>,
    /// Handle for the expiry armed by the most recent wall-jump
    wall_jump_token: Option<TimerToken>,
}

impl LocomotionController {
    pub fn new(config: LocomotionConfig) -> Self {
        let state = LocomotionState::new(config.max_jump_charges);
        Self {
            config,
            state,
            wall_jump_expiry: ScheduledAction::new(),
            wall_jump_token: None,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn snapshot<B: Body>(&self, body: &B) -> LocomotionSnapshot {
        self.state.snapshot(body.velocity().y)
    }

    /// Advance one fixed step
    pub fn fixed_update<B: Body, E: EnvironmentQuery>(&mut self, dt: f32, body: &mut B, env: &E) {
        if let Some(next) = self.wall_jump_expiry.tick(dt) {
            self.wall_jump_token = None;
            if self.state.wall == WallState::WallJumping {
                debug!("Wall-jump expired");
                self.state.wall = next;
            }
        }

        // A dash owns every step it is active in, including the one it ends on
        let dash_owned = self.state.is_dashing();
        self.advance_dash(dt, body);
        if dash_owned {
            return;
        }

        self.ground_check(body, env);
        self.wall_check(body, env);
        self.resolve_wall_state(body);

        if self.state.motion_owner() == MotionOwner::Normal {
            self.apply_walk(body);
            self.flip_toward_input();
        }
    }

    /// Probe below the feet. Landing refills jump charges.
    ///
    /// Only the clear-to-overlapping transition refills: the step after a
    /// grounded jump press still overlaps.
    pub fn ground_check<B: Body, E: EnvironmentQuery>(&mut self, body: &B, env: &E) {
        let probe = self.config.ground_probe;
        let grounded = env.overlaps(self.probe_center(body, &probe), probe.size, probe.mask);

        if grounded && !self.state.is_grounded {
            trace!("Landed, {} jump charges", self.config.max_jump_charges);
            self.state.jump_charges = self.config.max_jump_charges;
        } else if !grounded && self.state.is_grounded {
            trace!("Left the ground");
        }
        self.state.is_grounded = grounded;
    }

    /// Probe in front of the character
    pub fn wall_check<B: Body, E: EnvironmentQuery>(&mut self, body: &B, env: &E) {
        let probe = self.config.wall_probe;
        let on_wall = env.overlaps(self.probe_center(body, &probe), probe.size, probe.mask);

        if on_wall != self.state.on_wall {
            trace!("On wall: {}", on_wall);
        }
        self.state.on_wall = on_wall;
    }

    /// World-space probe boxes at the body's current position
    pub fn probe_regions<B: Body>(&self, body: &B) -> [ProbeRegion; 2] {
        let ground = self.config.ground_probe;
        let wall = self.config.wall_probe;
        [
            ProbeRegion {
                kind: ProbeKind::Ground,
                center: self.probe_center(body, &ground),
                size: ground.size,
            },
            ProbeRegion {
                kind: ProbeKind::Wall,
                center: self.probe_center(body, &wall),
                size: wall.size,
            },
        ]
    }

    fn probe_center<B: Body>(&self, body: &B, probe: &ProbeConfig) -> Vec2 {
        body.position() + Vec2::new(probe.offset.x * self.state.facing.sign(), probe.offset.y)
    }

    fn resolve_wall_state<B: Body>(&mut self, body: &mut B) {
        let touching = !self.state.is_grounded && self.state.on_wall;

        match (self.state.wall, touching) {
            (WallState::Sliding, true) => self.clamp_slide(body),
            (_, true) => {
                // Slide onset: arm the window and drop any stale expiry
                let direction = self.state.facing.opposite();
                debug!("Wall slide started, wall-jump direction {:?}", direction);
                self.state.wall = WallState::Sliding;
                self.state.wall_jump_window = Some(direction);
                if let Some(token) = self.wall_jump_token.take() {
                    self.wall_jump_expiry.cancel(token);
                }
                self.clamp_slide(body);
            }
            (WallState::Sliding, false) => {
                trace!("Wall slide ended");
                self.state.wall = WallState::Idle;
                self.state.wall_jump_window = None;
            }
            (_, false) => {}
        }
    }

    fn clamp_slide<B: Body>(&self, body: &mut B) {
        let velocity = body.velocity();
        body.set_velocity(Vec2::new(
            velocity.x,
            velocity.y.max(-self.config.wall_slide_speed),
        ));
    }

    fn apply_walk<B: Body>(&self, body: &mut B) {
        let velocity = body.velocity();
        body.set_velocity(Vec2::new(
            self.state.horizontal_input * self.config.walk_speed,
            velocity.y,
        ));
    }

    fn flip_toward_input(&mut self) {
        if let Some(target) = Facing::from_axis(self.state.horizontal_input) {
            if target != self.state.facing {
                trace!("Flip to {:?}", target);
                self.state.facing = target;
            }
        }
    }

    fn advance_dash<B: Body>(&mut self, dt: f32, body: &mut B) {
        let finished = match &mut self.state.dash {
            DashPhase::Ready => false,
            DashPhase::Active { timer, .. } | DashPhase::Cooldown { timer } => timer.tick(dt),
        };
        if !finished {
            return;
        }

        match self.state.dash {
            DashPhase::Active {
                restore_gravity, ..
            } => {
                body.set_gravity_scale(restore_gravity);
                let velocity = body.velocity();
                body.set_velocity(Vec2::new(0.0, velocity.y));
                self.state.dash = DashPhase::Cooldown {
                    timer: Countdown::new(self.config.dash_cooldown),
                };
                debug!("Dash ended, cooling down");
            }
            DashPhase::Cooldown { .. } => {
                self.state.dash = DashPhase::Ready;
                trace!("Dash ready");
            }
            DashPhase::Ready => {}
        }
    }

    /// Route an intent to its handler
    pub fn handle_intent<B: Body>(&mut self, event: IntentEvent, body: &mut B) {
        match event.intent {
            Intent::Move(value) => self.move_axis(value, event.phase),
            Intent::Jump => self.jump(event.phase, body),
            Intent::WallJump => self.wall_jump(event.phase, body),
            Intent::Roll => self.roll(event.phase, body),
            Intent::Dash => self.dash(event.phase, body),
            Intent::Attack => self.attack(event.phase),
        }
    }

    /// Latch the move axis; it is sampled at the next step
    pub fn move_axis(&mut self, value: f32, phase: InputPhase) {
        match phase {
            InputPhase::Performed => {
                self.state.horizontal_input = clamp_axis(value);
                self.state.is_walking = true;
            }
            InputPhase::Canceled => {
                self.state.horizontal_input = 0.0;
                self.state.is_walking = false;
            }
        }
    }

    /// Press sets jump speed, release cuts it. Each consumes one charge.
    pub fn jump<B: Body>(&mut self, phase: InputPhase, body: &mut B) {
        if self.state.is_dashing() {
            trace!("Jump {:?} ignored during dash", phase);
            return;
        }
        if self.state.jump_charges == 0 {
            trace!("Jump {:?} rejected: no charges", phase);
            return;
        }

        let velocity = body.velocity();
        let vertical = match phase {
            InputPhase::Performed => self.config.jump_power,
            InputPhase::Canceled => velocity.y * JUMP_CUT_FACTOR,
        };
        body.set_velocity(Vec2::new(velocity.x, vertical));
        self.state.jump_charges -= 1;
    }

    pub fn wall_jump<B: Body>(&mut self, phase: InputPhase, body: &mut B) {
        if phase != InputPhase::Performed || self.state.is_dashing() {
            return;
        }
        let Some(direction) = self.state.wall_jump_window.take() else {
            trace!("Wall-jump rejected: window closed");
            return;
        };

        self.state.wall = WallState::WallJumping;
        body.set_velocity(Vec2::new(
            direction.sign() * self.config.wall_jump_power.x,
            self.config.wall_jump_power.y,
        ));
        if direction != self.state.facing {
            self.state.facing = direction;
        }
        self.wall_jump_token = Some(
            self.wall_jump_expiry
                .schedule(WallState::Idle, self.config.wall_jump_duration),
        );

        debug!("Wall-jump toward {:?}", direction);
    }

    /// Grounded only; stays latched until `end_roll`
    pub fn roll<B: Body>(&mut self, phase: InputPhase, body: &mut B) {
        if phase != InputPhase::Performed {
            return;
        }
        if !self.state.is_grounded || !self.state.can_roll || self.state.is_dashing() {
            trace!("Roll rejected");
            return;
        }

        self.state.is_rolling = true;
        self.state.can_roll = false;
        let velocity = body.velocity();
        body.set_velocity(Vec2::new(
            self.state.facing.sign() * self.config.roll_speed,
            velocity.y,
        ));

        debug!("Roll toward {:?}", self.state.facing);
    }

    /// Roll-finished signal from the animation side
    pub fn end_roll(&mut self) {
        self.state.is_rolling = false;
        self.state.can_roll = true;
    }

    pub fn dash<B: Body>(&mut self, phase: InputPhase, body: &mut B) {
        if phase != InputPhase::Performed {
            return;
        }
        if !self.state.can_dash() {
            trace!("Dash rejected: {:?}", self.state.dash);
            return;
        }

        if self.state.is_rolling {
            // The roll animation will not finish under a dash, so release the latch here
            debug!("Dash pre-empted roll");
            self.end_roll();
        }

        let restore_gravity = body.gravity_scale();
        body.set_gravity_scale(0.0);
        body.set_velocity(Vec2::new(
            self.state.facing.sign() * self.config.dash_power,
            0.0,
        ));
        self.state.dash = DashPhase::Active {
            timer: Countdown::from_next_step(self.config.dash_duration),
            restore_gravity,
        };

        debug!("Dash toward {:?}", self.state.facing);
    }

    pub fn attack(&mut self, phase: InputPhase) {
        if phase == InputPhase::Performed {
            self.state.is_attacking = true;
        }
    }

    /// Attack-finished signal from the animation side
    pub fn end_attack(&mut self) {
        self.state.is_attacking = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::{BodyState, LayerMask};
    use approx::assert_relative_eq;

    const DT: f32 = 0.1;

    /// Answers every ground/wall query with a fixed result
    struct StubEnvironment {
        ground: bool,
        wall: bool,
    }

    impl EnvironmentQuery for StubEnvironment {
        fn overlaps(&self, _center: Vec2, _size: Vec2, mask: LayerMask) -> bool {
            (self.ground && mask.intersects(LayerMask::GROUND))
                || (self.wall && mask.intersects(LayerMask::WALL))
        }
    }

    fn env(ground: bool, wall: bool) -> StubEnvironment {
        StubEnvironment { ground, wall }
    }

    fn controller() -> LocomotionController {
        LocomotionController::new(LocomotionConfig::default().with_dash(20.0, 0.2, 0.5))
    }

    fn grounded_controller(body: &mut BodyState) -> LocomotionController {
        let mut c = controller();
        c.fixed_update(DT, body, &env(true, false));
        c
    }

    /// Small deterministic generator for the invariant sweep
    struct Lcg(u32);

    impl Lcg {
        fn next(&mut self) -> u32 {
            self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            self.0 >> 16
        }
    }

    #[test]
    fn test_new_controller_defaults() {
        let c = controller();
        assert_eq!(c.state().facing(), Facing::Right);
        assert_eq!(c.state().jump_charges(), 2);
        assert!(c.state().can_roll());
        assert!(c.state().can_dash());
        assert_eq!(c.snapshot(&BodyState::default()), LocomotionSnapshot::default());
    }

    #[test]
    fn test_move_right_while_facing_left_flips_and_walks() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.state.facing = Facing::Left;

        c.handle_intent(IntentEvent::move_axis(1.0), &mut body);
        c.fixed_update(DT, &mut body, &env(true, false));

        assert_eq!(c.state().facing(), Facing::Right);
        assert_eq!(body.velocity.x, c.config().walk_speed);
        assert!(c.state().is_walking());
    }

    #[test]
    fn test_move_axis_is_sampled_at_step() {
        let mut body = BodyState::default();
        let mut c = grounded_controller(&mut body);

        c.handle_intent(IntentEvent::move_axis(-0.5), &mut body);
        assert_eq!(c.state().horizontal_input(), -0.5);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(c.state().facing(), Facing::Right);

        c.fixed_update(DT, &mut body, &env(true, false));
        assert_relative_eq!(body.velocity.x, -4.0);
        assert_eq!(c.state().facing(), Facing::Left);

        c.handle_intent(IntentEvent::move_axis(0.0), &mut body);
        assert!(!c.state().is_walking());
        assert_eq!(c.state().horizontal_input(), 0.0);
        c.fixed_update(DT, &mut body, &env(true, false));
        assert_eq!(body.velocity.x, 0.0);
        // Neutral input keeps the last facing
        assert_eq!(c.state().facing(), Facing::Left);
    }

    #[test]
    fn test_walk_preserves_vertical_velocity() {
        let mut body = BodyState::default();
        let mut c = controller();
        body.velocity.y = -5.0;
        c.move_axis(1.0, InputPhase::Performed);
        c.fixed_update(DT, &mut body, &env(false, false));
        assert_eq!(body.velocity, Vec2::new(8.0, -5.0));
    }

    #[test]
    fn test_jump_press_then_release() {
        let mut body = BodyState::default();
        let mut c = grounded_controller(&mut body);
        assert_eq!(c.state().jump_charges(), 2);

        c.jump(InputPhase::Performed, &mut body);
        assert_eq!(body.velocity.y, 16.0);
        assert_eq!(c.state().jump_charges(), 1);

        c.jump(InputPhase::Canceled, &mut body);
        assert_eq!(body.velocity.y, 8.0);
        assert_eq!(c.state().jump_charges(), 0);

        // Nothing more until the next ground contact
        c.jump(InputPhase::Performed, &mut body);
        assert_eq!(body.velocity.y, 8.0);
        c.jump(InputPhase::Canceled, &mut body);
        assert_eq!(body.velocity.y, 8.0);
        assert_eq!(c.state().jump_charges(), 0);
    }

    #[test]
    fn test_landing_refills_charges() {
        let mut body = BodyState::default();
        let mut c = grounded_controller(&mut body);
        c.jump(InputPhase::Performed, &mut body);
        c.jump(InputPhase::Canceled, &mut body);

        c.fixed_update(DT, &mut body, &env(false, false));
        assert_eq!(c.state().jump_charges(), 0);
        assert!(!c.state().is_grounded());

        c.fixed_update(DT, &mut body, &env(true, false));
        assert_eq!(c.state().jump_charges(), 2);
        assert!(c.state().is_grounded());
    }

    #[test]
    fn test_grounded_jump_does_not_refill_before_leaving_ground() {
        let mut body = BodyState::default();
        let mut c = grounded_controller(&mut body);
        c.jump(InputPhase::Performed, &mut body);

        // The probe still overlaps on the step right after the press
        c.fixed_update(DT, &mut body, &env(true, false));
        assert!(c.state().is_grounded());
        assert_eq!(c.state().jump_charges(), 1);

        c.fixed_update(DT, &mut body, &env(false, false));
        c.jump(InputPhase::Canceled, &mut body);
        body.velocity.y = 4.0;
        c.jump(InputPhase::Performed, &mut body);
        assert_eq!(body.velocity.y, 4.0);
        assert_eq!(c.state().jump_charges(), 0);
    }

    #[test]
    fn test_repeated_ground_checks_are_stable() {
        let mut body = BodyState::default();
        let mut c = grounded_controller(&mut body);
        let before = c.state().clone();

        for _ in 0..10 {
            c.fixed_update(DT, &mut body, &env(true, false));
        }

        assert_eq!(c.state(), &before);
        assert_eq!(c.state().jump_charges(), c.config().max_jump_charges);
    }

    #[test]
    fn test_wall_slide_caps_fall_speed_only() {
        let mut body = BodyState::default();
        let mut c = controller();

        body.velocity.y = -10.0;
        c.fixed_update(DT, &mut body, &env(false, true));
        assert!(c.state().is_wall_sliding());
        assert_eq!(body.velocity.y, -2.0);

        body.velocity.y = 5.0;
        c.fixed_update(DT, &mut body, &env(false, true));
        assert_eq!(body.velocity.y, 5.0);
    }

    #[test]
    fn test_no_slide_when_grounded() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.fixed_update(DT, &mut body, &env(true, true));
        assert!(c.state().on_wall());
        assert!(!c.state().is_wall_sliding());
        assert!(!c.state().wall_jump_window_open());
    }

    #[test]
    fn test_wall_jump_after_slide_onset() {
        let mut body = BodyState::default();
        let mut c = controller();
        body.velocity.y = -10.0;
        c.fixed_update(DT, &mut body, &env(false, true));
        assert!(c.state().wall_jump_window_open());

        c.handle_intent(IntentEvent::pressed(Intent::WallJump), &mut body);

        assert_eq!(body.velocity, Vec2::new(-8.0, 16.0));
        assert_eq!(c.state().facing(), Facing::Left);
        assert!(c.state().is_wall_jumping());
        assert!(!c.state().wall_jump_window_open());
        assert!(c.wall_jump_expiry.is_pending());

        // Window was consumed
        body.velocity = Vec2::ZERO;
        c.wall_jump(InputPhase::Performed, &mut body);
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_wall_jump_without_flip_when_already_facing_away() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.fixed_update(DT, &mut body, &env(false, true));

        // Turn away from the wall while still touching it
        c.move_axis(-1.0, InputPhase::Performed);
        c.fixed_update(DT, &mut body, &env(false, true));
        assert_eq!(c.state().facing(), Facing::Left);
        assert!(c.state().is_wall_sliding());

        c.wall_jump(InputPhase::Performed, &mut body);
        assert_eq!(c.state().facing(), Facing::Left);
        assert_eq!(body.velocity, Vec2::new(-8.0, 16.0));
    }

    #[test]
    fn test_leaving_wall_closes_window() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.fixed_update(DT, &mut body, &env(false, true));
        assert!(c.state().wall_jump_window_open());

        c.fixed_update(DT, &mut body, &env(false, false));
        assert!(!c.state().wall_jump_window_open());
        assert_eq!(c.state().wall_state(), WallState::Idle);

        body.velocity = Vec2::new(0.0, -3.0);
        c.wall_jump(InputPhase::Performed, &mut body);
        assert_eq!(body.velocity, Vec2::new(0.0, -3.0));
        assert_eq!(c.state().facing(), Facing::Right);
        assert!(!c.state().is_wall_jumping());
    }

    #[test]
    fn test_landing_closes_window() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.fixed_update(DT, &mut body, &env(false, true));
        c.fixed_update(DT, &mut body, &env(true, true));
        assert!(!c.state().wall_jump_window_open());
        assert!(!c.state().is_wall_sliding());
    }

    #[test]
    fn test_wall_jump_owns_velocity_until_expiry() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.fixed_update(DT, &mut body, &env(false, true));
        c.wall_jump(InputPhase::Performed, &mut body);
        c.move_axis(1.0, InputPhase::Performed);

        // 0.4s counted from the step after the intent: four owned steps
        // plus the one the intent arrived before
        for _ in 0..4 {
            c.fixed_update(DT, &mut body, &env(false, false));
            assert!(c.state().is_wall_jumping());
            assert_eq!(body.velocity.x, -8.0);
            assert_eq!(c.state().facing(), Facing::Left);
        }

        c.fixed_update(DT, &mut body, &env(false, false));
        assert!(!c.state().is_wall_jumping());
        assert_eq!(body.velocity.x, 8.0);
        assert_eq!(c.state().facing(), Facing::Right);
    }

    #[test]
    fn test_new_slide_cancels_wall_jump_expiry() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.fixed_update(DT, &mut body, &env(false, true));
        c.wall_jump(InputPhase::Performed, &mut body);
        assert!(c.wall_jump_expiry.is_pending());

        // Reached the opposite wall before the expiry fired
        c.fixed_update(DT, &mut body, &env(false, true));
        assert!(c.state().is_wall_sliding());
        assert!(!c.wall_jump_expiry.is_pending());

        // Fresh window points away from the new wall
        c.wall_jump(InputPhase::Performed, &mut body);
        assert_eq!(body.velocity, Vec2::new(8.0, 16.0));
        assert_eq!(c.state().facing(), Facing::Right);
    }

    #[test]
    fn test_roll_sets_velocity_and_latches() {
        let mut body = BodyState::default();
        let mut c = grounded_controller(&mut body);
        c.state.facing = Facing::Left;

        c.handle_intent(IntentEvent::pressed(Intent::Roll), &mut body);
        assert!(c.state().is_rolling());
        assert!(!c.state().can_roll());
        assert_eq!(body.velocity.x, -10.0);

        // Walk input neither moves nor turns a rolling character
        c.move_axis(1.0, InputPhase::Performed);
        c.fixed_update(DT, &mut body, &env(true, false));
        assert_eq!(body.velocity.x, -10.0);
        assert_eq!(c.state().facing(), Facing::Left);

        // No re-trigger until the finished signal
        body.velocity.x = 0.0;
        c.roll(InputPhase::Performed, &mut body);
        assert_eq!(body.velocity.x, 0.0);

        c.end_roll();
        assert!(!c.state().is_rolling());
        assert!(c.state().can_roll());
    }

    #[test]
    fn test_roll_rejected_in_air() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.fixed_update(DT, &mut body, &env(false, false));

        c.roll(InputPhase::Performed, &mut body);
        assert!(!c.state().is_rolling());
        assert!(c.state().can_roll());
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_dash_full_sequence() {
        let mut body = BodyState::default();
        let mut c = controller();
        body.velocity = Vec2::new(3.0, -4.0);

        c.handle_intent(IntentEvent::pressed(Intent::Dash), &mut body);
        assert_eq!(body.velocity, Vec2::new(20.0, 0.0));
        assert_eq!(body.gravity_scale, 0.0);
        assert!(c.state().is_dashing());
        assert!(!c.state().can_dash());

        // The 0.2s dash covers the arming step plus two more
        for _ in 0..2 {
            c.fixed_update(DT, &mut body, &env(false, false));
            assert!(c.state().is_dashing());
            assert_eq!(body.velocity, Vec2::new(20.0, 0.0));
        }

        body.velocity.y = -1.5;
        c.fixed_update(DT, &mut body, &env(false, false));
        assert!(!c.state().is_dashing());
        assert_eq!(body.gravity_scale, 1.0);
        assert_eq!(body.velocity, Vec2::new(0.0, -1.5));
        assert!(!c.state().can_dash());
        assert!(matches!(c.state().dash_phase(), DashPhase::Cooldown { .. }));

        // 0.5s cooldown, with a rejected dash attempt along the way
        for _ in 0..4 {
            c.fixed_update(DT, &mut body, &env(false, false));
            assert!(!c.state().can_dash());
            c.dash(InputPhase::Performed, &mut body);
            assert!(!c.state().is_dashing());
            assert_eq!(body.gravity_scale, 1.0);
        }
        c.fixed_update(DT, &mut body, &env(false, false));
        assert!(c.state().can_dash());
        assert_eq!(c.state().dash_phase(), DashPhase::Ready);
    }

    #[test]
    fn test_dash_velocity_spans_full_duration_at_60hz() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.dash(InputPhase::Performed, &mut body);

        // Count the steps that hand dash velocity to the solver
        let mut dash_steps = 0;
        for _ in 0..30 {
            c.fixed_update(1.0 / 60.0, &mut body, &env(false, false));
            if body.velocity.x == 20.0 {
                dash_steps += 1;
            }
        }
        assert_eq!(dash_steps, 12);
        assert!(!c.state().is_dashing());
    }

    #[test]
    fn test_dash_freezes_sensors_and_walk() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.fixed_update(DT, &mut body, &env(false, false));
        c.move_axis(-1.0, InputPhase::Performed);
        c.dash(InputPhase::Performed, &mut body);

        c.fixed_update(DT, &mut body, &env(true, true));
        assert!(!c.state().is_grounded());
        assert!(!c.state().on_wall());
        assert!(!c.state().is_wall_sliding());
        assert_eq!(c.state().facing(), Facing::Right);
        assert_eq!(body.velocity, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_dash_follows_facing() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.move_axis(-1.0, InputPhase::Performed);
        c.fixed_update(DT, &mut body, &env(true, false));

        c.dash(InputPhase::Performed, &mut body);
        assert_eq!(body.velocity, Vec2::new(-20.0, 0.0));
    }

    #[test]
    fn test_dash_preempts_roll() {
        let mut body = BodyState::default();
        let mut c = grounded_controller(&mut body);
        c.roll(InputPhase::Performed, &mut body);
        assert!(c.state().is_rolling());

        c.dash(InputPhase::Performed, &mut body);
        assert!(c.state().is_dashing());
        assert!(!c.state().is_rolling());
        assert!(c.state().can_roll());

        // Roll is refused while the dash runs
        c.roll(InputPhase::Performed, &mut body);
        assert!(!c.state().is_rolling());
    }

    #[test]
    fn test_jump_and_wall_jump_ignored_during_dash() {
        let mut body = BodyState::default();
        let mut c = controller();
        c.fixed_update(DT, &mut body, &env(false, true));
        c.dash(InputPhase::Performed, &mut body);

        c.jump(InputPhase::Performed, &mut body);
        c.wall_jump(InputPhase::Performed, &mut body);

        assert_eq!(body.velocity, Vec2::new(20.0, 0.0));
        assert_eq!(c.state().jump_charges(), 2);
        assert!(c.state().wall_jump_window_open());
    }

    #[test]
    fn test_attack_toggle() {
        let mut body = BodyState::default();
        let mut c = controller();
        body.velocity = Vec2::new(1.0, 2.0);

        c.handle_intent(IntentEvent::pressed(Intent::Attack), &mut body);
        assert!(c.state().is_attacking());
        assert!(c.snapshot(&body).is_attacking);
        assert_eq!(body.velocity, Vec2::new(1.0, 2.0));

        c.end_attack();
        assert!(!c.state().is_attacking());
    }

    #[test]
    fn test_release_only_intents_are_ignored() {
        let mut body = BodyState::default();
        let mut c = grounded_controller(&mut body);
        c.handle_intent(IntentEvent::released(Intent::Roll), &mut body);
        c.handle_intent(IntentEvent::released(Intent::Dash), &mut body);
        c.handle_intent(IntentEvent::released(Intent::Attack), &mut body);

        assert!(!c.state().is_rolling());
        assert!(c.state().can_dash());
        assert!(!c.state().is_attacking());
    }

    #[test]
    fn test_probe_regions_mirror_with_facing() {
        let mut c = controller();
        let body = BodyState::new(Vec2::new(2.0, 3.0), Vec2::ZERO, 1.0);

        let [ground, wall] = c.probe_regions(&body);
        assert_eq!(ground.kind, ProbeKind::Ground);
        assert_eq!(ground.center, Vec2::new(2.0, 2.0));
        assert_eq!(wall.kind, ProbeKind::Wall);
        assert_relative_eq!(wall.center.x, 2.55);

        c.state.facing = Facing::Left;
        let [_, wall] = c.probe_regions(&body);
        assert_relative_eq!(wall.center.x, 1.45);
        assert_eq!(wall.size, c.config().wall_probe.size);
    }

    #[test]
    fn test_invariants_hold_under_random_input() {
        let mut body = BodyState::default();
        let mut c = controller();
        let mut rng = Lcg(0x1234_5678);
        let max = c.config().max_jump_charges;

        for _ in 0..5_000 {
            match rng.next() % 10 {
                0 => c.handle_intent(IntentEvent::pressed(Intent::Jump), &mut body),
                1 => c.handle_intent(IntentEvent::released(Intent::Jump), &mut body),
                2 => c.handle_intent(IntentEvent::pressed(Intent::WallJump), &mut body),
                3 => c.handle_intent(IntentEvent::pressed(Intent::Roll), &mut body),
                4 => c.handle_intent(IntentEvent::pressed(Intent::Dash), &mut body),
                5 => c.end_roll(),
                6 => {
                    let axis = (rng.next() % 3) as f32 - 1.0;
                    c.handle_intent(IntentEvent::move_axis(axis), &mut body);
                }
                _ => {
                    let ground = rng.next() % 2 == 0;
                    let wall = rng.next() % 3 == 0;
                    c.fixed_update(DT, &mut body, &env(ground, wall));
                }
            }

            let state = c.state();
            assert!(!(state.is_rolling() && state.is_dashing()));
            assert!(state.jump_charges() <= max);
            assert_eq!(body.gravity_scale == 0.0, state.is_dashing());
            if state.wall_jump_window_open() {
                assert!(state.is_wall_sliding());
            }
        }
    }
}
