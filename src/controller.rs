use crate::animation::{Ease, TweenEngine, TweenSpec};
use crate::config::MotionConfig;
use crate::figure::{PoseField, PoseParameters};
use winit::keyboard::KeyCode;

/// The three things the keyboard can ask the figure to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Jump,
    TurnLeft,
    TurnRight,
}

impl Gesture {
    /// Key repeats only count for turning; a held Space jumps once.
    pub fn from_key(code: KeyCode, repeat: bool) -> Option<Self> {
        match code {
            KeyCode::Space if !repeat => Some(Gesture::Jump),
            KeyCode::ArrowLeft => Some(Gesture::TurnLeft),
            KeyCode::ArrowRight => Some(Gesture::TurnRight),
            _ => None,
        }
    }
}

/// Events the pose tweens raise back into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseCue {
    /// The jump reached the top and starts coming down.
    JumpApex,
    /// Arms are back at rest; a new jump may start.
    JumpSettled,
    /// A turn step moved; draw right away.
    Redraw,
}

pub type PoseTweens = TweenEngine<PoseParameters, PoseCue>;

/// Turns gestures into pose tweens. Jumps are single-flight; turns are not.
pub struct InputController {
    jump_height: f32,
    jump_duration: f32,
    arm_swing: f32,
    turn_step: f32,
    max_yaw: f32,
    turn_duration: f32,
    is_animating: bool,
}

impl InputController {
    pub fn new(motion: &MotionConfig) -> Self {
        Self {
            jump_height: motion.jump_height,
            jump_duration: motion.jump_duration,
            arm_swing: motion.arm_swing.to_radians(),
            turn_step: motion.turn_step.to_radians(),
            max_yaw: motion.max_yaw.to_radians().abs(),
            turn_duration: motion.turn_duration,
            is_animating: false,
        }
    }

    /// Schedules whatever `gesture` asks for. Returns false when its precondition fails.
    pub fn handle(&mut self, gesture: Gesture, pose: &PoseParameters, tweens: &mut PoseTweens) -> bool {
        match gesture {
            Gesture::Jump => self.jump(pose, tweens),
            Gesture::TurnLeft => self.turn(pose, tweens, -1.0),
            Gesture::TurnRight => self.turn(pose, tweens, 1.0),
        }
    }

    fn jump(&mut self, pose: &PoseParameters, tweens: &mut PoseTweens) -> bool {
        if self.is_animating {
            log::debug!("Jump ignored, already in the air");
            return false;
        }
        self.is_animating = true;

        tweens.to(
            pose,
            TweenSpec::new(self.jump_duration)
                .to(PoseField::Y, self.jump_height)
                .to(PoseField::ArmSwing, self.arm_swing)
                .repeat(1)
                .yoyo(true)
                .on_repeat(PoseCue::JumpApex),
        );
        log::debug!("Jump to {}", self.jump_height);
        true
    }

    fn turn(&mut self, pose: &PoseParameters, tweens: &mut PoseTweens, direction: f32) -> bool {
        let limit = self.max_yaw * direction;
        let new_yaw = if direction < 0.0 {
            if pose.yaw <= limit {
                return false;
            }
            (pose.yaw - self.turn_step).max(limit)
        } else {
            if pose.yaw >= limit {
                return false;
            }
            (pose.yaw + self.turn_step).min(limit)
        };

        tweens.to(
            pose,
            TweenSpec::new(self.turn_duration)
                .to(PoseField::Yaw, new_yaw)
                .to(PoseField::TargetYaw, new_yaw)
                .ease(Ease::Power2Out)
                .on_update(PoseCue::Redraw),
        );
        log::debug!("Turn from {:.3} to {:.3} rad", pose.yaw, new_yaw);
        true
    }

    /// Reacts to a cue raised by a tween step. Returns true when the caller
    /// should render immediately.
    pub fn on_cue(&mut self, cue: PoseCue, pose: &PoseParameters, tweens: &mut PoseTweens) -> bool {
        match cue {
            PoseCue::JumpApex => {
                tweens.to(
                    pose,
                    TweenSpec::new(self.jump_duration)
                        .to(PoseField::ArmSwing, 0.0)
                        .on_complete(PoseCue::JumpSettled),
                );
                false
            }
            PoseCue::JumpSettled => {
                self.is_animating = false;
                log::debug!("Jump finished");
                false
            }
            PoseCue::Redraw => true,
        }
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.is_animating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter() -> f32 {
        90f32.to_radians()
    }

    struct Rig {
        controller: InputController,
        pose: PoseParameters,
        tweens: PoseTweens,
        redraws: usize,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                controller: InputController::new(&MotionConfig::default()),
                pose: PoseParameters::default(),
                tweens: PoseTweens::new(),
                redraws: 0,
            }
        }

        fn press(&mut self, gesture: Gesture) -> bool {
            self.controller.handle(gesture, &self.pose, &mut self.tweens)
        }

        fn step(&mut self, dt: f32) {
            for cue in self.tweens.tick(dt, &mut self.pose) {
                if self.controller.on_cue(cue, &self.pose, &mut self.tweens) {
                    self.redraws += 1;
                }
            }
        }

        fn run(&mut self, seconds: f32) {
            let steps = (seconds * 60.0).ceil() as usize;
            for _ in 0..steps {
                self.step(1.0 / 60.0);
            }
        }
    }

    #[test]
    fn key_mapping() {
        assert_eq!(Gesture::from_key(KeyCode::Space, false), Some(Gesture::Jump));
        assert_eq!(Gesture::from_key(KeyCode::Space, true), None);
        assert_eq!(Gesture::from_key(KeyCode::ArrowLeft, true), Some(Gesture::TurnLeft));
        assert_eq!(Gesture::from_key(KeyCode::ArrowRight, false), Some(Gesture::TurnRight));
        assert_eq!(Gesture::from_key(KeyCode::KeyA, false), None);
    }

    #[test]
    fn turn_right_reaches_quarter_turn() {
        let mut rig = Rig::new();
        assert!(rig.press(Gesture::TurnRight));
        rig.run(0.2);
        assert_eq!(rig.pose.target_yaw, quarter());
        assert_eq!(rig.pose.yaw, quarter());
        assert!(rig.redraws >= 6, "each turn step asks for a redraw");
    }

    #[test]
    fn turn_is_incremental_not_snapped() {
        let mut rig = Rig::new();
        rig.press(Gesture::TurnLeft);
        rig.step(0.02);
        assert!(rig.pose.target_yaw < 0.0);
        assert!(rig.pose.target_yaw > -quarter());
    }

    #[test]
    fn second_turn_at_limit_is_noop() {
        let mut rig = Rig::new();
        rig.press(Gesture::TurnRight);
        rig.run(0.2);
        assert!(!rig.press(Gesture::TurnRight));
        assert!(rig.tweens.is_empty());
        rig.run(0.2);
        assert_eq!(rig.pose.target_yaw, quarter());
    }

    #[test]
    fn turn_left_at_left_limit_is_noop() {
        let mut rig = Rig::new();
        rig.pose.yaw = -quarter();
        rig.pose.target_yaw = -quarter();
        assert!(!rig.press(Gesture::TurnLeft));
        assert!(rig.tweens.is_empty());
    }

    #[test]
    fn yaw_stays_in_range_for_any_sequence() {
        let mut rig = Rig::new();
        let sequence = [
            Gesture::TurnRight, Gesture::TurnRight, Gesture::TurnLeft, Gesture::TurnLeft,
            Gesture::TurnLeft, Gesture::TurnLeft, Gesture::TurnRight, Gesture::TurnLeft,
        ];
        for (i, &gesture) in sequence.iter().cycle().take(64).enumerate() {
            rig.press(gesture);
            // Mix settled and mid-flight presses.
            rig.run(if i % 3 == 0 { 0.2 } else { 0.03 });
            for yaw in [rig.pose.yaw, rig.pose.target_yaw] {
                assert!((-quarter()..=quarter()).contains(&yaw), "yaw {} out of range", yaw);
            }
        }
    }

    #[test]
    fn mid_flight_turn_continues_from_live_value() {
        let mut rig = Rig::new();
        rig.press(Gesture::TurnRight);
        rig.step(0.05);
        let live = rig.pose.yaw;
        assert!(live > 0.0 && live < quarter());
        // Back toward the left limit, starting from where the first turn got to.
        assert!(rig.press(Gesture::TurnLeft));
        rig.step(0.001);
        assert!(rig.pose.yaw < live + 1e-3);
        rig.run(0.2);
        assert_eq!(rig.pose.yaw, (live - quarter()).max(-quarter()));
    }

    #[test]
    fn jump_cycle_clears_latch() {
        let mut rig = Rig::new();
        assert!(rig.press(Gesture::Jump));
        assert!(rig.controller.is_animating());

        let mut peak_y: f32 = 0.0;
        let mut peak_arm: f32 = 0.0;
        // 37 frames is just past 2 * 0.3 s: the rise and fall are done.
        for _ in 0..37 {
            rig.step(1.0 / 60.0);
            peak_y = peak_y.max(rig.pose.position.y);
            peak_arm = peak_arm.max(rig.pose.arm_swing);
        }
        assert!((peak_y - 1.5).abs() < 0.05, "peak {}", peak_y);
        assert!((peak_arm - quarter()).abs() < 0.05, "arm peak {}", peak_arm);
        assert_eq!(rig.pose.position.y, 0.0);

        // The arm return started at the apex, so it ends within a frame or two.
        for _ in 0..3 {
            rig.step(1.0 / 60.0);
        }
        assert_eq!(rig.pose.arm_swing, 0.0);
        assert!(!rig.controller.is_animating());
        assert!(rig.tweens.is_empty());
    }

    #[test]
    fn zero_length_jump_still_clears_latch() {
        let motion = MotionConfig { jump_duration: 0.0, ..MotionConfig::default() };
        let mut rig = Rig::new();
        rig.controller = InputController::new(&motion);

        assert!(rig.press(Gesture::Jump));
        rig.step(1.0 / 60.0);
        rig.step(1.0 / 60.0);
        assert_eq!(rig.pose.position.y, 0.0);
        assert_eq!(rig.pose.arm_swing, 0.0);
        assert!(!rig.controller.is_animating());
        assert!(rig.press(Gesture::Jump));
    }

    #[test]
    fn jump_while_latched_is_noop() {
        let mut rig = Rig::new();
        rig.press(Gesture::Jump);
        rig.run(0.1);
        let tweens_before = rig.tweens.len();
        let y_before = rig.pose.position.y;

        assert!(!rig.press(Gesture::Jump));
        assert_eq!(rig.tweens.len(), tweens_before);
        assert_eq!(rig.pose.position.y, y_before);

        // Same trajectory as an undisturbed jump.
        let mut reference = Rig::new();
        reference.press(Gesture::Jump);
        reference.run(0.1);
        rig.step(1.0 / 60.0);
        reference.step(1.0 / 60.0);
        assert_eq!(rig.pose.position.y, reference.pose.position.y);
    }

    #[test]
    fn can_jump_again_after_landing() {
        let mut rig = Rig::new();
        rig.press(Gesture::Jump);
        rig.run(0.75);
        assert!(rig.press(Gesture::Jump));
    }

    #[test]
    fn turning_does_not_block_jumping() {
        let mut rig = Rig::new();
        rig.press(Gesture::Jump);
        assert!(rig.press(Gesture::TurnLeft));
        rig.run(0.75);
        assert_eq!(rig.pose.yaw, -quarter());
        assert_eq!(rig.pose.position.y, 0.0);
        assert!(!rig.controller.is_animating());
    }
}
