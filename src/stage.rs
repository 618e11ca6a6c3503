use crate::animation::Ticker;
use crate::config::MotionConfig;
use crate::controller::{Gesture, InputController, PoseTweens};
use crate::figure::{Figure, PoseParameters};
use crate::renderer::SceneHost;
use crate::scene::Scene;
use rand::Rng;
use std::time::{Duration, Instant};

/// Everything that changes from frame to frame: the scene, the figure in it,
/// the pose driving the figure and the tweens driving the pose.
pub struct Stage {
    scene: Scene,
    figure: Figure,
    pose: PoseParameters,
    tweens: PoseTweens,
    controller: InputController,
    ticker: Ticker,
}

impl Stage {
    pub fn new<R: Rng + ?Sized>(motion: &MotionConfig, rng: &mut R) -> Self {
        let mut scene = Scene::new();
        let pose = PoseParameters::default();
        let mut figure = Figure::new(&mut scene, &pose, rng);
        figure.assemble(&mut scene);

        Self {
            scene,
            figure,
            pose,
            tweens: PoseTweens::new(),
            controller: InputController::new(motion),
            ticker: Ticker::new(
                Duration::from_millis(motion.lag_threshold_ms),
                Duration::from_millis(motion.adjusted_lag_ms),
            ),
        }
    }

    pub fn handle_gesture(&mut self, gesture: Gesture) -> bool {
        let accepted = self.controller.handle(gesture, &self.pose, &mut self.tweens);
        if !accepted {
            log::debug!("{:?} ignored", gesture);
        }
        accepted
    }

    /// One display refresh at wall-clock time `now`.
    pub fn frame<H: SceneHost + ?Sized>(
        &mut self,
        now: Instant,
        host: &mut H,
    ) -> Result<(), wgpu::SurfaceError> {
        let dt = self.ticker.tick(now);
        self.advance(dt, host)
    }

    /// Steps tweens by `dt` seconds, projects the pose and renders.
    /// Tween cues that ask for a redraw render before the projection.
    ///
    /// Every cue is handled even when a render fails; the first render error
    /// is returned once the frame is done.
    pub fn advance<H: SceneHost + ?Sized>(
        &mut self,
        dt: f32,
        host: &mut H,
    ) -> Result<(), wgpu::SurfaceError> {
        let mut redraw = false;
        for cue in self.tweens.tick(dt, &mut self.pose) {
            redraw |= self.controller.on_cue(cue, &self.pose, &mut self.tweens);
        }

        let mut first_error = None;
        if redraw {
            if let Err(e) = host.render(&self.scene) {
                log::debug!("Immediate render failed: {:?}", e);
                first_error = Some(e);
            }
        }

        // Bounce runs last and wins on yaw and height.
        self.figure.apply_direction_pose(&self.pose, &mut self.scene);
        self.figure.apply_bounce_pose(&self.pose, &mut self.scene);
        let frame = host.render(&self.scene);

        match first_error {
            Some(e) => Err(e),
            None => frame,
        }
    }
}
