use std::fmt::Debug;
use std::time::{Duration, Instant};

// ── Easing ──────────────────────────────────────────────────

/// Timing curves. `Power1Out` is what a tween gets when nothing else is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Power1Out,
    Power2Out,
}

impl Ease {
    /// Maps linear progress `t` in `[0, 1]` to eased progress. `apply(0) == 0`, `apply(1) == 1`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Power1Out => 1.0 - (1.0 - t).powi(2),
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
        }
    }
}

// ── Targets ─────────────────────────────────────────────────

/// Something with named numeric fields that tweens can drive.
pub trait Tweenable {
    type Field: Copy + PartialEq + Debug;

    fn get(&self, field: Self::Field) -> f32;
    fn set(&mut self, field: Self::Field, value: f32);
}

// ── Tweens ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(u64);

/// Description of a tween before it is started. `E` is the event type emitted
/// back to the caller in place of callbacks.
#[derive(Debug, Clone)]
pub struct TweenSpec<F, E> {
    targets: Vec<(F, f32)>,
    duration: f32,
    ease: Ease,
    repeat: u32,
    yoyo: bool,
    on_update: Option<E>,
    on_repeat: Option<E>,
    on_complete: Option<E>,
}

impl<F: Copy + PartialEq, E: Clone> TweenSpec<F, E> {
    /// `duration` is in seconds, per iteration.
    pub fn new(duration: f32) -> Self {
        Self {
            targets: Vec::new(),
            duration: duration.max(0.0),
            ease: Ease::default(),
            repeat: 0,
            yoyo: false,
            on_update: None,
            on_repeat: None,
            on_complete: None,
        }
    }

    pub fn to(mut self, field: F, value: f32) -> Self {
        self.targets.retain(|(f, _)| *f != field);
        self.targets.push((field, value));
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Extra iterations after the first.
    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat = count;
        self
    }

    /// Odd iterations play backwards.
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Emitted after every step that changed the target.
    pub fn on_update(mut self, event: E) -> Self {
        self.on_update = Some(event);
        self
    }

    /// Emitted each time an iteration finishes and another begins.
    pub fn on_repeat(mut self, event: E) -> Self {
        self.on_repeat = Some(event);
        self
    }

    /// Emitted once, after the final iteration.
    pub fn on_complete(mut self, event: E) -> Self {
        self.on_complete = Some(event);
        self
    }

    pub fn total_duration(&self) -> f32 {
        self.duration * (self.repeat + 1) as f32
    }
}

#[derive(Debug, Clone)]
struct Track<F> {
    field: F,
    from: f32,
    to: f32,
}

impl<F> Track<F> {
    // Endpoints are written exactly so range checks on settled values hold.
    fn value(&self, eased: f32) -> f32 {
        if eased >= 1.0 {
            self.to
        } else if eased <= 0.0 {
            self.from
        } else {
            self.from + (self.to - self.from) * eased
        }
    }
}

#[derive(Debug)]
struct Tween<F, E> {
    id: TweenId,
    tracks: Vec<Track<F>>,
    spec: TweenSpec<F, E>,
    elapsed: f32,
    ticked: bool,
}

impl<F: Copy + PartialEq, E: Clone> Tween<F, E> {
    fn iteration(&self, elapsed: f32) -> u32 {
        if self.spec.duration <= 0.0 {
            return self.spec.repeat;
        }
        ((elapsed / self.spec.duration).floor() as u32).min(self.spec.repeat)
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.spec.total_duration()
    }

    /// Linear progress of the current iteration, direction already resolved.
    fn progress(&self) -> f32 {
        let reversed_end = self.spec.yoyo && self.spec.repeat % 2 == 1;
        if self.finished() {
            return if reversed_end { 0.0 } else { 1.0 };
        }
        let iteration = self.iteration(self.elapsed);
        let local = (self.elapsed - iteration as f32 * self.spec.duration) / self.spec.duration;
        if self.spec.yoyo && iteration % 2 == 1 {
            1.0 - local
        } else {
            local
        }
    }
}

/// Advances every running tween by the same clock. A new tween takes over any
/// field another tween is already driving, starting from the field's live value.
#[derive(Debug)]
pub struct TweenEngine<T: Tweenable, E> {
    tweens: Vec<Tween<T::Field, E>>,
    next_id: u64,
}

impl<T: Tweenable, E: Clone + Debug> Default for TweenEngine<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tweenable, E: Clone + Debug> TweenEngine<T, E> {
    pub fn new() -> Self {
        Self { tweens: Vec::new(), next_id: 0 }
    }

    pub fn to(&mut self, target: &T, spec: TweenSpec<T::Field, E>) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;

        for running in self.tweens.iter_mut() {
            running
                .tracks
                .retain(|track| !spec.targets.iter().any(|(f, _)| *f == track.field));
        }
        self.tweens.retain(|t| {
            if t.tracks.is_empty() {
                log::trace!("Tween {:?} overwritten", t.id);
            }
            !t.tracks.is_empty()
        });

        let tracks = spec
            .targets
            .iter()
            .map(|&(field, to)| Track { field, from: target.get(field), to })
            .collect();
        log::trace!("Tween {:?} started: {} field(s) over {}s", id, spec.targets.len(), spec.total_duration());
        self.tweens.push(Tween { id, tracks, spec, elapsed: 0.0, ticked: false });
        id
    }

    /// Step every tween by `dt` seconds, writing into `target`. Returns the
    /// events raised during this step, in tween start order.
    pub fn tick(&mut self, dt: f32, target: &mut T) -> Vec<E> {
        let mut events = Vec::new();
        for tween in self.tweens.iter_mut() {
            // A zero-length tween sits at its last iteration from the start, so
            // its first step has to count every boundary from zero.
            let before = if tween.ticked { tween.iteration(tween.elapsed) } else { 0 };
            tween.ticked = true;
            tween.elapsed = (tween.elapsed + dt.max(0.0)).min(tween.spec.total_duration());
            let after = tween.iteration(tween.elapsed);

            let eased = tween.spec.ease.apply(tween.progress());
            for track in &tween.tracks {
                target.set(track.field, track.value(eased));
            }

            if let Some(event) = &tween.spec.on_update {
                events.push(event.clone());
            }
            if let Some(event) = &tween.spec.on_repeat {
                for _ in before..after {
                    events.push(event.clone());
                }
            }
            if tween.finished() {
                log::trace!("Tween {:?} complete", tween.id);
                if let Some(event) = &tween.spec.on_complete {
                    events.push(event.clone());
                }
            }
        }
        self.tweens.retain(|t| !t.finished());
        events
    }

    #[cfg(test)]
    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|t| t.id == id)
    }

    /// Whether any running tween drives `field`.
    #[cfg(test)]
    pub fn is_tweening(&self, field: T::Field) -> bool {
        self.tweens
            .iter()
            .any(|t| t.tracks.iter().any(|track| track.field == field))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

// ── Ticker ──────────────────────────────────────────────────

/// Turns wall-clock instants into frame deltas. A gap longer than
/// `lag_threshold` (a stalled window, a debugger pause) is replaced by
/// `adjusted_lag` so animations resume where they left off.
#[derive(Debug, Clone)]
pub struct Ticker {
    last: Option<Instant>,
    lag_threshold: Duration,
    adjusted_lag: Duration,
}

impl Ticker {
    pub fn new(lag_threshold: Duration, adjusted_lag: Duration) -> Self {
        Self { last: None, lag_threshold, adjusted_lag }
    }

    /// Seconds since the previous call; zero on the first call.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        if delta > self.lag_threshold {
            log::debug!("Frame gap of {:?} smoothed to {:?}", delta, self.adjusted_lag);
            return self.adjusted_lag.as_secs_f32();
        }
        delta.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Point {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Axis {
        X,
        Y,
    }

    impl Tweenable for Point {
        type Field = Axis;

        fn get(&self, field: Axis) -> f32 {
            match field {
                Axis::X => self.x,
                Axis::Y => self.y,
            }
        }

        fn set(&mut self, field: Axis, value: f32) {
            match field {
                Axis::X => self.x = value,
                Axis::Y => self.y = value,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Cue {
        Step,
        Turned,
        Done,
    }

    type Engine = TweenEngine<Point, Cue>;

    fn run(engine: &mut Engine, point: &mut Point, steps: usize, dt: f32) -> Vec<Cue> {
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(engine.tick(dt, point));
        }
        events
    }

    #[test]
    fn eases_hit_endpoints() {
        for ease in [Ease::Power1Out, Ease::Power2Out] {
            assert_eq!(ease.apply(0.0), 0.0, "{:?}", ease);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{:?}", ease);
        }
    }

    #[test]
    fn ease_out_leads_linear() {
        assert!(Ease::Power2Out.apply(0.3) > Ease::Power1Out.apply(0.3));
        assert!(Ease::Power1Out.apply(0.3) > 0.3);
        assert_eq!(Ease::Power1Out.apply(0.5), 0.75);
    }

    #[test]
    fn tween_reaches_target_and_completes_once() {
        let mut point = Point::default();
        let mut engine = Engine::new();
        engine.to(&point, TweenSpec::new(0.1).to(Axis::X, 2.0).on_complete(Cue::Done));

        let events = run(&mut engine, &mut point, 10, 0.02);
        assert_eq!(point.x, 2.0);
        assert_eq!(events, vec![Cue::Done]);
        assert!(engine.is_empty());
    }

    #[test]
    fn on_update_fires_every_step() {
        let mut point = Point::default();
        let mut engine = Engine::new();
        engine.to(&point, TweenSpec::new(0.5).to(Axis::Y, 1.0).on_update(Cue::Step));

        let events = run(&mut engine, &mut point, 5, 0.125);
        // Four steps to finish; the fifth has nothing left to drive.
        assert_eq!(events.iter().filter(|e| **e == Cue::Step).count(), 4);
    }

    #[test]
    fn yoyo_returns_to_start() {
        let mut point = Point::default();
        let mut engine = Engine::new();
        engine.to(
            &point,
            TweenSpec::new(0.3)
                .to(Axis::Y, 1.5)
                .repeat(1)
                .yoyo(true)
                .on_repeat(Cue::Turned)
                .on_complete(Cue::Done),
        );

        let mut peak: f32 = 0.0;
        let mut events = Vec::new();
        for _ in 0..40 {
            events.extend(engine.tick(1.0 / 60.0, &mut point));
            peak = peak.max(point.y);
        }
        assert!((peak - 1.5).abs() < 0.05, "peak {}", peak);
        assert_eq!(point.y, 0.0);
        assert_eq!(events, vec![Cue::Turned, Cue::Done]);
    }

    #[test]
    fn new_tween_takes_over_field_from_live_value() {
        let mut point = Point::default();
        let mut engine = Engine::new();
        let first = engine.to(&point, TweenSpec::new(1.0).to(Axis::X, 10.0).on_complete(Cue::Done));
        run(&mut engine, &mut point, 1, 0.5);
        // Power1Out at the halfway point is three quarters of the way.
        assert!((point.x - 7.5).abs() < 1e-5);

        engine.to(&point, TweenSpec::new(1.0).to(Axis::X, -5.0));
        assert!(!engine.is_active(first));

        run(&mut engine, &mut point, 1, 0.5);
        // Three quarters of the way from 7.5 to -5.
        assert!((point.x + 1.875).abs() < 1e-5, "{}", point.x);
        let events = run(&mut engine, &mut point, 1, 0.5);
        assert_eq!(point.x, -5.0);
        assert!(events.is_empty(), "overwritten tween must not complete");
    }

    #[test]
    fn overwrite_only_removes_shared_fields() {
        let mut point = Point::default();
        let mut engine = Engine::new();
        let both = engine.to(&point, TweenSpec::new(1.0).to(Axis::X, 1.0).to(Axis::Y, 1.0));
        engine.to(&point, TweenSpec::new(1.0).to(Axis::Y, -1.0));

        assert!(engine.is_active(both));
        assert!(engine.is_tweening(Axis::X));
        run(&mut engine, &mut point, 2, 0.5);
        assert_eq!(point.x, 1.0);
        assert_eq!(point.y, -1.0);
    }

    #[test]
    fn zero_duration_snaps() {
        let mut point = Point::default();
        let mut engine = Engine::new();
        engine.to(&point, TweenSpec::new(0.0).to(Axis::X, 3.0).on_complete(Cue::Done));
        let events = engine.tick(0.0, &mut point);
        assert_eq!(point.x, 3.0);
        assert_eq!(events, vec![Cue::Done]);
    }

    #[test]
    fn zero_duration_yoyo_still_repeats() {
        let mut point = Point::default();
        let mut engine = Engine::new();
        engine.to(
            &point,
            TweenSpec::new(0.0)
                .to(Axis::Y, 1.5)
                .repeat(1)
                .yoyo(true)
                .on_repeat(Cue::Turned)
                .on_complete(Cue::Done),
        );
        let events = engine.tick(1.0 / 60.0, &mut point);
        assert_eq!(events, vec![Cue::Turned, Cue::Done]);
        assert_eq!(point.y, 0.0);
        assert!(engine.is_empty());
    }

    #[test]
    fn ticker_smooths_long_gaps() {
        let mut ticker = Ticker::new(Duration::from_millis(500), Duration::from_millis(33));
        let start = Instant::now();
        assert_eq!(ticker.tick(start), 0.0);
        let dt = ticker.tick(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        let dt = ticker.tick(start + Duration::from_millis(2016));
        assert!((dt - 0.033).abs() < 1e-6);
    }
}
