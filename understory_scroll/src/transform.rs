// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scroll source that owns a virtual offset and moves content by transform.
//!
//! The content layer stays put in layout and is drawn through
//! [`TransformScroll::transform`], a vertical translation by the negated
//! offset. Input arrives as wheel deltas, pointer or touch drags, and
//! programmatic [`TransformScroll::scroll_to`] calls; [`TransformScroll::tick`]
//! advances momentum and animations once per frame.
//!
//! ```
//! use understory_scroll::{ScrollPhase, ScrollSource, TransformScroll};
//!
//! let mut scroll = TransformScroll::new();
//! scroll.set_dimensions(200.0, 2_000.0);
//!
//! scroll.begin(500.0, 0.0);
//! assert_eq!(scroll.move_to(480.0, 16.0), Some(ScrollPhase::Started));
//! assert_eq!(scroll.offset(), 20.0);
//! assert_eq!(scroll.transform().translation().y, -20.0);
//! ```

use kurbo::{Affine, Vec2};

use crate::{Momentum, MomentumConfig, ScrollPhase, ScrollSource, clamp_offset, max_offset};

/// Wheel input scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelConfig {
    /// Offset units scrolled per unit of wheel delta.
    pub factor: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self { factor: 0.8 }
    }
}

/// One wheel event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelDelta {
    /// Vertical wheel delta. Positive values point away from the user, which
    /// scrolls towards the start unless `inverted` is set.
    pub delta_y: f64,
    /// The device reports direction-inverted ("natural") deltas.
    pub inverted: bool,
}

/// Duration of an animated [`TransformScroll::scroll_to`], in milliseconds.
pub const SCROLL_ANIMATION_MS: f64 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: f64,
    to: f64,
    elapsed_ms: f64,
    duration_ms: f64,
}

impl Tween {
    fn sample(&self) -> f64 {
        let t = (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        self.from + (self.to - self.from) * eased
    }

    fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Dragging { last_y: f64, started: bool },
    Decelerating,
    Animating(Tween),
}

/// Virtual-offset scroll source with drag momentum.
#[derive(Debug, Clone)]
pub struct TransformScroll {
    offset: f64,
    viewport_height: f64,
    content_extent: f64,
    wheel: WheelConfig,
    momentum: Momentum,
    motion: Motion,
}

impl Default for TransformScroll {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformScroll {
    /// Creates a source at offset `0` with default wheel and momentum tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WheelConfig::default(), MomentumConfig::default())
    }

    /// Creates a source with explicit tuning.
    #[must_use]
    pub fn with_config(wheel: WheelConfig, momentum: MomentumConfig) -> Self {
        Self {
            offset: 0.0,
            viewport_height: 0.0,
            content_extent: 0.0,
            wheel,
            momentum: Momentum::new(momentum),
            motion: Motion::Idle,
        }
    }

    /// Transform to apply to the content layer: a translation by `(0, -offset)`.
    #[must_use]
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(0.0, -self.offset))
    }

    /// Returns `true` while a drag, momentum, or animation is in progress.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        !matches!(self.motion, Motion::Idle)
    }

    /// Applies a wheel event. Returns `true` if the offset moved.
    ///
    /// The step is scaled by [`WheelConfig::factor`] and the result clamped to
    /// `[0, max_offset]`, so a step past an edge lands exactly on it.
    pub fn on_wheel(&mut self, wheel: WheelDelta) -> bool {
        let direction = if wheel.inverted { 1.0 } else { -1.0 };
        let delta = wheel.delta_y * self.wheel.factor * direction;
        let target = clamp_offset(self.offset + delta, self.max_offset());
        if target == self.offset {
            return false;
        }
        if !matches!(self.motion, Motion::Dragging { .. }) {
            self.settle_motion();
        }
        self.offset = target;
        true
    }

    /// Starts a drag with the pointer at `y` at `time_ms`.
    ///
    /// Any momentum or animation in flight stops.
    pub fn begin(&mut self, y: f64, time_ms: f64) {
        self.momentum.begin(time_ms);
        self.motion = Motion::Dragging {
            last_y: y,
            started: false,
        };
    }

    /// Moves the active drag to `y` at `time_ms`.
    ///
    /// Returns [`ScrollPhase::Started`] the first time the drag actually moves
    /// the offset.
    pub fn move_to(&mut self, y: f64, time_ms: f64) -> Option<ScrollPhase> {
        let Motion::Dragging { last_y, started } = self.motion else {
            return None;
        };
        let delta = last_y - y;
        let before = self.offset;
        self.offset = clamp_offset(self.offset + delta, self.max_offset());
        self.momentum.track(delta, time_ms);
        let moved = self.offset != before;
        self.motion = Motion::Dragging {
            last_y: y,
            started: started || moved,
        };
        if moved && !started {
            #[cfg(feature = "tracing")]
            tracing::trace!(offset = self.offset, "drag scroll started");
            Some(ScrollPhase::Started)
        } else {
            None
        }
    }

    /// Ends the active drag at `time_ms`.
    ///
    /// With enough velocity the content keeps moving under [`TransformScroll::tick`].
    /// Otherwise a drag that moved returns [`ScrollPhase::Completed`].
    pub fn end(&mut self, time_ms: f64) -> Option<ScrollPhase> {
        let Motion::Dragging { started, .. } = self.motion else {
            return None;
        };
        if self.momentum.release(time_ms) {
            self.motion = Motion::Decelerating;
            return None;
        }
        self.motion = Motion::Idle;
        started.then_some(ScrollPhase::Completed)
    }

    /// Scrolls to `offset`, clamped to the content, either at once or animated.
    ///
    /// An immediate jump cancels any motion and returns
    /// [`ScrollPhase::Completed`] if the offset changed.
    pub fn scroll_to(&mut self, offset: f64, animate: bool) -> Option<ScrollPhase> {
        let target = clamp_offset(offset, self.max_offset());
        self.momentum.stop();
        if animate && target != self.offset {
            self.motion = Motion::Animating(Tween {
                from: self.offset,
                to: target,
                elapsed_ms: 0.0,
                duration_ms: SCROLL_ANIMATION_MS,
            });
            return None;
        }
        self.motion = Motion::Idle;
        let moved = target != self.offset;
        self.offset = target;
        moved.then_some(ScrollPhase::Completed)
    }

    /// Advances momentum or an animation by `dt_ms`.
    ///
    /// Returns [`ScrollPhase::Completed`] on the frame the motion settles.
    pub fn tick(&mut self, dt_ms: f64) -> Option<ScrollPhase> {
        match self.motion {
            Motion::Idle | Motion::Dragging { .. } => None,
            Motion::Decelerating => {
                let max = self.max_offset();
                let next = self.offset + self.momentum.step(dt_ms);
                self.offset = clamp_offset(next, max);
                if next != self.offset {
                    self.momentum.stop();
                }
                if self.momentum.is_moving() {
                    None
                } else {
                    self.complete()
                }
            }
            Motion::Animating(mut tween) => {
                tween.elapsed_ms += dt_ms.max(0.0);
                self.offset = clamp_offset(tween.sample(), self.max_offset());
                if tween.is_done() {
                    self.complete()
                } else {
                    self.motion = Motion::Animating(tween);
                    None
                }
            }
        }
    }

    fn complete(&mut self) -> Option<ScrollPhase> {
        self.motion = Motion::Idle;
        #[cfg(feature = "tracing")]
        tracing::trace!(offset = self.offset, "scrolling completed");
        Some(ScrollPhase::Completed)
    }

    fn settle_motion(&mut self) {
        self.momentum.stop();
        self.motion = Motion::Idle;
    }
}

impl ScrollSource for TransformScroll {
    fn offset(&self) -> f64 {
        self.offset
    }

    fn set_dimensions(&mut self, viewport_height: f64, content_extent: f64) {
        self.viewport_height = viewport_height;
        self.content_extent = content_extent;
        self.offset = clamp_offset(self.offset, self.max_offset());
    }

    fn max_offset(&self) -> f64 {
        max_offset(self.viewport_height, self.content_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::{TransformScroll, WheelDelta};
    use crate::{NativeScroll, ScrollPhase, ScrollSource};

    fn scroll() -> TransformScroll {
        let mut scroll = TransformScroll::new();
        scroll.set_dimensions(200.0, 1_000.0);
        scroll
    }

    #[test]
    fn wheel_steps_are_scaled_and_signed() {
        let mut scroll = scroll();
        // Wheel towards the user scrolls down.
        assert!(scroll.on_wheel(WheelDelta {
            delta_y: -100.0,
            inverted: false
        }));
        assert_eq!(scroll.offset(), 80.0);
        assert!(scroll.on_wheel(WheelDelta {
            delta_y: -50.0,
            inverted: true
        }));
        assert_eq!(scroll.offset(), 40.0);
    }

    #[test]
    fn wheel_steps_past_an_edge_land_on_it() {
        let mut scroll = scroll();
        assert!(!scroll.on_wheel(WheelDelta {
            delta_y: 10.0,
            inverted: false
        }));
        assert_eq!(scroll.offset(), 0.0);

        scroll.scroll_to(790.0, false);
        // 20 * 0.8 = 16 would land at 806; the step stops at 800.
        assert!(scroll.on_wheel(WheelDelta {
            delta_y: -20.0,
            inverted: false
        }));
        assert_eq!(scroll.offset(), scroll.max_offset());
        assert!(!scroll.on_wheel(WheelDelta {
            delta_y: -20.0,
            inverted: false
        }));

        scroll.scroll_to(10.0, false);
        assert!(scroll.on_wheel(WheelDelta {
            delta_y: 50.0,
            inverted: false
        }));
        assert_eq!(scroll.offset(), 0.0);
    }

    #[test]
    fn repeated_wheel_steps_reach_the_end() {
        let mut wheel = scroll();
        let mut native = NativeScroll::new();
        native.set_dimensions(200.0, 1_000.0);
        for _ in 0..20 {
            wheel.on_wheel(WheelDelta {
                delta_y: -120.0,
                inverted: false,
            });
            native.on_wheel(120.0 * 0.8);
            assert_eq!(wheel.offset(), native.offset());
        }
        assert_eq!(wheel.offset(), wheel.max_offset());
    }

    #[test]
    fn drags_report_start_and_completion() {
        let mut scroll = scroll();
        scroll.begin(100.0, 0.0);
        // Pushing past the top does not move the offset.
        assert_eq!(scroll.move_to(150.0, 16.0), None);
        assert_eq!(scroll.offset(), 0.0);
        assert_eq!(scroll.move_to(140.0, 32.0), Some(ScrollPhase::Started));
        assert_eq!(scroll.move_to(130.0, 48.0), None);
        assert_eq!(scroll.offset(), 20.0);
        // A long pause before release leaves no momentum.
        assert_eq!(scroll.end(2_000.0), Some(ScrollPhase::Completed));
        assert!(!scroll.is_scrolling());
    }

    #[test]
    fn flicks_coast_until_momentum_runs_out() {
        let mut scroll = scroll();
        scroll.begin(500.0, 0.0);
        scroll.move_to(480.0, 16.0);
        scroll.move_to(460.0, 32.0);
        assert_eq!(scroll.end(40.0), None);
        assert!(scroll.is_scrolling());

        let released_at = scroll.offset();
        let mut frames = 0;
        let phase = loop {
            if let Some(phase) = scroll.tick(16.0) {
                break phase;
            }
            frames += 1;
            assert!(frames < 1_000, "momentum never settled");
        };
        assert_eq!(phase, ScrollPhase::Completed);
        assert!(scroll.offset() > released_at);
        assert!(!scroll.is_scrolling());
    }

    #[test]
    fn momentum_stops_at_the_end() {
        let mut scroll = scroll();
        scroll.scroll_to(780.0, false);
        scroll.begin(500.0, 0.0);
        scroll.move_to(400.0, 16.0);
        scroll.end(20.0);
        while scroll.tick(16.0).is_none() {}
        assert_eq!(scroll.offset(), 800.0);
    }

    #[test]
    fn animated_scroll_eases_to_the_target() {
        let mut scroll = scroll();
        assert_eq!(scroll.scroll_to(400.0, true), None);
        assert_eq!(scroll.tick(125.0), None);
        assert_eq!(scroll.offset(), 200.0);
        assert_eq!(scroll.tick(125.0), Some(ScrollPhase::Completed));
        assert_eq!(scroll.offset(), 400.0);

        assert_eq!(scroll.scroll_to(5_000.0, false), Some(ScrollPhase::Completed));
        assert_eq!(scroll.offset(), 800.0);
        assert_eq!(scroll.scroll_to(800.0, false), None);
    }

    #[test]
    fn a_new_drag_interrupts_momentum() {
        let mut scroll = scroll();
        scroll.begin(500.0, 0.0);
        scroll.move_to(450.0, 16.0);
        scroll.end(20.0);
        scroll.begin(300.0, 30.0);
        assert_eq!(scroll.tick(16.0), None);
        let held = scroll.offset();
        assert_eq!(scroll.tick(16.0), None);
        assert_eq!(scroll.offset(), held);
    }

    #[test]
    fn transform_translates_by_the_negated_offset() {
        let mut scroll = scroll();
        scroll.scroll_to(120.0, false);
        let p = scroll.transform() * kurbo::Point::new(10.0, 130.0);
        assert_eq!((p.x, p.y), (10.0, 10.0));
    }
}
