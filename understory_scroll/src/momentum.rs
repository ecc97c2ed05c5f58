// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Velocity tracking and linear-deceleration momentum.
//!
//! Velocities are in offset units per second and share the sign of the offset:
//! positive values scroll towards the end of the content.

/// Tuning for [`Momentum`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumConfig {
    /// Weight of the newest sample in the moving-average velocity, in `(0, 1]`.
    pub smoothing: f64,
    /// Deceleration in offset units per second squared.
    pub deceleration: f64,
    /// Speed below which momentum stops, in offset units per second.
    pub velocity_threshold: f64,
    /// Samples further apart than this (milliseconds) do not update the velocity.
    pub max_sample_gap_ms: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.3,
            deceleration: 1500.0,
            velocity_threshold: 10.0,
            max_sample_gap_ms: 500.0,
        }
    }
}

/// Tracks drag velocity and plays it out as decelerating motion.
#[derive(Debug, Clone, Default)]
pub struct Momentum {
    config: MomentumConfig,
    velocity: f64,
    last_sample_ms: Option<f64>,
}

impl Momentum {
    /// Creates an idle tracker.
    #[must_use]
    pub fn new(config: MomentumConfig) -> Self {
        Self {
            config,
            velocity: 0.0,
            last_sample_ms: None,
        }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &MomentumConfig {
        &self.config
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Returns `true` while the velocity is above the stop threshold.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.velocity.abs() > self.config.velocity_threshold
    }

    /// Starts sampling a new gesture at `time_ms`, dropping any momentum.
    pub fn begin(&mut self, time_ms: f64) {
        self.velocity = 0.0;
        self.last_sample_ms = Some(time_ms);
    }

    /// Records a drag movement of `delta` at `time_ms`.
    ///
    /// Without a preceding [`Momentum::begin`], the first sample assumes a
    /// 60 Hz frame.
    pub fn track(&mut self, delta: f64, time_ms: f64) {
        match self.last_sample_ms {
            Some(last) => {
                let dt = (time_ms - last) / 1000.0;
                if dt > 0.0 && dt * 1000.0 < self.config.max_sample_gap_ms {
                    let alpha = self.config.smoothing;
                    self.velocity = self.velocity * (1.0 - alpha) + (delta / dt) * alpha;
                }
            }
            None => self.velocity = delta * 60.0,
        }
        self.last_sample_ms = Some(time_ms);
    }

    /// Ends velocity sampling. Returns `true` if there is momentum to play out.
    ///
    /// A release long after the last sample means the pointer came to rest,
    /// so the velocity is dropped.
    pub fn release(&mut self, time_ms: f64) -> bool {
        if let Some(last) = self.last_sample_ms.take()
            && time_ms - last >= self.config.max_sample_gap_ms
        {
            self.velocity = 0.0;
        }
        if !self.is_moving() {
            self.velocity = 0.0;
        }
        self.velocity != 0.0
    }

    /// Advances by `dt_ms` and returns the distance travelled.
    ///
    /// The velocity decreases linearly and snaps to zero once it falls below
    /// the threshold.
    pub fn step(&mut self, dt_ms: f64) -> f64 {
        if self.velocity == 0.0 || dt_ms.is_nan() || dt_ms <= 0.0 {
            return 0.0;
        }
        let dt = dt_ms / 1000.0;
        let travelled = self.velocity * dt;
        let slowdown = self.config.deceleration * dt;
        self.velocity = if self.velocity > 0.0 {
            (self.velocity - slowdown).max(0.0)
        } else {
            (self.velocity + slowdown).min(0.0)
        };
        if !self.is_moving() {
            self.velocity = 0.0;
        }
        travelled
    }

    /// Drops all velocity and sampling state.
    pub fn stop(&mut self) {
        self.velocity = 0.0;
        self.last_sample_ms = None;
    }
}
