//! A single-slot, time-integrated camera motion.
//!
//! Discrete inputs (key presses, scroll ticks) do not move the camera in one jump. They register
//! a [`Task`] with a per-second rate and a duration, and every frame the elapsed time since the
//! last service is converted into a delta until the duration is used up.

use bevy_log::prelude::*;
use bevy_math::DVec2;
use bevy_reflect::Reflect;

/// The motion a [`Task`] drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum TaskKind {
    /// No task is running.
    #[default]
    None,
    /// Slide the center across the surface.
    Pan,
    /// Change heading and pitch.
    Rotate,
    /// Move toward or away from the focal point.
    Zoom,
}

/// At most one pending motion. Setting a new task overwrites the old one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct Task {
    kind: TaskKind,
    rate: DVec2,
    remaining: f64,
    last_service: f64,
}

impl Task {
    /// The motion being driven.
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Delta applied per second.
    pub fn rate(&self) -> DVec2 {
        self.rate
    }

    /// Seconds left to run.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Is a task pending?
    pub fn is_active(&self) -> bool {
        self.kind != TaskKind::None
    }

    /// Start a task at `now`, replacing any pending one.
    pub fn set(&mut self, kind: TaskKind, rate: DVec2, duration: f64, now: f64) {
        trace!("Task {kind:?} at {rate:?}/s for {duration}s");
        *self = Self {
            kind,
            rate,
            remaining: duration,
            last_service: now,
        };
        if duration <= 0.0 {
            self.kind = TaskKind::None;
        }
    }

    /// Drop the pending task.
    pub fn clear(&mut self) {
        self.kind = TaskKind::None;
    }

    /// Advance the task to `now`, returning the motion and delta to apply this frame.
    ///
    /// The elapsed time is capped at the remaining duration so the total delta over the life of
    /// a task is exactly `rate * duration`.
    pub fn service(&mut self, now: f64) -> Option<(TaskKind, DVec2)> {
        if self.kind == TaskKind::None {
            return None;
        }
        let dt = now - self.last_service;
        if dt <= 0.0 {
            return None;
        }
        let dt = dt.min(self.remaining);
        let kind = self.kind;
        self.remaining -= dt;
        self.last_service = now;
        if self.remaining <= 0.0 {
            self.kind = TaskKind::None;
        }
        Some((kind, self.rate * dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn total_delta_is_rate_times_duration() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let rate = DVec2::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
            let duration = rng.gen_range(0.05..2.0);
            let mut task = Task::default();
            task.set(TaskKind::Pan, rate, duration, 10.0);

            let mut now = 10.0;
            let mut total = DVec2::ZERO;
            while task.is_active() {
                now += rng.gen_range(0.001..0.1);
                if let Some((kind, delta)) = task.service(now) {
                    assert_eq!(kind, TaskKind::Pan);
                    total += delta;
                }
            }
            assert!(total.abs_diff_eq(rate * duration, 1e-9), "{total} vs {}", rate * duration);
            assert_eq!(task.kind(), TaskKind::None);
            assert!(task.service(now + 1.0).is_none());
        }
    }

    #[test]
    fn no_progress_without_elapsed_time() {
        let mut task = Task::default();
        task.set(TaskKind::Zoom, DVec2::new(0.0, -1.5), 0.2, 1.0);
        assert!(task.service(1.0).is_none());
        assert!(task.service(0.5).is_none());
        assert!(task.is_active());
        let (kind, delta) = task.service(1.1).unwrap();
        assert_eq!(kind, TaskKind::Zoom);
        assert!((delta.y + 0.15).abs() < 1e-12);
        assert!((task.remaining() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn new_task_overwrites() {
        let mut task = Task::default();
        task.set(TaskKind::Pan, DVec2::X, 1.0, 0.0);
        task.set(TaskKind::Rotate, DVec2::Y, 0.5, 0.2);
        assert_eq!(task.kind(), TaskKind::Rotate);
        assert_eq!(task.rate(), DVec2::Y);
        task.clear();
        assert!(!task.is_active());
    }

    #[test]
    fn zero_duration_is_inert() {
        let mut task = Task::default();
        task.set(TaskKind::Pan, DVec2::X, 0.0, 0.0);
        assert!(!task.is_active());
    }
}
