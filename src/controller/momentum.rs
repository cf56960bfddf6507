//! Provides [`Throw`], the decaying motion that continues after a drag is released.

use bevy_math::DVec2;
use bevy_reflect::Reflect;

use super::bindings::ActionType;

/// Throws stop once their delta falls below this fraction of the initial delta.
const STOP_FRACTION: f64 = 0.01;

/// Motion carried on after the pointer is released mid-drag.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Throw {
    action: ActionType,
    delta: DVec2,
    initial_length: f64,
    last_service: f64,
}

impl Throw {
    /// Start throwing with the last per-frame drag delta. `None` when there is nothing to throw.
    pub fn new(action: ActionType, delta: DVec2, now: f64) -> Option<Self> {
        let initial_length = delta.length();
        (initial_length > 0.0 && initial_length.is_finite()).then_some(Self {
            action,
            delta,
            initial_length,
            last_service: now,
        })
    }

    /// The drag action being continued.
    pub fn action(&self) -> ActionType {
        self.action
    }

    /// The delta applied per 60 Hz frame.
    pub fn delta(&self) -> DVec2 {
        self.delta
    }

    /// Advance to `now`, returning the delta to apply, or `None` once the throw has died out.
    ///
    /// `decay_rate` is the fraction of velocity lost per 60 Hz frame, and is applied
    /// fractionally so frame rate does not change the throw distance.
    pub fn service(&mut self, now: f64, decay_rate: f64) -> Option<DVec2> {
        let frames = ((now - self.last_service) * 60.0).max(0.0);
        self.last_service = now;
        let applied = self.delta * frames;
        self.delta *= (1.0 - decay_rate).powf(frames);
        if self.delta.length() < self.initial_length * STOP_FRACTION {
            return None;
        }
        Some(applied)
    }
}
