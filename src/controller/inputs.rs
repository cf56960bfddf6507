//! The events the controller consumes, and the bookkeeping that turns them into gestures.

use std::collections::BTreeMap;

use bevy_input::keyboard::KeyCode;
use bevy_math::DVec2;
use bevy_reflect::Reflect;

use super::{
    bindings::{Action, ButtonMask, Modifiers},
    camera::Viewport,
};

/// A second click within this many seconds of the first counts as a double click.
pub const DOUBLE_CLICK_INTERVAL: f64 = 0.3;
/// Continuous gestures accumulate this fraction of each pointer delta.
pub const CONTINUOUS_DELTA_SCALE: f64 = 0.01;

/// A pointer position and the state of the buttons and modifiers when it was sampled.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PointerSample {
    /// Position in logical pixels, origin at the top left of the window.
    pub position: DVec2,
    /// Buttons held.
    pub buttons: ButtonMask,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Seconds, on the same clock as every other event.
    pub time: f64,
}

/// Input delivered to the controller. Every variant carries a timestamp in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum NavEvent {
    /// A key went down.
    KeyPress {
        /// The key.
        key: KeyCode,
        /// Modifiers held, including the one this key toggles if it is a modifier.
        modifiers: Modifiers,
        /// Seconds.
        time: f64,
    },
    /// A key went up.
    KeyRelease {
        /// The key.
        key: KeyCode,
        /// Seconds.
        time: f64,
    },
    /// A mouse button went down. `pointer.buttons` includes the new button.
    ButtonPress(PointerSample),
    /// A mouse button went up. `pointer.buttons` no longer includes the released button.
    ButtonRelease(PointerSample),
    /// The pointer moved.
    Move(PointerSample),
    /// The wheel or trackpad scrolled. Positive `y` is toward the user.
    Scroll {
        /// Scroll amount.
        delta: DVec2,
        /// Where the pointer was.
        position: DVec2,
        /// Seconds.
        time: f64,
    },
    /// A finger touched the screen.
    TouchDown {
        /// Stable identifier of the finger for the length of the touch.
        id: u64,
        /// Position in logical pixels.
        position: DVec2,
        /// Seconds.
        time: f64,
    },
    /// A finger moved.
    TouchMove {
        /// Finger identifier.
        id: u64,
        /// Position in logical pixels.
        position: DVec2,
        /// Seconds.
        time: f64,
    },
    /// A finger lifted or the touch was cancelled.
    TouchUp {
        /// Finger identifier.
        id: u64,
        /// Position in logical pixels.
        position: DVec2,
        /// Seconds.
        time: f64,
    },
    /// Once per rendered frame, after the frame's input events.
    Frame {
        /// Seconds.
        time: f64,
    },
}

impl NavEvent {
    /// When the event happened, in seconds.
    pub fn time(&self) -> f64 {
        match *self {
            NavEvent::KeyPress { time, .. }
            | NavEvent::KeyRelease { time, .. }
            | NavEvent::Scroll { time, .. }
            | NavEvent::TouchDown { time, .. }
            | NavEvent::TouchMove { time, .. }
            | NavEvent::TouchUp { time, .. }
            | NavEvent::Frame { time } => time,
            NavEvent::ButtonPress(sample)
            | NavEvent::ButtonRelease(sample)
            | NavEvent::Move(sample) => sample.time,
        }
    }
}

/// Is a press/release pair a click: did the pointer move less than `0.1` device-normalized units
/// per second held?
pub fn is_click(down: &PointerSample, up: &PointerSample, viewport: &Viewport) -> bool {
    let elapsed = up.time - down.time;
    let moved = (viewport.ndc(up.position) - viewport.ndc(down.position)).length();
    moved < elapsed * 0.1
}

/// The delta between two pointer positions in device-normalized units, with `y` growing upward.
pub fn pointer_delta(previous: DVec2, current: DVec2, viewport: &Viewport) -> DVec2 {
    let delta = viewport.ndc(current) - viewport.ndc(previous);
    DVec2::new(delta.x, -delta.y)
}

/// Press, release, and move history for the gesture in progress.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct PointerTracking {
    /// Where the buttons went down.
    pub down: Option<PointerSample>,
    /// Where the buttons were released.
    pub up: Option<PointerSample>,
    /// The move before the latest one.
    pub previous: Option<PointerSample>,
    /// The latest move.
    pub current: Option<PointerSample>,
    /// Modifiers from the last key press.
    pub key_modifiers: Modifiers,
    /// The last click, for double-click detection.
    pub last_click: Option<PointerSample>,
    /// The last drag delta applied directly, kept for throwing.
    pub last_drag: Option<(Action, DVec2)>,
}

impl PointerTracking {
    /// Forget the gesture in progress. Key modifiers survive unless `including_keys`.
    pub fn clear(&mut self, including_keys: bool) {
        self.down = None;
        self.up = None;
        self.previous = None;
        self.current = None;
        self.last_drag = None;
        if including_keys {
            self.key_modifiers = Modifiers::NONE;
        }
    }

    /// Record a move, shifting the latest one back.
    pub fn push_move(&mut self, sample: PointerSample) {
        self.previous = self.current.replace(sample);
    }

    /// Was the latest recorded move made with a button held?
    pub fn moved_with_buttons(&self) -> bool {
        self.current.is_some_and(|s| !s.buttons.is_empty())
    }

    /// Record a click and report whether it completes a double click.
    pub fn register_click(&mut self, click: PointerSample) -> bool {
        let double = self.last_click.is_some_and(|last| {
            last.buttons == click.buttons && click.time - last.time <= DOUBLE_CLICK_INTERVAL
        });
        self.last_click = if double { None } else { Some(click) };
        double
    }
}

/// An action that keeps moving the camera while its button is held, at a speed set by how far
/// the pointer has been dragged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct ContinuousGesture {
    /// Is a continuous action driving the camera?
    pub active: bool,
    /// The action being driven.
    pub action: Action,
    /// Summed, scaled pointer deltas.
    pub accumulated: DVec2,
    /// When the gesture was last applied.
    pub last_service: f64,
}

impl ContinuousGesture {
    /// Add a pointer delta, starting the gesture clock on the first one.
    pub fn accumulate(&mut self, action: Action, delta: DVec2, now: f64) {
        if !self.active {
            self.last_service = now;
        }
        self.active = true;
        self.action = action;
        self.accumulated += delta * CONTINUOUS_DELTA_SCALE;
    }

    /// The delta to apply this frame, `accumulated * elapsed * 60`. Inactive gestures reset.
    pub fn service(&mut self, now: f64) -> Option<(Action, DVec2)> {
        if !self.active {
            self.accumulated = DVec2::ZERO;
            return None;
        }
        let elapsed = (now - self.last_service).max(0.0);
        self.last_service = now;
        Some((self.action, self.accumulated * elapsed * 60.0))
    }

    /// Stop the gesture.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The two-finger gesture deltas produced by one touch move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct MultiTouch {
    /// Change in the distance between the fingers, in pixels. Positive when spreading.
    pub spread: f64,
    /// Change in the angle of the line between the fingers, in radians.
    pub twist: f64,
    /// Movement of the midpoint, in pixels.
    pub drag: DVec2,
}

/// Active touch points, keyed by finger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchTracking {
    touches: BTreeMap<u64, DVec2>,
}

impl TouchTracking {
    /// Number of fingers down.
    pub fn count(&self) -> usize {
        self.touches.len()
    }

    /// Record a finger touching down.
    pub fn down(&mut self, id: u64, position: DVec2) {
        self.touches.insert(id, position);
    }

    /// Record a finger lifting.
    pub fn up(&mut self, id: u64) {
        self.touches.remove(&id);
    }

    /// Forget every touch.
    pub fn clear(&mut self) {
        self.touches.clear();
    }

    /// Move a finger. With exactly two fingers down, returns how the pair changed.
    pub fn moved(&mut self, id: u64, position: DVec2) -> Option<MultiTouch> {
        let before = self.pair();
        let slot = self.touches.get_mut(&id)?;
        *slot = position;
        let ((a0, b0), (a1, b1)) = (before?, self.pair()?);

        let (span0, span1) = (b0 - a0, b1 - a1);
        let twist = span0.perp_dot(span1).atan2(span0.dot(span1));
        Some(MultiTouch {
            spread: span1.length() - span0.length(),
            twist,
            drag: (a1 + b1) * 0.5 - (a0 + b0) * 0.5,
        })
    }

    fn pair(&self) -> Option<(DVec2, DVec2)> {
        if self.touches.len() != 2 {
            return None;
        }
        let mut points = self.touches.values().copied();
        Some((points.next()?, points.next()?))
    }
}
