//! Translates Bevy's window and input events into [`NavEvent`]s.
//!
//! The [`NavInputPlugin`] gathers the frame's keyboard, mouse, wheel, and touch events into the
//! [`NavEventQueue`] resource, which
//! [`GeoCam::update_camera_positions`](crate::controller::component::GeoCam::update_camera_positions)
//! then feeds to every controller. Replace this plugin to drive the controller from another
//! input source, or push your own events into the queue.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_input::{
    keyboard::{KeyCode, KeyboardInput},
    mouse::{MouseButton, MouseButtonInput, MouseWheel},
    touch::{TouchInput, TouchPhase},
    ButtonInput, ButtonState, InputSystem,
};
use bevy_math::DVec2;
use bevy_time::prelude::*;
use bevy_window::CursorMoved;

use crate::controller::{
    bindings::{ButtonMask, Modifiers},
    component::GeoCam,
    inputs::{NavEvent, PointerSample},
};

/// See the [module](self) docs.
pub struct NavInputPlugin;

impl Plugin for NavInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NavEventQueue>().add_systems(
            PreUpdate,
            collect_nav_events
                .after(InputSystem)
                .before(GeoCam::update_camera_positions),
        );
    }
}

/// Navigation events waiting to be delivered. Emptied once every controller has seen them.
#[derive(Debug, Default, Resource)]
pub struct NavEventQueue {
    events: Vec<NavEvent>,
}

impl NavEventQueue {
    /// This frame's events.
    pub fn events(&self) -> &[NavEvent] {
        &self.events
    }

    /// Add an event to this frame's batch.
    pub fn push(&mut self, event: NavEvent) {
        self.events.push(event);
    }

    /// Drop the events already delivered.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// The modifier keys currently held.
pub fn held_modifiers(keys: &ButtonInput<KeyCode>) -> Modifiers {
    keys.get_pressed()
        .filter_map(|key| Modifiers::from_key(*key))
        .fold(Modifiers::NONE, |held, modifier| held | modifier)
}

/// The mouse buttons currently held.
pub fn held_buttons(buttons: &ButtonInput<MouseButton>) -> ButtonMask {
    buttons
        .get_pressed()
        .fold(ButtonMask::NONE, |held, button| {
            held | ButtonMask::from_button(*button)
        })
}

/// Convert this frame's Bevy input events into [`NavEvent`]s.
///
/// Bevy delivers each kind of event on its own channel, so ordering across kinds is lost: keys
/// come first, then pointer moves, presses, releases, the wheel, and touches.
#[allow(clippy::too_many_arguments)]
pub fn collect_nav_events(
    mut queue: ResMut<NavEventQueue>,
    mut keyboard: EventReader<KeyboardInput>,
    mut mouse_buttons: EventReader<MouseButtonInput>,
    mut cursor: EventReader<CursorMoved>,
    mut wheel: EventReader<MouseWheel>,
    mut touches: EventReader<TouchInput>,
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut pointer: Local<DVec2>,
) {
    let time = time.elapsed_secs_f64();
    let modifiers = held_modifiers(&keys);
    let held = held_buttons(&buttons);

    for event in keyboard.read() {
        queue.push(match event.state {
            ButtonState::Pressed => NavEvent::KeyPress {
                key: event.key_code,
                modifiers,
                time,
            },
            ButtonState::Released => NavEvent::KeyRelease {
                key: event.key_code,
                time,
            },
        });
    }

    // Buttons pressed this frame are not held during the moves that led up to the press.
    let just_pressed = buttons
        .get_just_pressed()
        .fold(ButtonMask::NONE, |mask, button| {
            mask | ButtonMask::from_button(*button)
        });
    let just_released = buttons
        .get_just_released()
        .fold(ButtonMask::NONE, |mask, button| {
            mask | ButtonMask::from_button(*button)
        });
    let mut moving_buttons = held.without(just_pressed) | just_released;
    let sample = |position, buttons| PointerSample {
        position,
        buttons,
        modifiers,
        time,
    };

    for event in cursor.read() {
        *pointer = event.position.as_dvec2();
        queue.push(NavEvent::Move(sample(*pointer, moving_buttons)));
    }

    for event in mouse_buttons.read() {
        let button = ButtonMask::from_button(event.button);
        if button.is_empty() {
            continue;
        }
        match event.state {
            ButtonState::Pressed => {
                moving_buttons |= button;
                queue.push(NavEvent::ButtonPress(sample(*pointer, moving_buttons)));
            }
            ButtonState::Released => {
                moving_buttons = moving_buttons.without(button);
                queue.push(NavEvent::ButtonRelease(sample(*pointer, moving_buttons)));
            }
        }
    }

    for event in wheel.read() {
        queue.push(NavEvent::Scroll {
            delta: DVec2::new(event.x as f64, -event.y as f64),
            position: *pointer,
            time,
        });
    }

    for event in touches.read() {
        let id = event.id;
        let position = event.position.as_dvec2();
        queue.push(match event.phase {
            TouchPhase::Started => NavEvent::TouchDown { id, position, time },
            TouchPhase::Moved => NavEvent::TouchMove { id, position, time },
            TouchPhase::Ended | TouchPhase::Canceled => NavEvent::TouchUp { id, position, time },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_and_buttons_fold_into_masks() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::ControlLeft);
        keys.press(KeyCode::KeyA);
        assert_eq!(held_modifiers(&keys), Modifiers::LEFT_CONTROL);
        keys.press(KeyCode::ShiftRight);
        assert_eq!(
            held_modifiers(&keys),
            Modifiers::LEFT_CONTROL | Modifiers::RIGHT_SHIFT
        );

        let mut buttons = ButtonInput::<MouseButton>::default();
        assert!(held_buttons(&buttons).is_empty());
        buttons.press(MouseButton::Left);
        buttons.press(MouseButton::Right);
        assert_eq!(held_buttons(&buttons), ButtonMask::LEFT | ButtonMask::RIGHT);
    }

    #[test]
    fn queue_keeps_events_until_cleared() {
        let mut queue = NavEventQueue::default();
        queue.push(NavEvent::Frame { time: 1.0 });
        assert_eq!(queue.events().len(), 1);
        queue.clear();
        assert!(queue.events().is_empty());
    }
}
