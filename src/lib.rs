//! A camera controller for navigating globes and maps.
//!
//! [`GeoCam`](crate::controller::component::GeoCam) turns keyboard, mouse, wheel, and touch
//! input into a camera pose expressed relative to a surface: a focal point on the ground, the
//! local tangent frame there, a heading and pitch, and a distance. It works the same over a
//! geocentric ellipsoid, where panning follows the curve of the earth, and over a flat map.
//!
//! ## Behavior
//!
//! - **Bindings**: every input is looked up in a [`BindingTable`](crate::prelude::BindingTable)
//!   keyed by event kind, button or key, and modifiers. Defaults pan with the left button,
//!   rotate with the middle button, zoom with the right button and the wheel, and fly to a
//!   double-clicked point.
//! - **Tasks**: key presses and wheel steps do not jump. They play out over a fraction of a
//!   second so the camera glides.
//! - **Continuous gestures**: some drags keep moving the camera while the button is held, at a
//!   speed set by how far the pointer has travelled.
//! - **Throwing**: releasing a drag can carry the motion on, decaying every frame.
//! - **Viewpoints**: fly to a placement along an arc, with easing that slows near the ground.
//!   See [`extensions::viewpoint`].
//! - **Tethering** and **terrain avoidance**: follow a moving target, and keep the eye out of
//!   the scene. See [`extensions`].
//!
//! ## Services
//!
//! The controller does not own the world. Coordinate conversions and tangent frames come from
//! a [`GeoService`](crate::services::GeoService), and optional scene hits from an
//! [`IntersectionService`](crate::services::IntersectionService). The crate ships an
//! [`Ellipsoid`](crate::services::Ellipsoid) and a [`FlatSurface`](crate::services::FlatSurface).
//!
//! ## Usage
//!
//! Add [`DefaultGeoCamPlugins`], a [`GeoServices`](crate::services::GeoServices) resource if
//! you are not navigating WGS84, and a [`GeoCam`](crate::controller::component::GeoCam) on your
//! camera entity. Outside of Bevy's schedules, call
//! [`GeoCam::handle`](crate::controller::component::GeoCam::handle) with your own events.

#![warn(missing_docs)]

pub mod controller;
pub mod extensions;
pub mod input;
pub mod services;

/// Common imports.
pub mod prelude {
    pub use crate::{
        controller::{
            bindings::{
                Action, ActionOptions, ActionType, BindingTable, ButtonMask, EventKind, Modifiers,
                ScrollDirection,
            },
            camera::{CameraProjection, RenderCamera, Viewport},
            component::{GeoCam, NavContext},
            inputs::{NavEvent, PointerSample},
            pose::Pose,
            settings::{Sensitivity, Settings, TetherMode, TransitionSettings},
            transition::Viewpoint,
            GeoCamPlugin,
        },
        extensions::{
            tether::TetherTarget,
            viewpoint::{SetViewpoint, ViewpointPlugin},
        },
        services::{Ellipsoid, FlatSurface, GeoService, GeoServices, IntersectionService},
        DefaultGeoCamPlugins,
    };
}

/// Adds the controller, the Bevy input bridge, and the viewpoint extension.
pub struct DefaultGeoCamPlugins;

impl bevy_app::PluginGroup for DefaultGeoCamPlugins {
    fn build(self) -> bevy_app::PluginGroupBuilder {
        bevy_app::PluginGroupBuilder::start::<Self>()
            .add(controller::GeoCamPlugin)
            .add(input::NavInputPlugin)
            .add(extensions::viewpoint::ViewpointPlugin)
    }
}
