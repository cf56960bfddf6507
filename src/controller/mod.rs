//! Camera controller implementation.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_input::InputSystem;

use crate::{input::NavEventQueue, services::GeoServices};

pub mod bindings;
pub mod camera;
pub mod component;
pub mod inputs;
pub mod momentum;
pub mod motion;
pub mod pose;
pub mod settings;
pub mod task;
pub mod transition;
pub mod zoom;

/// Adds the camera controller systems. Provide your own [`GeoServices`] resource to navigate
/// something other than the WGS84 ellipsoid.
pub struct GeoCamPlugin;

impl Plugin for GeoCamPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GeoServices>()
            .init_resource::<NavEventQueue>()
            .add_systems(
                PreUpdate,
                component::GeoCam::update_camera_positions.after(InputSystem),
            )
            .register_type::<component::GeoCam>()
            .register_type::<pose::Pose>()
            .register_type::<transition::Viewpoint>();
    }
}
