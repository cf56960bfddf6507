//! A `bevy_geo_cam` extension that flies a camera to a [`Viewpoint`] when a [`SetViewpoint`]
//! event is sent.

use std::time::Duration;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;
use bevy_window::RequestRedraw;

use crate::{
    controller::{component::GeoCam, transition::Viewpoint},
    services::GeoServices,
};

/// See the [module](self) docs.
pub struct ViewpointPlugin;

impl Plugin for ViewpointPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewpointDefaults>()
            .add_event::<SetViewpoint>()
            .add_systems(PostUpdate, SetViewpoint::receive) // In PostUpdate so we don't miss users sending this in Update. The flight starts on the next frame.
            .register_type::<ViewpointDefaults>();
    }
}

/// Send this event to move a camera to a viewpoint. Fields left unset on the viewpoint keep
/// the camera's current values.
#[derive(Debug, Clone, Event)]
pub struct SetViewpoint {
    /// The camera to move.
    pub camera: Entity,
    /// Where to go.
    pub viewpoint: Viewpoint,
    /// How long the flight takes. Falls back to [`ViewpointDefaults::duration`]; zero jumps
    /// straight there.
    pub duration: Option<Duration>,
}

impl SetViewpoint {
    /// Fly `camera` to `viewpoint` over the default duration.
    pub fn new(camera: Entity, viewpoint: Viewpoint) -> Self {
        Self {
            camera,
            viewpoint,
            duration: None,
        }
    }

    /// Override the flight duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    fn receive(
        mut events: EventReader<Self>,
        defaults: Res<ViewpointDefaults>,
        services: Res<GeoServices>,
        mut cameras: Query<&mut GeoCam>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        for event in events.read() {
            let Ok(mut controller) = cameras.get_mut(event.camera) else {
                continue;
            };
            redraw.write(RequestRedraw);

            let duration = event.duration.unwrap_or(defaults.duration);
            controller.set_viewpoint(
                &event.viewpoint,
                duration.as_secs_f64(),
                services.geo.as_ref(),
            );
        }
    }
}

/// Settings for the viewpoint plugin.
#[derive(Debug, Resource, Reflect)]
pub struct ViewpointDefaults {
    /// Flight duration for [`SetViewpoint`] events that do not name one.
    pub duration: Duration,
}

impl Default for ViewpointDefaults {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(2),
        }
    }
}
