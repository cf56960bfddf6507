//! Keep the camera locked onto a moving target.
//!
//! Start with [`GeoCam::tether_to`](crate::controller::component::GeoCam::tether_to). The camera
//! flies to the target, then follows it each frame according to the
//! [`TetherMode`](crate::controller::settings::TetherMode) in the settings. Any user motion
//! breaks the tether.

use std::{fmt, sync::Arc};

use bevy_math::DVec3;

use crate::{
    controller::{
        pose::{rotation_from_heading_pitch, Pose},
        settings::TetherMode,
    },
    services::GeoService,
};

/// Something the camera can follow.
pub trait TetherTarget: Send + Sync {
    /// Where the target is, in world space.
    fn world_position(&self) -> DVec3;

    /// The target's heading in radians clockwise from north, if it has one.
    fn heading(&self) -> Option<f64> {
        None
    }
}

/// A fixed world position. Useful for tests and for tethering to a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTarget(pub DVec3);

impl TetherTarget for FixedTarget {
    fn world_position(&self) -> DVec3 {
        self.0
    }
}

/// The target being followed, and the heading the camera keeps relative to it.
#[derive(Clone)]
pub struct Tether {
    target: Arc<dyn TetherTarget>,
    heading_offset: Option<f64>,
}

impl fmt::Debug for Tether {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tether")
            .field("position", &self.target.world_position())
            .field("heading_offset", &self.heading_offset)
            .finish()
    }
}

impl Tether {
    /// Follow `target`.
    pub fn new(target: Arc<dyn TetherTarget>) -> Self {
        Self {
            target,
            heading_offset: None,
        }
    }

    /// The target being followed.
    pub fn target(&self) -> &Arc<dyn TetherTarget> {
        &self.target
    }

    /// Where the target is now.
    pub fn position(&self) -> DVec3 {
        self.target.world_position()
    }

    /// Move the pose onto the target. With [`TetherMode::CenterAndHeading`] the camera also
    /// turns with the target, keeping the relative heading it had on the first follow.
    pub fn follow(&mut self, pose: &mut Pose, mode: TetherMode, geo: &dyn GeoService) {
        let position = self.target.world_position();
        if !position.is_finite() {
            return;
        }
        pose.set_center(position, geo);

        if mode != TetherMode::CenterAndHeading {
            return;
        }
        let Some(target_heading) = self.target.heading() else {
            return;
        };
        let (heading, pitch) = pose.heading_pitch();
        let offset = *self
            .heading_offset
            .get_or_insert(heading - target_heading);
        pose.local_rotation = rotation_from_heading_pitch(target_heading + offset, pitch);
    }
}
